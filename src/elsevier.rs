//! Elsevier API client, the primary metadata provider.
//!
//! Fetches article metadata by DOI. Elsevier has shipped two envelope
//! shapes for this endpoint (`full-text-retrieval-response` and
//! `abstracts-retrieval-response`); both are modeled explicitly and
//! adapted to one internal record instead of probing fields ad hoc.

use crate::error::{Result, SotagenError};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Elsevier article retrieval endpoint
const ELSEVIER_API_URL: &str = "https://api.elsevier.com/content/article/doi";

/// Request timeout (the upstream service left this call unbounded)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Placeholder when the creator field carries no usable name
const AUTHOR_NOT_AVAILABLE: &str = "Autor no disponible";

/// Placeholder when the publication name is missing
const JOURNAL_NOT_AVAILABLE: &str = "Revista no disponible";

/// Metadata extracted from an Elsevier response
#[derive(Debug, Clone)]
pub struct ElsevierArticle {
    pub title: String,
    /// Authors (comma-separated display names)
    pub authors: String,
    pub journal: String,
    /// Best-effort Scopus indicator: "Sí" when the envelope carries a
    /// `scopus-id`, "No" otherwise. Not a reliable indexing signal.
    pub is_scopus: String,
}

/// Elsevier API client
pub struct ElsevierClient {
    client: reqwest::Client,
    api_key: String,
}

impl ElsevierClient {
    /// Create a new ElsevierClient with the given API key
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SotagenError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, api_key })
    }

    /// Fetch article metadata by DOI.
    ///
    /// Returns `None` when the article is unknown, the response cannot be
    /// parsed, or the title is absent/empty; the resolver then moves on
    /// to Crossref. Network failures are swallowed the same way.
    pub async fn fetch(&self, doi: &str) -> Option<ElsevierArticle> {
        let url = format!("{}/{}", ELSEVIER_API_URL, doi.trim());
        debug!(doi, "Querying Elsevier");

        let response = match self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-ELS-APIKey", &self.api_key)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(doi, error = %e, "Elsevier request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(doi, status = response.status().as_u16(), "DOI not found in Elsevier");
            return None;
        }

        let envelope: ElsevierEnvelope = match response.json().await {
            Ok(e) => e,
            Err(e) => {
                warn!(doi, error = %e, "Failed to parse Elsevier response");
                return None;
            }
        };

        adapt_envelope(envelope)
    }
}

// === Elsevier API Response Types ===

/// The two observed envelope schemas for the article endpoint
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ElsevierEnvelope {
    FullText {
        #[serde(rename = "full-text-retrieval-response")]
        body: Retrieval,
    },
    Abstracts {
        #[serde(rename = "abstracts-retrieval-response")]
        body: Retrieval,
    },
}

#[derive(Debug, Deserialize)]
struct Retrieval {
    #[serde(default)]
    coredata: Option<Coredata>,
    /// Presence of this key is the (heuristic) Scopus indicator
    #[serde(rename = "scopus-id", default)]
    scopus_id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Coredata {
    #[serde(rename = "dc:title", default)]
    title: Option<String>,
    #[serde(rename = "dc:creator", default)]
    creator: Option<Creators>,
    #[serde(rename = "prism:publicationName", default)]
    publication_name: Option<String>,
}

/// `dc:creator` arrives as a single object or a list of objects
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Creators {
    One(Creator),
    Many(Vec<Creator>),
}

#[derive(Debug, Deserialize)]
struct Creator {
    #[serde(rename = "$", default)]
    name: Option<String>,
}

/// Adapt either envelope variant to the internal article record.
///
/// Returns `None` when the title is missing or empty, which is the signal
/// to fall back to Crossref.
fn adapt_envelope(envelope: ElsevierEnvelope) -> Option<ElsevierArticle> {
    let body = match envelope {
        ElsevierEnvelope::FullText { body } => body,
        ElsevierEnvelope::Abstracts { body } => body,
    };

    let is_scopus = if body.scopus_id.is_some() { "Sí" } else { "No" };
    let coredata = body.coredata?;

    let title = coredata.title.map(|t| t.trim().to_string())?;
    if title.is_empty() {
        return None;
    }

    let authors = match coredata.creator {
        Some(Creators::Many(list)) => list
            .iter()
            .filter_map(|c| c.name.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Some(Creators::One(creator)) => creator
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| AUTHOR_NOT_AVAILABLE.to_string()),
        None => String::new(),
    };

    let journal = coredata
        .publication_name
        .filter(|j| !j.trim().is_empty())
        .unwrap_or_else(|| JOURNAL_NOT_AVAILABLE.to_string());

    Some(ElsevierArticle {
        title,
        authors,
        journal,
        is_scopus: is_scopus.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapt_full_text_envelope() {
        let body = r#"{
            "full-text-retrieval-response": {
                "scopus-id": "85012345678",
                "coredata": {
                    "dc:title": "Mechanics of Granular Flows",
                    "dc:creator": [{"$": "Doe J."}, {"$": "Roe J."}],
                    "prism:publicationName": "Cell"
                }
            }
        }"#;
        let envelope: ElsevierEnvelope = serde_json::from_str(body).expect("deserialize");
        let article = adapt_envelope(envelope).expect("usable article");
        assert_eq!(article.title, "Mechanics of Granular Flows");
        assert_eq!(article.authors, "Doe J., Roe J.");
        assert_eq!(article.journal, "Cell");
        assert_eq!(article.is_scopus, "Sí");
    }

    #[test]
    fn test_adapt_abstracts_envelope_single_creator() {
        let body = r#"{
            "abstracts-retrieval-response": {
                "coredata": {
                    "dc:title": "A Lone Author Study",
                    "dc:creator": {"$": "García A."},
                    "prism:publicationName": "The Lancet"
                }
            }
        }"#;
        let envelope: ElsevierEnvelope = serde_json::from_str(body).expect("deserialize");
        let article = adapt_envelope(envelope).expect("usable article");
        assert_eq!(article.authors, "García A.");
        assert_eq!(article.is_scopus, "No");
    }

    #[test]
    fn test_missing_title_yields_none() {
        let body = r#"{
            "full-text-retrieval-response": {
                "coredata": {
                    "prism:publicationName": "Cell"
                }
            }
        }"#;
        let envelope: ElsevierEnvelope = serde_json::from_str(body).expect("deserialize");
        assert!(adapt_envelope(envelope).is_none());
    }

    #[test]
    fn test_empty_title_yields_none() {
        let body = r#"{
            "abstracts-retrieval-response": {
                "coredata": {
                    "dc:title": "   "
                }
            }
        }"#;
        let envelope: ElsevierEnvelope = serde_json::from_str(body).expect("deserialize");
        assert!(adapt_envelope(envelope).is_none());
    }

    #[test]
    fn test_missing_journal_placeholder() {
        let body = r#"{
            "full-text-retrieval-response": {
                "coredata": {
                    "dc:title": "Untethered Work",
                    "dc:creator": [{"$": "Doe J."}]
                }
            }
        }"#;
        let envelope: ElsevierEnvelope = serde_json::from_str(body).expect("deserialize");
        let article = adapt_envelope(envelope).expect("usable article");
        assert_eq!(article.journal, JOURNAL_NOT_AVAILABLE);
    }
}
