//! Crossref API client, the secondary metadata provider.
//!
//! Queried by DOI when Elsevier cannot produce a usable record. A miss
//! here is a normal outcome, not an error: the resolver falls through to
//! its layout heuristic.

use crate::error::{Result, SotagenError};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Crossref API base URL
const CROSSREF_API_URL: &str = "https://api.crossref.org/works";

/// Polite pool email for Crossref API
const MAILTO: &str = "sotagen@example.com";

/// Request timeout for Crossref lookups
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Placeholder title when Crossref returns a work without one
const TITLE_NOT_AVAILABLE: &str = "Título no disponible";

/// Placeholder journal when Crossref returns a work without one
const JOURNAL_NOT_AVAILABLE: &str = "Revista no disponible";

/// Metadata extracted from a Crossref work
#[derive(Debug, Clone)]
pub struct CrossrefMetadata {
    /// Article title
    pub title: String,
    /// Authors (comma-separated `given family` pairs)
    pub authors: String,
    /// Journal name (container title)
    pub journal: String,
}

/// Crossref API client
pub struct CrossrefClient {
    client: reqwest::Client,
}

impl CrossrefClient {
    /// Create a new CrossrefClient
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("sotagen/1.0 (mailto:{})", MAILTO))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SotagenError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Look up a work by DOI.
    ///
    /// Returns `None` on non-200 responses, network errors, timeouts and
    /// unparseable bodies; none of those are propagated.
    pub async fn lookup_doi(&self, doi: &str) -> Option<CrossrefMetadata> {
        let doi = doi.trim();
        if doi.is_empty() {
            return None;
        }

        let url = format!("{}/{}", CROSSREF_API_URL, doi);
        debug!(doi, "Querying Crossref");

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(doi, error = %e, "Crossref request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(doi, status = response.status().as_u16(), "DOI not found in Crossref");
            return None;
        }

        let data: WorksResponse = match response.json().await {
            Ok(d) => d,
            Err(e) => {
                warn!(doi, error = %e, "Failed to parse Crossref response");
                return None;
            }
        };

        Some(parse_work(data.message))
    }
}

// === Crossref API Response Types ===

#[derive(Debug, Deserialize)]
struct WorksResponse {
    message: Work,
}

#[derive(Debug, Deserialize)]
struct Work {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<WorkAuthor>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WorkAuthor {
    #[serde(default)]
    given: String,
    #[serde(default)]
    family: String,
}

/// Map a Crossref work onto our metadata struct, applying placeholders
fn parse_work(work: Work) -> CrossrefMetadata {
    let title = work
        .title
        .into_iter()
        .next()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| TITLE_NOT_AVAILABLE.to_string());

    let authors = work
        .author
        .iter()
        .map(|a| format!("{} {}", a.given, a.family).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let journal = work
        .container_title
        .into_iter()
        .next()
        .filter(|j| !j.trim().is_empty())
        .unwrap_or_else(|| JOURNAL_NOT_AVAILABLE.to_string());

    CrossrefMetadata {
        title,
        authors,
        journal,
    }
}
