//! Bibliographic resolution with tiered fallback.
//!
//! Tier 1 is Elsevier, tier 2 Crossref, tier 3 a layout heuristic over
//! the raw document text. Precedence is fixed and title/authors always
//! come from a single tier; only the SCImago enrichment is applied to
//! whichever journal name the winning tier produced. Resolution never
//! fails: at worst every field is a placeholder string.

use crate::crossref::CrossrefClient;
use crate::elsevier::ElsevierClient;
use crate::scimago::ScimagoTable;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Scopus flag when the secondary provider answered (it carries no signal)
const SCOPUS_NOT_AVAILABLE: &str = "No disponible";

/// Scopus flag when only the layout heuristic ran
const SCOPUS_UNKNOWN: &str = "Desconocido";

const TITLE_NOT_AVAILABLE: &str = "Título no disponible";
const AUTHORS_NOT_AVAILABLE: &str = "Autores no disponibles";
const JOURNAL_NOT_AVAILABLE: &str = "Revista no disponible";

/// Fully resolved metadata for one article.
///
/// Every field is always populated, with placeholder strings standing in
/// for missing data; callers never see null/absent fields.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleMetadata {
    pub title: String,
    pub authors: String,
    pub journal: String,
    pub is_scopus: String,
    pub quartile: String,
    pub country: String,
    pub subject_area: String,
    pub subject_category: String,
}

/// Tiered metadata resolver.
///
/// Holds its provider clients and the shared SCImago table explicitly;
/// no ambient global state. Safe to share across concurrent requests.
pub struct BibliographicResolver {
    elsevier: Option<ElsevierClient>,
    crossref: CrossrefClient,
    scimago: Arc<ScimagoTable>,
}

impl BibliographicResolver {
    /// Create a resolver.
    ///
    /// `elsevier` is optional: without an API key the primary tier is
    /// skipped and resolution starts at Crossref.
    pub fn new(
        elsevier: Option<ElsevierClient>,
        crossref: CrossrefClient,
        scimago: Arc<ScimagoTable>,
    ) -> Self {
        Self {
            elsevier,
            crossref,
            scimago,
        }
    }

    /// Resolve metadata for `doi`, with `raw_text` available for the
    /// heuristic tier. Always returns a fully populated record.
    pub async fn resolve(&self, doi: &str, raw_text: &str) -> ArticleMetadata {
        if let Some(elsevier) = &self.elsevier {
            if let Some(article) = elsevier.fetch(doi).await {
                info!(doi, tier = "elsevier", "Resolved metadata");
                return self.assemble(
                    article.title,
                    article.authors,
                    article.journal,
                    article.is_scopus,
                );
            }
        } else {
            debug!(doi, "No Elsevier API key configured, skipping primary tier");
        }

        if let Some(work) = self.crossref.lookup_doi(doi).await {
            info!(doi, tier = "crossref", "Resolved metadata");
            return self.assemble(
                work.title,
                work.authors,
                work.journal,
                SCOPUS_NOT_AVAILABLE.to_string(),
            );
        }

        info!(doi, tier = "heuristic", "Both providers failed, guessing from layout");
        let (title, authors) = guess_from_layout(raw_text);
        self.assemble(
            title,
            authors,
            JOURNAL_NOT_AVAILABLE.to_string(),
            SCOPUS_UNKNOWN.to_string(),
        )
    }

    /// Enrich the winning tier's fields with SCImago ranking data
    fn assemble(
        &self,
        title: String,
        authors: String,
        journal: String,
        is_scopus: String,
    ) -> ArticleMetadata {
        let ranking = self.scimago.lookup(&journal);
        ArticleMetadata {
            title,
            authors,
            journal,
            is_scopus,
            quartile: ranking.quartile,
            country: ranking.country,
            subject_area: ranking.subject_area,
            subject_category: ranking.subject_category,
        }
    }
}

/// Guess title and authors from the document's line layout.
///
/// The first line of 50-200 characters (exclusive) is taken as the title;
/// the line immediately after it, if 5-200 characters (exclusive), as the
/// authors. Falls back to placeholders when no line qualifies.
fn guess_from_layout(text: &str) -> (String, String) {
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        let candidate = line.trim();
        let len = candidate.chars().count();
        if len > 50 && len < 200 {
            let authors = lines
                .get(i + 1)
                .map(|l| l.trim())
                .filter(|l| {
                    let n = l.chars().count();
                    n > 5 && n < 200
                })
                .map(str::to_string)
                .unwrap_or_else(|| AUTHORS_NOT_AVAILABLE.to_string());
            return (candidate.to_string(), authors);
        }
    }

    (
        TITLE_NOT_AVAILABLE.to_string(),
        AUTHORS_NOT_AVAILABLE.to_string(),
    )
}
