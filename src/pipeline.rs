//! Per-request analysis pipeline.
//!
//! Composes DOI extraction, metadata resolution and the lexical-entropy
//! score into the final result structure handed to the document sink and
//! the JSON response.

use crate::doi::{extract_doi, FALLBACK_DOI};
use crate::entropy::lexical_entropy;
use crate::resolver::{ArticleMetadata, BibliographicResolver};
use serde::Serialize;
use tracing::{debug, info};

/// Assembled result for one processed document
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub metadata: ArticleMetadata,
    /// Generated estado-del-arte text
    pub estado_del_arte: String,
    /// Lexical diversity of the generated text
    pub entropia_estado_del_arte: f64,
}

/// Run the analysis pipeline over one document.
///
/// `raw_text` is the PDF-extracted text, `review` the already-generated
/// estado-del-arte. DOI extraction happens before resolution; a document
/// with no DOI gets [`FALLBACK_DOI`] so the resolver tier-chain still
/// runs (and typically lands on the layout heuristic). The entropy score
/// is independent of resolution; both are complete before assembly.
pub async fn run(
    resolver: &BibliographicResolver,
    raw_text: &str,
    review: String,
) -> AnalysisResult {
    let doi = match extract_doi(raw_text) {
        Some(doi) => {
            info!(doi = %doi, "DOI extracted from document");
            doi
        }
        None => {
            debug!(fallback = FALLBACK_DOI, "No DOI in document, using placeholder");
            FALLBACK_DOI.to_string()
        }
    };

    let entropy = lexical_entropy(&review);
    let metadata = resolver.resolve(&doi, raw_text).await;

    AnalysisResult {
        metadata,
        estado_del_arte: review,
        entropia_estado_del_arte: entropy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_flat() {
        let result = AnalysisResult {
            metadata: ArticleMetadata {
                title: "T".to_string(),
                authors: "A".to_string(),
                journal: "J".to_string(),
                is_scopus: "No disponible".to_string(),
                quartile: "Q2".to_string(),
                country: "Spain".to_string(),
                subject_area: "Ecology".to_string(),
                subject_category: "Ecology (Q2)".to_string(),
            },
            estado_del_arte: "texto".to_string(),
            entropia_estado_del_arte: 1.5,
        };

        let json = serde_json::to_value(&result).expect("serialize");
        // Metadata fields are flattened to the top level of the payload
        assert_eq!(json["title"], "T");
        assert_eq!(json["quartile"], "Q2");
        assert_eq!(json["estado_del_arte"], "texto");
        assert_eq!(json["entropia_estado_del_arte"], 1.5);
    }
}
