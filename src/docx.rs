//! Word-document sink.
//!
//! Serializes an analysis result (metadata, entropy, generated review)
//! into a downloadable .docx report.

use crate::error::{Result, SotagenError};
use crate::resolver::ArticleMetadata;
use docx_rs::{Docx, Paragraph, Run};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Pick a collision-resistant file name for a generated report
pub fn report_filename() -> String {
    format!("estado_arte_{:08x}.docx", rand::random::<u32>())
}

fn heading(text: &str, size: usize) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(size))
}

fn line(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

/// Write the report document to `path`.
///
/// Layout mirrors the JSON response: a metadata block, the entropy
/// score, then the generated review one paragraph per line.
pub fn write_report(
    review: &str,
    metadata: &ArticleMetadata,
    entropy: f64,
    path: &Path,
) -> Result<()> {
    let mut doc = Docx::new().add_paragraph(heading("Estado del Arte", 36));

    let fields = [
        format!("Título del artículo: {}", metadata.title),
        format!("Autores: {}", metadata.authors),
        format!("Revista: {}", metadata.journal),
        format!("Indexado en Scopus: {}", metadata.is_scopus),
        format!("Cuartil SCImago: {}", metadata.quartile),
        format!("País: {}", metadata.country),
        format!("Área temática: {}", metadata.subject_area),
        format!("Categoría temática: {}", metadata.subject_category),
        format!("Entropía del texto generado: {}", entropy),
    ];
    for field in &fields {
        doc = doc.add_paragraph(line(field));
    }

    doc = doc.add_paragraph(line(""));
    doc = doc.add_paragraph(heading("Texto generado", 28));
    for review_line in review.split('\n') {
        doc = doc.add_paragraph(line(review_line));
    }

    let file = File::create(path)?;
    doc.build()
        .pack(file)
        .map_err(|e| SotagenError::Document(format!("Failed to pack docx: {}", e)))?;

    info!(path = %path.display(), "Wrote report document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> ArticleMetadata {
        ArticleMetadata {
            title: "Título de prueba".to_string(),
            authors: "Doe J., Roe J.".to_string(),
            journal: "Cell".to_string(),
            is_scopus: "Sí".to_string(),
            quartile: "Q1".to_string(),
            country: "United States".to_string(),
            subject_area: "Molecular Biology".to_string(),
            subject_category: "Cell Biology (Q1)".to_string(),
        }
    }

    #[test]
    fn test_report_filename_shape() {
        let name = report_filename();
        assert!(name.starts_with("estado_arte_"));
        assert!(name.ends_with(".docx"));
        assert_eq!(name.len(), "estado_arte_".len() + 8 + ".docx".len());
    }

    #[test]
    fn test_write_report_creates_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(report_filename());

        write_report(
            "**Antecedentes del problema**\nTexto generado de prueba.",
            &sample_metadata(),
            3.1415,
            &path,
        )
        .expect("write report");

        let len = std::fs::metadata(&path).expect("metadata").len();
        assert!(len > 0);
    }
}
