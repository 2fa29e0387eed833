//! Estado-del-arte generation prompt.
//!
//! Template for producing a structured state-of-the-art review section
//! from an article's extracted text.

/// Maximum number of characters of article text included in the prompt
pub const MAX_ARTICLE_CHARS: usize = 5000;

/// Prompt template. Placeholder: {article_text}
pub const PROMPT_TEMPLATE: &str = r#"
Redacta un **estado del arte** en estilo académico y científico, siguiendo estas indicaciones:

1. Usa un lenguaje claro, objetivo y formal.
2. Estructura el texto con los siguientes subtítulos en negrita usando Markdown:

**Antecedentes del problema**
(Describe el conocimiento previo sobre el tema, incluyendo enfoques, modelos, teorías o resultados clave que sustentan la investigación.)

**Brechas y vacíos identificados**
(Indica los aspectos que no han sido resueltos por la literatura previa, limitaciones metodológicas o contradicciones teóricas existentes.)

**Proyección y aporte del artículo analizado**
(Explica cómo este trabajo contribuye a cerrar brechas previas, qué propone o innova respecto a investigaciones anteriores, y cuál es su valor dentro del campo académico.)

3. Evita repetir el resumen del artículo. Analiza el contexto y redacta desde una perspectiva crítica y sintética.
4. Si es posible, alude a investigaciones mencionadas en el artículo usando frases como "estudios recientes muestran...", "otros autores han señalado...", "según la literatura...". Pero todo según a las citas o referencias que hace el artículo.

Texto base del artículo:
{article_text}
"#;

/// Build the generation prompt from raw article text.
///
/// Only the first [`MAX_ARTICLE_CHARS`] characters of the article are
/// included; truncation is on a char boundary.
pub fn build_prompt(article_text: &str) -> String {
    let truncated: String = article_text.chars().take(MAX_ARTICLE_CHARS).collect();
    PROMPT_TEMPLATE.replace("{article_text}", &truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_includes_article_text() {
        let prompt = build_prompt("Estudio sobre deslizamientos de tierra.");
        assert!(prompt.contains("Estudio sobre deslizamientos de tierra."));
        assert!(prompt.contains("Antecedentes del problema"));
    }

    #[test]
    fn test_build_prompt_truncates_long_text() {
        let long_text = "palabra ".repeat(2000);
        let prompt = build_prompt(&long_text);
        assert!(prompt.chars().count() < PROMPT_TEMPLATE.chars().count() + MAX_ARTICLE_CHARS);
    }

    #[test]
    fn test_truncation_is_char_safe() {
        // Multibyte chars near the cut must not panic
        let text = "ñ".repeat(MAX_ARTICLE_CHARS + 10);
        let prompt = build_prompt(&text);
        assert!(prompt.contains('ñ'));
    }
}
