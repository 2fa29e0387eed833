//! sotagen - Estado del Arte Literature Review Generator
//!
//! A Rust microservice that turns an uploaded scientific-article PDF into
//! a generated "estado del arte" review, resolved bibliographic metadata
//! (Elsevier with Crossref fallback, SCImago enrichment), a lexical
//! entropy score and a downloadable Word report.
//!
//! ## Usage
//!
//! ### CLI Mode
//! ```bash
//! sotagen analyze paper.pdf
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! sotagen serve --port 5000
//! ```

use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path as AxumPath, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sotagen::llm::{ReviewClient, ReviewConfig};
use sotagen::pipeline::AnalysisResult;
use sotagen::resolver::BibliographicResolver;
use sotagen::scimago::ScimagoTable;
use sotagen::{crossref::CrossrefClient, docx, elsevier::ElsevierClient, pdf, pipeline};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Upload size cap for PDF files (bytes)
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// ============================================================================
// CLI Definition
// ============================================================================

/// Estado del Arte Literature Review Generator - Rust Microservice
#[derive(Parser)]
#[command(name = "sotagen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Configuration shared by server and CLI analysis
#[derive(Args, Clone)]
struct ServiceArgs {
    /// OpenAI-compatible API key for review generation
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "LLM_BASE_URL", default_value = "https://api.openai.com/v1")]
    llm_base_url: String,

    /// LLM model used for review generation
    #[arg(long, env = "LLM_MODEL", default_value = "gpt-3.5-turbo")]
    llm_model: String,

    /// Elsevier API key (primary metadata tier; omit to start at Crossref)
    #[arg(long, env = "ELSEVIER_API_KEY", hide_env_values = true)]
    elsevier_key: Option<String>,

    /// Path to the SCImago rankings CSV (semicolon-delimited)
    #[arg(long, env = "SCIMAGO_CSV", default_value = "scimago.csv")]
    scimago_csv: PathBuf,

    /// Directory for uploaded PDFs and generated reports
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    upload_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (default: any)
        #[arg(long, env = "CORS_ORIGIN")]
        cors_origin: Option<String>,

        /// Public base URL used in download links (default: relative links)
        #[arg(long, env = "PUBLIC_BASE_URL")]
        public_base_url: Option<String>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Analyze a local PDF and print the result as JSON
    Analyze {
        /// Path to the PDF file
        pdf: PathBuf,

        /// Also write the Word report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        service: ServiceArgs,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            cors_origin,
            public_base_url,
            service,
        } => run_server(host, port, cors_origin, public_base_url, service).await,
        Commands::Analyze {
            pdf,
            output,
            service,
        } => run_analyze(pdf, output, service).await,
    }
}

// ============================================================================
// Shared Service Construction
// ============================================================================

struct AppState {
    review: ReviewClient,
    resolver: BibliographicResolver,
    upload_dir: PathBuf,
    public_base_url: Option<String>,
}

fn build_state(service: &ServiceArgs, public_base_url: Option<String>) -> Result<AppState> {
    let scimago = ScimagoTable::load(&service.scimago_csv).with_context(|| {
        format!(
            "Failed to load SCImago table from {}",
            service.scimago_csv.display()
        )
    })?;
    if scimago.is_empty() {
        anyhow::bail!(
            "SCImago table {} contained no usable rows",
            service.scimago_csv.display()
        );
    }

    let elsevier = service
        .elsevier_key
        .clone()
        .map(ElsevierClient::new)
        .transpose()
        .context("Failed to build Elsevier client")?;

    let crossref = CrossrefClient::new().context("Failed to build Crossref client")?;

    let resolver = BibliographicResolver::new(elsevier, crossref, Arc::new(scimago));

    let review = ReviewClient::new(ReviewConfig {
        base_url: service.llm_base_url.clone(),
        api_key: service.openai_key.clone(),
        model: service.llm_model.clone(),
    })
    .context("Failed to build review client")?;

    std::fs::create_dir_all(&service.upload_dir).with_context(|| {
        format!(
            "Failed to create upload directory {}",
            service.upload_dir.display()
        )
    })?;

    Ok(AppState {
        review,
        resolver,
        upload_dir: service.upload_dir.clone(),
        public_base_url,
    })
}

// ============================================================================
// CLI Analysis
// ============================================================================

async fn run_analyze(pdf: PathBuf, output: Option<PathBuf>, service: ServiceArgs) -> Result<()> {
    let state = build_state(&service, None)?;

    let text = pdf::extract_text_from_file(&pdf)
        .with_context(|| format!("Failed to extract text from {}", pdf.display()))?;

    println!("Extracted {} characters, generating review...", text.len());
    let review = state
        .review
        .generate(&text)
        .await
        .context("Review generation failed")?;

    let result = pipeline::run(&state.resolver, &text, review).await;

    if let Some(output_path) = output {
        docx::write_report(
            &result.estado_del_arte,
            &result.metadata,
            result.entropia_estado_del_arte,
            &output_path,
        )
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
        println!("Report written to {}", output_path.display());
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

// ============================================================================
// HTTP Server
// ============================================================================

async fn run_server(
    host: String,
    port: u16,
    cors_origin: Option<String>,
    public_base_url: Option<String>,
    service: ServiceArgs,
) -> Result<()> {
    info!(host = %host, port = port, "Starting HTTP server");

    let state = Arc::new(build_state(&service, public_base_url)?);

    let cors = match cors_origin {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .context("Invalid --cors-origin header value")?;
            CorsLayer::new().allow_origin(origin).allow_methods(Any)
        }
        None => CorsLayer::permissive(),
    };

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/upload_pdf", post(upload_pdf_handler))
        .route("/download/{filename}", get(download_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Upload response: flattened analysis result plus the report link
#[derive(Debug, Serialize)]
struct UploadResponse {
    #[serde(flatten)]
    result: AnalysisResult,
    word_download_url: String,
}

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

fn error_response(status: StatusCode, message: &str) -> ErrorResponse {
    (status, Json(serde_json::json!({ "error": message })))
}

/// PDF upload and analysis endpoint
async fn upload_pdf_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ErrorResponse> {
    let mut filename = String::new();
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            &format!("Error leyendo el formulario: {}", e),
        )
    })? {
        if field.name() == Some("file") {
            filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(|e| {
                error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("No se pudo leer el archivo: {}", e),
                )
            })?;
            file_data = Some(bytes.to_vec());
        }
    }

    let file_bytes = file_data.ok_or_else(|| {
        error_response(StatusCode::BAD_REQUEST, "No se ha enviado ningún archivo")
    })?;

    if !is_allowed_pdf(&filename) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Archivo inválido. Solo se permiten PDFs.",
        ));
    }

    // Keep a copy of the upload next to the generated report
    let stored_name = sanitize_filename(&filename);
    let stored_path = state.upload_dir.join(&stored_name);
    tokio::fs::write(&stored_path, &file_bytes).await.map_err(|e| {
        error!(error = %e, "Failed to store upload");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "No se pudo guardar el archivo.",
        )
    })?;

    // Text extraction is CPU-bound, keep it off the async workers
    let text = tokio::task::spawn_blocking(move || pdf::extract_text(&file_bytes))
        .await
        .map_err(|e| {
            error!(error = %e, "PDF extraction task panicked");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Fallo interno extrayendo el texto.",
            )
        })?
        .map_err(|_| {
            error_response(
                StatusCode::BAD_REQUEST,
                "No se pudo extraer texto del PDF.",
            )
        })?;

    let review = state.review.generate(&text).await.map_err(|e| {
        error!(error = %e, "Review generation failed");
        error_response(
            StatusCode::BAD_GATEWAY,
            "No se pudo generar el estado del arte.",
        )
    })?;

    let result = pipeline::run(&state.resolver, &text, review).await;

    let report_name = docx::report_filename();
    let report_path = state.upload_dir.join(&report_name);
    docx::write_report(
        &result.estado_del_arte,
        &result.metadata,
        result.entropia_estado_del_arte,
        &report_path,
    )
    .map_err(|e| {
        error!(error = %e, "Failed to write report document");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "No se pudo generar el documento Word.",
        )
    })?;

    let word_download_url = match &state.public_base_url {
        Some(base) => format!("{}/download/{}", base.trim_end_matches('/'), report_name),
        None => format!("/download/{}", report_name),
    };

    Ok(Json(UploadResponse {
        result,
        word_download_url,
    }))
}

/// Report download endpoint
async fn download_handler(
    State(state): State<Arc<AppState>>,
    AxumPath(filename): AxumPath<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Nombre de archivo inválido.",
        ));
    }

    let path = state.upload_dir.join(&filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| error_response(StatusCode::NOT_FOUND, "Archivo no encontrado."))?;

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((headers, bytes))
}

// ============================================================================
// Helpers
// ============================================================================

/// Only PDF uploads are accepted
fn is_allowed_pdf(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Reduce a client-supplied filename to a safe bare name
fn sanitize_filename(filename: &str) -> String {
    let bare = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = bare
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches(['.', '_']).is_empty() {
        "upload.pdf".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_allowed_pdf() {
        assert!(is_allowed_pdf("paper.pdf"));
        assert!(is_allowed_pdf("paper.PDF"));
        assert!(!is_allowed_pdf("paper.docx"));
        assert!(!is_allowed_pdf("paper"));
        assert!(!is_allowed_pdf(".pdf"));
        assert!(!is_allowed_pdf(""));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("paper.pdf"), "paper.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("mi artículo.pdf"), "mi_art_culo.pdf");
        assert_eq!(sanitize_filename("..."), "upload.pdf");
        assert_eq!(sanitize_filename(""), "upload.pdf");
    }
}
