//! # sotagen
//!
//! Estado del Arte Literature Review Generator - Rust Microservice
//!
//! ## Modules
//!
//! - [`pdf`] - PDF text extraction
//! - [`doi`] - DOI extraction from raw document text
//! - [`llm`] - Estado-del-arte generation via an OpenAI-compatible API
//! - [`entropy`] - Lexical-diversity (Shannon entropy) scoring
//! - [`scimago`] - SCImago journal-rankings table
//! - [`elsevier`] - Elsevier metadata client (primary provider)
//! - [`crossref`] - Crossref metadata client (secondary provider)
//! - [`resolver`] - Tiered bibliographic resolution
//! - [`pipeline`] - Per-request orchestration
//! - [`docx`] - Word-document report sink
//! - [`error`] - Custom error types

pub mod crossref;
pub mod docx;
pub mod doi;
pub mod elsevier;
pub mod entropy;
pub mod error;
pub mod llm;
pub mod pdf;
pub mod pipeline;
pub mod prompts;
pub mod resolver;
pub mod scimago;

pub use error::{Result, SotagenError};
