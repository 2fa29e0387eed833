//! Prompt templates for LLM-backed generation.

pub mod estado_arte;
