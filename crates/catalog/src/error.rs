//! Error types for Catalog operations.
//!
//! This module provides the main error type [`CatalogError`]. Per-artifact
//! failures (unresolvable references, encoding or persistence problems) are
//! logged and contained where they occur; the variants here are the failures
//! that reach the caller of a whole generation pass.

use std::io;

use thiserror::Error;

use catalog_parser::error::ParseError;

use crate::render::RenderError;

/// The main error type for Catalog operations.
///
/// # Diagnostic Variants
///
/// The `Model` variant carries the diagnostics of a failed model load along
/// with the source text, so they can be rendered with snippets.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Model { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl CatalogError {
    /// Create a new `Model` error with the associated source text.
    pub fn new_model_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Model {
            err,
            src: src.into(),
        }
    }
}
