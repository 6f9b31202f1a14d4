//! Diagram source generation.
//!
//! Diagram layout is left to the renderer; this module only writes diagram
//! source text. The model traversal is shared ([`types`] collects the types
//! of a data model, [`flow`] the calls of a sequence or integration view)
//! and each dialect implements [`DiagramSource`] to format the result.

use std::fmt;

use thiserror::Error;

use catalog_core::{diagram::DiagramKind, model::Module};

pub mod flow;
pub mod mermaid;
pub mod plantuml;
pub mod types;

pub use types::{TypeKey, TypeSet};

/// Errors raised while generating diagram source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("application `{0}` not found")]
    MissingApp(String),

    #[error("endpoint `{endpoint}` not found in application `{app}`")]
    MissingEndpoint { app: String, endpoint: String },

    #[error("project `{0}` references no applications")]
    EmptyProject(String),

    #[error("failed to write diagram source: {0}")]
    Format(#[from] fmt::Error),
}

/// A diagram dialect.
pub trait DiagramSource {
    /// The dialect this source generator writes.
    fn kind(&self) -> DiagramKind;

    /// Class diagram of `types`, titled after `app`.
    fn data_model(&self, app: &str, types: &TypeSet) -> Result<String, SourceError>;

    /// Sequence diagram of the calls made by `endpoint` of `app`.
    fn sequence(&self, module: &Module, app: &str, endpoint: &str) -> Result<String, SourceError>;

    /// Integration diagram of the applications listed by the `project`
    /// application. With `epa` set, edges are labeled with endpoints.
    fn integration(
        &self,
        module: &Module,
        project: &str,
        title: &str,
        epa: bool,
    ) -> Result<String, SourceError>;
}

/// Returns the source generator for `kind`.
pub fn source_for(kind: DiagramKind) -> Box<dyn DiagramSource> {
    match kind {
        DiagramKind::PlantUml => Box::new(plantuml::PlantUmlSource),
        DiagramKind::Mermaid => Box::new(mermaid::MermaidSource),
    }
}

/// Identifier safe to use as a node alias in either dialect.
///
/// ASCII alphanumerics are kept, any other character is written as
/// `_<hex>_` and parts are joined with `__`. Distinct parts never share an
/// alias.
pub(crate) fn alias<S: AsRef<str>>(parts: &[S]) -> String {
    let mut id = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            id.push_str("__");
        }
        for c in part.as_ref().chars() {
            if c.is_ascii_alphanumeric() {
                id.push(c);
            } else {
                id.push_str(&format!("_{:x}_", u32::from(c)));
            }
        }
    }
    id
}
