//! Diagram dialects and artifact emission modes.

use std::fmt;

use serde::Deserialize;

/// The dialect of diagram-source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    /// PlantUML source, rendered through a PlantUML service or converter.
    #[default]
    PlantUml,
    /// Mermaid source, kept verbatim for a client-side renderer.
    Mermaid,
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramKind::PlantUml => write!(f, "plantuml"),
            DiagramKind::Mermaid => write!(f, "mermaid"),
        }
    }
}

/// How a diagram is handed back to the documentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitMode {
    /// Register the diagram for later persistence and link to its file.
    #[default]
    File,
    /// Return a representation that can be embedded directly.
    Inline,
}
