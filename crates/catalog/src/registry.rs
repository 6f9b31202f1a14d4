//! Registry of diagram artifacts awaiting persistence.
//!
//! Orchestration produces diagram source; the registry decides what the
//! documentation links to. In [`EmitMode::File`] mode the source is recorded
//! under its output path and the relative path is returned. In
//! [`EmitMode::Inline`] mode nothing is recorded and the embeddable form is
//! returned instead: the PlantUML service URL, or raw Mermaid source.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, error, warn};

use catalog_core::diagram::{DiagramKind, EmitMode};

use crate::{encode, path::OutputPath};

/// A diagram waiting to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    kind: DiagramKind,
    source: String,
    url: Option<String>,
}

impl ArtifactRecord {
    pub(crate) fn new(kind: DiagramKind, source: String, url: Option<String>) -> Self {
        Self { kind, source, url }
    }

    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    /// The diagram source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The PlantUML service URL rendering this diagram, for PlantUML records.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// What the documentation embeds for a diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// An embeddable representation: a service URL or raw diagram source.
    Inline(String),
    /// A path relative to the output directory.
    Registered(String),
}

impl Artifact {
    /// The link or blob text.
    pub fn link(&self) -> &str {
        match self {
            Artifact::Inline(blob) => blob,
            Artifact::Registered(path) => path,
        }
    }
}

/// Records keyed by absolute output path, in first-registration order.
#[derive(Debug, Clone)]
pub struct ArtifactRegistry {
    records: IndexMap<PathBuf, ArtifactRecord>,
    service: String,
}

impl ArtifactRegistry {
    /// Creates an empty registry encoding PlantUML against `service`.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            records: IndexMap::new(),
            service: service.into(),
        }
    }

    /// Turns diagram source into an artifact.
    ///
    /// Re-emitting to a registered path replaces the record; a replacement
    /// with different content is logged. Returns `None` if PlantUML source
    /// cannot be encoded.
    pub fn emit(
        &mut self,
        content: String,
        kind: DiagramKind,
        target: &OutputPath,
        mode: EmitMode,
    ) -> Option<Artifact> {
        let url = match kind {
            DiagramKind::PlantUml => match encode::svg_url(&self.service, &content) {
                Ok(url) => Some(url),
                Err(err) => {
                    error!(path = target.relative(), err:%; "Failed to encode diagram");
                    return None;
                }
            },
            DiagramKind::Mermaid => None,
        };

        if mode == EmitMode::Inline {
            return Some(Artifact::Inline(url.unwrap_or(content)));
        }

        let record = ArtifactRecord::new(kind, content, url);
        let absolute = target.absolute().to_path_buf();
        match self.records.get(&absolute) {
            Some(existing) if existing != &record => {
                warn!(path = target.relative(); "Replacing registered diagram with different content");
            }
            Some(_) => {}
            None => debug!(path = target.relative(), kind:%; "Registered diagram"),
        }
        self.records.insert(absolute, record);

        Some(Artifact::Registered(target.relative().to_string()))
    }

    /// Iterates over the records in first-registration order.
    pub fn records(&self) -> impl Iterator<Item = (&Path, &ArtifactRecord)> {
        self.records.iter().map(|(path, record)| (path.as_path(), record))
    }

    /// Returns the record registered at `path`.
    pub fn get(&self, path: &Path) -> Option<&ArtifactRecord> {
        self.records.get(path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::path::build_path;

    const SERVICE: &str = "https://plantuml.com/plantuml";

    fn target(leaf: &str) -> OutputPath {
        build_path(Path::new("docs"), ["pkg", "App", leaf])
    }

    #[test]
    fn test_file_mode_registers_record() {
        let mut registry = ArtifactRegistry::new(SERVICE);
        let target = target("Foo.svg");

        let artifact = registry
            .emit("@startuml\n@enduml\n".to_string(), DiagramKind::PlantUml, &target, EmitMode::File)
            .unwrap();

        assert_eq!(artifact, Artifact::Registered("pkg/App/Foo.svg".to_string()));
        let record = registry.get(target.absolute()).unwrap();
        assert_eq!(record.kind(), DiagramKind::PlantUml);
        assert!(record.url().unwrap().starts_with("https://plantuml.com/plantuml/svg/~1"));
    }

    #[test]
    fn test_inline_mode_returns_url_without_registering() {
        let mut registry = ArtifactRegistry::new(SERVICE);

        let artifact = registry
            .emit("@startuml\n@enduml\n".to_string(), DiagramKind::PlantUml, &target("Foo.svg"), EmitMode::Inline)
            .unwrap();

        assert!(matches!(artifact, Artifact::Inline(ref url) if url.contains("/svg/~1")));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_mermaid_inline_is_raw_source() {
        let mut registry = ArtifactRegistry::new(SERVICE);
        let source = "classDiagram\n".to_string();

        let artifact = registry
            .emit(source.clone(), DiagramKind::Mermaid, &target("Foo.mmd"), EmitMode::Inline)
            .unwrap();

        assert_eq!(artifact.link(), source);
    }

    #[test]
    fn test_mermaid_file_has_no_url() {
        let mut registry = ArtifactRegistry::new(SERVICE);
        let target = target("Foo.mmd");

        registry.emit("classDiagram\n".to_string(), DiagramKind::Mermaid, &target, EmitMode::File);

        let record = registry.get(target.absolute()).unwrap();
        assert_eq!(record.url(), None);
        assert_eq!(record.source(), "classDiagram\n");
    }

    #[test]
    fn test_last_writer_wins_in_first_order() {
        let mut registry = ArtifactRegistry::new(SERVICE);

        registry.emit("a".to_string(), DiagramKind::Mermaid, &target("A.mmd"), EmitMode::File);
        registry.emit("b".to_string(), DiagramKind::Mermaid, &target("B.mmd"), EmitMode::File);
        registry.emit("c".to_string(), DiagramKind::Mermaid, &target("A.mmd"), EmitMode::File);

        let sources: Vec<_> = registry.records().map(|(_, record)| record.source()).collect();
        assert_eq!(sources, ["c", "b"]);
        assert_eq!(registry.len(), 2);
    }
}
