//! Persistence of registered diagrams.
//!
//! A [`Renderer`] turns one [`ArtifactRecord`] into a file. PlantUML records
//! are rendered by the configured backend, either fetched from the PlantUML
//! service ([`RemoteRenderer`]) or converted by a local command
//! ([`LocalRenderer`]); Mermaid records are written as source
//! ([`SourceWriter`]). [`persist`] drives a whole registry, containing each
//! failure to its own artifact.

use std::{fs, io, path::Path, path::PathBuf};

use log::{error, info};
use thiserror::Error;

use catalog_core::diagram::DiagramKind;

use crate::{
    config::{RenderBackend, RenderConfig},
    registry::{ArtifactRecord, ArtifactRegistry},
};

mod local;
mod remote;

pub use local::LocalRenderer;
pub use remote::RemoteRenderer;

/// Errors raised while persisting artifacts.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("fetching `{url}` failed after {attempts} attempt(s): {message}")]
    Fetch {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("record for `{}` has no PlantUML URL", path.display())]
    MissingUrl { path: PathBuf },

    #[error("failed to start converter `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("converter `{command}` failed ({status}): {stderr}")]
    Converter {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("converter command is empty")]
    EmptyCommand,

    #[error("{failed} of {total} diagram(s) could not be written")]
    Incomplete { failed: usize, total: usize },
}

impl RenderError {
    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Writes one registered diagram to `target`.
pub trait Renderer {
    /// Persists `record` at `target`. The parent directory exists.
    fn render(&self, target: &Path, record: &ArtifactRecord) -> Result<(), RenderError>;
}

/// Writes the diagram source verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceWriter;

impl Renderer for SourceWriter {
    fn render(&self, target: &Path, record: &ArtifactRecord) -> Result<(), RenderError> {
        fs::write(target, record.source()).map_err(|err| RenderError::write(target, err))
    }
}

/// Returns the PlantUML renderer selected by `config`.
///
/// # Errors
///
/// Returns [`RenderError`] if the backend cannot be set up.
pub fn renderer_for(config: &RenderConfig) -> Result<Box<dyn Renderer>, RenderError> {
    match config.backend() {
        RenderBackend::Remote => Ok(Box::new(RemoteRenderer::new(config.max_attempts())?)),
        RenderBackend::Local => Ok(Box::new(LocalRenderer::new(config.command().to_vec())?)),
    }
}

/// Outcome of a [`persist`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub written: usize,
    pub failed: usize,
}

impl PersistReport {
    /// Returns `true` if no artifact failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Converts a report with failures into [`RenderError::Incomplete`].
    pub fn into_result(self) -> Result<usize, RenderError> {
        if self.is_success() {
            Ok(self.written)
        } else {
            Err(RenderError::Incomplete {
                failed: self.failed,
                total: self.written + self.failed,
            })
        }
    }
}

/// Persists every record of `registry`.
///
/// PlantUML records go to `plantuml`, Mermaid records to `mermaid`. A failed
/// artifact is logged and counted; the pass continues with the next one.
pub fn persist(
    registry: &ArtifactRegistry,
    plantuml: &dyn Renderer,
    mermaid: &dyn Renderer,
) -> PersistReport {
    let mut report = PersistReport::default();

    for (target, record) in registry.records() {
        let renderer = match record.kind() {
            DiagramKind::PlantUml => plantuml,
            DiagramKind::Mermaid => mermaid,
        };

        let result = ensure_parent(target).and_then(|()| renderer.render(target, record));
        match result {
            Ok(()) => {
                info!(path = target.display().to_string(); "Diagram written");
                report.written += 1;
            }
            Err(err) => {
                error!(path = target.display().to_string(), err:%; "Failed to write diagram");
                report.failed += 1;
            }
        }
    }

    report
}

fn ensure_parent(target: &Path) -> Result<(), RenderError> {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|err| RenderError::write(parent, err))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use catalog_core::diagram::EmitMode;

    use crate::path::build_path;

    struct Failing;

    impl Renderer for Failing {
        fn render(&self, target: &Path, _record: &ArtifactRecord) -> Result<(), RenderError> {
            Err(RenderError::MissingUrl {
                path: target.to_path_buf(),
            })
        }
    }

    #[test]
    fn test_persist_writes_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ArtifactRegistry::new("https://plantuml.com/plantuml");

        let mermaid = build_path(dir.path(), ["pkg", "App", "Foo.mmd"]);
        let plantuml = build_path(dir.path(), ["pkg", "App", "Foo.svg"]);
        registry.emit("classDiagram\n".to_string(), DiagramKind::Mermaid, &mermaid, EmitMode::File);
        registry.emit("@startuml\n@enduml\n".to_string(), DiagramKind::PlantUml, &plantuml, EmitMode::File);

        let report = persist(&registry, &Failing, &SourceWriter);

        assert_eq!(report, PersistReport { written: 1, failed: 1 });
        assert!(!report.is_success());
        assert_eq!(fs::read_to_string(mermaid.absolute()).unwrap(), "classDiagram\n");
        assert!(!plantuml.absolute().exists());
        assert!(matches!(
            report.into_result(),
            Err(RenderError::Incomplete { failed: 1, total: 2 })
        ));
    }

    #[test]
    fn test_renderer_for_local_rejects_empty_command() {
        let config = RenderConfig::new(RenderBackend::Local, 1, Vec::new());
        assert!(matches!(renderer_for(&config), Err(RenderError::EmptyCommand)));
    }
}
