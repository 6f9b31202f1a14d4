//! Configuration types for Catalog documentation generation.
//!
//! This module provides configuration structures that control where
//! artifacts are written, which diagram dialect is produced, and how
//! registered artifacts are rendered. All types implement
//! [`serde::Deserialize`] for loading from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`OutputConfig`] - Output directory, extensions, emission mode and dialect.
//! - [`PlantUmlConfig`] - The PlantUML service diagrams are encoded against.
//! - [`RenderConfig`] - The backend that turns registered artifacts into files.
//!
//! # Example
//!
//! ```
//! # use catalog::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.output().ext(), ".svg");
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use catalog_core::diagram::{DiagramKind, EmitMode};

use crate::CatalogError;

const DEFAULT_OUTPUT_DIR: &str = "docs";
const DEFAULT_EXT: &str = ".svg";
const DEFAULT_MERMAID_EXT: &str = ".mmd";
const DEFAULT_PLANTUML_SERVICE: &str = "https://plantuml.com/plantuml";
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,

    /// PlantUML service configuration section.
    #[serde(default)]
    plantuml: PlantUmlConfig,

    /// Rendering backend configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(output: OutputConfig, plantuml: PlantUmlConfig, render: RenderConfig) -> Self {
        Self {
            output,
            plantuml,
            render,
        }
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Returns the PlantUML configuration.
    pub fn plantuml(&self) -> &PlantUmlConfig {
        &self.plantuml
    }

    /// Returns the rendering configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Overrides the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output.dir = Some(dir.into());
        self
    }

    /// Overrides the emission mode.
    pub fn with_mode(mut self, mode: EmitMode) -> Self {
        self.output.mode = mode;
        self
    }

    /// Overrides the diagram dialect.
    pub fn with_diagram(mut self, diagram: DiagramKind) -> Self {
        self.output.diagram = diagram;
        self
    }

    /// Overrides the PlantUML service base URL.
    pub fn with_plantuml_service(mut self, service: impl Into<String>) -> Self {
        self.plantuml.service = Some(service.into());
        self
    }

    /// Checks the configuration for systemic mistakes.
    ///
    /// Misconfiguration is the one failure class that halts a generation pass
    /// up front instead of being contained per artifact.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] if the PlantUML service is not a valid
    /// absolute URL, if `max_attempts` is zero, or if the local renderer
    /// command is empty.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.plantuml.service_url()?;

        if self.render.max_attempts == 0 {
            return Err(CatalogError::Config(
                "render.max_attempts must be at least 1".to_string(),
            ));
        }

        if self.render.backend == RenderBackend::Local && self.render.command.is_empty() {
            return Err(CatalogError::Config(
                "render.command must name a converter for the local backend".to_string(),
            ));
        }

        Ok(())
    }
}

/// Where and how artifacts are produced.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Output directory, `docs` if not set.
    #[serde(default)]
    dir: Option<PathBuf>,

    /// Extension of rendered PlantUML artifacts, `.svg` if not set.
    #[serde(default)]
    ext: Option<String>,

    /// Extension of Mermaid artifacts, `.mmd` if not set.
    #[serde(default)]
    mermaid_ext: Option<String>,

    /// Whether artifacts are registered as files or returned inline.
    #[serde(default)]
    mode: EmitMode,

    /// Dialect of generated diagram source.
    #[serde(default)]
    diagram: DiagramKind,
}

impl OutputConfig {
    /// Returns the output directory.
    pub fn dir(&self) -> &Path {
        self.dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR))
    }

    /// Returns the extension for PlantUML artifacts.
    pub fn ext(&self) -> &str {
        self.ext.as_deref().unwrap_or(DEFAULT_EXT)
    }

    /// Returns the extension for Mermaid artifacts.
    pub fn mermaid_ext(&self) -> &str {
        self.mermaid_ext.as_deref().unwrap_or(DEFAULT_MERMAID_EXT)
    }

    /// Returns the extension used for artifacts of `kind`.
    pub fn ext_for(&self, kind: DiagramKind) -> &str {
        match kind {
            DiagramKind::PlantUml => self.ext(),
            DiagramKind::Mermaid => self.mermaid_ext(),
        }
    }

    /// Returns the emission mode.
    pub fn mode(&self) -> EmitMode {
        self.mode
    }

    /// Returns the diagram dialect.
    pub fn diagram(&self) -> DiagramKind {
        self.diagram
    }
}

/// The PlantUML rendering service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlantUmlConfig {
    /// Service base URL, e.g. `https://plantuml.com/plantuml`.
    #[serde(default)]
    service: Option<String>,
}

impl PlantUmlConfig {
    /// Returns the configured service base URL without a trailing slash.
    pub fn service(&self) -> &str {
        self.service
            .as_deref()
            .unwrap_or(DEFAULT_PLANTUML_SERVICE)
            .trim_end_matches('/')
    }

    /// Returns the parsed service URL.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] if the service is not an absolute
    /// `http` or `https` URL.
    pub fn service_url(&self) -> Result<Url, CatalogError> {
        let service = self.service();
        let url = Url::parse(service).map_err(|err| {
            CatalogError::Config(format!("Invalid PlantUML service URL `{service}`: {err}"))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(CatalogError::Config(format!(
                "Unsupported PlantUML service scheme `{scheme}` in `{service}`"
            ))),
        }
    }
}

/// Backend used to persist registered PlantUML artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderBackend {
    /// Fetch the rendered image from the PlantUML service.
    #[default]
    Remote,
    /// Write the diagram source next to the target and run a local converter.
    Local,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    backend: RenderBackend,

    /// Maximum number of fetch attempts per artifact.
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,

    /// Converter command line; the diagram source path is appended.
    #[serde(default = "default_command")]
    command: Vec<String>,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_command() -> Vec<String> {
    ["java", "-Djava.awt.headless=true", "-jar", "plantuml.jar", "-tsvg"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: RenderBackend::default(),
            max_attempts: default_max_attempts(),
            command: default_command(),
        }
    }
}

impl RenderConfig {
    pub fn new(backend: RenderBackend, max_attempts: u32, command: Vec<String>) -> Self {
        Self {
            backend,
            max_attempts,
            command,
        }
    }

    /// Returns the selected backend.
    pub fn backend(&self) -> RenderBackend {
        self.backend
    }

    /// Returns the maximum number of fetch attempts.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the local converter command line.
    pub fn command(&self) -> &[String] {
        &self.command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.output().dir(), Path::new("docs"));
        assert_eq!(config.output().ext_for(DiagramKind::Mermaid), ".mmd");
        assert_eq!(config.output().mode(), EmitMode::File);
        assert_eq!(config.plantuml().service(), "https://plantuml.com/plantuml");
        assert_eq!(config.render().max_attempts(), 5);
        assert_eq!(config.render().command()[0], "java");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = AppConfig::default().with_plantuml_service("http://localhost:8080/");
        assert_eq!(config.plantuml().service(), "http://localhost:8080");
    }

    #[test]
    fn test_invalid_service_fails_validation() {
        let config = AppConfig::default().with_plantuml_service("not a url");
        assert!(matches!(config.validate(), Err(CatalogError::Config(_))));

        let config = AppConfig::default().with_plantuml_service("ftp://example.com");
        assert!(matches!(config.validate(), Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_zero_attempts_fails_validation() {
        let config = AppConfig::new(
            OutputConfig::default(),
            PlantUmlConfig::default(),
            RenderConfig::new(RenderBackend::Remote, 0, default_command()),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_local_command_fails_validation() {
        let config = AppConfig::new(
            OutputConfig::default(),
            PlantUmlConfig::default(),
            RenderConfig::new(RenderBackend::Local, 1, Vec::new()),
        );
        assert!(config.validate().is_err());
    }
}
