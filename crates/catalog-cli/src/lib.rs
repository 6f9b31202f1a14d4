//! CLI logic for the Catalog documentation tool.
//!
//! This module loads the model and configuration, documents every unit of
//! the model and either persists the registered diagrams or prints their
//! inline links.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, info};

use catalog::{
    Catalog, CatalogError, DocumentedUnit,
    config::AppConfig,
    render::{self, SourceWriter},
};
use catalog_core::diagram::{DiagramKind, EmitMode};

/// Run the Catalog CLI application
///
/// This function loads the model, generates a diagram for every documented
/// unit and writes them below the output directory. In inline mode the
/// embeddable links are printed instead.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CatalogError` for:
/// - File I/O errors
/// - Configuration loading or validation errors
/// - Malformed model input
/// - Diagrams that could not be persisted
pub fn run(args: &Args) -> Result<(), CatalogError> {
    info!(input_path = args.input; "Documenting model");

    let app_config = apply_overrides(config::load_config(args.config.as_ref())?, args);
    app_config.validate()?;

    let source = fs::read_to_string(&args.input)?;
    let module = catalog_parser::parse_module(&source)
        .map_err(|err| CatalogError::new_model_error(err, source))?;

    let mode = app_config.output().mode();
    let mut catalog = Catalog::new(module, app_config);
    if let Some(title) = &args.title {
        catalog = catalog.with_title(title);
    }

    let units = catalog.document_module();

    if mode == EmitMode::Inline {
        print_links(&units);
        return Ok(());
    }

    let plantuml = render::renderer_for(catalog.config().render())?;
    let output_dir = catalog.config().output().dir().display().to_string();
    let registry = catalog.into_registry();

    let written = render::persist(&registry, plantuml.as_ref(), &SourceWriter).into_result()?;

    info!(output_dir, written; "Diagrams exported successfully");

    Ok(())
}

fn apply_overrides(mut config: AppConfig, args: &Args) -> AppConfig {
    if let Some(output) = &args.output {
        config = config.with_output_dir(output);
    }
    if args.inline {
        config = config.with_mode(EmitMode::Inline);
    }
    if args.mermaid {
        config = config.with_diagram(DiagramKind::Mermaid);
    }
    config
}

fn print_links(units: &[DocumentedUnit]) {
    for unit in units {
        match &unit.artifact {
            Some(artifact) => println!("{}\t{}\t{}", unit.app, unit.subject, artifact.link()),
            None => debug!(app = unit.app, subject = unit.subject; "Unit not documented"),
        }
    }
}
