//! # Catalog
//!
//! Catalog generates diagram artifacts for service documentation. Given a
//! model graph of applications, endpoints and types it resolves the type
//! references of parameters and return statements, stages the synthetic
//! graph nodes some diagrams need, generates PlantUML or Mermaid source and
//! registers the resulting artifacts for persistence.
//!
//! ## Usage
//!
//! ```
//! use catalog::{Catalog, config::AppConfig};
//! use catalog_core::{
//!     model::{Application, Module},
//!     types::{Primitive, Type},
//! };
//!
//! let module = Module::from_apps([Application::new("App")
//!     .with_type("Foo", Type::tuple([("id", Type::primitive(Primitive::String))]))]);
//!
//! let mut catalog = Catalog::new(module, AppConfig::default());
//! let artifact = catalog.create_type_diagram("App", "Foo", true).unwrap();
//! assert_eq!(artifact.link(), "App/App/Foo.svg");
//! ```
//!
//! Registered artifacts are written with [`render::persist`].

mod catalog;
mod encode;
mod error;

pub mod config;
pub mod path;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod source;
pub mod synthetic;

pub use catalog::{Catalog, DB_PATTERN, DocumentedUnit, IGNORE_PATTERN, UnitKind};
pub use encode::{EncodeError, encode as encode_plantuml, svg_url};
pub use error::CatalogError;
pub use registry::{Artifact, ArtifactRecord, ArtifactRegistry};
