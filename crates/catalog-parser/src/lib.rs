//! # Catalog Parser
//!
//! Input handling for the Catalog documentation generator:
//!
//! - [`parse_module`] loads a model graph from its JSON form.
//! - [`parse_return_payload`] parses the type declared by a return statement
//!   (`ok <: sequence of App.Type`) into a [`ReturnType`].
//!
//! Both report problems as [`error::Diagnostic`]s carrying source spans.
//!
//! ## Usage
//!
//! ```
//! # use catalog_parser::{parse_module, parse_return_payload, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let module = parse_module(r#"{"apps": {}}"#)?;
//!     assert!(module.apps.is_empty());
//!
//!     let ret = parse_return_payload("ok <: App.Foo")?.expect("declares a type");
//!     assert_eq!(ret.type_name(), "Foo");
//!     Ok(())
//! }
//! ```

pub mod error;

mod model;
mod payload;
mod span;

pub use model::parse_module;
pub use payload::{ReturnType, parse_return_payload};
pub use span::Span;
