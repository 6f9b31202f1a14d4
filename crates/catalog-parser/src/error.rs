//! Diagnostics for model loading and type-reference parsing.
//!
//! The error system is built around [`Diagnostic`]: a message with an optional
//! [`ErrorCode`], labeled source spans and help text. Model loading wraps its
//! diagnostics in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use catalog_parser::error::{Diagnostic, ErrorCode};
//! # use catalog_parser::Span;
//!
//! let diag = Diagnostic::error("empty name segment in type reference")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(4..5), "expected a name before `.`")
//!     .with_help("write the reference as `App.Type`");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
