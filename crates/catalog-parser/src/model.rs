//! Loading a model graph from its JSON form.

use log::debug;
use serde_json::error::Category;

use catalog_core::model::Module;

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::Span,
};

/// Parse a JSON document into a [`Module`].
///
/// # Errors
///
/// Returns a [`ParseError`] with a single diagnostic pointing at the location
/// serde reported.
///
/// # Examples
///
/// ```
/// use catalog_parser::parse_module;
///
/// let module = parse_module(r#"{"apps": {"App": {"name": ["App"]}}}"#).unwrap();
/// assert!(module.contains_app("App"));
/// ```
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    let module: Module = serde_json::from_str(source).map_err(|err| to_diagnostic(&err, source))?;
    debug!(apps_count = module.apps.len(); "Model loaded");
    Ok(module)
}

fn to_diagnostic(err: &serde_json::Error, source: &str) -> Diagnostic {
    let code = match err.classify() {
        Category::Data => ErrorCode::E201,
        Category::Eof => ErrorCode::E202,
        Category::Syntax | Category::Io => ErrorCode::E200,
    };

    let offset = byte_offset(source, err.line(), err.column());
    let span = if offset < source.len() {
        Span::new(offset..offset + 1)
    } else {
        Span::new(source.len().saturating_sub(1)..source.len())
    };

    // serde appends " at line L column C", which the label already conveys
    let message = err.to_string();
    let message = message
        .rsplit_once(" at line ")
        .map_or(message.as_str(), |(head, _)| head);

    Diagnostic::error(format!("{}: {message}", code.description()))
        .with_code(code)
        .with_label(span, message.to_string())
}

/// Convert serde's 1-based line and column into a byte offset.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}
