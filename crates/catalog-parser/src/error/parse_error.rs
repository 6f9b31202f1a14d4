//! The ParseError type returned by model loading.

use std::fmt;

use crate::error::Diagnostic;

/// Error type for model loading.
///
/// Wraps one or more diagnostics.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{first}")?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_display_single() {
        let err: ParseError = Diagnostic::error("bad model").with_code(ErrorCode::E200).into();
        assert_eq!(err.to_string(), "error[E200]: bad model");
    }

    #[test]
    fn test_display_multiple() {
        let err = ParseError::new(vec![
            Diagnostic::error("first"),
            Diagnostic::error("second"),
        ]);
        assert_eq!(err.to_string(), "error: first (+1 more)");
    }
}
