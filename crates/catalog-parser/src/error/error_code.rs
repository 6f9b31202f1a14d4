//! Error codes for Catalog diagnostics.
//!
//! Codes are grouped by input:
//! - `E1xx` - Type-reference payload errors
//! - `E2xx` - Model document errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Payload Errors (E1xx)
    // =========================================================================
    /// Empty name segment.
    ///
    /// A dotted reference such as `App.` or `.Type` is missing one side.
    E100,

    /// Missing type name.
    ///
    /// The `<:` marker (or the `sequence of` prefix) is not followed by a name.
    E101,

    /// Unexpected trailing input.
    ///
    /// Something other than an attribute block follows the type reference.
    E102,

    // =========================================================================
    // Model Errors (E2xx)
    // =========================================================================
    /// Malformed model document.
    ///
    /// The document is not valid JSON.
    E200,

    /// Invalid model structure.
    ///
    /// The document is valid JSON but does not describe a model graph.
    E201,

    /// Truncated model document.
    ///
    /// The document ended before the model was complete.
    E202,
}

impl ErrorCode {
    /// Short description of the code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "empty name segment",
            ErrorCode::E101 => "missing type name",
            ErrorCode::E102 => "unexpected trailing input",
            ErrorCode::E200 => "malformed model document",
            ErrorCode::E201 => "invalid model structure",
            ErrorCode::E202 => "truncated model document",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug of a fieldless variant is its name, e.g. `E100`
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_code_name() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E202.to_string(), "E202");
    }
}
