//! Renders a [`CatalogError`] through miette.
//!
//! A model that fails to load is reported once per diagnostic, with a
//! snippet of the model file. Every other failure is a single report
//! carrying a `catalog::*` code and a hint on what to check.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use catalog::CatalogError;
use catalog_parser::{Span, error::Diagnostic};

/// One report printed by the CLI.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A model diagnostic, rendered against the model source.
    Diagnostic { diag: &'a Diagnostic, src: &'a str },
    /// A failure without a source location.
    Error(&'a CatalogError),
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

fn error_code(err: &CatalogError) -> Option<&'static str> {
    match err {
        CatalogError::Io(_) => Some("catalog::io"),
        CatalogError::Config(_) => Some("catalog::config"),
        CatalogError::Render(_) => Some("catalog::render"),
        CatalogError::Model { .. } => None,
    }
}

fn error_help(err: &CatalogError) -> Option<&'static str> {
    match err {
        CatalogError::Io(_) => {
            Some("check that the model file exists and the output directory is writable")
        }
        CatalogError::Config(_) => Some("check the configuration file and command-line overrides"),
        CatalogError::Render(_) => {
            Some("failed diagrams are logged above, rerun with `--log-level debug` for details")
        }
        CatalogError::Model { .. } => None,
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic { diag, .. } => f.write_str(diag.message()),
            Reportable::Error(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic { .. } => None,
            Reportable::Error(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic { diag, .. } => {
                diag.code().map(|c| Box::new(c) as Box<dyn fmt::Display>)
            }
            Reportable::Error(err) => {
                error_code(err).map(|c| Box::new(c) as Box<dyn fmt::Display>)
            }
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic { diag, .. } => {
                diag.help().map(|h| Box::new(h) as Box<dyn fmt::Display>)
            }
            Reportable::Error(err) => {
                error_help(err).map(|h| Box::new(h) as Box<dyn fmt::Display>)
            }
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic { src, .. } => Some(src as &dyn miette::SourceCode),
            Reportable::Error(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Reportable::Diagnostic { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() {
            return None;
        }

        Some(Box::new(diag.labels().iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Splits `err` into the reports to print, one per model diagnostic.
pub fn to_reportables(err: &CatalogError) -> Vec<Reportable<'_>> {
    match err {
        CatalogError::Model { err: parse_err, src } => parse_err
            .diagnostics()
            .iter()
            .map(|diag| Reportable::Diagnostic {
                diag,
                src: src.as_str(),
            })
            .collect(),
        _ => vec![Reportable::Error(err)],
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use catalog::render::RenderError;
    use catalog_parser::{
        error::{ErrorCode, ParseError},
        parse_module,
    };

    use super::*;

    #[test]
    fn test_model_error_per_diagnostic() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E200)
                .with_label(Span::new(0..1), "first"),
            Diagnostic::error("second error")
                .with_label(Span::new(2..3), "second")
                .with_help("help for second"),
        ];
        let err = CatalogError::new_model_error(ParseError::new(diags), "{ } ");

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[0].code().unwrap().to_string(), "E200");
        assert_eq!(reportables[1].help().unwrap().to_string(), "help for second");
    }

    #[test]
    fn test_loader_diagnostics_have_labels() {
        let src = r#"{"apps": "#;
        let err = parse_module(src).unwrap_err();
        let err = CatalogError::new_model_error(err, src);

        let reportables = to_reportables(&err);
        assert!(!reportables.is_empty());
        assert!(reportables[0].labels().is_some());
        assert!(reportables[0].source_code().is_some());
    }

    #[test]
    fn test_error_codes_and_help() {
        let errors = [
            (CatalogError::Config("bad service".to_string()), "catalog::config"),
            (CatalogError::Io(io::Error::other("gone")), "catalog::io"),
            (
                CatalogError::Render(RenderError::Incomplete { failed: 1, total: 3 }),
                "catalog::render",
            ),
        ];

        for (err, code) in &errors {
            let reportables = to_reportables(err);
            assert_eq!(reportables.len(), 1);
            assert!(matches!(reportables[0], Reportable::Error(_)));
            assert_eq!(reportables[0].code().unwrap().to_string(), *code);
            assert!(reportables[0].help().is_some(), "{code} should carry help");
            assert!(reportables[0].labels().is_none());
        }

        assert_eq!(
            to_reportables(&errors[0].0)[0].to_string(),
            "Configuration error: bad service"
        );
    }

    #[test]
    fn test_secondary_labels_are_not_primary() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary")
            .with_secondary_label(Span::new(10..15), "secondary");

        let reportable = Reportable::Diagnostic {
            diag: &diag,
            src: "some source code",
        };

        let labels: Vec<_> = reportable.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert_eq!(labels[1].offset(), 10);
        assert!(!labels[1].primary());
    }
}
