//! Grammar for the type declared by a return statement.
//!
//! A return payload names an optional status label, then the `<:` marker and
//! the declared type:
//!
//! ```text
//! payload   := label? "<:" ws* prefix? reference ws* attrs? ws*
//! prefix    := "sequence" ws+ "of" ws+
//! reference := segment ("." segment)*
//! segment   := (any but "." "[" "]")+
//! attrs     := "[" (any but "]")* "]"
//! ```
//!
//! The first segment of a dotted reference is the application name and the
//! second the type name; a bare segment is a type name in the current
//! application. Segments may contain inner spaces (`Payment Service.Invoice`)
//! and are trimmed. The public entry point is [`parse_return_payload`].

use log::trace;
use winnow::{
    Parser as _,
    ascii::{multispace0, multispace1},
    combinator::{alt, delimited, eof, opt, peek, separated, terminated},
    error::ModalResult,
    token::{take_till, take_until, take_while},
};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

type Input<'src> = &'src str;
type IResult<O> = ModalResult<O>;

/// The type declared by a return statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnType {
    sequence: bool,
    app: Option<String>,
    type_name: String,
}

impl ReturnType {
    /// Create a return type directly.
    pub fn new(app: Option<&str>, type_name: &str, sequence: bool) -> Self {
        Self {
            sequence,
            app: app.map(str::to_string),
            type_name: type_name.to_string(),
        }
    }

    /// `true` if the payload was declared as `sequence of ...`.
    pub fn is_sequence(&self) -> bool {
        self.sequence
    }

    /// The application qualifier, if the reference was dotted.
    pub fn app(&self) -> Option<&str> {
        self.app.as_deref()
    }

    /// The referenced type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// Everything up to and including the `<:` marker.
fn marker(input: &mut Input<'_>) -> IResult<()> {
    terminated(take_until(0.., "<:"), "<:")
        .void()
        .parse_next(input)
}

/// `sequence of` followed by whitespace or the end of input
fn sequence_prefix(input: &mut Input<'_>) -> IResult<()> {
    (
        "sequence",
        multispace1,
        "of",
        peek(alt((multispace1.void(), eof.void()))),
    )
        .void()
        .parse_next(input)
}

/// A name up to the next `.` or attribute block, blank names rejected
fn segment<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., |c: char| !matches!(c, '.' | '[' | ']'))
        .verify(|name: &str| !name.trim().is_empty())
        .map(str::trim)
        .parse_next(input)
}

fn reference<'src>(input: &mut Input<'src>) -> IResult<Vec<&'src str>> {
    separated(1.., segment, '.').parse_next(input)
}

fn attribute_block<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    delimited('[', take_till(0.., ']'), ']').parse_next(input)
}

fn skip_ws(input: &mut Input<'_>) {
    let _: IResult<&str> = multispace0.parse_next(input);
}

/// Parse the type declared by a return statement payload.
///
/// Returns `Ok(None)` when the payload declares no type (there is no `<:`
/// marker), which callers treat as "nothing to render".
///
/// # Errors
///
/// Returns a [`Diagnostic`] when a declared type is malformed: a missing
/// name, an empty dotted segment, or unexpected trailing input.
///
/// # Examples
///
/// ```
/// use catalog_parser::parse_return_payload;
///
/// let ret = parse_return_payload("ok <: sequence of Orders.Order")
///     .unwrap()
///     .unwrap();
/// assert!(ret.is_sequence());
/// assert_eq!(ret.app(), Some("Orders"));
/// assert_eq!(ret.type_name(), "Order");
///
/// assert!(parse_return_payload("ok").unwrap().is_none());
/// ```
pub fn parse_return_payload(payload: &str) -> Result<Option<ReturnType>, Diagnostic> {
    let offset = |rest: &str| payload.len() - rest.len();
    let mut input: Input<'_> = payload;

    if marker.parse_next(&mut input).is_err() {
        trace!(payload; "Return payload declares no type");
        return Ok(None);
    }
    let marker_span = Span::new(offset(input) - 2..offset(input));

    skip_ws(&mut input);
    let sequence = matches!(opt(sequence_prefix).parse_next(&mut input), Ok(Some(())));
    skip_ws(&mut input);

    if input.is_empty() || input.starts_with('[') {
        let message = if sequence {
            "expected a type after `sequence of`"
        } else {
            "expected a type after `<:`"
        };
        let at = offset(input);
        return Err(Diagnostic::error("missing type name in return payload")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(at..at), message)
            .with_secondary_label(marker_span, "type declared here"));
    }

    if input.starts_with('.') {
        let at = offset(input);
        return Err(empty_segment(at, "expected a name before `.`"));
    }

    let segments = reference
        .parse_next(&mut input)
        .map_err(|_| empty_segment(offset(input), "expected a name"))?;

    if input.starts_with('.') {
        let at = offset(input);
        return Err(empty_segment(at, "expected a name after `.`"));
    }

    skip_ws(&mut input);
    if input.starts_with('[') {
        let start = offset(input);
        attribute_block.parse_next(&mut input).map_err(|_| {
            Diagnostic::error("unterminated attribute block in return payload")
                .with_code(ErrorCode::E102)
                .with_label(Span::new(start..payload.len()), "missing `]`")
        })?;
        skip_ws(&mut input);
    }

    if !input.is_empty() {
        let start = offset(input);
        return Err(Diagnostic::error("unexpected input after return type")
            .with_code(ErrorCode::E102)
            .with_label(Span::new(start..payload.len()), "not part of the type reference")
            .with_help("a return type is `App.Type`, optionally prefixed by `sequence of`"));
    }

    let (app, type_name) = match segments.as_slice() {
        [type_name] => (None, *type_name),
        [app, type_name, rest @ ..] => {
            if !rest.is_empty() {
                trace!(payload, ignored:? = rest; "Ignoring nested reference segments");
            }
            (Some(app.to_string()), *type_name)
        }
        [] => unreachable!("separated(1..) yields at least one segment"),
    };

    Ok(Some(ReturnType {
        sequence,
        app,
        type_name: type_name.to_string(),
    }))
}

fn empty_segment(at: usize, message: &str) -> Diagnostic {
    Diagnostic::error("empty name segment in type reference")
        .with_code(ErrorCode::E100)
        .with_label(Span::new(at..at + 1), message)
        .with_help("write the reference as `App.Type` or `Type`")
}
