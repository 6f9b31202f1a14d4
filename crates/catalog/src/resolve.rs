//! Type reference resolution.
//!
//! Types are referenced from two places: the payload of a return statement
//! (`ok <: sequence of Orders.Order`) and the structured type of an endpoint
//! parameter. Both forms may omit the application, in which case the
//! reference is scoped to a fallback application. Resolution turns either
//! form into a fully-qualified [`TypeTarget`].
//!
//! Resolution fails softly. A reference that cannot be resolved yields
//! `None`; callers treat that as "nothing to document".

use log::{debug, warn};

use catalog_core::{
    model::{Endpoint, Module, Param, Statement},
    name::AppName,
    types::{Primitive, Type, TypeKind},
};
use catalog_parser::parse_return_payload;

/// A fully-qualified reference to a named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTarget {
    app: String,
    type_name: String,
}

impl TypeTarget {
    pub fn new(app: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            type_name: type_name.into(),
        }
    }

    /// Key of the application owning the type.
    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Looks the target up in `module`.
    pub fn lookup<'m>(&self, module: &'m Module) -> Option<&'m Type> {
        module.lookup_type(&self.app, &self.type_name)
    }
}

/// The resolved type of a return statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTarget {
    target: TypeTarget,
    sequence: bool,
}

impl ReturnTarget {
    pub fn target(&self) -> &TypeTarget {
        &self.target
    }

    /// `true` if the statement returns a sequence of the target type.
    pub fn is_sequence(&self) -> bool {
        self.sequence
    }
}

/// The resolved type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamTarget {
    /// A primitive parameter, named after the parameter itself.
    Primitive { name: String, primitive: Primitive },
    /// A reference to a named type.
    Named(TypeTarget),
}

/// Resolves a return statement payload.
///
/// An unqualified type name is scoped to `fallback`, the joined name of the
/// endpoint's source application.
///
/// ```
/// use catalog::resolve::resolve_return_payload;
/// use catalog_core::name::AppName;
///
/// let fallback = AppName::single("OrdersApp");
/// let bare = resolve_return_payload("ok <: Type", &fallback).unwrap();
/// let qualified = resolve_return_payload("ok <: OrdersApp.Type", &fallback).unwrap();
/// assert_eq!(bare, qualified);
/// ```
pub fn resolve_return_payload(payload: &str, fallback: &AppName) -> Option<ReturnTarget> {
    let declared = match parse_return_payload(payload) {
        Ok(Some(declared)) => declared,
        Ok(None) => return None,
        Err(diagnostic) => {
            warn!(payload, diagnostic:%; "Ignoring malformed return payload");
            return None;
        }
    };

    let app = match declared.app() {
        Some(app) => app.to_string(),
        None => fallback.joined(),
    };

    Some(ReturnTarget {
        target: TypeTarget::new(app, declared.type_name()),
        sequence: declared.is_sequence(),
    })
}

/// Resolves the type returned by `stmt` of `endpoint`.
///
/// Returns `None` for statements other than returns.
pub fn resolve_return(endpoint: &Endpoint, stmt: &Statement) -> Option<ReturnTarget> {
    let payload = stmt.return_payload()?;
    resolve_return_payload(payload, &endpoint.source)
}

/// Resolves the type of `param`, scoping unqualified references to
/// `current_app`.
///
/// Tuple and sequence literals, and references with neither an application
/// nor a path, do not resolve.
pub fn resolve_param(current_app: &str, param: &Param) -> Option<ParamTarget> {
    let type_ref = match &param.ty.kind {
        TypeKind::Primitive(primitive) => {
            return Some(ParamTarget::Primitive {
                name: param.name.clone(),
                primitive: *primitive,
            });
        }
        TypeKind::TypeRef(type_ref) => type_ref,
        TypeKind::Sequence(_) | TypeKind::Tuple(_) => {
            debug!(param = param.name.as_str(); "Parameter type is not a reference");
            return None;
        }
    };

    let target = match (type_ref.app.first(), type_ref.path.first()) {
        (Some(app), Some(type_name)) => TypeTarget::new(app, type_name.as_str()),
        // A single-segment reference may be parsed as an application name
        (Some(type_name), None) => TypeTarget::new(current_app, type_name),
        (None, Some(type_name)) => TypeTarget::new(current_app, type_name.as_str()),
        (None, None) => {
            debug!(param = param.name.as_str(); "Parameter references nothing");
            return None;
        }
    };

    Some(ParamTarget::Named(target))
}

/// Looks up the type of `param` in `module`.
///
/// A primitive parameter is its own type.
pub fn param_type<'a>(module: &'a Module, current_app: &str, param: &'a Param) -> Option<&'a Type> {
    match resolve_param(current_app, param)? {
        ParamTarget::Primitive { .. } => Some(&param.ty),
        ParamTarget::Named(target) => target.lookup(module),
    }
}

/// Looks up the type returned by `stmt` of `endpoint` in `module`.
///
/// For a sequence return this is the element type.
pub fn return_type<'m>(module: &'m Module, endpoint: &Endpoint, stmt: &Statement) -> Option<&'m Type> {
    resolve_return(endpoint, stmt)?.target().lookup(module)
}
