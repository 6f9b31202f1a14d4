//! The model graph: applications, endpoints, parameters and statements.
//!
//! A [`Module`] maps application names to [`Application`]s. All maps in the
//! graph are ordered by key, so every enumeration of applications, endpoints,
//! types or fields is lexicographic and reproducible across runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    attribute::{Attributed, Attributes},
    name::AppName,
    types::Type,
};

/// Attribute naming the documentation package of an application.
pub const PACKAGE: &str = "package";

/// The root of the model graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub apps: BTreeMap<String, Application>,
}

impl Module {
    /// Creates an empty module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a module from applications, keyed by their joined names.
    pub fn from_apps(apps: impl IntoIterator<Item = Application>) -> Self {
        Self {
            apps: apps
                .into_iter()
                .map(|app| (app.key(), app))
                .collect(),
        }
    }

    /// Returns the application stored under `name`.
    pub fn app(&self, name: &str) -> Option<&Application> {
        self.apps.get(name)
    }

    /// Returns `true` if an application is stored under `name`.
    pub fn contains_app(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    /// Looks up `type_name` in the type table of `app_name`.
    pub fn lookup_type(&self, app_name: &str, type_name: &str) -> Option<&Type> {
        self.apps.get(app_name)?.types.get(type_name)
    }

    /// Package of the lexicographically first application, or `""` for an
    /// empty module.
    pub fn package_name(&self) -> String {
        self.apps
            .values()
            .next()
            .map(Application::package_name)
            .unwrap_or_default()
    }
}

/// An application (service) in the model graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub name: AppName,
    #[serde(default)]
    pub attrs: Attributes,
    #[serde(default)]
    pub endpoints: BTreeMap<String, Endpoint>,
    #[serde(default)]
    pub types: BTreeMap<String, Type>,
}

impl Application {
    /// Creates an application with no endpoints or types.
    pub fn new(name: impl Into<AppName>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a type, returning `self` for chaining.
    pub fn with_type(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.types.insert(name.into(), ty);
        self
    }

    /// Adds an endpoint keyed by its name, returning `self` for chaining.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.insert(endpoint.name.clone(), endpoint);
        self
    }

    /// Adds an attribute, returning `self` for chaining.
    pub fn with_attr(mut self, key: impl Into<String>, value: &str) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// The key this application is stored under in a [`Module`].
    pub fn key(&self) -> String {
        self.name.joined()
    }

    /// The `package` attribute, falling back to the application key.
    pub fn package_name(&self) -> String {
        self.attribute(PACKAGE)
            .map(str::to_string)
            .unwrap_or_else(|| self.key())
    }
}

impl Attributed for Application {
    fn attrs(&self) -> &Attributes {
        &self.attrs
    }
}

/// An endpoint of an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    #[serde(default)]
    pub attrs: Attributes,
    /// Application that owns the endpoint; the fallback scope for
    /// unqualified type names in return statements.
    #[serde(default)]
    pub source: AppName,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub rest_params: Option<RestParams>,
    #[serde(default)]
    pub stmts: Vec<Statement>,
}

impl Endpoint {
    /// Creates an endpoint owned by `source`.
    pub fn new(name: impl Into<String>, source: impl Into<AppName>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    /// Appends a statement, returning `self` for chaining.
    pub fn with_stmt(mut self, stmt: Statement) -> Self {
        self.stmts.push(stmt);
        self
    }

    /// Iterates over the endpoint's return statements.
    pub fn returns(&self) -> impl Iterator<Item = &Statement> {
        self.stmts.iter().filter(|stmt| stmt.return_payload().is_some())
    }
}

impl Attributed for Endpoint {
    fn attrs(&self) -> &Attributes {
        &self.attrs
    }
}

/// REST specific parameters of an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestParams {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url_params: Vec<Param>,
    #[serde(default)]
    pub query_params: Vec<Param>,
}

/// A named, typed parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl Attributed for Param {
    fn attrs(&self) -> &Attributes {
        &self.ty.attrs
    }
}

/// A statement in an endpoint body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// `return <payload>`, where the payload may declare a type after `<:`.
    Return { payload: String },
    /// A call to `endpoint` of the `target` application.
    Call { target: AppName, endpoint: String },
    /// Free text, also used for bare references to other applications.
    Action { action: String },
}

impl Statement {
    pub fn ret(payload: impl Into<String>) -> Self {
        Statement::Return {
            payload: payload.into(),
        }
    }

    pub fn call(target: impl Into<AppName>, endpoint: impl Into<String>) -> Self {
        Statement::Call {
            target: target.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn action(action: impl Into<String>) -> Self {
        Statement::Action {
            action: action.into(),
        }
    }

    /// Returns the return payload, or `None` for non-return statements.
    pub fn return_payload(&self) -> Option<&str> {
        match self {
            Statement::Return { payload } => Some(payload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;

    fn sample() -> Module {
        Module::from_apps([
            Application::new("Orders")
                .with_attr(PACKAGE, "shop")
                .with_type("Order", Type::primitive(Primitive::String)),
            Application::new("Billing"),
        ])
    }

    #[test]
    fn test_lookup_type() {
        let module = sample();

        assert!(module.lookup_type("Orders", "Order").is_some());
        assert!(module.lookup_type("Orders", "Missing").is_none());
        assert!(module.lookup_type("Missing", "Order").is_none());
    }

    #[test]
    fn test_package_name_fallback() {
        let module = sample();

        assert_eq!(module.app("Orders").unwrap().package_name(), "shop");
        assert_eq!(module.app("Billing").unwrap().package_name(), "Billing");
        // Billing sorts before Orders
        assert_eq!(module.package_name(), "Billing");
        assert_eq!(Module::default().package_name(), "");
    }

    #[test]
    fn test_returns_filters_statements() {
        let endpoint = Endpoint::new("Get", "Orders")
            .with_stmt(Statement::call("Billing", "Charge"))
            .with_stmt(Statement::ret("ok <: Order"));

        let returns: Vec<_> = endpoint.returns().collect();
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].return_payload(), Some("ok <: Order"));
    }

    #[test]
    fn test_statement_deserialize() {
        let stmt: Statement =
            serde_json::from_str(r#"{"kind": "call", "target": ["Billing"], "endpoint": "Charge"}"#)
                .unwrap();
        assert_eq!(stmt, Statement::call("Billing", "Charge"));
    }
}
