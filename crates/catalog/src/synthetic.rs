//! Transient nodes staged into the model graph for a single render.
//!
//! Some diagrams need graph nodes the model does not contain: a sequence
//! return is drawn as a named wrapper type, and an integration view is
//! driven by an aggregate application that references every real one.
//! Staging inserts such a node and hands back a [`Staged`] guard holding the
//! exclusive borrow of the [`Module`]. Dropping the guard removes the node,
//! restoring whatever was stored under its key before.

use std::collections::BTreeMap;

use log::{debug, trace};

use catalog_core::{
    attribute::Attribute,
    model::{Application, Endpoint, Module, Statement},
    name::AppName,
    types::{Type, TypeRef},
};

use crate::resolve::TypeTarget;

/// Key of the aggregate application used by integration views.
pub const PROJECT_APP: &str = "__TEMP__";

/// Suffix appended to an endpoint name to name its sequence return type.
pub const RETURN_SUFFIX: &str = "ReturnVal";

/// Attribute holding the label template of integration nodes.
pub const APP_FORMAT: &str = "appfmt";

const APP_FORMAT_NAME: &str = "%(appname)";

/// Name of the single endpoint of the aggregate application.
pub const PROJECT_ENDPOINT: &str = "_";

/// Field holding the sequence in a synthesized return type.
pub const SEQUENCE_FIELD: &str = "sequence";

#[derive(Debug)]
enum Slot {
    Type {
        app: String,
        name: String,
        previous: Option<Type>,
    },
    App {
        name: String,
        previous: Option<Application>,
    },
}

/// A node staged into a [`Module`], removed when the guard is dropped.
///
/// While the guard lives it owns the only mutable borrow of the module, so
/// no other staging can overlap with it.
#[derive(Debug)]
pub struct Staged<'m> {
    module: &'m mut Module,
    slot: Option<Slot>,
}

impl<'m> Staged<'m> {
    fn unstaged(module: &'m mut Module) -> Self {
        Self { module, slot: None }
    }

    /// The module with the node staged.
    pub fn module(&self) -> &Module {
        self.module
    }

    /// Returns `true` if a node was inserted.
    pub fn is_staged(&self) -> bool {
        self.slot.is_some()
    }

    /// The staged type, or `None` if this guard stages an application or
    /// nothing at all.
    pub fn type_target(&self) -> Option<TypeTarget> {
        match &self.slot {
            Some(Slot::Type { app, name, .. }) => Some(TypeTarget::new(app.as_str(), name.as_str())),
            _ => None,
        }
    }

    /// A reference to the staged type, usable as a field or parameter type.
    pub fn type_ref(&self) -> Option<TypeRef> {
        self.type_target()
            .map(|target| TypeRef::new(target.app(), target.type_name()))
    }
}

impl Drop for Staged<'_> {
    fn drop(&mut self) {
        match self.slot.take() {
            Some(Slot::Type {
                app,
                name,
                previous,
            }) => {
                trace!(app = app.as_str(), name = name.as_str(); "Unstaging synthetic type");
                let Some(owner) = self.module.apps.get_mut(&app) else {
                    return;
                };
                match previous {
                    Some(ty) => {
                        owner.types.insert(name, ty);
                    }
                    None => {
                        owner.types.remove(&name);
                    }
                }
            }
            Some(Slot::App { name, previous }) => {
                trace!(app = name.as_str(); "Unstaging synthetic application");
                match previous {
                    Some(app) => {
                        self.module.apps.insert(name, app);
                    }
                    None => {
                        self.module.apps.remove(&name);
                    }
                }
            }
            None => {}
        }
    }
}

/// Stages `<endpoint>ReturnVal`, a tuple with a single `sequence` field of
/// `sequence of element`, into the endpoint's source application.
///
/// Staging is a no-op when the source application does not exist.
pub fn stage_sequence_return_type<'m>(
    module: &'m mut Module,
    endpoint: &Endpoint,
    element: &TypeTarget,
) -> Staged<'m> {
    let app = endpoint.source.joined();
    let name = format!("{}{RETURN_SUFFIX}", endpoint.name);

    let Some(owner) = module.apps.get_mut(&app) else {
        debug!(
            app = app.as_str(),
            endpoint = endpoint.name.as_str();
            "Source application missing, nothing staged"
        );
        return Staged::unstaged(module);
    };

    let wrapper = Type::tuple([(
        SEQUENCE_FIELD,
        Type::sequence(Type::type_ref(element.app(), element.type_name())),
    )]);
    let previous = owner.types.insert(name.clone(), wrapper);
    trace!(app = app.as_str(), name = name.as_str(); "Staged synthetic return type");

    Staged {
        module,
        slot: Some(Slot::Type {
            app,
            name,
            previous,
        }),
    }
}

/// Stages the aggregate application under [`PROJECT_APP`].
///
/// Its single endpoint holds one bare reference to every application of the
/// module, in name order.
pub fn stage_aggregate_application(module: &mut Module) -> Staged<'_> {
    let stmts: Vec<Statement> = module
        .apps
        .keys()
        .filter(|key| key.as_str() != PROJECT_APP)
        .map(|key| Statement::action(key.as_str()))
        .collect();

    let mut endpoint = Endpoint::new(PROJECT_ENDPOINT, AppName::single(PROJECT_APP));
    endpoint.stmts = stmts;

    let aggregate = Application {
        name: AppName::single(PROJECT_APP),
        attrs: BTreeMap::from([(
            APP_FORMAT.to_string(),
            Attribute::Text(APP_FORMAT_NAME.to_string()),
        )]),
        endpoints: BTreeMap::from([(endpoint.name.clone(), endpoint)]),
        types: BTreeMap::new(),
    };

    let previous = module.apps.insert(PROJECT_APP.to_string(), aggregate);
    trace!(app = PROJECT_APP; "Staged aggregate application");

    Staged {
        module,
        slot: Some(Slot::App {
            name: PROJECT_APP.to_string(),
            previous,
        }),
    }
}
