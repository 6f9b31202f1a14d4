//! Type sets drawn by data model diagrams.

use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use catalog_core::{
    model::Module,
    types::{Type, TypeKind, TypeRef},
};

use crate::resolve::TypeTarget;

/// A type identified by its owning application and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub app: String,
    pub name: String,
}

impl TypeKey {
    pub fn new(app: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            name: name.into(),
        }
    }
}

impl From<&TypeTarget> for TypeKey {
    fn from(target: &TypeTarget) -> Self {
        Self::new(target.app(), target.type_name())
    }
}

/// Types of a diagram, ordered by application then name.
pub type TypeSet = BTreeMap<TypeKey, Type>;

/// A set holding only `ty`, stored under `app` and `name`.
pub fn single(app: &str, name: &str, ty: Type) -> TypeSet {
    TypeSet::from([(TypeKey::new(app, name), ty)])
}

/// All types of `app` in `module`.
pub fn app_types(module: &Module, app: &str) -> TypeSet {
    module
        .app(app)
        .map(|application| {
            application
                .types
                .iter()
                .map(|(name, ty)| (TypeKey::new(app, name.as_str()), ty.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// `root` and every type reachable from it through field references.
///
/// References to types missing from `module` are skipped. Reference cycles
/// terminate since every type is visited once.
pub fn related_types(module: &Module, root: &TypeTarget) -> TypeSet {
    let mut types = TypeSet::new();
    let mut visited = BTreeSet::new();
    let mut pending = vec![TypeKey::from(root)];

    while let Some(key) = pending.pop() {
        if !visited.insert(key.clone()) {
            continue;
        }
        let Some(ty) = module.lookup_type(&key.app, &key.name) else {
            trace!(app = key.app.as_str(), name = key.name.as_str(); "Skipping unknown type");
            continue;
        };
        pending.extend(references(&key.app, ty));
        types.insert(key, ty.clone());
    }

    types
}

/// Named types referenced by `ty`, an unqualified reference being scoped
/// to `app`.
pub fn references(app: &str, ty: &Type) -> Vec<TypeKey> {
    let mut keys = Vec::new();
    collect_references(app, ty, &mut keys);
    keys
}

fn collect_references(app: &str, ty: &Type, keys: &mut Vec<TypeKey>) {
    match &ty.kind {
        TypeKind::Primitive(_) => {}
        TypeKind::TypeRef(type_ref) => keys.extend(reference_key(app, type_ref)),
        TypeKind::Sequence(element) => collect_references(app, element, keys),
        TypeKind::Tuple(fields) => {
            for field in fields.values() {
                collect_references(app, field, keys);
            }
        }
    }
}

fn reference_key(app: &str, type_ref: &TypeRef) -> Option<TypeKey> {
    match (type_ref.app.first(), type_ref.path.first()) {
        (Some(owner), Some(name)) => Some(TypeKey::new(owner, name.as_str())),
        (Some(name), None) => Some(TypeKey::new(app, name)),
        (None, Some(name)) => Some(TypeKey::new(app, name.as_str())),
        (None, None) => None,
    }
}
