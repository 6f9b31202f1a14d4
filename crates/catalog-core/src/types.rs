//! Type definitions for the model graph.
//!
//! A [`Type`] is a [`TypeKind`] plus attributes. Kinds mirror what a service
//! interface can express: primitives, references to named types (possibly in
//! another application), sequences and tuples with named fields.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    attribute::{Attributed, Attributes},
    name::AppName,
};

/// Built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Any,
    Bool,
    Int,
    Float,
    Decimal,
    String,
    Bytes,
    Date,
    Datetime,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Primitive::Any => "any",
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Decimal => "decimal",
            Primitive::String => "string",
            Primitive::Bytes => "bytes",
            Primitive::Date => "date",
            Primitive::Datetime => "datetime",
        };
        f.write_str(name)
    }
}

/// A reference to a named type.
///
/// `app` holds the application name parts and `path` the type path within
/// that application. Either may be empty in references produced by a parser:
/// an empty `app` means "the current application".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    #[serde(default)]
    pub app: AppName,
    #[serde(default)]
    pub path: Vec<String>,
}

impl TypeRef {
    /// Creates a fully-qualified reference to `type_name` in `app_name`.
    pub fn new(app_name: &str, type_name: &str) -> Self {
        Self {
            app: AppName::single(app_name),
            path: vec![type_name.to_string()],
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let app = self.app.joined();
        if app.is_empty() {
            write!(f, "{}", self.path.join("."))
        } else {
            write!(f, "{app}.{}", self.path.join("."))
        }
    }
}

/// The shape of a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Primitive(Primitive),
    TypeRef(TypeRef),
    Sequence(Box<Type>),
    Tuple(BTreeMap<String, Type>),
}

/// A type node in the model graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type {
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attrs: Attributes,
}

impl Type {
    /// Creates a type of the given kind without attributes.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            attrs: Attributes::new(),
        }
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::new(TypeKind::Primitive(primitive))
    }

    pub fn type_ref(app_name: &str, type_name: &str) -> Self {
        Self::new(TypeKind::TypeRef(TypeRef::new(app_name, type_name)))
    }

    pub fn sequence(element: Type) -> Self {
        Self::new(TypeKind::Sequence(Box::new(element)))
    }

    /// Creates a tuple from `(field name, field type)` pairs.
    pub fn tuple<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        Self::new(TypeKind::Tuple(
            fields
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        ))
    }

    /// Returns the tuple fields, or `None` for other kinds.
    pub fn fields(&self) -> Option<&BTreeMap<String, Type>> {
        match &self.kind {
            TypeKind::Tuple(fields) => Some(fields),
            _ => None,
        }
    }

    /// Human readable description of a field type, as shown in diagrams.
    ///
    /// ```
    /// use catalog_core::types::{Primitive, Type};
    ///
    /// let ty = Type::sequence(Type::type_ref("App", "Foo"));
    /// assert_eq!(ty.field_label(), "sequence of App.Foo");
    /// assert_eq!(Type::primitive(Primitive::Int).field_label(), "int");
    /// ```
    pub fn field_label(&self) -> String {
        match &self.kind {
            TypeKind::Primitive(primitive) => primitive.to_string(),
            TypeKind::TypeRef(type_ref) => type_ref.to_string(),
            TypeKind::Sequence(element) => format!("sequence of {}", element.field_label()),
            TypeKind::Tuple(_) => "tuple".to_string(),
        }
    }
}

impl Attributed for Type {
    fn attrs(&self) -> &Attributes {
        &self.attrs
    }
}
