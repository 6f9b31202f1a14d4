//! Fully-qualified application names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fully-qualified name of an application.
///
/// Applications may be namespaced, so a name is an ordered list of parts.
/// The graph keys applications by the parts concatenated together (see
/// [`AppName::joined`]).
///
/// # Examples
///
/// ```
/// use catalog_core::name::AppName;
///
/// let name = AppName::new(["Orders", "Api"]);
/// assert_eq!(name.joined(), "OrdersApi");
/// assert_eq!(name.to_string(), "Orders :: Api");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppName(Vec<String>);

impl AppName {
    /// Creates a name from its parts.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Creates a single-part name. An empty string yields an empty name.
    pub fn single(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self::default()
        } else {
            Self(vec![name])
        }
    }

    /// Returns the name parts.
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Returns the first part, if any.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Returns `true` if the name has no parts.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the parts concatenated without a separator.
    ///
    /// This is the key the application is stored under in a
    /// [`Module`](crate::model::Module).
    pub fn joined(&self) -> String {
        self.0.concat()
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" :: "))
    }
}

impl From<&str> for AppName {
    fn from(name: &str) -> Self {
        Self::single(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_empty_is_empty() {
        assert!(AppName::single("").is_empty());
        assert_eq!(AppName::single("").joined(), "");
    }

    #[test]
    fn test_joined_concatenates_parts() {
        let name = AppName::new(["a", "b", "c"]);
        assert_eq!(name.joined(), "abc");
        assert_eq!(name.first(), Some("a"));
    }

    #[test]
    fn test_deserialize_from_list() {
        let name: AppName = serde_json::from_str(r#"["Orders", "Api"]"#).unwrap();
        assert_eq!(name.parts(), ["Orders", "Api"]);
    }
}
