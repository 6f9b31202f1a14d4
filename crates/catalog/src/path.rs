//! Output path construction.
//!
//! Diagram artifacts are stored at `<base>/<component>/.../<leaf>`, where each
//! component is a package, application or file name taken from the model.
//! Model names may contain spaces and slashes, so every component is
//! sanitized before it becomes a path segment.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Removes characters that may not appear in a path segment.
///
/// ```
/// use catalog::path::sanitize;
///
/// assert_eq!(sanitize("Orders Api/v1"), "OrdersApiv1");
/// assert_eq!(sanitize(&sanitize("a b")), sanitize("a b"));
/// ```
pub fn sanitize(component: &str) -> String {
    component.chars().filter(|c| !matches!(c, ' ' | '/')).collect()
}

/// An output location, as an absolute path and as a link relative to the
/// output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPath {
    absolute: PathBuf,
    relative: String,
}

impl OutputPath {
    /// The full path under the output directory.
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    /// The path relative to the output directory, used as a link target.
    pub fn relative(&self) -> &str {
        &self.relative
    }
}

/// Builds the output path for `components` under `base`.
///
/// Components are sanitized and joined with the platform separator;
/// components that sanitize to nothing are skipped. The relative form is
/// the absolute form with the `base` prefix and the separator following it
/// removed.
///
/// ```
/// use std::path::Path;
/// use catalog::path::build_path;
///
/// let path = build_path(Path::new("docs"), ["shop", "Orders Api", "Order.svg"]);
/// assert_eq!(path.absolute(), Path::new("docs/shop/OrdersApi/Order.svg"));
/// assert_eq!(path.relative(), "shop/OrdersApi/Order.svg");
/// ```
pub fn build_path<I, S>(base: &Path, components: I) -> OutputPath
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let segments: Vec<String> = components
        .into_iter()
        .map(|component| sanitize(component.as_ref()))
        .filter(|segment| !segment.is_empty())
        .collect();

    let mut absolute = base.to_path_buf();
    absolute.extend(&segments);

    let relative = segments.join(&MAIN_SEPARATOR.to_string());

    OutputPath { absolute, relative }
}
