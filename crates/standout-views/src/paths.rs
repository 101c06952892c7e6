//! Path helpers for the view directory convention.
//!
//! Views, layouts and partials all live under one base directory:
//!
//! ```text
//! views/
//! ├── index.jinja
//! ├── layouts/
//! │   └── main.jinja
//! └── partials/
//!     ├── header.jinja
//!     └── nested/
//!         └── card.jinja
//! ```
//!
//! Partials are referenced by their path relative to the partials directory,
//! without extension and always with forward slashes:
//!
//! | File Path | Partial Name |
//! |-----------|--------------|
//! | `views/partials/header.jinja` | `"header"` |
//! | `views/partials/nested/card.jinja` | `"nested/card"` |

use std::path::{Path, PathBuf};

/// Converts a path to a string with `/` as the only separator.
pub fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Builds `dir/<name><extname>`.
///
/// The extension is appended rather than set, so names containing dots
/// (`"emails/welcome.en"`) keep them.
///
/// # Example
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use standout_views::paths::template_path;
///
/// let path = template_path(Path::new("views/layouts"), "main", ".jinja");
/// assert_eq!(path, PathBuf::from("views/layouts/main.jinja"));
/// ```
pub fn template_path(dir: &Path, name: &str, extname: &str) -> PathBuf {
    dir.join(format!("{}{}", name, extname))
}

/// Strips `extname` from the end of a name, if present.
///
/// ```rust
/// use standout_views::paths::strip_extension;
///
/// assert_eq!(strip_extension("nested/card.jinja", ".jinja"), "nested/card");
/// assert_eq!(strip_extension("readme.txt", ".jinja"), "readme.txt");
/// ```
pub fn strip_extension<'a>(name: &'a str, extname: &str) -> &'a str {
    if extname.is_empty() {
        return name;
    }
    name.strip_suffix(extname).unwrap_or(name)
}

/// Derives the registered name of a partial from its file path.
///
/// Both `root` and `file` are normalized first. The `root` prefix (plus the
/// separator that follows it) and the trailing `extname` are removed. A file
/// outside `root` keeps its full normalized path as the name.
///
/// ```rust
/// use std::path::Path;
/// use standout_views::paths::partial_name;
///
/// let name = partial_name(
///     Path::new("views/partials"),
///     Path::new("views/partials/nested/card.jinja"),
///     ".jinja",
/// );
/// assert_eq!(name, "nested/card");
/// ```
pub fn partial_name(root: &Path, file: &Path, extname: &str) -> String {
    let root = normalize(root);
    let file = normalize(file);
    let root = root.trim_end_matches('/');

    let relative = match file.strip_prefix(root) {
        Some(rest) if root.is_empty() => rest,
        Some(rest) if rest.starts_with('/') => &rest[1..],
        _ => file.as_str(),
    };

    strip_extension(relative, extname).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_backslashes() {
        assert_eq!(
            normalize(Path::new(r"views\partials\nested\card.jinja")),
            "views/partials/nested/card.jinja"
        );
    }

    #[test]
    fn test_template_path_keeps_inner_dots() {
        let path = template_path(Path::new("views"), "emails/welcome.en", ".jinja");
        assert_eq!(normalize(&path), "views/emails/welcome.en.jinja");
    }

    #[test]
    fn test_partial_name_top_level() {
        let name = partial_name(
            Path::new("views/partials"),
            Path::new("views/partials/header.jinja"),
            ".jinja",
        );
        assert_eq!(name, "header");
    }

    #[test]
    fn test_partial_name_with_trailing_slash_root() {
        let name = partial_name(
            Path::new("views/partials/"),
            Path::new("views/partials/nested/card.jinja"),
            ".jinja",
        );
        assert_eq!(name, "nested/card");
    }

    #[test]
    fn test_partial_name_windows_separators() {
        let name = partial_name(
            Path::new(r"views\partials"),
            Path::new(r"views\partials\nested\card.jinja"),
            ".jinja",
        );
        assert_eq!(name, "nested/card");
    }

    #[test]
    fn test_partial_name_does_not_match_sibling_prefix() {
        // "partials-old" shares a prefix with "partials" but is not inside it.
        let name = partial_name(
            Path::new("views/partials"),
            Path::new("views/partials-old/card.jinja"),
            ".jinja",
        );
        assert_eq!(name, "views/partials-old/card");
    }

    #[test]
    fn test_strip_extension_empty_extname() {
        assert_eq!(strip_extension("card.jinja", ""), "card.jinja");
    }

    proptest! {
        #[test]
        fn prop_partial_name_is_relative_path_without_extension(
            segments in proptest::collection::vec("[a-z][a-z0-9_-]{0,8}", 1..5)
        ) {
            let relative = segments.join("/");
            let file = Path::new("views/partials").join(format!("{}.jinja", relative));
            let name = partial_name(Path::new("views/partials"), &file, ".jinja");
            prop_assert_eq!(name, relative);
        }
    }
}
