//! Renderer configuration.
//!
//! [`ViewConfig`] describes where templates live and how they are compiled.
//! Every field has a default, so a configuration only needs to name what it
//! changes, either through the `with_*` builders or through a YAML/JSON
//! document with missing keys:
//!
//! ```rust
//! use standout_views::ViewConfig;
//!
//! let config = ViewConfig::from_yaml(r#"
//! base_dir: templates
//! default_layout: site
//! "#).unwrap();
//!
//! assert_eq!(config.base_dir.to_str(), Some("templates"));
//! assert_eq!(config.default_layout.as_deref(), Some("site"));
//! assert_eq!(config.extname, ".jinja"); // default
//! ```
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `base_dir` | `views` |
//! | `extname` | `.jinja` |
//! | `layouts_dir` | `layouts` |
//! | `partials_dir` | `partials` |
//! | `cache_partials` | `true` |
//! | `default_layout` | `Some("main")` |
//! | `helpers` | none |
//! | `compiler_options` | [`CompilerOptions::default`] (HTML escaping on) |

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::engine::{Helper, Helpers};
use crate::error::ViewError;

/// Default template extension.
pub const DEFAULT_EXTNAME: &str = ".jinja";

/// Default layout name.
pub const DEFAULT_LAYOUT: &str = "main";

/// Where templates live and how they are compiled.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Root directory for views, layouts and partials.
    pub base_dir: PathBuf,
    /// Filename suffix of template files, including the leading dot.
    pub extname: String,
    /// Layouts directory, relative to `base_dir`.
    pub layouts_dir: PathBuf,
    /// Partials directory, relative to `base_dir`.
    pub partials_dir: PathBuf,
    /// Register partials once per renderer instead of on every render.
    pub cache_partials: bool,
    /// Layout used when a render does not name one. `None` (or an empty
    /// string) renders views without a layout.
    pub default_layout: Option<String>,
    /// Helpers registered into the engine when the renderer is built.
    #[serde(skip)]
    pub helpers: Helpers,
    /// Passed to the engine's compile step untouched.
    pub compiler_options: CompilerOptions,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("views"),
            extname: DEFAULT_EXTNAME.to_string(),
            layouts_dir: PathBuf::from("layouts"),
            partials_dir: PathBuf::from("partials"),
            cache_partials: true,
            default_layout: Some(DEFAULT_LAYOUT.to_string()),
            helpers: Helpers::default(),
            compiler_options: CompilerOptions::default(),
        }
    }
}

impl ViewConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from YAML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Config`] for malformed YAML or unknown keys.
    pub fn from_yaml(yaml: &str) -> Result<Self, ViewError> {
        let config: ViewConfig = serde_yaml::from_str(yaml)?;
        Ok(config.normalized())
    }

    /// Parses a configuration from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Config`] for malformed JSON or unknown keys.
    pub fn from_json(json: &str) -> Result<Self, ViewError> {
        let config: ViewConfig =
            serde_json::from_str(json).map_err(|e| ViewError::Config(e.to_string()))?;
        Ok(config.normalized())
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn with_extname(mut self, extname: impl Into<String>) -> Self {
        self.extname = extname.into();
        self
    }

    pub fn with_layouts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.layouts_dir = dir.into();
        self
    }

    pub fn with_partials_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.partials_dir = dir.into();
        self
    }

    pub fn with_cache_partials(mut self, cache: bool) -> Self {
        self.cache_partials = cache;
        self
    }

    /// Sets the default layout. `None` disables layouts for renders that do
    /// not name one.
    pub fn with_default_layout<S: Into<String>>(mut self, layout: Option<S>) -> Self {
        self.default_layout = layout.map(Into::into);
        self
    }

    /// Adds a helper. Helpers are registered in the order they were added.
    ///
    /// ```rust
    /// use standout_views::ViewConfig;
    /// use minijinja::Value;
    ///
    /// let config = ViewConfig::new().with_helper("shout", |args: &[Value]| {
    ///     let text = args.first().map(|v| v.to_string()).unwrap_or_default();
    ///     Ok(Value::from(text.to_uppercase()))
    /// });
    /// assert_eq!(config.helpers.names().collect::<Vec<_>>(), vec!["shout"]);
    /// ```
    pub fn with_helper<F>(mut self, name: impl Into<String>, helper: F) -> Self
    where
        F: Fn(&[minijinja::Value]) -> Result<minijinja::Value, minijinja::Error>
            + Send
            + Sync
            + 'static,
    {
        self.helpers.insert(name, Helper::new(helper));
        self
    }

    pub fn with_compiler_options(mut self, options: CompilerOptions) -> Self {
        self.compiler_options = options;
        self
    }

    /// Applies the construction-time normalization rules.
    ///
    /// - `extname` gets a leading dot if it has none.
    /// - An empty `default_layout` becomes `None`.
    pub fn normalized(mut self) -> Self {
        if !self.extname.is_empty() && !self.extname.starts_with('.') {
            self.extname = format!(".{}", self.extname);
        }
        if self.default_layout.as_deref() == Some("") {
            self.default_layout = None;
        }
        self
    }

    /// `base_dir/layouts_dir`.
    pub fn layouts_path(&self) -> PathBuf {
        self.base_dir.join(&self.layouts_dir)
    }

    /// `base_dir/partials_dir`.
    pub fn partials_path(&self) -> PathBuf {
        self.base_dir.join(&self.partials_dir)
    }
}

/// How output is escaped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoEscapeMode {
    /// Decided by the template's file name (`.html` files are escaped).
    Auto,
    /// Always HTML-escape.
    #[default]
    Html,
    /// Never escape.
    None,
}

/// How undefined values behave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndefinedMode {
    /// Undefined values render as empty strings.
    #[default]
    Lenient,
    /// Any use of an undefined value is an error.
    Strict,
    /// Attribute access on undefined values is allowed and stays undefined.
    Chainable,
}

/// Options for the engine's compile step.
///
/// The renderer never inspects these; they are handed to
/// [`TemplateEngine::compile`](crate::engine::TemplateEngine::compile).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerOptions {
    pub auto_escape: AutoEscapeMode,
    pub undefined: UndefinedMode,
    pub trim_blocks: bool,
    pub lstrip_blocks: bool,
    pub keep_trailing_newline: bool,
}
