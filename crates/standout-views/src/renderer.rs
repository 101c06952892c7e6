//! View rendering with layouts and partials.
//!
//! [`ViewRenderer`] renders a named view from the base directory, then wraps
//! it in a layout. The rendered view is handed to the layout as `body`:
//!
//! ```text
//! views/index.jinja          Hello {{ name }}
//! views/layouts/main.jinja   <body>{{ body }}</body>
//!
//! render_view("index", {name: "World"}, None)  →  <body>Hello World</body>
//! ```
//!
//! # Partials
//!
//! Before a view is rendered, every file under the partials directory is
//! registered into the engine under its relative name (see
//! [`partial_name`](crate::paths::partial_name)). With `cache_partials`
//! enabled this happens once per renderer; otherwise on every render, which
//! picks up edited partials without a restart.
//!
//! # No Template Caching
//!
//! Views and layouts are read and compiled from disk on every call.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use minijinja::value::ValueKind;
use minijinja::{context, Value};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::ViewConfig;
use crate::engine::{MiniJinjaEngine, TemplateEngine};
use crate::error::ViewError;
use crate::paths::{normalize, partial_name, template_path};
use crate::store::{DiskStore, FileStore};

/// Context key the rendered view is injected under when a layout is applied.
pub const BODY_KEY: &str = "body";

/// Whether a renderer has completed a partial registration pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartialState {
    Unregistered,
    Registered,
}

/// Renders views, layouts and partials from a directory tree.
///
/// # Example
///
/// ```rust,ignore
/// use standout_views::{ViewConfig, ViewRenderer};
/// use serde_json::json;
///
/// let renderer = ViewRenderer::new(ViewConfig::new().with_base_dir("./views"));
///
/// // views/index.jinja inside views/layouts/main.jinja
/// let html = renderer.render_view("index", &json!({ "name": "World" }), None)?;
///
/// // views/admin/users.jinja inside views/layouts/admin.jinja
/// let html = renderer.render_view("admin/users", &users, Some("admin"))?;
/// ```
pub struct ViewRenderer {
    config: ViewConfig,
    engine: Arc<dyn TemplateEngine>,
    store: Arc<dyn FileStore>,
    partials_registered: AtomicBool,
}

impl ViewRenderer {
    /// Creates a renderer on the process-wide engine and the local filesystem.
    ///
    /// The configuration is normalized and its helpers are registered into
    /// [`MiniJinjaEngine::global`], where they stay for the life of the process.
    pub fn new(config: ViewConfig) -> Self {
        Self::with_engine(config, MiniJinjaEngine::global())
    }

    /// Creates a renderer on an explicit engine.
    ///
    /// Renderers sharing an engine share its partials and helpers.
    pub fn with_engine(config: ViewConfig, engine: Arc<dyn TemplateEngine>) -> Self {
        Self::with_parts(config, engine, Arc::new(DiskStore))
    }

    /// Creates a renderer on an explicit engine and file store.
    pub fn with_parts(
        config: ViewConfig,
        engine: Arc<dyn TemplateEngine>,
        store: Arc<dyn FileStore>,
    ) -> Self {
        let config = config.normalized();

        for (name, helper) in config.helpers.iter() {
            engine.register_helper(name, helper.clone());
        }
        if !config.helpers.is_empty() {
            debug!(helpers = ?config.helpers, "registered helpers");
        }

        Self {
            config,
            engine,
            store,
            partials_registered: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<dyn TemplateEngine> {
        &self.engine
    }

    pub fn partial_state(&self) -> PartialState {
        if self.partials_registered.load(Ordering::Acquire) {
            PartialState::Registered
        } else {
            PartialState::Unregistered
        }
    }

    /// Renders `view` and wraps it in a layout.
    ///
    /// The layout is `layout` when given and non-empty, otherwise the
    /// configured default. With no layout at all, the view body is returned
    /// as is.
    ///
    /// The layout receives the caller's context with `body` set to the
    /// rendered view (replacing any `body` the caller passed). The body is
    /// marked safe, so HTML auto-escaping does not escape it twice.
    ///
    /// An empty `view` logs a warning and renders the empty string without
    /// touching the filesystem.
    ///
    /// # Errors
    ///
    /// Missing or unreadable views, layouts and partials, template syntax and
    /// runtime errors (including contexts that fail to serialize) are all
    /// returned as is.
    pub fn render_view<T: Serialize + ?Sized>(
        &self,
        view: &str,
        context: &T,
        layout: Option<&str>,
    ) -> Result<String, ViewError> {
        if view.is_empty() {
            warn!("render_view called with an empty view name");
            return Ok(String::new());
        }

        if !self.config.cache_partials || self.partial_state() == PartialState::Unregistered {
            self.register_partials()?;
        }

        let context = Value::from_serialize(context);

        let view_path = template_path(&self.config.base_dir, view, &self.config.extname);
        let body = self.render_value(&view_path, context.clone())?;

        let layout = layout
            .filter(|name| !name.is_empty())
            .or(self.config.default_layout.as_deref());

        match layout {
            Some(layout) => {
                let layout_path =
                    template_path(&self.config.layouts_path(), layout, &self.config.extname);
                self.render_value(&layout_path, with_body(context, body))
            }
            None => Ok(body),
        }
    }

    /// Renders the template file at `path`.
    ///
    /// No layout is applied and partials are not (re)registered; the
    /// template sees whatever the engine currently holds.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Io`] if the file cannot be read,
    /// [`ViewError::Decode`] if it is not UTF-8 and [`ViewError::Template`]
    /// for compile and runtime failures.
    pub fn render<T: Serialize + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        context: &T,
    ) -> Result<String, ViewError> {
        self.render_value(path.as_ref(), Value::from_serialize(context))
    }

    /// Walks the partials directory and registers every partial.
    ///
    /// Called automatically by [`render_view`](Self::render_view); call it
    /// directly to pick up partial changes when `cache_partials` is on.
    /// A missing partials directory registers nothing.
    ///
    /// Returns the number of partials registered.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Walk`] if the directory cannot be traversed and
    /// [`ViewError::Io`]/[`ViewError::Decode`] if a partial cannot be read.
    /// The renderer stays [`PartialState::Unregistered`] if the pass fails
    /// before ever completing.
    pub fn register_partials(&self) -> Result<usize, ViewError> {
        let root = self.config.partials_path();
        let files = self
            .store
            .walk(&root, &self.config.extname)
            .map_err(|source| ViewError::Walk {
                path: root.clone(),
                source,
            })?;

        for file in &files {
            let name = partial_name(&root, file, &self.config.extname);
            let source = self.read_source(file)?;
            trace!(partial = %name, path = %file.display(), "registering partial");
            self.engine.register_partial(&name, source);
        }

        self.partials_registered.store(true, Ordering::Release);
        debug!(dir = %root.display(), count = files.len(), "registered partials");
        Ok(files.len())
    }

    fn render_value(&self, path: &Path, context: Value) -> Result<String, ViewError> {
        trace!(path = %path.display(), "rendering template");
        let source = self.read_source(path)?;
        let template =
            self.engine
                .compile(&normalize(path), source, &self.config.compiler_options)?;
        template.render(context)
    }

    fn read_source(&self, path: &Path) -> Result<String, ViewError> {
        let bytes = self.store.read(path).map_err(|source| ViewError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|source| ViewError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for ViewRenderer {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl fmt::Debug for ViewRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRenderer")
            .field("config", &self.config)
            .field("partial_state", &self.partial_state())
            .finish_non_exhaustive()
    }
}

/// Builds the layout context: the caller's keys plus the rendered view.
///
/// Non-map contexts contribute no keys.
fn with_body(context: Value, body: String) -> Value {
    let body = Value::from_safe_string(body);
    if context.kind() == ValueKind::Map {
        context! { body => body, ..context }
    } else {
        context! { body => body }
    }
}
