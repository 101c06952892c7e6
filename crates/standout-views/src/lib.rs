//! # Standout Views - Directory-Driven View Rendering
//!
//! `standout-views` renders HTML views for web applications from a template
//! tree on disk. It resolves views, wraps them in layouts, and registers
//! partials and helpers with the template engine. Parsing and executing
//! templates is left to [MiniJinja](https://docs.rs/minijinja).
//!
//! ## Directory Layout
//!
//! ```text
//! views/                      ← base_dir
//! ├── index.jinja             ← render_view("index", ..)
//! ├── admin/users.jinja       ← render_view("admin/users", ..)
//! ├── layouts/                ← layouts_dir
//! │   └── main.jinja          ← default_layout
//! └── partials/               ← partials_dir
//!     ├── header.jinja        ← {% include "header" %}
//!     └── nested/card.jinja   ← {% include "nested/card" %}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use standout_views::{ViewConfig, ViewRenderer};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Page { name: String }
//!
//! let renderer = ViewRenderer::new(ViewConfig::new().with_base_dir("./views"));
//!
//! // views/index.jinja:        Hello {{ name }}
//! // views/layouts/main.jinja: <body>{{ body }}</body>
//! let html = renderer.render_view("index", &Page { name: "World".into() }, None)?;
//! assert_eq!(html, "<body>Hello World</body>");
//! ```
//!
//! ## Key Types
//!
//! - [`ViewRenderer`]: resolves and renders views, layouts and partials
//! - [`ViewConfig`]: directories, extension, layout and compiler options
//! - [`TemplateEngine`]: engine seam and shared partial/helper registry
//! - [`FileStore`]: file reads and directory walks
//! - [`ViewError`]: everything that can go wrong
//!
//! ## Shared Registry
//!
//! Partials and helpers live in the engine, not the renderer. Renderers
//! built with [`ViewRenderer::new`] share [`MiniJinjaEngine::global`], so a
//! helper registered by one is visible to all, and same-named helpers or
//! partials overwrite each other. Pass a dedicated engine through
//! [`ViewRenderer::with_engine`] to isolate renderers.
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events (a warning
//! for empty view names, debug events for registration passes) and leaves
//! subscriber setup to the application.

pub mod config;
pub mod engine;
mod error;
pub mod paths;
pub mod prelude;
mod renderer;
pub mod store;

pub use error::ViewError;

pub use config::{AutoEscapeMode, CompilerOptions, UndefinedMode, ViewConfig};

pub use engine::{CompiledTemplate, Helper, Helpers, MiniJinjaEngine, TemplateEngine};

pub use renderer::{PartialState, ViewRenderer, BODY_KEY};

pub use store::{DiskStore, FileStore};
