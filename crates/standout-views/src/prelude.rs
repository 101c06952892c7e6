//! Common imports for rendering views.
//!
//! ```rust
//! use standout_views::prelude::*;
//!
//! let renderer = ViewRenderer::with_engine(
//!     ViewConfig::new().with_base_dir("./views"),
//!     std::sync::Arc::new(MiniJinjaEngine::new()),
//! );
//! assert_eq!(renderer.partial_state(), PartialState::Unregistered);
//! ```

pub use crate::{
    CompilerOptions, MiniJinjaEngine, PartialState, TemplateEngine, ViewConfig, ViewError,
    ViewRenderer,
};

pub use minijinja::Value;
