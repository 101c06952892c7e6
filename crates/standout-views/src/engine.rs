//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, the seam between the
//! view renderer and the library that actually parses and executes
//! templates. The default implementation is [`MiniJinjaEngine`].
//!
//! An engine is also the registry of partials and helpers. Every renderer
//! holding the same engine sees the same partials and helpers, and
//! registering a name that already exists replaces it. Nothing is ever
//! unregistered. Share an engine explicitly with `Arc`, or use
//! [`MiniJinjaEngine::global`] for a process-wide one.
//!
//! # Partials
//!
//! Partials are stored as raw source. They are parsed when a template first
//! includes them, through the MiniJinja loader:
//!
//! ```jinja
//! {% include "nested/card" %}
//! ```
//!
//! # Helpers
//!
//! A [`Helper`] is exposed to templates both as a global function and as a
//! filter whose first argument is the filtered value:
//!
//! ```jinja
//! {{ shout(name) }}
//! {{ name | shout }}
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use minijinja::value::Rest;
use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};
use once_cell::sync::Lazy;

use crate::config::{AutoEscapeMode, CompilerOptions, UndefinedMode};
use crate::error::ViewError;

type HelperFn = dyn Fn(&[Value]) -> Result<Value, minijinja::Error> + Send + Sync;

/// A named function callable from templates.
#[derive(Clone)]
pub struct Helper(Arc<HelperFn>);

impl Helper {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, minijinja::Error> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invokes the helper.
    pub fn call(&self, args: &[Value]) -> Result<Value, minijinja::Error> {
        (self.0)(args)
    }
}

impl fmt::Debug for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Helper(..)")
    }
}

/// Helpers in insertion order. Inserting an existing name replaces the
/// helper in place.
#[derive(Clone, Default)]
pub struct Helpers {
    entries: Vec<(String, Helper)>,
}

impl Helpers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, helper: Helper) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = helper,
            None => self.entries.push((name, helper)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Helper)> {
        self.entries.iter().map(|(n, h)| (n.as_str(), h))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Helpers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// A template engine that compiles sources and holds the shared registry
/// of partials and helpers.
pub trait TemplateEngine: Send + Sync {
    /// Registers (or replaces) a partial from raw source.
    ///
    /// The source is not parsed here; syntax errors surface when a template
    /// that includes the partial is rendered.
    fn register_partial(&self, name: &str, source: String);

    /// Registers (or replaces) a helper.
    fn register_helper(&self, name: &str, helper: Helper);

    /// Compiles `source` under `name` with the given options.
    ///
    /// The compiled template sees the partials and helpers registered at the
    /// time of this call.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Template`] if the source has a syntax error.
    fn compile(
        &self,
        name: &str,
        source: String,
        options: &CompilerOptions,
    ) -> Result<CompiledTemplate, ViewError>;

    fn has_partial(&self, name: &str) -> bool;

    fn has_helper(&self, name: &str) -> bool;

    /// Names of every registered partial, sorted.
    fn partial_names(&self) -> Vec<String>;
}

/// A compiled template, ready to be invoked with a context.
pub struct CompiledTemplate {
    env: Environment<'static>,
    name: String,
}

impl CompiledTemplate {
    /// Renders the template.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Template`] for runtime failures: undefined values
    /// in strict mode, failing helpers, missing or malformed partials.
    pub fn render(&self, context: Value) -> Result<String, ViewError> {
        let tmpl = self.env.get_template(&self.name)?;
        Ok(tmpl.render(context)?)
    }

    /// The name the template was compiled under.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("name", &self.name)
            .finish()
    }
}

/// MiniJinja-based template engine.
///
/// # Example
///
/// ```rust
/// use standout_views::engine::{MiniJinjaEngine, TemplateEngine};
/// use standout_views::CompilerOptions;
/// use minijinja::context;
///
/// let engine = MiniJinjaEngine::new();
/// engine.register_partial("greeting", "Hello, {{ name }}!".to_string());
///
/// let tmpl = engine
///     .compile("page", r#"[{% include "greeting" %}]"#.to_string(), &CompilerOptions::default())
///     .unwrap();
/// assert_eq!(tmpl.render(context! { name => "World" }).unwrap(), "[Hello, World!]");
/// ```
#[derive(Default)]
pub struct MiniJinjaEngine {
    partials: RwLock<BTreeMap<String, String>>,
    helpers: RwLock<BTreeMap<String, Helper>>,
}

static GLOBAL: Lazy<Arc<MiniJinjaEngine>> = Lazy::new(|| Arc::new(MiniJinjaEngine::new()));

impl MiniJinjaEngine {
    /// Creates an engine with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide engine.
    ///
    /// Renderers built with [`ViewRenderer::new`](crate::ViewRenderer::new)
    /// all register into this instance.
    pub fn global() -> Arc<MiniJinjaEngine> {
        Arc::clone(&GLOBAL)
    }

    fn partials_snapshot(&self) -> BTreeMap<String, String> {
        self.partials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn helpers_snapshot(&self) -> BTreeMap<String, Helper> {
        self.helpers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for MiniJinjaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniJinjaEngine")
            .field("partials", &self.partial_names())
            .field(
                "helpers",
                &self
                    .helpers
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .keys()
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn register_partial(&self, name: &str, source: String) {
        self.partials
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), source);
    }

    fn register_helper(&self, name: &str, helper: Helper) {
        self.helpers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), helper);
    }

    fn compile(
        &self,
        name: &str,
        source: String,
        options: &CompilerOptions,
    ) -> Result<CompiledTemplate, ViewError> {
        let mut env = Environment::new();
        apply_options(&mut env, options);

        let partials = self.partials_snapshot();
        env.set_loader(move |partial| Ok(partials.get(partial).cloned()));

        for (helper_name, helper) in self.helpers_snapshot() {
            register_helper_in(&mut env, helper_name, helper);
        }

        env.add_template_owned(name.to_string(), source)?;
        Ok(CompiledTemplate {
            env,
            name: name.to_string(),
        })
    }

    fn has_partial(&self, name: &str) -> bool {
        self.partials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    fn has_helper(&self, name: &str) -> bool {
        self.helpers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    fn partial_names(&self) -> Vec<String> {
        self.partials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

fn apply_options(env: &mut Environment<'static>, options: &CompilerOptions) {
    match options.auto_escape {
        AutoEscapeMode::Auto => {}
        AutoEscapeMode::Html => env.set_auto_escape_callback(|_| AutoEscape::Html),
        AutoEscapeMode::None => env.set_auto_escape_callback(|_| AutoEscape::None),
    }

    env.set_undefined_behavior(match options.undefined {
        UndefinedMode::Lenient => UndefinedBehavior::Lenient,
        UndefinedMode::Strict => UndefinedBehavior::Strict,
        UndefinedMode::Chainable => UndefinedBehavior::Chainable,
    });

    env.set_trim_blocks(options.trim_blocks);
    env.set_lstrip_blocks(options.lstrip_blocks);
    env.set_keep_trailing_newline(options.keep_trailing_newline);
}

fn register_helper_in(env: &mut Environment<'static>, name: String, helper: Helper) {
    let as_function = helper.clone();
    env.add_function(name.clone(), move |args: Rest<Value>| {
        as_function.call(&args)
    });

    env.add_filter(name, move |value: Value, args: Rest<Value>| {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(value);
        all.extend(args.iter().cloned());
        helper.call(&all)
    });
}
