//! Template provider abstraction.
//!
//! This module defines the [`TemplateProvider`] trait, the contract a view uses
//! to register its templates and to render them by hash. The default
//! implementation is [`MiniJinjaProvider`].
//!
//! Providers are shared between every view of an application, so all methods
//! take `&self`. Implementations use interior mutability for registration.

use std::cell::RefCell;
use std::collections::BTreeMap;

use async_trait::async_trait;
use minijinja::{Environment, Value};

use crate::error::RenderError;
use crate::filters::register_filters;
use crate::registry::{ResolvedTemplate, TemplateRegistry};

/// A template engine that renders registered templates by hash.
///
/// `data` is `None` when the view resolved no data address.
#[async_trait(?Send)]
pub trait TemplateProvider {
    /// Registers (or replaces) a template under `hash`.
    fn add_template(&self, hash: &str, template: &str, source: &str) -> Result<(), RenderError>;

    /// Registers a default template answering for hashes that start with
    /// `prefix` and end with `postfix`.
    fn add_default_template(
        &self,
        prefix: &str,
        postfix: &str,
        template: &str,
        source: &str,
    ) -> Result<(), RenderError>;

    /// Checks if `hash` resolves to an explicit or a default template.
    fn has_template(&self, hash: &str) -> bool;

    /// Renders the template registered under `hash` with `data`.
    fn render(&self, hash: &str, data: Option<&serde_json::Value>) -> Result<String, RenderError>;

    /// Renders asynchronously.
    ///
    /// The default implementation delegates to [`render`](Self::render).
    /// Providers backed by remote template stores override this.
    async fn render_async(
        &self,
        hash: &str,
        data: Option<&serde_json::Value>,
    ) -> Result<String, RenderError> {
        self.render(hash, data)
    }
}

/// MiniJinja-based template provider.
///
/// The render context exposes the data as `record`. When the data is a JSON
/// object its top-level fields are also available directly, with the fields
/// taking precedence over `record`.
///
/// Default templates are compiled the first time a matching hash renders and
/// are then cached under that hash.
///
/// # Example
///
/// ```rust
/// use pict_template::{MiniJinjaProvider, TemplateProvider};
/// use serde_json::json;
///
/// let provider = MiniJinjaProvider::new();
/// provider.add_template("Greeting", "Hello, {{ name }}!", "docs").unwrap();
///
/// let output = provider.render("Greeting", Some(&json!({"name": "World"}))).unwrap();
/// assert_eq!(output, "Hello, World!");
/// ```
pub struct MiniJinjaProvider {
    env: RefCell<Environment<'static>>,
    registry: RefCell<TemplateRegistry>,
}

impl MiniJinjaProvider {
    /// Creates a new provider with the utility filters registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        register_filters(&mut env);
        Self {
            env: RefCell::new(env),
            registry: RefCell::new(TemplateRegistry::new()),
        }
    }

    /// Gives mutable access to the underlying MiniJinja environment.
    ///
    /// This allows registering custom filters, functions or globals.
    pub fn with_environment_mut<R>(&self, f: impl FnOnce(&mut Environment<'static>) -> R) -> R {
        f(&mut self.env.borrow_mut())
    }

    /// Returns the source label of an explicit (or cached default) template.
    pub fn template_source(&self, hash: &str) -> Option<String> {
        self.registry.borrow().source(hash).map(str::to_string)
    }

    /// Compiles the matching default template under `hash` if `hash` has no
    /// explicit template yet.
    fn materialize(&self, hash: &str) -> Result<(), RenderError> {
        let pending = {
            let registry = self.registry.borrow();
            match registry.resolve(hash) {
                Ok(ResolvedTemplate::Explicit(_)) => None,
                Ok(ResolvedTemplate::Default(default)) => {
                    Some((default.template.clone(), default.source.clone()))
                }
                Err(_) => return Err(RenderError::TemplateNotFound(hash.to_string())),
            }
        };
        match pending {
            Some((template, source)) => self.add_template(hash, &template, &source),
            None => Ok(()),
        }
    }
}

impl Default for MiniJinjaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl TemplateProvider for MiniJinjaProvider {
    fn add_template(&self, hash: &str, template: &str, source: &str) -> Result<(), RenderError> {
        self.env
            .borrow_mut()
            .add_template_owned(hash.to_string(), template.to_string())?;
        self.registry
            .borrow_mut()
            .add_template(hash, template, source);
        Ok(())
    }

    fn add_default_template(
        &self,
        prefix: &str,
        postfix: &str,
        template: &str,
        source: &str,
    ) -> Result<(), RenderError> {
        // Syntax errors surface at registration rather than at first match.
        Environment::new().template_from_str(template)?;
        self.registry
            .borrow_mut()
            .add_default_template(prefix, postfix, template, source);
        Ok(())
    }

    fn has_template(&self, hash: &str) -> bool {
        self.registry.borrow().resolve(hash).is_ok()
    }

    fn render(&self, hash: &str, data: Option<&serde_json::Value>) -> Result<String, RenderError> {
        self.materialize(hash)?;
        let env = self.env.borrow();
        let tmpl = env.get_template(hash)?;
        Ok(tmpl.render(template_context(data))?)
    }
}

/// Builds the render context for `data`.
fn template_context(data: Option<&serde_json::Value>) -> BTreeMap<String, Value> {
    let mut context = BTreeMap::new();
    let record = data.map(Value::from_serialize).unwrap_or(Value::UNDEFINED);
    context.insert("record".to_string(), record);

    if let Some(serde_json::Value::Object(map)) = data {
        for (key, value) in map {
            context.insert(key.clone(), Value::from_serialize(value));
        }
    }
    context
}
