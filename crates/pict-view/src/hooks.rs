//! Lifecycle hooks.
//!
//! Every phase of a view runs three steps in order: before, on and after.
//! Render is wrapped by a before-render and an after-render hook.
//!
//! ```text
//! initialize:  BEFORE-INITIALIZE → INITIALIZE → AFTER-INITIALIZE
//! solve:       BEFORE-SOLVE      → SOLVE      → AFTER-SOLVE
//! render:      resolve → fetch data → BEFORE-RENDER → template → assign → AFTER-RENDER
//! ```
//!
//! Hooks are supplied through the [`ViewHooks`] trait. Every method has a
//! default no-op body, so an implementation overrides only what it needs. The
//! async step methods default to awaiting their synchronous counterpart.
//!
//! Two ready-made implementations exist:
//!
//! - [`DefaultHooks`]: all no-ops.
//! - [`Hooks`]: a table of closures per step, handy when a view only needs a
//!   couple of small behaviors and no dedicated type.
//!
//! A step that fails short-circuits its phase: later steps do not run and the
//! error becomes the phase's result.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::renderable::Renderable;
use crate::service::ViewService;

/// A lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Initialize,
    Solve,
    Render,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Initialize => write!(f, "initialize"),
            Phase::Solve => write!(f, "solve"),
            Phase::Render => write!(f, "render"),
        }
    }
}

/// A hookable step of the initialize and solve phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStep {
    BeforeInitialize,
    Initialize,
    AfterInitialize,
    BeforeSolve,
    Solve,
    AfterSolve,
}

impl LifecycleStep {
    /// Returns the phase this step belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            LifecycleStep::BeforeInitialize
            | LifecycleStep::Initialize
            | LifecycleStep::AfterInitialize => Phase::Initialize,
            LifecycleStep::BeforeSolve | LifecycleStep::Solve | LifecycleStep::AfterSolve => {
                Phase::Solve
            }
        }
    }
}

impl fmt::Display for LifecycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleStep::BeforeInitialize => write!(f, "before-initialize"),
            LifecycleStep::Initialize => write!(f, "initialize"),
            LifecycleStep::AfterInitialize => write!(f, "after-initialize"),
            LifecycleStep::BeforeSolve => write!(f, "before-solve"),
            LifecycleStep::Solve => write!(f, "solve"),
            LifecycleStep::AfterSolve => write!(f, "after-solve"),
        }
    }
}

/// Error returned by a hook.
#[derive(Debug, Error)]
#[error("hook error ({step}): {message}")]
pub struct HookError {
    /// Human-readable error message
    pub message: String,
    /// The step where the error occurred
    pub step: LifecycleStep,
    /// The underlying error source, if any
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl HookError {
    /// Creates a hook error for `step`.
    pub fn new(step: LifecycleStep, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            step,
            source: None,
        }
    }

    /// Sets the source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.source = Some(source.into());
        self
    }
}

/// Result of a lifecycle step.
pub type HookResult = Result<(), HookError>;

fn trace_step(view: &ViewService, step: &str) {
    if view.is_noisy(3) {
        tracing::trace!(view = %view, "{}:", step);
    }
}

/// Behavior plugged into a view's lifecycle.
///
/// Render hooks are synchronous on both render paths. `on_before_render`
/// may reshape the data the template receives. There are no async render
/// hooks: `render_async` only awaits the template provider.
#[async_trait(?Send)]
pub trait ViewHooks {
    fn on_before_initialize(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onBeforeInitialize");
        Ok(())
    }

    fn on_initialize(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onInitialize");
        Ok(())
    }

    fn on_after_initialize(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onAfterInitialize");
        Ok(())
    }

    fn on_before_solve(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onBeforeSolve");
        Ok(())
    }

    fn on_solve(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onSolve");
        Ok(())
    }

    fn on_after_solve(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onAfterSolve");
        Ok(())
    }

    fn on_before_render(
        &mut self,
        view: &ViewService,
        _renderable: &Renderable,
        _destination: &str,
        _data: &mut Option<Value>,
    ) {
        trace_step(view, "onBeforeRender");
    }

    fn on_after_render(
        &mut self,
        view: &ViewService,
        _renderable: &Renderable,
        _destination: &str,
        _data: Option<&Value>,
        _content: &str,
    ) {
        trace_step(view, "onAfterRender");
    }

    async fn on_before_initialize_async(&mut self, view: &ViewService) -> HookResult {
        self.on_before_initialize(view)
    }

    async fn on_initialize_async(&mut self, view: &ViewService) -> HookResult {
        self.on_initialize(view)
    }

    async fn on_after_initialize_async(&mut self, view: &ViewService) -> HookResult {
        self.on_after_initialize(view)
    }

    async fn on_before_solve_async(&mut self, view: &ViewService) -> HookResult {
        self.on_before_solve(view)
    }

    async fn on_solve_async(&mut self, view: &ViewService) -> HookResult {
        self.on_solve(view)
    }

    async fn on_after_solve_async(&mut self, view: &ViewService) -> HookResult {
        self.on_after_solve(view)
    }
}

/// Hooks that do nothing beyond trace logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl ViewHooks for DefaultHooks {}

/// Type alias for initialize and solve step closures.
pub type StepFn = Rc<dyn Fn(&ViewService) -> HookResult>;

/// Type alias for before-render closures.
pub type BeforeRenderFn = Rc<dyn Fn(&ViewService, &Renderable, &str, &mut Option<Value>)>;

/// Type alias for after-render closures.
pub type AfterRenderFn = Rc<dyn Fn(&ViewService, &Renderable, &str, Option<&Value>, &str)>;

/// A table of hook closures.
///
/// Closures for the same step run in registration order; the first error
/// stops the step.
///
/// # Example
///
/// ```rust
/// use pict_view::{HookError, Hooks, LifecycleStep};
///
/// let hooks = Hooks::new()
///     .on(LifecycleStep::Solve, |view| {
///         if view.options().renderables.is_empty() {
///             return Err(HookError::new(LifecycleStep::Solve, "nothing to solve"));
///         }
///         Ok(())
///     })
///     .after_render(|_view, renderable, destination, _data, _content| {
///         println!("{} -> {}", renderable.renderable_hash, destination);
///     });
/// assert!(!hooks.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct Hooks {
    steps: HashMap<LifecycleStep, Vec<StepFn>>,
    before_render: Vec<BeforeRenderFn>,
    after_render: Vec<AfterRenderFn>,
}

impl Hooks {
    /// Creates an empty hook table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.steps.values().all(Vec::is_empty)
            && self.before_render.is_empty()
            && self.after_render.is_empty()
    }

    /// Adds a closure for an initialize or solve step.
    pub fn on<F>(mut self, step: LifecycleStep, f: F) -> Self
    where
        F: Fn(&ViewService) -> HookResult + 'static,
    {
        self.steps.entry(step).or_default().push(Rc::new(f));
        self
    }

    /// Adds a before-render closure.
    pub fn before_render<F>(mut self, f: F) -> Self
    where
        F: Fn(&ViewService, &Renderable, &str, &mut Option<Value>) + 'static,
    {
        self.before_render.push(Rc::new(f));
        self
    }

    /// Adds an after-render closure.
    pub fn after_render<F>(mut self, f: F) -> Self
    where
        F: Fn(&ViewService, &Renderable, &str, Option<&Value>, &str) + 'static,
    {
        self.after_render.push(Rc::new(f));
        self
    }

    /// Runs the closures registered for `step`.
    pub fn run_step(&self, step: LifecycleStep, view: &ViewService) -> HookResult {
        if let Some(hooks) = self.steps.get(&step) {
            for hook in hooks {
                hook(view)?;
            }
        }
        Ok(())
    }
}

impl ViewHooks for Hooks {
    fn on_before_initialize(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onBeforeInitialize");
        self.run_step(LifecycleStep::BeforeInitialize, view)
    }

    fn on_initialize(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onInitialize");
        self.run_step(LifecycleStep::Initialize, view)
    }

    fn on_after_initialize(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onAfterInitialize");
        self.run_step(LifecycleStep::AfterInitialize, view)
    }

    fn on_before_solve(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onBeforeSolve");
        self.run_step(LifecycleStep::BeforeSolve, view)
    }

    fn on_solve(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onSolve");
        self.run_step(LifecycleStep::Solve, view)
    }

    fn on_after_solve(&mut self, view: &ViewService) -> HookResult {
        trace_step(view, "onAfterSolve");
        self.run_step(LifecycleStep::AfterSolve, view)
    }

    fn on_before_render(
        &mut self,
        view: &ViewService,
        renderable: &Renderable,
        destination: &str,
        data: &mut Option<Value>,
    ) {
        trace_step(view, "onBeforeRender");
        for hook in &self.before_render {
            hook(view, renderable, destination, data);
        }
    }

    fn on_after_render(
        &mut self,
        view: &ViewService,
        renderable: &Renderable,
        destination: &str,
        data: Option<&Value>,
        content: &str,
    ) {
        trace_step(view, "onAfterRender");
        for hook in &self.after_render {
            hook(view, renderable, destination, data, content);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step_count: usize = self.steps.values().map(Vec::len).sum();
        f.debug_struct("Hooks")
            .field("step_count", &step_count)
            .field("before_render_count", &self.before_render.len())
            .field("after_render_count", &self.after_render.len())
            .finish()
    }
}
