//! The view: construction, lifecycle phases and rendering.
//!
//! # Construction
//!
//! Building a view registers its templates and default templates with the
//! shared template provider and validates its renderables. Malformed entries
//! are logged and skipped; see [`View::configuration_errors`].
//!
//! # Lifecycle
//!
//! | Operation | Steps | Timestamp |
//! |-----------|-------|-----------|
//! | [`initialize`](View::initialize) | before → on → after, once | `initialized_at` on success |
//! | [`solve`](View::solve) | before → on → after, every call | `last_solved_at` always |
//! | [`render`](View::render) | resolve → data → before → template → assign → after | `last_rendered_at` on success |
//!
//! Each operation has an `_async` twin with the same ordering and the same
//! short-circuit on the first failing step. The one difference is kept from
//! the host contract: calling `initialize_async` on an initialized view logs a
//! warning and returns `Ok(())`, while `initialize` returns
//! [`ViewError::AlreadyInitialized`].
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use pict_view::{MemoryContent, RenderableDefinition, TemplateDefinition, View, ViewContext, ViewOptions};
//!
//! let content = Rc::new(MemoryContent::new());
//! let context = ViewContext::builder().content(content.clone()).build();
//! let options = ViewOptions::new()
//!     .template(TemplateDefinition::new("T1", "Hello"))
//!     .renderable(RenderableDefinition::new("Greeting", "T1").destination("#out"));
//!
//! let mut view = View::new(context, options);
//! view.render(Some("Greeting"), None, None).unwrap();
//!
//! assert_eq!(content.assignments(), vec![("#out".to_string(), "Hello".to_string())]);
//! assert!(view.last_rendered_at().is_some());
//! ```

use pict_template::RenderError;
use serde_json::Value;

use crate::context::{Timestamp, ViewContext};
use crate::error::{ConfigurationError, ViewError};
use crate::hooks::{DefaultHooks, HookError, HookResult, Phase, ViewHooks};
use crate::options::ViewOptions;
use crate::renderable::{collect_renderables, Renderable, RenderableMap};
use crate::resolve;
use crate::service::ViewService;

/// Completion markers of the lifecycle phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleTimestamps {
    /// Set once, by the first successful initialize.
    pub initialized_at: Option<Timestamp>,
    /// Overwritten by every solve.
    pub last_solved_at: Option<Timestamp>,
    /// Overwritten by every successful render.
    pub last_rendered_at: Option<Timestamp>,
}

/// A resolved render whose content is about to be generated.
struct RenderJob {
    renderable: Renderable,
    destination: String,
    data: Option<Value>,
}

/// Builder for [`View`].
pub struct ViewBuilder<H = DefaultHooks> {
    context: ViewContext,
    options: ViewOptions,
    hash: Option<String>,
    hooks: H,
}

impl<H: ViewHooks> ViewBuilder<H> {
    /// Sets the hash the host registers the view under.
    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Replaces the view's hooks.
    pub fn hooks<H2: ViewHooks>(self, hooks: H2) -> ViewBuilder<H2> {
        ViewBuilder {
            context: self.context,
            options: self.options,
            hash: self.hash,
            hooks,
        }
    }

    pub fn build(self) -> View<H> {
        View::construct(
            ViewService::new(self.context, self.options, self.hash),
            self.hooks,
        )
    }
}

/// A view instance.
pub struct View<H = DefaultHooks> {
    service: ViewService,
    hooks: H,
    renderables: RenderableMap,
    configuration_errors: Vec<ConfigurationError>,
    timestamps: LifecycleTimestamps,
}

impl View<DefaultHooks> {
    /// Creates a view with default hooks.
    pub fn new(context: ViewContext, options: ViewOptions) -> Self {
        Self::builder(context, options).build()
    }

    pub fn builder(context: ViewContext, options: ViewOptions) -> ViewBuilder<DefaultHooks> {
        ViewBuilder {
            context,
            options,
            hash: None,
            hooks: DefaultHooks,
        }
    }
}

impl<H: ViewHooks> View<H> {
    /// Creates a view with custom hooks.
    pub fn with_hooks(context: ViewContext, options: ViewOptions, hooks: H) -> Self {
        View::<DefaultHooks>::builder(context, options)
            .hooks(hooks)
            .build()
    }

    fn construct(service: ViewService, hooks: H) -> Self {
        let mut configuration_errors = register_templates(&service);
        let (renderables, skipped) = collect_renderables(&service.options().renderables);
        configuration_errors.extend(skipped);

        for err in &configuration_errors {
            tracing::error!(view = %service, "{}", err);
        }

        Self {
            service,
            hooks,
            renderables,
            configuration_errors,
            timestamps: LifecycleTimestamps::default(),
        }
    }

    pub fn service(&self) -> &ViewService {
        &self.service
    }

    pub fn identifier(&self) -> &str {
        self.service.identifier()
    }

    pub fn options(&self) -> &ViewOptions {
        self.service.options()
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn renderables(&self) -> &RenderableMap {
        &self.renderables
    }

    pub fn renderable(&self, hash: &str) -> Option<&Renderable> {
        self.renderables.get(hash)
    }

    /// Looks up a manifest definition by name.
    pub fn manifest(&self, name: &str) -> Option<&Value> {
        self.service.options().manifests.get(name)
    }

    /// Entries skipped while constructing the view.
    pub fn configuration_errors(&self) -> &[ConfigurationError] {
        &self.configuration_errors
    }

    pub fn timestamps(&self) -> LifecycleTimestamps {
        self.timestamps
    }

    pub fn initialized_at(&self) -> Option<Timestamp> {
        self.timestamps.initialized_at
    }

    pub fn last_solved_at(&self) -> Option<Timestamp> {
        self.timestamps.last_solved_at
    }

    pub fn last_rendered_at(&self) -> Option<Timestamp> {
        self.timestamps.last_rendered_at
    }

    pub fn is_initialized(&self) -> bool {
        self.timestamps.initialized_at.is_some()
    }

    /// Runs the initialize steps once.
    ///
    /// Returns [`ViewError::AlreadyInitialized`] on any later call.
    pub fn initialize(&mut self) -> Result<(), ViewError> {
        if self.is_initialized() {
            tracing::warn!(
                view = %self.service,
                "initialize called but initialization is already completed. Aborting."
            );
            return Err(self.already_initialized());
        }

        self.run_initialize_steps()
            .map_err(|err| self.hook_failed(Phase::Initialize, err))?;
        self.timestamps.initialized_at = Some(self.service.context().now());
        Ok(())
    }

    /// Runs the initialize steps once, awaiting each step in turn.
    ///
    /// On an initialized view this logs a warning and returns `Ok(())`.
    pub async fn initialize_async(&mut self) -> Result<(), ViewError> {
        if self.is_initialized() {
            tracing::warn!(
                view = %self.service,
                "async initialize called but initialization is already completed. Aborting."
            );
            return Ok(());
        }

        tracing::info!(view = %self.service, "beginning initialization...");
        if let Err(err) = self.run_initialize_steps_async().await {
            return Err(self.hook_failed(Phase::Initialize, err));
        }
        self.timestamps.initialized_at = Some(self.service.context().now());
        tracing::info!(view = %self.service, "initialization complete.");
        Ok(())
    }

    /// Runs the solve steps.
    ///
    /// `last_solved_at` is updated even when a step fails.
    pub fn solve(&mut self) -> Result<(), ViewError> {
        if self.service.is_noisy(2) {
            tracing::trace!(view = %self.service, "executing solve() function...");
        }
        let result = self.run_solve_steps();
        self.timestamps.last_solved_at = Some(self.service.context().now());
        result.map_err(|err| self.hook_failed(Phase::Solve, err))
    }

    /// Runs the solve steps, awaiting each step in turn.
    pub async fn solve_async(&mut self) -> Result<(), ViewError> {
        let result = self.run_solve_steps_async().await;
        if self.service.is_noisy(2) {
            tracing::trace!(view = %self.service, "solveAsync() complete.");
        }
        self.timestamps.last_solved_at = Some(self.service.context().now());
        result.map_err(|err| self.hook_failed(Phase::Solve, err))
    }

    /// Renders a renderable and assigns the content to its destination.
    ///
    /// Each argument overrides the matching part of the renderable; `None`
    /// falls back to the renderable's own configuration and then to the view
    /// defaults. Returns the rendered content.
    pub fn render(
        &mut self,
        renderable: Option<&str>,
        destination: Option<&str>,
        data_address: Option<&str>,
    ) -> Result<String, ViewError> {
        let job = self.begin_render(renderable, destination, data_address)?;
        let rendered = self
            .service
            .context()
            .templates()
            .render(&job.renderable.template_hash, job.data.as_ref());

        match rendered {
            Ok(content) => Ok(self.finish_render(job, content)),
            Err(source) => Err(self.template_failed(&job, source)),
        }
    }

    /// Renders through the template provider's async path.
    pub async fn render_async(
        &mut self,
        renderable: Option<&str>,
        destination: Option<&str>,
        data_address: Option<&str>,
    ) -> Result<String, ViewError> {
        let job = self.begin_render(renderable, destination, data_address)?;
        let rendered = self
            .service
            .context()
            .templates()
            .render_async(&job.renderable.template_hash, job.data.as_ref())
            .await;

        match rendered {
            Ok(content) => Ok(self.finish_render(job, content)),
            Err(source) => Err(self.template_failed(&job, source)),
        }
    }

    fn run_initialize_steps(&mut self) -> HookResult {
        self.hooks.on_before_initialize(&self.service)?;
        self.hooks.on_initialize(&self.service)?;
        self.hooks.on_after_initialize(&self.service)
    }

    async fn run_initialize_steps_async(&mut self) -> HookResult {
        self.hooks.on_before_initialize_async(&self.service).await?;
        self.hooks.on_initialize_async(&self.service).await?;
        self.hooks.on_after_initialize_async(&self.service).await
    }

    fn run_solve_steps(&mut self) -> HookResult {
        self.hooks.on_before_solve(&self.service)?;
        self.hooks.on_solve(&self.service)?;
        self.hooks.on_after_solve(&self.service)
    }

    async fn run_solve_steps_async(&mut self) -> HookResult {
        self.hooks.on_before_solve_async(&self.service).await?;
        self.hooks.on_solve_async(&self.service).await?;
        self.hooks.on_after_solve_async(&self.service).await
    }

    /// Resolves the render, fetches its data and runs the before-render hook.
    fn begin_render(
        &mut self,
        renderable: Option<&str>,
        destination: Option<&str>,
        data_address: Option<&str>,
    ) -> Result<RenderJob, ViewError> {
        let plan = match resolve::plan(
            self.service.identifier(),
            self.service.options(),
            &self.renderables,
            renderable,
            destination,
            data_address,
        ) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::error!(view = %self.service, requested = ?renderable, "{}", err);
                return Err(err);
            }
        };

        let data = plan
            .data_address
            .and_then(|address| self.service.context().data().get_data_by_address(address));
        let mut job = RenderJob {
            renderable: plan.renderable.clone(),
            destination: plan.destination.to_string(),
            data,
        };

        self.hooks.on_before_render(
            &self.service,
            &job.renderable,
            &job.destination,
            &mut job.data,
        );
        Ok(job)
    }

    /// Assigns the content, runs the after-render hook and stamps the render.
    fn finish_render(&mut self, job: RenderJob, content: String) -> String {
        self.service
            .context()
            .content()
            .assign_content(&job.destination, &content);
        self.hooks.on_after_render(
            &self.service,
            &job.renderable,
            &job.destination,
            job.data.as_ref(),
            &content,
        );
        self.timestamps.last_rendered_at = Some(self.service.context().now());
        content
    }

    fn template_failed(&self, job: &RenderJob, source: RenderError) -> ViewError {
        tracing::error!(
            view = %self.service,
            renderable = %job.renderable.renderable_hash,
            template = %job.renderable.template_hash,
            error = %source,
            "could not render because it did not parse the template."
        );
        ViewError::TemplateRender {
            view: self.service.identifier().to_string(),
            renderable: job.renderable.renderable_hash.clone(),
            template: job.renderable.template_hash.clone(),
            source,
        }
    }

    fn hook_failed(&self, phase: Phase, err: HookError) -> ViewError {
        tracing::error!(view = %self.service, phase = %phase, error = %err, "lifecycle step failed");
        ViewError::Hook(err)
    }

    fn already_initialized(&self) -> ViewError {
        ViewError::AlreadyInitialized {
            view: self.service.identifier().to_string(),
        }
    }
}

/// Registers the view's templates and default templates with the provider.
fn register_templates(service: &ViewService) -> Vec<ConfigurationError> {
    let templates = service.context().templates();
    let mut skipped = Vec::new();

    for (index, definition) in service.options().templates.iter().enumerate() {
        let (hash, template) = match definition.validate(index) {
            Ok(valid) => valid,
            Err(err) => {
                skipped.push(err);
                continue;
            }
        };
        let source = definition
            .source
            .clone()
            .unwrap_or_else(|| service.default_source());
        if let Err(err) = templates.add_template(hash, template, &source) {
            skipped.push(ConfigurationError::TemplateRejected {
                name: hash.to_string(),
                message: err.to_string(),
            });
        }
    }

    for (index, definition) in service.options().default_templates.iter().enumerate() {
        let (prefix, postfix, template) = match definition.validate(index) {
            Ok(valid) => valid,
            Err(err) => {
                skipped.push(err);
                continue;
            }
        };
        let source = definition
            .source
            .clone()
            .unwrap_or_else(|| service.default_source());
        if let Err(err) = templates.add_default_template(prefix, postfix, template, &source) {
            skipped.push(ConfigurationError::TemplateRejected {
                name: format!("{}*{}", prefix, postfix),
                message: err.to_string(),
            });
        }
    }

    skipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Clock;
    use crate::hooks::{Hooks, LifecycleStep};
    use crate::memory::{MemoryContent, MemoryData};
    use crate::options::{DefaultTemplateDefinition, RenderableDefinition, TemplateDefinition};
    use chrono::{Duration, TimeZone, Utc};
    use pict_template::{MiniJinjaProvider, TemplateProvider};
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Advances one second per reading.
    struct TickingClock(Cell<i64>);

    impl Clock for TickingClock {
        fn now(&self) -> Timestamp {
            let tick = self.0.get();
            self.0.set(tick + 1);
            Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(tick)
        }
    }

    struct Fixture {
        content: Rc<MemoryContent>,
        data: Rc<MemoryData>,
        templates: Rc<MiniJinjaProvider>,
        context: ViewContext,
    }

    fn fixture() -> Fixture {
        let content = Rc::new(MemoryContent::new());
        let data = Rc::new(MemoryData::new());
        let templates = Rc::new(MiniJinjaProvider::new());
        let context = ViewContext::builder()
            .content(content.clone())
            .data(data.clone())
            .templates(templates.clone())
            .clock(Rc::new(TickingClock(Cell::new(0))))
            .build();
        Fixture {
            content,
            data,
            templates,
            context,
        }
    }

    fn recording_hooks(log: &Rc<RefCell<Vec<LifecycleStep>>>) -> Hooks {
        let mut hooks = Hooks::new();
        for step in [
            LifecycleStep::BeforeInitialize,
            LifecycleStep::Initialize,
            LifecycleStep::AfterInitialize,
            LifecycleStep::BeforeSolve,
            LifecycleStep::Solve,
            LifecycleStep::AfterSolve,
        ] {
            let log = log.clone();
            hooks = hooks.on(step, move |_| {
                log.borrow_mut().push(step);
                Ok(())
            });
        }
        hooks
    }

    #[test]
    fn test_construction_registers_templates() {
        let fx = fixture();
        let options = ViewOptions::new()
            .identifier("Catalog")
            .template(TemplateDefinition::new("Catalog-Main", "main"))
            .template(TemplateDefinition::new("Catalog-Sourced", "x").with_source("custom"))
            .default_template(DefaultTemplateDefinition::new("", "-Row", "row"));
        let view = View::new(fx.context.clone(), options);

        assert!(view.configuration_errors().is_empty());
        assert!(fx.templates.has_template("Catalog-Main"));
        assert!(fx.templates.has_template("Books-Row"));
        assert_eq!(
            fx.templates.template_source("Catalog-Sourced").as_deref(),
            Some("custom")
        );
        let generated = fx.templates.template_source("Catalog-Main").unwrap();
        assert!(generated.contains("Catalog"));
        assert!(generated.ends_with("options object."));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let fx = fixture();
        let options = ViewOptions::new()
            .template(TemplateDefinition {
                hash: Some("NoBody".into()),
                ..Default::default()
            })
            .template(TemplateDefinition::new("Broken", "{{ unclosed"))
            .default_template(DefaultTemplateDefinition {
                template: Some("x".into()),
                ..Default::default()
            })
            .renderable(RenderableDefinition {
                renderable_hash: Some("Orphan".into()),
                ..Default::default()
            })
            .renderable(RenderableDefinition::new("Kept", "T"));
        let view = View::new(fx.context.clone(), options);

        assert_eq!(view.configuration_errors().len(), 4);
        assert!(matches!(
            view.configuration_errors()[1],
            ConfigurationError::TemplateRejected { .. }
        ));
        assert!(view.renderable("Orphan").is_none());
        assert!(view.renderable("Kept").is_some());
        assert!(!fx.templates.has_template("NoBody"));
    }

    #[test]
    fn test_initialize_runs_once() {
        let fx = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut view = View::with_hooks(fx.context.clone(), ViewOptions::new(), recording_hooks(&log));

        assert!(view.initialize().is_ok());
        let first = view.initialized_at();
        assert!(first.is_some());

        let err = view.initialize().unwrap_err();
        assert!(matches!(err, ViewError::AlreadyInitialized { .. }));
        assert_eq!(view.initialized_at(), first);
        assert_eq!(
            *log.borrow(),
            vec![
                LifecycleStep::BeforeInitialize,
                LifecycleStep::Initialize,
                LifecycleStep::AfterInitialize,
            ]
        );
    }

    #[test]
    fn test_failed_initialize_can_be_retried() {
        let fx = fixture();
        let attempts = Rc::new(Cell::new(0));
        let counter = attempts.clone();
        let hooks = Hooks::new().on(LifecycleStep::Initialize, move |_| {
            counter.set(counter.get() + 1);
            if counter.get() == 1 {
                Err(HookError::new(LifecycleStep::Initialize, "not ready"))
            } else {
                Ok(())
            }
        });
        let mut view = View::with_hooks(fx.context.clone(), ViewOptions::new(), hooks);

        assert!(matches!(view.initialize(), Err(ViewError::Hook(_))));
        assert!(!view.is_initialized());
        assert!(view.initialize().is_ok());
        assert!(view.is_initialized());
    }

    #[test]
    fn test_solve_updates_timestamp_every_call() {
        let fx = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut view = View::with_hooks(fx.context.clone(), ViewOptions::new(), recording_hooks(&log));

        let mut previous = None;
        for _ in 0..3 {
            view.solve().unwrap();
            let current = view.last_solved_at();
            assert!(current.is_some());
            assert!(current > previous);
            previous = current;
        }
        assert_eq!(log.borrow().len(), 9);
        assert!(view.initialized_at().is_none());
    }

    #[test]
    fn test_solve_failure_short_circuits_but_stamps() {
        let fx = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        let after = log.clone();
        let hooks = Hooks::new()
            .on(LifecycleStep::BeforeSolve, |_| {
                Err(HookError::new(LifecycleStep::BeforeSolve, "stale"))
            })
            .on(LifecycleStep::AfterSolve, move |_| {
                after.borrow_mut().push("after");
                Ok(())
            });
        let mut view = View::with_hooks(fx.context.clone(), ViewOptions::new(), hooks);

        let err = view.solve().unwrap_err();
        match err {
            ViewError::Hook(hook) => assert_eq!(hook.step, LifecycleStep::BeforeSolve),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(log.borrow().is_empty());
        assert!(view.last_solved_at().is_some());
    }

    #[test]
    fn test_render_greeting() {
        let fx = fixture();
        let options = ViewOptions::new()
            .template(TemplateDefinition::new("T1", "Hello"))
            .renderable(RenderableDefinition::new("Greeting", "T1").destination("#out"));
        let mut view = View::new(fx.context.clone(), options);

        let content = view.render(Some("Greeting"), None, None).unwrap();
        assert_eq!(content, "Hello");
        assert_eq!(
            fx.content.assignments(),
            vec![("#out".to_string(), "Hello".to_string())]
        );
        assert!(view.last_rendered_at().is_some());
    }

    #[test]
    fn test_render_fetches_data_from_resolved_address() {
        let fx = fixture();
        fx.data
            .set_data_by_address("AppData.Book", json!({"Title": "Dune"}));
        fx.data
            .set_data_by_address("AppData.Other", json!({"Title": "Emma"}));
        let options = ViewOptions::new()
            .default_destination("#books")
            .template(TemplateDefinition::new("Book", "<b>{{ Title }}</b>"))
            .renderable(RenderableDefinition::new("Book", "Book").record_address("AppData.Book"));
        let mut view = View::new(fx.context.clone(), options);

        assert_eq!(view.render(Some("Book"), None, None).unwrap(), "<b>Dune</b>");
        assert_eq!(
            view.render(Some("Book"), Some("#other"), Some("AppData.Other"))
                .unwrap(),
            "<b>Emma</b>"
        );
        assert_eq!(fx.content.content("#books").as_deref(), Some("<b>Dune</b>"));
        assert_eq!(fx.content.content("#other").as_deref(), Some("<b>Emma</b>"));
    }

    #[test]
    fn test_render_missing_renderable_assigns_nothing() {
        let fx = fixture();
        let mut view = View::new(fx.context.clone(), ViewOptions::new().default_destination("#out"));

        let err = view.render(Some("missing-id"), None, None).unwrap_err();
        assert!(matches!(err, ViewError::RenderableNotFound { .. }));
        assert!(fx.content.assignments().is_empty());
        assert!(view.last_rendered_at().is_none());
    }

    #[test]
    fn test_render_template_error_skips_assignment_and_after_hook() {
        let fx = fixture();
        let after_calls = Rc::new(Cell::new(0));
        let counter = after_calls.clone();
        let hooks = Hooks::new().after_render(move |_, _, _, _, _| counter.set(counter.get() + 1));
        let options = ViewOptions::new()
            .renderable(RenderableDefinition::new("Ghost", "Unregistered").destination("#out"));
        let mut view = View::with_hooks(fx.context.clone(), options, hooks);

        let err = view.render(Some("Ghost"), None, None).unwrap_err();
        assert!(matches!(err, ViewError::TemplateRender { .. }));
        assert!(fx.content.assignments().is_empty());
        assert_eq!(after_calls.get(), 0);
    }

    #[test]
    fn test_before_render_can_reshape_data() {
        let fx = fixture();
        let hooks = Hooks::new().before_render(|_, _, _, data| {
            *data = Some(json!({"Name": "from hook"}));
        });
        let options = ViewOptions::new()
            .template(TemplateDefinition::new("Name", "{{ Name }}"))
            .renderable(RenderableDefinition::new("Name", "Name").destination("#name"));
        let mut view = View::with_hooks(fx.context.clone(), options, hooks);

        assert_eq!(view.render(Some("Name"), None, None).unwrap(), "from hook");
    }

    #[test]
    fn test_after_render_sees_content_and_destination() {
        let fx = fixture();
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let hooks = Hooks::new().after_render(move |_, renderable, destination, _, content| {
            *sink.borrow_mut() = Some((
                renderable.renderable_hash.clone(),
                destination.to_string(),
                content.to_string(),
            ));
        });
        let options = ViewOptions::new()
            .default_renderable("Main")
            .default_destination("#main")
            .template(TemplateDefinition::new("Main-T", "main body"))
            .renderable(RenderableDefinition::new("Main", "Main-T"));
        let mut view = View::with_hooks(fx.context.clone(), options, hooks);

        view.render(None, None, None).unwrap();
        assert_eq!(
            *seen.borrow(),
            Some(("Main".into(), "#main".into(), "main body".into()))
        );
    }

    #[test]
    fn test_manifest_lookup() {
        let fx = fixture();
        let options = ViewOptions::new().manifest("Book", json!({"Scope": "Book"}));
        let view = View::new(fx.context.clone(), options);
        assert_eq!(view.manifest("Book"), Some(&json!({"Scope": "Book"})));
        assert!(view.manifest("Author").is_none());
    }

    #[tokio::test]
    async fn test_initialize_async_reentry_is_ok() {
        let fx = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut view = View::with_hooks(fx.context.clone(), ViewOptions::new(), recording_hooks(&log));

        view.initialize_async().await.unwrap();
        let first = view.initialized_at();
        assert!(first.is_some());

        view.initialize_async().await.unwrap();
        assert_eq!(view.initialized_at(), first);
        assert_eq!(log.borrow().len(), 3);

        // The sync path still refuses.
        assert!(view.initialize().is_err());
    }

    #[tokio::test]
    async fn test_solve_async_runs_steps_in_order() {
        let fx = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut view = View::with_hooks(fx.context.clone(), ViewOptions::new(), recording_hooks(&log));

        view.solve_async().await.unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                LifecycleStep::BeforeSolve,
                LifecycleStep::Solve,
                LifecycleStep::AfterSolve,
            ]
        );
        assert!(view.last_solved_at().is_some());
    }

    #[tokio::test]
    async fn test_render_async_matches_sync() {
        let fx = fixture();
        let options = ViewOptions::new()
            .template(TemplateDefinition::new("T1", "Hello"))
            .renderable(RenderableDefinition::new("Greeting", "T1").destination("#out"));
        let mut view = View::new(fx.context.clone(), options);

        let sync = view.render(Some("Greeting"), None, None).unwrap();
        let stamped = view.last_rendered_at();
        let async_content = view.render_async(Some("Greeting"), None, None).await.unwrap();

        assert_eq!(sync, async_content);
        assert_eq!(fx.content.assignment_count("#out"), 2);
        assert!(view.last_rendered_at() > stamped);
    }
}
