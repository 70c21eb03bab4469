//! # Pict View - phased lifecycle and render orchestration
//!
//! A view owns a set of templates and *renderables*: named instructions that
//! bind a template to a destination address and a data address. It runs
//! through three phases:
//!
//! - **initialize**, once
//! - **solve**, any number of times, before rendering
//! - **render**, which resolves a renderable, fetches its data, renders the
//!   template and assigns the content to the destination
//!
//! Each phase calls into [`ViewHooks`], sync or async, and records a
//! completion timestamp.
//!
//! The view never touches a global application. It works through the narrow
//! collaborators of a [`ViewContext`]: a [`TemplateProvider`], a
//! [`DataProvider`] and a [`ContentAssignment`] sink, plus a clock and an id
//! source. In-memory versions of all of them are the defaults.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use pict_view::{
//!     Hooks, LifecycleStep, MemoryContent, MemoryData, RenderableDefinition,
//!     TemplateDefinition, View, ViewContext, ViewOptions,
//! };
//! use serde_json::json;
//!
//! let data = Rc::new(MemoryData::new());
//! data.set_data_by_address("AppData.User", json!({"Name": "Ada"}));
//! let content = Rc::new(MemoryContent::new());
//!
//! let context = ViewContext::builder()
//!     .data(data.clone())
//!     .content(content.clone())
//!     .build();
//!
//! let options = ViewOptions::new()
//!     .identifier("Welcome")
//!     .default_renderable("Welcome-Banner")
//!     .default_destination("#banner")
//!     .template(TemplateDefinition::new("Welcome-Banner-T", "Hi {{ Name }}"))
//!     .renderable(
//!         RenderableDefinition::new("Welcome-Banner", "Welcome-Banner-T")
//!             .record_address("AppData.User"),
//!     );
//!
//! let hooks = Hooks::new().on(LifecycleStep::Solve, |view| {
//!     println!("solving {}", view.identifier());
//!     Ok(())
//! });
//!
//! let mut view = View::with_hooks(context, options, hooks);
//! view.initialize().unwrap();
//! view.solve().unwrap();
//! view.render(None, None, None).unwrap();
//!
//! assert_eq!(content.content("#banner").as_deref(), Some("Hi Ada"));
//! ```
//!
//! ## Configuration
//!
//! [`ViewOptions`] deserializes from JSON or YAML with PascalCase keys; see
//! the [`options`] module. Malformed entries are skipped and reported through
//! [`View::configuration_errors`].
//!
//! ## Hosts
//!
//! Hosts that manage many views keep them as `Box<dyn Lifecycle>` and drive
//! each phase with [`run_auto_phase`], which honors the `Auto*` options.

mod context;
mod error;
mod hooks;
mod lifecycle;
mod memory;
pub mod options;
mod renderable;
pub mod resolve;
mod service;
mod view;

pub use context::{
    Clock, ContentAssignment, DataProvider, IdGenerator, SystemClock, Timestamp, UuidGenerator,
    ViewContext, ViewContextBuilder,
};
pub use error::{ConfigurationError, ViewError};
pub use hooks::{
    AfterRenderFn, BeforeRenderFn, DefaultHooks, HookError, HookResult, Hooks, LifecycleStep,
    Phase, StepFn, ViewHooks,
};
pub use lifecycle::{auto_order, run_auto_phase, AutoPhaseFailure, Lifecycle};
pub use memory::{MemoryContent, MemoryData};
pub use options::{DefaultTemplateDefinition, RenderableDefinition, TemplateDefinition, ViewOptions};
pub use renderable::{collect_renderables, Renderable, RenderableMap};
pub use resolve::RenderPlan;
pub use service::{Service, ViewService};
pub use view::{LifecycleTimestamps, View, ViewBuilder};

// Re-export the template side so hosts need a single dependency.
pub use pict_template::{MiniJinjaProvider, RenderError, TemplateProvider};
