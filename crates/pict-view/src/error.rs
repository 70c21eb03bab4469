//! Error types for views.
//!
//! Two families exist:
//!
//! - [`ConfigurationError`]: a malformed entry in [`ViewOptions`](crate::ViewOptions).
//!   These are logged and collected during construction but never returned,
//!   so a view with a bad entry still builds.
//! - [`ViewError`]: a lifecycle or render call that could not complete. These
//!   are returned to the caller, who decides whether they are fatal.

use pict_template::RenderError;
use thiserror::Error;

use crate::hooks::HookError;

/// A configuration entry that was skipped while constructing a view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A template entry lacks its `Hash` or `Template`.
    #[error("could not load Template {index} in the options array: missing {field}")]
    Template { index: usize, field: &'static str },

    /// A default template entry lacks its `Postfix` or `Template`.
    #[error("could not load Default Template {index} in the options array: missing {field}")]
    DefaultTemplate { index: usize, field: &'static str },

    /// A renderable entry lacks its `RenderableHash` or `TemplateHash`.
    #[error("could not load Renderable {index} in the options array: missing {field}")]
    Renderable { index: usize, field: &'static str },

    /// The template provider refused a template body.
    #[error("template provider rejected template {name}: {message}")]
    TemplateRejected { name: String, message: String },
}

/// Error returned by view lifecycle and render operations.
#[derive(Debug, Error)]
pub enum ViewError {
    /// No renderable hash was given and the view has no default renderable.
    #[error("view {view} could not render {requested:?}: it is not a valid renderable")]
    InvalidRenderable {
        view: String,
        requested: Option<String>,
    },

    /// The renderable hash is not in the view's renderable map.
    #[error("view {view} could not render {renderable}: it does not exist")]
    RenderableNotFound { view: String, renderable: String },

    /// Neither the call, the renderable nor the view supplies a destination.
    #[error("view {view} could not render {renderable}: it does not have a valid destination address")]
    NoDestinationAddress { view: String, renderable: String },

    /// The template provider failed to produce content.
    #[error("view {view} could not render {renderable}: template {template} failed")]
    TemplateRender {
        view: String,
        renderable: String,
        template: String,
        #[source]
        source: RenderError,
    },

    /// `initialize` was called on an initialized view.
    #[error("view {view} initialize called but initialization is already completed")]
    AlreadyInitialized { view: String },

    /// A lifecycle hook failed.
    #[error(transparent)]
    Hook(#[from] HookError),
}

impl ViewError {
    /// Returns true for errors raised while resolving what to render.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            ViewError::InvalidRenderable { .. }
                | ViewError::RenderableNotFound { .. }
                | ViewError::NoDestinationAddress { .. }
        )
    }
}
