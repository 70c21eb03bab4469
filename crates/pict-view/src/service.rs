//! Service identity shared by a view and its hooks.

use std::fmt;

use crate::context::ViewContext;
use crate::options::ViewOptions;

/// Identity every service of a host application carries.
pub trait Service {
    /// Unique instance identifier.
    fn uuid(&self) -> &str;
    /// The hash the host registered the service under.
    fn hash(&self) -> &str;
    fn service_type(&self) -> &'static str;
}

/// Identity, configuration and collaborators of one view.
///
/// This is what hooks receive: enough to log, read the options and reach the
/// collaborators, without access to the view's mutable lifecycle state.
#[derive(Debug, Clone)]
pub struct ViewService {
    uuid: String,
    hash: String,
    identifier: String,
    options: ViewOptions,
    context: ViewContext,
}

impl ViewService {
    /// Creates the service identity; `hash` defaults to the generated uuid
    /// and a missing or empty identifier to `AutoViewID-<uuid>`.
    pub fn new(context: ViewContext, options: ViewOptions, hash: Option<String>) -> Self {
        let uuid = context.new_id();
        let hash = hash.unwrap_or_else(|| uuid.clone());
        let identifier = options
            .view_identifier
            .clone()
            .filter(|identifier| !identifier.is_empty())
            .unwrap_or_else(|| format!("AutoViewID-{}", context.new_id()));

        Self {
            uuid,
            hash,
            identifier,
            options,
            context,
        }
    }

    /// The view identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    /// Returns true when the host's noisiness is above `level`.
    pub fn is_noisy(&self, level: u8) -> bool {
        self.context.log_noisiness() > level
    }

    /// Source label for templates whose definition carries none.
    pub fn default_source(&self) -> String {
        format!("{} options object.", self)
    }
}

impl Service for ViewService {
    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn hash(&self) -> &str {
        &self.hash
    }

    fn service_type(&self) -> &'static str {
        "PictView"
    }
}

impl fmt::Display for ViewService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]::[{}] {}",
            self.service_type(),
            self.uuid,
            self.hash,
            self.identifier
        )
    }
}
