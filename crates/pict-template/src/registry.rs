//! Template registry with explicit and default (pattern) templates.
//!
//! The registry keeps two tiers:
//!
//! 1. Explicit templates, registered under an exact hash.
//! 2. Default templates, registered under a `prefix`/`postfix` pair. A default
//!    template answers for any hash that starts with its prefix and ends with
//!    its postfix, e.g. `{prefix: "", postfix: "-List-Row"}` serves
//!    `"Books-List-Row"` and `"Authors-List-Row"`.
//!
//! # Resolution
//!
//! Explicit templates always win. When no explicit template exists, the most
//! specific default applies: the one with the longest combined prefix and
//! postfix. Ties go to the default registered first.
//!
//! ```rust
//! use pict_template::{ResolvedTemplate, TemplateRegistry};
//!
//! let mut registry = TemplateRegistry::new();
//! registry.add_default_template("", "-List-Row", "<li>{{ record }}</li>", "defaults");
//! registry.add_template("Books-List-Row", "<li class=\"book\">{{ record }}</li>", "books");
//!
//! assert!(matches!(registry.resolve("Books-List-Row"), Ok(ResolvedTemplate::Explicit(_))));
//! assert!(matches!(registry.resolve("Authors-List-Row"), Ok(ResolvedTemplate::Default(_))));
//! assert!(registry.resolve("Authors-Detail").is_err());
//! ```

use std::collections::HashMap;
use std::fmt;

/// A template registered under an exact hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Template body
    pub template: String,
    /// Human-readable description of where the template came from
    pub source: String,
}

/// A fallback template matched by prefix/postfix convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultTemplate {
    /// Required hash prefix (may be empty)
    pub prefix: String,
    /// Required hash postfix (may be empty)
    pub postfix: String,
    /// Template body
    pub template: String,
    /// Human-readable description of where the template came from
    pub source: String,
}

impl DefaultTemplate {
    /// Returns true if this default template answers for `hash`.
    ///
    /// The prefix and postfix must not overlap inside the hash.
    pub fn matches(&self, hash: &str) -> bool {
        hash.len() >= self.prefix.len() + self.postfix.len()
            && hash.starts_with(&self.prefix)
            && hash.ends_with(&self.postfix)
    }

    fn specificity(&self) -> usize {
        self.prefix.len() + self.postfix.len()
    }
}

/// The outcome of resolving a hash against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTemplate<'a> {
    /// An explicit template registered under the exact hash.
    Explicit(&'a TemplateEntry),
    /// A default template whose prefix/postfix bracket the hash.
    Default(&'a DefaultTemplate),
}

impl<'a> ResolvedTemplate<'a> {
    /// Returns the template body.
    pub fn template(&self) -> &'a str {
        match self {
            ResolvedTemplate::Explicit(entry) => &entry.template,
            ResolvedTemplate::Default(default) => &default.template,
        }
    }

    /// Returns the source label.
    pub fn source(&self) -> &'a str {
        match self {
            ResolvedTemplate::Explicit(entry) => &entry.source,
            ResolvedTemplate::Default(default) => &default.source,
        }
    }
}

/// Error type for template registry lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Neither an explicit nor a default template matches the hash.
    NotFound {
        /// The hash that was requested
        hash: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotFound { hash } => write!(f, "Template not found: \"{}\"", hash),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Registry for template lookup by hash.
///
/// The registry is not thread-safe; providers that share it wrap it in a
/// `RefCell`.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, TemplateEntry>,
    defaults: Vec<DefaultTemplate>,
}

impl TemplateRegistry {
    /// Creates an empty template registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an explicit template.
    pub fn add_template(
        &mut self,
        hash: impl Into<String>,
        template: impl Into<String>,
        source: impl Into<String>,
    ) {
        self.templates.insert(
            hash.into(),
            TemplateEntry {
                template: template.into(),
                source: source.into(),
            },
        );
    }

    /// Adds a default template pattern.
    pub fn add_default_template(
        &mut self,
        prefix: impl Into<String>,
        postfix: impl Into<String>,
        template: impl Into<String>,
        source: impl Into<String>,
    ) {
        self.defaults.push(DefaultTemplate {
            prefix: prefix.into(),
            postfix: postfix.into(),
            template: template.into(),
            source: source.into(),
        });
    }

    /// Returns the explicit template registered under `hash`, if any.
    pub fn get(&self, hash: &str) -> Option<&TemplateEntry> {
        self.templates.get(hash)
    }

    /// Finds the most specific default template for `hash`.
    pub fn find_default(&self, hash: &str) -> Option<&DefaultTemplate> {
        let mut best: Option<&DefaultTemplate> = None;
        for default in self.defaults.iter().filter(|d| d.matches(hash)) {
            // Strictly greater keeps the earliest registration on ties.
            if best.map_or(true, |b| default.specificity() > b.specificity()) {
                best = Some(default);
            }
        }
        best
    }

    /// Resolves `hash` to an explicit template, falling back to defaults.
    pub fn resolve(&self, hash: &str) -> Result<ResolvedTemplate<'_>, RegistryError> {
        if let Some(entry) = self.templates.get(hash) {
            return Ok(ResolvedTemplate::Explicit(entry));
        }
        self.find_default(hash)
            .map(ResolvedTemplate::Default)
            .ok_or_else(|| RegistryError::NotFound {
                hash: hash.to_string(),
            })
    }

    /// Returns the source label of an explicit template.
    pub fn source(&self, hash: &str) -> Option<&str> {
        self.templates.get(hash).map(|entry| entry.source.as_str())
    }

    /// Returns the number of explicit templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if no explicit or default template is registered.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty() && self.defaults.is_empty()
    }
}
