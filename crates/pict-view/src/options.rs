//! View configuration.
//!
//! [`ViewOptions`] is the construction-time configuration of a view. It
//! deserializes from JSON or YAML using PascalCase keys:
//!
//! ```rust
//! use pict_view::ViewOptions;
//!
//! let options = ViewOptions::from_yaml(r##"
//! ViewIdentifier: Catalog
//! DefaultRenderable: Catalog-List
//! DefaultDestinationAddress: "#Catalog"
//! DefaultTemplateRecordAddress: false
//! Templates:
//!   - Hash: Catalog-List-Template
//!     Template: "<ul>{{ record }}</ul>"
//! Renderables:
//!   - RenderableHash: Catalog-List
//!     TemplateHash: Catalog-List-Template
//!     RecordAddress: AppData.Catalog
//! "##).unwrap();
//!
//! assert_eq!(options.view_identifier.as_deref(), Some("Catalog"));
//! assert_eq!(options.default_destination_address.as_deref(), Some("#Catalog"));
//! // `false` means "not provided"
//! assert_eq!(options.default_template_record_address, None);
//! assert_eq!(options.renderables.len(), 1);
//! ```
//!
//! Identifier and address fields are lenient: any non-string value (`false`,
//! a number, `null`) is read as "not provided", which lets configuration
//! disable a default explicitly.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigurationError;
use crate::hooks::Phase;

/// Reads a string, treating any other value as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

fn enabled() -> bool {
    true
}

/// Construction-time configuration of a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ViewOptions {
    /// View identifier; generated as `AutoViewID-<uuid>` when absent.
    #[serde(default, deserialize_with = "lenient_string")]
    pub view_identifier: Option<String>,

    /// Renderable used when `render` is called without one.
    #[serde(default, deserialize_with = "lenient_string")]
    pub default_renderable: Option<String>,

    /// Destination used when neither the call nor the renderable names one.
    #[serde(default, deserialize_with = "lenient_string")]
    pub default_destination_address: Option<String>,

    /// Data address used when neither the call nor the renderable names one.
    #[serde(default, deserialize_with = "lenient_string")]
    pub default_template_record_address: Option<String>,

    /// Whether the host initializes this view with the application.
    #[serde(default = "enabled")]
    pub auto_initialize: bool,
    #[serde(default)]
    pub auto_initialize_ordinal: i32,

    /// Whether the host renders this view when the application renders.
    #[serde(default = "enabled")]
    pub auto_render: bool,
    #[serde(default)]
    pub auto_render_ordinal: i32,

    /// Whether the host solves this view when the application solves.
    #[serde(default = "enabled")]
    pub auto_solve_with_app: bool,
    #[serde(default)]
    pub auto_solve_ordinal: i32,

    #[serde(default)]
    pub templates: Vec<TemplateDefinition>,

    #[serde(default)]
    pub default_templates: Vec<DefaultTemplateDefinition>,

    #[serde(default)]
    pub renderables: Vec<RenderableDefinition>,

    /// Manifest transformation definitions by name.
    #[serde(default)]
    pub manifests: HashMap<String, serde_json::Value>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            view_identifier: None,
            default_renderable: None,
            default_destination_address: None,
            default_template_record_address: None,
            auto_initialize: true,
            auto_initialize_ordinal: 0,
            auto_render: true,
            auto_render_ordinal: 0,
            auto_solve_with_app: true,
            auto_solve_ordinal: 0,
            templates: Vec::new(),
            default_templates: Vec::new(),
            renderables: Vec::new(),
            manifests: HashMap::new(),
        }
    }
}

impl ViewOptions {
    /// Creates options with every default in place.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parses options from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Sets the view identifier.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.view_identifier = Some(identifier.into());
        self
    }

    /// Sets the default renderable.
    pub fn default_renderable(mut self, hash: impl Into<String>) -> Self {
        self.default_renderable = Some(hash.into());
        self
    }

    /// Sets the default destination address.
    pub fn default_destination(mut self, address: impl Into<String>) -> Self {
        self.default_destination_address = Some(address.into());
        self
    }

    /// Sets the default data address.
    pub fn default_record_address(mut self, address: impl Into<String>) -> Self {
        self.default_template_record_address = Some(address.into());
        self
    }

    /// Appends a template definition.
    pub fn template(mut self, definition: TemplateDefinition) -> Self {
        self.templates.push(definition);
        self
    }

    /// Appends a default template definition.
    pub fn default_template(mut self, definition: DefaultTemplateDefinition) -> Self {
        self.default_templates.push(definition);
        self
    }

    /// Appends a renderable definition.
    pub fn renderable(mut self, definition: RenderableDefinition) -> Self {
        self.renderables.push(definition);
        self
    }

    /// The host ordinal for `phase`, or `None` when the view opted out.
    pub fn auto_ordinal(&self, phase: Phase) -> Option<i32> {
        let (enabled, ordinal) = match phase {
            Phase::Initialize => (self.auto_initialize, self.auto_initialize_ordinal),
            Phase::Solve => (self.auto_solve_with_app, self.auto_solve_ordinal),
            Phase::Render => (self.auto_render, self.auto_render_ordinal),
        };
        enabled.then_some(ordinal)
    }

    /// Adds a manifest definition.
    pub fn manifest(mut self, name: impl Into<String>, definition: serde_json::Value) -> Self {
        self.manifests.insert(name.into(), definition);
        self
    }
}

/// A template entry: `{Hash, Template, Source}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateDefinition {
    #[serde(default, deserialize_with = "lenient_string")]
    pub hash: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub template: Option<String>,
    /// Where the template came from; generated when absent.
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: Option<String>,
}

impl TemplateDefinition {
    pub fn new(hash: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            hash: Some(hash.into()),
            template: Some(template.into()),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns `(hash, template)` or the missing field.
    pub fn validate(&self, index: usize) -> Result<(&str, &str), ConfigurationError> {
        let missing = |field| ConfigurationError::Template { index, field };
        let hash = self.hash.as_deref().ok_or_else(|| missing("Hash"))?;
        let template = self.template.as_deref().ok_or_else(|| missing("Template"))?;
        Ok((hash, template))
    }
}

/// A default template entry: `{Prefix, Postfix, Template, Source}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultTemplateDefinition {
    /// Hash prefix; empty when absent.
    #[serde(default, deserialize_with = "lenient_string")]
    pub prefix: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub postfix: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub template: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: Option<String>,
}

impl DefaultTemplateDefinition {
    pub fn new(
        prefix: impl Into<String>,
        postfix: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            prefix: Some(prefix.into()),
            postfix: Some(postfix.into()),
            template: Some(template.into()),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns `(prefix, postfix, template)` or the missing field.
    pub fn validate(&self, index: usize) -> Result<(&str, &str, &str), ConfigurationError> {
        let missing = |field| ConfigurationError::DefaultTemplate { index, field };
        let postfix = self.postfix.as_deref().ok_or_else(|| missing("Postfix"))?;
        let template = self.template.as_deref().ok_or_else(|| missing("Template"))?;
        Ok((self.prefix.as_deref().unwrap_or(""), postfix, template))
    }
}

/// A renderable entry as written in configuration.
///
/// Only `RenderableHash` and `TemplateHash` are required; see
/// [`Renderable`](crate::Renderable) for the validated form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RenderableDefinition {
    #[serde(default, deserialize_with = "lenient_string")]
    pub renderable_hash: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub template_hash: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content_destination_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub record_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub manifest_transformation: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub manifest_destination_address: Option<String>,
}

impl RenderableDefinition {
    pub fn new(renderable_hash: impl Into<String>, template_hash: impl Into<String>) -> Self {
        Self {
            renderable_hash: Some(renderable_hash.into()),
            template_hash: Some(template_hash.into()),
            ..Default::default()
        }
    }

    pub fn destination(mut self, address: impl Into<String>) -> Self {
        self.content_destination_address = Some(address.into());
        self
    }

    pub fn record_address(mut self, address: impl Into<String>) -> Self {
        self.record_address = Some(address.into());
        self
    }

    pub fn manifest_transformation(
        mut self,
        manifest: impl Into<String>,
        destination_address: impl Into<String>,
    ) -> Self {
        self.manifest_transformation = Some(manifest.into());
        self.manifest_destination_address = Some(destination_address.into());
        self
    }
}
