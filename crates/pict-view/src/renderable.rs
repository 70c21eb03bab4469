//! Renderables: named, reusable render instructions.
//!
//! A renderable binds a template hash to an optional destination and an
//! optional data address, so that `render("ContentEntry")` is all a caller
//! needs. Any address can still be overridden per call.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::ConfigurationError;
use crate::options::RenderableDefinition;

/// A validated renderable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Renderable {
    pub renderable_hash: String,
    pub template_hash: String,
    pub content_destination_address: Option<String>,
    pub record_address: Option<String>,
    /// Manifest applied by an external collaborator before rendering.
    pub manifest_transformation: Option<String>,
    pub manifest_destination_address: Option<String>,
}

impl Renderable {
    /// Validates a configuration entry; `index` is its position in the options.
    pub fn from_definition(
        definition: &RenderableDefinition,
        index: usize,
    ) -> Result<Self, ConfigurationError> {
        let missing = |field| ConfigurationError::Renderable { index, field };
        let renderable_hash = definition
            .renderable_hash
            .clone()
            .ok_or_else(|| missing("RenderableHash"))?;
        let template_hash = definition
            .template_hash
            .clone()
            .ok_or_else(|| missing("TemplateHash"))?;

        Ok(Self {
            renderable_hash,
            template_hash,
            content_destination_address: definition.content_destination_address.clone(),
            record_address: definition.record_address.clone(),
            manifest_transformation: definition.manifest_transformation.clone(),
            manifest_destination_address: definition.manifest_destination_address.clone(),
        })
    }
}

/// Renderables keyed by hash.
pub type RenderableMap = HashMap<String, Renderable>;

/// Builds the renderable map, returning skipped entries alongside it.
///
/// Later definitions replace earlier ones with the same hash.
pub fn collect_renderables(
    definitions: &[RenderableDefinition],
) -> (RenderableMap, Vec<ConfigurationError>) {
    let mut renderables = RenderableMap::new();
    let mut skipped = Vec::new();

    for (index, definition) in definitions.iter().enumerate() {
        match Renderable::from_definition(definition, index) {
            Ok(renderable) => {
                renderables.insert(renderable.renderable_hash.clone(), renderable);
            }
            Err(err) => skipped.push(err),
        }
    }

    (renderables, skipped)
}
