//! Renderable resolution.
//!
//! A render call names up to three things: the renderable, the destination
//! address and the data address. Each is resolved through the same tiers:
//!
//! ```text
//! explicit argument → renderable's own configuration → view default
//! ```
//!
//! The first tier that provides a value wins, even if that value is empty. An
//! empty renderable hash or destination then fails; an empty data address means
//! no data is fetched.

use crate::error::ViewError;
use crate::options::ViewOptions;
use crate::renderable::{Renderable, RenderableMap};

/// Everything a render needs once resolution succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPlan<'a> {
    pub renderable: &'a Renderable,
    pub destination: &'a str,
    /// `None` means the render proceeds without data.
    pub data_address: Option<&'a str>,
}

/// Returns the first provided tier.
pub fn resolve_address<'a>(
    explicit: Option<&'a str>,
    own: Option<&'a str>,
    default: Option<&'a str>,
) -> Option<&'a str> {
    explicit.or(own).or(default)
}

/// Resolves the renderable hash: argument, then the view default.
pub fn resolve_renderable_hash<'a>(
    requested: Option<&'a str>,
    options: &'a ViewOptions,
) -> Option<&'a str> {
    requested
        .or(options.default_renderable.as_deref())
        .filter(|hash| !hash.is_empty())
}

/// Resolves the destination address for `renderable`.
pub fn resolve_destination<'a>(
    explicit: Option<&'a str>,
    renderable: &'a Renderable,
    options: &'a ViewOptions,
) -> Option<&'a str> {
    resolve_address(
        explicit,
        renderable.content_destination_address.as_deref(),
        options.default_destination_address.as_deref(),
    )
    .filter(|address| !address.is_empty())
}

/// Resolves the data address for `renderable`; `None` skips the data fetch.
pub fn resolve_data_address<'a>(
    explicit: Option<&'a str>,
    renderable: &'a Renderable,
    options: &'a ViewOptions,
) -> Option<&'a str> {
    resolve_address(
        explicit,
        renderable.record_address.as_deref(),
        options.default_template_record_address.as_deref(),
    )
    .filter(|address| !address.is_empty())
}

/// Resolves a render request against a view's options and renderables.
///
/// `view` names the view in returned errors.
pub fn plan<'a>(
    view: &str,
    options: &'a ViewOptions,
    renderables: &'a RenderableMap,
    renderable: Option<&'a str>,
    destination: Option<&'a str>,
    data_address: Option<&'a str>,
) -> Result<RenderPlan<'a>, ViewError> {
    let hash = resolve_renderable_hash(renderable, options).ok_or_else(|| {
        ViewError::InvalidRenderable {
            view: view.to_string(),
            requested: renderable.map(str::to_string),
        }
    })?;

    let found = renderables
        .get(hash)
        .ok_or_else(|| ViewError::RenderableNotFound {
            view: view.to_string(),
            renderable: hash.to_string(),
        })?;

    let destination = resolve_destination(destination, found, options).ok_or_else(|| {
        ViewError::NoDestinationAddress {
            view: view.to_string(),
            renderable: hash.to_string(),
        }
    })?;

    Ok(RenderPlan {
        renderable: found,
        destination,
        data_address: resolve_data_address(data_address, found, options),
    })
}
