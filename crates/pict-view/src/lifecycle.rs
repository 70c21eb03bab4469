//! Host-driven lifecycle.
//!
//! A host holds views of different hook types side by side as
//! `Box<dyn Lifecycle>` and drives a phase across all of them with
//! [`run_auto_phase`]. Views opt in per phase through their `Auto*` options and
//! are visited in ascending ordinal order.

use crate::error::ViewError;
use crate::hooks::{Phase, ViewHooks};
use crate::service::ViewService;
use crate::view::{LifecycleTimestamps, View};

/// Object-safe synchronous lifecycle of a view.
pub trait Lifecycle {
    fn service(&self) -> &ViewService;

    fn initialize(&mut self) -> Result<(), ViewError>;

    fn solve(&mut self) -> Result<(), ViewError>;

    fn render(
        &mut self,
        renderable: Option<&str>,
        destination: Option<&str>,
        data_address: Option<&str>,
    ) -> Result<String, ViewError>;

    fn timestamps(&self) -> LifecycleTimestamps;
}

impl<H: ViewHooks> Lifecycle for View<H> {
    fn service(&self) -> &ViewService {
        View::service(self)
    }

    fn initialize(&mut self) -> Result<(), ViewError> {
        View::initialize(self)
    }

    fn solve(&mut self) -> Result<(), ViewError> {
        View::solve(self)
    }

    fn render(
        &mut self,
        renderable: Option<&str>,
        destination: Option<&str>,
        data_address: Option<&str>,
    ) -> Result<String, ViewError> {
        View::render(self, renderable, destination, data_address)
    }

    fn timestamps(&self) -> LifecycleTimestamps {
        View::timestamps(self)
    }
}

/// A view that failed during [`run_auto_phase`].
#[derive(Debug)]
pub struct AutoPhaseFailure {
    /// Identifier of the failing view.
    pub view: String,
    pub error: ViewError,
}

/// Indices of the views opted into `phase`, in run order.
///
/// Views with equal ordinals keep their relative order.
pub fn auto_order(views: &[Box<dyn Lifecycle>], phase: Phase) -> Vec<usize> {
    let mut order: Vec<(i32, usize)> = views
        .iter()
        .enumerate()
        .filter_map(|(index, view)| {
            view.service()
                .options()
                .auto_ordinal(phase)
                .map(|ordinal| (ordinal, index))
        })
        .collect();
    order.sort_by_key(|(ordinal, _)| *ordinal);
    order.into_iter().map(|(_, index)| index).collect()
}

/// Runs `phase` on every opted-in view.
///
/// Render uses each view's default renderable. A failing view does not stop
/// the others; failures are returned in run order.
pub fn run_auto_phase(views: &mut [Box<dyn Lifecycle>], phase: Phase) -> Vec<AutoPhaseFailure> {
    let mut failures = Vec::new();

    for index in auto_order(views, phase) {
        let view = &mut views[index];
        let result = match phase {
            Phase::Initialize => view.initialize(),
            Phase::Solve => view.solve(),
            Phase::Render => view.render(None, None, None).map(|_| ()),
        };

        if let Err(error) = result {
            tracing::warn!(view = %view.service(), phase = %phase, "auto {} failed", phase);
            failures.push(AutoPhaseFailure {
                view: view.service().identifier().to_string(),
                error,
            });
        }
    }

    failures
}
