//! Render output: pagination plans and the reconciler that applies them

mod plan;
mod reconcile;

pub use plan::{
    Band, BandKind, BreakRegion, Decoration, FillerRegion, PaginationPlan, PlanSignature, Side,
};
pub use reconcile::Reconciler;
