//! Decoration reconciler: commits a plan only when it differs from the
//! applied one

use crate::render::{PaginationPlan, PlanSignature};

/// Owns the plan currently applied to one view.
///
/// Committing an unchanged plan would trigger a render, the render a
/// measurement, the measurement another commit; comparing signatures breaks
/// that cycle.
#[derive(Debug)]
pub struct Reconciler {
    applied: PaginationPlan,
    signature: PlanSignature,
    commits: u64,
}

impl Default for Reconciler {
    fn default() -> Self {
        let applied = PaginationPlan::default();
        Self {
            signature: applied.signature(),
            applied,
            commits: 0,
        }
    }
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The plan currently applied
    pub fn applied(&self) -> &PaginationPlan {
        &self.applied
    }

    pub fn signature(&self) -> &PlanSignature {
        &self.signature
    }

    /// Number of plans committed so far
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Whether `next` would replace the applied plan
    pub fn differs(&self, next: &PaginationPlan) -> bool {
        next.signature() != self.signature
    }

    /// Replace the applied plan if `next` differs.
    ///
    /// Returns the newly applied plan, or `None` if nothing changed.
    pub fn reconcile(&mut self, next: PaginationPlan) -> Option<&PaginationPlan> {
        let signature = next.signature();
        if signature == self.signature {
            return None;
        }

        log::debug!(
            "committing plan: {} break(s), filler {:?}",
            next.breaks.len(),
            next.filler.map(|f| f.height)
        );

        self.applied = next;
        self.signature = signature;
        self.commits += 1;
        Some(&self.applied)
    }

    /// Forget the applied plan, so the next non-empty plan commits
    pub fn reset(&mut self) {
        self.applied = PaginationPlan::default();
        self.signature = self.applied.signature();
    }
}
