//! Paged-View: simulated page breaks for a continuously rendered document
//!
//! The document is rendered as one continuous column. This crate measures
//! the rendered blocks and plans non-content regions that make the column
//! look like fixed-size pages:
//! - Break regions before any block that would overflow its page
//! - A filler region so the last page reaches full height
//! - Correction accounting so re-measuring after a commit converges
//! - Frame-coalesced, signature-diffed recomputation

pub mod document;
mod error;
pub mod layout;
pub mod render;
pub mod scheduler;
pub mod view;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use document::{Block, BlockKind, ContentPos, Document};
pub use error::PaginationError;
pub use layout::{
    GeometryReader, OversizedBlockPolicy, PageGeometry, PaginationConfig, Planner, RenderedBlock,
};
pub use render::{BreakRegion, FillerRegion, PaginationPlan, PlanSignature, Reconciler};
pub use scheduler::{FrameHandle, FrameHost, ManualHost, Scheduler, SchedulerConfig, TimerHandle};
pub use view::{EditorView, SimulatedView, SurfaceStyle};

/// Surface rectangle, `y` grows downwards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Measurement passes run
    pub passes: u64,
    /// Passes whose plan was committed
    pub commits: u64,
    /// Blocks skipped because they were not mounted, summed over passes
    pub skipped_blocks: u64,
    /// Blocks measured in the latest pass
    pub last_block_count: usize,
}

/// The pagination engine: measures a view, plans regions and commits them
/// when they change
pub struct Paginator<V, H> {
    view: V,
    scheduler: Scheduler<H>,
    reader: GeometryReader,
    planner: Planner,
    reconciler: Reconciler,
    config: PaginationConfig,
    /// Commits in a row without an outside notification
    settle_passes: u32,
    stats: PassStats,
}

impl<V: EditorView, H: FrameHost> Paginator<V, H> {
    /// Create the engine and attach it to the view.
    ///
    /// Attaching observes surface resizes and arms the initial pass.
    pub fn new(view: V, host: H, config: PaginationConfig) -> Result<Self, PaginationError> {
        config.validate()?;

        let mut scheduler = Scheduler::new(host, config.scheduler);
        scheduler.attach();

        Ok(Self {
            view,
            scheduler,
            reader: GeometryReader::new(),
            planner: Planner::from_config(&config),
            reconciler: Reconciler::new(),
            config,
            settle_passes: 0,
            stats: PassStats::default(),
        })
    }

    /// The document changed structure or content
    pub fn notify_document_changed(&mut self) {
        self.settle_passes = 0;
        self.scheduler.request_pass();
    }

    /// The rendering surface changed size
    pub fn notify_surface_resized(&mut self) {
        self.settle_passes = 0;
        self.scheduler.surface_resized();
    }

    /// Frame callback from the host
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if !self.scheduler.begin_pass(handle) {
            log::trace!("ignoring frame {:?}", handle);
            return;
        }
        self.run_pass();
    }

    /// Timer callback from the host
    pub fn on_timer(&mut self, handle: TimerHandle) {
        self.scheduler.timer_fired(handle);
    }

    /// Release the resize observation and every pending callback. Nothing
    /// is committed afterwards.
    pub fn teardown(&mut self) {
        self.scheduler.teardown();
    }

    fn run_pass(&mut self) {
        self.stats.passes += 1;

        let measurement = self.reader.read(&self.view);
        self.stats.skipped_blocks += measurement.skipped as u64;
        self.stats.last_block_count = measurement.blocks.len();

        let blocks = measurement.clean_blocks(self.config.correction_epsilon);
        let plan = self.planner.plan(&blocks, self.view.content_end());

        if self.scheduler.is_torn_down() {
            return;
        }

        let Some(applied) = self.reconciler.reconcile(plan) else {
            self.settle_passes = 0;
            return;
        };
        self.view.apply_decorations(applied);
        self.stats.commits += 1;
        self.settle_passes += 1;

        // The commit moved things; check once more that the plan holds
        if self.settle_passes < self.config.scheduler.max_settle_passes {
            self.scheduler.request_pass();
        } else {
            log::warn!(
                "pagination did not settle after {} commits, waiting for the next change",
                self.settle_passes
            );
        }
    }

    /// The plan currently applied
    pub fn plan(&self) -> &PaginationPlan {
        self.reconciler.applied()
    }

    /// Number of simulated pages
    pub fn page_count(&self) -> usize {
        self.plan().page_count()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Access the view, e.g. to edit the document. Call
    /// [`notify_document_changed`](Self::notify_document_changed) afterwards.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn host(&self) -> &H {
        self.scheduler.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.scheduler.host_mut()
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    pub fn stats(&self) -> PassStats {
        self.stats
    }

    /// Whether a pass is waiting for its frame
    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.scheduler.is_torn_down()
    }
}
