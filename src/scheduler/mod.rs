//! Frame-driven scheduling of measurement passes
//!
//! Notifications only ever request a frame; the pass itself runs when the
//! host calls back, and reads whatever state is current at that moment.
//! Many notifications between two frames therefore cost one pass.

mod manual;

pub use manual::ManualHost;

use crate::error::PaginationError;
use serde::Deserialize;

/// Pending animation-frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Pending timer callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Active resize observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(pub u64);

/// Callback services of the host rendering loop.
///
/// The host invokes the engine's `on_frame` / `on_timer` / resize entry
/// points when the corresponding callbacks fire.
pub trait FrameHost {
    /// Ask for a callback before the next frame is drawn
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Ask for a callback after `delay_ms`
    fn set_timer(&mut self, delay_ms: u32) -> TimerHandle;
    fn clear_timer(&mut self, handle: TimerHandle);
    /// Start observing size changes of the rendering surface
    fn observe_resize(&mut self) -> ObserverHandle;
    fn disconnect(&mut self, handle: ObserverHandle);
}

/// Timing knobs
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Delay before the first pass, lets initial layout settle
    pub settle_delay_ms: u32,
    /// Quiet time required after the last resize before a pass
    pub resize_debounce_ms: u32,
    /// Consecutive commits allowed without an outside notification
    pub max_settle_passes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 50,
            resize_debounce_ms: 100,
            max_settle_passes: 3,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), PaginationError> {
        if self.max_settle_passes == 0 {
            return Err(PaginationError::invalid(
                "max_settle_passes",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Detached,
    Attached,
    TornDown,
}

/// Coalesces notifications into at most one pending pass
#[derive(Debug)]
pub struct Scheduler<H> {
    host: H,
    config: SchedulerConfig,
    lifecycle: Lifecycle,
    /// Set while a pass is pending
    pending_frame: Option<FrameHandle>,
    settle_timer: Option<TimerHandle>,
    resize_timer: Option<TimerHandle>,
    observer: Option<ObserverHandle>,
}

impl<H: FrameHost> Scheduler<H> {
    pub fn new(host: H, config: SchedulerConfig) -> Self {
        Self {
            host,
            config,
            lifecycle: Lifecycle::Detached,
            pending_frame: None,
            settle_timer: None,
            resize_timer: None,
            observer: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Start observing the surface and arm the initial pass
    pub fn attach(&mut self) {
        if self.lifecycle != Lifecycle::Detached {
            return;
        }
        self.lifecycle = Lifecycle::Attached;
        self.observer = Some(self.host.observe_resize());
        self.settle_timer = Some(self.host.set_timer(self.config.settle_delay_ms));
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle == Lifecycle::Attached
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle == Lifecycle::TornDown
    }

    /// Whether a pass is waiting for its frame
    pub fn is_pending(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Request a pass on the next frame unless one is already pending.
    ///
    /// Returns whether a new frame was requested.
    pub fn request_pass(&mut self) -> bool {
        if self.is_torn_down() || self.pending_frame.is_some() {
            return false;
        }
        self.pending_frame = Some(self.host.request_frame());
        true
    }

    /// Restart the resize debounce
    pub fn surface_resized(&mut self) {
        if self.is_torn_down() {
            return;
        }
        if let Some(timer) = self.resize_timer.take() {
            self.host.clear_timer(timer);
        }
        self.resize_timer = Some(self.host.set_timer(self.config.resize_debounce_ms));
    }

    /// Handle an expired timer. Returns whether a pass was requested.
    pub fn timer_fired(&mut self, handle: TimerHandle) -> bool {
        if self.is_torn_down() {
            return false;
        }
        if self.settle_timer == Some(handle) {
            self.settle_timer = None;
            log::trace!("settle delay elapsed");
            return self.request_pass();
        }
        if self.resize_timer == Some(handle) {
            self.resize_timer = None;
            log::trace!("resize settled");
            return self.request_pass();
        }
        false
    }

    /// Called when a frame fires. Returns whether the pass should run now;
    /// clears the pending flag so notifications during the pass schedule
    /// a fresh one.
    pub fn begin_pass(&mut self, handle: FrameHandle) -> bool {
        if self.is_torn_down() || self.pending_frame != Some(handle) {
            return false;
        }
        self.pending_frame = None;
        true
    }

    /// Cancel everything outstanding and stop observing. Idempotent.
    pub fn teardown(&mut self) {
        if let Some(frame) = self.pending_frame.take() {
            self.host.cancel_frame(frame);
        }
        if let Some(timer) = self.settle_timer.take() {
            self.host.clear_timer(timer);
        }
        if let Some(timer) = self.resize_timer.take() {
            self.host.clear_timer(timer);
        }
        if let Some(observer) = self.observer.take() {
            self.host.disconnect(observer);
        }
        self.lifecycle = Lifecycle::TornDown;
    }
}
