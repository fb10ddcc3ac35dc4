//! Host driven by hand, for tests and headless use

use super::{FrameHandle, FrameHost, ObserverHandle, TimerHandle};
use rustc_hash::FxHashSet;

/// A [`FrameHost`] with a virtual clock.
///
/// Nothing fires on its own: callers drain requested frames with
/// [`take_frames`](Self::take_frames) and move time with
/// [`advance`](Self::advance), then feed the handles back to the engine.
#[derive(Debug, Default)]
pub struct ManualHost {
    next_id: u64,
    now_ms: u64,
    frames: Vec<FrameHandle>,
    timers: Vec<(TimerHandle, u64)>,
    observers: FxHashSet<ObserverHandle>,
    cancelled_frames: usize,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Current virtual time
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Frames requested and not yet taken or cancelled
    pub fn pending_frames(&self) -> &[FrameHandle] {
        &self.frames
    }

    /// Remove and return all requested frames
    pub fn take_frames(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.frames)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward, returning the timers that came due in firing
    /// order
    pub fn advance(&mut self, ms: u64) -> Vec<TimerHandle> {
        self.now_ms += ms;
        let now = self.now_ms;

        let mut due: Vec<_> = self
            .timers
            .iter()
            .filter(|(_, at)| *at <= now)
            .copied()
            .collect();
        self.timers.retain(|(_, at)| *at > now);

        due.sort_by_key(|(handle, at)| (*at, handle.0));
        due.into_iter().map(|(handle, _)| handle).collect()
    }

    pub fn is_observing(&self) -> bool {
        !self.observers.is_empty()
    }

    /// Frames cancelled over the host's lifetime
    pub fn cancelled_frames(&self) -> usize {
        self.cancelled_frames
    }
}

impl FrameHost for ManualHost {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.frames.len();
        self.frames.retain(|f| *f != handle);
        if self.frames.len() != before {
            self.cancelled_frames += 1;
        }
    }

    fn set_timer(&mut self, delay_ms: u32) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.push((handle, self.now_ms + u64::from(delay_ms)));
        handle
    }

    fn clear_timer(&mut self, handle: TimerHandle) {
        self.timers.retain(|(t, _)| *t != handle);
    }

    fn observe_resize(&mut self) -> ObserverHandle {
        let handle = ObserverHandle(self.next_id());
        self.observers.insert(handle);
        handle
    }

    fn disconnect(&mut self, handle: ObserverHandle) {
        self.observers.remove(&handle);
    }
}
