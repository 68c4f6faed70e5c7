//! Frame scheduling for the playback clock.
//!
//! The controller never blocks or sleeps. It asks a [`FrameScheduler`] for one
//! callback before the next repaint and gets back a [`FrameHandle`]. When the
//! host's frame fires it hands the handle and a timestamp back to
//! [`PlaybackController::on_frame`](super::PlaybackController::on_frame).
//! Handles that were cancelled or replaced are ignored there, so a late frame
//! can never advance a paused or reloaded session.

/// Identifies one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// One-shot, cancellable "run before next repaint" requests.
///
/// Implemented by the host on top of its display loop (`requestAnimationFrame`,
/// a vsync callback, a game loop).
pub trait FrameScheduler {
    /// Request a single frame callback.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a request that has not fired yet. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A scheduler driven by hand: requests queue up until the caller takes them.
///
/// Used by tests and by hosts that pump frames from their own loop.
#[derive(Debug, Default)]
pub struct ManualClock {
    next_id: u64,
    pending: Vec<FrameHandle>,
    requested: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every outstanding request, oldest first.
    pub fn take_pending(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Total requests ever made, including cancelled ones.
    pub fn requested_total(&self) -> u64 {
        self.requested
    }
}

impl FrameScheduler for ManualClock {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}
