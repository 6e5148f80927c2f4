//! Frame scheduling seam.
//!
//! The host owns the display refresh. A widget asks for one callback at a
//! time and the host answers by calling the widget's `on_frame` with its own
//! timestamp.

/// Identifies a requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Requests and cancels frame callbacks.
pub trait FrameScheduler {
    /// Asks for one frame callback.
    fn request_frame(&mut self) -> FrameHandle;

    /// Discards a pending callback. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A scheduler for hosts that run their own loop.
///
/// Records requests; the loop calls [`take_pending`](Self::take_pending)
/// each refresh and, if it returns a handle, calls the widget's `on_frame`.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl FrameQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the pending request, if any.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Returns true if a callback is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Total frames requested.
    #[must_use]
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total frames cancelled while still pending.
    #[must_use]
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

/// Tracks the single in-flight frame of one widget.
#[derive(Debug, Default)]
pub(crate) struct FrameSlot {
    handle: Option<FrameHandle>,
}

impl FrameSlot {
    /// Requests a frame unless one is already in flight.
    pub(crate) fn ensure<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        if self.handle.is_none() {
            self.handle = Some(scheduler.request_frame());
        }
    }

    /// Marks the in-flight frame as delivered.
    pub(crate) fn delivered(&mut self) {
        self.handle = None;
    }

    /// Cancels the in-flight frame. Returns true if there was one.
    pub(crate) fn cancel<F: FrameScheduler>(&mut self, scheduler: &mut F) -> bool {
        match self.handle.take() {
            Some(handle) => {
                scheduler.cancel_frame(handle);
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_keeps_latest_request() {
        let mut queue = FrameQueue::new();
        let first = queue.request_frame();
        let second = queue.request_frame();
        assert_ne!(first, second);
        assert_eq!(queue.take_pending(), Some(second));
        assert_eq!(queue.take_pending(), None);
        assert_eq!(queue.requested(), 2);
    }

    #[test]
    fn test_cancel_only_matches_pending() {
        let mut queue = FrameQueue::new();
        let stale = queue.request_frame();
        let live = queue.request_frame();
        queue.cancel_frame(stale);
        assert!(queue.is_pending());
        queue.cancel_frame(live);
        assert!(!queue.is_pending());
        assert_eq!(queue.cancelled(), 1);
    }

    #[test]
    fn test_slot_holds_one_frame() {
        let mut queue = FrameQueue::new();
        let mut slot = FrameSlot::default();
        slot.ensure(&mut queue);
        slot.ensure(&mut queue);
        assert_eq!(queue.requested(), 1);

        assert!(slot.cancel(&mut queue));
        assert!(!queue.is_pending());
        assert!(!slot.cancel(&mut queue));

        slot.ensure(&mut queue);
        slot.delivered();
        assert!(!slot.is_pending());
    }
}
