//! Image-load barrier.
//!
//! Counts completed loads against a known target and releases exactly once.
//! Completion order does not matter. A target of zero is released on
//! construction. The caller learns about the release from the one call that
//! returns true.

/// One-shot countdown that gates the first full paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLoadBarrier {
    target: usize,
    completed: usize,
    released: bool,
}

impl ImageLoadBarrier {
    /// Creates a barrier waiting for `target` completions.
    #[must_use]
    pub const fn new(target: usize) -> Self {
        Self {
            target,
            completed: 0,
            released: target == 0,
        }
    }

    /// Records one completion.
    ///
    /// Returns true only for the completion that releases the barrier.
    /// Completions after release are ignored.
    pub fn complete(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.completed += 1;
        self.released = self.completed >= self.target;
        self.released
    }

    /// Releases the barrier without waiting for the remaining completions.
    ///
    /// Returns false if it was already released.
    pub fn release_now(&mut self) -> bool {
        !std::mem::replace(&mut self.released, true)
    }

    /// Whether the barrier has released.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }

    /// Number of completions still outstanding.
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.target.saturating_sub(self.completed)
    }

    /// Number of completions required.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_target_is_released() {
        let mut barrier = ImageLoadBarrier::new(0);
        assert!(barrier.is_released());
        assert!(!barrier.complete());
        assert!(!barrier.release_now());
    }

    #[test]
    fn test_fires_once_after_last_completion() {
        let mut barrier = ImageLoadBarrier::new(3);
        assert!(!barrier.complete());
        assert!(!barrier.complete());
        assert!(!barrier.is_released());
        assert_eq!(barrier.pending(), 1);
        assert!(barrier.complete());
        assert!(barrier.is_released());
        assert!(!barrier.complete());
        assert_eq!(barrier.pending(), 0);
    }

    #[test]
    fn test_release_now_fires_once() {
        let mut barrier = ImageLoadBarrier::new(2);
        barrier.complete();
        assert!(barrier.release_now());
        assert!(!barrier.release_now());
        assert!(!barrier.complete());
        assert_eq!(barrier.pending(), 1);
    }
}
