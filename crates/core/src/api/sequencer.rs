//! Monotonic request tags for paginated fetches.
//!
//! Rapid pagination clicks can finish out of order, and a stale response
//! must never overwrite a newer render. Each fetch takes a tag from the
//! sequencer before awaiting the API; when the response arrives, the handler
//! checks the tag is still current and discards the render otherwise.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issues monotonically increasing request tags and remembers the latest.
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: AtomicU64,
}

impl Sequencer {
    /// Create a sequencer with no requests issued.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issue a new tag, making it the latest.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Whether the given tag is still the latest issued.
    ///
    /// A response carrying a non-current tag belongs to a superseded fetch
    /// and must be discarded.
    pub fn is_current(&self, tag: u64) -> bool {
        self.latest.load(Ordering::Acquire) == tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_monotonic() {
        let seq = Sequencer::new();
        let a = seq.issue();
        let b = seq.issue();
        assert!(b > a);
    }

    #[test]
    fn stale_tag_is_not_current() {
        let seq = Sequencer::new();
        let first = seq.issue();
        assert!(seq.is_current(first));

        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn unissued_tag_is_not_current() {
        let seq = Sequencer::new();
        assert!(!seq.is_current(7));
    }
}
