//! Bounded rolling-average window.
//!
//! Newest sample at the front, oldest at the back.  The window size is a
//! runtime setting (`AverageSize`), so capacity is passed on every push and
//! the backing deque is sized for the largest window allowed.

use heapless::Deque;

use crate::config::MAX_AVERAGE_SIZE;

/// Fixed-capacity history of integer samples for one channel.
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    samples: Deque<i32, MAX_AVERAGE_SIZE>,
}

impl SampleWindow {
    pub const fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    /// Insert `sample` into a window of `capacity` entries and return the
    /// new mean.
    ///
    /// Entries beyond `capacity` (left over from a larger window) are
    /// trimmed first; a full window evicts its oldest entry.  `capacity`
    /// is clamped to `1..=MAX_AVERAGE_SIZE`.
    pub fn push(&mut self, sample: i32, capacity: usize) -> i32 {
        let capacity = capacity.clamp(1, MAX_AVERAGE_SIZE);
        while self.samples.len() > capacity {
            self.samples.pop_back();
        }
        if self.samples.len() == capacity {
            self.samples.pop_back();
        }
        // At most capacity - 1 entries remain, so this always fits.
        let _ = self.samples.push_front(sample);
        self.mean()
    }

    /// Arithmetic mean, truncated toward zero.  Zero when empty.
    pub fn mean(&self) -> i32 {
        if self.samples.is_empty() {
            return 0;
        }
        let sum: i64 = self.samples.iter().map(|&s| s as i64).sum();
        (sum / self.samples.len() as i64) as i32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.samples.iter().copied()
    }
}
