//! Monotonic sequencer for default field priorities.

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicI64, Ordering};

use tracing::trace;

/// Hands out strictly increasing priorities.
///
/// Each call to [`Sequencer::next`] returns the previous value plus `step`.
/// Values from one instance are strictly increasing until they reach
/// `i64::MAX`, where the sequencer saturates; values from independent
/// instances are unrelated to each other.
#[derive(Debug)]
pub struct Sequencer {
    current: AtomicI64,
    step: NonZeroU32,
}

impl Sequencer {
    pub fn new(start: i64, step: NonZeroU32) -> Self {
        Self {
            current: AtomicI64::new(start),
            step,
        }
    }

    /// Sequencer with step 1 starting at `start`.
    pub fn starting_at(start: i64) -> Self {
        Self::new(start, NonZeroU32::MIN)
    }

    /// Advance and return the new value. Saturates at `i64::MAX`.
    pub fn next(&self) -> i64 {
        let step = i64::from(self.step.get());
        let previous = self
            .current
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_add(step))
            })
            .unwrap_or_else(|previous| previous);
        let value = previous.saturating_add(step);
        trace!(value, "sequenced priority");
        value
    }

    /// Last value handed out, or the start value before the first call.
    pub fn current(&self) -> i64 {
        self.current.load(Ordering::Relaxed)
    }

    pub fn step(&self) -> NonZeroU32 {
        self.step
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_counts_from_one() {
        let seq = Sequencer::default();
        assert_eq!(seq.current(), 0);
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
        assert_eq!(seq.current(), 2);
    }

    #[test]
    fn test_custom_start_and_step() {
        let seq = Sequencer::new(10, NonZeroU32::new(5).unwrap());
        assert_eq!(seq.next(), 15);
        assert_eq!(seq.next(), 20);
    }

    #[test]
    fn test_independent_instances() {
        let a = Sequencer::default();
        let b = Sequencer::default();
        assert_eq!(a.next(), 1);
        assert_eq!(a.next(), 2);
        assert_eq!(b.next(), 1);
    }

    #[test]
    fn test_saturates_at_max() {
        let seq = Sequencer::starting_at(i64::MAX - 1);
        assert_eq!(seq.next(), i64::MAX);
        assert_eq!(seq.next(), i64::MAX);
        assert_eq!(seq.current(), i64::MAX);
    }

    #[test]
    fn test_large_step_near_max_does_not_wrap() {
        let seq = Sequencer::new(i64::MAX - 3, NonZeroU32::MAX);
        assert_eq!(seq.next(), i64::MAX);
        assert!(seq.current() > 0);
    }

    proptest! {
        #[test]
        fn prop_strictly_increasing(start in -1_000_000i64..1_000_000, step in 1u32..1000, calls in 1usize..64) {
            let seq = Sequencer::new(start, NonZeroU32::new(step).unwrap());
            let mut last = seq.current();
            for _ in 0..calls {
                let next = seq.next();
                prop_assert!(next > last);
                last = next;
            }
        }

        #[test]
        fn prop_never_decreases_near_max(offset in 0i64..1000, step in 1u32..1000, calls in 1usize..16) {
            let seq = Sequencer::new(i64::MAX - offset, NonZeroU32::new(step).unwrap());
            let mut last = seq.current();
            for _ in 0..calls {
                let next = seq.next();
                prop_assert!(next >= last);
                last = next;
            }
        }
    }
}
