//! Monotonic generation tokens.
//!
//! Every fresh fetch advances the counter and keeps the value it was issued
//! under. On completion the fetch may only commit if that value is still the
//! current one; anything older was superseded and is dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of the counter taken when a fetch is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct GenerationCounter(AtomicU64);

impl GenerationCounter {
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Authorize a new fetch, invalidating every earlier snapshot.
    pub fn advance(&self) -> Generation {
        Generation(self.0.fetch_add(1, Ordering::AcqRel) + 1)
    }

    #[must_use]
    pub fn current(&self) -> Generation {
        Generation(self.0.load(Ordering::Acquire))
    }

    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_invalidates_earlier_snapshots() {
        let counter = GenerationCounter::new();
        assert_eq!(counter.current().get(), 0);

        let a = counter.advance();
        assert!(counter.is_current(a));

        let b = counter.advance();
        assert!(b > a);
        assert!(!counter.is_current(a));
        assert!(counter.is_current(b));
        assert_eq!(b.to_string(), "g2");
    }
}
