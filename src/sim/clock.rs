//! Simulation clock
//!
//! The frame counter every recharge gate and enemy timer reads. It is owned by
//! the host and advanced exactly once per `advance`, never from wall time.

use serde::{Deserialize, Serialize};

/// Monotonic integer frame counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimClock {
    frame: u64,
}

impl SimClock {
    /// Clock starting at frame 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock starting at an arbitrary frame (replays, tests)
    pub fn at(frame: u64) -> Self {
        Self { frame }
    }

    /// Current frame number
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance one tick
    #[inline]
    pub fn tick(&mut self) {
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = SimClock::new();
        assert_eq!(clock.frame(), 0);
        clock.tick();
        clock.tick();
        assert_eq!(clock.frame(), 2);
        assert_eq!(SimClock::at(40).frame(), 40);
    }
}
