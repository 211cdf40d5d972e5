//! Resize policies — grow or shrink the pool against queue pressure.
//!
//! # Threshold algorithm
//!
//! ```text
//! if queue_len > max_servers:
//!     Grow                       // unless the pool is at max_pool_size
//! else if queue_len < min_servers and pool_size > 0:
//!     Shrink
//! ```
//!
//! At most one step per tick. The grow branch takes precedence, so with
//! `min_servers > max_servers` a queue length between the two grows the
//! pool. An optional cooldown suppresses any change for a number of ticks
//! after the previous one.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SchedulerConfig;
use crate::scheduler::Tick;

/// A resize decision for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleDecision {
    /// Add one server.
    Grow,
    /// Remove the last server.
    Shrink,
    /// No change needed.
    NoChange,
}

/// What a resize policy sees after the progress phase of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleInputs {
    pub tick: Tick,
    pub queue_len: usize,
    pub pool_size: usize,
}

/// Decides whether the pool should change size this tick.
pub trait ResizePolicy: Send {
    fn evaluate(&mut self, inputs: &ScaleInputs) -> ScaleDecision;
}

/// High/low-water mark scaling on queue length.
#[derive(Debug, Clone)]
pub struct ThresholdScaler {
    min_servers: u32,
    max_servers: u32,
    /// Ceiling on pool size for grow decisions.
    max_pool_size: Option<u32>,
    cooldown_ticks: u64,
    /// Tick of the last grow or shrink.
    last_change: Option<Tick>,
}

impl ThresholdScaler {
    pub fn new(min_servers: u32, max_servers: u32) -> Self {
        Self {
            min_servers,
            max_servers,
            max_pool_size: None,
            cooldown_ticks: 0,
            last_change: None,
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.min_servers, config.max_servers)
            .with_max_pool_size(config.max_pool_size)
            .with_cooldown(config.resize_cooldown_ticks)
    }

    /// Suppress changes for `ticks` ticks after each grow or shrink.
    pub fn with_cooldown(mut self, ticks: u64) -> Self {
        self.cooldown_ticks = ticks;
        self
    }

    /// Never grow the pool beyond `cap` servers.
    pub fn with_max_pool_size(mut self, cap: Option<u32>) -> Self {
        self.max_pool_size = cap;
        self
    }

    fn cooling_down(&self, tick: Tick) -> bool {
        self.last_change
            .is_some_and(|last| tick.saturating_sub(last) < self.cooldown_ticks)
    }
}

impl ResizePolicy for ThresholdScaler {
    fn evaluate(&mut self, inputs: &ScaleInputs) -> ScaleDecision {
        if self.cooling_down(inputs.tick) {
            return ScaleDecision::NoChange;
        }

        let decision = if inputs.queue_len > self.max_servers as usize {
            match self.max_pool_size {
                Some(cap) if inputs.pool_size >= cap as usize => {
                    debug!(
                        queue_len = inputs.queue_len,
                        pool_size = inputs.pool_size,
                        cap,
                        "pool at ceiling, not growing"
                    );
                    ScaleDecision::NoChange
                }
                _ => ScaleDecision::Grow,
            }
        } else if inputs.queue_len < self.min_servers as usize && inputs.pool_size > 0 {
            ScaleDecision::Shrink
        } else {
            ScaleDecision::NoChange
        };

        if decision != ScaleDecision::NoChange {
            self.last_change = Some(inputs.tick);
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(tick: Tick, queue_len: usize, pool_size: usize) -> ScaleInputs {
        ScaleInputs {
            tick,
            queue_len,
            pool_size,
        }
    }

    #[test]
    fn grow_when_queue_above_high_water() {
        let mut s = ThresholdScaler::new(1, 5);
        assert_eq!(s.evaluate(&inputs(0, 6, 3)), ScaleDecision::Grow);
    }

    #[test]
    fn shrink_when_queue_below_low_water() {
        let mut s = ThresholdScaler::new(1, 5);
        assert_eq!(s.evaluate(&inputs(0, 0, 5)), ScaleDecision::Shrink);
    }

    #[test]
    fn no_change_between_marks() {
        let mut s = ThresholdScaler::new(1, 5);
        assert_eq!(s.evaluate(&inputs(0, 1, 3)), ScaleDecision::NoChange);
        assert_eq!(s.evaluate(&inputs(1, 5, 3)), ScaleDecision::NoChange);
    }

    #[test]
    fn equal_marks_grow_above() {
        let mut s = ThresholdScaler::new(2, 2);
        assert_eq!(s.evaluate(&inputs(0, 3, 1)), ScaleDecision::Grow);
        assert_eq!(s.evaluate(&inputs(1, 2, 1)), ScaleDecision::NoChange);
        assert_eq!(s.evaluate(&inputs(2, 1, 1)), ScaleDecision::Shrink);
    }

    #[test]
    fn crossed_marks_prefer_grow() {
        // Queue of 3 is both above max (2) and below min (5).
        let mut s = ThresholdScaler::new(5, 2);
        assert_eq!(s.evaluate(&inputs(0, 3, 4)), ScaleDecision::Grow);
    }

    #[test]
    fn never_shrinks_empty_pool() {
        let mut s = ThresholdScaler::new(3, 10);
        assert_eq!(s.evaluate(&inputs(0, 0, 0)), ScaleDecision::NoChange);
    }

    #[test]
    fn respects_max_pool_size() {
        let mut s = ThresholdScaler::new(1, 5).with_max_pool_size(Some(4));
        assert_eq!(s.evaluate(&inputs(0, 50, 3)), ScaleDecision::Grow);
        assert_eq!(s.evaluate(&inputs(1, 50, 4)), ScaleDecision::NoChange);
    }

    #[test]
    fn cooldown_suppresses_changes() {
        let mut s = ThresholdScaler::new(1, 5).with_cooldown(3);
        assert_eq!(s.evaluate(&inputs(10, 9, 2)), ScaleDecision::Grow);
        assert_eq!(s.evaluate(&inputs(11, 9, 3)), ScaleDecision::NoChange);
        assert_eq!(s.evaluate(&inputs(12, 0, 3)), ScaleDecision::NoChange);
        assert_eq!(s.evaluate(&inputs(13, 0, 3)), ScaleDecision::Shrink);
    }

    #[test]
    fn zero_cooldown_allows_every_tick() {
        let mut s = ThresholdScaler::new(1, 5);
        for tick in 0..5 {
            assert_eq!(s.evaluate(&inputs(tick, 9, 2)), ScaleDecision::Grow);
        }
    }

    #[test]
    fn from_config_carries_thresholds() {
        let mut config = SchedulerConfig::new(4, 100, 2, 8);
        config.max_pool_size = Some(6);
        let mut s = ThresholdScaler::from_config(&config);
        assert_eq!(s.evaluate(&inputs(0, 9, 6)), ScaleDecision::NoChange);
        assert_eq!(s.evaluate(&inputs(1, 1, 6)), ScaleDecision::Shrink);
    }
}
