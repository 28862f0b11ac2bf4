// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Wheel gesture debouncing.
//!
//! Scroll wheels deliver many small deltas per physical gesture. The
//! [`GestureAccumulator`] sums them until a threshold is crossed, commits a
//! single step of navigation, then ignores further input for a short
//! cooldown. Input arriving during the cooldown is dropped, not buffered.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GestureConfig {
    pub(crate) threshold: f64,
    pub(crate) lock: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            lock: Duration::from_millis(420),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

#[derive(Debug)]
pub(crate) struct GestureAccumulator {
    config: GestureConfig,
    accumulated_delta: f64,
    locked_until: Option<Instant>,
}

impl GestureAccumulator {
    pub(crate) fn new(config: GestureConfig) -> Self {
        Self {
            config,
            accumulated_delta: 0.0,
            locked_until: None,
        }
    }

    pub(crate) fn accumulated(&self) -> f64 {
        self.accumulated_delta
    }

    pub(crate) fn is_locked(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Feeds one wheel delta, returning a direction when a step is committed.
    pub(crate) fn push(&mut self, delta: f64, now: Instant) -> Option<Direction> {
        if self.is_locked(now) {
            return None;
        }

        if self.locked_until.take().is_some() {
            self.accumulated_delta = 0.0;
        }

        self.accumulated_delta += delta;
        if self.accumulated_delta.abs() < self.config.threshold {
            return None;
        }

        let direction = if self.accumulated_delta > 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        };

        self.accumulated_delta = 0.0;
        self.locked_until = Some(now + self.config.lock);

        Some(direction)
    }
}
