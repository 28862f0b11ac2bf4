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

//! Cursor-following glow behind the interface.

/// Fraction of the remaining distance covered on each frame.
const FOLLOW_RATE: f32 = 1.0 / 20.0;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct Follower {
    x: f32,
    y: f32,
    target: Option<(f32, f32)>,
}

impl Follower {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The current glow position, once the mouse has been seen.
    pub(crate) fn position(&self) -> Option<(u16, u16)> {
        self.target
            .map(|_| (self.x.round().max(0.0) as u16, self.y.round().max(0.0) as u16))
    }

    pub(crate) fn set_target(&mut self, column: u16, row: u16) {
        let target = (f32::from(column), f32::from(row));
        if self.target.is_none() {
            // Start where the mouse first appears instead of sweeping in
            // from the corner
            (self.x, self.y) = target;
        }
        self.target = Some(target);
    }

    pub(crate) fn step(&mut self) {
        if let Some((tx, ty)) = self.target {
            self.x += (tx - self.x) * FOLLOW_RATE;
            self.y += (ty - self.y) * FOLLOW_RATE;
        }
    }
}
