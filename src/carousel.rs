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

//! Track carousel state management.
//!
//! This module provides state for the carousel widget: which slide is
//! centred, and an eased scroll position used to animate transitions between
//! slides.
//!
//! Programmatic moves ([`Carousel::slide_to`]) are silent. User moves
//! ([`Carousel::drag`], [`Carousel::click`]) return the new index so the
//! caller can raise a slide change notification. Unlike the playlist itself
//! the carousel does not wrap around.

/// Fraction of the remaining distance covered on each animation frame.
const EASING: f32 = 0.35;

/// Distance below which the animation snaps to its target.
const SNAP: f32 = 0.01;

#[derive(Debug, Default)]
pub(crate) struct Carousel {
    len: usize,
    centered: usize,
    position: f32,
}

impl Carousel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Binds the carousel to a new slide count, centred on `index` without
    /// animating.
    pub(crate) fn reset(&mut self, len: usize, index: usize) {
        self.len = len;
        self.centered = Self::clamp(index, len);
        self.position = self.centered as f32;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn centered(&self) -> usize {
        self.centered
    }

    /// The animated scroll position, in slides.
    pub(crate) fn position(&self) -> f32 {
        self.position
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.position != self.centered as f32
    }

    /// Moves to `index` with a visual transition, without notifying.
    pub(crate) fn slide_to(&mut self, index: usize) {
        if self.len == 0 {
            return;
        }
        self.centered = Self::clamp(index, self.len);
    }

    /// Moves by `step` slides in response to user input.
    pub(crate) fn drag(&mut self, step: isize) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let target = self.centered.saturating_add_signed(step);
        self.user_move(target)
    }

    /// Centres the clicked slide in response to user input.
    pub(crate) fn click(&mut self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        self.user_move(index)
    }

    /// Advances the transition animation by one frame.
    pub(crate) fn advance(&mut self) {
        let target = self.centered as f32;
        let remaining = target - self.position;
        if remaining.abs() < SNAP {
            self.position = target;
        } else {
            self.position += remaining * EASING;
        }
    }

    /// How many slides away from the centre `index` is, used for depth.
    pub(crate) fn distance(&self, index: usize) -> usize {
        index.abs_diff(self.centered)
    }

    fn user_move(&mut self, target: usize) -> Option<usize> {
        let target = Self::clamp(target, self.len);
        if target == self.centered {
            return None;
        }
        self.centered = target;
        Some(target)
    }

    fn clamp(index: usize, len: usize) -> usize {
        index.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(len: usize, index: usize) -> Carousel {
        let mut carousel = Carousel::new();
        carousel.reset(len, index);
        carousel
    }

    #[test]
    fn reset_clamps_to_bounds() {
        assert_eq!(carousel(3, 7).centered(), 2);
        assert_eq!(carousel(0, 3).centered(), 0);
    }

    #[test]
    fn drag_notifies_and_clamps_without_wrapping() {
        let mut carousel = carousel(3, 1);

        assert_eq!(carousel.drag(1), Some(2));
        assert_eq!(carousel.drag(1), None);
        assert_eq!(carousel.drag(-5), Some(0));
        assert_eq!(carousel.drag(-1), None);
    }

    #[test]
    fn click_ignores_out_of_range_and_current() {
        let mut carousel = carousel(4, 1);

        assert_eq!(carousel.click(9), None);
        assert_eq!(carousel.click(1), None);
        assert_eq!(carousel.click(3), Some(3));
        assert_eq!(carousel.distance(0), 3);
    }

    #[test]
    fn slide_to_animates_towards_target() {
        let mut carousel = carousel(5, 0);

        carousel.slide_to(4);
        assert_eq!(carousel.centered(), 4);
        assert!(carousel.is_animating());

        let mut last = carousel.position();
        for _ in 0..100 {
            carousel.advance();
            assert!(carousel.position() >= last);
            last = carousel.position();
        }

        assert!(!carousel.is_animating());
        assert_eq!(carousel.position(), 4.0);
    }

    #[test]
    fn empty_carousel_ignores_input() {
        let mut carousel = Carousel::new();

        carousel.slide_to(2);
        assert_eq!(carousel.centered(), 0);
        assert_eq!(carousel.drag(1), None);
        assert_eq!(carousel.click(0), None);
    }
}
