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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every event to provide a reactive user interface. Drawing also records the
//! [`HitAreas`] that mouse input is tested against.

mod backdrop;
mod carousel;
mod commander;
mod icons;
mod player;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    widgets::Block,
};

use crate::{
    App,
    render::{
        backdrop::{draw_glow, draw_palette_strip},
        carousel::draw_carousel,
        commander::draw_commander,
        player::draw_player,
    },
};

/// Screen areas that respond to the mouse, as of the last draw.
#[derive(Debug, Default)]
pub(crate) struct HitAreas {
    pub(crate) cards: Vec<(Rect, usize)>,
    pub(crate) progress: Option<Rect>,
}

impl HitAreas {
    pub(crate) fn card_at(&self, column: u16, row: u16) -> Option<usize> {
        let position = Position::new(column, row);
        self.cards
            .iter()
            .find(|(area, _)| area.contains(position))
            .map(|(_, index)| *index)
    }

    /// The fraction of the progress gauge under a click, if it hit the gauge.
    pub(crate) fn progress_ratio(&self, column: u16, row: u16) -> Option<f64> {
        let gauge = self.progress?;
        if !gauge.contains(Position::new(column, row)) {
            return None;
        }
        self.progress_ratio_at_column(column)
    }

    /// The fraction of the progress gauge at a column, clamped to the gauge,
    /// used while dragging.
    pub(crate) fn progress_ratio_at_column(&self, column: u16) -> Option<f64> {
        let gauge = self.progress?;
        if gauge.width <= 1 {
            return None;
        }

        let offset = column.clamp(gauge.left(), gauge.right() - 1) - gauge.left();
        Some(f64::from(offset) / f64::from(gauge.width - 1))
    }
}

/// Renders the user interface to the terminal frame.
///
/// This function calculates the layout constraints and populates the frame
/// with widgets based on the current state of the [`App`].
///
/// # Arguments
///
/// * `f` - The current terminal frame used for drawing.
/// * `app` - A mutable reference to the application state, so that the hit
///   areas of this frame can be recorded.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_colour)),
        area,
    );
    draw_glow(f, area, app);

    // Outer layout: palette strip, carousel, player, command line
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(area);

    draw_palette_strip(f, outer[0], app);

    let cards = draw_carousel(f, outer[1], app);
    let progress = draw_player(f, outer[2], app);

    draw_commander(f, outer[3], app);

    app.hit_areas = HitAreas { cards, progress };
}
