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

//! Render the ambient backdrop.
//!
//! The sampled thumbnail colours are shown as a strip across the top of the
//! screen, and a soft glow in the interactive colour trails the mouse.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Paragraph},
};

use crate::{App, theme::rgb};

const GLOW_WIDTH: u16 = 18;
const GLOW_HEIGHT: u16 = 5;

const GLOW_SYMBOL: &str = "\u{2591}";

pub(crate) fn draw_palette_strip(f: &mut Frame, area: Rect, app: &App) {
    let Some(palette) = app.controller.palette() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    for (chunk, colour) in chunks.iter().zip(palette.colours) {
        f.render_widget(Block::default().style(Style::default().bg(rgb(colour))), *chunk);
    }
}

pub(crate) fn draw_glow(f: &mut Frame, area: Rect, app: &App) {
    let Some((x, y)) = app.follower.position() else {
        return;
    };

    let glow = Rect::new(
        x.saturating_sub(GLOW_WIDTH / 2),
        y.saturating_sub(GLOW_HEIGHT / 2),
        GLOW_WIDTH,
        GLOW_HEIGHT,
    )
    .intersection(area);

    if glow.is_empty() {
        return;
    }

    let lines = vec![Line::from(GLOW_SYMBOL.repeat(glow.width as usize)); glow.height as usize];
    f.render_widget(
        Paragraph::new(lines).style(Style::default().fg(app.theme.glow_colour)),
        glow,
    );
}
