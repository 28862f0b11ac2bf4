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

//! Render the track carousel.
//!
//! Cards are laid out horizontally around the centred slide, offset by the
//! carousel's animated position so that moves slide smoothly. Cards further
//! from the centre are shorter and dimmer.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};

use crate::{App, model::Track, theme::Theme};

const CARD_WIDTH: u16 = 26;
const CARD_GAP: u16 = 2;
const CARD_MAX_HEIGHT: u16 = 12;

/// Height lost per slide of distance from the centre, up to two slides.
const DEPTH_STEP: u16 = 2;

/// Draws the visible cards, returning their screen areas for hit testing.
pub(crate) fn draw_carousel(f: &mut Frame, area: Rect, app: &App) -> Vec<(Rect, usize)> {
    let tracks = app.controller.tracks();
    let carousel = app.controller.carousel();

    if tracks.is_empty() {
        let message = Paragraph::new("Nothing to play")
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.dim_colour));
        let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1).intersection(area);
        f.render_widget(message, row);
        return vec![];
    }

    let pitch = f32::from(CARD_WIDTH + CARD_GAP);
    let centre = f32::from(area.x) + f32::from(area.width) / 2.0;
    let position = carousel.position();

    // Enough slides either side to cover the area, plus one partly visible
    let reach = (f32::from(area.width) / pitch / 2.0).ceil() + 1.0;
    let first = (position - reach).floor().max(0.0) as usize;
    let last = ((position + reach).ceil() as usize).min(carousel.len() - 1);

    let mut cards = vec![];

    for index in first..=last {
        let left = centre + (index as f32 - position) * pitch - f32::from(CARD_WIDTH) / 2.0;
        let Some(card) = card_area(area, left, carousel.distance(index)) else {
            continue;
        };

        draw_card(f, card, index, &tracks[index], carousel.distance(index), &app.theme);
        cards.push((card, index));
    }

    cards
}

// Places a card whose left edge is at `left`, clipped to the carousel area.
fn card_area(area: Rect, left: f32, distance: usize) -> Option<Rect> {
    let right = left + f32::from(CARD_WIDTH);
    let x0 = left.round().max(f32::from(area.left()));
    let x1 = right.round().min(f32::from(area.right()));
    if x1 <= x0 {
        return None;
    }

    let depth = DEPTH_STEP * distance.min(2) as u16;
    let height = area.height.min(CARD_MAX_HEIGHT).saturating_sub(depth);
    if height < 3 {
        return None;
    }
    let y = area.y + (area.height - height) / 2;

    Some(Rect::new(x0 as u16, y, (x1 - x0) as u16, height))
}

fn draw_card(f: &mut Frame, area: Rect, index: usize, track: &Track, distance: usize, theme: &Theme) {
    let (border, text) = match distance {
        0 => (
            Style::default().fg(theme.accent_colour).add_modifier(Modifier::BOLD),
            Style::default().fg(theme.text_colour).add_modifier(Modifier::BOLD),
        ),
        1 => (
            Style::default().fg(theme.border_colour),
            Style::default().fg(theme.text_colour),
        ),
        _ => (
            Style::default().fg(theme.border_colour).add_modifier(Modifier::DIM),
            Style::default().fg(theme.dim_colour).add_modifier(Modifier::DIM),
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(format!(" {} ", index + 1))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(theme.background_colour));

    let lines = vec![
        Line::from(Span::styled(track.title.as_str(), text)),
        Line::default(),
        Line::from(Span::styled(
            track.owner_label.as_str(),
            Style::default().fg(theme.dim_colour),
        )),
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
