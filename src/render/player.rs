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

//! Render the music player interface.
//!
//! This module renders the visual representation of the current track, its
//! playback status, elapsed time and the seekable progress bar.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    controller::{Deferred, PlaybackStatus},
    render::icons::{ICON_LOADING, ICON_PAUSE, ICON_PLAY, ICON_STOP},
    util,
};

fn status_icon(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Playing => ICON_PLAY,
        PlaybackStatus::Paused => ICON_PAUSE,
        PlaybackStatus::Loading => ICON_LOADING,
        PlaybackStatus::Idle | PlaybackStatus::Ended => ICON_STOP,
    }
}

fn deferred_label(deferred: &Deferred) -> &'static str {
    match deferred {
        Deferred::Load(_) => "load",
        Deferred::Play => "play",
        Deferred::Pause => "pause",
        Deferred::Seek(_) => "seek",
    }
}

/// Renders the main player widget including track info and progress.
///
/// Returns the area of the progress gauge, when one was drawn.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) -> Option<Rect> {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let track = app.controller.current_track()?;
    let state = app.controller.state();

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(chunks[0]);

    let bold = Style::default().add_modifier(Modifier::BOLD);

    let track_line = Line::from(vec![
        Span::styled(format!(" {} ", status_icon(state.status)), bold).fg(theme.text_colour),
        Span::styled(track.title.as_str(), bold).fg(theme.accent_colour),
    ]);
    f.render_widget(Paragraph::new(track_line), info_chunks[0]);

    let remaining = (state.duration_seconds - state.progress_seconds).max(0.0);

    let time_line = Line::from(vec![
        Span::styled(util::format::format_time(state.progress_seconds), bold).fg(theme.accent_colour),
        Span::styled(" / ", bold).fg(theme.text_colour),
        Span::styled(util::format::format_time(state.duration_seconds), bold).fg(theme.accent_colour),
        Span::styled(" (-", bold).fg(theme.text_colour),
        Span::styled(util::format::format_time(remaining), bold).fg(theme.accent_colour),
        Span::styled(")", bold).fg(theme.text_colour),
    ]);
    f.render_widget(Paragraph::new(time_line).alignment(Alignment::Right), info_chunks[1]);

    let owner_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(12)])
        .split(chunks[1]);

    if !track.owner_label.is_empty() {
        let owner_line = Line::from(vec![
            Span::raw("    by "),
            Span::styled(track.owner_label.as_str(), bold).fg(theme.accent_colour),
        ]);
        f.render_widget(Paragraph::new(owner_line), owner_chunks[0]);
    }

    let position = format!(
        "{} / {}",
        state.active_index + 1,
        app.controller.tracks().len()
    );
    f.render_widget(
        Paragraph::new(position)
            .alignment(Alignment::Right)
            .fg(theme.dim_colour),
        owner_chunks[1],
    );

    f.render_widget(
        Paragraph::new(format!("    {}", track.external_url)).fg(theme.dim_colour),
        chunks[2],
    );

    if let Some(deferred) = app.controller.deferred() {
        f.render_widget(
            Paragraph::new(format!("    {} waiting for player ({})", ICON_LOADING, deferred_label(deferred)))
                .fg(theme.dim_colour),
            chunks[3],
        );
    }

    let ratio = state.ratio().unwrap_or(0.0).clamp(0.0, 1.0);

    let position_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.accent_colour)
                .bg(theme.gauge_track_colour),
        )
        .ratio(ratio)
        .label("")
        .use_unicode(true);

    f.render_widget(position_gauge, chunks[4]);

    Some(chunks[4])
}
