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

use std::time::Instant;

use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    App,
    commander::Command,
    controller::palette::Palette,
    events::AppEvent,
    model::Track,
    player::PlayerNotification,
    tasks::AppTask,
    theme::Theme,
    util,
};

pub(super) fn handle_frame(app: &mut App) -> Result<()> {
    app.controller.on_frame();
    app.follower.step();

    let now = Instant::now();
    if app.revalidate_at.is_some_and(|at| now >= at) {
        debug!("Revalidating playlist");
        app.revalidate_at = None;
        app.task_tx.send(AppTask::FetchPlaylist { force: true })?;
    }

    Ok(())
}

pub(super) fn handle_player_notification(app: &mut App, notification: PlayerNotification) {
    app.controller.handle_notification(notification);
}

pub(super) fn handle_playlist_ready(app: &mut App, tracks: Vec<Track>) {
    app.revalidate_at = Some(Instant::now() + app.config.cache_ttl());

    // A failed revalidation keeps the list already on screen
    if tracks.is_empty() && !app.controller.tracks().is_empty() {
        warn!("Playlist revalidation returned nothing, keeping current tracks");
        return;
    }

    app.controller.set_tracks(tracks);
}

pub(super) fn handle_palette_ready(app: &mut App, index: usize, palette: Palette) {
    if !app.controller.apply_palette(index, palette) {
        debug!(index, "Discarding palette for inactive track");
        return;
    }

    app.theme.apply_palette(&palette);
    if let Some(hex) = Theme::to_hex(app.theme.background_colour) {
        util::term::set_terminal_bg(&hex);
    }
}

pub(super) fn handle_command(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::Quit => app.event_tx.send(AppEvent::ExitApplication)?,
        Command::Next => app.controller.next(),
        Command::Prev => app.controller.prev(),
        Command::PlayPause => app.controller.play_pause(),
        Command::Seek(seconds) => app.controller.seek_to(seconds),
        Command::GoTo(index) => app.controller.go_to(index),
        Command::Reload => app.task_tx.send(AppTask::FetchPlaylist { force: true })?,
    }

    Ok(())
}
