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

//! Application logic, event handling, and command dispatching.
//!
//! This module is the main thread's side of the application. Every input,
//! whether from the terminal, the embedded player, the frame clock or the task
//! worker, arrives as an [`AppEvent`] on a single channel and is applied in
//! arrival order, after which the interface is redrawn.
//!
//! # Organization
//!
//! * `handlers`: Applies worker, player and frame events to the application.
//! * `key_handlers`: Maps keyboard input to player controller operations.
//! * `mouse_handlers`: Maps wheel, click and movement to the carousel, the
//!   progress gauge and the backdrop.

mod handlers;
mod key_handlers;
mod mouse_handlers;

use std::io::Stdout;

use anyhow::{Result, anyhow};
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::{error, warn};

use crate::{
    App,
    commander::Command,
    controller::palette::Palette,
    events::{handlers::*, key_handlers::process_key_event, mouse_handlers::process_mouse_event},
    model::Track,
    player::PlayerNotification,
    render::draw,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),

    /// One tick of the frame clock.
    Frame,

    Player(PlayerNotification),

    PlaylistReady(Vec<Track>),
    PaletteReady(usize, Palette),

    Command(Command),

    ExitApplication,

    Error(String),
    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed. A fatal error also ends the loop, and is returned.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::ExitApplication => break,
            AppEvent::Key(key) => process_key_event(app, key)?,
            AppEvent::Mouse(mouse) => process_mouse_event(app, mouse),
            AppEvent::Frame => handle_frame(app)?,
            AppEvent::Player(notification) => handle_player_notification(app, notification),
            AppEvent::PlaylistReady(tracks) => handle_playlist_ready(app, tracks),
            AppEvent::PaletteReady(index, palette) => handle_palette_ready(app, index, palette),
            AppEvent::Command(command) => handle_command(app, command)?,
            AppEvent::Error(message) => warn!("{}", message),
            AppEvent::FatalError(message) => {
                error!("{}", message);
                return Err(anyhow!(message));
            }
        }

        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}
