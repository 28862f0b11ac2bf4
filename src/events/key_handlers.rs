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

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{App, events::AppEvent};

const FINE_SEEK_DELTA: f64 = 5.0;
const SEEK_DELTA: f64 = 20.0;

/// Maps keyboard input to application actions and playback commands.
///
/// This function acts as the primary input router for the TUI, translating
/// low-level [`KeyEvent`]s into player controller operations. The command
/// line gets first refusal on every key.
///
/// # Errors
///
/// Returns an error if an event fails to send to the main event loop.
pub(super) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind == KeyEventKind::Release {
        return Ok(());
    }

    let event = Event::Key(key);
    if app.commander.handle_event(&event, &app.event_tx) {
        return Ok(());
    }

    process_global_key_event(app, key)
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.event_tx.send(AppEvent::ExitApplication)?;
        }

        (KeyCode::Char(' '), _) => app.controller.play_pause(),
        (KeyCode::Char('n'), _) => app.controller.next(),
        (KeyCode::Char('p'), _) => app.controller.prev(),

        // Carousel
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => app.controller.drag_carousel(-1),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => app.controller.drag_carousel(1),
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => app.controller.click_slide(0),
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
            let last = app.controller.tracks().len().saturating_sub(1);
            app.controller.click_slide(last);
        }

        (KeyCode::Char(','), _) => app.controller.seek_by(-FINE_SEEK_DELTA),
        (KeyCode::Char('.'), _) => app.controller.seek_by(FINE_SEEK_DELTA),
        (KeyCode::Char('<'), _) => app.controller.seek_by(-SEEK_DELTA),
        (KeyCode::Char('>'), _) => app.controller.seek_by(SEEK_DELTA),

        _ => {}
    }

    Ok(())
}
