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

//! Command-line input logic and state management.
//!
//! This module implements the logic for a command-line processing component,
//! handling a text input component, and dispatching a corresponding
//! application command event when typing is finished and a command is
//! submitted.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tracing::warn;
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::events::AppEvent;

/// A parsed command-line command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Command {
    Quit,
    Next,
    Prev,
    PlayPause,
    Seek(f64),
    /// Zero-based track index.
    GoTo(usize),
    Reload,
}

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Handles a terminal event, returning `true` if it was consumed.
    pub(crate) fn handle_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> bool {
        let Event::Key(key_event) = event else {
            return false;
        };

        if !self.active {
            if key_event.code == KeyCode::Char(':') {
                self.active = true;
                return true;
            }
            return false;
        }

        match key_event.code {
            KeyCode::Esc => {
                self.active = false;
                self.input.reset();
            }

            KeyCode::Enter => {
                let buffer = self.input.value().trim().to_string();
                if !buffer.is_empty() {
                    if let Err(e) = run_command(&buffer, event_tx) {
                        warn!("Failed to run command '{}': {:#}", buffer, e);
                    }
                }
                self.input.reset();
                self.active = false;
            }

            _ => {
                // Delegate all other key events to the managed input component.
                self.input.handle_event(event);
            }
        }

        true
    }
}

fn run_command(buffer: &str, event_tx: &Sender<AppEvent>) -> Result<()> {
    match parse_command(buffer) {
        Some(command) => event_tx.send(AppEvent::Command(command))?,
        None => warn!("Unknown command: {}", buffer),
    }

    Ok(())
}

pub(crate) fn parse_command(buffer: &str) -> Option<Command> {
    let parts: Vec<&str> = buffer.split_whitespace().collect();

    match parts.as_slice() {
        ["q"] => Some(Command::Quit),
        ["n"] => Some(Command::Next),
        ["p"] => Some(Command::Prev),
        ["pp"] => Some(Command::PlayPause),
        ["reload"] => Some(Command::Reload),

        ["seek", secs] => secs
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite())
            .map(Command::Seek),

        // Track numbers are shown one-based
        ["goto", number] => number
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(Command::GoTo),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command(" n "), Some(Command::Next));
        assert_eq!(parse_command("p"), Some(Command::Prev));
        assert_eq!(parse_command("pp"), Some(Command::PlayPause));
        assert_eq!(parse_command("reload"), Some(Command::Reload));
        assert_eq!(parse_command("seek 90.5"), Some(Command::Seek(90.5)));
        assert_eq!(parse_command("goto 1"), Some(Command::GoTo(0)));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(parse_command("goto 0"), None);
        assert_eq!(parse_command("goto x"), None);
        assert_eq!(parse_command("seek"), None);
        assert_eq!(parse_command("seek inf"), None);
        assert_eq!(parse_command("dance"), None);
    }

    #[test]
    fn typed_command_is_dispatched() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        assert!(!commander.handle_event(&key(KeyCode::Char('n')), &tx));
        assert!(commander.handle_event(&key(KeyCode::Char(':')), &tx));
        assert!(commander.active());

        for c in "goto 3".chars() {
            assert!(commander.handle_event(&key(KeyCode::Char(c)), &tx));
        }
        assert!(commander.handle_event(&key(KeyCode::Enter), &tx));

        assert!(!commander.active());
        assert_eq!(commander.input.value(), "");
        assert!(matches!(rx.try_recv(), Ok(AppEvent::Command(Command::GoTo(2)))));
    }

    #[test]
    fn escape_abandons_input() {
        let (tx, rx) = mpsc::channel();
        let mut commander = Commander::new();

        commander.handle_event(&key(KeyCode::Char(':')), &tx);
        commander.handle_event(&key(KeyCode::Char('q')), &tx);
        commander.handle_event(&key(KeyCode::Esc), &tx);

        assert!(!commander.active());
        assert!(rx.try_recv().is_err());
    }
}
