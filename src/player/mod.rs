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

//! External player adapter.
//!
//! This module isolates the player controller from the embedded media
//! player. The embed itself (MPV) runs on a background worker thread, see
//! [`commands`], and reports back asynchronously through
//! [`PlayerNotification`]s.
//!
//! The embed is not usable until its `Ready` notification has arrived.
//! Before that, [`ExternalPlayer`] remembers only the most recent load and a
//! single pending play intent, and honours them as soon as it is ready.

mod commands;

use std::sync::mpsc::{self, Sender};

use thiserror::Error;
use tracing::debug;

use crate::{events::AppEvent, model::watch_url, player::commands::AudioPlayerCommand};

/// Playback state as reported by the embed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum EmbedState {
    #[default]
    Unstarted,
    Ended,
    Playing,
    Paused,
}

impl EmbedState {
    /// The embed's numeric state code. Transient states such as buffering
    /// have no variant.
    pub(crate) fn code(self) -> i32 {
        match self {
            Self::Unstarted => -1,
            Self::Ended => 0,
            Self::Playing => 1,
            Self::Paused => 2,
        }
    }
}

/// Inbound notifications from the embed, applied in arrival order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlayerNotification {
    Ready,
    StateChanged(EmbedState),
    TimeChanged(f64),
    DurationChanged(f64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum AdapterError {
    #[error("player is not ready")]
    NotReady,

    #[error("player worker has gone away")]
    Disconnected,
}

/// Commands and queries understood by an embeddable player.
pub(crate) trait PlaybackBackend {
    fn load_track(&mut self, id: &str) -> Result<(), AdapterError>;
    fn play(&mut self) -> Result<(), AdapterError>;
    fn pause(&mut self) -> Result<(), AdapterError>;
    fn seek_to(&mut self, seconds: f64) -> Result<(), AdapterError>;

    fn current_time(&self) -> Result<f64, AdapterError>;
    fn duration(&self) -> Result<f64, AdapterError>;
    fn state(&self) -> Result<EmbedState, AdapterError>;

    /// Updates any cached view of the embed from a notification.
    fn observe(&mut self, notification: &PlayerNotification);

    /// Releases the embed, after which every command fails.
    fn destroy(&mut self);
}

/// A handle to the MPV-backed embed.
///
/// This struct acts as a command proxy; it does not perform playback itself
/// but sends instructions to a background worker thread.
pub(crate) struct ExternalPlayer {
    command_tx: Option<Sender<AudioPlayerCommand>>,

    ready: bool,
    pending_load: Option<String>,
    pending_play: bool,

    state: EmbedState,
    time: f64,
    duration: f64,
}

impl ExternalPlayer {
    /// Spawns the player worker thread and returns a new adapter.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send notifications (and fatal errors)
    ///   back to the main event loop.
    pub(crate) fn new(event_tx: Sender<AppEvent>) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<AudioPlayerCommand>();

        commands::spawn_player_worker(command_rx, event_tx);

        Self::with_sender(command_tx)
    }

    fn with_sender(command_tx: Sender<AudioPlayerCommand>) -> Self {
        Self {
            command_tx: Some(command_tx),
            ready: false,
            pending_load: None,
            pending_play: false,
            state: EmbedState::Unstarted,
            time: 0.0,
            duration: 0.0,
        }
    }

    fn send(&self, command: AudioPlayerCommand) -> Result<(), AdapterError> {
        let tx = self.command_tx.as_ref().ok_or(AdapterError::Disconnected)?;
        tx.send(command).map_err(|_| AdapterError::Disconnected)
    }

    // Whether commands can go straight to the worker, or must be held back.
    fn is_ready(&self) -> Result<bool, AdapterError> {
        match self.command_tx {
            Some(_) => Ok(self.ready),
            None => Err(AdapterError::Disconnected),
        }
    }

    fn require_ready(&self) -> Result<(), AdapterError> {
        if self.is_ready()? {
            Ok(())
        } else {
            Err(AdapterError::NotReady)
        }
    }

    // Flushes whatever was requested before the embed became ready.
    fn flush_pending(&mut self) {
        if let Some(id) = self.pending_load.take() {
            if self.send(AudioPlayerCommand::Load(watch_url(&id))).is_err() {
                self.pending_load = Some(id);
                return;
            }
        }

        if self.pending_play {
            if self.send(AudioPlayerCommand::Play).is_ok() {
                self.pending_play = false;
            }
        }
    }
}

impl PlaybackBackend for ExternalPlayer {
    fn load_track(&mut self, id: &str) -> Result<(), AdapterError> {
        if !self.is_ready()? {
            debug!(id, "Player not ready, deferring load");
            self.pending_load = Some(id.to_string());
            return Ok(());
        }

        self.send(AudioPlayerCommand::Load(watch_url(id)))
    }

    fn play(&mut self) -> Result<(), AdapterError> {
        if !self.is_ready()? {
            self.pending_play = true;
            return Ok(());
        }

        self.send(AudioPlayerCommand::Play)
    }

    fn pause(&mut self) -> Result<(), AdapterError> {
        if !self.is_ready()? {
            self.pending_play = false;
            return Ok(());
        }

        self.send(AudioPlayerCommand::Pause)
    }

    fn seek_to(&mut self, seconds: f64) -> Result<(), AdapterError> {
        self.require_ready()?;
        self.send(AudioPlayerCommand::SeekAbsolute(seconds))
    }

    fn current_time(&self) -> Result<f64, AdapterError> {
        self.require_ready()?;
        Ok(self.time)
    }

    fn duration(&self) -> Result<f64, AdapterError> {
        self.require_ready()?;
        Ok(self.duration)
    }

    fn state(&self) -> Result<EmbedState, AdapterError> {
        self.require_ready()?;
        Ok(self.state)
    }

    fn observe(&mut self, notification: &PlayerNotification) {
        match *notification {
            PlayerNotification::Ready => {
                self.ready = true;
                self.flush_pending();
            }
            PlayerNotification::StateChanged(state) => {
                self.state = state;
                if state == EmbedState::Unstarted {
                    self.time = 0.0;
                    self.duration = 0.0;
                }
            }
            PlayerNotification::TimeChanged(seconds) => self.time = seconds,
            PlayerNotification::DurationChanged(seconds) => self.duration = seconds,
        }
    }

    fn destroy(&mut self) {
        if let Some(tx) = self.command_tx.take() {
            let _ = tx.send(AudioPlayerCommand::Shutdown);
        }
        self.ready = false;
        self.pending_load = None;
        self.pending_play = false;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Receiver;

    use super::*;

    fn player() -> (ExternalPlayer, Receiver<AudioPlayerCommand>) {
        let (tx, rx) = mpsc::channel();
        (ExternalPlayer::with_sender(tx), rx)
    }

    fn drain(rx: &Receiver<AudioPlayerCommand>) -> Vec<AudioPlayerCommand> {
        rx.try_iter().collect()
    }

    #[test]
    fn state_codes_match_embed() {
        assert_eq!(EmbedState::Unstarted.code(), -1);
        assert_eq!(EmbedState::Ended.code(), 0);
        assert_eq!(EmbedState::Playing.code(), 1);
        assert_eq!(EmbedState::Paused.code(), 2);
    }

    #[test]
    fn play_before_ready_is_honoured_on_ready() {
        let (mut player, rx) = player();

        player.load_track("first").unwrap();
        player.load_track("second").unwrap();
        player.play().unwrap();
        assert!(drain(&rx).is_empty());

        player.observe(&PlayerNotification::Ready);

        assert_eq!(
            drain(&rx),
            vec![
                AudioPlayerCommand::Load(watch_url("second")),
                AudioPlayerCommand::Play
            ]
        );
    }

    #[test]
    fn pause_before_ready_cancels_play_intent() {
        let (mut player, rx) = player();

        player.play().unwrap();
        player.pause().unwrap();
        player.observe(&PlayerNotification::Ready);

        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn queries_fail_until_ready() {
        let (mut player, _rx) = player();

        assert_eq!(player.seek_to(10.0), Err(AdapterError::NotReady));
        assert_eq!(player.current_time(), Err(AdapterError::NotReady));
        assert_eq!(player.state(), Err(AdapterError::NotReady));

        player.observe(&PlayerNotification::Ready);
        player.observe(&PlayerNotification::DurationChanged(200.0));
        player.observe(&PlayerNotification::TimeChanged(12.5));
        player.observe(&PlayerNotification::StateChanged(EmbedState::Playing));

        assert_eq!(player.duration(), Ok(200.0));
        assert_eq!(player.current_time(), Ok(12.5));
        assert_eq!(player.state(), Ok(EmbedState::Playing));
    }

    #[test]
    fn ready_player_sends_commands_directly() {
        let (mut player, rx) = player();
        player.observe(&PlayerNotification::Ready);

        player.load_track("abc").unwrap();
        player.pause().unwrap();
        player.seek_to(30.0).unwrap();

        assert_eq!(
            drain(&rx),
            vec![
                AudioPlayerCommand::Load(watch_url("abc")),
                AudioPlayerCommand::Pause,
                AudioPlayerCommand::SeekAbsolute(30.0)
            ]
        );
    }

    #[test]
    fn dead_worker_is_disconnected() {
        let (mut player, rx) = player();
        player.observe(&PlayerNotification::Ready);
        drop(rx);

        assert_eq!(player.play(), Err(AdapterError::Disconnected));
    }

    #[test]
    fn destroy_shuts_down_worker() {
        let (mut player, rx) = player();
        player.observe(&PlayerNotification::Ready);

        player.destroy();

        assert_eq!(drain(&rx), vec![AudioPlayerCommand::Shutdown]);
        assert_eq!(player.play(), Err(AdapterError::Disconnected));
        assert_eq!(player.state(), Err(AdapterError::Disconnected));
    }
}
