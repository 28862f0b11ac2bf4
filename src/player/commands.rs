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

//! MPV-backed embed and event processing.
//!
//! This module hosts the embedded player, leveraging `libmpv` (with its
//! `ytdl` hook) to stream tracks straight from their watch URLs. It manages a
//! background worker thread that bridges the adapter's command interface and
//! the low-level MPV property observation system.
//!
//! # Architecture
//!
//! The worker operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`AudioPlayerCommand`]s from the adapter.
//! 2. **Event Channel**: Broadcasts [`PlayerNotification`]s, wrapped in
//!    [`AppEvent`]s, to the main event loop.
//!
//! A `Ready` notification is sent once the MPV context has been built; the
//! adapter holds commands back until then.

use anyhow::{Context, Result};
use mpv::Format;
use std::{
    sync::mpsc::{Receiver, Sender, TryRecvError},
    thread,
};
use tracing::{debug, info};

use crate::{
    events::AppEvent,
    player::{EmbedState, PlayerNotification},
};

#[derive(Debug, PartialEq)]
pub(crate) enum AudioPlayerCommand {
    Load(String),
    Play,
    Pause,
    SeekAbsolute(f64),
    Shutdown,
}

/// Spawns the player worker thread to process playback commands.
///
/// If the internal worker returns an error, it is caught here and broadcast
/// as a fatal application event.
///
/// # Arguments
///
/// * `command_rx` - The receiving end of the player command channel.
/// * `event_tx` - The channel used to broadcast playback updates and errors.
pub(crate) fn spawn_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = audio_player_worker(command_rx, event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The subset of MPV events the embed cares about.
#[derive(Debug, PartialEq)]
enum MpvSignal {
    Title(String),
    Duration(f64),
    Paused(bool),
    Time(f64),
    Idle(bool),
    EndOfFile,
}

impl MpvSignal {
    fn from_event(event: mpv::Event) -> Option<Self> {
        match event {
            mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
                ("media-title", Format::Str(title)) => Some(Self::Title(title.to_string())),
                ("duration", Format::Double(duration)) => Some(Self::Duration(duration)),
                ("pause", Format::Flag(pause)) => Some(Self::Paused(pause)),
                ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => Some(Self::Time(seconds)),
                ("idle-active", Format::Flag(idle_active)) => Some(Self::Idle(idle_active)),
                _ => None,
            },
            mpv::Event::EndFile(Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF)) => {
                Some(Self::EndOfFile)
            }
            _ => None,
        }
    }
}

/// Tracks the raw MPV flags that together make up an [`EmbedState`].
struct EmbedFlags {
    is_paused: bool,
    is_idle: bool,
    reported: EmbedState,
}

impl Default for EmbedFlags {
    fn default() -> Self {
        Self {
            is_paused: false,
            is_idle: true,
            reported: EmbedState::Unstarted,
        }
    }
}

impl EmbedFlags {
    fn state(&self) -> EmbedState {
        if self.is_idle {
            EmbedState::Unstarted
        } else if self.is_paused {
            EmbedState::Paused
        } else {
            EmbedState::Playing
        }
    }

    /// Folds one signal into the flags, returning the notifications it
    /// produces in order. A state change is only reported when the derived
    /// [`EmbedState`] differs from the last one reported.
    fn apply(&mut self, signal: MpvSignal) -> Vec<PlayerNotification> {
        let mut notifications = vec![];

        match signal {
            MpvSignal::Title(title) => info!(%title, "Now playing"),
            MpvSignal::Duration(duration) => {
                notifications.push(PlayerNotification::DurationChanged(duration));
            }
            MpvSignal::Paused(paused) => self.is_paused = paused,
            MpvSignal::Time(seconds) => notifications.push(PlayerNotification::TimeChanged(seconds)),
            MpvSignal::Idle(idle) => self.is_idle = idle,
            MpvSignal::EndOfFile => {
                self.reported = EmbedState::Ended;
                notifications.push(PlayerNotification::StateChanged(EmbedState::Ended));
                return notifications;
            }
        }

        let state = self.state();

        // After an end of file MPV goes idle, which must not mask the end
        if self.reported == EmbedState::Ended && state == EmbedState::Unstarted {
            return notifications;
        }

        if state != self.reported {
            self.reported = state;
            notifications.push(PlayerNotification::StateChanged(state));
        }

        notifications
    }
}

/// The primary execution loop for the embed.
///
/// This function initializes a local `libmpv` context and alternates between
/// draining commands and waiting on MPV events, until a shutdown command
/// arrives or the adapter is dropped.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if the internal
/// command/event loops encounter an unrecoverable failure.
fn audio_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder
            .set_option("ytdl", "yes")
            .context("Failed to enable ytdl hook")?;
        builder
            .set_option("ytdl-format", "bestaudio/best")
            .context("Failed to set ytdl format")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<&str>("media-title", 0)
        .context("Failed to observe media-title")?;
    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<bool>("idle-active", 0)
        .context("Failed to observe idle-active")?;

    info!("Embedded player ready");
    notify(&event_tx, PlayerNotification::Ready)?;

    let mut flags = EmbedFlags::default();

    while process_commands(&mut handler, &command_rx)? {
        process_mpv_events(&mut handler, &mut flags, &event_tx)?;
    }

    debug!("Embedded player shut down");
    Ok(())
}

fn notify(event_tx: &Sender<AppEvent>, notification: PlayerNotification) -> Result<()> {
    event_tx
        .send(AppEvent::Player(notification))
        .context("Failed to send player notification")
}

/// Drains and executes all pending commands from the adapter.
///
/// Returns `false` once the worker should stop.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<AudioPlayerCommand>,
) -> Result<bool> {
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(TryRecvError::Empty) => return Ok(true),
            Err(TryRecvError::Disconnected) => return Ok(false),
        };

        match command {
            AudioPlayerCommand::Load(url) => {
                handler
                    .command(&["loadfile", &url, "replace"])
                    .context(format!("Failed to load: {}", &url))?;
                handler.set_property("pause", false)?;
            }
            AudioPlayerCommand::Play => handler.set_property("pause", false)?,
            AudioPlayerCommand::Pause => handler.set_property("pause", true)?,
            AudioPlayerCommand::SeekAbsolute(seconds) => {
                handler.command(&["seek", &seconds.to_string(), "absolute"])?;
            }
            AudioPlayerCommand::Shutdown => return Ok(false),
        }
    }
}

/// Polls for MPV events and forwards the resulting notifications.
///
/// This function waits for up to 50ms for an event from the MPV context.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    flags: &mut EmbedFlags,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    let Some(signal) = handler.wait_event(0.05).and_then(MpvSignal::from_event) else {
        return Ok(());
    };

    for notification in flags.apply(signal) {
        if let PlayerNotification::StateChanged(state) = notification {
            debug!(code = state.code(), "Embed state changed");
        }
        notify(event_tx, notification)?;
    }

    Ok(())
}
