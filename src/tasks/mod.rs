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

//! Asynchronous application task processing.
//!
//! This module implements the command pattern used to offload blocking work,
//! network requests and image decoding, from the main UI thread. It provides
//! a dedicated worker loop that translates [`AppTask`] requests into those
//! operations and broadcasts the results back to the application via
//! [`AppEvent`]s.
//!
//! Only actions that may block, or may take more than a trivial amount of time
//! to process, should be implemented as tasks. Other actions are likely more
//! suited to by events.
//!
//! Task failures are reported as [`AppEvent::Error`], which is logged and
//! otherwise dropped; the interface keeps showing whatever it had.

mod handlers;

use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

use crate::{
    config::AppConfig,
    controller::ControllerDelegate,
    events::AppEvent,
    model::Track,
    playlist::cache::PlaylistCache,
};

const USER_AGENT: &str = concat!("jazzui/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, PartialEq)]
pub(crate) enum AppTask {
    /// Fetches the playlist, from the cache unless `force` is set.
    FetchPlaylist { force: bool },

    /// Samples the palette of the thumbnail of the track at `index`.
    SamplePalette { index: usize, url: String },
}

/// Schedules thumbnail sampling whenever the active track changes.
impl ControllerDelegate for Sender<AppTask> {
    fn on_active_track_changed(&self, index: usize, track: &Track) {
        if track.thumbnail_url.is_empty() {
            debug!(index, "Active track has no thumbnail");
            return;
        }

        let _ = self.send(AppTask::SamplePalette {
            index,
            url: track.thumbnail_url.clone(),
        });
    }
}

/// Spawns a background thread to process application tasks.
///
/// This worker thread builds its own HTTP client and playlist cache and
/// enters a blocking loop, listening for incoming [`AppTask`]s.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_task_worker(
    config: &AppConfig,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) {
    let config = config.clone();

    thread::spawn(move || {
        let client = match build_client() {
            Ok(client) => client,
            Err(e) => {
                let _ = event_tx.send(AppEvent::FatalError(format!("{:#}", e)));
                return;
            }
        };

        let mut cache = PlaylistCache::new(config.cache_ttl());

        while let Ok(task) = task_rx.recv() {
            let mut ctx = TaskContext {
                config: &config,
                event_tx: &event_tx,
                client: &client,
                cache: &mut cache,
            };

            if let Err(e) = handle_task(task, &mut ctx) {
                let _ = event_tx.send(AppEvent::Error(format!("Task failed: {:#}", e)));
            }
        }

        debug!("Task worker finished");
    });
}

fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")
}

/// Bundles shared resources required by task handlers to simplify resource
/// passing when invoking those handler functions.
struct TaskContext<'a> {
    config: &'a AppConfig,
    event_tx: &'a Sender<AppEvent>,
    client: &'a Client,
    cache: &'a mut PlaylistCache,
}

/// Orchestrates the execution of a single task.
///
/// This function implements the logic for each task and sends the result back
/// through the application event channel.
fn handle_task(task: AppTask, ctx: &mut TaskContext) -> Result<()> {
    match task {
        AppTask::FetchPlaylist { force } => handlers::fetch_playlist(ctx, force),
        AppTask::SamplePalette { index, url } => handlers::sample_palette(ctx, index, &url),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn track_change_schedules_sampling() {
        let (tx, rx) = mpsc::channel();
        let track = Track::new("id", "Title", "Owner", "https://i.ytimg.com/vi/id/hq.jpg");

        tx.on_active_track_changed(4, &track);

        assert_eq!(
            rx.try_recv(),
            Ok(AppTask::SamplePalette {
                index: 4,
                url: "https://i.ytimg.com/vi/id/hq.jpg".to_string()
            })
        );
    }

    #[test]
    fn track_without_thumbnail_is_not_sampled() {
        let (tx, rx) = mpsc::channel();

        tx.on_active_track_changed(0, &Track::new("id", "Title", "", ""));

        assert!(rx.try_recv().is_err());
    }
}
