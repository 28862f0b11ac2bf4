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

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
    controller::palette::Palette, events::AppEvent, playlist, tasks::TaskContext,
};

pub(super) fn fetch_playlist(ctx: &mut TaskContext, force: bool) -> Result<()> {
    let now = Instant::now();

    if !force {
        if let Some(tracks) = ctx.cache.fresh(now) {
            debug!(count = tracks.len(), "Serving playlist from cache");
            ctx.event_tx.send(AppEvent::PlaylistReady(tracks.to_vec()))?;
            return Ok(());
        }
    }

    let tracks = playlist::load_tracks(ctx.client, ctx.config);
    info!(count = tracks.len(), force, "Playlist loaded");

    if !tracks.is_empty() {
        ctx.cache.store(now, tracks.clone());
    }

    ctx.event_tx.send(AppEvent::PlaylistReady(tracks))?;

    Ok(())
}

pub(super) fn sample_palette(ctx: &mut TaskContext, index: usize, url: &str) -> Result<()> {
    let bytes = ctx
        .client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .with_context(|| format!("Failed to download thumbnail {}", url))?;

    let palette = Palette::from_encoded(&bytes)?;
    debug!(index, ?palette, "Thumbnail sampled");

    ctx.event_tx.send(AppEvent::PaletteReady(index, palette))?;

    Ok(())
}
