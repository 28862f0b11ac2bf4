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

//! Playlist retrieval.
//!
//! This module fetches the ordered track list from the upstream playlist API,
//! following continuation tokens page by page and normalising each entry into
//! a [`Track`].
//!
//! # Failure policy
//!
//! Nothing here is fatal. A missing credential yields an empty list, and any
//! upstream failure stops pagination and keeps whatever was accumulated so
//! far. Callers must treat an empty or short list as a valid state.

pub(crate) mod api;
pub(crate) mod cache;

use std::collections::HashSet;

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    config::{API_KEY_VAR, AppConfig},
    model::Track,
    playlist::api::{PlaylistItem, PlaylistItemsResponse, YoutubePlaylistApi},
};

#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A source of playlist pages, addressed by an opaque continuation token.
pub(crate) trait PageSource {
    fn fetch_page(&self, page_token: Option<&str>) -> Result<PlaylistItemsResponse, FetchError>;
}

/// Fetches the configured playlist.
///
/// Degrades to an empty list, with a warning, when no credential is set.
pub(crate) fn load_tracks(client: &Client, config: &AppConfig) -> Vec<Track> {
    match YoutubePlaylistApi::from_config(client, config) {
        Some(api) => fetch_playlist(&api, config.max_pages),
        None => {
            warn!("{} is not set, playlist will be empty", API_KEY_VAR);
            vec![]
        }
    }
}

/// Accumulates every playable track from successive pages of `source`.
///
/// Pagination ends when the upstream stops returning a continuation token.
/// It also ends after `max_pages` requests, or if a token is seen twice, so
/// a misbehaving upstream cannot keep the caller looping forever. At least
/// one page is always requested.
pub(crate) fn fetch_playlist(source: &impl PageSource, max_pages: usize) -> Vec<Track> {
    let max_pages = max_pages.max(1);
    let mut tracks = Vec::new();
    let mut seen_tokens = HashSet::new();
    let mut page_token: Option<String> = None;

    for page_number in 0..max_pages {
        let page = match source.fetch_page(page_token.as_deref()) {
            Ok(page) => page,
            Err(e) => {
                error!(page = page_number, "Playlist fetch failed: {}", e);
                return tracks;
            }
        };

        let before = tracks.len();
        tracks.extend(page.items.into_iter().filter_map(PlaylistItem::into_track));
        debug!(page = page_number, added = tracks.len() - before, "Fetched playlist page");

        page_token = match page.next_page_token.filter(|token| !token.is_empty()) {
            Some(token) if !seen_tokens.insert(token.clone()) => {
                warn!(token = %token, "Continuation token repeated, stopping pagination");
                return tracks;
            }
            Some(token) => Some(token),
            None => {
                info!(tracks = tracks.len(), "Playlist fetched");
                return tracks;
            }
        };
    }

    warn!(max_pages, "Playlist page limit reached, result may be truncated");
    tracks
}
