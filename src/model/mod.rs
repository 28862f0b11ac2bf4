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

//! Domain models and core data structures.
//!
//! This module defines the central entity of the application, the playable
//! [`Track`], as normalised from the upstream playlist API.

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// One playable entry of the playlist.
///
/// Tracks are immutable once fetched, and identified by `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Track {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) owner_label: String,
    pub(crate) thumbnail_url: String,
    pub(crate) external_url: String,
}

impl Track {
    pub(crate) fn new(id: &str, title: &str, owner_label: &str, thumbnail_url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            owner_label: owner_label.to_string(),
            thumbnail_url: thumbnail_url.to_string(),
            external_url: watch_url(id),
        }
    }
}

/// Builds the public watch page URL for a media identifier.
///
/// This is also the URL handed to the embedded player, which resolves the
/// actual stream itself.
pub(crate) fn watch_url(id: &str) -> String {
    format!("{WATCH_URL}{id}")
}
