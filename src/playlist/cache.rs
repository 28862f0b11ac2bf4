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

//! In-memory revalidation cache for the fetched playlist.

use std::time::{Duration, Instant};

use crate::model::Track;

pub(crate) struct PlaylistCache {
    ttl: Duration,
    entry: Option<(Instant, Vec<Track>)>,
}

impl PlaylistCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Returns the cached list if it was stored less than one TTL ago.
    pub(crate) fn fresh(&self, now: Instant) -> Option<&[Track]> {
        self.entry
            .as_ref()
            .filter(|(stored, _)| now.saturating_duration_since(*stored) < self.ttl)
            .map(|(_, tracks)| tracks.as_slice())
    }

    pub(crate) fn store(&mut self, now: Instant, tracks: Vec<Track>) {
        self.entry = Some((now, tracks));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_expire_after_ttl() {
        let start = Instant::now();
        let mut cache = PlaylistCache::new(Duration::from_secs(60));
        assert!(cache.fresh(start).is_none());

        cache.store(start, vec![Track::new("a", "A", "", "")]);

        assert_eq!(cache.fresh(start + Duration::from_secs(59)).map(<[Track]>::len), Some(1));
        assert!(cache.fresh(start + Duration::from_secs(60)).is_none());
    }
}
