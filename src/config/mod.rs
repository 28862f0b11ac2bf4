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

//! Application configuration.
//!
//! This module manages the application configuration file. The API
//! credential is normally supplied through the environment rather than the
//! file, see [`AppConfig::api_key`].

use std::{env, time::Duration};

use serde::{Deserialize, Serialize};

use crate::controller::gesture::GestureConfig;

pub(crate) const APP_NAME: &str = "jazzui";

pub(crate) const API_KEY_VAR: &str = "YOUTUBE_API_KEY";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub playlist_id: String,
    pub api_base: String,
    /// Fallback credential, only used when the environment variable is unset.
    pub api_key: Option<String>,
    pub max_pages: usize,
    pub cache_ttl_secs: u64,
    pub initial_slide: usize,
    pub wheel_threshold: f64,
    pub wheel_lock_ms: u64,
    pub wheel_step: f64,
    pub frame_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            playlist_id: "PLn7_KfecPX-ai6F4kwSWDZvLW5RezCE5j".to_string(),
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: None,
            // The upstream caps playlists at 5000 items, 50 per page
            max_pages: 100,
            cache_ttl_secs: 3600,
            initial_slide: 3,
            wheel_threshold: 50.0,
            wheel_lock_ms: 420,
            wheel_step: 25.0,
            frame_ms: 50,
        }
    }
}

impl AppConfig {
    /// Resolves the API credential, preferring the environment.
    ///
    /// Empty values are treated as absent.
    pub(crate) fn api_key(&self) -> Option<String> {
        resolve_api_key(env::var(API_KEY_VAR).ok(), self.api_key.as_deref())
    }

    pub(crate) fn gesture(&self) -> GestureConfig {
        GestureConfig {
            threshold: self.wheel_threshold,
            lock: Duration::from_millis(self.wheel_lock_ms),
        }
    }

    pub(crate) fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub(crate) fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

fn resolve_api_key(from_env: Option<String>, fallback: Option<&str>) -> Option<String> {
    from_env
        .or_else(|| fallback.map(str::to_string))
        .filter(|key| !key.trim().is_empty())
}

pub fn load_config() -> AppConfig {
    confy::load(APP_NAME, None).unwrap_or_default()
}
