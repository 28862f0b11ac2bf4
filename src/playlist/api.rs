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

//! Upstream playlist API client and response models.
//!
//! Only the parts of the `playlistItems` response that are needed to build a
//! [`Track`] are modelled, everything is optional since the upstream omits
//! fields freely for unavailable entries.

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::{
    config::AppConfig,
    model::Track,
    playlist::{FetchError, PageSource},
};

const PAGE_SIZE: &str = "50";

const PRIVATE_TITLE: &str = "Private video";
const DELETED_TITLE: &str = "Deleted video";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistItemsResponse {
    #[serde(default)]
    pub(crate) items: Vec<PlaylistItem>,
    pub(crate) next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PlaylistItem {
    pub(crate) snippet: Option<Snippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snippet {
    #[serde(default)]
    pub(crate) title: String,
    pub(crate) channel_title: Option<String>,
    pub(crate) video_owner_channel_title: Option<String>,
    pub(crate) thumbnails: Option<Thumbnails>,
    pub(crate) resource_id: Option<ResourceId>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Thumbnails {
    pub(crate) maxres: Option<Thumbnail>,
    pub(crate) high: Option<Thumbnail>,
    pub(crate) medium: Option<Thumbnail>,
    pub(crate) default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub(crate) url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourceId {
    pub(crate) video_id: Option<String>,
}

impl PlaylistItem {
    /// Normalises an item into a [`Track`], or `None` if it is not playable.
    pub(crate) fn into_track(self) -> Option<Track> {
        let snippet = self.snippet?;

        if snippet.title == PRIVATE_TITLE || snippet.title == DELETED_TITLE {
            return None;
        }

        let id = snippet
            .resource_id
            .as_ref()
            .and_then(|r| r.video_id.as_deref())
            .filter(|id| !id.is_empty())?;

        let owner = snippet
            .video_owner_channel_title
            .as_deref()
            .or(snippet.channel_title.as_deref())
            .unwrap_or_default();

        let thumbnail = snippet
            .thumbnails
            .as_ref()
            .map(Thumbnails::best_url)
            .unwrap_or_default();

        Some(Track::new(id, &snippet.title, owner, thumbnail))
    }
}

impl Thumbnails {
    /// Picks the highest resolution thumbnail available.
    pub(crate) fn best_url(&self) -> &str {
        [&self.maxres, &self.high, &self.medium, &self.default]
            .into_iter()
            .find_map(|t| t.as_ref().map(|t| t.url.as_str()))
            .unwrap_or_default()
    }
}

/// Blocking client for the `playlistItems` endpoint of a single playlist.
pub(crate) struct YoutubePlaylistApi {
    client: Client,
    endpoint: String,
    playlist_id: String,
    api_key: String,
}

impl YoutubePlaylistApi {
    /// Creates a client for the configured playlist.
    ///
    /// Returns `None` when no credential is available, which callers treat
    /// as degraded mode rather than an error.
    pub(crate) fn from_config(client: &Client, config: &AppConfig) -> Option<Self> {
        let api_key = config.api_key()?;

        Some(Self {
            client: client.clone(),
            endpoint: format!("{}/playlistItems", config.api_base.trim_end_matches('/')),
            playlist_id: config.playlist_id.clone(),
            api_key,
        })
    }
}

impl PageSource for YoutubePlaylistApi {
    fn fetch_page(&self, page_token: Option<&str>) -> Result<PlaylistItemsResponse, FetchError> {
        let mut query = vec![
            ("part", "snippet"),
            ("playlistId", self.playlist_id.as_str()),
            ("maxResults", PAGE_SIZE),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self.client.get(&self.endpoint).query(&query).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PlaylistItemsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_upstream_page() {
        let page = parse(
            r#"{
                "kind": "youtube#playlistItemListResponse",
                "nextPageToken": "CDIQAA",
                "items": [{
                    "snippet": {
                        "title": "So What",
                        "channelTitle": "Uploader",
                        "videoOwnerChannelTitle": "Miles Davis - Topic",
                        "thumbnails": {
                            "default": { "url": "d.jpg", "width": 120 },
                            "high": { "url": "h.jpg", "width": 480 }
                        },
                        "resourceId": { "kind": "youtube#video", "videoId": "zqNTltOGh5c" }
                    }
                }]
            }"#,
        );

        assert_eq!(page.next_page_token.as_deref(), Some("CDIQAA"));

        let tracks: Vec<Track> = page.items.into_iter().filter_map(PlaylistItem::into_track).collect();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "zqNTltOGh5c");
        assert_eq!(tracks[0].owner_label, "Miles Davis - Topic");
        assert_eq!(tracks[0].thumbnail_url, "h.jpg");
    }

    #[test]
    fn missing_items_is_an_empty_page() {
        let page = parse("{}");
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn thumbnail_preference_is_descending_resolution() {
        let thumbs = |maxres: Option<&str>, medium: Option<&str>, default: Option<&str>| Thumbnails {
            maxres: maxres.map(|url| Thumbnail { url: url.to_string() }),
            high: None,
            medium: medium.map(|url| Thumbnail { url: url.to_string() }),
            default: default.map(|url| Thumbnail { url: url.to_string() }),
        };

        assert_eq!(thumbs(Some("max"), Some("med"), Some("def")).best_url(), "max");
        assert_eq!(thumbs(None, Some("med"), Some("def")).best_url(), "med");
        assert_eq!(thumbs(None, None, Some("def")).best_url(), "def");
        assert_eq!(thumbs(None, None, None).best_url(), "");
    }

    #[test]
    fn owner_label_falls_back_to_channel_then_empty() {
        let item = |owner: Option<&str>, channel: Option<&str>| PlaylistItem {
            snippet: Some(Snippet {
                title: "Track".to_string(),
                channel_title: channel.map(str::to_string),
                video_owner_channel_title: owner.map(str::to_string),
                thumbnails: None,
                resource_id: Some(ResourceId {
                    video_id: Some("id".to_string()),
                }),
            }),
        };

        assert_eq!(item(Some("owner"), Some("chan")).into_track().unwrap().owner_label, "owner");
        assert_eq!(item(None, Some("chan")).into_track().unwrap().owner_label, "chan");
        assert_eq!(item(None, None).into_track().unwrap().owner_label, "");
    }

    #[test]
    fn unplayable_items_are_rejected() {
        let titled = |title: &str| PlaylistItem {
            snippet: Some(Snippet {
                title: title.to_string(),
                resource_id: Some(ResourceId {
                    video_id: Some("id".to_string()),
                }),
                ..Snippet::default()
            }),
        };

        assert!(titled("Private video").into_track().is_none());
        assert!(titled("Deleted video").into_track().is_none());
        assert!(titled("Autumn Leaves").into_track().is_some());
        assert!(PlaylistItem { snippet: None }.into_track().is_none());

        let no_id = PlaylistItem {
            snippet: Some(Snippet {
                title: "Autumn Leaves".to_string(),
                resource_id: Some(ResourceId { video_id: None }),
                ..Snippet::default()
            }),
        };
        assert!(no_id.into_track().is_none());
    }
}
