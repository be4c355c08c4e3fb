// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Radar tile addressing.
//!
//! Tiles are served under `/tiles/{z}/{x}/{y}.png`. When the radar frame is
//! known, its Unix timestamp is appended as `?t=` so every frame gets a URL
//! that no cache has seen before. Without a frame the bare template is used,
//! which is a stable cache key for the "no data" state.

mod overlay;

pub use overlay::{plan_remount, LayerFactory, LayerKey, OverlaySlot, RemountPlan};

use std::fmt;

use crate::http::join_url;

/// Tile path relative to the API base URL, with XYZ placeholders.
pub const TILE_PATH_TEMPLATE: &str = "/tiles/{z}/{x}/{y}.png";

/// Query parameter carrying the cache-busting timestamp.
pub const CACHE_BUST_PARAM: &str = "t";

/// Tile URL with `{z}`, `{x}` and `{y}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileTemplate(String);

impl TileTemplate {
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute concrete tile coordinates.
    #[must_use]
    pub fn expand(&self, zoom: u8, x: u32, y: u32) -> String {
        self.0
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl fmt::Display for TileTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds radar tile templates against one API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileUrlBuilder {
    base_url: String,
}

impl TileUrlBuilder {
    /// An empty base URL produces same-origin relative templates.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Tile template for a radar frame.
    ///
    /// Pure: the same input always yields the same string. Any present
    /// timestamp, including zero, is appended verbatim.
    #[must_use]
    pub fn build(&self, timestamp_unix: Option<i64>) -> String {
        let base = join_url(&self.base_url, TILE_PATH_TEMPLATE);
        match timestamp_unix {
            Some(t) => format!("{}?{}={}", base, CACHE_BUST_PARAM, t),
            None => base,
        }
    }

    #[must_use]
    pub fn template(&self, timestamp_unix: Option<i64>) -> TileTemplate {
        TileTemplate(self.build(timestamp_unix))
    }
}
