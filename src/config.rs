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

//! Application configuration management.
//!
//! Persistent settings are stored in TOML via `confy`. The tile server
//! address can be overridden per run from the environment or the command
//! line; overrides are never written back to disk.

use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "radar-desktop";
const CONFIG_NAME: &str = "config";

/// Environment variable overriding the tile server base URL
pub const API_URL_ENV: &str = "RADAR_API_URL";

/// Default tile server address (local development backend)
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Geographic center of the contiguous United States
pub const DEFAULT_CENTER_LAT: f64 = 39.8283;
pub const DEFAULT_CENTER_LON: f64 = -98.5795;

/// Deepest zoom level the map allows
pub const MAX_ZOOM: f64 = 14.0;

/// Base map imagery provider
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseMap {
    #[default]
    OpenStreetMap,
    CartoDark,
}

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Tile server base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Seconds between metadata polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Radar overlay opacity (0.0 - 1.0)
    #[serde(default = "default_overlay_opacity")]
    pub overlay_opacity: f32,

    /// Base map imagery
    #[serde(default)]
    pub base_map: BaseMap,

    /// Initial map zoom level
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,

    /// Initial map center latitude
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    /// Initial map center longitude
    #[serde(default = "default_center_lon")]
    pub center_lon: f64,

    /// Show the reflectivity legend
    #[serde(default = "default_true")]
    pub show_legend: bool,

    /// Outline the radar coverage area
    #[serde(default)]
    pub show_bounds: bool,
}

// Default value functions for serde
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_overlay_opacity() -> f32 {
    0.7
}

fn default_zoom() -> f64 {
    5.0
}

fn default_center_lat() -> f64 {
    DEFAULT_CENTER_LAT
}

fn default_center_lon() -> f64 {
    DEFAULT_CENTER_LON
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            overlay_opacity: default_overlay_opacity(),
            base_map: BaseMap::default(),
            default_zoom: default_zoom(),
            center_lat: DEFAULT_CENTER_LAT,
            center_lon: DEFAULT_CENTER_LON,
            show_legend: true,
            show_bounds: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Apply per-run overrides: command line first, then environment.
    pub fn apply_overrides(
        &mut self,
        cli_api_url: Option<String>,
        env_api_url: Option<String>,
        cli_interval_secs: Option<u64>,
    ) {
        if let Some(url) = cli_api_url.or(env_api_url.filter(|u| !u.is_empty())) {
            self.api_base_url = url;
        }
        if let Some(secs) = cli_interval_secs {
            self.poll_interval_secs = secs;
        }
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn sanitize(&mut self) {
        let trimmed = self.api_base_url.trim();
        if trimmed.is_empty() {
            warn!("No tile server configured, using {}", DEFAULT_API_BASE_URL);
            self.api_base_url = DEFAULT_API_BASE_URL.to_string();
        } else if trimmed.len() != self.api_base_url.len() {
            self.api_base_url = trimmed.to_string();
        }

        self.poll_interval_secs = self.poll_interval_secs.max(1);
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, self.poll_interval_secs);
        self.overlay_opacity = self.overlay_opacity.clamp(0.0, 1.0);
        self.default_zoom = self.default_zoom.clamp(0.0, MAX_ZOOM);
        self.center_lat = self.center_lat.clamp(-85.0, 85.0);
        self.center_lon = self.center_lon.clamp(-180.0, 180.0);
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
