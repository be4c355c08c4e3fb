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

//! Client library for weather radar tile servers.
//!
//! The backend serves radar reflectivity as XYZ PNG tiles plus a small
//! metadata document naming the current frame. This crate holds everything a
//! viewer needs that is not drawing:
//!
//! - **Metadata**: the document model and its "no data" rule
//! - **HTTP**: a one-shot metadata client with normalised errors
//! - **Poller**: a background task keeping a [`PollState`] current
//! - **Tiles**: cache-busting tile templates and overlay remount planning
//! - **Display**: freshness and timestamp text for the status readout
//! - **Legend**: the reflectivity color scale
//!
//! # Quick Start
//!
//! ```no_run
//! use radar_client::{MetadataClient, Poller, PollerConfig, TileUrlBuilder};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = MetadataClient::new("http://localhost:8000", Duration::from_secs(30)).unwrap();
//!     let urls = TileUrlBuilder::new(client.base_url());
//!     let poller = Poller::spawn(client, PollerConfig::default());
//!
//!     let mut updates = poller.subscribe();
//!     while updates.changed().await.is_ok() {
//!         let state = updates.borrow_and_update().clone();
//!         println!("tiles: {}", urls.build(state.timestamp_unix()));
//!     }
//! }
//! ```
//!
//! # Overlay Remounting
//!
//! ```
//! use radar_client::tiles::{LayerFactory, LayerKey, OverlaySlot, TileTemplate};
//! use radar_client::TileUrlBuilder;
//!
//! struct Urls;
//!
//! impl LayerFactory for Urls {
//!     type Layer = String;
//!
//!     fn create(&mut self, _key: LayerKey, template: &TileTemplate) -> String {
//!         template.to_string()
//!     }
//! }
//!
//! let mut slot = OverlaySlot::new(Urls, TileUrlBuilder::new(""));
//! assert!(slot.sync(Some(1000)));
//! assert!(!slot.sync(Some(1000)));
//! assert_eq!(slot.layer_mut().unwrap(), "/tiles/{z}/{x}/{y}.png?t=1000");
//! ```

pub mod display;
pub mod http;
pub mod legend;
pub mod metadata;
pub mod poller;
pub mod tiles;

pub use display::{format_elapsed, format_timestamp, local_zone, RefreshTicker, StatusView};
pub use http::{FetchError, MetadataClient, MetadataSource};
pub use legend::{LegendEntry, LEGEND};
pub use metadata::{Bounds, DataStatus, RadarMetadata};
pub use poller::{PollState, Poller, PollerConfig};
pub use tiles::{LayerKey, OverlaySlot, TileTemplate, TileUrlBuilder};
