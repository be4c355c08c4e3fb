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

//! Radar overlay tile source.
//!
//! Each radar frame gets its own `HttpTiles` instance built from a
//! cache-busted template. Overlay tiles are never written to disk.

use eframe::egui;
use log::debug;
use radar_client::tiles::{LayerFactory, LayerKey, TileTemplate};
use walkers::sources::{Attribution, TileSource};
use walkers::{HttpOptions, HttpTiles, TileId};

/// Highest zoom level the tile server renders
pub const RADAR_MAX_ZOOM: u8 = 14;

/// Tile source for one radar frame
#[derive(Debug, Clone)]
pub struct RadarTileSource {
    template: TileTemplate,
}

impl RadarTileSource {
    pub fn new(template: TileTemplate) -> Self {
        Self { template }
    }
}

impl TileSource for RadarTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        self.template.expand(tile_id.zoom, tile_id.x, tile_id.y)
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "Radar data: NOAA MRMS",
            url: "https://www.nssl.noaa.gov/projects/mrms/",
            logo_light: None,
            logo_dark: None,
        }
    }

    fn max_zoom(&self) -> u8 {
        RADAR_MAX_ZOOM
    }
}

/// Builds a fresh uncached tile layer for every radar frame
pub struct RadarLayerFactory {
    ctx: egui::Context,
}

impl std::fmt::Debug for RadarLayerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadarLayerFactory").finish_non_exhaustive()
    }
}

impl RadarLayerFactory {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl LayerFactory for RadarLayerFactory {
    type Layer = HttpTiles;

    fn create(&mut self, key: LayerKey, template: &TileTemplate) -> HttpTiles {
        debug!("Mounting radar overlay {} from {}", key, template);

        let http_options = HttpOptions {
            cache: None,
            ..Default::default()
        };

        HttpTiles::with_options(
            RadarTileSource::new(template.clone()),
            http_options,
            self.ctx.clone(),
        )
    }
}
