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

use eframe::egui;
use walkers::sources::{Attribution, TileSource};
use walkers::{HttpOptions, HttpTiles, TileId};

use crate::config::BaseMap;

/// Static base map imagery under the radar overlay
#[derive(Debug, Clone, Copy)]
pub struct BaseTileSource {
    base_map: BaseMap,
}

impl BaseTileSource {
    pub fn new(base_map: BaseMap) -> Self {
        Self { base_map }
    }

    /// Directory name for the on-disk tile cache
    fn cache_name(self) -> &'static str {
        match self.base_map {
            BaseMap::OpenStreetMap => "openstreetmap",
            BaseMap::CartoDark => "carto_dark",
        }
    }

    /// Build cached HTTP tiles for this source
    pub fn into_tiles(self, ctx: &egui::Context) -> HttpTiles {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| std::path::PathBuf::from(".cache"))
            .join("radar-desktop")
            .join("basemap")
            .join(self.cache_name());

        let http_options = HttpOptions {
            cache: Some(cache_dir),
            ..Default::default()
        };

        HttpTiles::with_options(self, http_options, ctx.clone())
    }
}

impl TileSource for BaseTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        match self.base_map {
            BaseMap::OpenStreetMap => format!(
                "https://tile.openstreetmap.org/{}/{}/{}.png",
                tile_id.zoom, tile_id.x, tile_id.y
            ),
            BaseMap::CartoDark => {
                // Subdomain load balancing (a, b, c, d) based on tile coordinates
                let subdomain = ['a', 'b', 'c', 'd'][((tile_id.x + tile_id.y) % 4) as usize];
                format!(
                    "https://{}.basemaps.cartocdn.com/dark_all/{}/{}/{}.png",
                    subdomain, tile_id.zoom, tile_id.x, tile_id.y
                )
            }
        }
    }

    fn attribution(&self) -> Attribution {
        match self.base_map {
            BaseMap::OpenStreetMap => Attribution {
                text: "© OpenStreetMap contributors",
                url: "https://www.openstreetmap.org/copyright",
                logo_light: None,
                logo_dark: None,
            },
            BaseMap::CartoDark => Attribution {
                text: "© OpenStreetMap contributors, © CARTO",
                url: "https://carto.com/attributions",
                logo_light: None,
                logo_dark: None,
            },
        }
    }
}
