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

//! Radar Desktop application shell.
//!
//! Each frame the app reads the latest poll snapshot, brings the radar
//! overlay in line with the advertised frame, and draws the map with the
//! floating status and legend panes on top.

use std::time::Instant;

use chrono::Utc;
use chrono_tz::Tz;
use eframe::egui;
use log::{debug, warn};
use radar_client::{local_zone, OverlaySlot, Poller, PollerConfig, RefreshTicker, StatusView, TileUrlBuilder};
use walkers::{lon_lat, HttpTiles, Map, MapMemory, Position};

use crate::config::{AppConfig, MAX_ZOOM};
use crate::map::{BaseTileSource, BoundsOutline, RadarLayerFactory};
use crate::ui::status_pane::StatusAction;
use crate::ui::{LegendPane, StatusPane};

/// Main window state. Dropping it stops the poller.
pub struct RadarApp {
    config: AppConfig,
    poller: Poller,
    base_tiles: HttpTiles,
    overlay: OverlaySlot<RadarLayerFactory>,
    map_memory: MapMemory,
    center: Position,
    status_pane: StatusPane,
    legend_pane: LegendPane,
    ticker: RefreshTicker,
    zone: Tz,
}

impl std::fmt::Debug for RadarApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadarApp")
            .field("config", &self.config)
            .field("poller", &self.poller)
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}

impl RadarApp {
    /// Build the app and start polling on the given runtime.
    pub fn new<S>(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        source: S,
        runtime: &tokio::runtime::Handle,
    ) -> Self
    where
        S: radar_client::MetadataSource,
    {
        let ctx = cc.egui_ctx.clone();

        let repaint_ctx = ctx.clone();
        let poller_config = PollerConfig {
            interval: config.poll_interval(),
            timeout: config.request_timeout(),
            on_update: Some(std::sync::Arc::new(move || repaint_ctx.request_repaint())),
        };

        let poller = {
            let _guard = runtime.enter();
            Poller::spawn(source, poller_config)
        };

        let base_tiles = BaseTileSource::new(config.base_map).into_tiles(&ctx);
        let overlay = OverlaySlot::new(
            RadarLayerFactory::new(ctx.clone()),
            TileUrlBuilder::new(config.api_base_url.clone()),
        );

        let mut map_memory = MapMemory::default();
        if let Err(e) = map_memory.set_zoom(config.default_zoom) {
            warn!("Invalid default zoom {}: {:?}", config.default_zoom, e);
        }

        let center = lon_lat(config.center_lon, config.center_lat);
        let legend_pane = LegendPane::new(config.show_legend);

        Self {
            config,
            poller,
            base_tiles,
            overlay,
            map_memory,
            center,
            status_pane: StatusPane::new(),
            legend_pane,
            ticker: RefreshTicker::default(),
            zone: local_zone(),
        }
    }

    fn clamp_zoom(&mut self) {
        if self.map_memory.zoom() > MAX_ZOOM {
            if let Err(e) = self.map_memory.set_zoom(MAX_ZOOM) {
                debug!("Failed to clamp zoom: {:?}", e);
            }
        }
    }
}

impl eframe::App for RadarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.ticker.poll(now);

        let state = self.poller.state();
        self.overlay.sync(state.timestamp_unix());

        let view = StatusView::from_state(&state, Utc::now(), &self.zone);
        let bounds = state.metadata.as_ref().map(|m| m.bounds);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let mut map = Map::new(Some(&mut self.base_tiles), &mut self.map_memory, self.center);

                if let Some(layer) = self.overlay.layer_mut() {
                    map = map.with_layer(layer, self.config.overlay_opacity);
                }

                if self.config.show_bounds {
                    if let Some(bounds) = bounds {
                        map = map.with_plugin(BoundsOutline { bounds });
                    }
                }

                ui.add(map);
            });

        self.clamp_zoom();

        if self.status_pane.render(ctx, &view, &self.config.api_base_url) == StatusAction::Refresh {
            self.poller.refresh_now();
        }
        self.legend_pane.render(ctx);

        // Keep "Ns ago" current without waiting for input
        ctx.request_repaint_after(self.ticker.until_next(Instant::now()));
    }
}
