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
use radar_client::Bounds;
use walkers::{lon_lat, MapMemory, Plugin, Projector};

/// Map plugin outlining the radar coverage area
#[derive(Debug, Clone, Copy)]
pub struct BoundsOutline {
    pub bounds: Bounds,
}

impl Plugin for BoundsOutline {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        _response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let nw = projector.project(lon_lat(self.bounds.west, self.bounds.north));
        let se = projector.project(lon_lat(self.bounds.east, self.bounds.south));

        let rect = egui::Rect::from_min_max(egui::pos2(nw.x, nw.y), egui::pos2(se.x, se.y));

        ui.painter().rect_stroke(
            rect,
            0.0,
            egui::Stroke::new(1.5, egui::Color32::from_rgba_unmultiplied(100, 180, 220, 160)),
            egui::StrokeKind::Middle,
        );
    }
}
