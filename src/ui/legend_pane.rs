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

use egui;
use radar_client::legend::{LegendEntry, LEGEND, LEGEND_TITLE};

const SWATCH_SIZE: egui::Vec2 = egui::vec2(14.0, 10.0);

/// Reflectivity color legend
#[derive(Debug)]
pub struct LegendPane {
    pub visible: bool,
}

impl LegendPane {
    pub fn new(visible: bool) -> Self {
        Self { visible }
    }

    pub fn render(&mut self, ctx: &egui::Context) {
        if !self.visible {
            // Small button to bring the legend back
            egui::Window::new("show_legend")
                .title_bar(false)
                .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-10.0, -30.0))
                .resizable(false)
                .frame(egui::Frame::window(&ctx.style())
                    .fill(egui::Color32::from_rgba_unmultiplied(25, 30, 35, 200))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 80, 100)))
                    .corner_radius(6.0))
                .show(ctx, |ui| {
                    if ui.button(egui::RichText::new("🎨 Legend")
                        .color(egui::Color32::from_rgb(150, 200, 220))
                        .size(11.0))
                        .clicked() {
                        self.visible = true;
                    }
                });
            return;
        }

        egui::Window::new("Legend")
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-10.0, -30.0))
            .resizable(false)
            .collapsible(false)
            .title_bar(false)
            .frame(egui::Frame::window(&ctx.style())
                .fill(egui::Color32::from_rgba_unmultiplied(25, 30, 35, 230))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 80, 100)))
                .corner_radius(6.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(LEGEND_TITLE)
                        .color(egui::Color32::from_rgb(100, 180, 220))
                        .size(11.0)
                        .strong());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(egui::RichText::new("✕")
                            .size(10.0)
                            .color(egui::Color32::from_rgb(200, 100, 100)))
                            .on_hover_text("Hide legend")
                            .clicked() {
                            self.visible = false;
                        }
                    });
                });

                ui.add_space(2.0);

                for entry in &LEGEND {
                    legend_row(ui, entry);
                }
            });
    }
}

fn legend_row(ui: &mut egui::Ui, entry: &LegendEntry) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(SWATCH_SIZE, egui::Sense::hover());
        let [r, g, b] = entry.rgb;
        ui.painter().rect_filled(rect, 2.0, egui::Color32::from_rgb(r, g, b));

        ui.label(egui::RichText::new(format!("{:>5}", entry.dbz))
            .color(egui::Color32::from_rgb(200, 200, 200))
            .size(9.0)
            .monospace());

        ui.label(egui::RichText::new(entry.label)
            .color(egui::Color32::from_rgb(160, 160, 160))
            .size(9.0));
    });
}
