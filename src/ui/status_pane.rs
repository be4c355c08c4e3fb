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
use radar_client::StatusView;

const LABEL_COLOR: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);
const TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 220, 220);
const NO_DATA_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 200, 100);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 100, 100);
const LIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 255, 100);

/// What the user asked for from the status pane this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    None,
    Refresh,
}

/// Radar data freshness readout
#[derive(Debug)]
pub struct StatusPane {
    pub collapsed: bool,
}

impl StatusPane {
    pub fn new() -> Self {
        Self { collapsed: false }
    }

    /// Render the status pane as a floating window
    pub fn render(&mut self, ctx: &egui::Context, view: &StatusView, server: &str) -> StatusAction {
        let mut action = StatusAction::None;

        let border = if view.no_data {
            NO_DATA_COLOR
        } else {
            egui::Color32::from_rgb(60, 80, 100)
        };

        egui::Window::new("Radar Data")
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
            .fixed_size(egui::vec2(260.0, if self.collapsed { 30.0 } else { 90.0 }))
            .resizable(false)
            .collapsible(false)
            .title_bar(false)
            .frame(egui::Frame::window(&ctx.style())
                .fill(egui::Color32::from_rgba_unmultiplied(25, 30, 35, 230))
                .stroke(egui::Stroke::new(1.0, border))
                .corner_radius(6.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("◈ RADAR DATA")
                        .color(egui::Color32::from_rgb(100, 180, 220))
                        .size(12.0)
                        .strong());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let collapse_icon = if self.collapsed { "▼" } else { "▲" };
                        if ui.button(egui::RichText::new(collapse_icon).size(10.0))
                            .on_hover_text(if self.collapsed { "Expand" } else { "Collapse" })
                            .clicked() {
                            self.collapsed = !self.collapsed;
                        }

                        if ui.add_enabled(!view.show_spinner, egui::Button::new(
                            egui::RichText::new("⟳").size(11.0)))
                            .on_hover_text("Check for new radar data now")
                            .clicked() {
                            action = StatusAction::Refresh;
                        }
                    });
                });

                self.render_time_row(ui, view);

                if self.collapsed {
                    return;
                }

                ui.separator();
                self.render_details(ui, view, server);
            });

        action
    }

    fn render_time_row(&self, ui: &mut egui::Ui, view: &StatusView) {
        ui.horizontal(|ui| {
            let time_color = if view.no_data { NO_DATA_COLOR } else { TEXT_COLOR };
            ui.label(egui::RichText::new(&view.headline)
                .color(time_color)
                .size(13.0)
                .monospace());

            if view.show_spinner {
                ui.label(egui::RichText::new("·").color(LABEL_COLOR));
                ui.add(egui::Spinner::new().size(11.0));
            } else if let Some(ago) = &view.ago {
                ui.label(egui::RichText::new("·").color(LABEL_COLOR));
                ui.label(egui::RichText::new(ago)
                    .color(LABEL_COLOR)
                    .size(11.0));
            }
        });
    }

    fn render_details(&self, ui: &mut egui::Ui, view: &StatusView, server: &str) {
        ui.horizontal(|ui| {
            let (color, icon) = if view.error.is_some() {
                (ERROR_COLOR, "✕")
            } else if view.show_spinner {
                (NO_DATA_COLOR, "◐")
            } else {
                (LIVE_COLOR, "●")
            };

            ui.label(egui::RichText::new(icon).color(color).size(10.0));
            ui.label(egui::RichText::new(view.activity_label())
                .color(color)
                .size(10.0)
                .monospace()
                .strong());
        });

        if view.no_data {
            let note = view.message.as_deref().unwrap_or("No radar data available");
            ui.label(egui::RichText::new(note)
                .color(NO_DATA_COLOR)
                .size(9.0)
                .italics());
        }

        if let Some(error) = &view.error {
            ui.label(egui::RichText::new(error)
                .color(ERROR_COLOR)
                .size(9.0));
        }

        ui.label(egui::RichText::new(server)
            .color(egui::Color32::from_rgb(130, 130, 130))
            .size(8.0)
            .monospace());
    }
}

impl Default for StatusPane {
    fn default() -> Self {
        Self::new()
    }
}
