//! UI components for Radar Desktop.
//!
//! This module contains the floating panes drawn over the map.

pub mod legend_pane;
pub mod status_pane;

pub use legend_pane::LegendPane;
pub use status_pane::StatusPane;
