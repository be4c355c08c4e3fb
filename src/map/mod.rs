//! Map layers.
//!
//! This module provides the base map tile source, the radar overlay tile
//! source with its remount factory, and the coverage outline plugin.

pub mod base;
pub mod bounds;
pub mod radar;

pub use base::BaseTileSource;
pub use bounds::BoundsOutline;
pub use radar::RadarLayerFactory;
