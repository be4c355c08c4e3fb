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

//! Overlay layer identity and remounting.
//!
//! Map widgets cache fetched tile images by template and internal state, so
//! pointing a long-lived layer at a new URL can keep showing old imagery.
//! Instead, every new radar frame gets a brand new layer instance and the old
//! one is dropped. The cost is a short blank period while fresh tiles load.

use std::fmt;

use log::info;

use super::{TileTemplate, TileUrlBuilder};

/// Identity of a radar overlay instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKey {
    /// Overlay for the frame with this Unix timestamp.
    Timestamp(i64),
    /// Overlay used while no frame is available.
    NoData,
}

impl LayerKey {
    #[must_use]
    pub fn from_timestamp(timestamp_unix: Option<i64>) -> Self {
        timestamp_unix.map_or(LayerKey::NoData, LayerKey::Timestamp)
    }

    #[must_use]
    pub fn timestamp(self) -> Option<i64> {
        match self {
            LayerKey::Timestamp(t) => Some(t),
            LayerKey::NoData => None,
        }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKey::Timestamp(t) => write!(f, "{}", t),
            LayerKey::NoData => f.write_str("no-data"),
        }
    }
}

/// What to do with the overlay when a key arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemountPlan {
    /// Same key as the live layer.
    Keep,
    /// Build a new layer, dropping the live one first if there is one.
    Replace {
        dispose_old: bool,
        key: LayerKey,
        template: TileTemplate,
    },
}

/// Decide how to move from the live layer key to `new`.
#[must_use]
pub fn plan_remount(current: Option<LayerKey>, new: LayerKey, urls: &TileUrlBuilder) -> RemountPlan {
    if current == Some(new) {
        return RemountPlan::Keep;
    }

    RemountPlan::Replace {
        dispose_old: current.is_some(),
        key: new,
        template: urls.template(new.timestamp()),
    }
}

/// Constructs concrete overlay layers.
pub trait LayerFactory {
    type Layer;

    fn create(&mut self, key: LayerKey, template: &TileTemplate) -> Self::Layer;
}

/// Holds the single live overlay layer and swaps it on key changes.
pub struct OverlaySlot<F: LayerFactory> {
    factory: F,
    urls: TileUrlBuilder,
    current: Option<(LayerKey, F::Layer)>,
    mounts: u64,
}

impl<F: LayerFactory> fmt::Debug for OverlaySlot<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlaySlot")
            .field("urls", &self.urls)
            .field("key", &self.key())
            .field("mounts", &self.mounts)
            .finish_non_exhaustive()
    }
}

impl<F: LayerFactory> OverlaySlot<F> {
    /// Create an empty slot. No layer exists until the first `sync`.
    #[must_use]
    pub fn new(factory: F, urls: TileUrlBuilder) -> Self {
        Self {
            factory,
            urls,
            current: None,
            mounts: 0,
        }
    }

    /// Make the live layer match the given frame timestamp.
    ///
    /// Returns `true` when a new layer instance was constructed.
    pub fn sync(&mut self, timestamp_unix: Option<i64>) -> bool {
        let new_key = LayerKey::from_timestamp(timestamp_unix);

        match plan_remount(self.key(), new_key, &self.urls) {
            RemountPlan::Keep => false,
            RemountPlan::Replace {
                dispose_old,
                key,
                template,
            } => {
                if dispose_old {
                    if let Some((old_key, old_layer)) = self.current.take() {
                        info!("Radar frame changed {} -> {}, remounting overlay", old_key, key);
                        drop(old_layer);
                    }
                }

                let layer = self.factory.create(key, &template);
                self.current = Some((key, layer));
                self.mounts += 1;
                true
            }
        }
    }

    /// Key of the live layer.
    #[must_use]
    pub fn key(&self) -> Option<LayerKey> {
        self.current.as_ref().map(|(key, _)| *key)
    }

    #[must_use]
    pub fn layer_mut(&mut self) -> Option<&mut F::Layer> {
        self.current.as_mut().map(|(_, layer)| layer)
    }

    /// Number of layer instances constructed so far.
    #[must_use]
    pub fn mounts(&self) -> u64 {
        self.mounts
    }
}
