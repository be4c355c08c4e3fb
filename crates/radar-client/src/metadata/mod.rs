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

//! Radar metadata document served by the tile backend.
//!
//! The backend publishes a small JSON document describing the most recent
//! radar frame. Clients poll it to learn when new tiles are available and use
//! `timestamp_unix` as the identity of the current overlay.

use serde::{Deserialize, Serialize};

/// Availability flag reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    /// A processed radar frame is available.
    Ok,
    /// The backend has not produced any frame yet.
    NoData,
}

/// Geographic extent of the radar mosaic in WGS-84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Default for Bounds {
    /// Continental US box used by the MRMS mosaic.
    fn default() -> Self {
        Self {
            west: -130.0,
            south: 20.0,
            east: -60.0,
            north: 55.0,
        }
    }
}

/// Metadata describing the radar frame currently served as tiles.
///
/// Values are received from the backend and never mutated by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarMetadata {
    /// ISO-8601 time of the radar frame.
    #[serde(default)]
    pub timestamp: Option<String>,

    /// Same instant as `timestamp`, in Unix seconds.
    #[serde(default)]
    pub timestamp_unix: Option<i64>,

    pub status: DataStatus,

    /// Human-readable note, typically present while no data is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    pub bounds: Bounds,
}

impl RadarMetadata {
    /// Parse a metadata document from its JSON body.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// True when no radar frame is available.
    ///
    /// `status = "no_data"` and a missing `timestamp` mean the same thing and
    /// must be treated identically by every consumer.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        self.status == DataStatus::NoData || self.timestamp.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: DataStatus, timestamp: Option<&str>, unix: Option<i64>) -> RadarMetadata {
        RadarMetadata {
            timestamp: timestamp.map(str::to_string),
            timestamp_unix: unix,
            status,
            message: None,
            bounds: Bounds::default(),
        }
    }

    #[test]
    fn test_parse_ok_document() {
        let body = br#"{
            "timestamp": "2025-06-01T18:42:00+00:00",
            "timestamp_unix": 1748803320,
            "status": "ok",
            "bounds": {"west": -130.0, "south": 20.0, "east": -60.0, "north": 55.0}
        }"#;

        let meta = RadarMetadata::from_json(body).unwrap();
        assert_eq!(meta.status, DataStatus::Ok);
        assert_eq!(meta.timestamp_unix, Some(1_748_803_320));
        assert_eq!(meta.message, None);
        assert!(!meta.is_no_data());
    }

    #[test]
    fn test_parse_no_data_document() {
        let body = br#"{
            "timestamp": null,
            "timestamp_unix": null,
            "status": "no_data",
            "message": "No radar data available yet. Data is being fetched...",
            "bounds": {"west": -130.0, "south": 20.0, "east": -60.0, "north": 55.0}
        }"#;

        let meta = RadarMetadata::from_json(body).unwrap();
        assert_eq!(meta.status, DataStatus::NoData);
        assert_eq!(meta.timestamp, None);
        assert!(meta.message.unwrap().starts_with("No radar data"));
    }

    #[test]
    fn test_missing_bounds_defaults_to_conus() {
        let meta = RadarMetadata::from_json(br#"{"status": "no_data"}"#).unwrap();
        assert_eq!(meta.bounds, Bounds::default());
        assert!(meta.bounds.west < meta.bounds.east && meta.bounds.south < meta.bounds.north);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(RadarMetadata::from_json(br#"{"status": "stale"}"#).is_err());
    }

    #[test]
    fn test_no_data_predicate() {
        // Both signals trigger regardless of the other field
        assert!(sample(DataStatus::NoData, Some("2025-06-01T18:42:00Z"), Some(1)).is_no_data());
        assert!(sample(DataStatus::Ok, None, Some(1)).is_no_data());
        assert!(sample(DataStatus::NoData, None, None).is_no_data());

        assert!(!sample(DataStatus::Ok, Some("2025-06-01T18:42:00Z"), Some(1)).is_no_data());
        assert!(!sample(DataStatus::Ok, Some("2025-06-01T18:42:00Z"), None).is_no_data());
    }
}
