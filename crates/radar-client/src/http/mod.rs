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

//! HTTP client for the radar metadata endpoint.
//!
//! A single GET per call, no retries. Failures are normalised into
//! [`FetchError`] so the poller can turn them into display-safe messages.

use std::future::Future;
use std::time::Duration;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::metadata::RadarMetadata;

/// Path of the metadata document relative to the API base URL.
pub const METADATA_PATH: &str = "/api/metadata";

/// Path of the backend health check.
pub const HEALTH_PATH: &str = "/api/health";

/// Errors that can occur while fetching metadata.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("Failed to fetch metadata: {status}")]
    Transport { status: u16 },

    /// The request could not be completed at all.
    #[error("network error: {0}")]
    Network(String),

    /// The body was not a valid metadata document.
    #[error("invalid metadata document: {0}")]
    Decode(String),

    /// No response within the configured timeout.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Anything that can produce the current radar metadata.
///
/// The poller is generic over this trait so tests can drive it without a
/// server.
pub trait MetadataSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<RadarMetadata, FetchError>> + Send;
}

/// Join a base URL and an absolute path without doubling the slash.
///
/// An empty base yields the bare path (same-origin routing).
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Client for the tile backend's JSON API.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
}

impl MetadataClient {
    /// Create a client for the given base URL.
    ///
    /// `timeout` bounds each request end to end.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the metadata document.
    #[must_use]
    pub fn metadata_url(&self) -> String {
        join_url(&self.base_url, METADATA_PATH)
    }

    /// Fetch the current metadata document.
    pub async fn fetch_metadata(&self) -> Result<RadarMetadata, FetchError> {
        let url = self.metadata_url();
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        RadarMetadata::from_json(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Ask the backend whether it considers itself healthy.
    pub async fn check_health(&self) -> Result<bool, FetchError> {
        let url = join_url(&self.base_url, HEALTH_PATH);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport {
                status: status.as_u16(),
            });
        }

        let health: HealthResponse = response.json().await?;
        Ok(health.status == "healthy")
    }
}

impl MetadataSource for MetadataClient {
    fn fetch(&self) -> impl Future<Output = Result<RadarMetadata, FetchError>> + Send {
        self.fetch_metadata()
    }
}
