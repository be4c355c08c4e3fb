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

//! Text shown by the status display.
//!
//! Everything here is pure: the GUI feeds in a [`PollState`] snapshot and the
//! current time and renders whatever comes out. The [`RefreshTicker`] only
//! decides when the relative "ago" text needs redrawing; it never touches the
//! network or the poll state.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::warn;

use crate::poller::PollState;

/// Headline shown before the first frame timestamp is known.
pub const LOADING_TEXT: &str = "Loading...";

/// Format an elapsed time as `"{N}s ago"` or `"{N}m ago"`.
///
/// Minutes are floored and never promoted to hours. Negative input (clock
/// skew) reads as zero.
#[must_use]
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        format!("{}s ago", seconds)
    } else {
        format!("{}m ago", seconds / 60)
    }
}

/// Whole seconds between `since` and `now`.
#[must_use]
pub fn elapsed_seconds(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_seconds()
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and naive ISO-8601 (no offset), the latter read as UTC.
#[must_use]
pub fn parse_timestamp(iso: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Look up an IANA zone name such as `America/Chicago`.
#[must_use]
pub fn zone_from_name(name: &str) -> Option<Tz> {
    name.parse::<Tz>().ok()
}

/// The machine's time zone, so `%Z` renders as an abbreviation like `CDT`.
///
/// Falls back to UTC when the zone cannot be determined.
#[must_use]
pub fn local_zone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => zone_from_name(&name).unwrap_or_else(|| {
            warn!("Unknown local time zone {}, showing times in UTC", name);
            Tz::UTC
        }),
        Err(e) => {
            warn!("Could not determine local time zone ({}), showing times in UTC", e);
            Tz::UTC
        }
    }
}

/// Format a frame timestamp as month, day, hour, minute and zone in `tz`.
///
/// Unparseable input is shown as received.
#[must_use]
pub fn format_timestamp<Z>(iso: &str, tz: &Z) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    match parse_timestamp(iso) {
        Some(dt) => dt.with_timezone(tz).format("%b %-d, %I:%M %p %Z").to_string(),
        None => iso.to_string(),
    }
}

/// Everything the status display needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// Formatted frame time, or a loading placeholder.
    pub headline: String,
    /// No radar frame available; rendered identically for both causes.
    pub no_data: bool,
    /// A fetch is in flight.
    pub show_spinner: bool,
    /// Freshness of the last successful fetch, hidden while loading.
    pub ago: Option<String>,
    /// Last fetch error, if the most recent attempts failed.
    pub error: Option<String>,
    /// Backend note accompanying a no-data document.
    pub message: Option<String>,
}

impl StatusView {
    #[must_use]
    pub fn from_state<Z>(state: &PollState, now: DateTime<Utc>, tz: &Z) -> Self
    where
        Z: TimeZone,
        Z::Offset: fmt::Display,
    {
        let metadata = state.metadata.as_ref();

        let headline = metadata
            .and_then(|m| m.timestamp.as_deref())
            .map_or_else(|| LOADING_TEXT.to_string(), |iso| format_timestamp(iso, tz));

        let ago = if state.is_loading {
            None
        } else {
            state
                .last_updated
                .map(|at| format_elapsed(elapsed_seconds(at, now)))
        };

        Self {
            headline,
            no_data: state.is_no_data(),
            show_spinner: state.is_loading,
            ago,
            error: state.error.clone(),
            message: metadata.and_then(|m| m.message.clone()),
        }
    }

    /// Short activity label for the indicator row.
    #[must_use]
    pub fn activity_label(&self) -> &'static str {
        if self.show_spinner {
            "Checking for updates..."
        } else {
            "Live"
        }
    }
}

/// Presentation-only clock for keeping relative times current.
#[derive(Debug, Clone)]
pub struct RefreshTicker {
    period: Duration,
    last: Option<Instant>,
    ticks: u64,
}

impl Default for RefreshTicker {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl RefreshTicker {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last: None,
            ticks: 0,
        }
    }

    /// Returns `true` when a period has passed since the last tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self
            .last
            .map_or(true, |last| now.saturating_duration_since(last) >= self.period);
        if due {
            self.last = Some(now);
            self.ticks += 1;
        }
        due
    }

    /// Time left until the next tick is due.
    #[must_use]
    pub fn until_next(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self.period.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
