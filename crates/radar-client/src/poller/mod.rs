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

//! Periodic metadata polling.
//!
//! A [`Poller`] owns a background task that fetches the metadata document
//! once on start and then on a fixed interval. The latest [`PollState`] is
//! published through a watch channel, so readers always see a complete
//! snapshot and never a half-applied update.
//!
//! Attempts run strictly one after another inside the task. Interval ticks
//! that fall due while a slow fetch is still running are skipped rather than
//! queued, so two fetches are never in flight at the same time.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::http::{FetchError, MetadataSource};
use crate::metadata::RadarMetadata;

/// How often the metadata document is re-fetched.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Upper bound for a single fetch attempt.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Shortest interval and timeout the poller accepts.
pub const MIN_POLL_PERIOD: Duration = Duration::from_secs(1);

/// Raise a zero or sub-second period to [`MIN_POLL_PERIOD`].
fn clamp_period(name: &str, period: Duration) -> Duration {
    if period < MIN_POLL_PERIOD {
        warn!(
            "Poller {} of {:?} is too short, using {:?}",
            name, period, MIN_POLL_PERIOD
        );
        MIN_POLL_PERIOD
    } else {
        period
    }
}

/// Observable state of the poller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollState {
    /// Last successfully fetched metadata.
    pub metadata: Option<RadarMetadata>,
    /// True while a fetch attempt is in flight.
    pub is_loading: bool,
    /// Wall-clock time of the last successful fetch.
    pub last_updated: Option<DateTime<Utc>>,
    /// Message from the most recent failed attempt, cleared on success.
    pub error: Option<String>,
    /// Number of fetch attempts started so far.
    pub attempts: u64,
}

impl PollState {
    /// Mark the start of a fetch attempt.
    ///
    /// A previous error stays visible until an attempt succeeds.
    pub fn begin_attempt(&mut self) {
        self.is_loading = true;
        self.attempts += 1;
    }

    /// Apply the outcome of a fetch attempt.
    pub fn finish_attempt(&mut self, result: Result<RadarMetadata, FetchError>, now: DateTime<Utc>) {
        match result {
            Ok(metadata) => {
                self.metadata = Some(metadata);
                self.last_updated = Some(now);
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
        self.is_loading = false;
    }

    /// Unix timestamp of the current radar frame, if any.
    #[must_use]
    pub fn timestamp_unix(&self) -> Option<i64> {
        self.metadata.as_ref().and_then(|m| m.timestamp_unix)
    }

    /// True until metadata describing an available frame has been received.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        self.metadata.as_ref().map_or(true, RadarMetadata::is_no_data)
    }
}

/// Callback invoked after every state change.
pub type UpdateCallback = Arc<dyn Fn() + Send + Sync>;

/// Configuration for the metadata poller.
#[derive(Clone)]
pub struct PollerConfig {
    /// Delay between scheduled fetches.
    pub interval: Duration,
    /// Timeout applied to every fetch attempt.
    pub timeout: Duration,
    /// Optional hook run after each published update (e.g. request a repaint).
    pub on_update: Option<UpdateCallback>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_FETCH_TIMEOUT,
            on_update: None,
        }
    }
}

impl fmt::Debug for PollerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollerConfig")
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

/// Publishes state updates unless the poller has been stopped.
///
/// The stopped flag and the publish share one lock, so once `stop()` has
/// returned the task can no longer change the state.
struct StatePublisher {
    state_tx: watch::Sender<PollState>,
    stopped: Arc<Mutex<bool>>,
    on_update: Option<UpdateCallback>,
}

impl StatePublisher {
    fn update(&self, f: impl FnOnce(&mut PollState)) -> bool {
        {
            let stopped = self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
            if *stopped {
                return false;
            }
            self.state_tx.send_modify(f);
        }

        if let Some(on_update) = &self.on_update {
            on_update();
        }
        true
    }
}

/// Handle to a running metadata poller.
///
/// Dropping the handle stops the poller.
pub struct Poller {
    state_rx: watch::Receiver<PollState>,
    refresh: Arc<Notify>,
    stopped: Arc<Mutex<bool>>,
    cancel_token: CancellationToken,
}

impl fmt::Debug for Poller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poller")
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl Poller {
    /// Spawn the polling task on the current tokio runtime.
    ///
    /// The first fetch starts immediately.
    #[must_use]
    pub fn spawn<S: MetadataSource>(source: S, config: PollerConfig) -> Self {
        let (state_tx, state_rx) = watch::channel(PollState::default());
        let refresh = Arc::new(Notify::new());
        let stopped = Arc::new(Mutex::new(false));
        let cancel_token = CancellationToken::new();

        let publisher = StatePublisher {
            state_tx,
            stopped: Arc::clone(&stopped),
            on_update: config.on_update.clone(),
        };

        let interval = clamp_period("interval", config.interval);
        let timeout = clamp_period("timeout", config.timeout);

        info!(
            "Starting metadata poller (interval {}s, timeout {}s)",
            interval.as_secs(),
            timeout.as_secs()
        );

        tokio::spawn(poll_loop(
            source,
            interval,
            timeout,
            publisher,
            Arc::clone(&refresh),
            cancel_token.clone(),
        ));

        Self {
            state_rx,
            refresh,
            stopped,
            cancel_token,
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> PollState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state_rx.clone()
    }

    /// Request an extra fetch right away.
    ///
    /// Requests made while an attempt is running collapse into one follow-up
    /// attempt. Ignored once the poller is stopped.
    pub fn refresh_now(&self) {
        if self.is_running() {
            debug!("Manual metadata refresh requested");
            self.refresh.notify_one();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !*self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop polling. Safe to call more than once.
    pub fn stop(&self) {
        {
            let mut stopped = self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
            if *stopped {
                return;
            }
            *stopped = true;
        }

        info!("Stopping metadata poller");
        self.cancel_token.cancel();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop<S: MetadataSource>(
    source: S,
    interval: Duration,
    timeout: Duration,
    publisher: StatePublisher,
    refresh: Arc<Notify>,
    cancel_token: CancellationToken,
) {
    // The first tick completes immediately
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let manual = tokio::select! {
            _ = ticker.tick() => false,
            () = refresh.notified() => true,
            () = cancel_token.cancelled() => {
                debug!("Metadata poller task exiting");
                return;
            }
        };

        if !publisher.update(PollState::begin_attempt) {
            return;
        }

        let result = tokio::select! {
            outcome = tokio::time::timeout(timeout, source.fetch()) => match outcome {
                Ok(result) => result,
                Err(_elapsed) => Err(FetchError::Timeout),
            },
            () = cancel_token.cancelled() => {
                debug!("Abandoning in-flight metadata fetch");
                return;
            }
        };

        match &result {
            Ok(metadata) if metadata.is_no_data() => {
                info!("Metadata fetched: no radar data available yet");
            }
            Ok(metadata) => {
                debug!(
                    "Metadata fetched: frame {}",
                    metadata.timestamp.as_deref().unwrap_or("?")
                );
            }
            Err(e) => warn!("Metadata fetch failed: {}", e),
        }

        if !publisher.update(|state| state.finish_attempt(result, Utc::now())) {
            return;
        }

        // A full interval follows a manual refresh before the next scheduled fetch
        if manual {
            ticker.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Bounds, DataStatus};
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    fn frame(unix: i64) -> RadarMetadata {
        RadarMetadata {
            timestamp: Some("2025-06-01T18:42:00+00:00".to_string()),
            timestamp_unix: Some(unix),
            status: DataStatus::Ok,
            message: None,
            bounds: Bounds::default(),
        }
    }

    /// Returns scripted results in order, then repeats the last one.
    #[derive(Clone)]
    struct ScriptedSource {
        script: Arc<Mutex<VecDeque<Result<RadarMetadata, FetchError>>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<RadarMetadata, FetchError>>) -> Self {
            Self {
                script: Arc::new(Mutex::new(script.into())),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MetadataSource for ScriptedSource {
        fn fetch(&self) -> impl Future<Output = Result<RadarMetadata, FetchError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            let next = if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().unwrap()
            };
            async move { next }
        }
    }

    /// Blocks every fetch until the test hands out a permit.
    #[derive(Clone)]
    struct GatedSource {
        gate: Arc<Semaphore>,
        result: Result<RadarMetadata, FetchError>,
    }

    impl MetadataSource for GatedSource {
        fn fetch(&self) -> impl Future<Output = Result<RadarMetadata, FetchError>> + Send {
            let gate = Arc::clone(&self.gate);
            let result = self.result.clone();
            async move {
                gate.acquire().await.unwrap().forget();
                result
            }
        }
    }

    /// Takes `delay` to answer and records overlapping calls.
    #[derive(Clone)]
    struct SlowSource {
        delay: Duration,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
        calls: Arc<AtomicUsize>,
    }

    impl MetadataSource for SlowSource {
        fn fetch(&self) -> impl Future<Output = Result<RadarMetadata, FetchError>> + Send {
            let this = self.clone();
            async move {
                this.calls.fetch_add(1, Ordering::SeqCst);
                let now = this.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                this.max_in_flight.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(this.delay).await;
                this.in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(frame(1000))
            }
        }
    }

    fn config(interval_secs: u64) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_secs(interval_secs),
            ..Default::default()
        }
    }

    #[test]
    fn test_state_transitions() {
        let mut state = PollState::default();
        assert!(state.is_no_data());

        let t1 = Utc::now();
        state.begin_attempt();
        assert!(state.is_loading);
        state.finish_attempt(Ok(frame(1000)), t1);
        assert!(!state.is_loading);
        assert_eq!(state.timestamp_unix(), Some(1000));
        assert_eq!(state.last_updated, Some(t1));

        state.begin_attempt();
        state.finish_attempt(Err(FetchError::Transport { status: 502 }), Utc::now());
        assert_eq!(state.timestamp_unix(), Some(1000));
        assert_eq!(state.last_updated, Some(t1));
        assert_eq!(state.error.as_deref(), Some("Failed to fetch metadata: 502"));

        // Starting a new attempt does not clear the error
        state.begin_attempt();
        assert!(state.error.is_some());
        state.finish_attempt(Ok(frame(2000)), Utc::now());
        assert_eq!(state.error, None);
        assert_eq!(state.attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_immediately_then_on_interval() {
        let source = ScriptedSource::new(vec![Ok(frame(1000))]);
        let poller = Poller::spawn(source.clone(), config(60));
        let mut rx = poller.subscribe();

        rx.wait_for(|s| s.attempts == 1 && !s.is_loading).await.unwrap();
        assert_eq!(source.calls(), 1);
        assert_eq!(poller.state().timestamp_unix(), Some(1000));

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(source.calls(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_data() {
        let source = ScriptedSource::new(vec![
            Ok(frame(1000)),
            Err(FetchError::Transport { status: 500 }),
        ]);
        let poller = Poller::spawn(source, config(60));
        let mut rx = poller.subscribe();

        let first = rx.wait_for(|s| s.attempts == 1 && !s.is_loading).await.unwrap().clone();
        let second = rx.wait_for(|s| s.attempts == 2 && !s.is_loading).await.unwrap().clone();

        assert_eq!(second.metadata, first.metadata);
        assert_eq!(second.last_updated, first.last_updated);
        assert_eq!(second.error.as_deref(), Some("Failed to fetch metadata: 500"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_flag_spans_attempt() {
        let gate = Arc::new(Semaphore::new(0));
        let source = GatedSource {
            gate: Arc::clone(&gate),
            result: Err(FetchError::Network("connection refused".to_string())),
        };
        let poller = Poller::spawn(source, config(60));
        let mut rx = poller.subscribe();

        assert!(!poller.state().is_loading);
        rx.wait_for(|s| s.is_loading).await.unwrap();
        assert_eq!(poller.state().error, None);

        gate.add_permits(1);
        let done = rx.wait_for(|s| !s.is_loading).await.unwrap().clone();
        assert_eq!(done.error.as_deref(), Some("network error: connection refused"));
        assert_eq!(done.metadata, None);
        assert_eq!(done.last_updated, None);

        // Next attempt starts with the old error still visible
        let during = rx.wait_for(|s| s.attempts == 2 && s.is_loading).await.unwrap().clone();
        assert!(during.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_further_fetches() {
        let source = ScriptedSource::new(vec![Ok(frame(1000))]);
        let poller = Poller::spawn(source.clone(), config(60));
        let mut rx = poller.subscribe();

        rx.wait_for(|s| s.attempts == 1 && !s.is_loading).await.unwrap();
        poller.stop();
        poller.stop();
        assert!(!poller.is_running());

        poller.refresh_now();
        tokio::time::sleep(Duration::from_secs(5 * 60)).await;

        assert_eq!(source.calls(), 1);
        assert_eq!(poller.state().attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let source = ScriptedSource::new(vec![Ok(frame(1000))]);
        let poller = Poller::spawn(source.clone(), config(60));
        let mut rx = poller.subscribe();

        rx.wait_for(|s| s.attempts == 1 && !s.is_loading).await.unwrap();
        drop(poller);

        tokio::time::sleep(Duration::from_secs(5 * 60)).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetches_never_overlap() {
        let source = SlowSource {
            delay: Duration::from_secs(150),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let poller = Poller::spawn(
            source.clone(),
            PollerConfig {
                interval: Duration::from_secs(60),
                timeout: Duration::from_secs(600),
                on_update: None,
            },
        );

        tokio::time::sleep(Duration::from_secs(500)).await;
        poller.stop();

        assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
        // Each attempt takes 150s and missed ticks are dropped, not queued
        let calls = source.calls.load(Ordering::SeqCst);
        assert!((2..=4).contains(&calls), "unexpected call count {calls}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_reported_as_error() {
        let source = SlowSource {
            delay: Duration::from_secs(3600),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let poller = Poller::spawn(source, config(60));
        let mut rx = poller.subscribe();

        let state = rx.wait_for(|s| s.attempts == 1 && !s.is_loading).await.unwrap().clone();
        assert_eq!(state.error.as_deref(), Some("request timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_now_triggers_extra_fetch() {
        let source = ScriptedSource::new(vec![Ok(frame(1000)), Ok(frame(2000))]);
        let poller = Poller::spawn(source.clone(), config(60));
        let mut rx = poller.subscribe();

        rx.wait_for(|s| s.attempts == 1 && !s.is_loading).await.unwrap();
        poller.refresh_now();
        let state = rx.wait_for(|s| s.attempts == 2 && !s.is_loading).await.unwrap().clone();

        assert_eq!(state.timestamp_unix(), Some(2000));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_callback_runs() {
        let updates = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&updates);
        let poller = Poller::spawn(
            ScriptedSource::new(vec![Ok(frame(1000))]),
            PollerConfig {
                on_update: Some(Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })),
                ..config(60)
            },
        );
        let mut rx = poller.subscribe();

        rx.wait_for(|s| s.attempts == 1 && !s.is_loading).await.unwrap();
        // begin + finish
        assert_eq!(updates.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_periods_are_clamped() {
        let source = ScriptedSource::new(vec![Ok(frame(1000))]);
        let poller = Poller::spawn(
            source.clone(),
            PollerConfig {
                interval: Duration::ZERO,
                timeout: Duration::ZERO,
                on_update: None,
            },
        );
        let mut rx = poller.subscribe();

        let state = rx.wait_for(|s| s.attempts == 1 && !s.is_loading).await.unwrap().clone();
        assert_eq!(state.timestamp_unix(), Some(1000));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(source.calls(), 2);
        assert!(poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_fetch_freezes_state() {
        let gate = Arc::new(Semaphore::new(0));
        let source = GatedSource {
            gate: Arc::clone(&gate),
            result: Ok(frame(1000)),
        };
        let poller = Poller::spawn(source, config(60));
        let mut rx = poller.subscribe();

        let during = rx.wait_for(|s| s.is_loading).await.unwrap().clone();
        poller.stop();

        gate.add_permits(10);
        tokio::time::sleep(Duration::from_secs(5 * 60)).await;

        let after = poller.state();
        assert_eq!(after, during);
        assert!(after.is_loading);
        assert_eq!(after.attempts, 1);
        assert_eq!(after.metadata, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_now_restarts_interval() {
        let source = ScriptedSource::new(vec![Ok(frame(1000))]);
        let poller = Poller::spawn(source.clone(), config(60));
        let mut rx = poller.subscribe();

        rx.wait_for(|s| s.attempts == 1 && !s.is_loading).await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;

        poller.refresh_now();
        rx.wait_for(|s| s.attempts == 2 && !s.is_loading).await.unwrap();

        // The tick originally due at 60s is pushed back to 90s
        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(source.calls(), 2);

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(source.calls(), 3);
    }
}
