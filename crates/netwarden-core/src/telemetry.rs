// ── Live telemetry feed ──
//
// One poll tick: fetch the counter snapshot, derive a rate point,
// append it to the sliding window, re-rank top consumers, publish the
// whole derived state over a watch channel. Consumers hold the
// receiver and always see the latest complete state, never a partial
// update.
//
// A failed poll keeps the previous state visible (marked degraded)
// rather than blanking the dashboard; the next successful tick heals
// it.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{CounterSnapshot, RankedConsumer, RatePoint, TimeRange};
use crate::poller::PollTask;
use crate::ranker::rank_top_consumers;
use crate::rate::RateEngine;
use crate::series::SlidingWindow;

/// The slice of the backend surface the telemetry feed consumes.
pub trait TelemetryBackend: Send + Sync + 'static {
    fn fetch_stats(&self) -> impl Future<Output = Result<CounterSnapshot>> + Send;

    /// Historical rate series for a named range token.
    fn fetch_history(&self, range: TimeRange) -> impl Future<Output = Result<Vec<RatePoint>>> + Send;

    /// Live connection count, used as a fallback when the stats
    /// snapshot does not carry one.
    fn fetch_connection_count(&self) -> impl Future<Output = Result<u32>> + Send;
}

impl TelemetryBackend for netwarden_api::BackendClient {
    async fn fetch_stats(&self) -> Result<CounterSnapshot> {
        Ok(self.get_stats().await?.into())
    }

    async fn fetch_history(&self, range: TimeRange) -> Result<Vec<RatePoint>> {
        let points = self.get_chart_data(range.token()).await?;
        Ok(points.into_iter().map(Into::into).collect())
    }

    async fn fetch_connection_count(&self) -> Result<u32> {
        let connections = self.get_system_connections().await?;
        Ok(u32::try_from(connections.len()).unwrap_or(u32::MAX))
    }
}

/// Everything the dashboard renders, derived from the latest snapshot.
#[derive(Debug, Clone, Default)]
pub struct TelemetryState {
    /// Latest raw snapshot (zeroed until the first successful poll).
    pub snapshot: CounterSnapshot,
    /// Rate series, oldest first, always `range.capacity()` points at
    /// most.
    pub series: Vec<RatePoint>,
    /// Top consumers ranked by bytes, capped at five.
    pub top_consumers: Vec<RankedConsumer>,
    /// The range the series is currently seeded for.
    pub range: TimeRange,
    /// False while the last poll failed; the rest of the state is then
    /// stale but still renderable.
    pub backend_ok: bool,
}

/// Polling side of the telemetry pipeline.
///
/// Owns the rate engine and window; publishes immutable state
/// snapshots through a watch channel. Drive it with a
/// [`Poller`](crate::poller::Poller) via [`TelemetryPollTask`].
#[derive(Debug)]
pub struct TelemetryFeed<B: TelemetryBackend> {
    backend: B,
    rate: RateEngine,
    window: SlidingWindow,
    range: TimeRange,
    snapshot: CounterSnapshot,
    top_consumers: Vec<RankedConsumer>,
    backend_ok: bool,
    tx: watch::Sender<Arc<TelemetryState>>,
}

impl<B: TelemetryBackend> TelemetryFeed<B> {
    /// Build the feed and seed the window for `range`.
    ///
    /// Seeding failure is not fatal: the window fills with placeholders
    /// so the chart renders a full-width empty grid, and live points
    /// take over from there.
    pub async fn start(backend: B, range: TimeRange) -> (Self, watch::Receiver<Arc<TelemetryState>>) {
        let (tx, rx) = watch::channel(Arc::new(TelemetryState::default()));
        let mut feed = Self {
            backend,
            rate: RateEngine::new(),
            window: SlidingWindow::new(range.capacity()),
            range,
            snapshot: CounterSnapshot::default(),
            top_consumers: Vec::new(),
            backend_ok: true,
            tx,
        };
        feed.reseed().await;
        feed.publish();
        (feed, rx)
    }

    /// Watch handle for late subscribers.
    pub fn subscribe(&self) -> watch::Receiver<Arc<TelemetryState>> {
        self.tx.subscribe()
    }

    /// Switch the historical range: fresh window at the new capacity,
    /// reseeded history, rate baseline dropped so the first live point
    /// after the switch is zero.
    pub async fn switch_range(&mut self, range: TimeRange) {
        if range == self.range {
            return;
        }
        debug!(range = range.token(), "switching telemetry range");
        self.range = range;
        self.window = SlidingWindow::new(range.capacity());
        self.rate.reset();
        self.reseed().await;
        self.publish();
    }

    async fn reseed(&mut self) {
        match self.backend.fetch_history(self.range).await {
            Ok(points) => self.window.seed(points),
            Err(err) => {
                warn!(error = %err, range = self.range.token(), "history seed failed");
                self.window.seed(Vec::new());
            }
        }
    }

    async fn poll_once(&mut self) {
        let received_at = Utc::now();
        match self.backend.fetch_stats().await {
            Ok(mut snapshot) => {
                if snapshot.active_connections == 0 {
                    if let Ok(count) = self.backend.fetch_connection_count().await {
                        snapshot.active_connections = count;
                    }
                }
                let point = self.rate.push(&snapshot, received_at);
                self.window.append(point);
                self.top_consumers = rank_top_consumers(&snapshot.top_domains);
                self.snapshot = snapshot;
                self.backend_ok = true;
            }
            Err(err) => {
                self.backend_ok = false;
                warn!(error = %err, "stats poll failed");
            }
        }
        self.publish();
    }

    fn publish(&self) {
        self.tx.send_replace(Arc::new(TelemetryState {
            snapshot: self.snapshot.clone(),
            series: self.window.to_vec(),
            top_consumers: self.top_consumers.clone(),
            range: self.range,
            backend_ok: self.backend_ok,
        }));
    }
}

/// Adapter that lets a [`Poller`](crate::poller::Poller) drive a
/// shared [`TelemetryFeed`].
#[derive(Debug, Clone)]
pub struct TelemetryPollTask<B: TelemetryBackend> {
    feed: Arc<tokio::sync::Mutex<TelemetryFeed<B>>>,
}

impl<B: TelemetryBackend> TelemetryPollTask<B> {
    pub fn new(feed: Arc<tokio::sync::Mutex<TelemetryFeed<B>>>) -> Self {
        Self { feed }
    }
}

impl<B: TelemetryBackend> PollTask for TelemetryPollTask<B> {
    fn tick(&mut self) -> impl Future<Output = ()> + Send {
        let feed = Arc::clone(&self.feed);
        async move {
            feed.lock().await.poll_once().await;
        }
    }
}
