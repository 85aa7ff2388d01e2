//! Poller module for refreshing monitor records and heartbeat history.

mod period;
mod source;

pub use period::*;
pub use source::*;

use crate::api::{ApiError, Monitor, MonitorStats};
use crate::history::{HistoryAggregator, Sample};

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock, RwLockReadGuard};
use tokio::task::JoinSet;

/// History window of one monitor plus its request bookkeeping.
#[derive(Debug)]
pub struct MonitorHistory {
    pub period: Period,
    pub history: HistoryAggregator,
    loaded: bool,
    /// Request id of the fetch currently pending, if any.
    in_flight: Option<u64>,
    latest_request: u64,
}

impl MonitorHistory {
    fn new(period: Period) -> Self {
        Self {
            period,
            history: HistoryAggregator::new(period.bound()),
            loaded: false,
            in_flight: None,
            latest_request: 0,
        }
    }

    /// Samples shown for the selected period.
    pub fn display(&self) -> &[Sample] {
        self.history.active_slice(self.period.bound())
    }

    /// Whether the window has been initialized from a fetch.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

/// Everything the dashboard renders from.
#[derive(Debug, Default)]
pub struct MonitorBoard {
    pub monitors: Vec<Monitor>,
    pub stats: Option<MonitorStats>,
    pub histories: HashMap<i64, MonitorHistory>,
    /// Displayable message for the most recent failed fetch.
    pub last_error: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
}

impl MonitorBoard {
    pub fn monitor(&self, id: i64) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.id == id)
    }

    pub fn history(&self, id: i64) -> Option<&MonitorHistory> {
        self.histories.get(&id)
    }

    /// Replace the monitor list and drop the windows of monitors that are no
    /// longer listed. Returns how many windows were dropped.
    ///
    /// An empty list is treated as a fetch anomaly and ignored.
    pub fn sync_monitors(&mut self, monitors: Vec<Monitor>) -> usize {
        if monitors.is_empty() {
            tracing::warn!("Backend returned no monitors, keeping current list");
            return 0;
        }

        let ids: HashSet<i64> = monitors.iter().map(|m| m.id).collect();
        let before = self.histories.len();
        self.histories.retain(|id, _| ids.contains(id));
        self.monitors = monitors;

        before - self.histories.len()
    }
}

/// What happened to a history fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not issued: auto refresh is paused.
    Paused,
    /// Not issued: a request for this monitor is still pending.
    InFlight,
    /// Window replaced; holds its new length.
    Initialized(usize),
    /// Window extended; holds the number of samples appended.
    Merged(usize),
    /// Backend had no data; window left as it was.
    NoData,
    /// Result dropped because a newer request was issued after it.
    Superseded,
    /// Transport or decode failure; window left as it was.
    Failed,
}

/// Poller tuning.
#[derive(Debug, Clone)]
pub struct PollerOptions {
    pub interval: Duration,
    /// Maximum history requests in flight during a full refresh.
    pub fetch_concurrency: usize,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            fetch_concurrency: 5,
        }
    }
}

/// Keeps the [`MonitorBoard`] up to date from a [`HistorySource`].
///
/// Each monitor's window is only mutated under the board's write lock, and
/// every history request carries a sequence number so a result that resolves
/// after a newer request was issued is dropped.
pub struct Poller {
    source: Arc<dyn HistorySource>,
    board: RwLock<MonitorBoard>,
    options: PollerOptions,
    paused: AtomicBool,
    next_request: AtomicU64,
    stop: Mutex<Option<broadcast::Sender<()>>>,
}

impl Poller {
    pub fn new(source: Arc<dyn HistorySource>, options: PollerOptions) -> Self {
        Self {
            source,
            board: RwLock::new(MonitorBoard::default()),
            options,
            paused: AtomicBool::new(false),
            next_request: AtomicU64::new(0),
            stop: Mutex::new(None),
        }
    }

    pub async fn board(&self) -> RwLockReadGuard<'_, MonitorBoard> {
        self.board.read().await
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Stop issuing new fetches. Requests already in flight still apply.
    pub fn pause(&self) {
        if !self.paused.swap(true, Ordering::SeqCst) {
            tracing::info!("Auto refresh paused");
        }
    }

    /// Resume auto refresh and refresh immediately.
    pub fn resume(self: &Arc<Self>) {
        if self.paused.swap(false, Ordering::SeqCst) {
            tracing::info!("Auto refresh resumed");
            let this = self.clone();
            tokio::spawn(async move {
                if let Err(e) = this.refresh_monitors().await {
                    tracing::error!("Refresh after resume failed: {}", e);
                }
            });
        }
    }

    /// Start the periodic refresh task. The first refresh runs immediately.
    pub async fn start(self: &Arc<Self>) {
        let (tx, mut rx) = broadcast::channel(1);
        {
            let mut stop = self.stop.lock().await;
            *stop = Some(tx);
        }

        tracing::info!(
            "Starting poller: interval {:?}, {} concurrent fetches",
            self.options.interval,
            self.options.fetch_concurrency
        );

        let this = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(this.options.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = rx.recv() => break,
                    _ = interval.tick() => {
                        if let Err(e) = this.refresh_monitors().await {
                            tracing::error!("Refresh failed: {}", e);
                        }
                    }
                }
            }

            tracing::info!("Poller stopped");
        });
    }

    /// Stop the periodic refresh task.
    pub async fn stop(&self) {
        let stop = self.stop.lock().await;
        if let Some(tx) = stop.as_ref() {
            let _ = tx.send(());
        }
    }

    /// Refresh the monitor list, every monitor's history, and the stats.
    pub async fn refresh_monitors(self: &Arc<Self>) -> Result<(), ApiError> {
        if self.is_paused() {
            return Ok(());
        }

        self.board.write().await.last_error = None;

        let monitors = match self.source.monitors().await {
            Ok(m) => m,
            Err(e) => {
                self.board.write().await.last_error =
                    Some(format!("Failed to fetch monitors: {}", e));
                return Err(e);
            }
        };

        let ids: Vec<i64> = {
            let mut board = self.board.write().await;
            if let Some(monitors) = monitors {
                let removed = board.sync_monitors(monitors);
                if removed > 0 {
                    tracing::info!("Discarded history of {} removed monitors", removed);
                }
            }
            board.monitors.iter().map(|m| m.id).collect()
        };

        self.refresh_histories(&ids).await;

        match self.source.stats().await {
            Ok(Some(stats)) => self.board.write().await.stats = Some(stats),
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to fetch stats: {}", e),
        }

        self.board.write().await.last_update = Some(Utc::now());
        tracing::info!("Refreshed {} monitors", ids.len());

        Ok(())
    }

    async fn refresh_histories(self: &Arc<Self>, ids: &[i64]) {
        let batch_size = self.options.fetch_concurrency.max(1);

        for batch in ids.chunks(batch_size) {
            let mut tasks = JoinSet::new();

            for &id in batch {
                let this = self.clone();
                tasks.spawn(async move {
                    // Spread requests so a batch does not hit the backend at once
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(jitter)).await;
                    this.refresh_history(id, false).await
                });
            }

            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    tracing::error!("History task failed: {}", e);
                }
            }
        }
    }

    /// Fetch one monitor's history and fold it into its window.
    ///
    /// The first fetch, or any fetch with `reload`, replaces the window.
    /// Later fetches merge. `reload` also bypasses the pause flag and the
    /// single-flight check, superseding any pending request.
    ///
    /// The fetch runs in its own task, so it completes and releases the
    /// single-flight marker even if the caller is dropped.
    pub async fn refresh_history(self: &Arc<Self>, id: i64, reload: bool) -> FetchOutcome {
        if self.is_paused() && !reload {
            return FetchOutcome::Paused;
        }

        let (request, period, initialize) = {
            let mut board = self.board.write().await;
            let entry = board
                .histories
                .entry(id)
                .or_insert_with(|| MonitorHistory::new(Period::default()));

            if entry.in_flight.is_some() && !reload {
                tracing::warn!("Skipping history fetch for monitor {}: request pending", id);
                return FetchOutcome::InFlight;
            }

            let request = self.next_request.fetch_add(1, Ordering::SeqCst) + 1;
            entry.latest_request = request;
            entry.in_flight = Some(request);
            (request, entry.period, reload || !entry.loaded)
        };

        let this = self.clone();
        let task = tokio::spawn(async move {
            let result = this.source.history(id, period.query()).await;
            this.apply_history(id, request, period, initialize, result).await
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("History task for monitor {} failed: {}", id, e);
                let mut board = self.board.write().await;
                if let Some(entry) = board.histories.get_mut(&id) {
                    if entry.in_flight == Some(request) {
                        entry.in_flight = None;
                    }
                }
                FetchOutcome::Failed
            }
        }
    }

    async fn apply_history(
        &self,
        id: i64,
        request: u64,
        period: Period,
        initialize: bool,
        result: Result<Option<Vec<Sample>>, ApiError>,
    ) -> FetchOutcome {
        let mut guard = self.board.write().await;
        let board = &mut *guard;

        let Some(entry) = board.histories.get_mut(&id) else {
            tracing::debug!("Dropping history for monitor {}: no longer displayed", id);
            return FetchOutcome::Superseded;
        };

        if entry.in_flight == Some(request) {
            entry.in_flight = None;
        }

        if request < entry.latest_request {
            tracing::debug!(
                "Dropping history for monitor {}: request {} superseded by {}",
                id,
                request,
                entry.latest_request
            );
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(Some(samples)) if initialize => {
                entry.history.initialize(samples, period.bound());
                entry.loaded = true;
                tracing::debug!(
                    "Loaded {} samples for monitor {} ({})",
                    entry.history.len(),
                    id,
                    period
                );
                FetchOutcome::Initialized(entry.history.len())
            }
            Ok(Some(samples)) => {
                let appended = entry.history.merge(&samples);
                if appended > 0 {
                    tracing::debug!("Appended {} samples for monitor {}", appended, id);
                }
                FetchOutcome::Merged(appended)
            }
            Ok(None) => {
                if initialize {
                    entry.history.initialize(Vec::new(), period.bound());
                    entry.loaded = true;
                }
                FetchOutcome::NoData
            }
            Err(e) => {
                tracing::error!("History fetch failed for monitor {}: {}", id, e);
                board.last_error = Some(format!("Failed to fetch history: {}", e));
                FetchOutcome::Failed
            }
        }
    }

    /// Switch a monitor to another period.
    ///
    /// When the stored window already covers the new period only the display
    /// changes and `None` is returned. Otherwise the window is reloaded.
    pub async fn set_period(self: &Arc<Self>, id: i64, period: Period) -> Option<FetchOutcome> {
        let reload = {
            let mut board = self.board.write().await;
            let entry = board
                .histories
                .entry(id)
                .or_insert_with(|| MonitorHistory::new(period));

            let reload = !entry.loaded || !entry.history.covers(period.bound());
            entry.period = period;
            reload
        };

        if reload {
            tracing::info!("Reloading monitor {} for period {}", id, period);
            Some(self.refresh_history(id, true).await)
        } else {
            None
        }
    }

    /// Load a monitor's window if it has never been fetched.
    pub async fn ensure_loaded(self: &Arc<Self>, id: i64) {
        let loaded = self
            .board
            .read()
            .await
            .history(id)
            .is_some_and(|h| h.is_loaded());

        if !loaded {
            self.refresh_history(id, true).await;
        }
    }

    /// A monitor record from the board, or from the backend if the board
    /// does not list it.
    pub async fn monitor(&self, id: i64) -> Result<Option<Monitor>, ApiError> {
        if let Some(m) = self.board.read().await.monitor(id) {
            return Ok(Some(m.clone()));
        }
        self.source.monitor(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HistoryQuery;
    use crate::history::testutil::{down, up};
    use crate::history::Bound;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    type HistoryResult = Result<Option<Vec<Sample>>, ApiError>;

    struct Scripted {
        gate: Option<oneshot::Receiver<()>>,
        result: HistoryResult,
    }

    #[derive(Default)]
    struct FakeSource {
        monitors: std::sync::Mutex<Option<Vec<Monitor>>>,
        history: std::sync::Mutex<HashMap<i64, VecDeque<Scripted>>>,
        queries: std::sync::Mutex<Vec<HistoryQuery>>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn push(&self, id: i64, result: HistoryResult) {
            self.push_gated(id, None, result);
        }

        fn push_gated(&self, id: i64, gate: Option<oneshot::Receiver<()>>, result: HistoryResult) {
            self.history
                .lock()
                .unwrap()
                .entry(id)
                .or_default()
                .push_back(Scripted { gate, result });
        }

        fn set_monitors(&self, ids: &[i64]) {
            *self.monitors.lock().unwrap() = Some(ids.iter().map(|&id| monitor(id)).collect());
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HistorySource for FakeSource {
        async fn monitors(&self) -> Result<Option<Vec<Monitor>>, ApiError> {
            Ok(self.monitors.lock().unwrap().clone())
        }

        async fn monitor(&self, id: i64) -> Result<Option<Monitor>, ApiError> {
            Ok(Some(monitor(id)))
        }

        async fn stats(&self) -> Result<Option<MonitorStats>, ApiError> {
            Ok(Some(MonitorStats::default()))
        }

        async fn history(&self, id: i64, query: HistoryQuery) -> HistoryResult {
            let scripted = self
                .history
                .lock()
                .unwrap()
                .get_mut(&id)
                .and_then(|q| q.pop_front());
            self.queries.lock().unwrap().push(query);
            self.calls.fetch_add(1, Ordering::SeqCst);

            match scripted {
                Some(Scripted { gate, result }) => {
                    if let Some(gate) = gate {
                        let _ = gate.await;
                    }
                    result
                }
                None => Ok(None),
            }
        }
    }

    fn monitor(id: i64) -> Monitor {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("monitor-{}", id),
            "type": "http",
            "group": "Core",
            "status": 1,
            "uptime": 1.0
        }))
        .unwrap()
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            status: 500,
            url: "http://backend/api".to_string(),
        }
    }

    fn poller(source: &Arc<FakeSource>) -> Arc<Poller> {
        Arc::new(Poller::new(source.clone(), PollerOptions::default()))
    }

    async fn wait_for_calls(source: &FakeSource, n: usize) {
        while source.calls() < n {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test]
    async fn test_first_fetch_initializes_then_merges() {
        let source = Arc::new(FakeSource::default());
        source.push(1, Ok(Some(vec![up(0, 10), up(1, 11)])));
        source.push(1, Ok(Some(vec![up(0, 10), up(1, 11), down(2)])));
        let poller = poller(&source);

        assert_eq!(poller.refresh_history(1, false).await, FetchOutcome::Initialized(2));
        assert_eq!(poller.refresh_history(1, false).await, FetchOutcome::Merged(1));

        let board = poller.board().await;
        assert_eq!(board.history(1).unwrap().history.len(), 3);
    }

    #[tokio::test]
    async fn test_paused_poller_skips_fetch() {
        let source = Arc::new(FakeSource::default());
        source.push(1, Ok(Some(vec![up(0, 10)])));
        let poller = poller(&source);

        poller.pause();
        assert_eq!(poller.refresh_history(1, false).await, FetchOutcome::Paused);
        assert_eq!(source.calls(), 0);

        assert_eq!(poller.refresh_history(1, true).await, FetchOutcome::Initialized(1));
    }

    #[tokio::test]
    async fn test_pending_request_blocks_second_fetch() {
        let source = Arc::new(FakeSource::default());
        let (release, gate) = oneshot::channel();
        source.push_gated(1, Some(gate), Ok(Some(vec![up(0, 10)])));
        let poller = poller(&source);

        let first = {
            let poller = poller.clone();
            tokio::spawn(async move { poller.refresh_history(1, false).await })
        };
        wait_for_calls(&source, 1).await;

        assert_eq!(poller.refresh_history(1, false).await, FetchOutcome::InFlight);
        assert_eq!(source.calls(), 1);

        release.send(()).unwrap();
        assert_eq!(first.await.unwrap(), FetchOutcome::Initialized(1));
    }

    #[tokio::test]
    async fn test_superseded_result_is_dropped() {
        let source = Arc::new(FakeSource::default());
        let (release, gate) = oneshot::channel();
        source.push_gated(1, Some(gate), Ok(Some(vec![up(0, 999)])));
        source.push(1, Ok(Some(vec![up(5, 20), up(6, 21)])));
        let poller = poller(&source);

        let stale = {
            let poller = poller.clone();
            tokio::spawn(async move { poller.refresh_history(1, false).await })
        };
        wait_for_calls(&source, 1).await;

        assert_eq!(poller.refresh_history(1, true).await, FetchOutcome::Initialized(2));

        release.send(()).unwrap();
        assert_eq!(stale.await.unwrap(), FetchOutcome::Superseded);

        let board = poller.board().await;
        let samples = board.history(1).unwrap().history.samples();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.response_time_ms != 999));
    }

    #[tokio::test]
    async fn test_failure_keeps_window_and_records_error() {
        let source = Arc::new(FakeSource::default());
        source.push(1, Ok(Some(vec![up(0, 10), up(1, 10)])));
        source.push(1, Err(server_error()));
        source.push(1, Ok(None));
        let poller = poller(&source);

        poller.refresh_history(1, false).await;
        assert_eq!(poller.refresh_history(1, false).await, FetchOutcome::Failed);
        {
            let board = poller.board().await;
            assert_eq!(board.history(1).unwrap().history.len(), 2);
            assert!(board.last_error.as_deref().unwrap().contains("500"));
        }

        assert_eq!(poller.refresh_history(1, false).await, FetchOutcome::NoData);
        assert_eq!(poller.board().await.history(1).unwrap().history.len(), 2);
    }

    #[tokio::test]
    async fn test_no_data_on_first_fetch_leaves_window_empty() {
        let source = Arc::new(FakeSource::default());
        let poller = poller(&source);

        assert_eq!(poller.refresh_history(1, false).await, FetchOutcome::NoData);
        let board = poller.board().await;
        let history = board.history(1).unwrap();
        assert!(history.is_loaded());
        assert!(history.history.is_empty());
    }

    #[tokio::test]
    async fn test_set_period_reloads_only_when_not_covered() {
        let source = Arc::new(FakeSource::default());
        let poller = poller(&source);

        assert_eq!(
            poller.set_period(1, Period::Hours(24)).await,
            Some(FetchOutcome::NoData)
        );
        assert_eq!(poller.set_period(1, Period::Hours(6)).await, None);
        assert_eq!(
            poller.set_period(1, Period::Recent).await,
            Some(FetchOutcome::NoData)
        );

        let queries = source.queries.lock().unwrap().clone();
        assert_eq!(
            queries,
            vec![HistoryQuery::Hours(24), HistoryQuery::Limit(100)]
        );

        let board = poller.board().await;
        let history = board.history(1).unwrap();
        assert_eq!(history.period, Period::Recent);
        assert_eq!(history.history.bound(), Bound::Latest(100));
    }

    #[tokio::test]
    async fn test_refresh_loads_every_monitor_and_discards_removed() {
        let source = Arc::new(FakeSource::default());
        source.set_monitors(&[1, 2, 3]);
        for id in 1..=3 {
            source.push(id, Ok(Some(vec![up(0, 10 * id as u64)])));
        }
        let poller = poller(&source);

        poller.refresh_monitors().await.unwrap();
        {
            let board = poller.board().await;
            assert_eq!(board.histories.len(), 3);
            assert!(board.stats.is_some());
            assert!(board.last_update.is_some());
        }

        source.set_monitors(&[1, 3]);
        poller.refresh_monitors().await.unwrap();
        let board = poller.board().await;
        assert_eq!(board.monitors.len(), 2);
        assert!(board.history(2).is_none());
        assert_eq!(board.history(3).unwrap().history.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_while_paused_does_nothing() {
        let source = Arc::new(FakeSource::default());
        source.set_monitors(&[1]);
        let poller = poller(&source);

        poller.pause();
        poller.refresh_monitors().await.unwrap();
        assert!(poller.board().await.monitors.is_empty());
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_sync_ignores_empty_monitor_list() {
        let mut board = MonitorBoard::default();
        board.monitors = vec![monitor(1), monitor(2)];
        board.histories.insert(1, MonitorHistory::new(Period::Recent));
        board.histories.insert(2, MonitorHistory::new(Period::Recent));

        assert_eq!(board.sync_monitors(Vec::new()), 0);
        assert_eq!(board.monitors.len(), 2);

        assert_eq!(board.sync_monitors(vec![monitor(2)]), 1);
        assert!(board.history(1).is_none());
        assert!(board.monitor(2).is_some());
    }

    async fn wait_until_idle(poller: &Poller, id: i64) {
        while poller
            .board()
            .await
            .history(id)
            .is_some_and(|h| h.in_flight.is_some())
        {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    async fn wait_for_update(poller: &Poller) {
        while poller.board().await.last_update.is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_dropped_reload_still_releases_monitor() {
        let source = Arc::new(FakeSource::default());
        source.push(1, Ok(Some(vec![up(0, 10)])));
        let (release, gate) = oneshot::channel();
        source.push_gated(1, Some(gate), Ok(Some(vec![up(1, 20)])));
        source.push(1, Ok(Some(vec![up(2, 30)])));
        let poller = poller(&source);

        poller.refresh_history(1, false).await;

        let reload = {
            let poller = poller.clone();
            tokio::spawn(async move { poller.set_period(1, Period::Hours(24)).await })
        };
        wait_for_calls(&source, 2).await;
        reload.abort();
        assert!(reload.await.unwrap_err().is_cancelled());

        release.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), wait_until_idle(&poller, 1))
            .await
            .unwrap();

        let outcome = poller.refresh_history(1, false).await;
        assert!(matches!(outcome, FetchOutcome::Merged(_)));
        assert_eq!(source.calls(), 3);
        assert_eq!(poller.board().await.history(1).unwrap().period, Period::Hours(24));
    }

    #[tokio::test]
    async fn test_start_refreshes_immediately_and_stop_ends_loop() {
        let source = Arc::new(FakeSource::default());
        source.set_monitors(&[1]);
        let poller = Arc::new(Poller::new(
            source.clone(),
            PollerOptions {
                interval: Duration::from_millis(20),
                fetch_concurrency: 5,
            },
        ));

        poller.start().await;
        tokio::time::timeout(Duration::from_secs(5), wait_for_update(&poller))
            .await
            .unwrap();
        assert_eq!(poller.board().await.monitors.len(), 1);
        assert!(source.calls() >= 1);

        // Let ticks accumulate, then stop and wait out any refresh in progress
        tokio::time::timeout(Duration::from_secs(5), wait_for_calls(&source, 2))
            .await
            .unwrap();
        poller.stop().await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        let settled = source.calls();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(source.calls(), settled);
    }

    #[tokio::test]
    async fn test_resume_refreshes_immediately() {
        let source = Arc::new(FakeSource::default());
        source.set_monitors(&[1, 2]);
        let poller = poller(&source);

        poller.pause();
        poller.resume();
        assert!(!poller.is_paused());

        tokio::time::timeout(Duration::from_secs(5), wait_for_update(&poller))
            .await
            .unwrap();
        assert_eq!(poller.board().await.monitors.len(), 2);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_resume_when_not_paused_does_not_refresh() {
        let source = Arc::new(FakeSource::default());
        source.set_monitors(&[1]);
        let poller = poller(&source);

        poller.resume();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(source.calls(), 0);
        assert!(poller.board().await.last_update.is_none());
    }

    #[tokio::test]
    async fn test_monitor_falls_back_to_source() {
        let source = Arc::new(FakeSource::default());
        let poller = poller(&source);

        let m = poller.monitor(9).await.unwrap().unwrap();
        assert_eq!(m.name, "monitor-9");
    }
}
