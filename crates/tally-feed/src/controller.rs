//! Query controller.
//!
//! Owns the raw filter inputs and the result store, settles edits after a
//! quiet period, and runs the two kinds of fetch:
//!
//! - **fresh**: starts over from the first page under the settled params and
//!   replaces the result set. Each one advances the generation counter and
//!   cancels the one before it; only the fetch holding the current generation
//!   may commit.
//! - **incremental**: continues after the store's end cursor under the params
//!   of the fresh fetch that last replaced the store, and appends.
//!
//! All state lives behind one mutex that is never held across an await.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tally_config::FeedConfig;
use tally_core::entities::{Edge, PageInfo};
use tally_core::enums::{FilterField, InitialStrategy, SortDirection};
use tally_core::filter::{QueryParams, RawFilter};
use tally_transport::{CancellationToken, PageRequest, SalesBackend, has_any_sales};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::generation::{Generation, GenerationCounter};
use crate::store::PagedResultStore;

/// Construction-time settings, usually taken from [`FeedConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedOptions {
    pub page_size: u32,
    pub debounce: Duration,
    pub initial_strategy: InitialStrategy,
}

impl From<&FeedConfig> for FeedOptions {
    fn from(config: &FeedConfig) -> Self {
        Self {
            page_size: config.page_size,
            debounce: config.debounce(),
            initial_strategy: config.initial_strategy,
        }
    }
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self::from(&FeedConfig::default())
    }
}

/// What the user has typed and picked, before settling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    pub filter: RawFilter,
    pub direction: SortDirection,
}

impl RawQuery {
    /// Resolve into the params a fresh fetch runs under. Unparseable dates
    /// are left out.
    #[must_use]
    pub fn settle(&self) -> QueryParams {
        let resolved = self.filter.resolve();
        for err in &resolved.invalid {
            warn!(error = %err, "ignoring filter input");
        }
        QueryParams {
            filter: resolved.filter,
            direction: self.direction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Another incremental fetch is still running.
    InFlight,
    /// The server reported no further pages.
    Exhausted,
    /// No fresh fetch has populated the store yet.
    NotLoaded,
    /// A newer fresh fetch is outstanding; the store is about to be replaced.
    Stale,
}

/// How a single fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Replaced { rows: usize },
    Appended { added: usize },
    Skipped(SkipReason),
    /// A newer fresh fetch was issued before this one resolved; its result was dropped.
    Superseded,
    Cancelled,
    /// The error is kept in [`FeedStatus::error`].
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The probe found an empty dataset; nothing was fetched.
    NoData,
    Loaded(FetchOutcome),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPhase {
    /// Nothing loaded yet, or the first load failed.
    #[default]
    Idle,
    /// The existence probe is outstanding.
    Probing,
    NoData,
    /// The store holds a result set.
    Ready,
}

/// Point-in-time view of the controller for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct FeedStatus {
    pub rows: usize,
    pub page_info: PageInfo,
    pub loading_top: bool,
    pub loading_more: bool,
    pub error: Option<FeedError>,
    /// Params of the most recent settle.
    pub params: QueryParams,
    pub phase: FeedPhase,
}

/// Params and generation of the fresh fetch that last replaced the store.
#[derive(Debug, Clone)]
struct LoadedScope {
    generation: Generation,
    params: QueryParams,
}

#[derive(Debug, Default)]
struct FeedState {
    store: PagedResultStore,
    loaded: Option<LoadedScope>,
    settled: QueryParams,
    loading_top: bool,
    loading_more: bool,
    error: Option<FeedError>,
    phase: FeedPhase,
    fresh_cancel: Option<CancellationToken>,
    more_cancel: Option<CancellationToken>,
}

struct Inner<B> {
    backend: B,
    options: FeedOptions,
    generation: GenerationCounter,
    state: Mutex<FeedState>,
    raw: watch::Sender<RawQuery>,
    /// Size of the result set, republished whenever it changes.
    rows: watch::Sender<usize>,
    shutdown: CancellationToken,
}

/// Cloneable access to a running controller.
pub struct FeedHandle<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for FeedHandle<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Owner of the debounce worker. Dropping it cancels the worker and every
/// in-flight fetch.
pub struct FeedController<B> {
    handle: FeedHandle<B>,
    worker: Option<JoinHandle<()>>,
}

impl<B: SalesBackend> FeedController<B> {
    /// Create a controller and spawn its debounce worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(backend: B, options: FeedOptions) -> Self {
        let (raw, raw_rx) = watch::channel(RawQuery::default());
        let handle = FeedHandle {
            inner: Arc::new(Inner {
                backend,
                options,
                generation: GenerationCounter::new(),
                state: Mutex::new(FeedState::default()),
                raw,
                rows: watch::Sender::new(0),
                shutdown: CancellationToken::new(),
            }),
        };
        let worker = tokio::spawn(debounce_worker(handle.clone(), raw_rx));
        Self {
            handle,
            worker: Some(worker),
        }
    }

    #[must_use]
    pub fn handle(&self) -> FeedHandle<B> {
        self.handle.clone()
    }

    /// Stop the debounce worker, cancel in-flight fetches, and wait for the
    /// worker to exit.
    pub async fn shutdown(mut self) {
        self.handle.inner.shutdown.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
    }
}

impl<B> Deref for FeedController<B> {
    type Target = FeedHandle<B>;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl<B> Drop for FeedController<B> {
    fn drop(&mut self) {
        self.handle.inner.shutdown.cancel();
    }
}

impl<B: SalesBackend> FeedHandle<B> {
    /// Update one raw input. Only wakes the debounce worker; never fetches.
    pub fn set_raw_filter_field(&self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        self.inner.raw.send_if_modified(|raw| {
            if raw.filter.get(field) == value {
                return false;
            }
            raw.filter.set(field, value);
            true
        });
    }

    /// Change the sort direction. Settles together with the filter inputs.
    pub fn set_sort_direction(&self, direction: SortDirection) {
        self.inner.raw.send_if_modified(|raw| {
            if raw.direction == direction {
                return false;
            }
            raw.direction = direction;
            true
        });
    }

    /// Settle the current raw inputs now, skipping the quiet period.
    ///
    /// Does not fetch. Meant for inputs known up front, before [`Self::start`].
    pub fn settle_now(&self) -> QueryParams {
        let params = self.raw().settle();
        self.inner.state.lock().settled = params.clone();
        params
    }

    #[must_use]
    pub fn raw(&self) -> RawQuery {
        self.inner.raw.borrow().clone()
    }

    #[must_use]
    pub fn options(&self) -> FeedOptions {
        self.inner.options
    }

    /// Run the configured startup strategy.
    ///
    /// With [`InitialStrategy::ProbeThenDecide`] a one-row probe runs first;
    /// an empty dataset ends here with [`StartOutcome::NoData`]. A probe that
    /// fails falls through to the fresh fetch, which reports the error.
    pub async fn start(&self) -> StartOutcome {
        if self.inner.options.initial_strategy == InitialStrategy::ProbeThenDecide {
            self.inner.state.lock().phase = FeedPhase::Probing;
            match has_any_sales(&self.inner.backend, self.inner.shutdown.child_token()).await {
                Ok(true) => debug!("probe found data"),
                Ok(false) => {
                    info!("no sales data on the server");
                    self.inner.state.lock().phase = FeedPhase::NoData;
                    return StartOutcome::NoData;
                }
                Err(err) if err.is_cancelled() => debug!("probe cancelled"),
                Err(err) => warn!(error = %err, "existence probe failed, loading anyway"),
            }
            let mut state = self.inner.state.lock();
            if state.phase == FeedPhase::Probing {
                state.phase = FeedPhase::Idle;
            }
        }
        StartOutcome::Loaded(self.fresh_fetch().await)
    }

    /// Start over from the first page under the settled params.
    pub async fn fresh_fetch(&self) -> FetchOutcome {
        let inner = &self.inner;
        let cancel = inner.shutdown.child_token();
        let (generation, params) = {
            let mut state = inner.state.lock();
            let generation = inner.generation.advance();
            if let Some(previous) = state.fresh_cancel.replace(cancel.clone()) {
                previous.cancel();
            }
            if let Some(more) = state.more_cancel.take() {
                more.cancel();
                state.loading_more = false;
            }
            state.loading_top = true;
            state.error = None;
            (generation, state.settled.clone())
        };

        debug!(%generation, ?params, "fresh fetch");
        let request = PageRequest::first_page(inner.options.page_size, &params);
        let result = inner.backend.sales_page(request, cancel).await;

        let mut state = inner.state.lock();
        if !inner.generation.is_current(generation) {
            debug!(%generation, "dropping superseded page");
            return FetchOutcome::Superseded;
        }
        state.loading_top = false;
        state.fresh_cancel = None;
        match result {
            Ok(page) => {
                let rows = page.edges.len();
                state.store.replace(page);
                inner.publish_rows(state.store.len());
                state.loaded = Some(LoadedScope { generation, params });
                state.phase = FeedPhase::Ready;
                info!(
                    %generation,
                    rows,
                    has_next_page = state.store.page_info().has_next_page,
                    "result set replaced"
                );
                FetchOutcome::Replaced { rows }
            }
            Err(err) if err.is_cancelled() => {
                debug!(%generation, "fresh fetch cancelled");
                FetchOutcome::Cancelled
            }
            Err(err) => {
                warn!(%generation, category = err.category().as_str(), error = %err, "fresh fetch failed");
                state.error = Some(FeedError::from(&err));
                FetchOutcome::Failed
            }
        }
    }

    /// Load the next page of the current result set and append it.
    ///
    /// Safe to call repeatedly: while one is running, after the server is
    /// exhausted, and while a fresh fetch is outstanding it does nothing.
    pub async fn incremental_fetch(&self) -> FetchOutcome {
        let inner = &self.inner;
        let cancel = inner.shutdown.child_token();
        let (issued_at, loaded_generation, request) = {
            let mut state = inner.state.lock();
            if state.loading_more {
                return FetchOutcome::Skipped(SkipReason::InFlight);
            }
            let Some(scope) = state.loaded.clone() else {
                return FetchOutcome::Skipped(SkipReason::NotLoaded);
            };
            if state.loading_top {
                return FetchOutcome::Skipped(SkipReason::Stale);
            }
            let page_info = state.store.page_info();
            if !page_info.has_next_page {
                return FetchOutcome::Skipped(SkipReason::Exhausted);
            }
            let request = PageRequest::after(
                inner.options.page_size,
                page_info.end_cursor.clone(),
                &scope.params,
            );
            state.loading_more = true;
            state.more_cancel = Some(cancel.clone());
            state.error = None;
            (inner.generation.current(), scope.generation, request)
        };

        debug!(generation = %loaded_generation, after = ?request.after, "incremental fetch");
        let result = inner.backend.sales_page(request, cancel).await;

        let mut state = inner.state.lock();
        if !inner.generation.is_current(issued_at) {
            debug!(generation = %loaded_generation, "dropping page from a replaced result set");
            return FetchOutcome::Superseded;
        }
        state.loading_more = false;
        state.more_cancel = None;
        match result {
            Ok(page) => {
                let added = state.store.append(page);
                inner.publish_rows(state.store.len());
                debug!(
                    added,
                    rows = state.store.len(),
                    has_next_page = state.store.page_info().has_next_page,
                    "page appended"
                );
                FetchOutcome::Appended { added }
            }
            Err(err) if err.is_cancelled() => FetchOutcome::Cancelled,
            Err(err) => {
                warn!(category = err.category().as_str(), error = %err, "incremental fetch failed");
                state.error = Some(FeedError::from(&err));
                FetchOutcome::Failed
            }
        }
    }

    pub fn spawn_fresh_fetch(&self) -> JoinHandle<FetchOutcome> {
        let feed = self.clone();
        tokio::spawn(async move { feed.fresh_fetch().await })
    }

    pub fn spawn_incremental_fetch(&self) -> JoinHandle<FetchOutcome> {
        let feed = self.clone();
        tokio::spawn(async move { feed.incremental_fetch().await })
    }

    /// Adopt settled inputs. Spawns a fresh fetch only if the params changed.
    fn apply(&self, raw: &RawQuery) -> bool {
        let params = raw.settle();
        {
            let mut state = self.inner.state.lock();
            if state.settled == params {
                debug!("settled params unchanged");
                return false;
            }
            debug!(?params, "params settled");
            state.settled = params;
        }
        drop(self.spawn_fresh_fetch());
        true
    }

    #[must_use]
    pub fn status(&self) -> FeedStatus {
        let state = self.inner.state.lock();
        FeedStatus {
            rows: state.store.len(),
            page_info: state.store.page_info().clone(),
            loading_top: state.loading_top,
            loading_more: state.loading_more,
            error: state.error.clone(),
            params: state.settled.clone(),
            phase: state.phase,
        }
    }

    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        self.with_edges(<[Edge]>::to_vec)
    }

    /// Borrow the result set without cloning it. `f` runs under the state
    /// lock and must not call back into the controller.
    pub fn with_edges<R>(&self, f: impl FnOnce(&[Edge]) -> R) -> R {
        f(self.inner.state.lock().store.edges())
    }

    /// Follow the result set size. Only changes are published, so a page
    /// that adds nothing new wakes no one.
    #[must_use]
    pub fn watch_rows(&self) -> watch::Receiver<usize> {
        self.inner.rows.subscribe()
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }
}

impl<B> Inner<B> {
    fn publish_rows(&self, rows: usize) {
        self.rows.send_if_modified(|current| {
            let changed = *current != rows;
            *current = rows;
            changed
        });
    }
}

async fn debounce_worker<B: SalesBackend>(feed: FeedHandle<B>, mut raw: watch::Receiver<RawQuery>) {
    let shutdown = feed.inner.shutdown.clone();
    let quiet = feed.inner.options.debounce;

    'edits: loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break 'edits,
            changed = raw.changed() => {
                if changed.is_err() {
                    break 'edits;
                }
            }
        }

        // Every further edit restarts the quiet period.
        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break 'edits,
                changed = raw.changed() => {
                    if changed.is_err() {
                        break 'edits;
                    }
                }
                () = tokio::time::sleep(quiet) => break,
            }
        }

        let settled = raw.borrow_and_update().clone();
        feed.apply(&settled);
    }
    debug!("debounce worker stopped");
}
