//! Scroll-driven prefetch.
//!
//! Geometry arrives as [`ScrollSignal`]s on a watch channel. Whenever the
//! sentinel at the end of the list intersects the viewport expanded by the
//! prefetch margin, an incremental fetch is spawned. The controller turns
//! repeated triggers into no-ops, so the observer does no gating of its own.

use tally_transport::{CancellationToken, SalesBackend};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::controller::FeedHandle;

/// Vertical geometry of the viewport and the end-of-list sentinel, in the
/// same units and coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollSignal {
    pub viewport_top: f64,
    pub viewport_height: f64,
    pub sentinel_top: f64,
    pub sentinel_height: f64,
}

/// How far beyond the viewport the sentinel already counts as visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionMargin {
    pub before: f64,
    pub after: f64,
}

impl IntersectionMargin {
    #[must_use]
    pub const fn uniform(margin: f64) -> Self {
        Self {
            before: margin,
            after: margin,
        }
    }
}

impl ScrollSignal {
    #[must_use]
    pub fn is_visible(&self, margin: IntersectionMargin) -> bool {
        let top = self.viewport_top - margin.before;
        let bottom = self.viewport_top + self.viewport_height + margin.after;
        self.sentinel_top <= bottom && self.sentinel_top + self.sentinel_height >= top
    }
}

pub struct ScrollTrigger<B> {
    feed: FeedHandle<B>,
    margin: IntersectionMargin,
}

impl<B: SalesBackend> ScrollTrigger<B> {
    #[must_use]
    pub const fn new(feed: FeedHandle<B>, margin: IntersectionMargin) -> Self {
        Self { feed, margin }
    }

    /// Start observing. The current signal is checked immediately, then
    /// every update after it.
    #[must_use = "dropping the observer disconnects it"]
    pub fn observe(self, mut signals: watch::Receiver<ScrollSignal>) -> ScrollObserver {
        let stop = CancellationToken::new();
        let stopped = stop.clone();
        let task = tokio::spawn(async move {
            let mut signal = *signals.borrow_and_update();
            loop {
                if signal.is_visible(self.margin) {
                    trace!(?signal, "sentinel visible");
                    drop(self.feed.spawn_incremental_fetch());
                }
                tokio::select! {
                    biased;
                    () = stopped.cancelled() => break,
                    changed = signals.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
                signal = *signals.borrow_and_update();
            }
            debug!("scroll observer stopped");
        });
        ScrollObserver { stop, task }
    }
}

/// Teardown handle for a running observer. Disconnects on drop.
#[derive(Debug)]
pub struct ScrollObserver {
    stop: CancellationToken,
    task: JoinHandle<()>,
}

impl ScrollObserver {
    pub fn disconnect(&self) {
        self.stop.cancel();
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.stop.is_cancelled() && !self.task.is_finished()
    }

    /// Disconnect and wait for the observer task to exit.
    pub async fn join(mut self) {
        self.stop.cancel();
        let _ = (&mut self.task).await;
    }
}

impl Drop for ScrollObserver {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}
