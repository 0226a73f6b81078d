//! `tally watch`: a line-driven stand-in for an interactive table.
//!
//! Filter edits go through the controller's debounce, and `scroll` moves a
//! virtual viewport over fixed-height rows so the scroll trigger decides
//! when to load more.

use std::str::FromStr;
use std::sync::Arc;

use tally_config::TallyConfig;
use tally_core::entities::SalesRecord;
use tally_core::enums::{FilterField, InitialStrategy, SortDirection};
use tally_feed::{
    FeedController, FeedHandle, FeedOptions, IntersectionMargin, ScrollSignal, ScrollTrigger,
    StartOutcome,
};
use tally_transport::{CancellationToken, GraphqlClient, SalesBackend};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::WatchArgs;
use crate::commands::shared::cancel_on_ctrl_c;
use crate::output::{output, output_records};

const HELP: &str = "commands: q|country|item|from|to <value>, sort asc|desc, scroll <row>, \
                    refresh, status, rows, help, quit";

#[derive(Debug, Clone, PartialEq)]
enum WatchCommand {
    Filter(FilterField, String),
    Sort(SortDirection),
    Scroll(f64),
    Refresh,
    Status,
    Rows,
    Help,
    Quit,
}

impl FromStr for WatchCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match verb {
            "status" => Ok(Self::Status),
            "rows" => Ok(Self::Rows),
            "refresh" => Ok(Self::Refresh),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "sort" => rest.parse().map(Self::Sort).map_err(|e| format!("{e}")),
            "scroll" => rest
                .parse::<f64>()
                .ok()
                .filter(|row| row.is_finite() && *row >= 0.0)
                .map(Self::Scroll)
                .ok_or_else(|| format!("scroll expects a row number, got '{rest}'")),
            other => other
                .parse::<FilterField>()
                .map(|field| Self::Filter(field, rest.to_string()))
                .map_err(|_| format!("unknown command '{other}'")),
        }
    }
}

/// Fixed-height row layout: the sentinel sits right after the last row.
#[derive(Debug, Clone, Copy)]
struct Layout {
    row_height: f64,
    viewport: f64,
}

impl Layout {
    #[allow(clippy::cast_precision_loss)]
    fn sentinel_top(self, rows: usize) -> f64 {
        rows as f64 * self.row_height
    }

    fn signal(self, top_row: f64, rows: usize) -> ScrollSignal {
        ScrollSignal {
            viewport_top: top_row * self.row_height,
            viewport_height: self.viewport,
            sentinel_top: self.sentinel_top(rows),
            sentinel_height: 1.0,
        }
    }
}

/// Keep the sentinel just past the last row as the result set grows or is
/// replaced. Every move is a new signal, so the scroll trigger re-checks and
/// loads chain until the sentinel leaves the margin.
async fn follow_rows(
    mut rows: watch::Receiver<usize>,
    signals: Arc<watch::Sender<ScrollSignal>>,
    layout: Layout,
    stop: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = stop.cancelled() => break,
            changed = rows.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
        let count = *rows.borrow_and_update();
        tracing::trace!(rows = count, "moving sentinel");
        signals.send_modify(|signal| signal.sentinel_top = layout.sentinel_top(count));
    }
}

/// Handle `tally watch`.
pub async fn handle(
    args: &WatchArgs,
    config: &TallyConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = GraphqlClient::from_config(config)?;
    let mut options = FeedOptions::from(&config.feed);
    if args.skip_probe {
        options.initial_strategy = InitialStrategy::FetchDirectly;
    }
    let layout = Layout {
        row_height: args.row_height,
        viewport: args.viewport,
    };

    let feed = FeedController::new(client, options);
    match feed.start().await {
        StartOutcome::NoData => {
            eprintln!("no sales data on the server yet; run `tally upload <file>` first");
        }
        StartOutcome::Loaded(outcome) => tracing::info!(?outcome, "initial load"),
    }

    // Viewport at the top of whatever the first page loaded.
    let (signals, signal_rx) = watch::channel(layout.signal(0.0, feed.status().rows));
    let signals = Arc::new(signals);
    let observer = ScrollTrigger::new(
        feed.handle(),
        IntersectionMargin::uniform(config.feed.prefetch_margin),
    )
    .observe(signal_rx);
    let stop_following = CancellationToken::new();
    let follower = tokio::spawn(follow_rows(
        feed.watch_rows(),
        Arc::clone(&signals),
        layout,
        stop_following.clone(),
    ));

    if !flags.quiet {
        eprintln!("{HELP}");
    }

    let interrupt = cancel_on_ctrl_c();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            () = interrupt.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<WatchCommand>() {
            Ok(WatchCommand::Quit) => break,
            Ok(command) => run(command, &feed, &signals, layout, flags)?,
            Err(message) => eprintln!("{message}"),
        }
    }

    stop_following.cancel();
    let _ = follower.await;
    observer.join().await;
    feed.shutdown().await;
    Ok(())
}

fn run<B: SalesBackend>(
    command: WatchCommand,
    feed: &FeedHandle<B>,
    signals: &watch::Sender<ScrollSignal>,
    layout: Layout,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        WatchCommand::Filter(field, value) => feed.set_raw_filter_field(field, value),
        WatchCommand::Sort(direction) => feed.set_sort_direction(direction),
        WatchCommand::Scroll(top_row) => {
            signals.send_replace(layout.signal(top_row, feed.status().rows));
        }
        WatchCommand::Refresh => drop(feed.spawn_fresh_fetch()),
        WatchCommand::Status => output(&feed.status(), flags.format)?,
        WatchCommand::Rows => {
            let records: Vec<SalesRecord> =
                feed.with_edges(|edges| edges.iter().map(|e| e.node.clone()).collect());
            output_records(&records, flags.format)?;
        }
        WatchCommand::Help => eprintln!("{HELP}"),
        WatchCommand::Quit => {}
    }
    Ok(())
}
