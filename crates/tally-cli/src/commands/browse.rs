use tally_config::TallyConfig;
use tally_core::entities::SalesRecord;
use tally_core::enums::InitialStrategy;
use tally_feed::{FeedController, FeedOptions, FetchOutcome, StartOutcome};
use tally_transport::GraphqlClient;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::BrowseArgs;
use crate::commands::shared::{Interrupted, apply_filters, cancel_on_ctrl_c, check_outcome};
use crate::output::output_records;
use crate::progress::Progress;

/// Handle `tally browse`.
pub async fn handle(
    args: &BrowseArgs,
    config: &TallyConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = GraphqlClient::from_config(config)?;
    let mut options = FeedOptions::from(&config.feed);
    if args.skip_probe {
        options.initial_strategy = InitialStrategy::FetchDirectly;
    }

    let feed = FeedController::new(client, options);
    apply_filters(&feed, &args.filters);
    feed.set_sort_direction(args.sort);
    let params = feed.settle_now();
    tracing::debug!(?params, limit = args.limit, "browsing");

    let interrupt = cancel_on_ctrl_c();
    let progress = Progress::rows(args.limit);
    let loaded = tokio::select! {
        () = interrupt.cancelled() => Err(anyhow::Error::from(Interrupted)),
        result = load(&feed, args.limit, &progress) => result,
    };
    progress.finish_clear();

    let records = match loaded {
        Ok(Some(records)) => records,
        Ok(None) => {
            if !flags.quiet {
                eprintln!("no sales data on the server yet; run `tally upload <file>` first");
            }
            Vec::new()
        }
        Err(error) => {
            feed.shutdown().await;
            return Err(error);
        }
    };

    feed.shutdown().await;
    output_records(&records, flags.format)
}

/// Start the feed and page until `limit` rows are loaded or the server is
/// exhausted. `None` means the dataset is empty.
async fn load(
    feed: &FeedController<GraphqlClient>,
    limit: usize,
    progress: &Progress,
) -> anyhow::Result<Option<Vec<SalesRecord>>> {
    match feed.start().await {
        StartOutcome::NoData => return Ok(None),
        StartOutcome::Loaded(outcome) => {
            check_outcome(outcome, feed)?;
        }
    }

    while feed.status().rows < limit {
        progress.set_rows(feed.status().rows);
        let outcome = feed.incremental_fetch().await;
        if matches!(outcome, FetchOutcome::Skipped(_)) {
            break;
        }
        check_outcome(outcome, feed)?;
    }

    Ok(Some(feed.with_edges(|edges| {
        edges.iter().take(limit).map(|edge| edge.node.clone()).collect()
    })))
}
