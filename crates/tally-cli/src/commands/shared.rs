use tally_core::enums::FilterField;
use tally_feed::{FeedHandle, FetchOutcome};
use tally_transport::{CancellationToken, SalesBackend};

use crate::cli::root_commands::FilterArgs;

/// The user pressed Ctrl-C before the command finished.
#[derive(Debug, thiserror::Error)]
#[error("interrupted")]
pub struct Interrupted;

/// A token that fires on Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupted");
            trigger.cancel();
        }
    });
    token
}

/// Copy command-line filters into the feed's raw inputs.
pub fn apply_filters<B: SalesBackend>(feed: &FeedHandle<B>, filters: &FilterArgs) {
    let inputs = [
        (FilterField::Query, &filters.q),
        (FilterField::Country, &filters.country),
        (FilterField::ItemType, &filters.item_type),
        (FilterField::OrderDateFrom, &filters.from),
        (FilterField::OrderDateTo, &filters.to),
    ];
    for (field, value) in inputs {
        if let Some(value) = value {
            feed.set_raw_filter_field(field, value.as_str());
        }
    }
}

/// Turn a fetch outcome into "did rows change", surfacing failures.
pub fn check_outcome<B: SalesBackend>(
    outcome: FetchOutcome,
    feed: &FeedHandle<B>,
) -> anyhow::Result<bool> {
    match outcome {
        FetchOutcome::Replaced { .. } | FetchOutcome::Appended { .. } => Ok(true),
        FetchOutcome::Skipped(_) | FetchOutcome::Superseded => Ok(false),
        FetchOutcome::Cancelled => Err(Interrupted.into()),
        FetchOutcome::Failed => {
            let message = feed
                .status()
                .error
                .map_or_else(|| String::from("fetch failed"), |error| error.message);
            anyhow::bail!(message)
        }
    }
}
