use serde::Serialize;
use tally_config::TallyConfig;
use tally_transport::{GraphqlClient, has_any_sales};

use crate::cli::GlobalFlags;
use crate::commands::shared::cancel_on_ctrl_c;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct ProbeResponse {
    has_data: bool,
    endpoint: String,
}

/// Handle `tally probe`.
pub async fn handle(config: &TallyConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = GraphqlClient::from_config(config)?;
    let spinner = Progress::spinner("checking for sales data");
    let result = has_any_sales(&client, cancel_on_ctrl_c()).await;
    spinner.finish_clear();

    output(
        &ProbeResponse {
            has_data: result?,
            endpoint: client.endpoint().to_string(),
        },
        flags.format,
    )
}
