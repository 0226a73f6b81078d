use anyhow::Context;
use tally_config::TallyConfig;
use tally_feed::{SubmitOutcome, UploadSession, UploadSkip, human_size};
use tally_transport::{GraphqlClient, UploadFile};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UploadArgs;
use crate::commands::shared::{Interrupted, cancel_on_ctrl_c};
use crate::output::output;
use crate::progress::Progress;

/// Handle `tally upload`.
pub async fn handle(
    args: &UploadArgs,
    config: &TallyConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let size = tokio::fs::metadata(&args.path)
        .await
        .with_context(|| format!("cannot read {}", args.path.display()))?
        .len();
    let client = GraphqlClient::from_config(config)?;

    let file = UploadFile::from_path(args.path.clone());
    let spinner = Progress::spinner(&format!(
        "uploading {} ({})",
        file.file_name(),
        human_size(size)
    ));

    let session = UploadSession::new(client);
    session.select_file(file);
    if let Some(source) = &args.source {
        session.set_source(source.as_str());
    }
    session.set_upsert(args.upsert);

    match session.submit(cancel_on_ctrl_c()).await {
        SubmitOutcome::Imported(result) => {
            spinner.finish_ok(&format!(
                "imported {} of {} rows from {}",
                result.inserted, result.total_rows, result.source
            ));
            output(&result, flags.format)
        }
        SubmitOutcome::Failed(error) => {
            spinner.finish_err(&error.message);
            anyhow::bail!("upload failed: {}", error.message)
        }
        SubmitOutcome::Cancelled => {
            spinner.finish_clear();
            Err(Interrupted.into())
        }
        SubmitOutcome::Skipped(UploadSkip::NoFile | UploadSkip::Busy) => {
            spinner.finish_clear();
            anyhow::bail!("no upload was started")
        }
    }
}
