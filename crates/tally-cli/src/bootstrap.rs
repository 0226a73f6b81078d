use anyhow::Context;
use figment::providers::Serialized;
use tally_config::TallyConfig;

use crate::cli::GlobalFlags;

/// Layered configuration with command-line flags as the top layer.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<TallyConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "exported .env");
    }

    let mut figment = TallyConfig::figment();
    if let Some(endpoint) = &flags.endpoint {
        figment = figment.merge(Serialized::default("endpoint.url", endpoint));
    }

    let config = TallyConfig::from_figment(&figment).context("configuration rejected")?;
    tracing::debug!(
        endpoint = %config.endpoint.url,
        page_size = config.feed.page_size,
        debounce_ms = config.feed.debounce_ms,
        "configuration loaded"
    );
    Ok(config)
}
