//! # tally-config
//!
//! Where the client finds its endpoint and how the feed behaves.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. `<config dir>/tally/config.toml`
//! 3. `<project>/.tally/config.toml`
//! 4. `TALLY_*` environment variables, `__` separating section and key
//!    (`TALLY_FEED__PAGE_SIZE` sets `feed.page_size`)
//!
//! Callers may merge further providers on top of [`TallyConfig::figment`]
//! and finish with [`TallyConfig::from_figment`], which validates.
//!
//! ```no_run
//! use tally_config::TallyConfig;
//!
//! let config = TallyConfig::load_with_dotenv()?;
//! println!("endpoint: {}", config.endpoint.url);
//! # Ok::<(), tally_config::ConfigError>(())
//! ```

mod endpoint;
mod error;
mod feed;
mod upload;

pub use endpoint::EndpointConfig;
pub use error::ConfigError;
pub use feed::{FeedConfig, MAX_PAGE_SIZE};
pub use upload::UploadConfig;

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "TALLY_";
const PROJECT_FILE: &str = ".tally/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

impl TallyConfig {
    /// Load from the current directory's sources and validate.
    ///
    /// `.env` files are not read; see [`Self::load_with_dotenv`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::Source`] for unreadable or mistyped values,
    /// [`ConfigError::InvalidValue`] for out-of-range ones.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Like [`Self::load`], after exporting a `.env` file into the environment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "exported .env");
        }
        Self::load()
    }

    /// Extract and validate.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Provider chain rooted at the current directory.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_in(Path::new("."))
    }

    /// Provider chain with the project file looked up under `project`.
    #[must_use]
    pub fn figment_in(project: &Path) -> Figment {
        let layers = [user_config_path(), Some(project.join(PROJECT_FILE))];
        layers
            .into_iter()
            .flatten()
            .filter(|path| path.is_file())
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, path| figment.merge(Toml::file(path)),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint.validate()?;
        self.feed.validate()
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tally").join("config.toml"))
}
