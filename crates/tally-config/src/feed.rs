//! Paginated feed behavior.

use serde::{Deserialize, Serialize};
use tally_core::enums::InitialStrategy;

use crate::ConfigError;

/// Largest page the server will return; larger requests are clamped server-side.
pub const MAX_PAGE_SIZE: u32 = 200;

const fn default_page_size() -> u32 {
    50
}

const fn default_debounce_ms() -> u64 {
    350
}

const fn default_prefetch_margin() -> f64 {
    800.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Rows requested per fresh or incremental fetch.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Quiet period after the last filter edit before a fresh fetch.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Distance beyond the viewport, in both directions, at which the
    /// sentinel counts as visible.
    #[serde(default = "default_prefetch_margin")]
    pub prefetch_margin: f64,

    #[serde(default)]
    pub initial_strategy: InitialStrategy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            prefetch_margin: default_prefetch_margin(),
            initial_strategy: InitialStrategy::default(),
        }
    }
}

impl FeedConfig {
    pub const fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "feed.page_size".into(),
                reason: format!("must be between 1 and {MAX_PAGE_SIZE}, got {}", self.page_size),
            });
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.debounce_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if !self.prefetch_margin.is_finite() || self.prefetch_margin < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.prefetch_margin".into(),
                reason: format!("must be a non-negative number, got {}", self.prefetch_margin),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = FeedConfig::default();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.debounce(), std::time::Duration::from_millis(350));
        assert!((config.prefetch_margin - 800.0).abs() < f64::EPSILON);
        assert_eq!(config.initial_strategy, InitialStrategy::ProbeThenDecide);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn page_size_is_bounded() {
        for page_size in [0, MAX_PAGE_SIZE + 1] {
            let config = FeedConfig {
                page_size,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "page_size {page_size} accepted");
        }
    }

    #[test]
    fn negative_margin_is_rejected() {
        let config = FeedConfig {
            prefetch_margin: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
