use figment::Jail;
use tally_config::{ConfigError, TallyConfig};
use tally_core::enums::InitialStrategy;

#[test]
fn env_vars_fill_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_FEED__PAGE_SIZE", "75");
        jail.set_env("TALLY_FEED__INITIAL_STRATEGY", "fetch_directly");
        jail.set_env("TALLY_UPLOAD__BODY_SNIPPET_CHARS", "64");

        let config = TallyConfig::load().expect("config loads");
        assert_eq!(config.feed.page_size, 75);
        assert_eq!(config.feed.initial_strategy, InitialStrategy::FetchDirectly);
        assert_eq!(config.upload.body_snippet_chars, 64);
        Ok(())
    });
}

#[test]
fn out_of_range_page_size_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_FEED__PAGE_SIZE", "500");

        let err = TallyConfig::load().expect_err("page size above the server clamp");
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref field, .. } if field == "feed.page_size"
        ));
        Ok(())
    });
}

#[test]
fn malformed_value_surfaces_figment_error() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_FEED__DEBOUNCE_MS", "soon");

        let err = TallyConfig::load().expect_err("non-numeric debounce");
        assert!(matches!(err, ConfigError::Source(_)));
        assert!(err.to_string().to_lowercase().contains("feed.debounce_ms"));
        Ok(())
    });
}
