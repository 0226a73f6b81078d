//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use tally_config::TallyConfig;
use tally_core::enums::InitialStrategy;

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[endpoint]
url = "https://sales.example.com/graphql"
timeout_secs = 5
send_credentials = false

[feed]
page_size = 100
debounce_ms = 200
prefetch_margin = 400.0
initial_strategy = "fetch_directly"

[upload]
body_snippet_chars = 120
"#,
        )?;

        let config: TallyConfig = Figment::from(Serialized::defaults(TallyConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.endpoint.url, "https://sales.example.com/graphql");
        assert_eq!(config.endpoint.timeout_secs, 5);
        assert!(!config.endpoint.send_credentials);
        assert_eq!(config.feed.page_size, 100);
        assert_eq!(config.feed.debounce_ms, 200);
        assert_eq!(config.feed.initial_strategy, InitialStrategy::FetchDirectly);
        assert_eq!(config.upload.body_snippet_chars, 120);
        assert!(config.validate().is_ok());
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[feed]\npage_size = 25\n")?;

        let config: TallyConfig = Figment::from(Serialized::defaults(TallyConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.feed.page_size, 25);
        assert_eq!(config.feed.debounce_ms, 350);
        assert_eq!(config.endpoint.url, "http://localhost:5010/graphql");
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[endpoint]\nurl = \"http://toml:5010/graphql\"\n")?;
        jail.set_env("TALLY_ENDPOINT__URL", "http://env:5010/graphql");

        let config: TallyConfig = Figment::from(Serialized::defaults(TallyConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("TALLY_").split("__"))
            .extract()?;

        assert_eq!(config.endpoint.url, "http://env:5010/graphql");
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".tally")?;
        jail.create_file(".tally/config.toml", "[feed]\ndebounce_ms = 500\n")?;

        let config = TallyConfig::load().expect("config loads");
        assert_eq!(config.feed.debounce_ms, 500);
        Ok(())
    });
}

#[test]
fn project_file_is_found_under_an_explicit_root() {
    Jail::expect_with(|jail| {
        jail.create_dir("shop/.tally")?;
        jail.create_file("shop/.tally/config.toml", "[feed]\nprefetch_margin = 120.0\n")?;

        let figment = TallyConfig::figment_in(&jail.directory().join("shop"));
        let config = TallyConfig::from_figment(&figment).expect("config loads");
        assert!((config.feed.prefetch_margin - 120.0).abs() < f64::EPSILON);
        Ok(())
    });
}
