use serial_test::serial;

use super::*;

fn cli(overrides: ServeOverrides) -> CliArgs {
    CliArgs {
        config_file: None,
        overrides,
    }
}

#[test]
#[serial]
fn defaults_resolve() {
    let settings = load(&cli(ServeOverrides::default())).expect("defaults load");

    assert_eq!(settings.server.addr.port(), 3000);
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert_eq!(settings.logging.format, LogFormat::Compact);
    assert_eq!(
        settings.upstream.analytics_base_url.as_str(),
        "https://api.dune.com/"
    );
    assert!(settings.upstream.api_key.is_none());
    assert_eq!(
        settings.upstream.request_timeout,
        std::time::Duration::from_secs(30)
    );
    assert!(settings.queries.depositors.is_none());
    assert_eq!(settings.market.default_symbol, "ETHUSDT");
    assert_eq!(settings.cache.default_ttl, time::Duration::hours(6));
    assert_eq!(settings.cache.market_ttl, time::Duration::minutes(15));
}

#[test]
#[serial]
fn cli_overrides_take_precedence() {
    let settings = load(&cli(ServeOverrides {
        server_host: Some("0.0.0.0".to_string()),
        server_port: Some(8080),
        log_level: Some("debug".to_string()),
        log_json: Some(true),
        cache_ttl_seconds: Some(60),
        ..Default::default()
    }))
    .expect("overrides load");

    assert_eq!(settings.server.addr.to_string(), "0.0.0.0:8080");
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.logging.format, LogFormat::Json);
    assert_eq!(settings.cache.default_ttl, time::Duration::seconds(60));
}

#[test]
#[serial]
fn environment_layer_applies() {
    // set_var is unsafe in edition 2024; the #[serial] guard keeps these
    // tests from racing each other over process environment.
    unsafe {
        std::env::set_var("CHAINBOARD_QUERIES__DEPOSITORS", "5253927");
        std::env::set_var("CHAINBOARD_UPSTREAM__API_KEY", "test-key");
    }

    let settings = load(&cli(ServeOverrides::default())).expect("env load");

    unsafe {
        std::env::remove_var("CHAINBOARD_QUERIES__DEPOSITORS");
        std::env::remove_var("CHAINBOARD_UPSTREAM__API_KEY");
    }

    assert_eq!(settings.queries.depositors.as_deref(), Some("5253927"));
    assert_eq!(settings.upstream.api_key.as_deref(), Some("test-key"));
}

#[test]
#[serial]
fn zero_port_is_rejected() {
    let err = load(&cli(ServeOverrides {
        server_port: Some(0),
        ..Default::default()
    }))
    .expect_err("port 0 must fail");

    assert!(matches!(err, LoadError::Invalid { key, .. } if key == "server.port"));
}

#[test]
#[serial]
fn zero_ttl_is_rejected() {
    let err = load(&cli(ServeOverrides {
        cache_ttl_seconds: Some(0),
        ..Default::default()
    }))
    .expect_err("zero TTL must fail");

    assert!(matches!(err, LoadError::Invalid { key, .. } if key == "cache.default_ttl_seconds"));
}

#[test]
#[serial]
fn unknown_log_level_is_rejected() {
    let err = load(&cli(ServeOverrides {
        log_level: Some("verbose".to_string()),
        ..Default::default()
    }))
    .expect_err("bad level must fail");

    assert!(matches!(err, LoadError::Invalid { key, .. } if key == "logging.level"));
}

#[test]
#[serial]
fn out_of_range_timeout_is_rejected() {
    let err = load(&cli(ServeOverrides {
        upstream_timeout_seconds: Some(10_000),
        ..Default::default()
    }))
    .expect_err("huge timeout must fail");

    assert!(
        matches!(err, LoadError::Invalid { key, .. } if key == "upstream.request_timeout_seconds")
    );
}

#[test]
#[serial]
fn blank_api_key_counts_as_missing() {
    unsafe {
        std::env::set_var("CHAINBOARD_UPSTREAM__API_KEY", "   ");
    }

    let settings = load(&cli(ServeOverrides::default())).expect("load");

    unsafe {
        std::env::remove_var("CHAINBOARD_UPSTREAM__API_KEY");
    }

    assert!(settings.upstream.api_key.is_none());
}
