//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use clap::{Args, Parser, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

#[cfg(test)]
mod tests;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "chainboard";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ANALYTICS_BASE_URL: &str = "https://api.dune.com";
const DEFAULT_MARKET_BASE_URL: &str = "https://api.binance.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
const DEFAULT_CACHE_TTL_SECS: u64 = 6 * 60 * 60;
const DEFAULT_MARKET_TTL_SECS: u64 = 15 * 60;
const DEFAULT_MARKET_SYMBOL: &str = "ETHUSDT";

/// Command-line arguments for the chainboard binary.
#[derive(Debug, Parser)]
#[command(
    name = "chainboard",
    version,
    about = "Caching proxy backend for analytics dashboard pages"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "CHAINBOARD_CONFIG_FILE",
        value_name = "PATH"
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the default cache TTL.
    #[arg(long = "cache-ttl-seconds", value_name = "SECONDS")]
    pub cache_ttl_seconds: Option<u64>,

    /// Override the market data cache TTL.
    #[arg(long = "cache-market-ttl-seconds", value_name = "SECONDS")]
    pub cache_market_ttl_seconds: Option<u64>,

    /// Override the upstream request timeout.
    #[arg(long = "upstream-timeout-seconds", value_name = "SECONDS")]
    pub upstream_timeout_seconds: Option<u64>,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub upstream: UpstreamSettings,
    pub queries: QuerySettings,
    pub market: MarketSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub analytics_base_url: Url,
    /// Analytics API key. Optional so the server can come up (and report
    /// health) without one; data endpoints fail fast while it is missing.
    pub api_key: Option<String>,
    pub request_timeout: std::time::Duration,
    pub market_base_url: Url,
}

/// Default query identifier per analytics endpoint.
#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub depositors: Option<String>,
    pub deposits: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MarketSettings {
    pub default_symbol: String,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub default_ttl: time::Duration,
    pub market_ttl: time::Duration,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Parse CLI arguments and load settings in one step.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("CHAINBOARD").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    upstream: RawUpstreamSettings,
    queries: RawQuerySettings,
    market: RawMarketSettings,
    cache: RawCacheSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawUpstreamSettings {
    analytics_base_url: Option<String>,
    api_key: Option<String>,
    request_timeout_seconds: Option<u64>,
    market_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawQuerySettings {
    depositors: Option<String>,
    deposits: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawMarketSettings {
    default_symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    default_ttl_seconds: Option<u64>,
    market_ttl_seconds: Option<u64>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(seconds) = overrides.cache_ttl_seconds {
            self.cache.default_ttl_seconds = Some(seconds);
        }
        if let Some(seconds) = overrides.cache_market_ttl_seconds {
            self.cache.market_ttl_seconds = Some(seconds);
        }
        if let Some(seconds) = overrides.upstream_timeout_seconds {
            self.upstream.request_timeout_seconds = Some(seconds);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            upstream,
            queries,
            market,
            cache,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            upstream: build_upstream_settings(upstream)?,
            queries: build_query_settings(queries),
            market: build_market_settings(market),
            cache: build_cache_settings(cache)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let ip = host
        .parse()
        .map_err(|_| LoadError::invalid("server.host", format!("`{host}` is not an IP address")))?;

    Ok(ServerSettings {
        addr: SocketAddr::new(ip, port),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(&level).map_err(|_| {
            LoadError::invalid(
                "logging.level",
                format!("`{level}` is not one of trace|debug|info|warn|error"),
            )
        })?,
        None => LevelFilter::INFO,
    };

    let format = match logging.json.unwrap_or(false) {
        true => LogFormat::Json,
        false => LogFormat::Compact,
    };

    Ok(LoggingSettings { level, format })
}

fn build_upstream_settings(upstream: RawUpstreamSettings) -> Result<UpstreamSettings, LoadError> {
    let analytics_base_url = parse_base_url(
        "upstream.analytics_base_url",
        upstream
            .analytics_base_url
            .as_deref()
            .unwrap_or(DEFAULT_ANALYTICS_BASE_URL),
    )?;
    let market_base_url = parse_base_url(
        "upstream.market_base_url",
        upstream
            .market_base_url
            .as_deref()
            .unwrap_or(DEFAULT_MARKET_BASE_URL),
    )?;

    let timeout_secs = upstream
        .request_timeout_seconds
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    if timeout_secs == 0 || timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
        return Err(LoadError::invalid(
            "upstream.request_timeout_seconds",
            format!("timeout must be between 1 and {MAX_REQUEST_TIMEOUT_SECS} seconds"),
        ));
    }

    let api_key = upstream
        .api_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());

    Ok(UpstreamSettings {
        analytics_base_url,
        api_key,
        request_timeout: std::time::Duration::from_secs(timeout_secs),
        market_base_url,
    })
}

fn build_query_settings(queries: RawQuerySettings) -> QuerySettings {
    QuerySettings {
        depositors: queries.depositors.filter(|id| !id.trim().is_empty()),
        deposits: queries.deposits.filter(|id| !id.trim().is_empty()),
    }
}

fn build_market_settings(market: RawMarketSettings) -> MarketSettings {
    let default_symbol = market
        .default_symbol
        .map(|symbol| symbol.trim().to_ascii_uppercase())
        .filter(|symbol| !symbol.is_empty())
        .unwrap_or_else(|| DEFAULT_MARKET_SYMBOL.to_string());
    MarketSettings { default_symbol }
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let default_ttl_secs = cache.default_ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECS);
    if default_ttl_secs == 0 {
        return Err(LoadError::invalid(
            "cache.default_ttl_seconds",
            "TTL must be greater than zero",
        ));
    }

    let market_ttl_secs = cache.market_ttl_seconds.unwrap_or(DEFAULT_MARKET_TTL_SECS);
    if market_ttl_secs == 0 {
        return Err(LoadError::invalid(
            "cache.market_ttl_seconds",
            "TTL must be greater than zero",
        ));
    }

    Ok(CacheSettings {
        default_ttl: time::Duration::seconds(default_ttl_secs as i64),
        market_ttl: time::Duration::seconds(market_ttl_secs as i64),
    })
}

fn parse_base_url(key: &'static str, value: &str) -> Result<Url, LoadError> {
    let url = Url::parse(value).map_err(|err| LoadError::invalid(key, err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(LoadError::invalid(key, "URL cannot be used as a base"));
    }
    Ok(url)
}
