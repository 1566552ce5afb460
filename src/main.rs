use std::{process, sync::Arc};

use chainboard::{
    application::{
        error::AppError,
        market::MarketService,
        queries::{QueryDefaults, QueryService},
    },
    cache::{Clock, FetchMemoizer, ResultStore, SystemClock},
    config,
    infra::{
        error::InfraError,
        http::{self, ApiState},
        telemetry,
        upstream::{AnalyticsApi, AnalyticsClient, MarketApi, MarketClient},
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    if settings.upstream.api_key.is_none() {
        warn!("analytics API key is not configured; data endpoints will return errors");
    }

    let state = build_state(&settings)?;
    serve(&settings, state).await
}

fn build_state(settings: &config::Settings) -> Result<ApiState, AppError> {
    let http = reqwest::Client::builder()
        .timeout(settings.upstream.request_timeout)
        .build()
        .map_err(|err| AppError::unexpected(format!("failed to build HTTP client: {err}")))?;

    let store = Arc::new(ResultStore::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let memoizer = Arc::new(FetchMemoizer::new(store, clock.clone()));

    let upstream_configured = settings.upstream.api_key.is_some();
    let analytics: Arc<dyn AnalyticsApi> = Arc::new(AnalyticsClient::new(
        http.clone(),
        settings.upstream.analytics_base_url.clone(),
        settings.upstream.api_key.clone().unwrap_or_default(),
    ));
    let market_api: Arc<dyn MarketApi> = Arc::new(MarketClient::new(
        http,
        settings.upstream.market_base_url.clone(),
    ));

    let queries = Arc::new(QueryService::new(
        memoizer.clone(),
        analytics,
        QueryDefaults {
            depositors: settings.queries.depositors.clone(),
            deposits: settings.queries.deposits.clone(),
        },
        settings.cache.default_ttl,
        upstream_configured,
    ));
    let market = Arc::new(MarketService::new(
        memoizer,
        market_api,
        settings.market.default_symbol.clone(),
        settings.cache.market_ttl,
    ));

    Ok(ApiState {
        queries,
        market,
        clock,
        upstream_configured,
    })
}

async fn serve(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(addr = %settings.server.addr, "listening");

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
