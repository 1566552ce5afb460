//! Live smoke tests against the real upstream services.
//!
//! These hit the network and are ignored by default; run with
//! `cargo test --test live_upstream -- --ignored`. The analytics test also
//! needs `CHAINBOARD_LIVE_API_KEY` and `CHAINBOARD_LIVE_QUERY_ID` set.

use std::time::Duration;

use url::Url;

use chainboard::infra::upstream::{AnalyticsApi, AnalyticsClient, MarketApi, MarketClient};

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("http client")
}

#[tokio::test]
#[ignore = "requires network access"]
async fn market_ticker_round_trip() {
    let client = MarketClient::new(
        http_client(),
        Url::parse("https://api.binance.com").expect("base url"),
    );

    let payload = client.ticker("ETHUSDT").await.expect("live ticker");

    assert_eq!(payload.rows.len(), 1);
    assert_eq!(payload.rows[0]["symbol"], "ETHUSDT");
}

#[tokio::test]
#[ignore = "requires network access and a real analytics API key"]
async fn analytics_query_round_trip() {
    let api_key = std::env::var("CHAINBOARD_LIVE_API_KEY").expect("CHAINBOARD_LIVE_API_KEY");
    let query_id = std::env::var("CHAINBOARD_LIVE_QUERY_ID").expect("CHAINBOARD_LIVE_QUERY_ID");

    let client = AnalyticsClient::new(
        http_client(),
        Url::parse("https://api.dune.com").expect("base url"),
        api_key,
    );

    let payload = client.query_rows(&query_id).await.expect("live query");

    assert!(!payload.rows.is_empty());
}
