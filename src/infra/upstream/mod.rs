//! Outbound HTTP adapters for the data endpoints.
//!
//! Each adapter is a trait seam so route-handler tests can stub the remote
//! service. Both clients share one `reqwest::Client` whose request timeout
//! bounds every producer invocation.

mod analytics;
mod error;
mod market;

pub use analytics::{AnalyticsApi, AnalyticsClient};
pub use error::UpstreamError;
pub use market::{MarketApi, MarketClient};

const MAX_ERROR_BODY_CHARS: usize = 256;

/// Keep upstream error bodies short enough to log and return verbatim.
fn truncate_body(body: String) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "<empty body>".to_string();
    }
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((index, _)) => format!("{}…", &body[..index]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("query failed".to_string()), "query failed");
    }

    #[test]
    fn truncate_body_replaces_empty_bodies() {
        assert_eq!(truncate_body("   ".to_string()), "<empty body>");
    }

    #[test]
    fn truncate_body_cuts_long_bodies() {
        let long = "x".repeat(1000);
        let truncated = truncate_body(long);
        assert!(truncated.chars().count() <= MAX_ERROR_BODY_CHARS + 1);
        assert!(truncated.ends_with('…'));
    }
}
