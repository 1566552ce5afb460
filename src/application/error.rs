use std::error::Error as StdError;

use axum::http::StatusCode;
use thiserror::Error;

use crate::infra::{error::InfraError, upstream::UpstreamError};

/// Structured diagnostic attached to error responses so the shared logging
/// middleware can emit the full source chain without leaking it to clients.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut axum::response::Response) {
        response.extensions_mut().insert(self);
    }
}

/// Failure of one data-endpoint request. Configuration problems are caught
/// before any fetch attempt; upstream failures pass through untouched.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no query id supplied and no default configured for `{endpoint}`")]
    MissingQueryId { endpoint: &'static str },
    #[error("analytics API key is not configured")]
    CredentialMissing,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Top-level bootstrap error for the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
