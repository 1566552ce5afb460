//! chainboard: a caching proxy backend for analytics dashboard pages.
//!
//! Every data endpoint is a thin route handler over one shared abstraction:
//! a TTL-memoized fetch against an upstream HTTP API (see [`cache`]).

pub mod application;
pub mod cache;
pub mod config;
pub mod infra;
