//! Application services: thin glue between route handlers and the cache.

pub mod error;
pub mod market;
pub mod queries;
