//! TTL-based memoization cache for upstream fetches.
//!
//! Every data endpoint funnels through the same three pieces:
//!
//! - [`Clock`]: injectable time source.
//! - [`ResultStore`]: key → (payload, stored-at) map, no freshness policy.
//! - [`FetchMemoizer`]: get-or-fetch with per-call TTL; the only place
//!   freshness is decided.

mod clock;
mod keys;
mod memoizer;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use keys::CacheKey;
pub use memoizer::FetchMemoizer;
pub use store::{CacheEntry, QueryPayload, ResultStore};
