//! Cache key derivation.

use std::fmt;

/// Identifies one logical upstream query in the result store.
///
/// Derived deterministically from an endpoint name and a query identifier.
/// Endpoint names are fixed lowercase identifiers without underscores, so
/// distinct `(endpoint, id)` pairs never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(endpoint: &str, query_id: &str) -> Self {
        Self(format!("{endpoint}_{query_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let a = CacheKey::derive("depositors", "5253927");
        let b = CacheKey::derive("depositors", "5253927");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "depositors_5253927");
    }

    #[test]
    fn distinct_queries_produce_distinct_keys() {
        let a = CacheKey::derive("depositors", "5253927");
        let b = CacheKey::derive("depositors", "5253928");
        let c = CacheKey::derive("deposits", "5253927");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }
}
