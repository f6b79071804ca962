//! Client-side request cache.
//!
//! Every piece of remote data the UI shows (catalog pages, similarity
//! results, favorites, dashboard telemetry) flows through one
//! [`RequestCache`]: a memoized async store keyed by endpoint + parameters.
//! The cache guarantees:
//!
//! - at most one in-flight request per key (concurrent callers join the
//!   existing flight instead of duplicating it)
//! - per-resource freshness windows ([`CachePolicy`])
//! - stale-while-error: a failed refresh keeps serving the previous value
//!   rather than flashing consumers to empty
//! - explicit purge on logout so a later login can never observe another
//!   account's cached favorites or profile
//!
//! The cache is process-wide but single-threaded: on WASM all access
//! happens on the browser event loop, so `Rc<RefCell<..>>` is the whole
//! synchronization story. The one rule is that no borrow is held across an
//! await; completions re-check entry state before writing.

mod store;

pub use store::RequestCache;

use std::time::Duration;

/// Freshness window and retry budget for one cached resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Age past which a cached value is eligible for refetch.
    pub max_age: Duration,
    /// Total fetch attempts before the error is surfaced.
    pub attempts: u32,
}

impl CachePolicy {
    /// Catalog pages change rarely; 10 minutes.
    pub const CATALOG: Self = Self::new(Duration::from_secs(600), 2);
    /// Similarity results are deterministic per book; 15 minutes.
    pub const SIMILAR: Self = Self::new(Duration::from_secs(900), 2);
    /// Favorites mutate through the UI itself; 5 minutes.
    pub const FAVORITES: Self = Self::new(Duration::from_secs(300), 2);
    /// Dashboard status/alerts poll every 30 seconds; no retry, the next
    /// poll is the retry.
    pub const STATUS: Self = Self::new(Duration::from_secs(30), 1);
    /// Log tail polls every 15 seconds.
    pub const LOGS: Self = Self::new(Duration::from_secs(15), 1);

    pub const fn new(max_age: Duration, attempts: u32) -> Self {
        Self { max_age, attempts }
    }
}

/// Whether an entry belongs to the signed-in account.
///
/// User-scoped entries are purged wholesale on logout and after account
/// switches; public entries (catalog, similarity) survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Public,
    User,
}

/// Composite cache key: endpoint tag + rendered parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    endpoint: &'static str,
    params: String,
    scope: Scope,
}

impl CacheKey {
    fn new(endpoint: &'static str, params: String, scope: Scope) -> Self {
        Self {
            endpoint,
            params,
            scope,
        }
    }

    pub fn books(page: u32, page_size: u32) -> Self {
        Self::new("books", format!("page={page}&page_size={page_size}"), Scope::Public)
    }

    pub fn similar(book_id: u32, limit: usize) -> Self {
        Self::new(
            "similar",
            format!("book={book_id}&limit={limit}"),
            Scope::Public,
        )
    }

    pub fn favorites() -> Self {
        Self::new("favorites", String::new(), Scope::User)
    }

    pub fn favorite_check(book_id: u32) -> Self {
        Self::new("favorites/check", format!("book={book_id}"), Scope::User)
    }

    pub fn favorites_count() -> Self {
        Self::new("favorites/count", String::new(), Scope::User)
    }

    pub fn system_status() -> Self {
        Self::new("admin/status", String::new(), Scope::User)
    }

    pub fn monitor_status() -> Self {
        Self::new("admin/monitor", String::new(), Scope::User)
    }

    pub fn alerts() -> Self {
        Self::new("admin/alerts", String::new(), Scope::User)
    }

    pub fn logs(lines: u32, level: Option<&str>) -> Self {
        Self::new(
            "admin/logs",
            match level {
                Some(level) => format!("lines={lines}&level={level}"),
                None => format!("lines={lines}"),
            },
            Scope::User,
        )
    }

    /// Entries tied to the signed-in account.
    pub fn is_user_scoped(&self) -> bool {
        self.scope == Scope::User
    }

    /// Entries in the favorites family, invalidated after a toggle.
    pub fn is_favorites(&self) -> bool {
        self.endpoint.starts_with("favorites")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_distinguish_params() {
        assert_ne!(CacheKey::books(1, 20), CacheKey::books(2, 20));
        assert_ne!(CacheKey::similar(1, 12), CacheKey::similar(2, 12));
        assert_eq!(CacheKey::favorites(), CacheKey::favorites());
        assert_ne!(CacheKey::logs(50, None), CacheKey::logs(50, Some("error")));
    }

    #[test]
    fn test_scope_classification() {
        assert!(!CacheKey::books(1, 20).is_user_scoped());
        assert!(CacheKey::favorites().is_user_scoped());
        assert!(CacheKey::favorite_check(3).is_favorites());
        assert!(CacheKey::favorites_count().is_favorites());
        assert!(!CacheKey::alerts().is_favorites());
    }
}
