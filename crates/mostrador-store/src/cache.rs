// =============================================================================
// Cache Primitives
// =============================================================================
//
// Shared building blocks for the resource stores:
//
//   CacheEntry  - a cached value stamped with when and for which request
//                 parameters it was fetched
//   SeqGuard    - monotonic fetch counter that lets a store discard
//                 responses that arrive after a newer request already landed
//
// Staleness is decided at read time against a caller-supplied clock, so
// nothing here ever needs a timer.
//
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// A cached value together with its fetch metadata.
///
/// The signature records which request parameters produced the value. A
/// lookup only counts as a hit when the signature matches and the entry is
/// younger than the store's TTL; either miss forces a refetch.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    value: T,
    fetched_at: DateTime<Utc>,
    signature: String,
}

impl<T> CacheEntry<T> {
    /// Wrap a freshly fetched value, stamped with the current time.
    pub fn new(value: T, signature: impl Into<String>) -> Self {
        CacheEntry {
            value,
            fetched_at: Utc::now(),
            signature: signature.into(),
        }
    }

    /// The cached value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Mutable access to the cached value, for reconciling mutations into
    /// the cache in place. Does not touch the fetch timestamp.
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// When the value was fetched.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// The request signature the value was fetched for.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Whether the entry has outlived `ttl` as of `now`.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        age.num_milliseconds() >= ttl.as_millis() as i64
    }

    /// Whether the entry can serve a request with `signature` as of `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration, signature: &str) -> bool {
        self.signature == signature && !self.is_stale(now, ttl)
    }
}

/// Serialize request parameters into a cache signature.
///
/// Any serializable shape works; the stores feed in the same pair lists
/// they send as query strings so the signature tracks the request exactly.
pub fn signature_of<T: Serialize>(params: &T) -> String {
    serde_json::to_string(params).unwrap_or_default()
}

/// Monotonic fetch counter for one cached collection.
///
/// Every fetch takes a ticket from `begin` before releasing the state lock.
/// When the response arrives, `try_apply` only admits it if no response
/// with a higher ticket has been applied in the meantime. A slow response
/// overtaken by a newer one is dropped on the floor instead of clobbering
/// the newer data.
#[derive(Debug, Clone, Default)]
pub struct SeqGuard {
    next: u64,
    applied: u64,
}

impl SeqGuard {
    /// Take a ticket for a fetch that is about to start.
    pub fn begin(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    /// Try to admit the response for ticket `seq`.
    ///
    /// Returns `true` if the response is the newest seen so far and should
    /// be applied, `false` if it has been superseded.
    pub fn try_apply(&mut self, seq: u64) -> bool {
        if seq > self.applied {
            self.applied = seq;
            true
        } else {
            false
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_entry_is_fresh_within_ttl() {
        let entry = CacheEntry::new(vec![1, 2, 3], "sig-a");
        let now = entry.fetched_at() + ChronoDuration::seconds(10);
        assert!(entry.is_fresh(now, Duration::from_secs(30), "sig-a"));
    }

    #[test]
    fn test_entry_goes_stale_at_ttl() {
        let entry = CacheEntry::new(42, "sig");
        let at_ttl = entry.fetched_at() + ChronoDuration::seconds(30);
        let before_ttl = entry.fetched_at() + ChronoDuration::seconds(29);
        assert!(entry.is_stale(at_ttl, Duration::from_secs(30)));
        assert!(!entry.is_stale(before_ttl, Duration::from_secs(30)));
    }

    #[test]
    fn test_signature_mismatch_is_never_fresh() {
        let entry = CacheEntry::new(42, "search=milk");
        let now = entry.fetched_at();
        assert!(!entry.is_fresh(now, Duration::from_secs(30), "search=bread"));
    }

    #[test]
    fn test_signature_of_pair_list() {
        let pairs = vec![("search", "milk".to_string()), ("page", "2".to_string())];
        let sig = signature_of(&pairs);
        assert_eq!(sig, r#"[["search","milk"],["page","2"]]"#);
    }

    #[test]
    fn test_seq_guard_admits_in_order() {
        let mut guard = SeqGuard::default();
        let first = guard.begin();
        let second = guard.begin();
        assert!(guard.try_apply(first));
        assert!(guard.try_apply(second));
    }

    #[test]
    fn test_seq_guard_discards_overtaken_response() {
        let mut guard = SeqGuard::default();
        let slow = guard.begin();
        let fast = guard.begin();
        // The later request responds first.
        assert!(guard.try_apply(fast));
        assert!(!guard.try_apply(slow));
    }

    #[test]
    fn test_seq_guard_rejects_duplicate_apply() {
        let mut guard = SeqGuard::default();
        let seq = guard.begin();
        assert!(guard.try_apply(seq));
        assert!(!guard.try_apply(seq));
    }
}
