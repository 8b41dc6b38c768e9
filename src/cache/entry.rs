//! Cache Entry Module
//!
//! Defines a single stored snapshot and its freshness check.

// == Cache Entry ==
/// One stored snapshot result.
///
/// The element identifier is the map key and is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Encoded snapshot payload
    pub value: String,
    /// Insertion time in clock milliseconds
    pub stored_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with `stored_at`.
    pub fn new(value: String, stored_at: u64) -> Self {
        Self { value, stored_at }
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was stored.
    ///
    /// Saturates at 0 if `now` is earlier than `stored_at`.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.stored_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl_ms`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is expired.
    /// Fresh means `age < ttl`, stale means `age >= ttl`.
    pub fn is_expired(&self, now: u64, ttl_ms: u64) -> bool {
        self.age_ms(now) >= ttl_ms
    }

    // == Time To Live ==
    /// Remaining freshness in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self, now: u64, ttl_ms: u64) -> u64 {
        ttl_ms.saturating_sub(self.age_ms(now))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_fresh_before_ttl() {
        let entry = CacheEntry::new("data:image/png;base64,AAAA".to_string(), 1_000);

        assert!(!entry.is_expired(1_000, 60_000));
        assert!(!entry.is_expired(60_999, 60_000));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("snap".to_string(), 1_000);

        // age == ttl is already stale
        assert!(entry.is_expired(61_000, 60_000));
        assert!(entry.is_expired(70_000, 60_000));
    }

    #[test]
    fn test_age_saturates_when_clock_behind() {
        let entry = CacheEntry::new("snap".to_string(), 5_000);

        assert_eq!(entry.age_ms(4_000), 0);
        assert!(!entry.is_expired(4_000, 1));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("snap".to_string(), 0);

        assert_eq!(entry.ttl_remaining_ms(10_000, 60_000), 50_000);
        assert_eq!(entry.ttl_remaining_ms(60_000, 60_000), 0);
        assert_eq!(entry.ttl_remaining_ms(90_000, 60_000), 0);
    }
}
