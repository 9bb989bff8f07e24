//! Property-based tests for TTL retention classification.

use proptest::prelude::*;

use valkey_merge::merge::{Retention, TTL_KEEP_FLOOR_SECS, TTL_NO_EXPIRY};

/// Strategy for TTLs strictly above the keep floor.
fn keepable_ttls() -> impl Strategy<Value = i64> {
    (TTL_KEEP_FLOOR_SECS + 1)..=i64::MAX
}

/// Strategy for TTLs at or below the keep floor, excluding `-1`.
fn short_or_sentinel_ttls() -> impl Strategy<Value = i64> {
    (i64::MIN..=TTL_KEEP_FLOOR_SECS).prop_filter("no-expiry sentinel", |t| *t != TTL_NO_EXPIRY)
}

proptest! {
    #[test]
    fn test_long_ttls_are_kept_verbatim(ttl in keepable_ttls()) {
        prop_assert_eq!(Retention::classify(ttl), Retention::Keep(ttl));
    }

    #[test]
    fn test_short_ttls_expire(ttl in short_or_sentinel_ttls()) {
        prop_assert_eq!(Retention::classify(ttl), Retention::Expire);
    }

    #[test]
    fn test_exactly_one_regime(ttl in any::<i64>()) {
        let keep = matches!(Retention::classify(ttl), Retention::Keep(_));
        let persist = Retention::classify(ttl) == Retention::Persist;
        let expire = Retention::classify(ttl) == Retention::Expire;
        prop_assert_eq!(
            u8::from(keep) + u8::from(persist) + u8::from(expire),
            1
        );
    }

    #[test]
    fn test_persist_only_for_no_expiry_sentinel(ttl in any::<i64>()) {
        let persist = Retention::classify(ttl) == Retention::Persist;
        prop_assert_eq!(persist, ttl == TTL_NO_EXPIRY);
    }
}
