//! Quota and credit policy - pure decision functions.
//!
//! `decide` is the single source of truth for the consumption ordering:
//! free quota is always exhausted before credits are drawn. Store
//! adapters must apply the identical ordering atomically; the in-memory
//! adapter calls `decide` under its lock, and the postgres adapter's
//! conditional UPDATE mirrors it statement-for-statement.

use super::record::UsageRecord;

/// Outcome of applying the quota policy to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaDecision {
    /// Whether the consumption is allowed.
    pub allowed: bool,
    /// The record after the consumption; unchanged when denied.
    pub next: UsageRecord,
}

/// Decides a single-unit consumption against `record`.
///
/// Ordering contract:
/// 1. `free_used < free_quota` -> allow, increment `free_used`.
/// 2. else `credits > 0` -> allow, decrement `credits`.
/// 3. else deny, record unchanged.
pub fn decide(record: UsageRecord, free_quota: u32) -> QuotaDecision {
    if record.free_used < free_quota {
        QuotaDecision {
            allowed: true,
            next: UsageRecord::new(record.free_used + 1, record.credits),
        }
    } else if record.credits > 0 {
        QuotaDecision {
            allowed: true,
            next: UsageRecord::new(record.free_used, record.credits - 1),
        }
    } else {
        QuotaDecision {
            allowed: false,
            next: record,
        }
    }
}

/// Credits granted for a charged amount.
///
/// Amount-proportional with a floor of one credit: any completed payment
/// grants at least one credit even below `cents_per_credit`.
pub fn credits_for_amount(amount_cents: i64, cents_per_credit: u32) -> u32 {
    let per = i64::from(cents_per_credit.max(1));
    let credits = amount_cents.max(0) / per;
    u32::try_from(credits).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const QUOTA: u32 = 3;

    #[test]
    fn fresh_record_consumes_free_use() {
        let decision = decide(UsageRecord::zero(), QUOTA);
        assert!(decision.allowed);
        assert_eq!(decision.next, UsageRecord::new(1, 0));
    }

    #[test]
    fn free_quota_exhausts_before_credits() {
        // Credits present, but free quota remains: credits must not move.
        let decision = decide(UsageRecord::new(2, 5), QUOTA);
        assert!(decision.allowed);
        assert_eq!(decision.next, UsageRecord::new(3, 5));
    }

    #[test]
    fn credits_drawn_after_quota_exhausted() {
        let decision = decide(UsageRecord::new(3, 2), QUOTA);
        assert!(decision.allowed);
        assert_eq!(decision.next, UsageRecord::new(3, 1));
    }

    #[test]
    fn denied_when_nothing_remains() {
        let decision = decide(UsageRecord::new(3, 0), QUOTA);
        assert!(!decision.allowed);
        assert_eq!(decision.next, UsageRecord::new(3, 0));
    }

    #[test]
    fn spec_walkthrough_quota_three() {
        // Three free uses, fourth denied, then credits carry it.
        let mut record = UsageRecord::zero();
        for expected_free in 1..=3 {
            let decision = decide(record, QUOTA);
            assert!(decision.allowed);
            record = decision.next;
            assert_eq!(record.free_used, expected_free);
        }
        let denied = decide(record, QUOTA);
        assert!(!denied.allowed);

        record = UsageRecord::new(3, 2);
        let decision = decide(record, QUOTA);
        assert!(decision.allowed);
        assert_eq!(decision.next, UsageRecord::new(3, 1));
    }

    #[test]
    fn credits_for_amount_is_proportional() {
        assert_eq!(credits_for_amount(500, 50), 10);
        assert_eq!(credits_for_amount(1000, 50), 20);
        assert_eq!(credits_for_amount(550, 50), 11);
    }

    #[test]
    fn credits_for_amount_floors_at_one() {
        assert_eq!(credits_for_amount(0, 50), 1);
        assert_eq!(credits_for_amount(49, 50), 1);
        assert_eq!(credits_for_amount(-100, 50), 1);
    }

    proptest! {
        /// Balances never go negative; unsigned types make this a check
        /// that the policy never wraps.
        #[test]
        fn no_wraparound(free_used in 0u32..100, credits in 0u32..100, quota in 0u32..10) {
            let record = UsageRecord::new(free_used, credits);
            let decision = decide(record, quota);
            prop_assert!(decision.next.free_used >= record.free_used);
            prop_assert!(decision.next.credits <= record.credits);
        }

        /// Credits are never decremented while free quota remains.
        #[test]
        fn free_before_credits(free_used in 0u32..100, credits in 0u32..100, quota in 0u32..10) {
            let record = UsageRecord::new(free_used, credits);
            let decision = decide(record, quota);
            if free_used < quota {
                prop_assert_eq!(decision.next.credits, credits);
                prop_assert_eq!(decision.next.free_used, free_used + 1);
            }
        }

        /// A denied decision leaves the record untouched.
        #[test]
        fn deny_is_a_noop(free_used in 0u32..100, credits in 0u32..100, quota in 0u32..10) {
            let record = UsageRecord::new(free_used, credits);
            let decision = decide(record, quota);
            if !decision.allowed {
                prop_assert_eq!(decision.next, record);
            }
        }

        /// Exactly one unit moves per allowed consumption.
        #[test]
        fn one_unit_per_consume(free_used in 0u32..100, credits in 0u32..100, quota in 0u32..10) {
            let record = UsageRecord::new(free_used, credits);
            let decision = decide(record, quota);
            if decision.allowed {
                let moved = (decision.next.free_used - record.free_used)
                    + (record.credits - decision.next.credits);
                prop_assert_eq!(moved, 1);
            }
        }
    }
}
