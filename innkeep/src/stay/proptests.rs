//! Property-based tests for `StayRange`.

use super::StayRange;
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

// Strategy for stays inside a two-month window so overlaps are common
fn stay_strategy() -> impl Strategy<Value = StayRange> {
    (0u64..60, 1u64..15).prop_map(|(offset, nights)| {
        let start = base_date() + Days::new(offset);
        let end = start + Days::new(nights);
        StayRange::new(start, end).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 5000,
        .. ProptestConfig::default()
    })]

    // Overlap is symmetric
    #[test]
    fn overlap_symmetric(a in stay_strategy(), b in stay_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    // Every stay overlaps itself
    #[test]
    fn overlap_reflexive(a in stay_strategy()) {
        prop_assert!(a.overlaps(&a));
    }

    // Overlap holds exactly when some night is shared
    #[test]
    fn overlap_iff_shared_night(a in stay_strategy(), b in stay_strategy()) {
        let shared = a.start().iter_days()
            .take_while(|d| *d < a.end())
            .any(|d| b.contains(d));
        prop_assert_eq!(a.overlaps(&b), shared);
    }

    // A stay starting on another's departure day never overlaps it
    #[test]
    fn back_to_back_stays_never_overlap(a in stay_strategy(), nights in 1u64..10) {
        let next = StayRange::new(a.end(), a.end() + Days::new(nights)).unwrap();
        prop_assert!(!a.overlaps(&next));
    }

    // Nights count matches the day difference
    #[test]
    fn nights_positive(a in stay_strategy()) {
        prop_assert!(a.nights() >= 1);
        prop_assert_eq!(a.start() + Days::new(a.nights().unsigned_abs()), a.end());
    }
}
