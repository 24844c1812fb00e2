//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::{BookingConfig, CommitPolicy, Config, DatabaseSettings, SessionConfig};
use super::validator::ConfigValidator;
use proptest::prelude::*;

fn policy_strategy() -> impl Strategy<Value = CommitPolicy> {
    prop_oneof![Just(CommitPolicy::Transactional), Just(CommitPolicy::Sequential)]
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(prop::collection::vec("[A-Z][a-z]{2,12}", 1..5)),
        prop::option::of(1u64..10_000),
        prop::option::of(1u64..10_000),
        prop::option::of(policy_strategy()),
        prop::option::of(any::<bool>()),
        prop::option::of(1u64..1000),
        prop::option::of(any::<bool>()),
    )
        .prop_map(
            |(rooms, query_ms, busy_ms, policy, recheck, hours, autoinit)| Config {
                rooms,
                database: Some(DatabaseSettings {
                    query_timeout_ms: query_ms,
                    busy_timeout_ms: busy_ms,
                }),
                booking: Some(BookingConfig {
                    commit_policy: policy,
                    recheck_availability: recheck,
                }),
                session: Some(SessionConfig {
                    lifetime_hours: hours,
                }),
                mail: None,
                disable_autoinit: autoinit,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Every value set in the higher layer wins; unset values fall through
    #[test]
    fn merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        let expected_policy = high
            .booking.as_ref().and_then(|b| b.commit_policy)
            .or_else(|| low.booking.as_ref().and_then(|b| b.commit_policy))
            .unwrap_or_default();
        prop_assert_eq!(merged.commit_policy(), expected_policy);

        let expected_rooms = high.rooms.clone().or_else(|| low.rooms.clone());
        prop_assert_eq!(merged.rooms, expected_rooms);

        let expected_autoinit = high.disable_autoinit.or(low.disable_autoinit);
        prop_assert_eq!(merged.disable_autoinit, expected_autoinit);
    }

    // Merging a config into itself is a no-op
    #[test]
    fn merge_idempotent(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &config);
        prop_assert_eq!(merged, config);
    }

    // Merging an empty layer changes nothing
    #[test]
    fn merge_empty_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(merged, config);
    }

    // Positive limits and unique room names always validate
    #[test]
    fn positive_limits_validate(config in config_strategy()) {
        let mut config = config;
        if let Some(rooms) = config.rooms.as_mut() {
            rooms.sort();
            rooms.dedup();
        }
        prop_assert!(ConfigValidator::validate(&config).is_ok());
    }
}
