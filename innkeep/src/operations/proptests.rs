//! Property-based tests for availability and the booking commit.
//!
//! Each case builds a small catalog with random restrictions, then checks
//! the search against a brute-force model of the overlap rule.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use crate::database::test_util::{create_test_database, new_reservation};
use crate::database::Database;
use crate::room::{RestrictionKind, RoomId};
use crate::stay::StayRange;
use crate::Error;

const ROOMS: usize = 4;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

// Stays within a 30 day window, 1 to 10 nights
fn stay_strategy() -> impl Strategy<Value = StayRange> {
    (0u64..30, 1u64..=10).prop_map(|(offset, nights)| {
        let start = base_date() + Days::new(offset);
        StayRange::new(start, start + Days::new(nights)).unwrap()
    })
}

fn restrictions_strategy() -> impl Strategy<Value = Vec<(usize, StayRange)>> {
    prop::collection::vec((0..ROOMS, stay_strategy()), 0..12)
}

fn seed(db: &Database, restrictions: &[(usize, StayRange)]) -> Vec<RoomId> {
    let rooms: Vec<RoomId> = (0..ROOMS)
        .map(|i| {
            Database::insert_room(db.connection(), &format!("Room {i}"))
                .unwrap()
                .id
        })
        .collect();
    for (room, stay) in restrictions {
        Database::insert_room_restriction(
            db.connection(),
            rooms[*room],
            stay,
            None,
            RestrictionKind::OwnerBlock,
        )
        .unwrap();
    }
    rooms
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        .. ProptestConfig::default()
    })]

    // A room is in the all-rooms search exactly when the single-room check says free
    #[test]
    fn search_all_agrees_with_search_room(
        restrictions in restrictions_strategy(),
        query in stay_strategy(),
    ) {
        let db = create_test_database();
        let rooms = seed(&db, &restrictions);

        let free: Vec<RoomId> = Database::search_all_rooms(db.connection(), &query)
            .unwrap()
            .into_iter()
            .map(|room| room.id)
            .collect();

        for (i, room) in rooms.iter().enumerate() {
            let single = Database::search_room(db.connection(), &query, *room).unwrap();
            prop_assert_eq!(free.contains(room), single);

            let model = restrictions
                .iter()
                .filter(|(r, _)| *r == i)
                .all(|(_, stay)| !stay.overlaps(&query));
            prop_assert_eq!(single, model);
        }
    }

    // With the re-check on, accepted bookings on one room never overlap
    #[test]
    fn committed_bookings_never_overlap(requests in prop::collection::vec(stay_strategy(), 1..15)) {
        let db = create_test_database();
        let room = Database::insert_room(db.connection(), "Room").unwrap().id;

        let mut accepted: Vec<StayRange> = Vec::new();
        for stay in requests {
            let booking = new_reservation(room, &stay.start_str(), &stay.end_str());
            match Database::commit_booking(db.connection(), &booking, true) {
                Ok(_) => accepted.push(stay),
                Err(Error::RoomUnavailable { .. }) => {
                    prop_assert!(accepted.iter().any(|a| a.overlaps(&stay)));
                }
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
            }
        }

        for (i, a) in accepted.iter().enumerate() {
            for b in &accepted[i + 1..] {
                prop_assert!(!a.overlaps(b));
            }
        }
    }
}
