//! The session-carried reservation draft.
//!
//! A draft moves through
//! `Empty → RangeSelected → RoomSelected → DetailsPending → Committed`.
//! Every transition returns a new draft and leaves the receiver untouched, so
//! a rejected step never corrupts what is stored in the session.
//!
//! Drafts are stored as JSON. Decoding fails closed: bytes that do not decode
//! into a well-formed draft read as [`Draft::Empty`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reservation::{GuestDetails, NewReservation};
use crate::room::RoomId;
use crate::stay::StayRange;

/// The room a draft is booking, with its display name cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomChoice {
    /// Room identifier.
    pub id: RoomId,
    /// Display name resolved from the room catalog.
    pub name: String,
}

impl RoomChoice {
    /// Creates a room choice.
    #[must_use]
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An in-progress reservation.
///
/// # Examples
///
/// ```
/// use innkeep::draft::{Draft, RoomChoice};
/// use innkeep::{RoomId, StayRange};
///
/// let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
/// let draft = Draft::Empty
///     .select_range(stay)
///     .choose_room(RoomChoice::new(RoomId::new(7), "Major's Suite"))
///     .unwrap();
///
/// assert_eq!(draft.state_name(), "room selected");
/// assert_eq!(draft.room().unwrap().id, RoomId::new(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Draft {
    /// Nothing selected yet.
    #[default]
    Empty,
    /// A search found rooms for this stay.
    RangeSelected {
        /// Requested nights.
        stay: StayRange,
    },
    /// A room was picked for the stay.
    RoomSelected {
        /// Requested nights.
        stay: StayRange,
        /// Picked room.
        room: RoomChoice,
    },
    /// Guest details were submitted and validated.
    DetailsPending {
        /// Requested nights.
        stay: StayRange,
        /// Picked room.
        room: RoomChoice,
        /// Validated contact details.
        guest: GuestDetails,
    },
    /// Both writes succeeded.
    Committed {
        /// Booked nights.
        stay: StayRange,
        /// Booked room.
        room: RoomChoice,
        /// Guest contact details.
        guest: GuestDetails,
        /// Identifier of the stored reservation.
        reservation_id: i64,
    },
}

impl Draft {
    /// Returns a human-readable name for the current state.
    #[must_use]
    pub const fn state_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::RangeSelected { .. } => "range selected",
            Self::RoomSelected { .. } => "room selected",
            Self::DetailsPending { .. } => "details pending",
            Self::Committed { .. } => "committed",
        }
    }

    /// Returns the stay, if one has been selected.
    #[must_use]
    pub const fn stay(&self) -> Option<StayRange> {
        match self {
            Self::Empty => None,
            Self::RangeSelected { stay }
            | Self::RoomSelected { stay, .. }
            | Self::DetailsPending { stay, .. }
            | Self::Committed { stay, .. } => Some(*stay),
        }
    }

    /// Returns the chosen room, if any.
    #[must_use]
    pub const fn room(&self) -> Option<&RoomChoice> {
        match self {
            Self::Empty | Self::RangeSelected { .. } => None,
            Self::RoomSelected { room, .. }
            | Self::DetailsPending { room, .. }
            | Self::Committed { room, .. } => Some(room),
        }
    }

    /// Returns the guest details, if submitted.
    #[must_use]
    pub const fn guest(&self) -> Option<&GuestDetails> {
        match self {
            Self::DetailsPending { guest, .. } | Self::Committed { guest, .. } => Some(guest),
            _ => None,
        }
    }

    /// Returns the stored reservation id once committed.
    #[must_use]
    pub const fn reservation_id(&self) -> Option<i64> {
        match self {
            Self::Committed { reservation_id, .. } => Some(*reservation_id),
            _ => None,
        }
    }

    /// Returns `true` for [`Draft::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` once the reservation has been stored.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// Starts a new flow for the searched stay. Allowed from every state.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn select_range(&self, stay: StayRange) -> Self {
        Self::RangeSelected { stay }
    }

    /// Picks a room for the stay already in the draft.
    ///
    /// # Errors
    ///
    /// - `Error::MissingDraft` if no stay has been selected
    /// - `Error::DraftState` if the draft is already committed
    pub fn choose_room(&self, room: RoomChoice) -> Result<Self> {
        match self {
            Self::Empty => Err(Error::MissingDraft),
            Self::Committed { .. } => Err(self.state_error("not committed")),
            Self::RangeSelected { stay }
            | Self::RoomSelected { stay, .. }
            | Self::DetailsPending { stay, .. } => Ok(Self::RoomSelected { stay: *stay, room }),
        }
    }

    /// Replaces the draft with a room and stay from a direct booking link.
    /// Allowed from every state.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn book_room(&self, stay: StayRange, room: RoomChoice) -> Self {
        Self::RoomSelected { stay, room }
    }

    /// Merges validated contact details into the draft.
    ///
    /// Room and dates stay as the draft holds them. Resubmitting while
    /// details are pending replaces the previous details.
    ///
    /// # Errors
    ///
    /// - `Error::MissingDraft` if the draft is empty
    /// - `Error::DraftState` unless a room has been selected and the draft is
    ///   not committed
    pub fn merge_details(&self, guest: GuestDetails) -> Result<Self> {
        match self {
            Self::Empty => Err(Error::MissingDraft),
            Self::RoomSelected { stay, room } | Self::DetailsPending { stay, room, .. } => {
                Ok(Self::DetailsPending {
                    stay: *stay,
                    room: room.clone(),
                    guest,
                })
            }
            Self::RangeSelected { .. } | Self::Committed { .. } => {
                Err(self.state_error("room selected or details pending"))
            }
        }
    }

    /// Builds the write payload for the booking commit.
    ///
    /// # Errors
    ///
    /// - `Error::MissingDraft` if the draft is empty
    /// - `Error::DraftState` unless details are pending
    pub fn to_new_reservation(&self) -> Result<NewReservation> {
        match self {
            Self::DetailsPending { stay, room, guest } => Ok(NewReservation {
                room_id: room.id,
                stay: *stay,
                guest: guest.clone(),
            }),
            Self::Empty => Err(Error::MissingDraft),
            _ => Err(self.state_error("details pending")),
        }
    }

    /// Records that both writes succeeded.
    ///
    /// # Errors
    ///
    /// - `Error::MissingDraft` if the draft is empty
    /// - `Error::DraftState` unless details are pending
    pub fn mark_committed(&self, reservation_id: i64) -> Result<Self> {
        match self {
            Self::DetailsPending { stay, room, guest } => Ok(Self::Committed {
                stay: *stay,
                room: room.clone(),
                guest: guest.clone(),
                reservation_id,
            }),
            Self::Empty => Err(Error::MissingDraft),
            _ => Err(self.state_error("details pending")),
        }
    }

    /// Encodes the draft for a session store.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionEncoding` if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a draft from session bytes.
    ///
    /// Undecodable input is logged and read as [`Draft::Empty`].
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(draft) => draft,
            Err(e) => {
                log::warn!("Discarding undecodable reservation draft: {e}");
                Self::Empty
            }
        }
    }

    fn state_error(&self, expected: &'static str) -> Error {
        Error::DraftState {
            expected,
            found: self.state_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ReservationForm;

    fn stay(start: &str, end: &str) -> StayRange {
        StayRange::parse(start, end).unwrap()
    }

    fn room(id: i64) -> RoomChoice {
        RoomChoice::new(RoomId::new(id), format!("Room {id}"))
    }

    fn guest() -> GuestDetails {
        ReservationForm::new("Alice", "Lee", "a@b.com", "")
            .validate()
            .unwrap()
    }

    fn pending() -> Draft {
        Draft::Empty
            .select_range(stay("2024-06-01", "2024-06-05"))
            .choose_room(room(7))
            .unwrap()
            .merge_details(guest())
            .unwrap()
    }

    #[test]
    fn test_full_happy_path() {
        let committed = pending().mark_committed(42).unwrap();
        assert!(committed.is_committed());
        assert_eq!(committed.reservation_id(), Some(42));
        assert_eq!(committed.room().unwrap().id, RoomId::new(7));
        assert_eq!(committed.stay().unwrap().nights(), 4);
    }

    #[test]
    fn test_search_restarts_from_any_state() {
        let new_stay = stay("2024-07-01", "2024-07-03");
        for draft in [Draft::Empty, pending(), pending().mark_committed(1).unwrap()] {
            let restarted = draft.select_range(new_stay);
            assert_eq!(restarted, Draft::RangeSelected { stay: new_stay });
        }
    }

    #[test]
    fn test_choose_room_needs_a_stay() {
        assert!(matches!(
            Draft::Empty.choose_room(room(1)),
            Err(Error::MissingDraft)
        ));
    }

    #[test]
    fn test_choose_room_rejected_after_commit() {
        let committed = pending().mark_committed(9).unwrap();
        let err = committed.choose_room(room(1)).unwrap_err();
        assert!(matches!(
            err,
            Error::DraftState {
                found: "committed",
                ..
            }
        ));
    }

    #[test]
    fn test_choose_room_keeps_stay() {
        let draft = pending().choose_room(room(3)).unwrap();
        assert_eq!(draft.stay(), Some(stay("2024-06-01", "2024-06-05")));
        assert_eq!(draft.room().unwrap().id, RoomId::new(3));
        assert!(draft.guest().is_none());
    }

    #[test]
    fn test_book_room_from_any_state() {
        let target = stay("2024-08-01", "2024-08-02");
        for draft in [Draft::Empty, pending(), pending().mark_committed(1).unwrap()] {
            let booked = draft.book_room(target, room(2));
            assert_eq!(booked.state_name(), "room selected");
            assert_eq!(booked.stay(), Some(target));
        }
    }

    #[test]
    fn test_merge_details_requires_room() {
        let ranged = Draft::Empty.select_range(stay("2024-06-01", "2024-06-02"));
        assert!(matches!(
            ranged.merge_details(guest()),
            Err(Error::DraftState {
                found: "range selected",
                ..
            })
        ));
        assert!(matches!(
            Draft::Empty.merge_details(guest()),
            Err(Error::MissingDraft)
        ));
    }

    #[test]
    fn test_merge_details_keeps_room_and_dates() {
        let before = pending();
        let other = ReservationForm::new("Bobby", "Tables", "b@c.org", "1")
            .validate()
            .unwrap();
        let after = before.merge_details(other.clone()).unwrap();
        assert_eq!(after.stay(), before.stay());
        assert_eq!(after.room(), before.room());
        assert_eq!(after.guest(), Some(&other));
    }

    #[test]
    fn test_mark_committed_requires_details() {
        let selected = Draft::Empty.book_room(stay("2024-06-01", "2024-06-02"), room(1));
        assert!(selected.mark_committed(1).is_err());
        let committed = pending().mark_committed(1).unwrap();
        assert!(committed.mark_committed(2).is_err());
    }

    #[test]
    fn test_to_new_reservation() {
        let payload = pending().to_new_reservation().unwrap();
        assert_eq!(payload.room_id, RoomId::new(7));
        assert_eq!(payload.guest.first_name(), "Alice");

        let committed = pending().mark_committed(5).unwrap();
        assert!(committed.to_new_reservation().is_err());
    }

    #[test]
    fn test_bytes_round_trip() {
        let draft = pending();
        let bytes = draft.to_bytes().unwrap();
        assert_eq!(Draft::from_bytes(&bytes), draft);
    }

    #[test]
    fn test_json_is_tagged_by_state() {
        let bytes = Draft::Empty
            .select_range(stay("2024-06-01", "2024-06-05"))
            .to_bytes()
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["state"], "range_selected");
        assert_eq!(value["stay"]["start"], "2024-06-01");
    }

    #[test]
    fn test_malformed_bytes_fail_closed() {
        assert_eq!(Draft::from_bytes(b"not json"), Draft::Empty);
        assert_eq!(Draft::from_bytes(b"{\"state\":\"teleported\"}"), Draft::Empty);
        // Inverted stay fails StayRange validation during decode
        let bad = br#"{"state":"range_selected","stay":{"start":"2024-06-05","end":"2024-06-01"}}"#;
        assert_eq!(Draft::from_bytes(bad), Draft::Empty);
    }
}
