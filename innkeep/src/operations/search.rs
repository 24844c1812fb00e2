//! Availability answers for the search endpoints.

use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Result;
use crate::room::{Room, RoomId};
use crate::stay::StayRange;

/// Message shown when a search finds no free room.
pub const NO_AVAILABILITY_MESSAGE: &str = "No availability";

/// JSON answer to "is this room free for these dates?".
///
/// The field names and the stringly `room_id` are the wire format the
/// booking page's script expects.
///
/// # Examples
///
/// ```
/// use innkeep::operations::AvailabilityResponse;
/// use innkeep::{RoomId, StayRange};
///
/// let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
/// let response = AvailabilityResponse::new(true, RoomId::new(7), &stay);
///
/// let json = serde_json::to_string(&response).unwrap();
/// assert_eq!(
///     json,
///     r#"{"ok":true,"message":"","room_id":"7","start_date":"2024-06-01","end_date":"2024-06-05"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Whether the room is free.
    pub ok: bool,
    /// Optional message for the client.
    pub message: String,
    /// The room that was checked.
    pub room_id: String,
    /// Start of the checked stay.
    pub start_date: String,
    /// End of the checked stay.
    pub end_date: String,
}

impl AvailabilityResponse {
    /// Creates an answer for `room_id` over `stay`.
    #[must_use]
    pub fn new(ok: bool, room_id: RoomId, stay: &StayRange) -> Self {
        Self {
            ok,
            message: String::new(),
            room_id: room_id.to_string(),
            start_date: stay.start_str(),
            end_date: stay.end_str(),
        }
    }

    /// Attaches a message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Result of a search over all rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// At least one room is free; the stay was stored in the draft.
    Available(Vec<Room>),
    /// No room is free; the draft was left alone.
    NoAvailability,
}

impl SearchOutcome {
    /// Returns the free rooms, empty when nothing is available.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        match self {
            Self::Available(rooms) => rooms,
            Self::NoAvailability => &[],
        }
    }
}

/// Checks one room under the per-call deadline.
///
/// # Errors
///
/// Returns `Error::NotFound` for an unknown room, or a storage error. A
/// storage failure is never reported as "not available".
pub fn check_room_availability(
    db: &Database,
    stay: &StayRange,
    room_id: RoomId,
) -> Result<AvailabilityResponse> {
    let ok = db.with_deadline(|conn| Database::search_room(conn, stay, room_id))?;
    Ok(AvailabilityResponse::new(ok, room_id, stay))
}
