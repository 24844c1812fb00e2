//! Rooms and the restrictions that block them.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::stay::StayRange;

/// Identifier of a bookable room.
///
/// # Examples
///
/// ```
/// use innkeep::RoomId;
///
/// let id = RoomId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(i64);

impl RoomId {
    /// Wraps a raw room identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bookable room from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier.
    pub id: RoomId,
    /// Display name, e.g. "General's Quarters".
    pub name: String,
    /// When the room was added to the catalog.
    pub created_at: SystemTime,
    /// When the room was last changed.
    pub updated_at: SystemTime,
}

/// Why a restriction blocks a room.
///
/// The numeric values are what the `room_restrictions.restriction_id`
/// column stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    /// Created by a booking commit.
    Reservation,
    /// Placed manually by staff, e.g. for maintenance.
    OwnerBlock,
}

impl RestrictionKind {
    /// Returns the stored identifier of this kind.
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Reservation => 1,
            Self::OwnerBlock => 2,
        }
    }

    /// Looks up a kind by its stored identifier.
    #[must_use]
    pub const fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Reservation),
            2 => Some(Self::OwnerBlock),
            _ => None,
        }
    }
}

impl fmt::Display for RestrictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reservation => write!(f, "reservation"),
            Self::OwnerBlock => write!(f, "owner block"),
        }
    }
}

/// A date interval during which a room cannot be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRestriction {
    /// Restriction identifier.
    pub id: i64,
    /// The blocked room.
    pub room_id: RoomId,
    /// The blocked nights.
    pub stay: StayRange,
    /// The reservation that caused the block, if any.
    pub reservation_id: Option<i64>,
    /// Why the room is blocked.
    pub kind: RestrictionKind,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last update timestamp.
    pub updated_at: SystemTime,
}
