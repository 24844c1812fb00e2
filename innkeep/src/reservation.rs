//! Reservation types for committed bookings.
//!
//! This module provides the persisted `Reservation`, the validated guest
//! contact block it carries, and the `NewReservation` payload handed to the
//! booking commit.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::room::RoomId;
use crate::stay::StayRange;

/// Guest contact details that passed form validation.
///
/// Values of this type only come out of
/// [`ReservationForm::validate`](crate::validation::ReservationForm::validate)
/// or from rows already stored, so holders can rely on the first name, last
/// name, and email being present and well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDetails {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
}

impl GuestDetails {
    /// Builds guest details without validation.
    ///
    /// Used for values that were validated before they were stored.
    pub(crate) fn from_trusted(
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
    ) -> Self {
        Self {
            first_name,
            last_name,
            email,
            phone,
        }
    }

    /// Returns the guest's first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the guest's last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the guest's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the guest's phone number (may be empty).
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A fully specified booking that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    /// The booked room.
    pub room_id: RoomId,
    /// The booked nights.
    pub stay: StayRange,
    /// Who is staying.
    pub guest: GuestDetails,
}

/// A committed reservation as stored in the database.
///
/// # Examples
///
/// ```
/// use innkeep::{Reservation, RoomId, StayRange};
/// use innkeep::validation::ReservationForm;
///
/// let guest = ReservationForm::new("Alice", "Lee", "a@b.com", "").validate().unwrap();
/// let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
///
/// let reservation = Reservation::builder(1, RoomId::new(7), stay, guest)
///     .room_name("Major's Suite")
///     .build();
///
/// assert_eq!(reservation.room_name(), "Major's Suite");
/// assert!(!reservation.is_processed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: i64,
    room_id: RoomId,
    room_name: String,
    stay: StayRange,
    guest: GuestDetails,
    processed: bool,
    created_at: SystemTime,
    updated_at: SystemTime,
}

impl Reservation {
    /// Creates a new reservation builder.
    #[must_use]
    pub fn builder(
        id: i64,
        room_id: RoomId,
        stay: StayRange,
        guest: GuestDetails,
    ) -> ReservationBuilder {
        ReservationBuilder {
            id,
            room_id,
            room_name: String::new(),
            stay,
            guest,
            processed: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns the reservation identifier.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the booked room.
    #[must_use]
    pub const fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Returns the booked room's display name.
    #[must_use]
    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    /// Returns the booked nights.
    #[must_use]
    pub const fn stay(&self) -> StayRange {
        self.stay
    }

    /// Returns the guest details.
    #[must_use]
    pub const fn guest(&self) -> &GuestDetails {
        &self.guest
    }

    /// Returns whether staff has processed this reservation.
    #[must_use]
    pub const fn is_processed(&self) -> bool {
        self.processed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> SystemTime {
        self.updated_at
    }
}

/// Builder for creating `Reservation` instances.
#[derive(Debug)]
pub struct ReservationBuilder {
    id: i64,
    room_id: RoomId,
    room_name: String,
    stay: StayRange,
    guest: GuestDetails,
    processed: bool,
    created_at: Option<SystemTime>,
    updated_at: Option<SystemTime>,
}

impl ReservationBuilder {
    /// Sets the denormalized room name.
    #[must_use]
    pub fn room_name(mut self, name: impl Into<String>) -> Self {
        self.room_name = name.into();
        self
    }

    /// Sets the processed flag.
    #[must_use]
    pub const fn processed(mut self, processed: bool) -> Self {
        self.processed = processed;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn created_at(mut self, created_at: SystemTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the last update timestamp.
    #[must_use]
    pub const fn updated_at(mut self, updated_at: SystemTime) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds the reservation.
    ///
    /// Missing timestamps default to now; a missing `updated_at` follows
    /// `created_at`.
    #[must_use]
    pub fn build(self) -> Reservation {
        let created_at = self.created_at.unwrap_or_else(SystemTime::now);
        let updated_at = self.updated_at.unwrap_or(created_at);

        Reservation {
            id: self.id,
            room_id: self.room_id,
            room_name: self.room_name,
            stay: self.stay,
            guest: self.guest,
            processed: self.processed,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn guest() -> GuestDetails {
        GuestDetails::from_trusted(
            "Alice".into(),
            "Lee".into(),
            "a@b.com".into(),
            String::new(),
        )
    }

    fn stay() -> StayRange {
        StayRange::parse("2024-06-01", "2024-06-05").unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let reservation = Reservation::builder(1, RoomId::new(7), stay(), guest()).build();
        assert_eq!(reservation.id(), 1);
        assert_eq!(reservation.room_id(), RoomId::new(7));
        assert_eq!(reservation.room_name(), "");
        assert!(!reservation.is_processed());
        assert_eq!(reservation.created_at(), reservation.updated_at());
    }

    #[test]
    fn test_builder_explicit_timestamps() {
        let created = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let updated = created + Duration::from_secs(60);
        let reservation = Reservation::builder(2, RoomId::new(1), stay(), guest())
            .processed(true)
            .created_at(created)
            .updated_at(updated)
            .build();
        assert!(reservation.is_processed());
        assert_eq!(reservation.created_at(), created);
        assert_eq!(reservation.updated_at(), updated);
    }

    #[test]
    fn test_guest_full_name() {
        assert_eq!(guest().full_name(), "Alice Lee");
    }
}
