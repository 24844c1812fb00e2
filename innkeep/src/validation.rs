//! Field validation for the reservation details form.
//!
//! Validation is a pure function of the submitted values: it never touches
//! storage, and it either yields complete [`GuestDetails`] or the full set of
//! field errors so the form can be shown again with the submitted values.

use std::collections::BTreeMap;
use std::fmt;

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::reservation::GuestDetails;

/// Minimum number of characters in a first name.
pub const FIRST_NAME_MIN_LEN: usize = 3;

const MSG_REQUIRED: &str = "This field cannot be blank";
const MSG_INVALID_EMAIL: &str = "Invalid email address";

/// Raw values submitted on the reservation details form.
///
/// # Examples
///
/// ```
/// use innkeep::validation::ReservationForm;
///
/// let form = ReservationForm::new("Alice", "Lee", "a@b.com", "555-0100");
/// let guest = form.validate().unwrap();
/// assert_eq!(guest.first_name(), "Alice");
///
/// let errors = ReservationForm::new("Al", "Lee", "not-an-email", "")
///     .validate()
///     .unwrap_err();
/// assert!(errors.get("first_name").is_some());
/// assert!(errors.get("email").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ReservationForm {
    /// Guest first name.
    #[garde(length(chars, min = 3))]
    pub first_name: String,
    /// Guest last name.
    #[garde(length(min = 1))]
    pub last_name: String,
    /// Guest email.
    #[garde(email)]
    pub email: String,
    /// Guest phone (optional).
    #[garde(skip)]
    pub phone: String,
}

impl ReservationForm {
    /// Creates a form from submitted values.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Prefills a form from guest details already on file.
    #[must_use]
    pub fn from_guest(guest: &GuestDetails) -> Self {
        Self::new(
            guest.first_name(),
            guest.last_name(),
            guest.email(),
            guest.phone(),
        )
    }

    /// Validates the form.
    ///
    /// Checks run in a fixed order so the same input always produces the same
    /// errors:
    /// 1. first name, last name, and email are required (non-blank after trimming)
    /// 2. a non-blank first name has at least [`FIRST_NAME_MIN_LEN`] characters
    /// 3. a non-blank email is syntactically valid
    ///
    /// # Errors
    ///
    /// Returns every failed check as a [`FormErrors`] map.
    pub fn validate(&self) -> Result<GuestDetails, FormErrors> {
        let trimmed = Self::new(
            self.first_name.trim(),
            self.last_name.trim(),
            self.email.trim(),
            self.phone.trim(),
        );

        let mut errors = FormErrors::default();
        for (field, value) in [
            ("first_name", &trimmed.first_name),
            ("last_name", &trimmed.last_name),
            ("email", &trimmed.email),
        ] {
            if value.is_empty() {
                errors.add(field, MSG_REQUIRED);
            }
        }

        if let Err(report) = Validate::validate(&trimmed, &()) {
            for (path, _) in report.iter() {
                let field = path.to_string();
                if errors.get(&field).is_some() {
                    continue;
                }
                match field.as_str() {
                    "first_name" => errors.add(
                        "first_name",
                        format!("This field must be at least {FIRST_NAME_MIN_LEN} characters long"),
                    ),
                    "email" => errors.add("email", MSG_INVALID_EMAIL),
                    other => errors.add(other, MSG_REQUIRED),
                }
            }
        }

        if errors.is_empty() {
            let Self {
                first_name,
                last_name,
                email,
                phone,
            } = trimmed;
            Ok(GuestDetails::from_trusted(first_name, last_name, email, phone))
        } else {
            Err(errors)
        }
    }
}

/// Field name to error messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    /// Records an error for a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns the first error recorded for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Returns all errors recorded for a field.
    #[must_use]
    pub fn all(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates over `(field, messages)` in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// Single email value checked with the same rule as the form's email field.
#[derive(Validate)]
struct EmailAddress<'a> {
    #[garde(email)]
    value: &'a str,
}

/// Syntactic email check (`local@domain`). No DNS or mailbox verification
/// is done.
///
/// # Examples
///
/// ```
/// use innkeep::validation::is_email;
///
/// assert!(is_email("a@b.com"));
/// assert!(is_email("first.last+tag@mail.example.org"));
/// assert!(!is_email("not-an-email"));
/// ```
#[must_use]
pub fn is_email(value: &str) -> bool {
    EmailAddress { value }.validate(&()).is_ok()
}
