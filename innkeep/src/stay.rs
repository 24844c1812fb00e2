//! Date-only stay ranges and the strict overlap test.
//!
//! A stay is the half-open interval `[start, end)`: the guest arrives on
//! `start` and leaves on `end`, so a stay ending on the day another begins
//! does not conflict with it.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire and storage format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `Error::InvalidDate` if the input is not a valid calendar date in
/// that format.
///
/// # Examples
///
/// ```
/// use innkeep::stay::parse_date;
///
/// assert!(parse_date("2024-06-01").is_ok());
/// assert!(parse_date("06/01/2024").is_err());
/// assert!(parse_date("2024-02-30").is_err());
/// ```
pub fn parse_date(value: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| crate::Error::InvalidDate {
        value: value.to_string(),
    })
}

/// A non-empty range of nights, `start` inclusive and `end` exclusive.
///
/// Construction guarantees `start < end`, including when a range is
/// deserialized from a session payload.
///
/// # Examples
///
/// ```
/// use innkeep::StayRange;
///
/// let june = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
/// assert_eq!(june.nights(), 4);
///
/// // Equal or inverted ranges are rejected
/// assert!(StayRange::parse("2024-06-05", "2024-06-05").is_err());
/// assert!(StayRange::parse("2024-06-05", "2024-06-01").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawStayRange", into = "RawStayRange")]
pub struct StayRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct RawStayRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl StayRange {
    /// Creates a new stay range.
    ///
    /// # Errors
    ///
    /// Returns an error unless `start < end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidStayRangeError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(InvalidStayRangeError {
                start,
                end,
                reason: "end date must be after start date".into(),
            })
        }
    }

    /// Parses a stay range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDate` for a malformed date and
    /// `Error::InvalidStayRange` for an empty or inverted range.
    pub fn parse(start: &str, end: &str) -> crate::Result<Self> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Ok(Self::new(start, end)?)
    }

    /// Returns the arrival date.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the departure date.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns the number of nights in the stay (always at least one).
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Returns `true` if the two stays share at least one night.
    ///
    /// Touching endpoints do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use innkeep::StayRange;
    ///
    /// let a = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
    /// let b = StayRange::parse("2024-06-04", "2024-06-08").unwrap();
    /// let c = StayRange::parse("2024-06-05", "2024-06-08").unwrap();
    ///
    /// assert!(a.overlaps(&b));
    /// assert!(!a.overlaps(&c));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns `true` if the guest occupies the room on the night of `date`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Formats the start date as `YYYY-MM-DD`.
    #[must_use]
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// Formats the end date as `YYYY-MM-DD`.
    #[must_use]
    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl TryFrom<RawStayRange> for StayRange {
    type Error = InvalidStayRangeError;

    fn try_from(raw: RawStayRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl From<StayRange> for RawStayRange {
    fn from(stay: StayRange) -> Self {
        Self {
            start: stay.start,
            end: stay.end,
        }
    }
}

impl fmt::Display for StayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_str(), self.end_str())
    }
}

/// Error type for empty or inverted stay ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStayRangeError {
    /// The requested start date.
    pub start: NaiveDate,
    /// The requested end date.
    pub end: NaiveDate,
    /// The reason the range is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidStayRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid stay range {}..{}: {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT),
            self.reason
        )
    }
}

impl std::error::Error for InvalidStayRangeError {}

impl From<InvalidStayRangeError> for crate::Error {
    fn from(err: InvalidStayRangeError) -> Self {
        Self::InvalidStayRange {
            start: err.start.format(DATE_FORMAT).to_string(),
            end: err.end.format(DATE_FORMAT).to_string(),
            reason: err.reason,
        }
    }
}

#[cfg(test)]
mod proptests;
