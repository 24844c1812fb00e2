//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use innkeep::Error as LibError;
use std::fmt;

/// Message shown for storage failures; the detail only goes to the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments or rejected form fields.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// A storage call ran past its deadline or waited too long for a lock.
    Timeout(LibError),

    /// Data directory not found (and auto-init disabled).
    NoDataDirectory,

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: The room was booked by someone else before the commit
    /// - 2: Storage call timed out
    /// - 3: No data directory found
    /// - 4: Input error (bad dates, missing draft, unknown id, rejected form)
    /// - 5: I/O error
    /// - 6: Other storage or library error
    /// - 7: Configuration error
    /// - 8: Reservation saved without its room restriction
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) => match lib_err {
                LibError::RoomUnavailable { .. } => 1,
                LibError::PartialCommit { .. } => 8,
                e if e.is_input() => 4,
                _ => 6,
            },
            CliError::Timeout(_) => 2,
            CliError::NoDataDirectory => 3,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }

    /// Writes the full error to the operator log when the user only sees a
    /// generic message.
    pub fn log_detail(&self) {
        match self {
            CliError::Library(e @ LibError::PartialCommit { .. }) => {
                log::error!("{e}");
            }
            CliError::Library(e) if e.is_storage() => log::error!("{e}"),
            CliError::Timeout(e) => log::error!("{e}"),
            _ => {}
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(LibError::PartialCommit { reservation_id, .. }) => write!(
                f,
                "reservation {reservation_id} was saved but the room was not blocked; \
                 staff must review it"
            ),
            CliError::Library(LibError::RoomUnavailable { .. }) => write!(
                f,
                "the room was booked by someone else; please search again"
            ),
            CliError::Library(e) if e.is_storage() => f.write_str(INTERNAL_ERROR_MESSAGE),
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Timeout(_) => f.write_str(INTERNAL_ERROR_MESSAGE),
            CliError::NoDataDirectory => {
                write!(
                    f,
                    "Data directory not found (use --data-dir or enable auto-init)"
                )
            }
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) | CliError::Timeout(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        match e {
            LibError::StorageTimeout { .. } => CliError::Timeout(e),
            LibError::Io(io) => CliError::Io(io),
            e => CliError::Library(e),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
