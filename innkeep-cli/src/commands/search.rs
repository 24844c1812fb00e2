//! Search command implementation.
//!
//! Without `--room-id` this is the availability search page: every free room
//! is listed and the dates are stored in the session draft. With `--room-id`
//! it is the single-room JSON check, which leaves the draft untouched.

use crate::error::CliError;
use crate::utils::{parse_stay, with_booking_flow, GlobalOptions};
use clap::Args;
use innkeep::operations::{AvailabilityResponse, SearchOutcome, NO_AVAILABILITY_MESSAGE};
use innkeep::{RoomId, StayRange};

/// Message returned to JSON clients when the storage layer fails.
const QUERY_ERROR_MESSAGE: &str = "Error querying database";

/// Search availability for a date range.
#[derive(Args)]
pub struct SearchCommand {
    /// Arrival date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: String,

    /// Departure date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: String,

    /// Check a single room and answer in JSON
    #[arg(long, value_name = "ID")]
    pub room_id: Option<i64>,
}

impl SearchCommand {
    /// Execute the search command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        match self.room_id {
            Some(room_id) => self.check_room(global, RoomId::new(room_id)),
            None => {
                let stay = parse_stay(&self.start, &self.end)?;
                search_all(global, stay)
            }
        }
    }

    fn check_room(&self, global: &GlobalOptions, room_id: RoomId) -> Result<(), CliError> {
        let stay = match parse_stay(&self.start, &self.end) {
            Ok(stay) => stay,
            Err(e) => {
                print_json(&serde_json::json!({ "ok": false, "message": e.to_string() }))?;
                return Err(e);
            }
        };

        let result = with_booking_flow(global, |flow| {
            flow.check_room(&stay, room_id).map_err(CliError::from)
        });

        match result {
            Ok(response) => print_json(&response),
            Err(e) => {
                let message = match &e {
                    CliError::Library(lib) if !lib.is_storage() => lib.to_string(),
                    _ => QUERY_ERROR_MESSAGE.to_string(),
                };
                print_json(&AvailabilityResponse::new(false, room_id, &stay).with_message(message))?;
                Err(e)
            }
        }
    }
}

fn search_all(global: &GlobalOptions, stay: StayRange) -> Result<(), CliError> {
    let outcome = with_booking_flow(global, |flow| flow.search(stay).map_err(CliError::from))?;

    match outcome {
        SearchOutcome::NoAvailability => {
            println!("{NO_AVAILABILITY_MESSAGE}");
        }
        SearchOutcome::Available(rooms) => {
            println!(
                "Available from {} to {} ({} night(s)):",
                stay.start_str(),
                stay.end_str(),
                stay.nights()
            );
            for room in &rooms {
                println!("  {}\t{}", room.id, room.name);
            }
            if !global.quiet {
                println!();
                println!("Pick one with: innkeep choose-room <ID>");
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let text =
        serde_json::to_string(value).map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    println!("{text}");
    Ok(())
}
