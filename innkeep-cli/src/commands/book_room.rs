//! Book-room command implementation.
//!
//! The "book this room" link: starts a fresh draft for one room and stay,
//! whatever the session held before.

use crate::commands::print_draft;
use crate::error::CliError;
use crate::utils::{parse_stay, with_booking_flow, GlobalOptions};
use clap::Args;
use innkeep::RoomId;

/// Start a booking for a specific room and dates.
#[derive(Args)]
pub struct BookRoomCommand {
    /// Room ID
    #[arg(long, value_name = "ID")]
    pub id: i64,

    /// Arrival date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: String,

    /// Departure date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: String,
}

impl BookRoomCommand {
    /// Execute the book-room command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let stay = parse_stay(&self.start, &self.end)?;
        let room_id = RoomId::new(self.id);

        let draft = with_booking_flow(global, |flow| {
            flow.book_room(room_id, stay).map_err(CliError::from)
        })?;

        print_draft(&draft);
        if !global.quiet {
            println!();
            println!("Next: innkeep make-reservation");
        }
        Ok(())
    }
}
