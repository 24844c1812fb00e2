//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Initialize the data directory and room catalog
//! - `rooms`: List the room catalog
//! - `search`: Search availability for all rooms or one room
//! - `choose_room`: Pick a room from the last search
//! - `book_room`: Start a booking for a specific room and dates
//! - `make_reservation`: Show or submit the reservation form
//! - `summary`: Show the committed reservation
//! - `admin`: Staff reservation management
//! - `list`: Reservation listing used by `admin list`
//! - `completions`: Generate shell completion scripts

pub mod admin;
pub mod book_room;
pub mod choose_room;
pub mod completions;
pub mod init;
pub mod list;
pub mod make_reservation;
pub mod rooms;
pub mod search;
pub mod summary;

pub use admin::AdminCommand;
pub use book_room::BookRoomCommand;
pub use choose_room::ChooseRoomCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use make_reservation::MakeReservationCommand;
pub use rooms::RoomsCommand;
pub use search::SearchCommand;
pub use summary::SummaryCommand;

use innkeep::Draft;

/// Print where a draft stands.
pub(crate) fn print_draft(draft: &Draft) {
    if let Some(room) = draft.room() {
        println!("Room: {} ({})", room.name, room.id);
    }
    if let Some(stay) = draft.stay() {
        println!(
            "Dates: {} to {} ({} night(s))",
            stay.start_str(),
            stay.end_str(),
            stay.nights()
        );
    }
    println!("Draft: {}", draft.state_name());
}
