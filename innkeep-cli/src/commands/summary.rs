//! Summary command implementation.

use crate::error::CliError;
use crate::utils::{with_booking_flow, GlobalOptions};
use clap::Args;
use innkeep::operations::ReservationSummary;

/// Show the summary of the committed reservation.
#[derive(Args)]
pub struct SummaryCommand {}

impl SummaryCommand {
    /// Execute the summary command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let summary = with_booking_flow(global, |flow| flow.summary().map_err(CliError::from))?;
        print_summary(&summary);
        Ok(())
    }
}

/// Print the reservation summary page.
pub(crate) fn print_summary(summary: &ReservationSummary) {
    println!("Reservation {}", summary.reservation_id);
    println!("  Name:      {}", summary.guest.full_name());
    println!("  Email:     {}", summary.guest.email());
    if !summary.guest.phone().is_empty() {
        println!("  Phone:     {}", summary.guest.phone());
    }
    println!("  Room:      {}", summary.room.name);
    println!("  Arrival:   {}", summary.stay.start_str());
    println!("  Departure: {}", summary.stay.end_str());
}
