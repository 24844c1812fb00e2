//! Choose-room command implementation.

use crate::commands::print_draft;
use crate::error::CliError;
use crate::utils::{with_booking_flow, GlobalOptions};
use clap::Args;
use innkeep::RoomId;

/// Pick a room from the last search.
#[derive(Args)]
pub struct ChooseRoomCommand {
    /// Room ID as listed by `search`
    #[arg(value_name = "ID")]
    pub id: i64,
}

impl ChooseRoomCommand {
    /// Execute the choose-room command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let draft = with_booking_flow(global, |flow| {
            flow.choose_room(RoomId::new(self.id)).map_err(CliError::from)
        })?;

        print_draft(&draft);
        if !global.quiet {
            println!();
            println!("Next: innkeep make-reservation");
        }
        Ok(())
    }
}
