//! Rooms command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use innkeep::Database;

/// List the room catalog.
#[derive(Args)]
pub struct RoomsCommand {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

impl RoomsCommand {
    /// Execute the rooms command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let rooms = db.with_deadline(|conn| Database::list_rooms(conn))?;

        if self.json {
            let json_data: Vec<serde_json::Value> = rooms
                .iter()
                .map(|room| serde_json::json!({ "id": room.id, "name": room.name }))
                .collect();
            let text = serde_json::to_string_pretty(&json_data)
                .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
            println!("{text}");
            return Ok(());
        }

        println!("ID\tNAME");
        for room in &rooms {
            println!("{}\t{}", room.id, room.name);
        }

        Ok(())
    }
}
