//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the innkeep data directory, database, and room catalog.

use crate::error::CliError;
use crate::utils::{data_dir, load_configuration, shorten_path, GlobalOptions};
use clap::Parser;
use innkeep::config::CONFIG_FILE_NAME;
use innkeep::database::DATABASE_FILE_NAME;
use innkeep::operations::init::{init_database, InitOptions};
use std::path::PathBuf;

/// Initialize innkeep data directory and database.
#[derive(Parser)]
#[command(about = "Initialize innkeep data directory and database")]
pub struct InitCommand {
    /// Data directory to initialize
    #[arg(long = "dir", value_name = "PATH")]
    dir: Option<PathBuf>,

    /// Overwrite existing database
    #[arg(long)]
    overwrite: bool,

    /// Create default configuration file
    #[arg(long)]
    with_config: bool,

    /// Room to seed instead of the configured list (repeatable)
    #[arg(long = "room", value_name = "NAME")]
    rooms: Vec<String>,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// Note: This command ignores --disable-autoinit (it is the explicit
    /// initialization). `--dir` names where to create, not where to find.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // Priority: command flag > global flag > default
        let data_dir = match self.dir {
            Some(dir) => dir,
            None => data_dir(global)?,
        };

        let rooms = if self.rooms.is_empty() {
            let mut scoped = global.clone();
            scoped.data_dir = Some(data_dir.clone());
            load_configuration(&scoped)?.room_names()
        } else {
            self.rooms
        };

        if self.dry_run {
            println!("Dry-run mode: no changes will be made");
            println!();
            println!("Would initialize innkeep in: {}", shorten_path(&data_dir));

            if data_dir.exists() {
                println!("  - Data directory already exists");
            } else {
                println!("  - Create data directory");
            }

            let db_path = data_dir.join(DATABASE_FILE_NAME);
            if db_path.exists() {
                if self.overwrite {
                    println!("  - Remove existing database: {}", db_path.display());
                    println!("  - Create new database: {}", db_path.display());
                } else {
                    println!(
                        "  - ERROR: Database already exists (use --overwrite to replace): {}",
                        db_path.display()
                    );
                }
            } else {
                println!("  - Create database: {}", db_path.display());
            }

            for room in &rooms {
                println!("  - Add room: {room}");
            }

            if self.with_config {
                let config_path = data_dir.join(CONFIG_FILE_NAME);
                if config_path.exists() {
                    println!(
                        "  - Configuration file already exists (will not overwrite): {}",
                        config_path.display()
                    );
                } else {
                    println!("  - Create configuration file: {}", config_path.display());
                }
            }

            return Ok(());
        }

        let options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config)
            .with_rooms(rooms);

        let result = init_database(&options)?;

        println!("Initialized innkeep in: {}", shorten_path(&result.data_dir));

        if result.data_dir_created {
            println!("  - Created data directory");
        }

        if result.database_created {
            if self.overwrite {
                println!("  - Recreated database");
            } else {
                println!("  - Created database");
            }
        }

        println!("  - Added {} room(s)", result.rooms_seeded);

        if result.config_created {
            println!("  - Created default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }

        Ok(())
    }
}
