//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AdminCommand, BookRoomCommand, ChooseRoomCommand, CompletionsCommand, InitCommand,
    MakeReservationCommand, RoomsCommand, SearchCommand, SummaryCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line front end for hotel room availability and reservations.
#[derive(Parser)]
#[command(name = "innkeep")]
#[command(version, about = "Search room availability and book reservations", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "INNKEEP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "INNKEEP_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "INNKEEP_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    /// Session token that carries the reservation draft between commands
    #[arg(long, value_name = "TOKEN", global = true, env = "INNKEEP_SESSION")]
    pub session: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and room catalog
    Init(InitCommand),

    /// List the room catalog
    Rooms(RoomsCommand),

    /// Search availability for a date range
    Search(SearchCommand),

    /// Pick a room from the last search
    ChooseRoom(ChooseRoomCommand),

    /// Start a booking for a specific room and dates
    BookRoom(BookRoomCommand),

    /// Show or submit the reservation form
    MakeReservation(MakeReservationCommand),

    /// Show the summary of the committed reservation
    Summary(SummaryCommand),

    /// Staff reservation management
    Admin(AdminCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
