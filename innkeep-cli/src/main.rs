//! Main entry point for the innkeep CLI.
//!
//! This is the command-line interface for the innkeep reservation system.
//! Each command stands in for one page of the booking site:
//! - `search`: Search availability for a date range
//! - `choose-room` / `book-room`: Pick the room to book
//! - `make-reservation`: Show or submit the guest form
//! - `summary`: Show the committed reservation
//! - `admin`: Staff reservation management

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _logger = innkeep::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
        session: cli.session,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Rooms(cmd) => cmd.execute(&global),
        cli::Command::Search(cmd) => cmd.execute(&global),
        cli::Command::ChooseRoom(cmd) => cmd.execute(&global),
        cli::Command::BookRoom(cmd) => cmd.execute(&global),
        cli::Command::MakeReservation(cmd) => cmd.execute(&global),
        cli::Command::Summary(cmd) => cmd.execute(&global),
        cli::Command::Admin(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.log_detail();
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
