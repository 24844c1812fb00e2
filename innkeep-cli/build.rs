//! Build script for innkeep-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("innkeep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Search room availability and book reservations")
        .long_about(
            "Command-line front end for hotel room availability search and reservation booking",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("INNKEEP_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("INNKEEP_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("INNKEEP_DISABLE_AUTOINIT"),
        )
        .arg(
            Arg::new("session")
                .long("session")
                .help("Session token that carries the reservation draft between commands")
                .value_name("TOKEN")
                .global(true)
                .env("INNKEEP_SESSION"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and room catalog")
                .long_about("Create the innkeep database and seed the configured rooms"),
            Command::new("rooms")
                .about("List the room catalog")
                .long_about("Display every room with its ID"),
            Command::new("search")
                .about("Search availability for a date range")
                .long_about(
                    "List the rooms free for --start..--end and remember the dates, \
                     or check one room with --room-id and answer in JSON",
                ),
            Command::new("choose-room")
                .about("Pick a room from the last search")
                .long_about("Choose one of the rooms returned by the last search in this session"),
            Command::new("book-room")
                .about("Start a booking for a specific room and dates")
                .long_about("Start a new reservation draft for --id over --start..--end"),
            Command::new("make-reservation")
                .about("Show or submit the reservation form")
                .long_about(
                    "Without field flags, show the form; with --first-name, --last-name, \
                     --email and --phone, validate and commit the booking",
                ),
            Command::new("summary")
                .about("Show the summary of the committed reservation")
                .long_about("Display the reservation committed in this session"),
            Command::new("admin")
                .about("Staff reservation management")
                .long_about(
                    "List, show, update, process and delete reservations, \
                     and manage owner blocks",
                ),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("innkeep.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
