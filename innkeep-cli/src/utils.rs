//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, database and
//! session setup, and output formatting.

use crate::error::CliError;
use innkeep::database::{resolve_data_dir, SqliteSessionStore, DATABASE_FILE_NAME};
use innkeep::operations::{BookingCommit, BookingFlow};
use innkeep::session::SessionToken;
use innkeep::{
    Config, ConfigBuilder, Database, DatabaseConfig, LogMailer, MailQueue, OutboxMailer,
    StayRange,
};
use std::path::PathBuf;
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Fields used via pattern matching in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,

    /// Session token carrying the reservation draft between invocations.
    pub session: Option<String>,
}

/// Resolve the data directory from global options.
///
/// Priority: `--data-dir` > `INNKEEP_DATA_DIR` > `~/.innkeep`.
pub fn data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match &global.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables (highest priority)
/// 2. `{data_dir}/config.yaml`
/// 3. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    ConfigBuilder::new()
        .with_data_dir(data_dir(global)?)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// A database that does not exist yet is created and seeded with the
/// configured rooms, unless auto-init is disabled.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = data_dir(global)?.join(DATABASE_FILE_NAME);
    let fresh = !db_path.exists();

    if fresh && (global.disable_autoinit || config.autoinit_disabled()) {
        return Err(CliError::NoDataDirectory);
    }

    let busy_timeout = match global.busy_timeout {
        Some(seconds) => Duration::from_secs(seconds.into()),
        None => config.busy_timeout(),
    };
    let db_config = DatabaseConfig::new(&db_path)
        .with_busy_timeout(busy_timeout)
        .with_query_timeout(config.query_timeout());

    let mut db = Database::open(db_config)?;

    if fresh {
        let rooms = db.seed_rooms(&config.room_names())?;
        log::info!(
            "Auto-initialized {} with {} room(s)",
            db_path.display(),
            rooms.len()
        );
    }

    Ok(db)
}

/// Resolve the session token, generating one when none was given.
///
/// A generated token is announced on stderr so that the next command can
/// pass it back with `--session`.
pub fn session_token(global: &GlobalOptions) -> Result<SessionToken, CliError> {
    match &global.session {
        Some(token) => SessionToken::parse(token).map_err(CliError::from),
        None => {
            let token = SessionToken::generate();
            if !global.quiet {
                eprintln!("Session: {token}");
                eprintln!("Pass --session {token} to continue this booking.");
            }
            Ok(token)
        }
    }
}

/// Start the confirmation mail queue described by `config`.
///
/// Messages go to `mail.outbox_dir` when set, otherwise to the log.
pub fn start_mail_queue(config: &Config) -> Result<MailQueue, CliError> {
    let queue = match config.mail_outbox_dir() {
        Some(dir) => MailQueue::start(
            Box::new(OutboxMailer::new(dir)),
            config.mail_queue_capacity(),
        ),
        None => MailQueue::start(Box::new(LogMailer), config.mail_queue_capacity()),
    };
    queue.map_err(CliError::from)
}

/// Run `step` on this invocation's booking flow.
///
/// Wires the database, the SQLite session store under the resolved token,
/// and the configured commit policy and mail queue. Queued mail is
/// delivered before this returns.
pub fn with_booking_flow<T>(
    global: &GlobalOptions,
    step: impl FnOnce(&BookingFlow<'_, &SqliteSessionStore<'_>>) -> Result<T, CliError>,
) -> Result<T, CliError> {
    let config = load_configuration(global)?;
    let db = open_database(global, &config)?;
    let token = session_token(global)?;
    let queue = start_mail_queue(&config)?;

    let store = SqliteSessionStore::new(db.connection()).with_lifetime(config.session_lifetime());
    let commit = BookingCommit::from_config(&db, &config).with_mail(&queue);
    let flow = BookingFlow::new(&db, &store, token).with_commit(commit);

    let result = step(&flow);

    drop(flow);
    queue.shutdown();
    result
}

/// Parse `--start` / `--end` into a stay.
pub fn parse_stay(start: &str, end: &str) -> Result<StayRange, CliError> {
    StayRange::parse(start, end).map_err(CliError::from)
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: std::time::SystemTime) -> String {
    use chrono::{DateTime, Utc};
    let dt: DateTime<Utc> = ts.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &std::path::Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
