//! Database connection management.
//!
//! This module provides the main database connection type with the PRAGMA
//! settings the engine relies on, and the per-call deadline every storage
//! call runs under.

use std::time::{Duration, Instant};

use rusqlite::{Connection, OpenFlags};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;

// SQLite VM instructions between deadline checks
const PROGRESS_CHECK_INTERVAL: i32 = 1_000;

/// A database connection wrapper with configuration.
///
/// Each thread or request opens its own `Database`; the wrapped connection
/// is never shared.
///
/// # Examples
///
/// ```no_run
/// use innkeep::database::{Database, DatabaseConfig};
///
/// let config = DatabaseConfig::new("/tmp/innkeep.db");
/// let db = Database::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Opens a database connection with the given configuration.
    ///
    /// This function will:
    /// - Create the parent directory if `auto_create` is enabled
    /// - Open the database with appropriate flags
    /// - Set WAL mode for concurrent access
    /// - Configure busy timeout and foreign keys
    /// - Initialize or verify the database schema
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database file cannot be opened
    /// - The parent directory cannot be created
    /// - PRAGMA settings cannot be applied
    /// - Schema initialization or verification fails
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;

        conn.busy_timeout(config.busy_timeout)?;
        if !config.read_only {
            // PRAGMA journal_mode returns a row
            let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        }
        conn.execute_batch("PRAGMA foreign_keys = ON")?;

        if config.read_only {
            super::migrations::check_schema_version(&conn)?;
        } else {
            super::migrations::check_schema_compatibility(&conn)?;
        }

        log::debug!("Opened database at {}", config.path.display());
        Ok(Self { conn, config })
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns the configuration this database was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Runs one storage call under the per-call deadline.
    ///
    /// A statement still running when the deadline passes is interrupted.
    /// Interrupts and exhausted lock waits surface as
    /// `Error::StorageTimeout`.
    ///
    /// # Errors
    ///
    /// Returns whatever `call` returns, with timeouts classified.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use innkeep::database::{Database, DatabaseConfig};
    /// use innkeep::StayRange;
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
    /// let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
    /// let rooms = db.with_deadline(|conn| Database::search_all_rooms(conn, &stay)).unwrap();
    /// ```
    pub fn with_deadline<T>(&self, call: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let started = Instant::now();
        self.arm_deadline(started);
        let result = call(&self.conn);
        self.disarm_deadline();
        result.map_err(|e| self.classify_timeout(e, started))
    }

    fn arm_deadline(&self, started: Instant) {
        let deadline = started + self.config.query_timeout;
        self.conn.progress_handler(
            PROGRESS_CHECK_INTERVAL,
            Some(move || Instant::now() >= deadline),
        );
    }

    fn disarm_deadline(&self) {
        self.conn.progress_handler(0, None::<fn() -> bool>);
    }

    // Reports the limit that was actually hit
    fn classify_timeout(&self, err: Error, started: Instant) -> Error {
        let limit = if started.elapsed() >= self.config.query_timeout {
            self.config.query_timeout
        } else {
            self.config.busy_timeout
        };
        let err = err.timeout_with(duration_millis(limit));
        if let Error::StorageTimeout { millis } = err {
            log::error!("Storage call timed out after {millis}ms");
        }
        err
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
