//! SQLite-backed session store.

use std::time::{Duration, SystemTime};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::session::{SessionStore, SessionToken, DEFAULT_SESSION_LIFETIME};

use super::operations::systemtime_to_unix_secs;

const SELECT_VALUE: &str = r"
    SELECT value FROM sessions
    WHERE token = ? AND key = ? AND expires_at > ?
";

const SELECT_EXPIRY: &str = r"
    SELECT MIN(expires_at) FROM sessions
    WHERE token = ? AND expires_at > ?
";

const UPSERT_VALUE: &str = r"
    INSERT OR REPLACE INTO sessions (token, key, value, expires_at)
    VALUES (?, ?, ?, ?)
";

const DELETE_VALUE: &str = "DELETE FROM sessions WHERE token = ? AND key = ?";

const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = ?";

const MOVE_SESSION: &str = r"
    UPDATE sessions SET token = ?
    WHERE token = ? AND expires_at > ?
";

const DELETE_EXPIRED: &str = "DELETE FROM sessions WHERE expires_at <= ?";

/// Session store over the `sessions` table.
///
/// Sessions survive process restarts, which is what lets consecutive CLI
/// invocations share one draft. Every value of a session shares the expiry
/// set when the session was first written.
///
/// # Examples
///
/// ```no_run
/// use innkeep::database::{Database, DatabaseConfig, SqliteSessionStore};
/// use innkeep::session::{DraftSession, SessionToken};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/innkeep.db")).unwrap();
/// let store = SqliteSessionStore::new(db.connection());
/// let session = DraftSession::new(&store, SessionToken::generate());
/// let draft = session.load().unwrap();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SqliteSessionStore<'a> {
    conn: &'a Connection,
    lifetime: Duration,
}

impl<'a> SqliteSessionStore<'a> {
    /// Creates a store with the default 24 hour lifetime.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            lifetime: DEFAULT_SESSION_LIFETIME,
        }
    }

    /// Sets how long new sessions live.
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Deletes every expired session value and returns how many went.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn purge_expired(&self) -> Result<usize> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        let purged = self.conn.execute(DELETE_EXPIRED, [now])?;
        if purged > 0 {
            log::debug!("Purged {purged} expired session value(s)");
        }
        Ok(purged)
    }

    fn lifetime_secs(&self) -> i64 {
        i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX)
    }
}

impl SessionStore for SqliteSessionStore<'_> {
    fn get(&self, token: &SessionToken, key: &str) -> Result<Option<Vec<u8>>> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        Ok(self
            .conn
            .query_row(SELECT_VALUE, params![token.as_str(), key, now], |row| {
                row.get(0)
            })
            .optional()?)
    }

    fn put(&self, token: &SessionToken, key: &str, value: &[u8]) -> Result<()> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        let tx = self.conn.unchecked_transaction()?;

        let existing: Option<i64> =
            tx.query_row(SELECT_EXPIRY, params![token.as_str(), now], |row| row.get(0))?;
        let expires_at = if let Some(expires_at) = existing {
            expires_at
        } else {
            // Starting over: stale values of an expired session must not revive
            tx.execute(DELETE_SESSION, [token.as_str()])?;
            now.saturating_add(self.lifetime_secs())
        };

        tx.execute(UPSERT_VALUE, params![token.as_str(), key, value, expires_at])?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&self, token: &SessionToken, key: &str) -> Result<()> {
        self.conn.execute(DELETE_VALUE, params![token.as_str(), key])?;
        Ok(())
    }

    fn destroy(&self, token: &SessionToken) -> Result<()> {
        self.conn.execute(DELETE_SESSION, [token.as_str()])?;
        Ok(())
    }

    fn renew(&self, token: &SessionToken) -> Result<SessionToken> {
        let now = systemtime_to_unix_secs(SystemTime::now())?;
        let fresh = SessionToken::generate();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(MOVE_SESSION, params![fresh.as_str(), token.as_str(), now])?;
        tx.execute(DELETE_SESSION, [token.as_str()])?;
        tx.commit()?;

        log::debug!("Renewed session token");
        Ok(fresh)
    }
}
