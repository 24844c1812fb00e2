//! Per-session key/value storage and the draft accessor built on it.
//!
//! A session is identified by an opaque [`SessionToken`]. Stores keep raw
//! bytes per `(token, key)` and expire whole sessions after a fixed lifetime;
//! an expired session reads as absent. [`DraftSession`] layers the typed
//! reservation draft on top of any store.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::draft::Draft;
use crate::error::{Error, Result};

/// Session key the reservation draft is stored under.
pub const DRAFT_KEY: &str = "reservation";

/// Default session lifetime (24 hours).
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

const MAX_TOKEN_LEN: usize = 128;

/// Opaque identifier of one visitor's session.
///
/// # Examples
///
/// ```
/// use innkeep::session::SessionToken;
///
/// let token = SessionToken::generate();
/// let parsed = SessionToken::parse(token.as_str()).unwrap();
/// assert_eq!(token, parsed);
///
/// assert!(SessionToken::parse("").is_err());
/// assert!(SessionToken::parse("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Accepts a caller-supplied token.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the token is empty, longer than 128
    /// characters, or contains anything other than ASCII letters, digits,
    /// `-` and `_`.
    pub fn parse(value: &str) -> Result<Self> {
        let valid = !value.is_empty()
            && value.len() <= MAX_TOKEN_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(Error::Validation {
                field: "session".into(),
                message: format!(
                    "session token must be 1-{MAX_TOKEN_LEN} characters of [A-Za-z0-9_-]"
                ),
            })
        }
    }

    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for per-session values.
///
/// Implementations must keep sessions isolated: a value put under one token
/// is never visible under another.
pub trait SessionStore {
    /// Reads a value. Missing keys and expired sessions read as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn get(&self, token: &SessionToken, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes a value, starting the session if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn put(&self, token: &SessionToken, key: &str, value: &[u8]) -> Result<()>;

    /// Removes one value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn remove(&self, token: &SessionToken, key: &str) -> Result<()>;

    /// Removes the whole session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn destroy(&self, token: &SessionToken) -> Result<()>;

    /// Moves the session's values to a freshly generated token and returns it.
    ///
    /// The old token stops resolving. The expiry is carried over.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn renew(&self, token: &SessionToken) -> Result<SessionToken>;
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn get(&self, token: &SessionToken, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(token, key)
    }

    fn put(&self, token: &SessionToken, key: &str, value: &[u8]) -> Result<()> {
        (**self).put(token, key, value)
    }

    fn remove(&self, token: &SessionToken, key: &str) -> Result<()> {
        (**self).remove(token, key)
    }

    fn destroy(&self, token: &SessionToken) -> Result<()> {
        (**self).destroy(token)
    }

    fn renew(&self, token: &SessionToken) -> Result<SessionToken> {
        (**self).renew(token)
    }
}

#[derive(Debug)]
struct MemorySession {
    values: HashMap<String, Vec<u8>>,
    expires_at: SystemTime,
}

/// Process-local session store.
#[derive(Debug)]
pub struct MemorySessionStore {
    lifetime: Duration,
    sessions: Mutex<HashMap<SessionToken, MemorySession>>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_LIFETIME)
    }
}

impl MemorySessionStore {
    /// Creates an empty store whose sessions live for `lifetime`.
    #[must_use]
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = SystemTime::now();
        self.lock()
            .values()
            .filter(|session| session.expires_at > now)
            .count()
    }

    /// Returns `true` if no live session exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionToken, MemorySession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Drops the session if it has expired, so callers only see live sessions
    fn live<'a>(
        sessions: &'a mut HashMap<SessionToken, MemorySession>,
        token: &SessionToken,
    ) -> Option<&'a mut MemorySession> {
        let expired = sessions
            .get(token)
            .is_some_and(|session| session.expires_at <= SystemTime::now());
        if expired {
            sessions.remove(token);
        }
        sessions.get_mut(token)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, token: &SessionToken, key: &str) -> Result<Option<Vec<u8>>> {
        let mut sessions = self.lock();
        Ok(Self::live(&mut sessions, token).and_then(|session| session.values.get(key).cloned()))
    }

    fn put(&self, token: &SessionToken, key: &str, value: &[u8]) -> Result<()> {
        let mut sessions = self.lock();
        if Self::live(&mut sessions, token).is_none() {
            sessions.insert(
                token.clone(),
                MemorySession {
                    values: HashMap::new(),
                    expires_at: SystemTime::now() + self.lifetime,
                },
            );
        }
        if let Some(session) = sessions.get_mut(token) {
            session.values.insert(key.to_string(), value.to_vec());
        }
        Ok(())
    }

    fn remove(&self, token: &SessionToken, key: &str) -> Result<()> {
        let mut sessions = self.lock();
        if let Some(session) = Self::live(&mut sessions, token) {
            session.values.remove(key);
        }
        Ok(())
    }

    fn destroy(&self, token: &SessionToken) -> Result<()> {
        self.lock().remove(token);
        Ok(())
    }

    fn renew(&self, token: &SessionToken) -> Result<SessionToken> {
        let mut sessions = self.lock();
        let fresh = SessionToken::generate();
        if Self::live(&mut sessions, token).is_some() {
            if let Some(session) = sessions.remove(token) {
                sessions.insert(fresh.clone(), session);
            }
        }
        Ok(fresh)
    }
}

/// Typed access to the reservation draft of one session.
///
/// # Examples
///
/// ```
/// use innkeep::draft::Draft;
/// use innkeep::session::{DraftSession, MemorySessionStore, SessionToken};
/// use innkeep::StayRange;
///
/// let store = MemorySessionStore::default();
/// let session = DraftSession::new(&store, SessionToken::generate());
///
/// assert_eq!(session.load().unwrap(), Draft::Empty);
///
/// let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
/// session.save(&Draft::Empty.select_range(stay)).unwrap();
/// assert_eq!(session.load().unwrap().stay(), Some(stay));
/// ```
#[derive(Debug)]
pub struct DraftSession<S> {
    store: S,
    token: SessionToken,
}

impl<S: SessionStore> DraftSession<S> {
    /// Binds a store to one session token.
    pub const fn new(store: S, token: SessionToken) -> Self {
        Self { store, token }
    }

    /// Returns the session token.
    #[must_use]
    pub const fn token(&self) -> &SessionToken {
        &self.token
    }

    /// Loads the draft. An absent or undecodable draft reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn load(&self) -> Result<Draft> {
        Ok(self
            .store
            .get(&self.token, DRAFT_KEY)?
            .map_or(Draft::Empty, |bytes| Draft::from_bytes(&bytes)))
    }

    /// Stores the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store fails.
    pub fn save(&self, draft: &Draft) -> Result<()> {
        log::debug!("Session {}: draft is now {}", self.token, draft.state_name());
        self.store.put(&self.token, DRAFT_KEY, &draft.to_bytes()?)
    }

    /// Removes the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.token, DRAFT_KEY)
    }

    /// Rotates the session token, keeping the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn renew(&mut self) -> Result<&SessionToken> {
        self.token = self.store.renew(&self.token)?;
        Ok(&self.token)
    }
}
