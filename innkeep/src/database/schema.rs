//! Database schema definitions and SQL constants.
//!
//! Dates are stored as `YYYY-MM-DD` text, so lexical comparison in SQL is
//! calendar comparison. Timestamps are Unix seconds.

/// Current schema version for the database.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the rooms table.
pub const CREATE_ROOMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS rooms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        room_name TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// SQL statement to create the restriction kinds lookup table.
pub const CREATE_RESTRICTIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS restrictions (
        id INTEGER PRIMARY KEY,
        restriction_name TEXT NOT NULL
    )";

/// Seeds the restriction kinds.
pub const SEED_RESTRICTIONS: &str = r"
    INSERT OR IGNORE INTO restrictions (id, restriction_name)
    VALUES (1, 'Reservation'), (2, 'Owner Block')
";

/// SQL statement to create the reservations table.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL DEFAULT '',
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        room_id INTEGER NOT NULL REFERENCES rooms(id),
        processed INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        CHECK (start_date < end_date)
    )";

/// SQL statement to create the room restrictions table.
///
/// Deleting a reservation deletes the restrictions it caused.
pub const CREATE_ROOM_RESTRICTIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS room_restrictions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        room_id INTEGER NOT NULL REFERENCES rooms(id),
        reservation_id INTEGER REFERENCES reservations(id) ON DELETE CASCADE,
        restriction_id INTEGER NOT NULL REFERENCES restrictions(id),
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        CHECK (start_date < end_date)
    )";

/// SQL statement to create the sessions table.
pub const CREATE_SESSIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS sessions (
        token TEXT NOT NULL,
        key TEXT NOT NULL,
        value BLOB NOT NULL,
        expires_at INTEGER NOT NULL,
        PRIMARY KEY (token, key)
    )";

/// Index for the overlap search.
pub const CREATE_RESTRICTION_ROOM_DATES_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_room_restrictions_room_dates
    ON room_restrictions(room_id, start_date, end_date)";

/// Index for the cascade from reservations.
pub const CREATE_RESTRICTION_RESERVATION_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_room_restrictions_reservation
    ON room_restrictions(reservation_id)";

/// Index for the "new reservations" listing.
pub const CREATE_RESERVATION_PROCESSED_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_processed
    ON reservations(processed)";

/// Index for expiring sessions.
pub const CREATE_SESSION_EXPIRY_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_sessions_expires_at
    ON sessions(expires_at)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Inserts a reservation row.
pub const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (first_name, last_name, email, phone, start_date, end_date, room_id, processed, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
";

/// Inserts a room restriction row.
pub const INSERT_ROOM_RESTRICTION: &str = r"
    INSERT INTO room_restrictions
    (start_date, end_date, room_id, reservation_id, restriction_id, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

/// Counts restrictions on one room that share a night with `[?2, ?3)`.
pub const COUNT_OVERLAPPING_RESTRICTIONS: &str = r"
    SELECT COUNT(*)
    FROM room_restrictions
    WHERE room_id = ?1 AND start_date < ?3 AND end_date > ?2
";
