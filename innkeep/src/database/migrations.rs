//! Database schema management and migrations.
//!
//! This module handles database schema initialization and version checking.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_METADATA_TABLE, CREATE_RESERVATIONS_TABLE, CREATE_RESERVATION_PROCESSED_INDEX,
    CREATE_RESTRICTIONS_TABLE, CREATE_RESTRICTION_RESERVATION_INDEX,
    CREATE_RESTRICTION_ROOM_DATES_INDEX, CREATE_ROOMS_TABLE, CREATE_ROOM_RESTRICTIONS_TABLE,
    CREATE_SESSIONS_TABLE, CREATE_SESSION_EXPIRY_INDEX, CURRENT_SCHEMA_VERSION,
    INSERT_SCHEMA_VERSION, SEED_RESTRICTIONS, SELECT_SCHEMA_VERSION,
};

/// Initializes the database schema.
///
/// Creates all tables, indices, and seed rows, then records the schema
/// version. Runs in one transaction so a half-built schema is never left
/// behind.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use innkeep::database::migrations::initialize_schema;
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute(CREATE_METADATA_TABLE, [])?;
    tx.execute(CREATE_ROOMS_TABLE, [])?;
    tx.execute(CREATE_RESTRICTIONS_TABLE, [])?;
    tx.execute(SEED_RESTRICTIONS, [])?;
    tx.execute(CREATE_RESERVATIONS_TABLE, [])?;
    tx.execute(CREATE_ROOM_RESTRICTIONS_TABLE, [])?;
    tx.execute(CREATE_SESSIONS_TABLE, [])?;

    tx.execute(CREATE_RESTRICTION_ROOM_DATES_INDEX, [])?;
    tx.execute(CREATE_RESTRICTION_RESERVATION_INDEX, [])?;
    tx.execute(CREATE_RESERVATION_PROCESSED_INDEX, [])?;
    tx.execute(CREATE_SESSION_EXPIRY_INDEX, [])?;

    tx.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;

    tx.commit()?;
    log::info!("Initialized database schema version {CURRENT_SCHEMA_VERSION}");
    Ok(())
}

/// Gets the current schema version from the database.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than
/// "no rows returned" or a missing metadata table (both mean version 0).
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => {
            // "no such table: metadata" on a fresh file
            if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = e {
                if sqlite_err.code == rusqlite::ErrorCode::Unknown {
                    return Ok(0);
                }
            }
            Err(e.into())
        }
    }
}

/// Verifies the schema version without initializing anything.
///
/// # Errors
///
/// Returns `Error::UnsupportedSchemaVersion` unless the stored version is
/// exactly the current one.
pub fn check_schema_version(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;
    if version == CURRENT_SCHEMA_VERSION {
        Ok(())
    } else {
        Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        })
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// This function:
/// 1. Checks the current schema version
/// 2. If version is 0, initializes the schema
/// 3. If version differs from the current one, returns an error
///
/// # Errors
///
/// Returns an error if:
/// - Schema version is incompatible (too old or too new)
/// - Schema initialization fails
/// - Database queries fail
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }

    Ok(())
}
