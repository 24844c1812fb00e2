//! Data directory initialization.
//!
//! This module creates the innkeep data directory and database, seeds the
//! room catalog, and optionally writes a starter configuration file.

use std::fs;
use std::path::PathBuf;

use crate::config::{CONFIG_FILE_NAME, DEFAULT_ROOMS};
use crate::database::DATABASE_FILE_NAME;
use crate::error::{Error, Result};
use crate::{Database, DatabaseConfig};

/// Options for initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Overwrite existing database if it exists.
    pub overwrite: bool,
    /// Create a default configuration file.
    pub create_config: bool,
    /// Room names to seed the catalog with.
    pub rooms: Vec<String>,
}

impl InitOptions {
    /// Creates options that seed the default rooms.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
            rooms: DEFAULT_ROOMS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Sets whether to overwrite existing database.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to create default configuration file.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }

    /// Sets the room names to seed.
    #[must_use]
    pub fn with_rooms(mut self, rooms: Vec<String>) -> Self {
        self.rooms = rooms;
        self
    }
}

/// Result of initialization.
#[derive(Debug)]
pub struct InitResult {
    /// Whether the data directory was created.
    pub data_dir_created: bool,
    /// Whether the database was created or recreated.
    pub database_created: bool,
    /// Whether a configuration file was created.
    pub config_created: bool,
    /// Number of rooms added to the catalog.
    pub rooms_seeded: usize,
    /// Path to the data directory.
    pub data_dir: PathBuf,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r"# innkeep configuration
# Every setting is optional; the values shown are the defaults.

# Rooms seeded into the catalog by `innkeep init`
# rooms:
#   - General's Quarters
#   - Major's Suite

# database:
#   query_timeout_ms: 3000
#   busy_timeout_ms: 3000

# booking:
#   commit_policy: transactional   # or: sequential
#   recheck_availability: true

# session:
#   lifetime_hours: 24

# mail:
#   from: hotel-booking@mail.com
#   queue_capacity: 100
#   outbox_dir: /path/to/outbox
";

/// Initializes the innkeep data directory and database.
///
/// Running it again on an initialized directory fails unless `overwrite`
/// is set.
///
/// # Errors
///
/// Returns an error if:
/// - The data directory cannot be created
/// - The database already exists and `overwrite` is false
/// - The database cannot be initialized or seeded
/// - The configuration file cannot be written
///
/// # Examples
///
/// ```no_run
/// use innkeep::operations::init::{InitOptions, init_database};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/innkeep-test"))
///     .with_create_config(true);
///
/// let result = init_database(&options).unwrap();
/// println!("Seeded {} rooms", result.rooms_seeded);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        rooms_seeded: 0,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    let db_exists = db_path.exists();

    if db_exists && !options.overwrite {
        return Err(Error::Validation {
            field: "database".into(),
            message: format!(
                "Database already exists at {}. Use --overwrite to replace it.",
                db_path.display()
            ),
        });
    }

    if db_exists {
        fs::remove_file(&db_path)?;
        // WAL side files belong to the old database
        for suffix in ["-wal", "-shm"] {
            let side = options.data_dir.join(format!("{DATABASE_FILE_NAME}{suffix}"));
            if side.exists() {
                fs::remove_file(side)?;
            }
        }
    }

    let mut db = Database::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;
    result.rooms_seeded = db.seed_rooms(&options.rooms)?.len();

    if options.create_config {
        let config_path = options.data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    log::info!(
        "Initialized {} ({} room(s) seeded)",
        options.data_dir.display(),
        result.rooms_seeded
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use tempfile::TempDir;

    #[test]
    fn test_init_fresh_directory() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("innkeep");

        let result = init_database(&InitOptions::new(data_dir.clone())).unwrap();

        assert!(result.data_dir_created);
        assert!(result.database_created);
        assert!(!result.config_created);
        assert_eq!(result.rooms_seeded, 2);
        assert!(data_dir.join(DATABASE_FILE_NAME).exists());
    }

    #[test]
    fn test_init_refuses_existing_database() {
        let temp = TempDir::new().unwrap();
        let options = InitOptions::new(temp.path().to_path_buf());
        init_database(&options).unwrap();

        let err = init_database(&options).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_init_overwrite_starts_clean() {
        let temp = TempDir::new().unwrap();
        let options = InitOptions::new(temp.path().to_path_buf());
        init_database(&options).unwrap();

        let result = init_database(
            &options
                .clone()
                .with_overwrite(true)
                .with_rooms(vec!["Only Room".into()]),
        )
        .unwrap();
        assert_eq!(result.rooms_seeded, 1);

        let db = Database::open(DatabaseConfig::new(temp.path().join(DATABASE_FILE_NAME))).unwrap();
        let rooms = Database::list_rooms(db.connection()).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].name, "Only Room");
    }

    #[test]
    fn test_init_config_template_parses() {
        let temp = TempDir::new().unwrap();
        let result =
            init_database(&InitOptions::new(temp.path().to_path_buf()).with_create_config(true))
                .unwrap();
        assert!(result.config_created);

        let source = ConfigLoader::load_data_dir_config(temp.path())
            .unwrap()
            .unwrap();
        assert_eq!(source.config, crate::Config::default());
    }
}
