//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for the booking flow
//! - Direct database access for failure injection

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that would leak the developer's settings into a test.
const INNKEEP_ENV_VARS: &[&str] = &[
    "INNKEEP_DATA_DIR",
    "INNKEEP_SESSION",
    "INNKEEP_BUSY_TIMEOUT",
    "INNKEEP_DISABLE_AUTOINIT",
    "INNKEEP_OUTPUT_FORMAT",
    "INNKEEP_ROOMS",
    "INNKEEP_QUERY_TIMEOUT_MS",
    "INNKEEP_BUSY_TIMEOUT_MS",
    "INNKEEP_COMMIT_POLICY",
    "INNKEEP_RECHECK_AVAILABILITY",
    "INNKEEP_SESSION_LIFETIME_HOURS",
    "INNKEEP_MAIL_FROM",
    "INNKEEP_MAIL_QUEUE_CAPACITY",
    "INNKEEP_MAIL_OUTBOX_DIR",
];

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the innkeep data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; innkeep creates it on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("innkeep-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Create a test environment whose catalog holds `rooms`, in order.
    pub fn with_rooms(rooms: &[&str]) -> Self {
        let env = Self::new();
        let mut cmd = env.command();
        cmd.arg("init");
        for room in rooms {
            cmd.arg("--room").arg(room);
        }
        cmd.assert().success();
        env
    }

    /// Get a bare command builder without pre-configured flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("innkeep").expect("Failed to find innkeep binary");
        for var in INNKEEP_ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Get a command builder bound to one session.
    pub fn session(&self, token: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("--session").arg(token);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Path to the database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("innkeep.db")
    }

    /// Write `contents` to the data directory's config file.
    pub fn write_config(&self, contents: &str) {
        std::fs::create_dir_all(&self.data_dir).expect("Failed to create data dir");
        std::fs::write(self.data_dir.join("config.yaml"), contents)
            .expect("Failed to write config");
    }

    /// Search, choose a room and submit a valid form in one session.
    ///
    /// Returns the stdout of the final submit.
    pub fn book(&self, token: &str, room_id: i64, start: &str, end: &str) -> String {
        self.session(token)
            .args(["book-room", "--id", &room_id.to_string()])
            .args(["--start", start, "--end", end])
            .assert()
            .success();

        let output = self
            .session(token)
            .args(guest_args())
            .output()
            .expect("Failed to run make-reservation");

        assert!(
            output.status.success(),
            "make-reservation failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }

    /// Run `admin list --format json` and return the parsed rows.
    pub fn admin_list_json(&self, new_only: bool) -> Vec<serde_json::Value> {
        let mut cmd = self.command();
        cmd.args(["admin", "list", "--format", "json"]);
        if new_only {
            cmd.arg("--new");
        }
        let output = cmd.output().expect("Failed to run admin list");
        assert!(
            output.status.success(),
            "admin list failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("admin list did not print JSON")
    }

    /// Make every room restriction insert fail.
    pub fn fail_restriction_inserts(&self) {
        let conn = rusqlite::Connection::open(self.db_path()).expect("Failed to open database");
        conn.execute_batch(
            "CREATE TRIGGER fail_restrictions BEFORE INSERT ON room_restrictions
             BEGIN SELECT RAISE(ABORT, 'restriction insert rejected'); END;",
        )
        .expect("Failed to install trigger");
    }

    /// Removes the room restrictions table so every availability query fails.
    #[allow(dead_code)]
    pub fn break_availability_index(&self) {
        let conn = rusqlite::Connection::open(self.db_path()).expect("Failed to open database");
        conn.execute_batch("DROP TABLE room_restrictions")
            .expect("Failed to drop table");
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Arguments for a valid `make-reservation` submit.
#[allow(dead_code)]
pub fn guest_args() -> [&'static str; 9] {
    [
        "make-reservation",
        "--first-name",
        "Alice",
        "--last-name",
        "Lee",
        "--email",
        "alice@example.com",
        "--phone",
        "555-0100",
    ]
}
