//! Integration tests for the `admin` commands.
//!
//! These tests verify:
//! - Listing all and new reservations in every output format
//! - Showing, updating, processing and deleting reservations
//! - Owner blocks and the restrictions view
//! - Error reporting for unknown ids

mod common;

use common::TestEnv;
use predicates::prelude::*;

fn env_with_bookings() -> TestEnv {
    let env = TestEnv::with_rooms(&["Attic", "Cellar"]);
    env.book("s1", 1, "2024-06-01", "2024-06-04");
    env.book("s2", 2, "2024-06-10", "2024-06-12");
    env
}

#[test]
fn test_list_formats() {
    let env = env_with_bookings();

    env.command()
        .args(["admin", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ID\tLAST_NAME"))
        .stdout(predicate::str::contains("Attic"))
        .stdout(predicate::str::contains("Cellar"));

    env.command()
        .args(["admin", "list", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,last_name,first_name"))
        .stdout(predicate::str::contains("2024-06-10,2024-06-12,no"));

    env.command()
        .args(["admin", "list", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice@example.com\t555-0100\tAttic"));

    let rows = env.admin_list_json(false);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["first_name"], "Alice");
    assert_eq!(rows[0]["processed"], false);
}

#[test]
fn test_show_reservation() {
    let env = env_with_bookings();

    env.command()
        .args(["admin", "show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reservation 2"))
        .stdout(predicate::str::contains("Room:       Cellar (2)"))
        .stdout(predicate::str::contains("Processed:  no"));

    env.command()
        .args(["admin", "show", "99"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("reservation 99"));
}

#[test]
fn test_process_moves_reservation_out_of_new() {
    let env = env_with_bookings();
    assert_eq!(env.admin_list_json(true).len(), 2);

    env.command()
        .args(["admin", "process", "1", "--src", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reservation marked as processed"))
        .stdout(predicate::str::contains("Redirect: /admin/reservations-new"));

    let new_rows = env.admin_list_json(true);
    assert_eq!(new_rows.len(), 1);
    assert_eq!(new_rows[0]["id"], 2);
    assert_eq!(env.admin_list_json(false).len(), 2);
}

#[test]
fn test_update_changes_only_given_fields() {
    let env = env_with_bookings();

    env.command()
        .args(["admin", "update", "1", "--last-name", "Smith", "--phone", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes saved"))
        .stdout(predicate::str::contains("Redirect: /admin/reservations-all"));

    env.command()
        .args(["admin", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Last name:  Smith"))
        .stdout(predicate::str::contains("First name: Alice"))
        .stdout(predicate::str::contains("Email:      alice@example.com"));
}

#[test]
fn test_update_rejects_invalid_fields() {
    let env = env_with_bookings();

    env.command()
        .args(["admin", "update", "1", "--email", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("email"));

    env.command()
        .args(["admin", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice@example.com"));
}

#[test]
fn test_delete_frees_the_room() {
    let env = env_with_bookings();

    env.session("probe")
        .args(["search", "--start", "2024-06-02", "--end", "2024-06-03"])
        .args(["--room-id", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""ok":false"#));

    env.command()
        .args(["admin", "delete", "1", "--src", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reservation deleted"));

    env.session("probe")
        .args(["search", "--start", "2024-06-02", "--end", "2024-06-03"])
        .args(["--room-id", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""ok":true"#));

    env.command()
        .args(["admin", "delete", "1"])
        .assert()
        .code(4);
}

#[test]
fn test_unknown_list_source_is_rejected() {
    let env = env_with_bookings();

    env.command()
        .args(["admin", "process", "1", "--src", "old"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown reservation list"));
}

#[test]
fn test_owner_block_lifecycle() {
    let env = TestEnv::with_rooms(&["Attic", "Cellar"]);
    env.book("s1", 1, "2024-06-01", "2024-06-04");

    env.command()
        .args(["admin", "block", "--room", "2"])
        .args(["--start", "2024-06-01", "--end", "2024-06-08"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Room 2 blocked"));

    env.session("visitor")
        .args(["search", "--start", "2024-06-02", "--end", "2024-06-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No availability"));

    env.command()
        .args(["admin", "restrictions", "--room", "1"])
        .args(["--start", "2024-05-01", "--end", "2024-07-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Attic: 1 restriction(s)"))
        .stdout(predicate::str::contains("reservation 1"));

    let output = env
        .command()
        .args(["admin", "restrictions", "--room", "2"])
        .args(["--start", "2024-05-01", "--end", "2024-07-01"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("owner block"), "{stdout}");
    let block_id = stdout
        .lines()
        .nth(1)
        .and_then(|line| line.split_whitespace().next())
        .expect("restriction line");

    // A reservation's restriction is not an owner block.
    env.command()
        .args(["admin", "unblock", "1"])
        .assert()
        .code(4);

    env.command()
        .args(["admin", "unblock", block_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));

    env.session("visitor")
        .args(["search", "--start", "2024-06-02", "--end", "2024-06-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cellar"));
}
