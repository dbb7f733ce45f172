use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(cargo_bin!("receipt-processor"));
    cmd.arg("--backend")
        .arg("rocksdb")
        .arg("--db-path")
        .arg(dir.path().join("receipts_db"))
        .arg("process")
        .arg("tests/fixtures/target.json");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "'storage-rocksdb' feature is not enabled. Falling back to in-memory storage.",
        ));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_points_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("receipts_db");

    let output = Command::new(cargo_bin!("receipt-processor"))
        .arg("--backend")
        .arg("rocksdb")
        .arg("--db-path")
        .arg(&db_path)
        .arg("process")
        .arg("tests/fixtures/corner_market.json")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    let id = String::from_utf8_lossy(&output.stdout).trim().to_string();

    let mut cmd = Command::new(cargo_bin!("receipt-processor"));
    cmd.arg("--backend")
        .arg("rocksdb")
        .arg("--db-path")
        .arg(&db_path)
        .arg("points")
        .arg(&id);

    cmd.assert()
        .success()
        .stdout(predicate::str::diff("109\n"))
        .stderr(predicate::str::contains("WARN").not());
}
