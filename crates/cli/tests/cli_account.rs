//! CLI integration tests for `ecsign account`, `sign` and `verify`.
//!
//! These tests verify that:
//! - `account create` writes a keystore and reports its address
//! - `sign` followed by `verify` succeeds, and verify exits 1 on a mismatch
//! - Wrong passphrases and malformed inputs fail with a readable error

#![allow(deprecated)] // Command::cargo_bin is deprecated but still works

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PASSPHRASE: &str = "correct horse battery";

/// Temp home with a cheap scrypt cost and a passphrase file
fn setup_home() -> (TempDir, PathBuf) {
    let home = TempDir::new().expect("failed to create temp home");
    fs::create_dir_all(home.path().join("config")).unwrap();
    fs::write(
        home.path().join("config").join("client.toml"),
        "output = \"text\"\n\n[kdf]\nn = 1024\nr = 8\np = 1\ndklen = 32\n",
    )
    .unwrap();

    let passphrase_file = home.path().join("passphrase.txt");
    fs::write(&passphrase_file, format!("{}\n", PASSPHRASE)).unwrap();

    (home, passphrase_file)
}

fn ecsign(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ecsign").unwrap();
    cmd.env_remove("RUST_LOG").arg("--home").arg(home);
    cmd
}

/// Create an account and return (address, keystore path)
fn create_account(home: &Path, passphrase_file: &Path) -> (String, PathBuf) {
    let output = ecsign(home)
        .args(["--output", "json", "account", "create", "--passphrase-file"])
        .arg(passphrase_file)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    (
        value["address"].as_str().unwrap().to_string(),
        PathBuf::from(value["keystore"].as_str().unwrap()),
    )
}

fn sign(home: &Path, keystore: &Path, passphrase_file: &Path, message: &str) -> String {
    let output = ecsign(home)
        .arg("sign")
        .arg("--keystore")
        .arg(keystore)
        .args(["--message", message, "--passphrase-file"])
        .arg(passphrase_file)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

#[test]
fn test_create_writes_keystore() {
    let (home, passphrase_file) = setup_home();
    let (address, keystore) = create_account(home.path(), &passphrase_file);

    assert!(address.starts_with("0x"));
    assert_eq!(address.len(), 42);
    assert!(keystore.starts_with(home.path().join("keystore")));

    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&keystore).unwrap()).unwrap();
    assert_eq!(record["version"], 3);
    assert_eq!(format!("0x{}", record["address"].as_str().unwrap()), address);
    assert_eq!(record["crypto"]["kdfparams"]["n"], 1024);
}

#[test]
fn test_account_address_needs_no_passphrase() {
    let (home, passphrase_file) = setup_home();
    let (address, keystore) = create_account(home.path(), &passphrase_file);

    ecsign(home.path())
        .args(["account", "address"])
        .arg(&keystore)
        .assert()
        .success()
        .stdout(predicate::str::contains(address));
}

#[test]
fn test_account_list() {
    let (home, passphrase_file) = setup_home();

    ecsign(home.path())
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No keystores found"));

    let (address, _) = create_account(home.path(), &passphrase_file);
    fs::write(home.path().join("keystore").join("notes.json"), "{}").unwrap();

    ecsign(home.path())
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(address))
        .stdout(predicate::str::contains("notes.json").not());
}

#[test]
fn test_sign_then_verify() {
    let (home, passphrase_file) = setup_home();
    let (address, keystore) = create_account(home.path(), &passphrase_file);

    let signature = sign(home.path(), &keystore, &passphrase_file, "bla");
    assert!(signature.starts_with("0x"));
    assert_eq!(signature.len(), 132);

    ecsign(home.path())
        .args(["verify", "--message", "bla", "--signature", &signature])
        .args(["--address", &address.to_uppercase().replacen("0X", "0x", 1)])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));

    ecsign(home.path())
        .args(["verify", "--message", "blb", "--signature", &signature])
        .args(["--address", &address])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalid"));
}

#[test]
fn test_sign_message_file() {
    let (home, passphrase_file) = setup_home();
    let (address, keystore) = create_account(home.path(), &passphrase_file);

    let message_file = home.path().join("message.txt");
    fs::write(&message_file, "bla").unwrap();

    let output = ecsign(home.path())
        .arg("sign")
        .arg("--keystore")
        .arg(&keystore)
        .arg("--message-file")
        .arg(&message_file)
        .arg("--passphrase-file")
        .arg(&passphrase_file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let from_file = String::from_utf8(output.stdout).unwrap().trim().to_string();

    // RFC 6979 signing is deterministic
    assert_eq!(from_file, sign(home.path(), &keystore, &passphrase_file, "bla"));

    ecsign(home.path())
        .args(["--output", "json", "verify", "--signature", &from_file, "--address", &address])
        .arg("--message-file")
        .arg(&message_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": true"));
}

#[test]
fn test_wrong_passphrase_fails() {
    let (home, passphrase_file) = setup_home();
    let (_, keystore) = create_account(home.path(), &passphrase_file);

    let wrong = home.path().join("wrong.txt");
    fs::write(&wrong, "not the passphrase").unwrap();

    ecsign(home.path())
        .arg("sign")
        .arg("--keystore")
        .arg(&keystore)
        .args(["--message", "bla", "--passphrase-file"])
        .arg(&wrong)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid password"));
}

#[test]
fn test_short_passphrase_rejected_on_create() {
    let (home, _) = setup_home();
    let short = home.path().join("short.txt");
    fs::write(&short, "gft").unwrap();

    ecsign(home.path())
        .args(["account", "create", "--passphrase-file"])
        .arg(&short)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
}

#[test]
fn test_verify_malformed_inputs() {
    let (home, _) = setup_home();
    let signature = format!("0x{}", "11".repeat(65));

    ecsign(home.path())
        .args(["verify", "--message", "bla", "--signature", &signature])
        .args(["--address", "0x1234"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid address"));

    ecsign(home.path())
        .args(["verify", "--message", "bla", "--signature", "0xdeadbeef"])
        .args(["--address", "0x0000000000000000000000000000000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("signature recovery failed"));
}

#[test]
fn test_message_required() {
    let (home, _) = setup_home();

    ecsign(home.path())
        .args(["verify", "--signature", "0x00", "--address", "0x00"])
        .assert()
        .failure();
}
