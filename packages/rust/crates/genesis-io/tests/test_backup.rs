//! Tests for backup module - shadow copies and recovery.

use std::fs;

use tempfile::TempDir;

use genesis_io::{BackupStore, write_text};

#[test]
fn test_recover_restores_original_bytes() {
    let dir = TempDir::new().unwrap();
    let store = BackupStore::new(dir.path());

    let system = dir.path().join("System.sol");
    let stake_hub = dir.path().join("StakeHub.sol");
    let system_bytes = b"uint16 public constant l2pChainID = 0x0038;\r\n\ttrailing\t \n".to_vec();
    let stake_hub_bytes = b"uint256 public constant BREATHE_BLOCK_INTERVAL = 1 days;".to_vec();
    fs::write(&system, &system_bytes).unwrap();
    fs::write(&stake_hub, &stake_hub_bytes).unwrap();

    store.backup(&system).unwrap();
    store.backup(&stake_hub).unwrap();
    write_text(&system, "patched\n").unwrap();
    write_text(&stake_hub, "patched\n").unwrap();

    let report = store.recover().unwrap();
    assert_eq!(report.restored.len(), 2);

    assert_eq!(fs::read(&system).unwrap(), system_bytes);
    assert_eq!(fs::read(&stake_hub).unwrap(), stake_hub_bytes);
    assert!(store.list().unwrap().is_empty());
    assert!(!dir.path().join("System.bak").exists());
}

#[test]
fn test_recover_without_backups_is_noop() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("GovHub.sol");
    fs::write(&source, "contract GovHub {}").unwrap();

    let report = BackupStore::new(dir.path()).recover().unwrap();

    assert!(report.restored.is_empty());
    assert_eq!(fs::read_to_string(&source).unwrap(), "contract GovHub {}");
}

#[test]
fn test_backup_is_not_touched_by_edits() {
    let dir = TempDir::new().unwrap();
    let store = BackupStore::new(dir.path());
    let source = dir.path().join("L2PTimelock.sol");
    fs::write(&source, "INIT_MINIMAL_DELAY = 24 hours;").unwrap();

    let backup = store.backup(&source).unwrap();
    write_text(&source, "INIT_MINIMAL_DELAY = 6 hours;").unwrap();

    assert_eq!(
        fs::read_to_string(&backup).unwrap(),
        "INIT_MINIMAL_DELAY = 24 hours;"
    );
}

#[test]
fn test_second_backup_overwrites_first() {
    // Repeated runs without recovery keep only the latest state.
    let dir = TempDir::new().unwrap();
    let store = BackupStore::new(dir.path());
    let source = dir.path().join("SlashIndicator.sol");

    fs::write(&source, "pristine").unwrap();
    store.backup(&source).unwrap();
    fs::write(&source, "patched once").unwrap();
    store.backup(&source).unwrap();
    fs::write(&source, "patched twice").unwrap();

    store.recover().unwrap();
    assert_eq!(fs::read_to_string(&source).unwrap(), "patched once");
}
