use std::fs;

use secrecy::SecretString;
use tempfile::TempDir;

use vista_core::crypto::EncryptedBlob;
use vista_core::storage::{FileSlotStore, Slot, SlotStore};
use vista_core::{Dataset, Vault, VistaError};

fn password(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

fn open_vault(dir: &TempDir) -> Vault<FileSlotStore> {
    let store = FileSlotStore::open(dir.path()).expect("open should succeed");
    Vault::new(store)
}

#[test]
fn test_first_run_then_reopen_round_trip() {
    let dir = TempDir::new().expect("tempdir should be available");

    let mut vault = open_vault(&dir);
    let mut dataset = vault
        .unlock(&password("anypassword"))
        .expect("first unlock should succeed");
    assert!(dataset.is_empty());
    assert!(dir.path().join("verdant-vista-salt").is_file());

    dataset.add_entry("2024-01-01", "hi");
    dataset.add_event("Dentist", "2030-01-05T09:00:00.000Z");
    vault.save(&dataset).expect("save should succeed");
    drop(vault);

    let mut reopened = open_vault(&dir);
    assert!(reopened.has_stored_data().expect("salt check should succeed"));
    let loaded = reopened
        .unlock(&password("anypassword"))
        .expect("unlock should succeed");
    assert_eq!(loaded, dataset);
}

#[test]
fn test_wrong_password_leaves_files_untouched() {
    let dir = TempDir::new().expect("tempdir should be available");
    let mut vault = open_vault(&dir);
    let mut dataset = vault.unlock(&password("correct-horse")).expect("unlock");
    dataset.add_entry("2024-01-01", "secret plans");
    vault.save(&dataset).expect("save");
    vault.lock();

    let before = fs::read(dir.path().join(Slot::Entries.key())).expect("read");
    let err = vault
        .unlock(&password("wrong-horse"))
        .expect_err("wrong password must fail");
    assert!(matches!(err, VistaError::Decryption));
    assert_eq!(err.to_string(), "Wrong password or corrupted data");

    let after = fs::read(dir.path().join(Slot::Entries.key())).expect("read");
    assert_eq!(before, after);
}

#[test]
fn test_ciphertext_on_disk_hides_plaintext() {
    let dir = TempDir::new().expect("tempdir should be available");
    let mut vault = open_vault(&dir);
    let mut dataset = vault.unlock(&password("correct-horse")).expect("unlock");
    dataset.add_entry("2024-01-01", "a very recognisable sentence");
    vault.save(&dataset).expect("save");

    let on_disk = fs::read_to_string(dir.path().join(Slot::Entries.key())).expect("read");
    assert!(!on_disk.contains("recognisable"));
    let blob = EncryptedBlob::from_json(&on_disk).expect("slot should hold a blob");
    assert_eq!(blob.iv.len(), 12);
}

#[test]
fn test_tampered_file_is_detected() {
    let dir = TempDir::new().expect("tempdir should be available");
    let mut vault = open_vault(&dir);
    let mut dataset = vault.unlock(&password("correct-horse")).expect("unlock");
    dataset.add_entry("2024-01-01", "hi");
    vault.save(&dataset).expect("save");
    vault.lock();

    let mut store = FileSlotStore::open(dir.path()).expect("open");
    let text = store.read(Slot::Entries).expect("read").expect("present");
    let mut blob = EncryptedBlob::from_json(&text).expect("blob");
    blob.ciphertext[0] ^= 0x01;
    store
        .write(Slot::Entries, &blob.to_json().expect("encode"))
        .expect("write");

    let err = vault
        .unlock(&password("correct-horse"))
        .expect_err("tampered data must fail");
    assert!(matches!(err, VistaError::Decryption));
}

#[test]
fn test_locked_save_writes_nothing() {
    let dir = TempDir::new().expect("tempdir should be available");
    let mut vault = open_vault(&dir);
    let mut dataset = vault.unlock(&password("correct-horse")).expect("unlock");
    dataset.add_entry("2024-01-01", "kept");
    vault.save(&dataset).expect("save");
    vault.lock();

    let before = fs::read(dir.path().join(Slot::Entries.key())).expect("read");
    let err = vault.save(&Dataset::default()).expect_err("locked save must fail");
    assert!(matches!(err, VistaError::NotUnlocked));
    assert_eq!(before, fs::read(dir.path().join(Slot::Entries.key())).expect("read"));
}
