mod common;

use common::{issued_record, FakeServer, SECRET};
use regkit_license::{
    activate, activate_offline, LicenseError, RegistrationStore, SharedSecretVerifier,
};

fn temp_store(dir: &tempfile::TempDir) -> RegistrationStore {
    RegistrationStore::at_path(dir.path().join("registration.json"))
}

// ── Activation flow ──────────────────────────────────────────────

#[tokio::test]
async fn activation_verifies_and_stores() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let server = FakeServer::with_record(issued_record());
    let verifier = SharedSecretVerifier::new(SECRET);

    let record = activate(&server, &verifier, &store, "ABC123", "ada")
        .await
        .unwrap();

    assert_eq!(record.machine_code, "ABC123");
    assert!(store.exists());
    assert_eq!(store.load().unwrap().unwrap(), record);
}

#[tokio::test]
async fn tampered_response_is_rejected_and_not_stored() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);

    let mut record = issued_record();
    record.max_product_version = "9.9".to_string(); // hash no longer matches
    let server = FakeServer::with_record(record);
    let verifier = SharedSecretVerifier::new(SECRET);

    let err = activate(&server, &verifier, &store, "ABC123", "ada")
        .await
        .unwrap_err();

    assert!(matches!(err, LicenseError::Verification));
    assert!(!store.exists());
}

#[tokio::test]
async fn secret_mismatch_is_a_verification_failure() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let server = FakeServer::with_record(issued_record());
    let verifier = SharedSecretVerifier::new("wrong-secret");

    let err = activate(&server, &verifier, &store, "ABC123", "ada")
        .await
        .unwrap_err();

    assert!(matches!(err, LicenseError::Verification));
}

#[tokio::test]
async fn unreachable_server_is_a_network_failure() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let server = FakeServer::unreachable();
    let verifier = SharedSecretVerifier::new(SECRET);

    let err = activate(&server, &verifier, &store, "ABC123", "ada")
        .await
        .unwrap_err();

    assert!(matches!(err, LicenseError::Network(_)));
    assert!(!store.exists());
}

// ── Offline re-validation ────────────────────────────────────────

#[tokio::test]
async fn offline_activation_revalidates_stored_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let server = FakeServer::with_record(issued_record());
    let verifier = SharedSecretVerifier::new(SECRET);

    activate(&server, &verifier, &store, "ABC123", "ada")
        .await
        .unwrap();

    let record = activate_offline(&store, &verifier).unwrap();
    assert_eq!(record.machine_code, "ABC123");
}

#[test]
fn offline_without_registration_is_not_activated() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let verifier = SharedSecretVerifier::new(SECRET);

    let err = activate_offline(&store, &verifier).unwrap_err();
    assert!(matches!(err, LicenseError::NotActivated));
}

#[test]
fn offline_detects_tampered_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    let verifier = SharedSecretVerifier::new(SECRET);

    let mut record = issued_record();
    store.save(&record).unwrap();

    // Edit the stored copy the way a user hunting for more seats would.
    record.entitlements.insert("seats".into(), "500".into());
    store.save(&record).unwrap();

    let err = activate_offline(&store, &verifier).unwrap_err();
    assert!(matches!(err, LicenseError::Verification));
}

// ── Store ────────────────────────────────────────────────────────

#[test]
fn store_roundtrip_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);

    let record = issued_record();
    store.save(&record).unwrap();
    let loaded = store.load().unwrap().unwrap();

    assert_eq!(loaded, record);
    assert_eq!(loaded.registration_hash, record.registration_hash);
    assert_eq!(loaded.entitlements, record.entitlements);
}

#[test]
fn store_load_missing_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    assert!(!store.exists());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn store_delete_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);

    store.save(&issued_record()).unwrap();
    assert!(store.exists());

    store.delete().unwrap();
    assert!(!store.exists());

    // Deleting again is a no-op.
    store.delete().unwrap();
}

#[test]
fn store_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = RegistrationStore::at_path(dir.path().join("a").join("b").join("reg.json"));
    store.save(&issued_record()).unwrap();
    assert!(store.exists());
}

#[test]
fn store_file_does_not_contain_the_secret() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    store.save(&issued_record()).unwrap();

    let contents = std::fs::read_to_string(store.path()).unwrap();
    assert!(!contents.contains(SECRET));
}

#[test]
fn corrupt_store_surfaces_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);
    std::fs::write(store.path(), "not json").unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(err, LicenseError::Serialization(_)));
}
