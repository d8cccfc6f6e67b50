use regkit_license::LicenseError;

#[test]
fn error_display_network() {
    let err = LicenseError::Network("timeout".into());
    let msg = format!("{err}");
    assert!(msg.contains("network"));
    assert!(msg.contains("timeout"));
}

#[test]
fn error_display_verification() {
    let err = LicenseError::Verification;
    assert!(format!("{err}").contains("hash mismatch"));
}

#[test]
fn error_display_not_activated() {
    let err = LicenseError::NotActivated;
    assert!(format!("{err}").contains("not activated"));
}

#[test]
fn error_display_storage() {
    let err = LicenseError::Storage("disk full".into());
    assert!(format!("{err}").contains("storage"));
}

#[test]
fn error_from_serde_json() {
    let serde_err: Result<serde_json::Value, _> = serde_json::from_str("not json");
    let license_err: LicenseError = serde_err.unwrap_err().into();
    assert!(format!("{license_err}").contains("serialization"));
}

#[test]
fn verification_and_network_are_distinct() {
    // Callers branch on this distinction: refuse to run vs. offer retry.
    assert!(!matches!(
        LicenseError::Verification,
        LicenseError::Network(_)
    ));
}

#[test]
fn error_is_debug() {
    let err = LicenseError::Verification;
    let _ = format!("{err:?}");
}
