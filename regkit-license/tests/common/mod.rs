//! Shared test helpers for licensing tests.

#![allow(dead_code)]

use regkit_license::{
    compute_registration_hash, ActivationRecord, Entitlements, LicenseError, LicenseInfo,
    LicenseResult, LicenseServer, ProductVersionInfo,
};
use serde_json::{json, Value};

/// Secret shared between the test "issuer" and the client.
pub const SECRET: &str = "s3cret";

/// Builds an entitlement map from key/value pairs.
pub fn entitlements(pairs: &[(&str, Value)]) -> Entitlements {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

/// A record as the issuer would mint it: hash computed over its own
/// fields with [`SECRET`].
pub fn issued_record() -> ActivationRecord {
    let ents = entitlements(&[("beta", json!(true)), ("seats", json!("5"))]);
    let hash = compute_registration_hash("ABC123", "2025-12-31", "2025-12-31", "", &ents, SECRET);

    ActivationRecord {
        user_name: "ada".to_string(),
        user_company: "Example Corp".to_string(),
        product_guid: "6a1f2c3d-0000-4e5f-8a9b-123456789abc".to_string(),
        machine_code: "ABC123".to_string(),
        expiration_date: "2025-12-31".to_string(),
        maint_expiration_date: "2025-12-31".to_string(),
        max_product_version: String::new(),
        latest_version: "1.1.0".to_string(),
        license_key: "LK-TEST-0001".to_string(),
        registration_hash: hash,
        entitlements: ents,
    }
}

/// Builds license info with the given latest version.
pub fn license_info(latest_version: &str) -> LicenseInfo {
    LicenseInfo {
        customer_name: "Example Corp".to_string(),
        product_guid: "6a1f2c3d-0000-4e5f-8a9b-123456789abc".to_string(),
        product_name: "Widget Studio".to_string(),
        license_count: 5,
        licenses_available: 3,
        expiration_date: "2025-12-31".to_string(),
        maint_expiration_date: "2025-12-31".to_string(),
        max_product_version: String::new(),
        latest_version: latest_version.to_string(),
        entitlements: Entitlements::new(),
    }
}

/// Fake issuing server returning canned responses.
///
/// An unset response makes the corresponding call fail with a network
/// error, which doubles as proof that a flow never performed it.
#[derive(Default)]
pub struct FakeServer {
    pub record: Option<ActivationRecord>,
    pub info: Option<LicenseInfo>,
    pub product: Option<ProductVersionInfo>,
}

impl FakeServer {
    pub fn with_record(record: ActivationRecord) -> Self {
        Self {
            record: Some(record),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }
}

impl LicenseServer for FakeServer {
    async fn activate(
        &self,
        _machine_code: &str,
        _user_name: &str,
    ) -> LicenseResult<ActivationRecord> {
        self.record
            .clone()
            .ok_or_else(|| LicenseError::Network("server unreachable".to_string()))
    }

    async fn report_installed_version(
        &self,
        _machine_code: &str,
        _installed_version: &str,
    ) -> LicenseResult<LicenseInfo> {
        self.info
            .clone()
            .ok_or_else(|| LicenseError::Network("server unreachable".to_string()))
    }

    async fn product_version(&self, _product_id: &str) -> LicenseResult<ProductVersionInfo> {
        self.product
            .clone()
            .ok_or_else(|| LicenseError::Network("server unreachable".to_string()))
    }
}
