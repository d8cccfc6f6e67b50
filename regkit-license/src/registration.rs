//! Canonical registration encoding and tamper-evident hashing.
//!
//! The issuing server and this client must compute identical bytes for the
//! same registration, so every step here is fixed by the shared protocol:
//!
//! 1. `machineCode|expDate|maintDate|maxVersion` joined with `|`
//! 2. `|key=value` per entitlement, keys in ascending byte-wise order
//! 3. the shared secret appended directly (no separator)
//! 4. UTF-16 little-endian encoding, no byte-order mark
//! 5. SHA-1 digest, standard base64 with padding
//!
//! UTF-8 or any other encoding produces a different, incompatible hash.
//! Dates are literal `yyyy-mm-dd` text and are hashed as received, never
//! reparsed or reformatted.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

/// Named features and limits granted by a license.
///
/// Values must be scalars (string, number, boolean, or null). The map is
/// ordered so the canonical form is independent of insertion order.
pub type Entitlements = BTreeMap<String, Value>;

/// A server-issued activation, immutable after receipt.
///
/// Field names follow the issuing server's JSON wire format. Any mutation
/// of the hashed fields invalidates [`ActivationRecord::registration_hash`]
/// by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationRecord {
    /// Name of the user the activation was issued to.
    #[serde(rename = "UserName")]
    pub user_name: String,
    /// Company of the user.
    #[serde(rename = "UserCompany")]
    pub user_company: String,
    /// Product identifier.
    #[serde(rename = "ProductGUID")]
    pub product_guid: String,
    /// Machine code the license is bound to.
    #[serde(rename = "MachineCode")]
    pub machine_code: String,
    /// License expiration date, `yyyy-mm-dd`.
    #[serde(rename = "ExpirationDate")]
    pub expiration_date: String,
    /// Maintenance expiration date, `yyyy-mm-dd`.
    #[serde(rename = "MaintExpirationDate")]
    pub maint_expiration_date: String,
    /// Maximum allowed product version; empty means unrestricted.
    #[serde(rename = "MaxProductVersion")]
    pub max_product_version: String,
    /// Latest released product version at issuance time.
    #[serde(rename = "LatestVersion")]
    pub latest_version: String,
    /// The license key.
    #[serde(rename = "LicenseKey")]
    pub license_key: String,
    /// Tamper-evident hash computed by the issuer.
    #[serde(rename = "RegistrationHash")]
    pub registration_hash: String,
    /// Entitlements granted by the license.
    #[serde(rename = "Features", default)]
    pub entitlements: Entitlements,
}

impl ActivationRecord {
    /// Returns the expiration date, or `None` if it is not `yyyy-mm-dd`.
    #[must_use]
    pub fn expires_on(&self) -> Option<NaiveDate> {
        parse_date(&self.expiration_date)
    }

    /// Returns the maintenance expiration date, or `None` if unparsable.
    #[must_use]
    pub fn maintenance_expires_on(&self) -> Option<NaiveDate> {
        parse_date(&self.maint_expiration_date)
    }

    /// Returns true if the license expiration date has passed.
    ///
    /// An unparsable date is treated as not expired, consistent with the
    /// lenient version policy: malformed data degrades, it never locks out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        match self.expires_on() {
            Some(date) => date < chrono::Utc::now().date_naive(),
            None => false,
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Builds the pipe-delimited canonical string for hash computation.
///
/// Format: `machineCode|expDate|maintDate|maxVersion|Key1=Value1|...`
/// with entitlement keys in ascending byte-wise order.
///
/// # Panics
///
/// In debug builds, panics if an entitlement key contains `|` or `=`;
/// such keys make the canonical form ambiguous and are a contract
/// violation by the caller, not a recoverable condition.
#[must_use]
pub fn canonical_registration_string(
    machine_code: &str,
    expiration_date: &str,
    maint_expiration_date: &str,
    max_product_version: &str,
    entitlements: &Entitlements,
) -> String {
    let mut text = String::with_capacity(64);
    text.push_str(machine_code);
    text.push('|');
    text.push_str(expiration_date);
    text.push('|');
    text.push_str(maint_expiration_date);
    text.push('|');
    text.push_str(max_product_version);

    // BTreeMap iterates keys in ascending byte-wise order.
    for (key, value) in entitlements {
        debug_assert!(
            !key.contains(['|', '=']),
            "entitlement key {key:?} contains a reserved separator"
        );
        text.push('|');
        text.push_str(key);
        text.push('=');
        text.push_str(&scalar_text(value));
    }

    text
}

/// Plain textual form of a scalar entitlement value.
///
/// Strings are taken verbatim, numbers keep full precision, booleans are
/// `true`/`false`, null is the empty string. Non-scalar values are a
/// caller contract violation.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => {
            debug_assert!(false, "non-scalar entitlement value: {other}");
            other.to_string()
        }
    }
}

/// Computes the tamper-evident registration hash.
///
/// `base64(SHA1(UTF16LE(canonical + secret)))`. The secret is appended
/// with no separator and never appears in the record or on the wire.
#[must_use]
pub fn compute_registration_hash(
    machine_code: &str,
    expiration_date: &str,
    maint_expiration_date: &str,
    max_product_version: &str,
    entitlements: &Entitlements,
    secret: &str,
) -> String {
    let mut text = canonical_registration_string(
        machine_code,
        expiration_date,
        maint_expiration_date,
        max_product_version,
        entitlements,
    );
    text.push_str(secret);

    // UTF-16LE without BOM, exactly as the issuing server encodes it.
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }

    let digest = Sha1::digest(&bytes);
    BASE64.encode(digest)
}

/// Strategy for computing and checking a registration hash.
///
/// The shared-secret scheme is the only strategy today; this seam exists
/// so an asymmetric-signature strategy can replace it without touching
/// the activation flow.
pub trait RegistrationVerifier {
    /// Recomputes the hash over the record's own fields.
    fn compute(&self, record: &ActivationRecord) -> String;

    /// Returns true iff the recomputed hash equals the issued one.
    ///
    /// Plain comparison: this is tamper detection on an artifact the
    /// caller already holds, not a network-facing secret check.
    fn verify(&self, record: &ActivationRecord) -> bool {
        self.compute(record) == record.registration_hash
    }
}

/// Shared-secret verifier matching the issuing server's hash.
pub struct SharedSecretVerifier {
    secret: String,
}

impl SharedSecretVerifier {
    /// Creates a verifier holding the secret shared with the issuer.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl RegistrationVerifier for SharedSecretVerifier {
    fn compute(&self, record: &ActivationRecord) -> String {
        compute_registration_hash(
            &record.machine_code,
            &record.expiration_date,
            &record.maint_expiration_date,
            &record.max_product_version,
            &record.entitlements,
            &self.secret,
        )
    }
}
