//! Activation flow and registration storage.
//!
//! Activation is a two-outcome transition: the server's response is only
//! trusted after the registration hash verifies locally. A successful
//! network exchange is necessary but not sufficient — a record that fails
//! verification is rejected outright.

use crate::error::{LicenseError, LicenseResult};
use crate::registration::{ActivationRecord, RegistrationVerifier};
use crate::server::LicenseServer;
use std::fs;
use std::path::{Path, PathBuf};

/// Single-record storage for the activation, as a JSON file.
///
/// The field set must round-trip losslessly: offline verification
/// recomputes the hash from the stored values, so any drift in storage
/// invalidates the registration.
pub struct RegistrationStore {
    path: PathBuf,
}

impl RegistrationStore {
    const FILE_NAME: &'static str = "registration.json";

    /// Creates a store under the user data directory for the given
    /// company and product.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no user data directory.
    pub fn new(company: &str, product: &str) -> LicenseResult<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| LicenseError::Storage("no user data directory".to_string()))?;
        Ok(Self {
            path: base.join(company).join(product).join(Self::FILE_NAME),
        })
    }

    /// Creates a store backed by an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the registration file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saves the record, creating parent directories as needed.
    pub fn save(&self, record: &ActivationRecord) -> LicenseResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| LicenseError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, json).map_err(|e| LicenseError::Storage(e.to_string()))
    }

    /// Loads the stored record, or `None` if none has been saved.
    pub fn load(&self) -> LicenseResult<Option<ActivationRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json =
            fs::read_to_string(&self.path).map_err(|e| LicenseError::Storage(e.to_string()))?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Returns true if a registration file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Deletes the registration file if it exists.
    pub fn delete(&self) -> LicenseResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| LicenseError::Storage(e.to_string()))?;
        }
        Ok(())
    }
}

/// Activates this machine with the issuing server.
///
/// Submits the machine code and user identity, verifies the returned
/// record with the caller-held verifier, and persists it only when the
/// hash checks out.
///
/// # Errors
///
/// - [`LicenseError::Network`] if the server exchange fails
/// - [`LicenseError::Verification`] if the returned record's hash does
///   not recompute — the record is untrusted and is not stored
/// - [`LicenseError::Storage`] if persisting the verified record fails
pub async fn activate<S, V>(
    server: &S,
    verifier: &V,
    store: &RegistrationStore,
    machine_code: &str,
    user_name: &str,
) -> LicenseResult<ActivationRecord>
where
    S: LicenseServer,
    V: RegistrationVerifier,
{
    let record = server.activate(machine_code, user_name).await?;

    if !verifier.verify(&record) {
        return Err(LicenseError::Verification);
    }

    store.save(&record)?;
    Ok(record)
}

/// Re-validates a previously stored activation without any network call.
///
/// # Errors
///
/// - [`LicenseError::NotActivated`] if no registration has been stored
/// - [`LicenseError::Verification`] if the stored record no longer
///   verifies (tampering or a secret mismatch)
pub fn activate_offline<V>(
    store: &RegistrationStore,
    verifier: &V,
) -> LicenseResult<ActivationRecord>
where
    V: RegistrationVerifier,
{
    let record = store.load()?.ok_or(LicenseError::NotActivated)?;

    if !verifier.verify(&record) {
        return Err(LicenseError::Verification);
    }

    Ok(record)
}
