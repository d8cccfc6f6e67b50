//! Update check flow.
//!
//! Compares the installed version against the *latest available* version,
//! not the max-allowed version — release currency and the entitlement
//! ceiling are independent policies.

use crate::error::LicenseResult;
use crate::server::LicenseServer;
use crate::version::compare_versions;
use std::cmp::Ordering;

/// Result of an update check; derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    /// True if a newer version is available.
    pub update_available: bool,
    /// The version reported as installed.
    pub current_version: String,
    /// The latest version the issuer knows of.
    pub latest_version: String,
    /// Download location, present only when an update is available.
    pub download_url: Option<String>,
}

/// Reports the installed version and checks whether an update exists.
///
/// The download location is resolved only when the installed version is
/// behind the latest; when up to date the server is not asked for it.
///
/// # Errors
///
/// Returns [`crate::LicenseError::Network`] if either server exchange
/// fails.
pub async fn check_for_update<S>(
    server: &S,
    machine_code: &str,
    installed_version: &str,
) -> LicenseResult<UpdateInfo>
where
    S: LicenseServer,
{
    let info = server
        .report_installed_version(machine_code, installed_version)
        .await?;

    if compare_versions(installed_version, &info.latest_version) != Ordering::Less {
        return Ok(UpdateInfo {
            update_available: false,
            current_version: installed_version.to_string(),
            latest_version: info.latest_version,
            download_url: None,
        });
    }

    let product = server.product_version(&info.product_guid).await?;

    Ok(UpdateInfo {
        update_available: true,
        current_version: installed_version.to_string(),
        latest_version: info.latest_version,
        download_url: Some(product.download_url),
    })
}
