//! Interface to the issuing server.
//!
//! The core consumes the server through [`LicenseServer`] so flows can be
//! tested against a fake; the HTTP implementation lives behind the
//! `online` feature. No retry or backoff policy here — callers compose
//! retries around the flows.

use crate::error::LicenseResult;
use crate::registration::{ActivationRecord, Entitlements};
use serde::{Deserialize, Serialize};

/// Issuer-reported license snapshot, replaced wholesale on each query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Customer the license belongs to.
    #[serde(rename = "CustomerName")]
    pub customer_name: String,
    /// Product identifier.
    #[serde(rename = "ProductGUID")]
    pub product_guid: String,
    /// Product display name.
    #[serde(rename = "ProductName")]
    pub product_name: String,
    /// Total licensed seats.
    #[serde(rename = "LicenseCount")]
    pub license_count: u32,
    /// Seats not yet bound to a machine.
    #[serde(rename = "LicensesAvailable")]
    pub licenses_available: u32,
    /// License expiration date, `yyyy-mm-dd`.
    #[serde(rename = "ExpirationDate")]
    pub expiration_date: String,
    /// Maintenance expiration date, `yyyy-mm-dd`.
    #[serde(rename = "MaintExpirationDate")]
    pub maint_expiration_date: String,
    /// Maximum allowed product version; empty means unrestricted.
    #[serde(rename = "MaxProductVersion")]
    pub max_product_version: String,
    /// Latest released product version.
    #[serde(rename = "LatestVersion")]
    pub latest_version: String,
    /// Entitlements granted by the license.
    #[serde(rename = "Features", default)]
    pub entitlements: Entitlements,
}

/// Latest release information for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVersionInfo {
    /// Product identifier.
    #[serde(rename = "ProductGUID")]
    pub product_guid: String,
    /// Latest released version.
    #[serde(rename = "LatestVersion")]
    pub latest_version: String,
    /// Where the latest release can be downloaded.
    #[serde(rename = "DownloadURL")]
    pub download_url: String,
}

/// Logical operations of the issuing server consumed by this core.
///
/// Implementations hold whatever credentials the transport needs (the
/// license key travels with the client, not with each call).
#[allow(async_fn_in_trait)]
pub trait LicenseServer {
    /// Requests activation for a machine, returning the issued record.
    async fn activate(
        &self,
        machine_code: &str,
        user_name: &str,
    ) -> LicenseResult<ActivationRecord>;

    /// Reports the installed version and returns the current license info.
    async fn report_installed_version(
        &self,
        machine_code: &str,
        installed_version: &str,
    ) -> LicenseResult<LicenseInfo>;

    /// Retrieves the latest version and download location for a product.
    async fn product_version(&self, product_id: &str) -> LicenseResult<ProductVersionInfo>;
}

#[cfg(feature = "online")]
pub use http::HttpLicenseServer;

#[cfg(feature = "online")]
mod http {
    use super::{ActivationRecord, LicenseInfo, LicenseResult, ProductVersionInfo};
    use crate::error::LicenseError;
    use crate::server::LicenseServer;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ActivateRequest<'a> {
        machine_code: &'a str,
        user_name: &'a str,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ReportVersionRequest<'a> {
        machine_code: &'a str,
        installed_version: &'a str,
    }

    /// HTTP client for the issuing server's v1 API.
    pub struct HttpLicenseServer {
        client: reqwest::Client,
        base_url: String,
        license_key: String,
    }

    impl HttpLicenseServer {
        /// Creates a client for the given server, authenticating with the
        /// license key.
        pub fn new(base_url: impl Into<String>, license_key: impl Into<String>) -> Self {
            let mut base_url = base_url.into();
            while base_url.ends_with('/') {
                base_url.pop();
            }
            Self {
                client: reqwest::Client::new(),
                base_url,
                license_key: license_key.into(),
            }
        }

        async fn decode<T: serde::de::DeserializeOwned>(
            response: reqwest::Response,
            what: &str,
        ) -> LicenseResult<T> {
            let status = response.status();
            if !status.is_success() {
                return Err(LicenseError::Network(format!("{what} failed: {status}")));
            }
            response
                .json()
                .await
                .map_err(|e| LicenseError::Network(format!("decode {what} response: {e}")))
        }
    }

    impl LicenseServer for HttpLicenseServer {
        async fn activate(
            &self,
            machine_code: &str,
            user_name: &str,
        ) -> LicenseResult<ActivationRecord> {
            let response = self
                .client
                .post(format!("{}/api/v1/activate", self.base_url))
                .header("X-License-Key", &self.license_key)
                .json(&ActivateRequest {
                    machine_code,
                    user_name,
                })
                .send()
                .await
                .map_err(|e| LicenseError::Network(e.to_string()))?;

            Self::decode(response, "activation").await
        }

        async fn report_installed_version(
            &self,
            machine_code: &str,
            installed_version: &str,
        ) -> LicenseResult<LicenseInfo> {
            let response = self
                .client
                .put(format!(
                    "{}/api/v1/license/{}",
                    self.base_url, self.license_key
                ))
                .json(&ReportVersionRequest {
                    machine_code,
                    installed_version,
                })
                .send()
                .await
                .map_err(|e| LicenseError::Network(e.to_string()))?;

            Self::decode(response, "version report").await
        }

        async fn product_version(&self, product_id: &str) -> LicenseResult<ProductVersionInfo> {
            let response = self
                .client
                .get(format!(
                    "{}/api/v1/productver/{}",
                    self.base_url, product_id
                ))
                .send()
                .await
                .map_err(|e| LicenseError::Network(e.to_string()))?;

            Self::decode(response, "product version").await
        }
    }
}
