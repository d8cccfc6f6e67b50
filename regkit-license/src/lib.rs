//! Client-side licensing core for regkit.
//!
//! This crate handles:
//! - Machine fingerprinting for license binding
//! - Canonical registration encoding and tamper-evident hashing
//! - Offline verification of a server-issued activation
//! - Version gating and update checks against the issuing server
//!
//! # Design Principles
//!
//! - **Offline verification**: after activation the registration is
//!   re-validated locally, without contacting the server again
//! - **Byte-exact protocol**: the canonical string, UTF-16LE encoding,
//!   SHA-1 digest, and base64 output must match the issuing server
//!   exactly, or every hash comparison fails
//! - **Explicit secrets**: the shared registration secret is threaded
//!   through calls as a parameter, never held in ambient state
//! - **No hidden I/O**: fingerprinting, hashing, and version comparison
//!   are pure; only the issuing-server trait suspends
//!
//! # Registration Hash Format
//!
//! `base64(SHA1(UTF16LE(machineCode|expDate|maintDate|maxVersion|k=v|... + secret)))`
//! with entitlement keys in ascending byte-wise order.

mod activation;
mod device;
mod error;
mod registration;
mod server;
mod update;
mod version;

pub use activation::{activate, activate_offline, RegistrationStore};
pub use device::{DeviceInfo, HardwareIdProvider, MachineFingerprint, PlatformIdProvider};
pub use error::{LicenseError, LicenseResult};
pub use registration::{
    canonical_registration_string, compute_registration_hash, ActivationRecord, Entitlements,
    RegistrationVerifier, SharedSecretVerifier,
};
pub use server::{LicenseInfo, LicenseServer, ProductVersionInfo};
pub use update::{check_for_update, UpdateInfo};
pub use version::{compare_versions, is_version_allowed, Version};

#[cfg(feature = "online")]
pub use server::HttpLicenseServer;
