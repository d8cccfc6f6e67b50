//! Machine fingerprinting for license binding.
//!
//! Turns raw hardware identifiers into a single stable machine code that
//! binds a registration to one physical machine. Fingerprinting never
//! fails: identifiers a platform cannot read are simply skipped, which
//! degrades uniqueness instead of blocking activation.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::env;

/// A source of raw hardware identifiers.
///
/// Implementations query platform-specific sources (machine id, serial
/// numbers, hostname) and yield them in a fixed order. An identifier the
/// platform cannot read is `None`; the fingerprint algorithm discards it.
pub trait HardwareIdProvider {
    /// Returns the hardware identifiers in a stable, platform-defined order.
    fn hardware_ids(&self) -> Vec<Option<String>>;
}

/// Information about the current device, for support and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Operating system name.
    pub os_name: String,
    /// Operating system version.
    pub os_version: String,
    /// Hostname.
    pub hostname: String,
    /// CPU architecture.
    pub arch: String,
}

impl DeviceInfo {
    /// Collects information about the current device.
    #[must_use]
    pub fn collect() -> Self {
        Self {
            os_name: env::consts::OS.to_string(),
            os_version: get_os_version(),
            hostname: get_hostname(),
            arch: env::consts::ARCH.to_string(),
        }
    }
}

/// A stable machine code derived from hardware identifiers.
///
/// The code is the SHA-256 of the `|`-joined non-blank identifiers,
/// base64-encoded with `=`, `/`, and `+` removed so it is safe in URLs
/// and file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineFingerprint {
    code: String,
}

impl MachineFingerprint {
    /// Computes a fingerprint from an ordered sequence of optional
    /// identifiers.
    ///
    /// Empty and whitespace-only identifiers are discarded before joining.
    /// If every identifier is absent the result is the hash of the empty
    /// string; fingerprinting never fails.
    #[must_use]
    pub fn from_identifiers<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let joined = ids
            .into_iter()
            .flatten()
            .filter(|s| !s.as_ref().trim().is_empty())
            .map(|s| s.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("|");

        let digest = Sha256::digest(joined.as_bytes());

        // Strip, not substitute: the issuing server expects these characters
        // to be absent from machine codes.
        let code = BASE64.encode(digest).replace(['=', '/', '+'], "");

        Self { code }
    }

    /// Computes a fingerprint from the given provider's identifiers.
    #[must_use]
    pub fn from_provider(provider: &impl HardwareIdProvider) -> Self {
        Self::from_identifiers(provider.hardware_ids())
    }

    /// Generates the fingerprint of the current machine.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_provider(&PlatformIdProvider)
    }

    /// Returns the machine code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Validates that this fingerprint matches the current machine.
    #[must_use]
    pub fn matches_current(&self) -> bool {
        *self == Self::generate()
    }
}

/// Default identifier provider for the current platform.
///
/// Yields, in order: machine id, hostname, OS name, CPU architecture, and
/// the login user. Sources that cannot be read yield `None`.
pub struct PlatformIdProvider;

impl HardwareIdProvider for PlatformIdProvider {
    fn hardware_ids(&self) -> Vec<Option<String>> {
        vec![
            get_machine_id(),
            Some(get_hostname()),
            Some(env::consts::OS.to_string()),
            Some(env::consts::ARCH.to_string()),
            env::var("USER").or_else(|_| env::var("USERNAME")).ok(),
        ]
    }
}

/// Gets the machine hostname.
fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Gets the OS version string.
fn get_os_version() -> String {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("sw_vers")
            .arg("-productVersion")
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    #[cfg(target_os = "windows")]
    {
        "windows".to_string()
    }

    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("VERSION_ID="))
                    .map(|l| {
                        l.trim_start_matches("VERSION_ID=")
                            .trim_matches('"')
                            .to_string()
                    })
            })
            .unwrap_or_else(|| "unknown".to_string())
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        "unknown".to_string()
    }
}

/// Gets the machine ID (platform-specific unique identifier).
fn get_machine_id() -> Option<String> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|output| {
                output
                    .lines()
                    .find(|l| l.contains("IOPlatformUUID"))
                    .and_then(|l| l.split('"').nth(3))
                    .map(String::from)
            })
    }

    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/machine-id")
            .or_else(|_| std::fs::read_to_string("/var/lib/dbus/machine-id"))
            .ok()
            .map(|s| s.trim().to_string())
    }

    #[cfg(target_os = "windows")]
    {
        // Registry MachineGuid would go here; hostname and user still bind
        None
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}
