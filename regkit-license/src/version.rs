//! Dotted version parsing, comparison, and the maximum-version policy.
//!
//! Parsing is deliberately lenient: missing or non-numeric components are
//! zero, never an error. Legacy and malformed version strings degrade
//! gracefully instead of blocking every licensing check.

use std::cmp::Ordering;
use std::fmt;

/// A parsed `major.minor.patch` version.
///
/// Comparison is lexicographic over the triple, so `"1.2"` and `"1.2.0"`
/// are equal regardless of original formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl Version {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses a dotted version string, leniently.
    ///
    /// Splits on `.` and takes up to three components; each parses as a
    /// non-negative integer or defaults to zero. Total function: `"abc"`
    /// and `""` both parse as `0.0.0`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut parts = [0u32; 3];
        for (slot, component) in parts.iter_mut().zip(text.split('.')) {
            *slot = component.trim().parse().unwrap_or(0);
        }
        Self::new(parts[0], parts[1], parts[2])
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Compares two dotted version strings.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    Version::parse(a).cmp(&Version::parse(b))
}

/// Checks the installed version against the license's version ceiling.
///
/// An empty or blank `max_allowed` means no restriction (open policy);
/// otherwise the installed version must be less than or equal to it.
#[must_use]
pub fn is_version_allowed(installed: &str, max_allowed: &str) -> bool {
    if max_allowed.trim().is_empty() {
        return true;
    }
    compare_versions(installed, max_allowed) != Ordering::Greater
}
