//! Error types for the licensing core.

use thiserror::Error;

/// Licensing-specific errors.
///
/// Transport failures and verification failures are deliberately separate
/// variants: a hash mismatch means the registration is untrusted even when
/// the network exchange succeeded, and callers must be able to react
/// differently (refuse to run vs. offer a retry).
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The issuing server was unreachable or returned a non-success status.
    #[error("network error: {0}")]
    Network(String),

    /// The recomputed registration hash does not match the issued one.
    #[error("registration hash mismatch")]
    Verification,

    /// No registration has been stored for this product.
    #[error("product not activated")]
    NotActivated,

    /// Reading or writing the registration file failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
