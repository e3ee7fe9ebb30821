//! Integrity fingerprints.
//!
//! A fingerprint is computed as: `hex(sha256(canonical_bytes(value)))`
//! where the `integrity` member (if present) is excluded from the hash input.
//! It detects tampering and divergence; it is not a signature.

use crate::Canonicalizer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::sync::OnceLock;

/// Name of the member that carries a fingerprint and never feeds its own hash.
pub const INTEGRITY_FIELD: &str = "integrity";

/// Lowercase hex-encoded SHA-256 digest (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Accepts exactly 64 lowercase hex characters.
    pub fn parse(value: impl Into<String>) -> Result<Self, ParseFingerprintError> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex"));
        let s = value.into();
        if !re.is_match(&s) {
            return Err(ParseFingerprintError(s));
        }
        Ok(Self(s))
    }

    /// Returns the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A string that is not a lowercase hex SHA-256 digest.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a 64-character lowercase hex digest")]
pub struct ParseFingerprintError(pub String);

/// Error during fingerprint computation.
#[derive(thiserror::Error, Debug)]
pub enum FingerprintError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] crate::CanonicalizationError),
}

/// Computes the integrity fingerprint of a serializable value.
///
/// # Example
///
/// ```rust
/// use ice_canonical::{compute_fingerprint, Canonicalizer};
/// use serde_json::json;
///
/// let canonicalizer = Canonicalizer::new();
/// let a = compute_fingerprint(&json!({"b": 1, "a": 2}), &canonicalizer)?;
/// let b = compute_fingerprint(&json!({"a": 2, "b": 1}), &canonicalizer)?;
/// assert_eq!(a, b);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`FingerprintError`] if serialization or canonicalization fails.
pub fn compute_fingerprint<T: Serialize>(
    value: &T,
    canonicalizer: &Canonicalizer,
) -> Result<Fingerprint, FingerprintError> {
    let mut value: Value =
        serde_json::to_value(value).map_err(|e| FingerprintError::Serialization(e.to_string()))?;

    // A fingerprint never covers itself.
    if let Value::Object(map) = &mut value {
        map.remove(INTEGRITY_FIELD);
    }

    let bytes = canonicalizer.canonicalize(&value)?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let hash_bytes = hasher.finalize();

    // Lowercase hex of a 32-byte digest is well-formed by construction.
    Ok(Fingerprint(hex::encode(hash_bytes)))
}

/// Verifies that a claimed fingerprint matches the computed one.
///
/// # Errors
///
/// Returns [`FingerprintError`] if computation fails.
pub fn verify_fingerprint<T: Serialize>(
    value: &T,
    claimed: &Fingerprint,
    canonicalizer: &Canonicalizer,
) -> Result<bool, FingerprintError> {
    let computed = compute_fingerprint(value, canonicalizer)?;
    Ok(claimed == &computed)
}
