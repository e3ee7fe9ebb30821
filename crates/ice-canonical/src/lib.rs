//! Canonical encoding primitives for ICE runtime events.
//!
//! Every byte that participates in an event's integrity fingerprint is
//! produced here: values are canonicalized to RFC 8785 JSON (sorted keys,
//! fixed separators, no insignificant whitespace) and hashed with SHA-256.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// Fingerprint newtype plus computation and verification.
pub mod fingerprint;

pub use canonicalizer::{CanonicalizationError, Canonicalizer};
pub use fingerprint::{
    compute_fingerprint, verify_fingerprint, Fingerprint, FingerprintError, ParseFingerprintError,
};
