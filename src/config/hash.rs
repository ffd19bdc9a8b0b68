//! Specification hashing for change detection.
//!
//! This module provides deterministic hashing of cluster specifications so
//! a reconciler can tell whether a snapshot changed since the last pass.

use sha2::{Digest, Sha256};

use crate::error::{ResourceSetError, Result};

use super::spec::ClusterSpec;

/// Hasher for computing specification hashes.
#[derive(Debug, Default)]
pub struct ConfigHasher;

impl ConfigHasher {
    /// Creates a new specification hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes a hash of the entire specification.
    ///
    /// Maps in the specification are ordered, so the canonical JSON form is
    /// stable for equal specifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the specification cannot be serialized.
    pub fn hash_spec(&self, spec: &ClusterSpec) -> Result<String> {
        let canonical = serde_json::to_vec(spec)
            .map_err(|e| ResourceSetError::internal(format!("Failed to serialize specification: {e}")))?;

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Computes a short hash (first 8 characters) for display purposes.
    #[must_use]
    pub fn short_hash(&self, hash: &str) -> String {
        hash.chars().take(8).collect()
    }

    /// Compares two hashes to determine if they are equal.
    #[must_use]
    pub fn hashes_match(hash1: &str, hash2: &str) -> bool {
        // Use constant-time comparison to avoid timing attacks
        if hash1.len() != hash2.len() {
            return false;
        }

        hash1
            .bytes()
            .zip(hash2.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}
