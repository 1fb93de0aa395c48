//! # Hashing Utilities
//!
//! Transaction identity is SHA3-256 over the canonical identity encoding.
//! That is the only hash the protocol itself depends on; anything a signing
//! algorithm hashes internally is that algorithm's business.

use sha3::{Digest, Sha3_256};

use crate::config::HASH_OUTPUT_LENGTH;

/// Compute the SHA3-256 hash of the input data.
///
/// # Example
///
/// ```
/// use quorum_tx::crypto::sha3_256;
///
/// let digest = sha3_256(b"quorum");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha3_256(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; HASH_OUTPUT_LENGTH];
    output.copy_from_slice(&result);
    output
}
