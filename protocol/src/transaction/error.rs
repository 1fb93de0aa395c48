//! Error types for transaction construction and signing.

use thiserror::Error;

use super::types::{Address, KeyIndex, SignatureKind, SignerRole};
use crate::crypto::SignerError;
use crate::encoding::EncodingError;

/// Errors returned by [`Transaction`](super::Transaction) operations.
///
/// None of these leave the transaction partially updated: validation and
/// signing both happen before anything is recorded.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// A payer or authorizer was declared without any keys.
    #[error("{role} {address} must declare at least one key index")]
    EmptyKeySet { address: Address, role: SignerRole },

    /// The supplied signing capability failed.
    #[error("{kind} signing failed for {address} key {key_index}: {source}")]
    Signing {
        kind: SignatureKind,
        address: Address,
        key_index: KeyIndex,
        #[source]
        source: SignerError,
    },

    /// A field violated the canonical encoding's shape constraints.
    #[error("canonical encoding failed: {0}")]
    Encoding(#[from] EncodingError),
}
