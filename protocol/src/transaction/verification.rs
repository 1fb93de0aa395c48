//! Cryptographic verification of attached signatures.
//!
//! Verification is separate from signing and never runs implicitly. It
//! checks each attached signature against the message its kind implies:
//!
//! - **Payload** signatures against [`Transaction::payload_message`].
//! - **Container** signatures against [`Transaction::container_message`],
//!   recomputed from the payload signatures currently attached.
//!
//! Public keys come from the caller, usually an account lookup against chain
//! state. Key weights and thresholds are an account-model concern and are
//! not evaluated here.

use thiserror::Error;
use tracing::{debug, warn};

use super::builder::Transaction;
use super::types::{Address, KeyIndex, SignatureKind, TransactionSignature};
use crate::crypto::{DomainTag, PublicKey};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors returned by signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The signature does not verify against the supplied key.
    #[error("invalid {kind} signature from {address} key {key_index}")]
    InvalidSignature {
        kind: SignatureKind,
        address: Address,
        key_index: KeyIndex,
    },

    /// The key lookup had no public key for a signing slot.
    #[error("no public key known for {address} key {key_index}")]
    UnknownKey { address: Address, key_index: KeyIndex },
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verifies a single attached signature against `public_key`.
///
/// `domain` must match the tag the signer applied, or `None` if it signed
/// the raw message.
///
/// # Errors
///
/// [`VerificationError::InvalidSignature`] if the signature is malformed or
/// does not verify.
pub fn verify_signature(
    tx: &Transaction,
    signature: &TransactionSignature,
    public_key: &PublicKey,
    domain: Option<&DomainTag>,
) -> Result<(), VerificationError> {
    let message = match signature.kind {
        SignatureKind::Payload => tx.payload_message(),
        SignatureKind::Container => tx.container_message(),
    };
    check(signature, public_key, domain, &message)
}

/// Verifies every attached signature, resolving keys through `lookup`.
///
/// Signatures are checked in stored order and the first failure is
/// returned. Messages are encoded once per call, not once per signature.
///
/// # Errors
///
/// [`VerificationError::UnknownKey`] when `lookup` returns `None`, otherwise
/// [`VerificationError::InvalidSignature`] for the first bad signature.
pub fn verify_transaction_signatures<F>(
    tx: &Transaction,
    lookup: F,
    domain: Option<&DomainTag>,
) -> Result<(), VerificationError>
where
    F: Fn(&Address, KeyIndex) -> Option<PublicKey>,
{
    let payload = tx.payload_message();
    let container = tx.container_message();

    for signature in tx.signatures() {
        let public_key = lookup(&signature.address, signature.key_index).ok_or(
            VerificationError::UnknownKey {
                address: signature.address,
                key_index: signature.key_index,
            },
        )?;
        let message = match signature.kind {
            SignatureKind::Payload => &payload,
            SignatureKind::Container => &container,
        };
        check(signature, &public_key, domain, message)?;
    }

    debug!(
        signatures = tx.signatures().len(),
        "all transaction signatures verified"
    );
    Ok(())
}

fn check(
    signature: &TransactionSignature,
    public_key: &PublicKey,
    domain: Option<&DomainTag>,
    message: &[u8],
) -> Result<(), VerificationError> {
    if public_key.verify(domain, message, &signature.signature) {
        return Ok(());
    }
    warn!(
        kind = %signature.kind,
        address = %signature.address,
        key_index = signature.key_index,
        "signature failed verification"
    );
    Err(VerificationError::InvalidSignature {
        kind: signature.kind,
        address: signature.address,
        key_index: signature.key_index,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
