//! Attaching signatures to a transaction.
//!
//! Signing is a separate step from building because each party holds its own
//! key, often in another process or device. The transaction computes the
//! message for the requested kind, hands it to the caller's
//! [`MessageSigner`], and appends whatever comes back.
//!
//! Nothing here checks that the signing address is a declared signer or
//! that the signature is valid. That is [`verification`](super::verification)'s job.

use tracing::debug;

use super::builder::Transaction;
use super::error::TransactionError;
use super::types::{Address, KeyIndex, SignatureKind, TransactionSignature};
use crate::crypto::MessageSigner;

impl Transaction {
    /// Signs the payload message and appends a payload signature.
    ///
    /// # Errors
    ///
    /// [`TransactionError::Signing`] if the signer fails. Nothing is appended.
    pub fn sign_payload<S: MessageSigner + ?Sized>(
        &mut self,
        address: Address,
        key_index: KeyIndex,
        signer: &S,
    ) -> Result<&mut Self, TransactionError> {
        let message = self.payload_message();
        self.sign_message(SignatureKind::Payload, address, key_index, &message, signer)
    }

    /// Signs the container message and appends a container signature.
    ///
    /// The container covers the payload signatures present *now*; payload
    /// signatures added afterwards are not covered and will break any
    /// container signature already attached.
    ///
    /// # Errors
    ///
    /// [`TransactionError::Signing`] if the signer fails. Nothing is appended.
    pub fn sign_container<S: MessageSigner + ?Sized>(
        &mut self,
        address: Address,
        key_index: KeyIndex,
        signer: &S,
    ) -> Result<&mut Self, TransactionError> {
        let message = self.container_message();
        self.sign_message(SignatureKind::Container, address, key_index, &message, signer)
    }

    /// Appends a payload signature produced elsewhere.
    pub fn add_payload_signature(
        &mut self,
        address: Address,
        key_index: KeyIndex,
        signature: Vec<u8>,
    ) -> &mut Self {
        self.attach(SignatureKind::Payload, address, key_index, signature)
    }

    /// Appends a container signature produced elsewhere.
    pub fn add_container_signature(
        &mut self,
        address: Address,
        key_index: KeyIndex,
        signature: Vec<u8>,
    ) -> &mut Self {
        self.attach(SignatureKind::Container, address, key_index, signature)
    }

    fn sign_message<S: MessageSigner + ?Sized>(
        &mut self,
        kind: SignatureKind,
        address: Address,
        key_index: KeyIndex,
        message: &[u8],
        signer: &S,
    ) -> Result<&mut Self, TransactionError> {
        let signature = signer
            .sign(message)
            .map_err(|source| TransactionError::Signing {
                kind,
                address,
                key_index,
                source,
            })?;
        Ok(self.attach(kind, address, key_index, signature))
    }

    fn attach(
        &mut self,
        kind: SignatureKind,
        address: Address,
        key_index: KeyIndex,
        signature: Vec<u8>,
    ) -> &mut Self {
        debug!(
            %kind,
            %address,
            key_index,
            signature_len = signature.len(),
            "attached signature"
        );
        self.push_signature(TransactionSignature {
            kind,
            address,
            key_index,
            signature,
        });
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
