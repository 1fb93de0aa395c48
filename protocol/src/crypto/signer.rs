//! # Signing Capability
//!
//! The transaction core never touches key material. It hands the exact bytes
//! to sign to a [`MessageSigner`] and records whatever comes back. Anything
//! that can produce signature bytes fits behind the trait: an in-process
//! key, a hardware wallet, a remote key custodian.

/// Error type returned by signing capabilities.
pub type SignerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Produces a signature over a message.
///
/// Implementations decide the algorithm, and whether to hash or domain-tag
/// the message first. The protocol only requires that the output can later
/// be verified against a known public key.
pub trait MessageSigner {
    /// Signs `message`, returning the raw signature bytes.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError>;
}

impl<S: MessageSigner + ?Sized> MessageSigner for &S {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        (**self).sign(message)
    }
}

impl<S: MessageSigner + ?Sized> MessageSigner for Box<S> {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        (**self).sign(message)
    }
}
