//! # Ed25519 Signer
//!
//! A bundled [`MessageSigner`] backed by `ed25519-dalek`, plus the matching
//! public key type used by [`crate::transaction::verification`].
//!
//! The transaction core is algorithm-agnostic. This module exists so that
//! tests, benches, and simple integrations have a real signer to hand it.
//!
//! A signer may carry a [`DomainTag`]. When it does, it signs
//! `tag || message` instead of `message`, and verification must be asked to
//! apply the same tag.
//!
//! Key bytes are never logged.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::domain::DomainTag;
use super::signer::{MessageSigner, SignerError};
use crate::config::{SIGNATURE_LENGTH, SIGNING_KEY_LENGTH, VERIFYING_KEY_LENGTH};

/// Errors that can occur during key operations.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// An Ed25519 signing key, optionally bound to a domain tag.
pub struct Ed25519Signer {
    signing_key: SigningKey,
    domain: Option<DomainTag>,
}

/// The public half of an [`Ed25519Signer`].
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    bytes: [u8; VERIFYING_KEY_LENGTH],
}

impl Ed25519Signer {
    /// Generate a fresh key using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
            domain: None,
        }
    }

    /// Constructs a signer deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SIGNING_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
            domain: None,
        }
    }

    /// Reconstruct a signer from a hex-encoded secret key.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; SIGNING_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Binds this signer to `domain`; every message is prefixed before signing.
    pub fn with_domain(mut self, domain: DomainTag) -> Self {
        self.domain = Some(domain);
        self
    }

    /// The domain tag applied before signing, if any.
    pub fn domain(&self) -> Option<&DomainTag> {
        self.domain.as_ref()
    }

    /// Returns the public key associated with this signer.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Signs `message` (after applying the domain tag, if any).
    pub fn sign_bytes(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        let sig = match &self.domain {
            Some(tag) => self.signing_key.sign(&tag.prefix(message)),
            None => self.signing_key.sign(message),
        };
        sig.to_bytes()
    }
}

impl MessageSigner for Ed25519Signer {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        Ok(self.sign_bytes(message).to_vec())
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signer(pub={})", self.public_key().to_hex())
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

impl PublicKey {
    /// Try to create a `PublicKey` from a byte slice.
    ///
    /// Validates the length and that the bytes represent a valid Ed25519 point.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; VERIFYING_KEY_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// Parse a hex-encoded public key.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; VERIFYING_KEY_LENGTH] {
        &self.bytes
    }

    /// Hex-encoded representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Verify `signature` over `message`, prefixing `domain` first when given.
    ///
    /// Returns `false` for malformed signatures rather than erroring; callers
    /// only ever want a yes/no here.
    pub fn verify(&self, domain: Option<&DomainTag>, message: &[u8], signature: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let Ok(sig_bytes) = <[u8; SIGNATURE_LENGTH]>::try_from(signature) else {
            return false;
        };
        let sig = DalekSignature::from_bytes(&sig_bytes);
        match domain {
            Some(tag) => verifying_key.verify(&tag.prefix(message), &sig).is_ok(),
            None => verifying_key.verify(message, &sig).is_ok(),
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}
