//! # Domain Tags
//!
//! A domain tag is a fixed-width prefix that separates signing contexts.
//! A signature produced over `TRANSACTION || payload` can never verify as a
//! signature over `USER || payload`, so a message signed for one protocol
//! cannot be replayed into another.
//!
//! Tags are built from short ASCII strings right-padded with zero bytes to
//! [`DOMAIN_TAG_LENGTH`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{DOMAIN_TAG_LENGTH, TRANSACTION_DOMAIN_TAG, USER_DOMAIN_TAG};

/// Errors raised while building a domain tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainTagError {
    #[error("domain tag {tag:?} cannot be longer than {max} bytes (got {len})")]
    TagTooLong { tag: String, len: usize, max: usize },
}

/// A zero-padded, fixed-width domain separation tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainTag([u8; DOMAIN_TAG_LENGTH]);

impl DomainTag {
    /// Tag for payload and container messages.
    pub const TRANSACTION: DomainTag = DomainTag::padded(TRANSACTION_DOMAIN_TAG);

    /// Tag for user messages such as account proofs.
    pub const USER: DomainTag = DomainTag::padded(USER_DOMAIN_TAG);

    /// Builds a tag from `tag`, right-padding it with zero bytes.
    ///
    /// # Errors
    ///
    /// [`DomainTagError::TagTooLong`] if `tag` is longer than
    /// [`DOMAIN_TAG_LENGTH`] bytes.
    pub fn new(tag: &str) -> Result<Self, DomainTagError> {
        if tag.len() > DOMAIN_TAG_LENGTH {
            return Err(DomainTagError::TagTooLong {
                tag: tag.to_string(),
                len: tag.len(),
                max: DOMAIN_TAG_LENGTH,
            });
        }
        Ok(Self::padded(tag))
    }

    // Callers guarantee `tag.len() <= DOMAIN_TAG_LENGTH`.
    const fn padded(tag: &str) -> Self {
        let src = tag.as_bytes();
        let mut bytes = [0u8; DOMAIN_TAG_LENGTH];
        let mut i = 0;
        while i < src.len() {
            bytes[i] = src[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Raw tag bytes.
    pub fn as_bytes(&self) -> &[u8; DOMAIN_TAG_LENGTH] {
        &self.0
    }

    /// Lowercase hex rendering, always `2 * DOMAIN_TAG_LENGTH` characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns `tag || message`.
    pub fn prefix(&self, message: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(DOMAIN_TAG_LENGTH + message.len());
        out.extend_from_slice(&self.0);
        out.extend_from_slice(message);
        out
    }
}

impl fmt::Debug for DomainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self
            .0
            .iter()
            .rposition(|b| *b != 0)
            .map_or(0, |i| i + 1);
        write!(f, "DomainTag({:?})", String::from_utf8_lossy(&self.0[..end]))
    }
}
