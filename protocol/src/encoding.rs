//! # Canonical Encoding
//!
//! Recursive length-prefixed (RLP) encoding shared by every signed message
//! in the crate. Schemas are expressed as fixed-position field lists, so the
//! byte output depends only on field values and never on insertion order.
//!
//! The building blocks here are deliberately tiny:
//!
//! - [`RlpBytes`] — a borrowed byte string.
//! - [`RlpList`] — a heterogeneous list of fields in schema order.
//! - [`RlpSeq`] — a homogeneous list (authorizers, signatures, key indices).
//!
//! `alloy-rlp` does the actual header and integer encoding. We wrap it
//! because `Vec<u8>` encodes as a *list of integers* under `alloy-rlp`'s
//! blanket impls, which is never what a schema means by "bytes".

use alloy_rlp::{length_of_length, Encodable, Header};
use bytes::BufMut;
use thiserror::Error;

/// Errors raised when a value violates a schema's shape constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// A byte string required to have a fixed width had some other length.
    #[error("{field} must be exactly {expected} bytes, got {actual}")]
    InvalidWidth {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A signed value was supplied where the schema requires an unsigned integer.
    #[error("{field} must be non-negative, got {value}")]
    NegativeInteger { field: &'static str, value: i64 },
}

/// Copies `bytes` into a fixed-width array, failing on any other length.
pub fn fixed_width<const N: usize>(
    field: &'static str,
    bytes: &[u8],
) -> Result<[u8; N], EncodingError> {
    bytes.try_into().map_err(|_| EncodingError::InvalidWidth {
        field,
        expected: N,
        actual: bytes.len(),
    })
}

/// Converts a signed integer into the unsigned form the encoding requires.
pub fn unsigned(field: &'static str, value: i64) -> Result<u64, EncodingError> {
    u64::try_from(value).map_err(|_| EncodingError::NegativeInteger { field, value })
}

/// Encodes a value into a freshly allocated buffer.
pub fn to_canonical_bytes<T: Encodable + ?Sized>(value: &T) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.length());
    value.encode(&mut out);
    out
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

/// A borrowed byte string, encoded as an RLP string.
#[derive(Debug, Clone, Copy)]
pub struct RlpBytes<'a>(pub &'a [u8]);

impl Encodable for RlpBytes<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.encode(out);
    }

    fn length(&self) -> usize {
        self.0.length()
    }
}

/// A list of heterogeneous fields in schema order.
pub struct RlpList<'a>(pub &'a [&'a dyn Encodable]);

impl RlpList<'_> {
    fn payload_length(&self) -> usize {
        self.0.iter().map(|field| field.length()).sum()
    }
}

impl Encodable for RlpList<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        Header {
            list: true,
            payload_length: self.payload_length(),
        }
        .encode(out);
        for field in self.0 {
            field.encode(out);
        }
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        payload_length + length_of_length(payload_length)
    }
}

/// A homogeneous list of encodable items.
pub struct RlpSeq<'a, T>(pub &'a [T]);

impl<T: Encodable> RlpSeq<'_, T> {
    fn payload_length(&self) -> usize {
        self.0.iter().map(Encodable::length).sum()
    }
}

impl<T: Encodable> Encodable for RlpSeq<'_, T> {
    fn encode(&self, out: &mut dyn BufMut) {
        Header {
            list: true,
            payload_length: self.payload_length(),
        }
        .encode(out);
        for item in self.0 {
            item.encode(out);
        }
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        payload_length + length_of_length(payload_length)
    }
}
