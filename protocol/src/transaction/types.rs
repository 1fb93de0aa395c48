//! Core type definitions for transactions.
//!
//! These types form the vocabulary of the signing protocol: who signs
//! ([`Address`], [`KeyIndex`]), in what capacity ([`SignerRole`]), over which
//! message ([`SignatureKind`]), and what came back ([`TransactionSignature`]).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use alloy_rlp::Encodable;
use bytes::BufMut;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{ADDRESS_LENGTH, IDENTIFIER_LENGTH};
use crate::encoding::{fixed_width, EncodingError};

/// Position of a key within an account's key list.
pub type KeyIndex = u32;

/// Per-key replay counter supplied by the caller. Not validated here.
pub type SequenceNumber = u64;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Errors raised while parsing an [`Address`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AddressError {
    #[error("invalid address hex {input:?}: {source}")]
    InvalidHex {
        input: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("address must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// A fixed-width account address. Equality is byte-exact.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The all-zero address. Stands in for an unset payer or proposer in
    /// the canonical encoding.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Builds an address from exactly [`ADDRESS_LENGTH`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let arr: [u8; ADDRESS_LENGTH] =
            bytes.try_into().map_err(|_| AddressError::InvalidLength {
                expected: ADDRESS_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Parses hex, left-padding short input with zeros.
    ///
    /// An optional `0x` prefix is accepted, so `"01"`, `"0x1"` and the full
    /// 40-character form all name the same address. Input longer than the
    /// full width is rejected.
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() > 2 * ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_LENGTH,
                actual: digits.len().div_ceil(2),
            });
        }
        let padded = format!("{:0>width$}", digits, width = 2 * ADDRESS_LENGTH);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|source| AddressError::InvalidHex {
            input: s.to_string(),
            source,
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Lowercase hex, always `2 * ADDRESS_LENGTH` characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

impl Encodable for Address {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

// ---------------------------------------------------------------------------
// Identifier
// ---------------------------------------------------------------------------

/// A 32-byte identifier: transaction IDs and reference block IDs.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier([u8; IDENTIFIER_LENGTH]);

impl Identifier {
    pub const ZERO: Identifier = Identifier([0u8; IDENTIFIER_LENGTH]);

    /// Builds an identifier from exactly [`IDENTIFIER_LENGTH`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EncodingError> {
        fixed_width("identifier", bytes).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; IDENTIFIER_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; IDENTIFIER_LENGTH]> for Identifier {
    fn from(bytes: [u8; IDENTIFIER_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.to_hex())
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(de::Error::custom)?;
        Self::from_slice(&bytes).map_err(de::Error::custom)
    }
}

impl Encodable for Identifier {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

// ---------------------------------------------------------------------------
// Roles and keys
// ---------------------------------------------------------------------------

/// The capacity in which an account signs.
///
/// Variant order is the rendering priority: a merged signer always lists
/// its roles as Proposer, Payer, Authorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignerRole {
    /// Supplies the sequence number that guards against replay.
    Proposer,
    /// Pays for execution; signs the container last.
    Payer,
    /// Grants the script permission to act on its account.
    Authorizer,
}

impl fmt::Display for SignerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proposer => write!(f, "PROPOSER"),
            Self::Payer => write!(f, "PAYER"),
            Self::Authorizer => write!(f, "AUTHORIZER"),
        }
    }
}

/// The key whose sequence number this transaction consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalKey {
    pub address: Address,
    pub key_index: KeyIndex,
    pub sequence_number: SequenceNumber,
}

/// One declared role: an account and the keys it will sign with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub address: Address,
    pub key_indices: BTreeSet<KeyIndex>,
    pub role: SignerRole,
}

/// A resolved signing party. Produced by
/// [`Transaction::signers`](super::Transaction::signers), never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub address: Address,
    /// Rendered in priority order Proposer, Payer, Authorizer.
    pub roles: Vec<SignerRole>,
    /// Strictly ascending.
    pub key_indices: Vec<KeyIndex>,
    /// Present iff `roles` contains [`SignerRole::Proposer`].
    pub proposal_key: Option<ProposalKey>,
}

impl Signer {
    pub fn has_role(&self, role: SignerRole) -> bool {
        self.roles.contains(&role)
    }

    /// The message kind this signer's keys are expected to sign.
    ///
    /// Anyone paying signs the container, which already commits to the
    /// payload; everyone else signs the payload.
    pub fn required_kind(&self) -> SignatureKind {
        if self.has_role(SignerRole::Payer) {
            SignatureKind::Container
        } else {
            SignatureKind::Payload
        }
    }
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Which canonical message a signature covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureKind {
    /// The inner message: script, reference block, gas, proposal key, payer,
    /// authorizers.
    Payload,
    /// The outer message: payload plus every payload signature.
    Container,
}

impl SignatureKind {
    /// Discriminant used in the canonical identity encoding.
    pub fn code(&self) -> u8 {
        match self {
            Self::Payload => 0,
            Self::Container => 1,
        }
    }
}

impl fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payload => write!(f, "PAYLOAD"),
            Self::Container => write!(f, "CONTAINER"),
        }
    }
}

/// A signature attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    pub kind: SignatureKind,
    pub address: Address,
    pub key_index: KeyIndex,
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

mod hex_bytes {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, T: AsRef<[u8]>>(bytes: T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
