//! # Account Proof Messages
//!
//! An account proof lets a wallet show an application that it controls an
//! address at a point in time, without submitting a transaction. The wallet
//! signs a small RLP message:
//!
//! ```text
//! with app tag:    [hex(app_tag) as ASCII, address, timestamp]
//! without app tag: [address, timestamp]
//! ```
//!
//! The app tag is carried as its 64-character hex *text*, not the raw 32
//! bytes. The message does **not** include [`DomainTag::USER`]; the signer
//! prepends that itself (`DomainTag::USER.prefix(&message)`).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ADDRESS_LENGTH;
use crate::crypto::{DomainTag, DomainTagError};
use crate::encoding::{to_canonical_bytes, unsigned, EncodingError, RlpBytes, RlpList};
use crate::transaction::{Address, AddressError};

/// Errors raised while building an account proof message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccountProofError {
    #[error("invalid account address: {0}")]
    InvalidAddress(#[from] AddressError),

    #[error(transparent)]
    TagTooLong(#[from] DomainTagError),

    #[error("account proof encoding failed: {0}")]
    Encoding(#[from] EncodingError),
}

/// Builds the account proof message for `address_hex` at `timestamp`
/// (seconds since the Unix epoch).
///
/// `address_hex` must be exactly [`ADDRESS_LENGTH`] bytes of hex, with or
/// without a `0x` prefix. An empty `app_domain_tag` is the same as `None`.
///
/// # Errors
///
/// - [`AccountProofError::InvalidAddress`] for bad hex or a wrong length.
/// - [`AccountProofError::TagTooLong`] if the tag exceeds 32 bytes.
/// - [`AccountProofError::Encoding`] for a negative timestamp. Wallets that
///   reinterpret the timestamp as `u64` still produce a message for such
///   input, so proofs with pre-epoch timestamps do not interoperate.
pub fn account_proof_message(
    address_hex: &str,
    timestamp: i64,
    app_domain_tag: Option<&str>,
) -> Result<Vec<u8>, AccountProofError> {
    let address = parse_address(address_hex)?;
    let timestamp = unsigned("timestamp", timestamp)?;
    let tag = app_domain_tag
        .filter(|tag| !tag.is_empty())
        .map(DomainTag::new)
        .transpose()?;

    let message = match tag {
        Some(tag) => {
            let tag_text = tag.to_hex();
            to_canonical_bytes(&RlpList(&[
                &RlpBytes(tag_text.as_bytes()),
                &address,
                &timestamp,
            ]))
        }
        None => to_canonical_bytes(&RlpList(&[&address, &timestamp])),
    };

    debug!(
        %address,
        timestamp,
        tagged = tag.is_some(),
        len = message.len(),
        "built account proof message"
    );
    Ok(message)
}

fn parse_address(address_hex: &str) -> Result<Address, AddressError> {
    let digits = address_hex.strip_prefix("0x").unwrap_or(address_hex);
    let bytes = hex::decode(digits).map_err(|source| AddressError::InvalidHex {
        input: address_hex.to_string(),
        source,
    })?;
    if bytes.len() != ADDRESS_LENGTH {
        return Err(AddressError::InvalidLength {
            expected: ADDRESS_LENGTH,
            actual: bytes.len(),
        });
    }
    Address::from_slice(&bytes)
}

/// An account proof request as an application would issue it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProofRequest {
    pub address: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_tag: Option<String>,
}

impl AccountProofRequest {
    /// A request for `address` stamped with the current UTC time.
    pub fn now(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timestamp: Utc::now().timestamp(),
            domain_tag: None,
        }
    }

    pub fn with_domain_tag(mut self, tag: impl Into<String>) -> Self {
        self.domain_tag = Some(tag.into());
        self
    }

    /// The message the wallet signs, before the user domain tag.
    pub fn message(&self) -> Result<Vec<u8>, AccountProofError> {
        account_proof_message(&self.address, self.timestamp, self.domain_tag.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT_ADDR: &str = "f8d6e0586b0a20c7";
    const FULL_ADDR: &str = "00000000000000000000f8d6e0586b0a20c7f8d6";

    #[test]
    fn untagged_message_is_address_then_timestamp() {
        let msg = account_proof_message(FULL_ADDR, 1, None).unwrap();
        let mut expected = vec![0xc0 + 22, 0x80 + ADDRESS_LENGTH as u8];
        expected.extend_from_slice(&hex::decode(FULL_ADDR).unwrap());
        expected.push(0x01);
        assert_eq!(msg, expected);
    }

    #[test]
    fn tagged_message_carries_hex_text_of_the_tag() {
        let msg = account_proof_message(FULL_ADDR, 1_700_000_000, Some("my-app")).unwrap();
        let tag_text = DomainTag::new("my-app").unwrap().to_hex();
        assert_eq!(tag_text.len(), 64);
        assert!(msg
            .windows(tag_text.len())
            .any(|w| w == tag_text.as_bytes()));
    }

    #[test]
    fn tag_changes_the_message() {
        let with = account_proof_message(FULL_ADDR, 5, Some("app")).unwrap();
        let without = account_proof_message(FULL_ADDR, 5, None).unwrap();
        assert_ne!(with, without);
    }

    #[test]
    fn empty_tag_is_the_same_as_no_tag() {
        assert_eq!(
            account_proof_message(FULL_ADDR, 5, Some("")).unwrap(),
            account_proof_message(FULL_ADDR, 5, None).unwrap()
        );
    }

    #[test]
    fn prefix_is_optional() {
        let with_prefix = format!("0x{FULL_ADDR}");
        assert_eq!(
            account_proof_message(&with_prefix, 5, None).unwrap(),
            account_proof_message(FULL_ADDR, 5, None).unwrap()
        );
    }

    #[test]
    fn long_tag_is_rejected() {
        let tag = "x".repeat(33);
        let err = account_proof_message(FULL_ADDR, 5, Some(&tag)).unwrap_err();
        assert!(matches!(
            err,
            AccountProofError::TagTooLong(DomainTagError::TagTooLong { len: 33, .. })
        ));
    }

    #[test]
    fn bad_addresses_are_rejected() {
        assert!(matches!(
            account_proof_message("zz", 5, None),
            Err(AccountProofError::InvalidAddress(AddressError::InvalidHex { .. }))
        ));
        // Short addresses are not padded here.
        assert!(matches!(
            account_proof_message(SHORT_ADDR, 5, None),
            Err(AccountProofError::InvalidAddress(AddressError::InvalidLength {
                actual: 8,
                ..
            }))
        ));
    }

    #[test]
    fn negative_timestamp_is_an_encoding_error() {
        let err = account_proof_message(FULL_ADDR, -1, None).unwrap_err();
        assert!(matches!(
            err,
            AccountProofError::Encoding(EncodingError::NegativeInteger { value: -1, .. })
        ));
    }

    #[test]
    fn request_builds_the_same_message() {
        let request = AccountProofRequest {
            address: FULL_ADDR.to_string(),
            timestamp: 42,
            domain_tag: None,
        }
        .with_domain_tag("wallet");
        assert_eq!(
            request.message().unwrap(),
            account_proof_message(FULL_ADDR, 42, Some("wallet")).unwrap()
        );
    }

    #[test]
    fn now_stamps_current_time() {
        let before = Utc::now().timestamp();
        let request = AccountProofRequest::now(FULL_ADDR);
        assert!(request.timestamp >= before);
        assert!(request.domain_tag.is_none());
        assert!(request.message().is_ok());
    }

    #[test]
    fn request_json_omits_missing_tag() {
        let request = AccountProofRequest {
            address: FULL_ADDR.to_string(),
            timestamp: 42,
            domain_tag: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("domain_tag"));
        let back: AccountProofRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
