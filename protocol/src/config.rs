//! # Protocol Configuration & Constants
//!
//! Every fixed width, well-known tag, and default lives here. The canonical
//! encoding is normative, so changing any of the widths below changes the
//! bytes other implementations expect to verify.

// ---------------------------------------------------------------------------
// Fixed Widths
// ---------------------------------------------------------------------------

/// Account address length in bytes. Textual form is twice this in hex.
pub const ADDRESS_LENGTH: usize = 20;

/// Identifier length in bytes (transaction IDs, reference block IDs).
pub const IDENTIFIER_LENGTH: usize = 32;

/// Domain tag length in bytes. Tags shorter than this are right-padded
/// with zero bytes; longer tags are rejected.
pub const DOMAIN_TAG_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Domain Separation
// ---------------------------------------------------------------------------

/// Tag prefixed to payload and container messages by tag-aware signers.
pub const TRANSACTION_DOMAIN_TAG: &str = "QUORUM-V0.0-transaction";

/// Tag prefixed to user-signed messages, including account proofs.
/// Account proof messages deliberately do not embed it; the signer adds it.
pub const USER_DOMAIN_TAG: &str = "QUORUM-V0.0-user";

// ---------------------------------------------------------------------------
// Transaction Defaults
// ---------------------------------------------------------------------------

/// Gas limit assigned by [`crate::transaction::Transaction::new`] until the
/// caller sets one explicitly.
pub const DEFAULT_GAS_LIMIT: u64 = 9_999;

/// SHA3-256 digest length in bytes; the width of a transaction id.
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Bundled Ed25519 Signer
// ---------------------------------------------------------------------------

/// Ed25519 secret key length in bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Ed25519 public key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;
