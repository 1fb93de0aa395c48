//! # Transaction Module
//!
//! Construction, multi-party signing, and identity of a transaction that
//! several accounts sign independently.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        — Address, Identifier, roles, signatures
//! builder.rs      — The caller-owned Transaction and its setters
//! signers.rs      — Union-find resolution of declared roles into signers
//! canonical.rs    — Payload, container, and identity encodings; id()
//! signing.rs      — Two-phase signing through a MessageSigner
//! verification.rs — Ed25519 checks of attached signatures
//! error.rs        — TransactionError
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Declare** script, reference block, gas, proposal key, payer, authorizers.
//! 2. **Resolve** [`Transaction::signers`] to learn who signs what.
//! 3. **Sign payload**: proposer and authorizers call [`Transaction::sign_payload`].
//! 4. **Sign container**: the payer calls [`Transaction::sign_container`].
//! 5. **Hand off** the JSON form and [`Transaction::id`] to a transport client.

pub mod builder;
pub mod canonical;
pub mod error;
pub mod signers;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::Transaction;
pub use error::TransactionError;
pub use types::{
    Address, AddressError, Identifier, KeyIndex, ProposalKey, RoleAssignment, SequenceNumber,
    SignatureKind, Signer, SignerRole, TransactionSignature,
};
pub use verification::{verify_signature, verify_transaction_signatures, VerificationError};
