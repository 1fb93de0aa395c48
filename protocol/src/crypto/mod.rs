//! # Cryptographic Primitives
//!
//! Everything the transaction core needs from cryptography, and nothing more:
//!
//! - **SHA3-256** for transaction identity.
//! - **Domain tags** to separate signing contexts.
//! - The **[`MessageSigner`]** capability the core signs through.
//! - A bundled **Ed25519** signer for callers who don't bring their own.
//!
//! Everything here is a thin, type-safe wrapper around audited crates.

pub mod domain;
pub mod hash;
pub mod keys;
pub mod signer;

pub use domain::{DomainTag, DomainTagError};
pub use hash::sha3_256;
pub use keys::{Ed25519Signer, KeyError, PublicKey};
pub use signer::{MessageSigner, SignerError};
