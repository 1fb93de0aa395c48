//! # Identity Module
//!
//! Messages an account signs to prove control of its address to an
//! application, outside of any transaction.

pub mod account_proof;

pub use account_proof::{account_proof_message, AccountProofError, AccountProofRequest};
