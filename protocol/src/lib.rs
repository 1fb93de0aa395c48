//! # Quorum Transaction Core
//!
//! Client-side construction and multi-party signing of transactions for an
//! account-based ledger where one transaction can be authorized by several
//! accounts, each holding several weighted keys.
//!
//! A transaction names three kinds of party:
//!
//! - a **proposer**, whose proposal key supplies the sequence number,
//! - a **payer**, who pays the fees,
//! - any number of **authorizers**, whose accounts the script may touch.
//!
//! One account can fill several roles. [`transaction::Transaction::signers`]
//! folds the declarations into the minimal ordered list of signers, and the
//! two-phase protocol collects payload signatures first and the payer's
//! container signature last.
//!
//! ## Modules
//!
//! - **config** — Protocol constants.
//! - **encoding** — RLP building blocks for canonical messages.
//! - **crypto** — SHA3-256, domain tags, the signing capability, Ed25519.
//! - **transaction** — The transaction, signer resolution, signing, identity.
//! - **identity** — Account proof messages.
//!
//! The crate does no I/O. Submitting transactions is a transport client's job.

pub mod config;
pub mod crypto;
pub mod encoding;
pub mod identity;
pub mod transaction;
