//! The caller-owned transaction value and its incremental setters.
//!
//! A [`Transaction`] starts empty. Callers declare the script, reference
//! block, gas limit, proposal key, payer, and authorizers in any order and
//! any number of times; proposal key and payer are replaced, authorizers
//! accumulate. Everything derived from it (signers, canonical messages,
//! identity) is recomputed from the current state on every call.
//!
//! Setters validate before they mutate, so a rejected call leaves the
//! transaction exactly as it was.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::TransactionError;
use super::signers;
use super::types::{
    Address, Identifier, KeyIndex, ProposalKey, RoleAssignment, SequenceNumber, SignatureKind,
    Signer, SignerRole, TransactionSignature,
};
use crate::config::DEFAULT_GAS_LIMIT;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A transaction under construction, signed incrementally by several parties.
///
/// # Example
///
/// ```
/// use quorum_tx::transaction::{Address, Transaction, SignerRole};
///
/// let alice = Address::from_hex("01").unwrap();
/// let bob = Address::from_hex("02").unwrap();
///
/// let mut tx = Transaction::new();
/// tx.set_script(b"transaction { execute {} }".to_vec())
///     .set_gas_limit(100)
///     .set_proposal_key(alice, 1, 42);
/// tx.set_payer(bob, &[7]).unwrap();
///
/// let signers = tx.signers();
/// assert_eq!(signers[0].roles, vec![SignerRole::Proposer]);
/// assert_eq!(signers[1].roles, vec![SignerRole::Payer]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    script: Vec<u8>,
    reference_block_id: Identifier,
    gas_limit: u64,
    proposal_key: Option<ProposalKey>,
    payer: Option<RoleAssignment>,
    /// Number of authorizers declared before the payer.
    payer_position: usize,
    authorizers: Vec<RoleAssignment>,
    signatures: Vec<TransactionSignature>,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    /// An empty transaction with the default gas limit.
    pub fn new() -> Self {
        Self {
            script: Vec::new(),
            reference_block_id: Identifier::ZERO,
            gas_limit: DEFAULT_GAS_LIMIT,
            proposal_key: None,
            payer: None,
            payer_position: 0,
            authorizers: Vec::new(),
            signatures: Vec::new(),
        }
    }

    pub fn set_script(&mut self, script: impl Into<Vec<u8>>) -> &mut Self {
        self.script = script.into();
        self
    }

    pub fn set_reference_block_id(&mut self, id: Identifier) -> &mut Self {
        self.reference_block_id = id;
        self
    }

    /// Sets the reference block from raw bytes, as returned by an RPC client.
    ///
    /// # Errors
    ///
    /// [`TransactionError::Encoding`] unless `bytes` is exactly one
    /// identifier wide.
    pub fn set_reference_block_id_bytes(
        &mut self,
        bytes: &[u8],
    ) -> Result<&mut Self, TransactionError> {
        let id = Identifier::from_slice(bytes)?;
        self.reference_block_id = id;
        Ok(self)
    }

    pub fn set_gas_limit(&mut self, gas_limit: u64) -> &mut Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Sets the proposal key, replacing any previous one.
    pub fn set_proposal_key(
        &mut self,
        address: Address,
        key_index: KeyIndex,
        sequence_number: SequenceNumber,
    ) -> &mut Self {
        self.proposal_key = Some(ProposalKey {
            address,
            key_index,
            sequence_number,
        });
        self
    }

    /// Sets the payer, replacing any previous one.
    ///
    /// The payer's position among the authorizers is the number of
    /// authorizers added so far; it only affects [`signers`](Self::signers)
    /// ordering.
    ///
    /// # Errors
    ///
    /// [`TransactionError::EmptyKeySet`] if `key_indices` is empty.
    pub fn set_payer(
        &mut self,
        address: Address,
        key_indices: &[KeyIndex],
    ) -> Result<&mut Self, TransactionError> {
        let assignment = role_assignment(address, key_indices, SignerRole::Payer)?;
        self.payer = Some(assignment);
        self.payer_position = self.authorizers.len();
        Ok(self)
    }

    /// Appends an authorizer. Authorizers keep their call order.
    ///
    /// # Errors
    ///
    /// [`TransactionError::EmptyKeySet`] if `key_indices` is empty.
    pub fn add_authorizer(
        &mut self,
        address: Address,
        key_indices: &[KeyIndex],
    ) -> Result<&mut Self, TransactionError> {
        let assignment = role_assignment(address, key_indices, SignerRole::Authorizer)?;
        self.authorizers.push(assignment);
        Ok(self)
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn reference_block_id(&self) -> &Identifier {
        &self.reference_block_id
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn proposal_key(&self) -> Option<&ProposalKey> {
        self.proposal_key.as_ref()
    }

    pub fn payer(&self) -> Option<&RoleAssignment> {
        self.payer.as_ref()
    }

    pub fn authorizers(&self) -> &[RoleAssignment] {
        &self.authorizers
    }

    /// Every attached signature, in the order it was added.
    pub fn signatures(&self) -> &[TransactionSignature] {
        &self.signatures
    }

    /// Attached signatures of one kind, in the order they were added.
    pub fn signatures_of(&self, kind: SignatureKind) -> impl Iterator<Item = &TransactionSignature> {
        self.signatures.iter().filter(move |sig| sig.kind == kind)
    }

    /// Resolves the current role declarations into the deduplicated,
    /// ordered list of signing parties.
    pub fn signers(&self) -> Vec<Signer> {
        signers::resolve(
            self.proposal_key.as_ref(),
            self.payer.as_ref(),
            self.payer_position,
            &self.authorizers,
        )
    }

    /// Signing slots that have no signature yet.
    ///
    /// Each resolved signer owes one signature per key, of the kind its roles
    /// require (see [`Signer::required_kind`]). Advisory only; nothing in the
    /// crate refuses an incomplete transaction.
    pub fn missing_signatures(&self) -> Vec<(SignatureKind, Address, KeyIndex)> {
        self.signers()
            .into_iter()
            .flat_map(|signer| {
                let kind = signer.required_kind();
                let address = signer.address;
                signer
                    .key_indices
                    .into_iter()
                    .map(move |key_index| (kind, address, key_index))
            })
            .filter(|(kind, address, key_index)| {
                !self.signatures.iter().any(|sig| {
                    sig.kind == *kind && sig.address == *address && sig.key_index == *key_index
                })
            })
            .collect()
    }

    /// Serializes to JSON for hand-off to a transport client.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub(crate) fn push_signature(&mut self, signature: TransactionSignature) {
        self.signatures.push(signature);
    }
}

fn role_assignment(
    address: Address,
    key_indices: &[KeyIndex],
    role: SignerRole,
) -> Result<RoleAssignment, TransactionError> {
    if key_indices.is_empty() {
        return Err(TransactionError::EmptyKeySet { address, role });
    }
    Ok(RoleAssignment {
        address,
        key_indices: key_indices.iter().copied().collect::<BTreeSet<_>>(),
        role,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
