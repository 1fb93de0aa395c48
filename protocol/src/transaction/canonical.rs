//! Canonical messages and transaction identity.
//!
//! Three RLP schemas are derived from a [`Transaction`]:
//!
//! ```text
//! payload   = [script, reference_block_id, gas_limit,
//!              proposal_address, proposal_key_index, proposal_sequence_number,
//!              payer, [authorizer...]]
//! container = [payload, [[address, key_index, signature]...]]      payload sigs only
//! identity  = [payload, proposal_declared, [payer_key...], [[authorizer_key...]...],
//!              [[kind, address, key_index, signature]...]]          every sig, stored order
//! ```
//!
//! An unset proposal key encodes as the zero address with index and sequence
//! zero; an unset payer encodes as the zero address. The identity form adds
//! `proposal_declared` (0 or 1) so an unset proposal key and one explicitly
//! set to those zero values get different ids.
//!
//! Proposers and authorizers sign the payload. The payer signs the container,
//! which commits to the payload *and* the payload signatures collected so
//! far, so neither can be swapped after the payer agrees to pay.
//!
//! The identity is SHA3-256 over the identity form. It is never cached.

use std::collections::BTreeSet;

use alloy_rlp::Encodable;
use bytes::BufMut;

use super::builder::Transaction;
use super::types::{Address, Identifier, KeyIndex, SignatureKind, TransactionSignature};
use crate::crypto::sha3_256;
use crate::encoding::{to_canonical_bytes, RlpBytes, RlpList, RlpSeq};

impl Transaction {
    /// Bytes signed by the proposer and authorizers.
    pub fn payload_message(&self) -> Vec<u8> {
        to_canonical_bytes(&PayloadForm(self))
    }

    /// Bytes signed by the payer. Reflects the payload signatures attached
    /// at the time of the call.
    pub fn container_message(&self) -> Vec<u8> {
        to_canonical_bytes(&ContainerForm(self))
    }

    /// Full canonical encoding, including every attached signature.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        to_canonical_bytes(&IdentityForm(self))
    }

    /// SHA3-256 of [`canonical_bytes`](Self::canonical_bytes).
    ///
    /// Recomputed on every call, so it changes whenever any field or the
    /// signature list changes.
    pub fn id(&self) -> Identifier {
        Identifier::from(sha3_256(&self.canonical_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Schemas
// ---------------------------------------------------------------------------

struct PayloadForm<'a>(&'a Transaction);

impl PayloadForm<'_> {
    fn with_fields<R>(&self, f: impl FnOnce(&RlpList<'_>) -> R) -> R {
        let tx = self.0;
        let (proposal_address, proposal_key_index, proposal_sequence_number) = tx
            .proposal_key()
            .map_or((Address::ZERO, 0, 0), |key| {
                (key.address, key.key_index, key.sequence_number)
            });
        let payer = tx.payer().map_or(Address::ZERO, |payer| payer.address);
        let authorizers: Vec<Address> = tx.authorizers().iter().map(|a| a.address).collect();

        let script = RlpBytes(tx.script());
        let gas_limit = tx.gas_limit();
        let authorizers = RlpSeq(&authorizers);

        f(&RlpList(&[
            &script,
            tx.reference_block_id(),
            &gas_limit,
            &proposal_address,
            &proposal_key_index,
            &proposal_sequence_number,
            &payer,
            &authorizers,
        ]))
    }
}

impl Encodable for PayloadForm<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        self.with_fields(|list| list.encode(out));
    }

    fn length(&self) -> usize {
        self.with_fields(|list| list.length())
    }
}

struct ContainerForm<'a>(&'a Transaction);

impl ContainerForm<'_> {
    fn with_fields<R>(&self, f: impl FnOnce(&RlpList<'_>) -> R) -> R {
        let payload = PayloadForm(self.0);
        let signatures: Vec<PayloadSignatureEntry<'_>> = self
            .0
            .signatures_of(SignatureKind::Payload)
            .map(PayloadSignatureEntry)
            .collect();
        let signatures = RlpSeq(&signatures);
        f(&RlpList(&[&payload, &signatures]))
    }
}

impl Encodable for ContainerForm<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        self.with_fields(|list| list.encode(out));
    }

    fn length(&self) -> usize {
        self.with_fields(|list| list.length())
    }
}

struct IdentityForm<'a>(&'a Transaction);

impl IdentityForm<'_> {
    fn with_fields<R>(&self, f: impl FnOnce(&RlpList<'_>) -> R) -> R {
        let tx = self.0;
        let no_keys = BTreeSet::new();

        let payload = PayloadForm(tx);
        let proposal_declared = u8::from(tx.proposal_key().is_some());
        let payer_keys = KeySet(tx.payer().map_or(&no_keys, |payer| &payer.key_indices));
        let authorizer_keys: Vec<KeySet<'_>> = tx
            .authorizers()
            .iter()
            .map(|a| KeySet(&a.key_indices))
            .collect();
        let authorizer_keys = RlpSeq(&authorizer_keys);
        let signatures: Vec<SignatureEntry<'_>> =
            tx.signatures().iter().map(SignatureEntry).collect();
        let signatures = RlpSeq(&signatures);

        f(&RlpList(&[
            &payload,
            &proposal_declared,
            &payer_keys,
            &authorizer_keys,
            &signatures,
        ]))
    }
}

impl Encodable for IdentityForm<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        self.with_fields(|list| list.encode(out));
    }

    fn length(&self) -> usize {
        self.with_fields(|list| list.length())
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Ascending key indices of one declaration.
struct KeySet<'a>(&'a BTreeSet<KeyIndex>);

impl Encodable for KeySet<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        let keys: Vec<KeyIndex> = self.0.iter().copied().collect();
        RlpSeq(&keys).encode(out);
    }

    fn length(&self) -> usize {
        let keys: Vec<KeyIndex> = self.0.iter().copied().collect();
        RlpSeq(&keys).length()
    }
}

/// `[address, key_index, signature]`
struct PayloadSignatureEntry<'a>(&'a TransactionSignature);

impl Encodable for PayloadSignatureEntry<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        let sig = self.0;
        RlpList(&[&sig.address, &sig.key_index, &RlpBytes(&sig.signature)]).encode(out);
    }

    fn length(&self) -> usize {
        let sig = self.0;
        RlpList(&[&sig.address, &sig.key_index, &RlpBytes(&sig.signature)]).length()
    }
}

/// `[kind, address, key_index, signature]`
struct SignatureEntry<'a>(&'a TransactionSignature);

impl Encodable for SignatureEntry<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        let sig = self.0;
        let kind = sig.kind.code();
        RlpList(&[&kind, &sig.address, &sig.key_index, &RlpBytes(&sig.signature)]).encode(out);
    }

    fn length(&self) -> usize {
        let sig = self.0;
        let kind = sig.kind.code();
        RlpList(&[&kind, &sig.address, &sig.key_index, &RlpBytes(&sig.signature)]).length()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ADDRESS_LENGTH, IDENTIFIER_LENGTH};

    fn addr(hex: &str) -> Address {
        Address::from_hex(hex).unwrap()
    }

    fn sample_tx() -> Transaction {
        let mut tx = Transaction::new();
        tx.set_script(b"transaction { execute { log(\"hi\") } }".to_vec())
            .set_reference_block_id(Identifier::from([0x11; 32]))
            .set_gas_limit(42)
            .set_proposal_key(addr("01"), 3, 42);
        tx.add_authorizer(addr("01"), &[2, 3]).unwrap();
        tx.set_payer(addr("02"), &[7]).unwrap();
        tx
    }

    fn signature(kind: SignatureKind, address: Address, key_index: KeyIndex) -> TransactionSignature {
        TransactionSignature {
            kind,
            address,
            key_index,
            signature: vec![key_index as u8; 4],
        }
    }

    #[test]
    fn empty_transaction_payload_golden_bytes() {
        let msg = Transaction::new().payload_message();

        let mut expected = vec![0xf8, 82];
        expected.push(0x80); // script
        expected.push(0x80 + IDENTIFIER_LENGTH as u8);
        expected.extend_from_slice(&[0u8; IDENTIFIER_LENGTH]);
        expected.extend_from_slice(&[0x82, 0x27, 0x0f]); // gas 9999
        expected.push(0x80 + ADDRESS_LENGTH as u8);
        expected.extend_from_slice(&[0u8; ADDRESS_LENGTH]);
        expected.extend_from_slice(&[0x80, 0x80]); // key index, sequence
        expected.push(0x80 + ADDRESS_LENGTH as u8);
        expected.extend_from_slice(&[0u8; ADDRESS_LENGTH]);
        expected.push(0xc0); // authorizers

        assert_eq!(msg, expected);
    }

    #[test]
    fn identical_state_gives_identical_bytes_and_id() {
        let a = sample_tx();
        let b = sample_tx();
        assert_eq!(a.payload_message(), b.payload_message());
        assert_eq!(a.container_message(), b.container_message());
        assert_eq!(a.canonical_bytes(), b.canonical_bytes());
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn id_is_recomputed_not_cached() {
        let mut tx = sample_tx();
        let first = tx.id();
        assert_eq!(first, tx.id());
        tx.set_gas_limit(43);
        assert_ne!(first, tx.id());
    }

    #[test]
    fn every_field_changes_the_id() {
        let base = sample_tx().id();

        let mut tx = sample_tx();
        tx.set_script(b"other".to_vec());
        assert_ne!(tx.id(), base, "script");

        let mut tx = sample_tx();
        tx.set_reference_block_id(Identifier::from([0x12; 32]));
        assert_ne!(tx.id(), base, "reference block");

        let mut tx = sample_tx();
        tx.set_proposal_key(addr("01"), 3, 43);
        assert_ne!(tx.id(), base, "sequence number");

        let mut tx = sample_tx();
        tx.set_payer(addr("02"), &[7, 8]).unwrap();
        assert_ne!(tx.id(), base, "payer keys");

        let mut tx = sample_tx();
        tx.add_authorizer(addr("03"), &[1]).unwrap();
        assert_ne!(tx.id(), base, "authorizers");
    }

    #[test]
    fn zero_proposal_key_differs_from_unset_in_id_only() {
        let unset = Transaction::new();
        let mut zero = Transaction::new();
        zero.set_proposal_key(Address::ZERO, 0, 0);

        assert_eq!(unset.payload_message(), zero.payload_message());
        assert_eq!(unset.container_message(), zero.container_message());
        assert!(unset.signers().is_empty());
        assert_eq!(zero.signers().len(), 1);
        assert_ne!(unset.id(), zero.id());
    }

    #[test]
    fn payload_ignores_signatures_and_key_indices() {
        let mut tx = sample_tx();
        let payload = tx.payload_message();

        tx.push_signature(signature(SignatureKind::Payload, addr("01"), 3));
        tx.push_signature(signature(SignatureKind::Container, addr("02"), 7));
        assert_eq!(tx.payload_message(), payload);

        tx.set_payer(addr("02"), &[1, 2, 9]).unwrap();
        assert_eq!(tx.payload_message(), payload);
    }

    #[test]
    fn container_embeds_payload_and_payload_signatures_only() {
        let mut tx = sample_tx();
        let payload = tx.payload_message();
        let empty_container = tx.container_message();
        assert!(empty_container
            .windows(payload.len())
            .any(|w| w == payload.as_slice()));

        tx.push_signature(signature(SignatureKind::Payload, addr("01"), 3));
        let signed_container = tx.container_message();
        assert_ne!(signed_container, empty_container);

        tx.push_signature(signature(SignatureKind::Container, addr("02"), 7));
        assert_eq!(tx.container_message(), signed_container);
    }

    #[test]
    fn signature_order_changes_the_id() {
        let mut a = sample_tx();
        a.push_signature(signature(SignatureKind::Payload, addr("01"), 2));
        a.push_signature(signature(SignatureKind::Payload, addr("01"), 3));

        let mut b = sample_tx();
        b.push_signature(signature(SignatureKind::Payload, addr("01"), 3));
        b.push_signature(signature(SignatureKind::Payload, addr("01"), 2));

        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn signature_kind_is_part_of_the_id() {
        let mut a = sample_tx();
        a.push_signature(signature(SignatureKind::Payload, addr("02"), 7));
        let mut b = sample_tx();
        b.push_signature(signature(SignatureKind::Container, addr("02"), 7));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn id_is_sha3_of_canonical_bytes() {
        let tx = sample_tx();
        assert_eq!(tx.id().as_bytes(), &sha3_256(&tx.canonical_bytes()));
    }

    #[test]
    fn messages_are_rlp_lists() {
        let tx = sample_tx();
        for msg in [tx.payload_message(), tx.container_message(), tx.canonical_bytes()] {
            assert!(msg[0] >= 0xc0, "canonical messages are lists");
        }
    }
}
