//! Signer resolution: from declared roles to a minimal, ordered signer list.
//!
//! Every declared role (the proposal key, the payer, each authorizer) starts
//! as its own candidate group. Two candidates for the same address merge when
//! one key set contains the other; merging is transitive, so the grouping is
//! a union-find over candidates rather than a pairwise fold. Candidates that
//! share an address but have disjoint or incomparable key sets stay separate.
//!
//! Ordering is positional. The proposer's group comes first. Every other
//! group sits at the slot of its earliest member in the declaration sequence
//!
//! ```text
//! authorizers added before the payer, payer, authorizers added after
//! ```
//!
//! which keeps authorizers in call order and keeps the payer between the
//! authorizers that bracket it, unless it merged into an earlier group.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::types::{Address, KeyIndex, ProposalKey, RoleAssignment, Signer, SignerRole};

/// Slot reserved for the proposer; every other slot is strictly greater.
const PROPOSER_SLOT: usize = 0;

/// One declared role before merging.
struct Candidate<'a> {
    address: Address,
    key_indices: BTreeSet<KeyIndex>,
    role: SignerRole,
    slot: usize,
    proposal_key: Option<&'a ProposalKey>,
}

/// Union-find over candidate indices with path compression and union by rank.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Accumulates the members of one merged group.
struct Group<'a> {
    address: Address,
    key_indices: BTreeSet<KeyIndex>,
    roles: BTreeSet<SignerRole>,
    slot: usize,
    proposal_key: Option<&'a ProposalKey>,
}

/// Two key sets are mergeable when either contains the other.
fn comparable(a: &BTreeSet<KeyIndex>, b: &BTreeSet<KeyIndex>) -> bool {
    a.is_subset(b) || b.is_subset(a)
}

/// Resolves declared roles into the ordered, deduplicated signer list.
///
/// `payer_position` is the number of authorizers that had been added when
/// the payer was declared; it fixes the payer's slot among the authorizers.
pub fn resolve(
    proposal_key: Option<&ProposalKey>,
    payer: Option<&RoleAssignment>,
    payer_position: usize,
    authorizers: &[RoleAssignment],
) -> Vec<Signer> {
    let candidates = candidates(proposal_key, payer, payer_position, authorizers);

    let mut sets = DisjointSet::new(candidates.len());
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            let (a, b) = (&candidates[i], &candidates[j]);
            if a.address == b.address && comparable(&a.key_indices, &b.key_indices) {
                sets.union(i, j);
            }
        }
    }

    let mut groups: BTreeMap<usize, Group<'_>> = BTreeMap::new();
    for (index, candidate) in candidates.iter().enumerate() {
        let root = sets.find(index);
        let group = groups.entry(root).or_insert_with(|| Group {
            address: candidate.address,
            key_indices: BTreeSet::new(),
            roles: BTreeSet::new(),
            slot: candidate.slot,
            proposal_key: None,
        });
        group.key_indices.extend(candidate.key_indices.iter().copied());
        group.roles.insert(candidate.role);
        group.slot = group.slot.min(candidate.slot);
        if candidate.proposal_key.is_some() {
            group.proposal_key = candidate.proposal_key;
        }
    }

    let mut ordered: Vec<Group<'_>> = groups.into_values().collect();
    ordered.sort_by_key(|group| group.slot);

    let signers: Vec<Signer> = ordered
        .into_iter()
        .map(|group| Signer {
            address: group.address,
            roles: group.roles.into_iter().collect(),
            key_indices: group.key_indices.into_iter().collect(),
            proposal_key: group.proposal_key.copied(),
        })
        .collect();

    trace!(
        candidates = candidates.len(),
        signers = signers.len(),
        "resolved transaction signers"
    );
    signers
}

/// Lays out candidates with their declaration slots.
fn candidates<'a>(
    proposal_key: Option<&'a ProposalKey>,
    payer: Option<&RoleAssignment>,
    payer_position: usize,
    authorizers: &[RoleAssignment],
) -> Vec<Candidate<'a>> {
    let mut out = Vec::with_capacity(authorizers.len() + 2);

    if let Some(key) = proposal_key {
        out.push(Candidate {
            address: key.address,
            key_indices: BTreeSet::from([key.key_index]),
            role: SignerRole::Proposer,
            slot: PROPOSER_SLOT,
            proposal_key: Some(key),
        });
    }

    let payer_position = payer_position.min(authorizers.len());
    let mut slot = PROPOSER_SLOT;
    let mut next_slot = || {
        slot += 1;
        slot
    };

    for (position, authorizer) in authorizers.iter().enumerate() {
        if position == payer_position {
            if let Some(payer) = payer {
                out.push(Candidate::declared(payer, next_slot()));
            }
        }
        out.push(Candidate::declared(authorizer, next_slot()));
    }
    if payer_position == authorizers.len() {
        if let Some(payer) = payer {
            out.push(Candidate::declared(payer, next_slot()));
        }
    }

    out
}

impl<'a> Candidate<'a> {
    fn declared(assignment: &RoleAssignment, slot: usize) -> Self {
        Self {
            address: assignment.address,
            key_indices: assignment.key_indices.clone(),
            role: assignment.role,
            slot,
            proposal_key: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(hex: &str) -> Address {
        Address::from_hex(hex).unwrap()
    }

    fn assignment(address: Address, keys: &[KeyIndex], role: SignerRole) -> RoleAssignment {
        RoleAssignment {
            address,
            key_indices: keys.iter().copied().collect(),
            role,
        }
    }

    fn proposal(address: Address, key_index: KeyIndex) -> ProposalKey {
        ProposalKey {
            address,
            key_index,
            sequence_number: 42,
        }
    }

    #[test]
    fn disjoint_set_is_transitive() {
        let mut sets = DisjointSet::new(4);
        sets.union(0, 1);
        sets.union(1, 2);
        assert_eq!(sets.find(0), sets.find(2));
        assert_ne!(sets.find(0), sets.find(3));
    }

    #[test]
    fn comparable_covers_subset_superset_and_equality() {
        let a: BTreeSet<KeyIndex> = [1, 2].into();
        let b: BTreeSet<KeyIndex> = [1].into();
        let c: BTreeSet<KeyIndex> = [2, 3].into();
        let d: BTreeSet<KeyIndex> = [4].into();
        assert!(comparable(&a, &a));
        assert!(comparable(&a, &b));
        assert!(comparable(&b, &a));
        assert!(!comparable(&a, &c));
        assert!(!comparable(&a, &d));
    }

    #[test]
    fn empty_declarations_resolve_to_nothing() {
        assert!(resolve(None, None, 0, &[]).is_empty());
    }

    #[test]
    fn transitive_chain_merges_all_members() {
        // {1} ⊆ {1,2} and {1,2} ⊆ {1,2,3}: all three collapse into one group.
        let a = addr("0a");
        let authorizers = vec![
            assignment(a, &[1], SignerRole::Authorizer),
            assignment(a, &[1, 2, 3], SignerRole::Authorizer),
        ];
        let payer = assignment(a, &[1, 2], SignerRole::Payer);
        let signers = resolve(None, Some(&payer), 2, &authorizers);

        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].roles, vec![SignerRole::Payer, SignerRole::Authorizer]);
        assert_eq!(signers[0].key_indices, vec![1, 2, 3]);
    }

    #[test]
    fn bridge_candidate_merges_incomparable_sets() {
        // {1} and {2} are disjoint, but both sit inside the payer's {1,2}.
        let a = addr("0a");
        let authorizers = vec![
            assignment(a, &[1], SignerRole::Authorizer),
            assignment(a, &[2], SignerRole::Authorizer),
        ];
        let payer = assignment(a, &[1, 2], SignerRole::Payer);
        let signers = resolve(None, Some(&payer), 2, &authorizers);

        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].key_indices, vec![1, 2]);
    }

    #[test]
    fn payer_slot_follows_its_declaration_point() {
        let (b, c, d) = (addr("0b"), addr("0c"), addr("0d"));
        let authorizers = vec![
            assignment(b, &[1], SignerRole::Authorizer),
            assignment(c, &[1], SignerRole::Authorizer),
        ];
        let payer = assignment(d, &[1], SignerRole::Payer);

        let before: Vec<Address> = resolve(None, Some(&payer), 0, &authorizers)
            .into_iter()
            .map(|s| s.address)
            .collect();
        assert_eq!(before, vec![d, b, c]);

        let between: Vec<Address> = resolve(None, Some(&payer), 1, &authorizers)
            .into_iter()
            .map(|s| s.address)
            .collect();
        assert_eq!(between, vec![b, d, c]);

        let after: Vec<Address> = resolve(None, Some(&payer), 2, &authorizers)
            .into_iter()
            .map(|s| s.address)
            .collect();
        assert_eq!(after, vec![b, c, d]);
    }

    #[test]
    fn merged_payer_takes_the_earlier_authorizer_slot() {
        let (b, c) = (addr("0b"), addr("0c"));
        let authorizers = vec![
            assignment(b, &[1], SignerRole::Authorizer),
            assignment(c, &[1], SignerRole::Authorizer),
        ];
        // Payer declared last, but merges with B's authorizer in slot 1.
        let payer = assignment(b, &[1, 2], SignerRole::Payer);
        let signers = resolve(None, Some(&payer), 2, &authorizers);

        assert_eq!(signers.len(), 2);
        assert_eq!(signers[0].address, b);
        assert_eq!(signers[0].roles, vec![SignerRole::Payer, SignerRole::Authorizer]);
        assert_eq!(signers[1].address, c);
    }

    #[test]
    fn proposer_group_carries_the_proposal_key() {
        let a = addr("0a");
        let key = proposal(a, 1);
        let authorizers = vec![assignment(a, &[1, 2], SignerRole::Authorizer)];
        let signers = resolve(Some(&key), None, 0, &authorizers);

        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].proposal_key, Some(key));
        assert_eq!(signers[0].roles, vec![SignerRole::Proposer, SignerRole::Authorizer]);
    }

    #[test]
    fn proposer_stays_first_even_when_merged_with_a_later_payer() {
        let (a, b) = (addr("0a"), addr("0b"));
        let key = proposal(a, 1);
        let authorizers = vec![assignment(b, &[1], SignerRole::Authorizer)];
        let payer = assignment(a, &[1, 2], SignerRole::Payer);
        let signers = resolve(Some(&key), Some(&payer), 1, &authorizers);

        assert_eq!(signers.len(), 2);
        assert_eq!(signers[0].address, a);
        assert_eq!(signers[0].roles, vec![SignerRole::Proposer, SignerRole::Payer]);
        assert_eq!(signers[0].key_indices, vec![1, 2]);
        assert_eq!(signers[1].address, b);
    }

    #[test]
    fn out_of_range_payer_position_is_clamped() {
        let (b, d) = (addr("0b"), addr("0d"));
        let authorizers = vec![assignment(b, &[1], SignerRole::Authorizer)];
        let payer = assignment(d, &[1], SignerRole::Payer);
        let signers = resolve(None, Some(&payer), 9, &authorizers);
        assert_eq!(signers.len(), 2);
        assert_eq!(signers[1].address, d);
    }
}
