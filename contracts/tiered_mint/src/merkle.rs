//! Allowlist membership proofs.
//!
//! An early-access leaf is `sha256(xdr(address))`. A discount leaf also
//! commits to the buyer's discount, `sha256(xdr(address) || bps_be32)`, so
//! publishing a new discount root can reprice existing members. Interior
//! nodes hash the two children in ascending byte order, `sha256(min || max)`,
//! so a proof is just the list of siblings from leaf to root with no
//! left/right flags.

use soroban_sdk::{xdr::ToXdr, Address, Bytes, BytesN, Env, Vec};

/// Leaf digest for a buyer address
pub fn leaf(env: &Env, buyer: &Address) -> BytesN<32> {
    let encoded: Bytes = buyer.clone().to_xdr(env);
    env.crypto().sha256(&encoded).into()
}

/// Leaf digest for a buyer entitled to `discount_bps` off the discount tiers
pub fn discount_leaf(env: &Env, buyer: &Address, discount_bps: u32) -> BytesN<32> {
    let mut encoded: Bytes = buyer.clone().to_xdr(env);
    encoded.extend_from_array(&discount_bps.to_be_bytes());
    env.crypto().sha256(&encoded).into()
}

/// Hash two nodes in canonical (sorted) order
pub fn hash_pair(env: &Env, a: &BytesN<32>, b: &BytesN<32>) -> BytesN<32> {
    let (a, b) = (a.to_array(), b.to_array());
    let (first, second) = if a <= b { (a, b) } else { (b, a) };

    let mut data = Bytes::from_array(env, &first);
    data.extend_from_array(&second);
    env.crypto().sha256(&data).into()
}

/// Walk `proof` from `leaf` and return the root it commits to
pub fn compute_root(env: &Env, leaf: &BytesN<32>, proof: &Vec<BytesN<32>>) -> BytesN<32> {
    let mut current = leaf.clone();
    for sibling in proof.iter() {
        current = hash_pair(env, &current, &sibling);
    }
    current
}

pub fn verify(env: &Env, leaf: &BytesN<32>, proof: &Vec<BytesN<32>>, root: &BytesN<32>) -> bool {
    compute_root(env, leaf, proof) == *root
}

/// Builds allowlist trees and proofs the way the contract verifies them.
/// Odd nodes at the end of a layer are carried up unchanged.
#[cfg(any(test, feature = "testutils"))]
pub struct AllowlistTree {
    env: Env,
    leaves: Vec<BytesN<32>>,
    layers: Vec<Vec<BytesN<32>>>,
}

#[cfg(any(test, feature = "testutils"))]
impl AllowlistTree {
    pub fn new(env: &Env, leaves: Vec<BytesN<32>>) -> Self {
        let mut layers = Vec::new(env);
        let mut current = leaves.clone();
        layers.push_back(current.clone());

        while current.len() > 1 {
            let mut next = Vec::new(env);
            let mut i = 0;
            while i < current.len() {
                let left = current.get_unchecked(i);
                if i + 1 < current.len() {
                    next.push_back(hash_pair(env, &left, &current.get_unchecked(i + 1)));
                } else {
                    next.push_back(left);
                }
                i += 2;
            }
            layers.push_back(next.clone());
            current = next;
        }

        AllowlistTree {
            env: env.clone(),
            leaves,
            layers,
        }
    }

    pub fn from_addresses(env: &Env, members: &Vec<Address>) -> Self {
        let mut leaves = Vec::new(env);
        for member in members.iter() {
            leaves.push_back(leaf(env, &member));
        }
        Self::new(env, leaves)
    }

    /// Discount allowlist from `(member, discount_bps)` pairs
    pub fn from_discounts(env: &Env, members: &Vec<(Address, u32)>) -> Self {
        let mut leaves = Vec::new(env);
        for (member, discount_bps) in members.iter() {
            leaves.push_back(discount_leaf(env, &member, discount_bps));
        }
        Self::new(env, leaves)
    }

    /// Root of the tree; all zeroes for an empty allowlist
    pub fn root(&self) -> BytesN<32> {
        match self.layers.last().and_then(|top| top.first()) {
            Some(root) => root,
            None => BytesN::from_array(&self.env, &[0u8; 32]),
        }
    }

    pub fn proof(&self, index: u32) -> Vec<BytesN<32>> {
        let mut proof = Vec::new(&self.env);
        let mut idx = index;
        for layer in self.layers.iter() {
            let sibling = idx ^ 1;
            if sibling < layer.len() {
                proof.push_back(layer.get_unchecked(sibling));
            }
            idx /= 2;
        }
        proof
    }

    pub fn proof_for_leaf(&self, target: &BytesN<32>) -> Option<Vec<BytesN<32>>> {
        self.leaves
            .first_index_of(target.clone())
            .map(|index| self.proof(index))
    }

    pub fn proof_for(&self, member: &Address) -> Option<Vec<BytesN<32>>> {
        self.proof_for_leaf(&leaf(&self.env, member))
    }

    pub fn proof_for_discount(
        &self,
        member: &Address,
        discount_bps: u32,
    ) -> Option<Vec<BytesN<32>>> {
        self.proof_for_leaf(&discount_leaf(&self.env, member, discount_bps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;

    fn members(env: &Env, count: u32) -> Vec<Address> {
        let mut out = Vec::new(env);
        for _ in 0..count {
            out.push_back(Address::generate(env));
        }
        out
    }

    #[test]
    fn pair_hash_is_order_independent() {
        let env = Env::default();
        let a = BytesN::from_array(&env, &[1u8; 32]);
        let b = BytesN::from_array(&env, &[2u8; 32]);
        assert_eq!(hash_pair(&env, &a, &b), hash_pair(&env, &b, &a));
    }

    #[test]
    fn pair_hash_concatenates_smaller_first() {
        let env = Env::default();
        let a = BytesN::from_array(&env, &[9u8; 32]);
        let b = BytesN::from_array(&env, &[3u8; 32]);

        let mut data = Bytes::from_array(&env, &[3u8; 32]);
        data.extend_from_array(&[9u8; 32]);
        let expected: BytesN<32> = env.crypto().sha256(&data).into();

        assert_eq!(hash_pair(&env, &a, &b), expected);
    }

    #[test]
    fn every_member_of_odd_sized_tree_verifies() {
        let env = Env::default();
        let list = members(&env, 5);
        let tree = AllowlistTree::from_addresses(&env, &list);
        let root = tree.root();

        for member in list.iter() {
            let proof = tree.proof_for(&member).unwrap();
            assert!(verify(&env, &leaf(&env, &member), &proof, &root));
        }
    }

    #[test]
    fn single_member_tree_has_empty_proof() {
        let env = Env::default();
        let list = members(&env, 1);
        let tree = AllowlistTree::from_addresses(&env, &list);
        let member = list.get(0).unwrap();

        let proof = tree.proof_for(&member).unwrap();
        assert_eq!(proof.len(), 0);
        assert_eq!(tree.root(), leaf(&env, &member));
    }

    #[test]
    fn outsider_does_not_verify() {
        let env = Env::default();
        let list = members(&env, 4);
        let tree = AllowlistTree::from_addresses(&env, &list);
        let outsider = Address::generate(&env);

        assert!(tree.proof_for(&outsider).is_none());
        let borrowed = tree.proof(0);
        assert!(!verify(&env, &leaf(&env, &outsider), &borrowed, &tree.root()));
    }

    #[test]
    fn tampered_sibling_breaks_proof() {
        let env = Env::default();
        let list = members(&env, 8);
        let tree = AllowlistTree::from_addresses(&env, &list);
        let member = list.get(3).unwrap();

        let mut proof = tree.proof_for(&member).unwrap();
        assert_eq!(proof.len(), 3);
        proof.set(1, BytesN::from_array(&env, &[0xAB; 32]));
        assert!(!verify(&env, &leaf(&env, &member), &proof, &tree.root()));
    }

    #[test]
    fn discount_leaf_commits_to_amount() {
        let env = Env::default();
        let member = Address::generate(&env);
        let list = Vec::from_array(&env, [(member.clone(), 500u32), (Address::generate(&env), 0)]);
        let tree = AllowlistTree::from_discounts(&env, &list);

        let proof = tree.proof_for_discount(&member, 500).unwrap();
        assert!(verify(&env, &discount_leaf(&env, &member, 500), &proof, &tree.root()));
        assert!(!verify(&env, &discount_leaf(&env, &member, 1_000), &proof, &tree.root()));
        assert!(!verify(&env, &leaf(&env, &member), &proof, &tree.root()));
        assert!(tree.proof_for_discount(&member, 1_000).is_none());
    }

    #[test]
    fn empty_tree_root_is_zero() {
        let env = Env::default();
        let tree = AllowlistTree::new(&env, Vec::new(&env));
        assert_eq!(tree.root(), BytesN::from_array(&env, &[0u8; 32]));
    }
}
