//! Fixed-depth binary Merkle tree with authentication paths.
//!
//! Only the populated prefix of each level is stored. Positions past it are
//! the all-zero subtree of that level, so the root equals the root of the
//! tree padded with `0` leaves up to `2^depth`.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::{
    codec::{to_decimal_strings, Scalar},
    error::{FixtureError, Result},
    hash::FieldHash,
};

pub const MAX_TREE_DEPTH: usize = 32;

/// Value of an absent or disabled leaf slot. Never hashed.
pub fn default_leaf() -> Scalar {
    BigUint::zero()
}

#[derive(Clone, Debug)]
pub struct MerkleTree {
    depth: usize,
    /// `layers[0]` holds the supplied leaves, `layers[depth]` the root.
    layers: Vec<Vec<Scalar>>,
    /// `zeros[l]` is the root of an empty subtree of height `l`.
    zeros: Vec<Scalar>,
}

/// Authentication path for one leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerklePath {
    pub leaf: Scalar,
    pub index: usize,
    /// Sibling value at each level, bottom-up.
    pub elements: Vec<Scalar>,
    /// `0` when the node at that level is a left child, `1` otherwise.
    pub indices: Vec<u8>,
    pub root: Scalar,
}

/// Decimal-string form of a path as the circuit inputs expect it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncodedPath {
    pub path_elements: Vec<String>,
    pub path_indices: Vec<u8>,
}

impl MerkleTree {
    /// Build a tree of `depth` levels over `leaves`, right-padded with `0`.
    pub fn build<H: FieldHash>(depth: usize, leaves: Vec<Scalar>, hasher: &H) -> Result<Self> {
        if depth == 0 || depth > MAX_TREE_DEPTH {
            return Err(FixtureError::invalid_input(format!(
                "tree depth {depth} outside 1..={MAX_TREE_DEPTH}"
            )));
        }
        let capacity = 1usize << depth;
        if leaves.len() > capacity {
            return Err(FixtureError::invalid_input(format!(
                "{} leaves exceed capacity {capacity} of depth-{depth} tree",
                leaves.len()
            )));
        }

        let mut zeros = Vec::with_capacity(depth + 1);
        zeros.push(default_leaf());
        for level in 0..depth {
            let below = &zeros[level];
            zeros.push(hasher.hash2(below, below));
        }

        let mut layers = Vec::with_capacity(depth + 1);
        layers.push(leaves);
        for level in 0..depth {
            let current = &layers[level];
            let parents = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hasher.hash2(left, right),
                    [left] => hasher.hash2(left, &zeros[level]),
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect::<Vec<_>>();
            layers.push(parents);
        }

        Ok(Self {
            depth,
            layers,
            zeros,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn capacity(&self) -> usize {
        1usize << self.depth
    }

    pub fn root(&self) -> Scalar {
        self.node(self.depth, 0)
    }

    /// Leaf at `index`, including padded positions.
    pub fn leaf(&self, index: usize) -> Result<Scalar> {
        self.check_index(index)?;
        Ok(self.node(0, index))
    }

    /// Authentication path for the leaf at `index`.
    pub fn path(&self, index: usize) -> Result<MerklePath> {
        self.check_index(index)?;
        let mut elements = Vec::with_capacity(self.depth);
        let mut indices = Vec::with_capacity(self.depth);
        let mut position = index;
        for level in 0..self.depth {
            elements.push(self.node(level, position ^ 1));
            indices.push((position & 1) as u8);
            position >>= 1;
        }
        Ok(MerklePath {
            leaf: self.node(0, index),
            index,
            elements,
            indices,
            root: self.root(),
        })
    }

    fn node(&self, level: usize, position: usize) -> Scalar {
        self.layers[level]
            .get(position)
            .cloned()
            .unwrap_or_else(|| self.zeros[level].clone())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.capacity() {
            return Err(FixtureError::IndexOutOfRange {
                index,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}

impl MerklePath {
    /// Recompute the root from `leaf` and the siblings.
    pub fn compute_root<H: FieldHash>(&self, leaf: &Scalar, hasher: &H) -> Scalar {
        self.elements
            .iter()
            .zip(&self.indices)
            .fold(leaf.clone(), |node, (sibling, bit)| {
                if *bit == 0 {
                    hasher.hash2(&node, sibling)
                } else {
                    hasher.hash2(sibling, &node)
                }
            })
    }

    pub fn verify<H: FieldHash>(&self, hasher: &H) -> bool {
        self.compute_root(&self.leaf, hasher) == self.root
    }

    pub fn encode(&self) -> EncodedPath {
        EncodedPath {
            path_elements: to_decimal_strings(&self.elements),
            path_indices: self.indices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::MimcSponge;

    fn leaves(n: u32) -> Vec<Scalar> {
        (1..=n).map(BigUint::from).collect()
    }

    #[test]
    fn root_matches_fully_padded_tree() {
        let h = MimcSponge::default();
        let tree = MerkleTree::build(3, leaves(3), &h).unwrap();

        let mut level: Vec<Scalar> = leaves(3);
        level.resize(8, BigUint::zero());
        while level.len() > 1 {
            level = level.chunks(2).map(|p| h.hash2(&p[0], &p[1])).collect();
        }
        assert_eq!(tree.root(), level[0]);
    }

    #[test]
    fn path_indices_follow_index_bits() {
        let h = MimcSponge::default();
        let tree = MerkleTree::build(4, leaves(5), &h).unwrap();
        let path = tree.path(0b1010).unwrap();
        assert_eq!(path.indices, vec![0, 1, 0, 1]);
        assert_eq!(path.leaf, BigUint::zero());
        assert!(path.verify(&h));
    }

    #[test]
    fn sibling_of_last_supplied_leaf_is_zero() {
        let h = MimcSponge::default();
        let tree = MerkleTree::build(2, leaves(3), &h).unwrap();
        let path = tree.path(2).unwrap();
        assert_eq!(path.elements[0], BigUint::zero());
        assert_eq!(tree.leaf(3).unwrap(), BigUint::zero());
    }

    #[test]
    fn too_many_leaves_is_invalid_input() {
        let h = MimcSponge::default();
        let err = MerkleTree::build(2, leaves(5), &h).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidInput(_)));
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let h = MimcSponge::default();
        let tree = MerkleTree::build(2, leaves(2), &h).unwrap();
        assert!(matches!(
            tree.path(4),
            Err(FixtureError::IndexOutOfRange {
                index: 4,
                capacity: 4
            })
        ));
    }

    #[test]
    fn depth_is_part_of_root_identity() {
        let h = MimcSponge::default();
        let shallow = MerkleTree::build(3, leaves(4), &h).unwrap();
        let deep = MerkleTree::build(4, leaves(4), &h).unwrap();
        assert_ne!(shallow.root(), deep.root());
    }

    #[test]
    fn zero_depth_is_rejected() {
        let h = MimcSponge::default();
        assert!(MerkleTree::build(0, vec![], &h).is_err());
    }
}
