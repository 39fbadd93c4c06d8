//! Field-native hash functions over the BN254 scalar field.
//!
//! [`FieldHash`] is the seam between the hash primitive and its users: the
//! Merkle engine only needs `hash2`, the commitment engine and leaf
//! derivation use `hash_many` / `hash1`.

mod mimc;
mod poseidon;

pub use mimc::{MimcSponge, DEFAULT_MIMC_KEY, MIMC_ROUNDS};
pub use poseidon::{
    Poseidon, POSEIDON_CAPACITY, POSEIDON_FULL_ROUNDS, POSEIDON_PARTIAL_ROUNDS, POSEIDON_RATE,
    POSEIDON_T,
};

use crate::codec::Scalar;

/// Deterministic hash whose output is always a canonical field element.
///
/// Inputs are field elements; values at or above the modulus are reduced.
pub trait FieldHash {
    /// Hash an arbitrary number of field elements.
    fn hash_many(&self, inputs: &[Scalar]) -> Scalar;

    fn hash1(&self, value: &Scalar) -> Scalar {
        self.hash_many(std::slice::from_ref(value))
    }

    /// Two-to-one compression used for Merkle parents.
    fn hash2(&self, left: &Scalar, right: &Scalar) -> Scalar {
        self.hash_many(&[left.clone(), right.clone()])
    }
}

impl<H: FieldHash + ?Sized> FieldHash for &H {
    fn hash_many(&self, inputs: &[Scalar]) -> Scalar {
        (**self).hash_many(inputs)
    }
}
