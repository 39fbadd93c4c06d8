//! Poseidon over BN254 with the parameters used by the proof-of-funds circuits.

use halo2curves_axiom::{bn256::Fr, ff::Field};
use poseidon_primitives::poseidon::primitives::{Hash as PoseidonHash, Spec, VariableLengthIden3};

use super::FieldHash;
use crate::codec::{fr_to_scalar, scalar_to_fr, Scalar};

pub const POSEIDON_T: usize = 6;
pub const POSEIDON_RATE: usize = 5;
pub const POSEIDON_FULL_ROUNDS: usize = 8;
pub const POSEIDON_PARTIAL_ROUNDS: usize = 57;
pub const POSEIDON_CAPACITY: u128 = 1u128 << 64;

/// Variable-length Poseidon sponge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Poseidon;

impl FieldHash for Poseidon {
    fn hash_many(&self, inputs: &[Scalar]) -> Scalar {
        let elements: Vec<Fr> = inputs.iter().map(scalar_to_fr).collect();
        let digest =
            PoseidonHash::<Fr, ZkPoseidonSpec, VariableLengthIden3, POSEIDON_T, POSEIDON_RATE>::init()
                .hash_with_cap(&elements, POSEIDON_CAPACITY);
        fr_to_scalar(&digest)
    }
}

#[derive(Debug)]
struct ZkPoseidonSpec;

impl Spec<Fr, POSEIDON_T, POSEIDON_RATE> for ZkPoseidonSpec {
    fn full_rounds() -> usize {
        POSEIDON_FULL_ROUNDS
    }

    fn partial_rounds() -> usize {
        POSEIDON_PARTIAL_ROUNDS
    }

    fn sbox(val: Fr) -> Fr {
        val.pow_vartime([5])
    }

    fn secure_mds() -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;
    use crate::codec::is_field_element;

    #[test]
    fn poseidon_is_deterministic_and_order_sensitive() {
        let a = [BigUint::from(1u32), BigUint::from(2u32), BigUint::from(3u32)];
        let b = [BigUint::from(3u32), BigUint::from(2u32), BigUint::from(1u32)];
        let h = Poseidon;
        assert_eq!(h.hash_many(&a), h.hash_many(&a));
        assert_ne!(h.hash_many(&a), h.hash_many(&b));
        assert!(is_field_element(&h.hash_many(&a)));
    }
}
