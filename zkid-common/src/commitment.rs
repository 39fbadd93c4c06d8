//! Commitments binding a proof to a specific verifying key.
//!
//! Verifying-key group elements are flattened coordinate-by-coordinate in the
//! order the caller supplies them, public inputs are appended, and the result
//! is hashed and right-shifted by a fixed number of bits. Ordering is part of
//! the contract with the circuit.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha3::{Digest, Keccak256};
use tracing::debug;

use crate::{
    codec::{is_field_element, parse_scalar, scalar_to_bytes, Scalar},
    error::{FixtureError, Result},
    hash::{FieldHash, MimcSponge, Poseidon},
};

/// Smallest shift that brings a 256-bit keccak digest below the BN254 modulus.
pub const KECCAK_MIN_SHIFT: u32 = 3;

/// Hash used to fold the flattened verifying-key coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitmentHasher {
    Mimc(MimcSponge),
    Poseidon(Poseidon),
    /// keccak256 over the 32-byte big-endian encodings, concatenated.
    Keccak256,
}

/// Serializable selector for [`CommitmentHasher`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentHashKind {
    Mimc,
    Poseidon,
    Keccak256,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitmentConfig {
    pub hasher: CommitmentHasher,
    pub shift_bits: u32,
}

impl CommitmentConfig {
    pub fn mimc(sponge: MimcSponge) -> Self {
        Self {
            hasher: CommitmentHasher::Mimc(sponge),
            shift_bits: 0,
        }
    }

    pub fn poseidon() -> Self {
        Self {
            hasher: CommitmentHasher::Poseidon(Poseidon),
            shift_bits: 0,
        }
    }

    pub fn keccak256() -> Self {
        Self {
            hasher: CommitmentHasher::Keccak256,
            shift_bits: KECCAK_MIN_SHIFT,
        }
    }

    /// Build from a configured kind. `shift_bits` falls back to the kind's default.
    pub fn from_kind(kind: CommitmentHashKind, mimc: MimcSponge, shift_bits: Option<u32>) -> Self {
        let base = match kind {
            CommitmentHashKind::Mimc => Self::mimc(mimc),
            CommitmentHashKind::Poseidon => Self::poseidon(),
            CommitmentHashKind::Keccak256 => Self::keccak256(),
        };
        Self {
            shift_bits: shift_bits.unwrap_or(base.shift_bits),
            ..base
        }
    }
}

/// One verifying-key group element (or scalar), as its flattened coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VkElement {
    coordinates: Vec<Scalar>,
}

impl VkElement {
    pub fn scalar(value: Scalar) -> Self {
        Self {
            coordinates: vec![value],
        }
    }

    pub fn point(x: Scalar, y: Scalar) -> Self {
        Self {
            coordinates: vec![x, y],
        }
    }

    pub fn from_coordinates(coordinates: Vec<Scalar>) -> Self {
        Self { coordinates }
    }

    /// Flatten a nested JSON array of integers (strings or numbers), depth-first.
    pub fn from_json(value: &Value) -> Result<Self> {
        let mut coordinates = Vec::new();
        flatten_json(value, &mut coordinates)?;
        Ok(Self { coordinates })
    }

    pub fn coordinates(&self) -> &[Scalar] {
        &self.coordinates
    }
}

fn flatten_json(value: &Value, out: &mut Vec<Scalar>) -> Result<()> {
    match value {
        Value::Array(items) => items.iter().try_for_each(|item| flatten_json(item, out)),
        Value::String(text) => {
            out.push(parse_scalar(text)?);
            Ok(())
        }
        Value::Number(number) => {
            let value = number.as_u64().ok_or_else(|| {
                FixtureError::invalid_input(format!("non-integer coordinate {number}"))
            })?;
            out.push(BigUint::from(value));
            Ok(())
        }
        other => Err(FixtureError::invalid_input(format!(
            "unexpected verifying-key value {other}"
        ))),
    }
}

/// Flatten `elements` then `public_inputs` into one sequence.
pub fn flatten_inputs(elements: &[VkElement], public_inputs: &[Scalar]) -> Vec<Scalar> {
    elements
        .iter()
        .flat_map(|element| element.coordinates.iter().cloned())
        .chain(public_inputs.iter().cloned())
        .collect()
}

/// Fold verifying-key material (and optional public inputs) into one field element.
pub fn compute_commitment(
    config: &CommitmentConfig,
    elements: &[VkElement],
    public_inputs: &[Scalar],
) -> Result<Scalar> {
    let flattened = flatten_inputs(elements, public_inputs);
    let digest = match &config.hasher {
        CommitmentHasher::Mimc(sponge) => sponge.hash_many(&flattened),
        CommitmentHasher::Poseidon(poseidon) => poseidon.hash_many(&flattened),
        CommitmentHasher::Keccak256 => keccak_fold(&flattened)?,
    };
    let commitment = digest >> config.shift_bits;
    if !is_field_element(&commitment) {
        return Err(FixtureError::overflow(format!(
            "commitment does not fit the field after a {}-bit shift",
            config.shift_bits
        )));
    }
    debug!(
        inputs = flattened.len(),
        shift = config.shift_bits,
        %commitment,
        "computed commitment"
    );
    Ok(commitment)
}

fn keccak_fold(values: &[Scalar]) -> Result<Scalar> {
    let mut hasher = Keccak256::new();
    for value in values {
        hasher.update(scalar_to_bytes(value)?);
    }
    Ok(BigUint::from_bytes_be(&hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::codec::BN254_MODULUS;

    fn sample_elements() -> Vec<VkElement> {
        vec![
            VkElement::point(BigUint::from(1u32), BigUint::from(2u32)),
            VkElement::from_coordinates(vec![
                BigUint::from(3u32),
                BigUint::from(4u32),
                BigUint::from(5u32),
                BigUint::from(6u32),
            ]),
        ]
    }

    #[test]
    fn json_is_flattened_depth_first() {
        let value = json!([["1", "2"], [["3", 4], ["0x5", "6"]]]);
        let element = VkElement::from_json(&value).unwrap();
        assert_eq!(
            element.coordinates(),
            (1u32..=6).map(BigUint::from).collect::<Vec<_>>().as_slice()
        );
    }

    #[test]
    fn json_rejects_non_integers() {
        assert!(VkElement::from_json(&json!([["1", 2.5]])).is_err());
        assert!(VkElement::from_json(&json!([{"x": "1"}])).is_err());
    }

    #[test]
    fn mimc_commitment_is_plain_hash_many() {
        let sponge = MimcSponge::default();
        let elements = sample_elements();
        let commitment =
            compute_commitment(&CommitmentConfig::mimc(sponge), &elements, &[]).unwrap();
        assert_eq!(
            commitment,
            sponge.hash_many(&flatten_inputs(&elements, &[]))
        );
    }

    #[test]
    fn public_inputs_are_appended() {
        let config = CommitmentConfig::mimc(MimcSponge::default());
        let elements = sample_elements();
        let without = compute_commitment(&config, &elements, &[]).unwrap();
        let with = compute_commitment(&config, &elements, &[BigUint::from(9u32)]).unwrap();
        assert_ne!(without, with);
    }

    #[test]
    fn keccak_commitment_fits_field() {
        let commitment =
            compute_commitment(&CommitmentConfig::keccak256(), &sample_elements(), &[]).unwrap();
        assert!(commitment < *BN254_MODULUS);
        assert!(commitment.bits() <= 253);
    }

    #[test]
    fn keccak_without_shift_can_overflow_field() {
        let config = CommitmentConfig {
            hasher: CommitmentHasher::Keccak256,
            shift_bits: 0,
        };
        // Search a few inputs for a digest above the modulus; roughly 80% are.
        let overflowed = (0u32..16).any(|i| {
            matches!(
                compute_commitment(&config, &[VkElement::scalar(BigUint::from(i))], &[]),
                Err(FixtureError::EncodingOverflow(_))
            )
        });
        assert!(overflowed);
    }

    #[test]
    fn from_kind_keeps_explicit_shift() {
        let config =
            CommitmentConfig::from_kind(CommitmentHashKind::Keccak256, MimcSponge::default(), Some(8));
        assert_eq!(config.shift_bits, 8);
        let config =
            CommitmentConfig::from_kind(CommitmentHashKind::Keccak256, MimcSponge::default(), None);
        assert_eq!(config.shift_bits, KECCAK_MIN_SHIFT);
    }
}
