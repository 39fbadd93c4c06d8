//! Canonical big-integer encodings shared with the proving circuit.
//!
//! Byte encodings are always 32-byte big-endian. Limb decompositions are
//! least-significant limb first, and fixtures serialize them in that same
//! order. The limb width and count are never implied: every call site passes
//! a [`LimbLayout`].

use halo2curves_axiom::{
    bn256::Fr,
    ff::{Field, PrimeField},
};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{FixtureError, Result};

/// Arbitrary-precision non-negative integer used for keys, digests and field elements.
pub type Scalar = BigUint;

/// Order of the BN254 scalar field, the native field of the proving circuit.
pub const BN254_MODULUS_DEC: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

pub static BN254_MODULUS: Lazy<BigUint> = Lazy::new(|| {
    BN254_MODULUS_DEC
        .parse()
        .expect("BN254 modulus constant is valid decimal")
});

/// Width and count of the limbs used to carry a non-native integer in-circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LimbLayout {
    pub bits_per_limb: u32,
    pub limb_count: usize,
}

impl LimbLayout {
    /// Three 86-bit limbs (airdrop and voting circuits).
    pub const K3_86: Self = Self::new(86, 3);
    /// Four 64-bit limbs (friend-of-friend circuit).
    pub const K4_64: Self = Self::new(64, 4);

    pub const fn new(bits_per_limb: u32, limb_count: usize) -> Self {
        Self {
            bits_per_limb,
            limb_count,
        }
    }

    /// Number of bits representable by this layout.
    pub fn capacity_bits(&self) -> u64 {
        u64::from(self.bits_per_limb) * self.limb_count as u64
    }

    pub fn validate(&self) -> Result<()> {
        if self.bits_per_limb == 0 || self.limb_count == 0 {
            return Err(FixtureError::invalid_input(format!(
                "limb layout {}x{} is empty",
                self.limb_count, self.bits_per_limb
            )));
        }
        Ok(())
    }
}

/// Interpret 32 bytes as a big-endian integer.
pub fn bytes_to_scalar(bytes: &[u8; 32]) -> Scalar {
    BigUint::from_bytes_be(bytes)
}

/// Encode `x` as exactly 32 big-endian bytes, left-padded with zeros.
pub fn scalar_to_bytes(x: &Scalar) -> Result<[u8; 32]> {
    let be = x.to_bytes_be();
    if be.len() > 32 {
        return Err(FixtureError::overflow(format!(
            "{}-bit value does not fit in 32 bytes",
            x.bits()
        )));
    }
    let mut out = [0u8; 32];
    out[32 - be.len()..].copy_from_slice(&be);
    Ok(out)
}

/// Split `x` into `layout.limb_count` limbs of `layout.bits_per_limb` bits,
/// least-significant limb first.
pub fn decompose_limbs(x: &Scalar, layout: LimbLayout) -> Result<Vec<Scalar>> {
    layout.validate()?;
    if x.bits() > layout.capacity_bits() {
        return Err(FixtureError::overflow(format!(
            "{}-bit value exceeds {}x{} limb budget",
            x.bits(),
            layout.limb_count,
            layout.bits_per_limb
        )));
    }

    let mask = (BigUint::one() << layout.bits_per_limb) - 1u32;
    let mut rest = x.clone();
    let limbs = (0..layout.limb_count)
        .map(|_| {
            let limb = &rest & &mask;
            rest >>= layout.bits_per_limb;
            limb
        })
        .collect();
    Ok(limbs)
}

/// Inverse of [`decompose_limbs`].
pub fn compose_limbs(limbs: &[Scalar], bits_per_limb: u32) -> Scalar {
    limbs
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, limb| (acc << bits_per_limb) + limb)
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer.
pub fn parse_scalar(text: &str) -> Result<Scalar> {
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16),
        None => BigUint::parse_bytes(trimmed.as_bytes(), 10),
    };
    parsed.ok_or_else(|| FixtureError::invalid_input(format!("not an integer: {text:?}")))
}

/// Base-10 rendering of every element, in order.
pub fn to_decimal_strings(values: &[Scalar]) -> Vec<String> {
    values.iter().map(|v| v.to_str_radix(10)).collect()
}

/// Map `x` into the BN254 scalar field, reducing modulo the field order.
pub fn scalar_to_fr(x: &Scalar) -> Fr {
    let base = Fr::from(256);
    x.to_bytes_be()
        .iter()
        .fold(Fr::ZERO, |acc, byte| acc * base + Fr::from(u64::from(*byte)))
}

pub fn fr_to_scalar(fr: &Fr) -> Scalar {
    BigUint::from_bytes_le(fr.to_repr().as_ref())
}

/// True when `x` is a canonical BN254 scalar-field element.
pub fn is_field_element(x: &Scalar) -> bool {
    x < &*BN254_MODULUS
}
