//! secp256k1 keys, Ethereum addresses and deterministic low-s signatures.

use std::fmt;

use k256::{
    ecdsa::{
        signature::hazmat::{PrehashSigner, PrehashVerifier},
        Signature, SigningKey, VerifyingKey,
    },
    SecretKey,
};
use num_bigint::BigUint;
use num_traits::Zero;
use once_cell::sync::Lazy;
use zkid_common::{decompose_limbs, scalar_to_bytes, FixtureError, LimbLayout, Result, Scalar};

use crate::message::keccak256;

pub const SECP256K1_ORDER_HEX: &str =
    "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

pub static SECP256K1_ORDER: Lazy<BigUint> = Lazy::new(|| {
    BigUint::parse_bytes(SECP256K1_ORDER_HEX.as_bytes(), 16)
        .expect("secp256k1 order constant is valid hex")
});

/// Uncompressed public key coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub x: Scalar,
    pub y: Scalar,
}

impl PublicKey {
    /// Last 20 bytes of keccak256(x || y).
    pub fn address(&self) -> Result<Address> {
        let mut uncompressed = [0u8; 64];
        uncompressed[..32].copy_from_slice(&scalar_to_bytes(&self.x)?);
        uncompressed[32..].copy_from_slice(&scalar_to_bytes(&self.y)?);
        let digest = keccak256(&uncompressed);
        let mut address = [0u8; 20];
        address.copy_from_slice(&digest[12..]);
        Ok(Address(address))
    }

    /// `[x_limbs, y_limbs]` under `layout`.
    pub fn to_limbs(&self, layout: LimbLayout) -> Result<[Vec<Scalar>; 2]> {
        Ok([
            decompose_limbs(&self.x, layout)?,
            decompose_limbs(&self.y, layout)?,
        ])
    }
}

/// 20-byte Ethereum account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Big-endian integer value, as hashed into Merkle leaves.
    pub fn to_scalar(&self) -> Scalar {
        BigUint::from_bytes_be(&self.0)
    }

    /// Lower-case `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

/// ECDSA signature with `s` in the lower half of the curve order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    pub r: Scalar,
    pub s: Scalar,
}

impl EcdsaSignature {
    pub fn is_low_s(&self) -> bool {
        self.s <= half_order()
    }
}

fn half_order() -> BigUint {
    &*SECP256K1_ORDER >> 1u32
}

/// Replace `s` with `n - s` when it lies in the upper half of the order.
pub fn normalize_low_s(s: Scalar) -> Scalar {
    if s > half_order() {
        &*SECP256K1_ORDER - s
    } else {
        s
    }
}

/// A caller-supplied private scalar and the public key derived from it.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    public: PublicKey,
}

impl KeyPair {
    /// Fails with `InvalidKey` unless `1 <= secret < n`.
    pub fn from_secret(secret: &Scalar) -> Result<Self> {
        if secret.is_zero() || secret >= &*SECP256K1_ORDER {
            return Err(FixtureError::invalid_key(
                "private key must lie in [1, n-1] for the secp256k1 order n",
            ));
        }
        let bytes = scalar_to_bytes(secret)?;
        let secret_key = SecretKey::from_bytes(&bytes.into())
            .map_err(|err| FixtureError::invalid_key(format!("rejected private key: {err}")))?;
        let signing_key = SigningKey::from(secret_key);

        let encoded = VerifyingKey::from(&signing_key).to_encoded_point(false);
        let x = encoded
            .x()
            .ok_or_else(|| FixtureError::invalid_key("missing x coordinate"))?;
        let y = encoded
            .y()
            .ok_or_else(|| FixtureError::invalid_key("missing y coordinate"))?;

        Ok(Self {
            signing_key,
            public: PublicKey {
                x: BigUint::from_bytes_be(x),
                y: BigUint::from_bytes_be(y),
            },
        })
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    pub fn address(&self) -> Result<Address> {
        self.public.address()
    }

    /// RFC6979 signature over a 32-byte digest, normalized to low-s.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<EcdsaSignature> {
        let signature: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|err| FixtureError::invalid_input(format!("failed to sign digest: {err}")))?;
        let bytes = signature.to_bytes();
        Ok(EcdsaSignature {
            r: BigUint::from_bytes_be(&bytes[..32]),
            s: normalize_low_s(BigUint::from_bytes_be(&bytes[32..])),
        })
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

pub fn derive_public_key(secret: &Scalar) -> Result<PublicKey> {
    KeyPair::from_secret(secret).map(|pair| pair.public)
}

/// Check `signature` over `digest` against `public`.
pub fn verify_signature(
    public: &PublicKey,
    digest: &[u8; 32],
    signature: &EcdsaSignature,
) -> Result<bool> {
    let mut sec1 = [0u8; 65];
    sec1[0] = 0x04;
    sec1[1..33].copy_from_slice(&scalar_to_bytes(&public.x)?);
    sec1[33..].copy_from_slice(&scalar_to_bytes(&public.y)?);
    let verifying_key = VerifyingKey::from_sec1_bytes(&sec1)
        .map_err(|err| FixtureError::invalid_key(format!("invalid public key: {err}")))?;

    let r = scalar_to_bytes(&signature.r)?;
    let s = scalar_to_bytes(&signature.s)?;
    let Ok(signature) = Signature::from_scalars(r, s) else {
        return Ok(false);
    };
    Ok(verifying_key.verify_prehash(digest, &signature).is_ok())
}
