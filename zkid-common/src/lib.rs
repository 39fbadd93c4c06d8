//! Shared primitives for zkid circuit fixtures.
//!
//! - [`codec`]: 32-byte big-endian encodings and limb decomposition.
//! - [`hash`]: field-native hashes (MiMC sponge, Poseidon) behind [`FieldHash`].
//! - [`merkle`]: fixed-depth Merkle trees and authentication paths.
//! - [`commitment`]: verifying-key commitments.
//! - [`artifact`]: synchronous JSON writes and the batch manifest.

pub mod artifact;
pub mod codec;
pub mod commitment;
pub mod error;
pub mod hash;
pub mod merkle;

pub use artifact::{
    hash_bytes_hex, read_json, read_manifest, write_json, write_manifest, ArtifactFile,
    FixtureManifest, MANIFEST_FILE, MANIFEST_VERSION,
};
pub use codec::{
    bytes_to_scalar, compose_limbs, decompose_limbs, parse_scalar, scalar_to_bytes,
    to_decimal_strings, LimbLayout, Scalar, BN254_MODULUS,
};
pub use commitment::{
    compute_commitment, CommitmentConfig, CommitmentHashKind, CommitmentHasher, VkElement,
};
pub use error::{FixtureError, Result};
pub use hash::{FieldHash, MimcSponge, Poseidon, DEFAULT_MIMC_KEY};
pub use merkle::{default_leaf, EncodedPath, MerklePath, MerkleTree, MAX_TREE_DEPTH};
