//! Deterministic fixture generation for the zkid membership / attestation
//! circuits.
//!
//! Private keys are always supplied by the caller. Every fixture is a pure
//! function of the configuration, so two runs produce byte-identical files.

pub mod config;
pub mod ecdsa;
pub mod keys;
pub mod message;
pub mod proof;
pub mod record;
pub mod scenario;
pub mod writer;

pub use config::{
    AirdropConfig, FixtureConfig, FriendChainConfig, ScenarioConfig, VotingConfig,
};
pub use ecdsa::{derive_public_key, verify_signature, Address, EcdsaSignature, KeyPair, PublicKey};
pub use keys::{participant_leaf, ParticipantKeys};
pub use message::{ethereum_signed_message, hash_message, keccak256, MessageEncoding};
pub use proof::{ProofArtifact, DEFAULT_VK_FIELDS, PUB_INPUT_FIELD};
pub use record::{remove_field, remove_fields, FixtureRecord};
pub use scenario::{
    run, run_batch, Airdrop, BatchReport, ChainStep, FailurePolicy, FriendChain, IndexFailure,
    Scenario, Voting,
};
pub use writer::{fixture_file_name, FixtureWriter, WrittenFixture};
