use std::path::PathBuf;

use tracing::debug;
use zkid_common::{compute_commitment, CommitmentConfig, FixtureError, MimcSponge, Result, Scalar};

use super::{with_signature, FailurePolicy, Scenario};
use crate::{
    config::FriendChainConfig,
    ecdsa::Address,
    keys::ParticipantKeys,
    message::MessageEncoding,
    proof::ProofArtifact,
    record::FixtureRecord,
    writer::FixtureWriter,
};

/// One node of the chain's dependency graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainStep {
    pub index: usize,
    /// Step whose persisted fixture must exist and agree with this one.
    pub depends_on: Option<usize>,
    pub proof_path: PathBuf,
}

/// Friend-of-friend attestations: key `i` vouches for the address of key
/// `i + 1`, at degree `i + 1` from the originator (key 0).
pub struct FriendChain {
    keys: ParticipantKeys,
    config: FriendChainConfig,
    commitment: CommitmentConfig,
    originator: Address,
    steps: Vec<ChainStep>,
}

impl FriendChain {
    pub fn new(keys: ParticipantKeys, hasher: MimcSponge, config: FriendChainConfig) -> Result<Self> {
        let originator = keys.key_pair(0)?.address()?;
        let steps = Self::plan(&config, keys.len());
        let commitment = config.commitment(hasher);
        Ok(Self {
            keys,
            config,
            commitment,
            originator,
            steps,
        })
    }

    /// Steps `0..key_count-1`, each depending on its predecessor.
    pub fn plan(config: &FriendChainConfig, key_count: usize) -> Vec<ChainStep> {
        (0..key_count.saturating_sub(1))
            .map(|index| ChainStep {
                index,
                depends_on: index.checked_sub(1),
                proof_path: config.proof_path(index),
            })
            .collect()
    }

    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }

    /// Message body signed by the source: prefix followed by the sink address.
    pub fn attestation(&self, sink: &Address) -> String {
        format!("{}{}", self.config.friend_prefix, sink.to_hex())
    }

    fn check_predecessor(
        &self,
        predecessor: usize,
        index: usize,
        source: &Address,
        writer: &FixtureWriter,
    ) -> Result<()> {
        let previous = writer.read_back(predecessor)?;
        let sink = previous.scalar("sinkAddress")?;
        if sink != source.to_scalar() {
            return Err(FixtureError::invalid_input(format!(
                "step {predecessor} vouched for a different address than the source of step {index}"
            )));
        }
        let degree = previous.scalar("degree")?;
        if degree != Scalar::from(index) {
            return Err(FixtureError::invalid_input(format!(
                "step {predecessor} has degree {degree}, expected {index}"
            )));
        }
        Ok(())
    }
}

impl Scenario for FriendChain {
    fn name(&self) -> &'static str {
        "friend_chain"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Abort
    }

    fn len(&self) -> usize {
        self.steps.len()
    }

    fn build_fixture(&self, index: usize, writer: &FixtureWriter) -> Result<FixtureRecord> {
        let step = self.steps.get(index).ok_or(FixtureError::IndexOutOfRange {
            index,
            capacity: self.steps.len(),
        })?;
        let layout = self.config.limbs;
        let source = self.keys.key_pair(step.index)?;
        let source_address = source.address()?;
        let sink = self.keys.key_pair(step.index + 1)?.address()?;

        if let Some(predecessor) = step.depends_on {
            self.check_predecessor(predecessor, step.index, &source_address, writer)?;
        }

        let proof = ProofArtifact::load(&step.proof_path)?;
        let elements = proof.vk_elements(&self.config.vk_fields)?;
        let commitment = compute_commitment(&self.commitment, &elements, &[])?;

        let message = self.attestation(&sink);
        let digest = MessageEncoding::EthereumSigned
            .digest(message.as_bytes(), self.config.legacy_declared_length)?;
        let signature = source.sign_digest(&digest)?;
        debug!(index = step.index, %sink, %commitment, "signed friend attestation");

        let record = FixtureRecord::new()
            .with_scalar("semiPublicCommitment", &commitment)
            .with_count("degree", step.index + 1)
            .with_scalar("originator", &self.originator.to_scalar())
            .with_scalar("sinkAddress", &sink.to_scalar());
        let record = with_signature(record, &signature, layout)?
            .with_point_limbs("sourcePubkey", &source.public().to_limbs(layout)?)
            .with_passthrough(&proof.passthrough(&self.config.excluded_fields));
        Ok(record)
    }
}
