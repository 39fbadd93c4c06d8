use tracing::debug;
use zkid_common::{bytes_to_scalar, decompose_limbs, MerkleTree, MimcSponge, Result};

use super::{with_signature, FailurePolicy, Scenario};
use crate::{
    config::VotingConfig, keys::ParticipantKeys, record::FixtureRecord, writer::FixtureWriter,
};

/// Selective voting: membership in the full eligibility tree plus a voter
/// tree where only the coordinator and the current voter are enabled.
pub struct Voting {
    keys: ParticipantKeys,
    hasher: MimcSponge,
    config: VotingConfig,
    eligible: MerkleTree,
}

impl Voting {
    pub fn new(keys: ParticipantKeys, hasher: MimcSponge, config: VotingConfig) -> Result<Self> {
        let eligible = MerkleTree::build(config.depth, keys.leaves(&hasher)?, &hasher)?;
        debug!(depth = config.depth, root = %eligible.root(), "built eligibility tree");
        Ok(Self {
            keys,
            hasher,
            config,
            eligible,
        })
    }

    /// Keys enabled in the voter tree for `index`.
    pub fn voter_keys(&self, index: usize) -> ParticipantKeys {
        self.keys
            .enabled_subset(&[self.config.coordinator_index, index])
    }
}

impl Scenario for Voting {
    fn name(&self) -> &'static str {
        "voting"
    }

    fn policy(&self) -> FailurePolicy {
        FailurePolicy::Continue
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn build_fixture(&self, index: usize, _writer: &FixtureWriter) -> Result<FixtureRecord> {
        let layout = self.config.limbs;
        let pair = self.keys.key_pair(index)?;
        let eligible_path = self.eligible.path(index)?;

        let voters = self.voter_keys(index);
        let voter_tree = MerkleTree::build(self.config.depth, voters.leaves(&self.hasher)?, &self.hasher)?;
        let voter_path = voter_tree.path(index)?;
        debug!(index, voter_root = %voter_tree.root(), "built voter tree");

        let digest = self
            .config
            .message_encoding
            .digest(self.config.message.as_bytes(), None)?;
        let signature = pair.sign_digest(&digest)?;

        let record = FixtureRecord::new()
            .with_scalar("eligibleRoot", &self.eligible.root())
            .with_scalar("voterRoot", &voter_tree.root());
        let record = with_signature(record, &signature, layout)?
            .with_limbs("msghash", &decompose_limbs(&bytes_to_scalar(&digest), layout)?)
            .with_point_limbs("pubkey", &pair.public().to_limbs(layout)?)
            .with_path("eligiblePathElements", "eligiblePathIndices", &eligible_path)
            .with_path("voterPathElements", "voterPathIndices", &voter_path)
            .with_count("voteCount", voters.enabled_count());
        Ok(record)
    }
}
