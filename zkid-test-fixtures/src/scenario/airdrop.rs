use tracing::debug;
use zkid_common::{bytes_to_scalar, decompose_limbs, MerkleTree, MimcSponge, Result};

use super::{with_signature, FailurePolicy, Scenario};
use crate::{
    config::AirdropConfig, keys::ParticipantKeys, record::FixtureRecord, writer::FixtureWriter,
};

/// One claim per participant against a single eligibility tree.
pub struct Airdrop {
    keys: ParticipantKeys,
    config: AirdropConfig,
    tree: MerkleTree,
}

impl Airdrop {
    pub fn new(keys: ParticipantKeys, hasher: MimcSponge, config: AirdropConfig) -> Result<Self> {
        let tree = MerkleTree::build(config.depth, keys.leaves(&hasher)?, &hasher)?;
        debug!(depth = config.depth, root = %tree.root(), "built eligibility tree");
        Ok(Self { keys, config, tree })
    }

    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }
}

impl Scenario for Airdrop {
    fn name(&self) -> &'static str {
        "airdrop"
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
        let address = pair.address()?;
        let path = self.tree.path(index)?;

        let digest = self
            .config
            .message_encoding
            .digest(self.config.message.as_bytes(), None)?;
        let signature = pair.sign_digest(&digest)?;

        let record = FixtureRecord::new().with_scalar("root", &self.tree.root());
        let record = with_signature(record, &signature, layout)?
            .with_limbs("msghash", &decompose_limbs(&bytes_to_scalar(&digest), layout)?)
            .with_point_limbs("pubkey", &pair.public().to_limbs(layout)?)
            .with_path("pathElements", "pathIndices", &path)
            .with_scalar("leaf", &path.leaf)
            .with_scalar("address", &address.to_scalar());
        Ok(record)
    }
}
