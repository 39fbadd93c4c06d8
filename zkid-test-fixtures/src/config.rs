//! Batch configuration: output location, field-hash key, participant keys and
//! the scenario to run. Loaded from JSON or taken from a built-in preset.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zkid_common::{
    read_json, CommitmentConfig, CommitmentHashKind, FixtureError, LimbLayout, MimcSponge, Result,
    DEFAULT_MIMC_KEY, MAX_TREE_DEPTH,
};

use crate::{
    keys::ParticipantKeys,
    message::MessageEncoding,
    proof::{DEFAULT_VK_FIELDS, PUB_INPUT_FIELD},
};

pub const AIRDROP_MESSAGE: &str = "im a teapot";
pub const FRIEND_PREFIX: &str = "ETHdos friend: ";
pub const DEFAULT_PROOF_FILE_PATTERN: &str = "full-circom-input-{index}.json";
pub const INDEX_PLACEHOLDER: &str = "{index}";

const AIRDROP_KEYS: [&str; 4] = [
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    "88549154299169935420064281163296845505587953610183896504176354567359434168161",
    "90388020393783788847120091912026443124559466591761394939671630294477859800601",
    "0x4d5db4107d237df6a3d58ee5f70ae63d73d7658d4026f2eefd2f204c81682cb7",
];

const VOTING_KEYS: [&str; 4] = [
    "88549154299169935420064281163296845505587953610183896504176354567359434168161",
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    "90388020393783788847120091912026443124559466591761394939671630294477859800601",
    "0x4d5db4107d237df6a3d58ee5f70ae63d73d7658d4026f2eefd2f204c81682cb7",
];

const CHAIN_KEYS: [&str; 5] = [
    "88549154299169935420064281163296845505587953610183896504176354567359434168161",
    "98855089179455197279583810751921776194429729927600246755329568052735742445312",
    "37706893564732085918706190942542566344879680306879183356840008504374628845468",
    "90388020393783788847120091912026443124559466591761394939671630294477859800601",
    "110977009687373213104962226057480551605828725303063265716157300460694423838923",
];

pub const AIRDROP_DEPTH: usize = 5;
pub const VOTING_DEPTH: usize = 22;

fn default_field_hash_key() -> u64 {
    DEFAULT_MIMC_KEY
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureConfig {
    pub output_dir: PathBuf,
    /// Key added in every MiMC round.
    #[serde(default = "default_field_hash_key")]
    pub field_hash_key: u64,
    /// Decimal or `0x` hex private keys; `null` or `"0"` disables a slot.
    pub private_keys: Vec<Option<String>>,
    pub scenario: ScenarioConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioConfig {
    Airdrop(AirdropConfig),
    Voting(VotingConfig),
    FriendChain(FriendChainConfig),
}

impl ScenarioConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Airdrop(_) => "airdrop",
            Self::Voting(_) => "voting",
            Self::FriendChain(_) => "friend_chain",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirdropConfig {
    pub depth: usize,
    pub message: String,
    #[serde(default)]
    pub message_encoding: MessageEncoding,
    pub limbs: LimbLayout,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingConfig {
    pub depth: usize,
    pub message: String,
    #[serde(default)]
    pub message_encoding: MessageEncoding,
    pub limbs: LimbLayout,
    /// Slot that stays enabled in every voter tree.
    #[serde(default)]
    pub coordinator_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendChainConfig {
    pub limbs: LimbLayout,
    pub proof_dir: PathBuf,
    /// File name under `proof_dir`; `{index}` is replaced by the step index.
    #[serde(default = "default_proof_file_pattern")]
    pub proof_file_pattern: String,
    #[serde(default = "default_vk_fields")]
    pub vk_fields: Vec<String>,
    #[serde(default = "default_excluded_fields")]
    pub excluded_fields: Vec<String>,
    #[serde(default = "default_commitment_hash")]
    pub commitment_hash: CommitmentHashKind,
    /// Defaults to the hasher's own shift.
    #[serde(default)]
    pub commitment_shift_bits: Option<u32>,
    #[serde(default = "default_friend_prefix")]
    pub friend_prefix: String,
    /// Historical hard-coded length in the signed-message prefix. Checked
    /// against the real length, never substituted for it.
    #[serde(default)]
    pub legacy_declared_length: Option<usize>,
}

fn default_proof_file_pattern() -> String {
    DEFAULT_PROOF_FILE_PATTERN.to_owned()
}

fn default_vk_fields() -> Vec<String> {
    DEFAULT_VK_FIELDS.iter().map(|f| (*f).to_owned()).collect()
}

fn default_excluded_fields() -> Vec<String> {
    vec![PUB_INPUT_FIELD.to_owned()]
}

fn default_commitment_hash() -> CommitmentHashKind {
    CommitmentHashKind::Mimc
}

fn default_friend_prefix() -> String {
    FRIEND_PREFIX.to_owned()
}

impl FriendChainConfig {
    pub fn proof_path(&self, index: usize) -> PathBuf {
        self.proof_dir.join(
            self.proof_file_pattern
                .replace(INDEX_PLACEHOLDER, &index.to_string()),
        )
    }

    pub fn commitment(&self, sponge: MimcSponge) -> CommitmentConfig {
        CommitmentConfig::from_kind(self.commitment_hash, sponge, self.commitment_shift_bits)
    }
}

impl FixtureConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.private_keys.is_empty() {
            return Err(FixtureError::invalid_input("private_keys is empty"));
        }
        match &self.scenario {
            ScenarioConfig::Airdrop(airdrop) => {
                validate_depth(airdrop.depth)?;
                airdrop.limbs.validate()
            }
            ScenarioConfig::Voting(voting) => {
                validate_depth(voting.depth)?;
                if voting.coordinator_index >= self.private_keys.len() {
                    return Err(FixtureError::invalid_input(format!(
                        "coordinator_index {} is outside the key list",
                        voting.coordinator_index
                    )));
                }
                voting.limbs.validate()
            }
            ScenarioConfig::FriendChain(chain) => {
                if self.private_keys.len() < 2 {
                    return Err(FixtureError::invalid_input(
                        "a friend chain needs at least two keys",
                    ));
                }
                if !chain.proof_file_pattern.contains(INDEX_PLACEHOLDER) {
                    return Err(FixtureError::invalid_input(format!(
                        "proof_file_pattern must contain {INDEX_PLACEHOLDER}"
                    )));
                }
                chain.limbs.validate()
            }
        }
    }

    pub fn participant_keys(&self) -> Result<ParticipantKeys> {
        ParticipantKeys::parse(&self.private_keys)
    }

    pub fn field_hash(&self) -> MimcSponge {
        MimcSponge::with_key(self.field_hash_key)
    }

    pub fn airdrop_preset(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            field_hash_key: DEFAULT_MIMC_KEY,
            private_keys: owned_keys(&AIRDROP_KEYS),
            scenario: ScenarioConfig::Airdrop(AirdropConfig {
                depth: AIRDROP_DEPTH,
                message: AIRDROP_MESSAGE.to_owned(),
                message_encoding: MessageEncoding::Raw,
                limbs: LimbLayout::K3_86,
            }),
        }
    }

    pub fn voting_preset(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            field_hash_key: DEFAULT_MIMC_KEY,
            private_keys: owned_keys(&VOTING_KEYS),
            scenario: ScenarioConfig::Voting(VotingConfig {
                depth: VOTING_DEPTH,
                message: AIRDROP_MESSAGE.to_owned(),
                message_encoding: MessageEncoding::Raw,
                limbs: LimbLayout::K3_86,
                coordinator_index: 0,
            }),
        }
    }

    pub fn friend_chain_preset(output_dir: impl Into<PathBuf>, proof_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            field_hash_key: DEFAULT_MIMC_KEY,
            private_keys: owned_keys(&CHAIN_KEYS),
            scenario: ScenarioConfig::FriendChain(FriendChainConfig {
                limbs: LimbLayout::K4_64,
                proof_dir: proof_dir.into(),
                proof_file_pattern: default_proof_file_pattern(),
                vk_fields: default_vk_fields(),
                excluded_fields: default_excluded_fields(),
                commitment_hash: default_commitment_hash(),
                commitment_shift_bits: None,
                friend_prefix: default_friend_prefix(),
                legacy_declared_length: None,
            }),
        }
    }
}

fn validate_depth(depth: usize) -> Result<()> {
    if depth == 0 || depth > MAX_TREE_DEPTH {
        return Err(FixtureError::invalid_input(format!(
            "tree depth {depth} outside 1..={MAX_TREE_DEPTH}"
        )));
    }
    Ok(())
}

fn owned_keys(keys: &[&str]) -> Vec<Option<String>> {
    keys.iter().map(|key| Some((*key).to_owned())).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_tagged_scenario_with_defaults() {
        let config: FixtureConfig = serde_json::from_value(json!({
            "output_dir": "out",
            "private_keys": ["1", null, "0"],
            "scenario": {
                "kind": "friend_chain",
                "limbs": {"bits_per_limb": 64, "limb_count": 4},
                "proof_dir": "proofs"
            }
        }))
        .unwrap();

        assert_eq!(config.field_hash_key, 123);
        let ScenarioConfig::FriendChain(chain) = &config.scenario else {
            panic!("expected friend chain");
        };
        assert_eq!(chain.limbs, LimbLayout::K4_64);
        assert_eq!(chain.excluded_fields, vec!["pubInput"]);
        assert_eq!(chain.vk_fields.len(), 4);
        assert_eq!(
            chain.proof_path(3),
            PathBuf::from("proofs").join("full-circom-input-3.json")
        );
        assert_eq!(config.participant_keys().unwrap().enabled_count(), 1);
    }

    #[test]
    fn limbs_are_required() {
        let parsed = serde_json::from_value::<FixtureConfig>(json!({
            "output_dir": "out",
            "private_keys": ["1"],
            "scenario": {"kind": "airdrop", "depth": 5, "message": "m"}
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn presets_validate() {
        FixtureConfig::airdrop_preset("out").validate().unwrap();
        FixtureConfig::voting_preset("out").validate().unwrap();
        FixtureConfig::friend_chain_preset("out", "proofs")
            .validate()
            .unwrap();
    }

    #[test]
    fn rejects_bad_depth_and_coordinator() {
        let mut config = FixtureConfig::voting_preset("out");
        if let ScenarioConfig::Voting(voting) = &mut config.scenario {
            voting.coordinator_index = 9;
        }
        assert!(config.validate().is_err());

        let mut config = FixtureConfig::airdrop_preset("out");
        if let ScenarioConfig::Airdrop(airdrop) = &mut config.scenario {
            airdrop.depth = 33;
        }
        assert!(config.validate().is_err());
    }
}
