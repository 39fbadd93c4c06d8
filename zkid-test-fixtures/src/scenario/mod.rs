//! Scenario drivers and the sequential batch runner.
//!
//! Each scenario turns one index into a [`FixtureRecord`]; the runner writes
//! it, records it in the manifest and applies the scenario's failure policy.

mod airdrop;
mod chain;
mod voting;

pub use airdrop::Airdrop;
pub use chain::{ChainStep, FriendChain};
pub use voting::Voting;

use std::path::PathBuf;

use tracing::{info, warn};
use zkid_common::{decompose_limbs, FixtureError, FixtureManifest, LimbLayout, Result};

use crate::{
    config::{FixtureConfig, ScenarioConfig},
    ecdsa::EcdsaSignature,
    record::FixtureRecord,
    writer::{FixtureWriter, WrittenFixture},
};

/// What the runner does after an index fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Indices are independent; record the failure and move on.
    Continue,
    /// Later indices depend on earlier ones; stop the batch.
    Abort,
}

pub trait Scenario {
    fn name(&self) -> &'static str;

    fn policy(&self) -> FailurePolicy;

    /// Number of indices in the batch.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the record for `index`. `writer` exposes artifacts persisted by
    /// earlier indices.
    fn build_fixture(&self, index: usize, writer: &FixtureWriter) -> Result<FixtureRecord>;
}

#[derive(Debug)]
pub struct IndexFailure {
    pub index: usize,
    pub error: FixtureError,
}

#[derive(Debug)]
pub struct BatchReport {
    pub scenario: &'static str,
    pub written: Vec<WrittenFixture>,
    pub failures: Vec<IndexFailure>,
    pub manifest_path: PathBuf,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|failure| failure.index).collect()
    }
}

/// Run the scenario described by `config` and write its fixtures.
pub fn run(config: &FixtureConfig) -> Result<BatchReport> {
    config.validate()?;
    let keys = config.participant_keys()?;
    let hasher = config.field_hash();
    let writer = FixtureWriter::new(&config.output_dir);

    match &config.scenario {
        ScenarioConfig::Airdrop(airdrop) => {
            run_batch(&Airdrop::new(keys, hasher, airdrop.clone())?, &writer)
        }
        ScenarioConfig::Voting(voting) => {
            run_batch(&Voting::new(keys, hasher, voting.clone())?, &writer)
        }
        ScenarioConfig::FriendChain(chain) => {
            run_batch(&FriendChain::new(keys, hasher, chain.clone())?, &writer)
        }
    }
}

/// Process every index in order. A write failure ends the batch regardless of
/// policy.
pub fn run_batch<S: Scenario>(scenario: &S, writer: &FixtureWriter) -> Result<BatchReport> {
    let name = scenario.name();
    let mut manifest = FixtureManifest::new(name);
    let mut written = Vec::new();
    let mut failures = Vec::new();

    for index in 0..scenario.len() {
        match scenario.build_fixture(index, writer) {
            Ok(record) => {
                let fixture = writer.write(index, &record)?;
                manifest.fixtures.push(fixture.artifact.clone());
                written.push(fixture);
            }
            Err(error) => {
                warn!(scenario = name, index, %error, "fixture generation failed");
                manifest.failed_indices.push(index);
                failures.push(IndexFailure { index, error });
                if scenario.policy() == FailurePolicy::Abort {
                    warn!(scenario = name, index, "aborting dependent batch");
                    break;
                }
            }
        }
    }

    let manifest_path = writer.write_manifest(&manifest)?;
    info!(
        scenario = name,
        written = written.len(),
        failed = failures.len(),
        manifest = %manifest_path.display(),
        "batch finished"
    );
    Ok(BatchReport {
        scenario: name,
        written,
        failures,
        manifest_path,
    })
}

/// `r` and `s` limbs under `layout`, appended to `record`.
fn with_signature(
    record: FixtureRecord,
    signature: &EcdsaSignature,
    layout: LimbLayout,
) -> Result<FixtureRecord> {
    Ok(record
        .with_limbs("r", &decompose_limbs(&signature.r, layout)?)
        .with_limbs("s", &decompose_limbs(&signature.s, layout)?))
}
