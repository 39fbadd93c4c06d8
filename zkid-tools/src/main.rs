use std::{fmt, path::PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zkid_common::{parse_scalar, MimcSponge, DEFAULT_MIMC_KEY};
use zkid_test_fixtures::{
    participant_leaf, run, BatchReport, FixtureConfig, KeyPair, ScenarioConfig,
};

const DEFAULT_OUTPUT_DIR: &str = "fixtures";
const DEFAULT_LOG_FILTER: &str = "zkid_tools=info,zkid_test_fixtures=info";

#[derive(Parser)]
#[command(
    name = "zkid-tools",
    about = "Generate deterministic input fixtures for the zkid circuits"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenario described by a JSON configuration file.
    Generate(GenerateArgs),
    /// Airdrop claims over the built-in key list.
    Airdrop(TreeArgs),
    /// Selective-voting fixtures over the built-in key list.
    Vote(TreeArgs),
    /// Friend-of-friend chain fixtures; reads one proof artifact per step.
    Chain(ChainArgs),
    /// Print the public key, address and leaf for a private key.
    Derive(DeriveArgs),
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long)]
    config: PathBuf,
    /// Overrides `output_dir` from the configuration.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
struct TreeArgs {
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
    /// Merkle tree depth; defaults to the preset's depth.
    #[arg(long)]
    depth: Option<usize>,
}

#[derive(Args)]
struct ChainArgs {
    /// Directory holding `full-circom-input-<index>.json`.
    #[arg(long)]
    proof_dir: PathBuf,
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
}

#[derive(Args)]
struct DeriveArgs {
    /// Decimal or 0x-prefixed hex scalar.
    #[arg(long)]
    private_key: String,
    #[arg(long, default_value_t = DEFAULT_MIMC_KEY)]
    field_hash_key: u64,
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Airdrop(args) => {
            let mut config = FixtureConfig::airdrop_preset(args.output_dir);
            if let (ScenarioConfig::Airdrop(airdrop), Some(depth)) = (&mut config.scenario, args.depth) {
                airdrop.depth = depth;
            }
            run_config(&config)
        }
        Commands::Vote(args) => {
            let mut config = FixtureConfig::voting_preset(args.output_dir);
            if let (ScenarioConfig::Voting(voting), Some(depth)) = (&mut config.scenario, args.depth) {
                voting.depth = depth;
            }
            run_config(&config)
        }
        Commands::Chain(args) => {
            run_config(&FixtureConfig::friend_chain_preset(args.output_dir, args.proof_dir))
        }
        Commands::Derive(args) => derive(args),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = FixtureConfig::load(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    run_config(&config)
}

fn run_config(config: &FixtureConfig) -> Result<()> {
    info!(
        scenario = config.scenario.name(),
        output_dir = %config.output_dir.display(),
        keys = config.private_keys.len(),
        "generating fixtures"
    );
    let report = run(config).with_context(|| {
        format!(
            "{} batch failed writing to {}",
            config.scenario.name(),
            config.output_dir.display()
        )
    })?;
    print_report(&report);
    ensure!(
        report.is_success(),
        "{} of {} fixtures failed: indices {:?}",
        report.failures.len(),
        report.failures.len() + report.written.len(),
        report.failed_indices()
    );
    Ok(())
}

fn print_report(report: &BatchReport) {
    println!("Scenario {}:", report.scenario);
    for fixture in &report.written {
        println!(
            "  {}: {} bytes, blake3: {}",
            fixture.path.display(),
            fixture.artifact.size,
            fixture.artifact.blake3
        );
    }
    for failure in &report.failures {
        println!("  index {} failed: {}", failure.index, failure.error);
    }
    println!("Manifest written to {}", report.manifest_path.display());
}

fn derive(args: DeriveArgs) -> Result<()> {
    let secret = parse_scalar(&args.private_key).context("failed to parse private key")?;
    let pair = KeyPair::from_secret(&secret)?;
    let address = pair.address()?;
    let hasher = MimcSponge::with_key(args.field_hash_key);
    let leaf = participant_leaf(&pair, &hasher)?;

    let summary = KeySummary {
        pubkey_x: pair.public().x.to_string(),
        pubkey_y: pair.public().y.to_string(),
        address: address.to_hex(),
        address_scalar: address.to_scalar().to_string(),
        leaf: leaf.to_string(),
    };
    output_summary(&summary, args.json)
}

fn output_summary<T>(summary: &T, json: bool) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}

#[derive(Serialize)]
struct KeySummary {
    pubkey_x: String,
    pubkey_y: String,
    address: String,
    address_scalar: String,
    leaf: String,
}

impl fmt::Display for KeySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pubkey.x: {}", self.pubkey_x)?;
        writeln!(f, "pubkey.y: {}", self.pubkey_y)?;
        writeln!(f, "address: {}", self.address)?;
        writeln!(f, "address (decimal): {}", self.address_scalar)?;
        writeln!(f, "leaf: {}", self.leaf)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_chain_arguments() {
        let cli = Cli::try_parse_from(["zkid-tools", "chain", "--proof-dir", "proofs"]).unwrap();
        let Commands::Chain(args) = cli.command else {
            panic!("expected chain");
        };
        assert_eq!(args.proof_dir, PathBuf::from("proofs"));
        assert_eq!(args.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }
}
