//! `hdk`: hashing, HD key derivation and mnemonic tooling from the command line.

mod commands;
mod config;
mod toolkit;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hdk_crypto::HashAlgorithm;
use hdk_types::{DerivationPath, Network};
use hdk_utils::{init_logging, LogFormat};

use crate::commands::SeedSource;
use crate::config::HdkConfig;
use crate::toolkit::Toolkit;

#[derive(Parser)]
#[command(name = "hdk", version, about = "Hash functions, BIP-32 keys and BIP-39 mnemonics")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "HDK_CONFIG")]
    config: Option<PathBuf>,

    /// Network for serialized keys: "main" or "test".
    #[arg(long, env = "HDK_NETWORK")]
    network: Option<String>,

    /// Log filter, e.g. "info" or "warn,hdk_hd=debug".
    #[arg(long, env = "HDK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "HDK_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Hash text (or hex bytes) with one algorithm, or all of them.
    Hash {
        /// sha224, sha256, sha384, sha512, ripemd160 or "all".
        algorithm: String,
        input: String,
        /// Treat the input as hex-encoded bytes.
        #[arg(long = "hex")]
        hex_input: bool,
    },

    /// Derive a key from a seed or mnemonic along a path.
    Derive {
        /// Hex-encoded seed of 16 to 64 bytes.
        #[arg(long, conflicts_with = "mnemonic", required_unless_present = "mnemonic")]
        seed: Option<String>,
        /// Mnemonic phrase; the seed is stretched from it.
        #[arg(long)]
        mnemonic: Option<String>,
        #[arg(long, default_value = "", requires = "mnemonic")]
        passphrase: String,
        #[arg(long, default_value = "m")]
        path: DerivationPath,
        /// Print only public material.
        #[arg(long)]
        public_only: bool,
    },

    /// Decode an xprv/xpub/tprv/tpub key.
    Inspect { key: String },

    /// BIP-39 mnemonic tools.
    Mnemonic {
        #[command(subcommand)]
        action: MnemonicAction,
    },

    /// Primality tools.
    Prime {
        #[command(subcommand)]
        action: PrimeAction,
    },
}

#[derive(Subcommand)]
enum MnemonicAction {
    /// Generate a random mnemonic.
    Generate {
        #[arg(long, default_value_t = 12)]
        words: usize,
    },
    /// Verify a mnemonic's words and checksum.
    Check { phrase: String },
    /// Stretch a mnemonic into a 64-byte seed.
    Seed {
        phrase: String,
        #[arg(long, default_value = "")]
        passphrase: String,
    },
}

#[derive(Subcommand)]
enum PrimeAction {
    /// Miller–Rabin test of a decimal integer.
    Check { n: String },
    /// Random probable prime with the given bit length.
    Generate { bits: u64 },
}

fn parse_network(s: &str) -> anyhow::Result<Network> {
    match s.to_ascii_lowercase().as_str() {
        "main" | "mainnet" | "bitcoin" => Ok(Network::Main),
        "test" | "testnet" => Ok(Network::Test),
        other => bail!("unknown network '{other}', expected 'main' or 'test'"),
    }
}

fn parse_algorithms(s: &str) -> anyhow::Result<Vec<HashAlgorithm>> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(HashAlgorithm::ALL.to_vec());
    }
    Ok(vec![s.parse()?])
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HdkConfig::from_toml_file(path)?,
        None => HdkConfig::default(),
    };
    if let Some(network) = cli.network.as_deref() {
        config.network = parse_network(network)?;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(config.log_format, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::info!("loaded config from {}", path.display());
    }

    let tk = Toolkit::load(&config)?;
    let mut rng = rand::thread_rng();

    let output = match cli.command {
        Command::Hash {
            algorithm,
            input,
            hex_input,
        } => {
            let message = if hex_input {
                hex::decode(input.trim()).context("input is not valid hex")?
            } else {
                input.into_bytes()
            };
            commands::hash(&tk, &parse_algorithms(&algorithm)?, &message)?
        }
        Command::Derive {
            seed,
            mnemonic,
            passphrase,
            path,
            public_only,
        } => {
            let source = match (&seed, &mnemonic) {
                (Some(seed), _) => SeedSource::Hex(seed),
                (None, Some(phrase)) => SeedSource::Mnemonic {
                    phrase,
                    passphrase: &passphrase,
                },
                (None, None) => bail!("either --seed or --mnemonic is required"),
            };
            commands::derive(
                &tk,
                &source,
                &path,
                config.network,
                config.seed_iterations,
                public_only,
            )?
        }
        Command::Inspect { key } => commands::inspect(&tk, &key, &mut rng)?,
        Command::Mnemonic { action } => match action {
            MnemonicAction::Generate { words } => commands::mnemonic_generate(&tk, words, &mut rng)?,
            MnemonicAction::Check { phrase } => commands::mnemonic_check(&tk, &phrase)?,
            MnemonicAction::Seed { phrase, passphrase } => {
                commands::mnemonic_seed(&tk, &phrase, &passphrase, config.seed_iterations)?
            }
        },
        Command::Prime { action } => match action {
            PrimeAction::Check { n } => {
                commands::prime_check(&tk, &n, config.prime_rounds, &mut rng)?
            }
            PrimeAction::Generate { bits } => {
                commands::prime_generate(&tk, bits, config.prime_rounds, &mut rng)?
            }
        },
    };

    println!("{output}");
    Ok(())
}
