//! Engines built once from configuration and shared by every command.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use hdk_crypto::{HashConstants, HashEngine, MnemonicCodec, Wordlist};
use hdk_curve::{Curve, CurveParameters};
use hdk_hd::KeyTree;
use hdk_math::PrimeTable;

use crate::config::HdkConfig;

pub struct Toolkit {
    pub primes: Arc<PrimeTable>,
    pub hashes: HashEngine,
    pub tree: KeyTree,
    pub codec: MnemonicCodec,
    pub wordlist: Wordlist,
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

impl Toolkit {
    /// Load the data files named by `config`, falling back to the built-in
    /// tables for anything not configured.
    pub fn load(config: &HdkConfig) -> anyhow::Result<Self> {
        let primes = match &config.data.primes {
            Some(path) => PrimeTable::from_json(&read(path)?)
                .with_context(|| format!("parsing prime table {}", path.display()))?,
            None => PrimeTable::standard(),
        };

        let constants = match (&config.data.hash_constants, &config.data.primes) {
            (Some(path), _) => HashConstants::from_json(&read(path)?)
                .with_context(|| format!("parsing hash constants {}", path.display()))?,
            (None, Some(_)) => HashConstants::from_primes(&primes)
                .context("generating hash constants from the prime table")?,
            (None, None) => HashConstants::standard(),
        };

        let params = match &config.data.curve {
            Some(path) => CurveParameters::from_json(&read(path)?)
                .with_context(|| format!("parsing curve parameters {}", path.display()))?,
            None => CurveParameters::secp256k1(),
        };

        let wordlist = match &config.data.wordlist {
            Some(path) => Wordlist::from_json(&read(path)?)
                .with_context(|| format!("parsing word list {}", path.display()))?,
            None => Wordlist::from_words(bip39::Language::English.word_list().iter().copied())
                .context("loading the built-in English word list")?,
        };

        tracing::debug!(
            primes = primes.len(),
            custom_curve = config.data.curve.is_some(),
            custom_constants = config.data.hash_constants.is_some(),
            "loaded toolkit"
        );

        let primes = Arc::new(primes);
        let hashes = HashEngine::new(constants);
        let curve = Curve::new(params, Arc::clone(&primes));
        Ok(Self {
            tree: KeyTree::new(curve, hashes.clone())
                .context("configured curve cannot carry BIP-32 keys")?,
            codec: MnemonicCodec::new(hashes.clone()),
            primes,
            hashes,
            wordlist,
        })
    }
}
