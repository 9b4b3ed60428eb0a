//! CLI configuration with TOML file support.

use std::path::{Path, PathBuf};

use hdk_types::Network;
use hdk_utils::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(String),
}

/// External data files. Anything left unset falls back to the built-in
/// tables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFiles {
    /// JSON curve parameters (`p`, `a`, `b`, `G`, `n`).
    #[serde(default)]
    pub curve: Option<PathBuf>,
    /// JSON SHA-2 round constants keyed by algorithm name.
    #[serde(default)]
    pub hash_constants: Option<PathBuf>,
    /// JSON array of primes.
    #[serde(default)]
    pub primes: Option<PathBuf>,
    /// JSON array of 2048 mnemonic words.
    #[serde(default)]
    pub wordlist: Option<PathBuf>,
}

/// Configuration for the `hdk` binary.
///
/// Loaded from a TOML file via [`HdkConfig::from_toml_file`]; command-line
/// flags and environment variables override individual fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HdkConfig {
    #[serde(default)]
    pub network: Network,

    #[serde(default)]
    pub data: DataFiles,

    #[serde(default)]
    pub log_format: LogFormat,

    /// `EnvFilter` directive, e.g. `"warn"` or `"info,hdk_hd=debug"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// PBKDF2 rounds when turning a mnemonic into a seed.
    #[serde(default = "default_seed_iterations")]
    pub seed_iterations: u32,

    /// Miller–Rabin rounds for `prime check`.
    #[serde(default = "default_prime_rounds")]
    pub prime_rounds: usize,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_seed_iterations() -> u32 {
    hdk_crypto::mnemonic::SEED_ITERATIONS
}

fn default_prime_rounds() -> usize {
    40
}

impl HdkConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl Default for HdkConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            data: DataFiles::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            seed_iterations: default_seed_iterations(),
            prime_rounds: default_prime_rounds(),
        }
    }
}
