//! SHA-2 and RIPEMD-160.
//!
//! A [`HashEngine`] owns the SHA-2 round-constant tables and is cheap to clone
//! (the tables sit behind an `Arc`). Each algorithm is also exposed as a small
//! borrowing handle implementing [`HashFunction`] so that HMAC and PBKDF2 can be
//! written once over any inner hash.

mod constants;
mod padding;
mod ripemd160;
mod sha2;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use hdk_types::{
    Hash160Digest, Ripemd160Digest, Sha224Digest, Sha256Digest, Sha384Digest, Sha512Digest,
};
use thiserror::Error;

pub use constants::{HashConstants, Sha2Table32, Sha2Table64};

/// Errors raised while loading or generating round-constant tables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("invalid hash constant table: {0}")]
    InvalidTable(String),

    #[error("need at least {needed} primes to generate hash constants, got {got}")]
    NotEnoughPrimes { needed: usize, got: usize },

    #[error("unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// A fixed-output hash usable as the inner function of HMAC.
pub trait HashFunction {
    const NAME: &'static str;
    /// Compression block size in bytes.
    const BLOCK_LEN: usize;
    /// Digest size in bytes.
    const OUTPUT_LEN: usize;

    type Output: AsRef<[u8]> + AsMut<[u8]> + Copy;

    fn hash(&self, message: &[u8]) -> Self::Output;
}

/// Hash engine parameterised by an explicit constant table.
#[derive(Clone, Debug)]
pub struct HashEngine {
    constants: Arc<HashConstants>,
}

impl HashEngine {
    pub fn new(constants: HashConstants) -> Self {
        Self {
            constants: Arc::new(constants),
        }
    }

    /// Engine over the FIPS 180-4 constants, generated from the first 80 primes.
    pub fn standard() -> Self {
        Self::new(HashConstants::standard())
    }

    pub fn constants(&self) -> &HashConstants {
        &self.constants
    }

    pub fn sha224(&self, message: &[u8]) -> Sha224Digest {
        Sha224::new(self).hash(message)
    }

    pub fn sha256(&self, message: &[u8]) -> Sha256Digest {
        Sha256::new(self).hash(message)
    }

    pub fn sha384(&self, message: &[u8]) -> Sha384Digest {
        Sha384::new(self).hash(message)
    }

    pub fn sha512(&self, message: &[u8]) -> Sha512Digest {
        Sha512::new(self).hash(message)
    }

    pub fn ripemd160(&self, message: &[u8]) -> Ripemd160Digest {
        Ripemd160.hash(message)
    }

    /// `RIPEMD160(SHA256(message))`, the key fingerprint hash.
    pub fn hash160(&self, message: &[u8]) -> Hash160Digest {
        self.ripemd160(self.sha256(message).as_bytes())
    }

    /// `SHA256(SHA256(message))`, the Base58Check checksum hash.
    pub fn double_sha256(&self, message: &[u8]) -> Sha256Digest {
        self.sha256(self.sha256(message).as_bytes())
    }

    /// Dispatch on a runtime-selected algorithm.
    pub fn digest(&self, algorithm: HashAlgorithm, message: &[u8]) -> Vec<u8> {
        match algorithm {
            HashAlgorithm::Sha224 => self.sha224(message).as_bytes().to_vec(),
            HashAlgorithm::Sha256 => self.sha256(message).as_bytes().to_vec(),
            HashAlgorithm::Sha384 => self.sha384(message).as_bytes().to_vec(),
            HashAlgorithm::Sha512 => self.sha512(message).as_bytes().to_vec(),
            HashAlgorithm::Ripemd160 => self.ripemd160(message).as_bytes().to_vec(),
        }
    }
}

/// Runtime selector for the supported algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Ripemd160,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 5] = [
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Ripemd160,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha224 => "SHA-224",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
            Self::Ripemd160 => "RIPEMD-160",
        }
    }

    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
            Self::Ripemd160 => 20,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    /// Case-insensitive, with or without the dash (`sha256`, `SHA-256`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            "ripemd160" => Ok(Self::Ripemd160),
            _ => Err(HashError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// SHA-224 over a borrowed constant table.
#[derive(Clone, Copy, Debug)]
pub struct Sha224<'a>(&'a Sha2Table32);

/// SHA-256 over a borrowed constant table.
#[derive(Clone, Copy, Debug)]
pub struct Sha256<'a>(&'a Sha2Table32);

/// SHA-384 over a borrowed constant table.
#[derive(Clone, Copy, Debug)]
pub struct Sha384<'a>(&'a Sha2Table64);

/// SHA-512 over a borrowed constant table.
#[derive(Clone, Copy, Debug)]
pub struct Sha512<'a>(&'a Sha2Table64);

/// RIPEMD-160; its constants are part of the algorithm definition.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ripemd160;

impl<'a> Sha224<'a> {
    pub fn new(engine: &'a HashEngine) -> Self {
        Self(&engine.constants.sha224)
    }
}

impl<'a> Sha256<'a> {
    pub fn new(engine: &'a HashEngine) -> Self {
        Self(&engine.constants.sha256)
    }
}

impl<'a> Sha384<'a> {
    pub fn new(engine: &'a HashEngine) -> Self {
        Self(&engine.constants.sha384)
    }
}

impl<'a> Sha512<'a> {
    pub fn new(engine: &'a HashEngine) -> Self {
        Self(&engine.constants.sha512)
    }
}

impl HashFunction for Sha224<'_> {
    const NAME: &'static str = "SHA-224";
    const BLOCK_LEN: usize = 64;
    const OUTPUT_LEN: usize = 28;
    type Output = Sha224Digest;

    fn hash(&self, message: &[u8]) -> Self::Output {
        let state = sha2::digest256(self.0, message);
        Sha224Digest::new(sha2::words_to_bytes::<7, 28>(&state))
    }
}

impl HashFunction for Sha256<'_> {
    const NAME: &'static str = "SHA-256";
    const BLOCK_LEN: usize = 64;
    const OUTPUT_LEN: usize = 32;
    type Output = Sha256Digest;

    fn hash(&self, message: &[u8]) -> Self::Output {
        let state = sha2::digest256(self.0, message);
        Sha256Digest::new(sha2::words_to_bytes::<8, 32>(&state))
    }
}

impl HashFunction for Sha384<'_> {
    const NAME: &'static str = "SHA-384";
    const BLOCK_LEN: usize = 128;
    const OUTPUT_LEN: usize = 48;
    type Output = Sha384Digest;

    fn hash(&self, message: &[u8]) -> Self::Output {
        let state = sha2::digest512(self.0, message);
        Sha384Digest::new(sha2::dwords_to_bytes::<6, 48>(&state))
    }
}

impl HashFunction for Sha512<'_> {
    const NAME: &'static str = "SHA-512";
    const BLOCK_LEN: usize = 128;
    const OUTPUT_LEN: usize = 64;
    type Output = Sha512Digest;

    fn hash(&self, message: &[u8]) -> Self::Output {
        let state = sha2::digest512(self.0, message);
        Sha512Digest::new(sha2::dwords_to_bytes::<8, 64>(&state))
    }
}

impl HashFunction for Ripemd160 {
    const NAME: &'static str = "RIPEMD-160";
    const BLOCK_LEN: usize = 64;
    const OUTPUT_LEN: usize = 20;
    type Output = Ripemd160Digest;

    fn hash(&self, message: &[u8]) -> Self::Output {
        Ripemd160Digest::new(ripemd160::digest(message))
    }
}
