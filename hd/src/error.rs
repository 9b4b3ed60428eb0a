use std::fmt;

use hdk_crypto::CodecError;
use hdk_curve::CurveError;
use hdk_types::PathError;
use thiserror::Error;

/// Why a derivation produced no usable key.
///
/// These outcomes are deterministic in their inputs and occur with
/// probability around 2^-127; callers move on to the next index or seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degenerate {
    /// `IL` (or the master scalar) is not below the group order.
    ScalarOutOfRange,
    /// The derived private scalar is zero.
    ZeroKey,
    /// The derived public key is the point at infinity.
    PointAtInfinity,
}

impl fmt::Display for Degenerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScalarOutOfRange => f.write_str("scalar is not below the group order"),
            Self::ZeroKey => f.write_str("derived key is zero"),
            Self::PointAtInfinity => f.write_str("derived public key is the point at infinity"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("invalid derivation: {0}")]
    InvalidDerivation(Degenerate),

    #[error("hardened children cannot be derived from a public key")]
    HardenedFromPublic,

    #[error("operation needs a private key but the node is public-only")]
    MissingPrivateKey,

    #[error("seed must be 16 to 64 bytes, got {0}")]
    InvalidSeedLength(usize),

    #[error("node is already at the maximum depth of 255")]
    DepthExceeded,

    #[error("no valid child index remains after {0}")]
    IndicesExhausted(u32),

    #[error("extended key payload must be 78 bytes, got {0}")]
    InvalidLength(usize),

    #[error("unknown extended key version {0:#010x}")]
    UnknownVersion(u32),

    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(String),

    #[error("curve does not fit 32-byte keys: {0}")]
    UnsupportedCurve(String),

    #[error("invalid WIF key: {0}")]
    InvalidWif(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Path(#[from] PathError),
}

impl TreeError {
    /// True for outcomes where the caller should try the next index.
    pub fn is_invalid_derivation(&self) -> bool {
        matches!(self, Self::InvalidDerivation(_))
    }
}
