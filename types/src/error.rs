//! Errors for the value types defined in this crate.

use thiserror::Error;

/// Failures while building child indices or parsing derivation paths.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("child index {0} is out of range (must be below 2^31)")]
    IndexOutOfRange(u32),

    #[error("derivation path must start with 'm'")]
    MissingMaster,

    #[error("invalid path component: {0:?}")]
    InvalidComponent(String),

    #[error("derivation path is too deep ({0} levels, at most 255)")]
    TooDeep(usize),
}
