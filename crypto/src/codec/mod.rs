//! Text encodings for binary data.

pub mod base58;
pub mod base64;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("invalid encoded length {0}")]
    InvalidLength(usize),

    #[error("invalid padding")]
    InvalidPadding,

    #[error("checksum mismatch")]
    ChecksumMismatch,
}
