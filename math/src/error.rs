use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    /// `x` and the modulus share a factor, so no inverse exists.
    #[error("{value} has no inverse modulo {modulus}")]
    NoInverse { value: String, modulus: String },

    #[error("modulus must be non-zero")]
    ZeroModulus,

    #[error("modulus {0} is not an odd prime")]
    NotOddPrime(String),

    #[error("cannot sample from an empty range")]
    EmptyRange,

    #[error("invalid prime table: {0}")]
    InvalidPrimeTable(String),

    #[error("invalid bit length: {0}")]
    InvalidBitLength(u64),
}
