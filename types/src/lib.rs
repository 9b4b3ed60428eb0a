//! Fundamental value types for the hdkey workspace.
//!
//! This crate defines the types shared by every other crate: fixed-length
//! digests, key material newtypes, network selection and derivation paths.

pub mod digest;
pub mod error;
pub mod keys;
pub mod network;
pub mod path;

pub use digest::{
    Digest, Hash160Digest, Ripemd160Digest, Sha224Digest, Sha256Digest, Sha384Digest,
    Sha512Digest,
};
pub use error::PathError;
pub use keys::{ChainCode, Fingerprint, PrivateKey};
pub use network::Network;
pub use path::{ChildIndex, DerivationPath, HARDENED_OFFSET};
