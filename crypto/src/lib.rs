//! Hashing, keyed hashing and text codecs, implemented from first principles.
//!
//! - **SHA-224/256/384/512** and **RIPEMD-160** behind a [`HashEngine`] that
//!   owns its round-constant tables
//! - **HMAC** over any [`HashFunction`] and **PBKDF2** key stretching
//! - **Base58**, **Base58Check** and **Base64** codecs
//! - **BIP-39** mnemonic checksums, generation and seed derivation

pub mod codec;
pub mod hash;
pub mod hmac;
pub mod mnemonic;
pub mod pbkdf2;

pub use codec::{base58, base64, CodecError};
pub use hash::{
    HashAlgorithm, HashConstants, HashEngine, HashError, HashFunction, Ripemd160, Sha224, Sha256,
    Sha384, Sha512,
};
pub use hmac::{hmac_sha256, hmac_sha512, Hmac};
pub use mnemonic::{MnemonicCodec, MnemonicError, Wordlist};
pub use pbkdf2::{pbkdf2, pbkdf2_derive, pbkdf2_hmac_sha512, KdfError};
