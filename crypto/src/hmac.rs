//! HMAC (RFC 2104) over any [`HashFunction`].

use hdk_types::{Sha256Digest, Sha512Digest};

use crate::hash::{HashEngine, HashFunction, Sha256, Sha512};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// A keyed HMAC instance.
///
/// The padded inner and outer keys are computed once, so one instance can
/// authenticate many messages (PBKDF2 relies on this).
#[derive(Clone)]
pub struct Hmac<H: HashFunction> {
    hash: H,
    inner_key: Vec<u8>,
    outer_key: Vec<u8>,
}

impl<H: HashFunction> Hmac<H> {
    /// Keys longer than the block are hashed first; shorter ones are
    /// zero-padded to the block length.
    pub fn new(hash: H, key: &[u8]) -> Self {
        let mut block_key = if key.len() > H::BLOCK_LEN {
            hash.hash(key).as_ref().to_vec()
        } else {
            key.to_vec()
        };
        block_key.resize(H::BLOCK_LEN, 0);

        let inner_key = block_key.iter().map(|b| b ^ IPAD).collect();
        let outer_key = block_key.iter().map(|b| b ^ OPAD).collect();
        Self {
            hash,
            inner_key,
            outer_key,
        }
    }

    /// `H((K ⊕ opad) ‖ H((K ⊕ ipad) ‖ message))`
    pub fn mac(&self, message: &[u8]) -> H::Output {
        let mut inner = Vec::with_capacity(H::BLOCK_LEN + message.len());
        inner.extend_from_slice(&self.inner_key);
        inner.extend_from_slice(message);
        let inner_digest = self.hash.hash(&inner);

        let mut outer = Vec::with_capacity(H::BLOCK_LEN + H::OUTPUT_LEN);
        outer.extend_from_slice(&self.outer_key);
        outer.extend_from_slice(inner_digest.as_ref());
        self.hash.hash(&outer)
    }
}

pub fn hmac_sha256(engine: &HashEngine, key: &[u8], message: &[u8]) -> Sha256Digest {
    Hmac::new(Sha256::new(engine), key).mac(message)
}

pub fn hmac_sha512(engine: &HashEngine, key: &[u8], message: &[u8]) -> Sha512Digest {
    Hmac::new(Sha512::new(engine), key).mac(message)
}
