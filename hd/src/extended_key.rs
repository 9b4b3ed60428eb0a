//! The 78-byte extended key payload and its Base58Check form.
//!
//! ```text
//! version(4) ‖ depth(1) ‖ parent fingerprint(4) ‖ child number(4)
//!   ‖ chain code(32) ‖ key data(33)
//! ```
//!
//! Key data is `0x00 ‖ k` for private keys and the SEC1 compressed point for
//! public keys. Parsing checks the framing only; whether the key and chain
//! code belong together is not verifiable and is left to the caller.

use hdk_crypto::{base58, HashEngine};
use hdk_types::{ChainCode, ChildIndex, Fingerprint, Network};

use crate::TreeError;

/// Serialized payload length, checksum excluded.
pub const EXTENDED_KEY_LEN: usize = 78;

/// Length of the key data field.
pub const KEY_DATA_LEN: usize = 33;

#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedKey {
    pub network: Network,
    pub is_private: bool,
    pub depth: u8,
    pub parent_fingerprint: Fingerprint,
    pub child_index: ChildIndex,
    pub chain_code: ChainCode,
    pub key_data: [u8; KEY_DATA_LEN],
}

impl ExtendedKey {
    pub fn version(&self) -> u32 {
        if self.is_private {
            self.network.private_version()
        } else {
            self.network.public_version()
        }
    }

    pub fn to_bytes(&self) -> [u8; EXTENDED_KEY_LEN] {
        let mut out = [0u8; EXTENDED_KEY_LEN];
        out[0..4].copy_from_slice(&self.version().to_be_bytes());
        out[4] = self.depth;
        out[5..9].copy_from_slice(self.parent_fingerprint.as_bytes());
        out[9..13].copy_from_slice(&self.child_index.to_be_bytes());
        out[13..45].copy_from_slice(self.chain_code.as_bytes());
        out[45..78].copy_from_slice(&self.key_data);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TreeError> {
        if bytes.len() != EXTENDED_KEY_LEN {
            return Err(TreeError::InvalidLength(bytes.len()));
        }
        let version = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let (network, is_private) = version_info(version)?;

        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&bytes[5..9]);
        let child_index =
            ChildIndex::from_raw(u32::from_be_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]));
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&bytes[13..45]);
        let mut key_data = [0u8; KEY_DATA_LEN];
        key_data.copy_from_slice(&bytes[45..78]);

        match (is_private, key_data[0]) {
            (true, 0x00) | (false, 0x02) | (false, 0x03) => {}
            (true, b) => {
                return Err(TreeError::InvalidExtendedKey(format!(
                    "private key data must start with 0x00, found {b:#04x}"
                )))
            }
            (false, b) => {
                return Err(TreeError::InvalidExtendedKey(format!(
                    "public key data must start with 0x02 or 0x03, found {b:#04x}"
                )))
            }
        }

        Ok(Self {
            network,
            is_private,
            depth: bytes[4],
            parent_fingerprint: Fingerprint(parent_fingerprint),
            child_index,
            chain_code: ChainCode(chain_code),
            key_data,
        })
    }

    /// Base58Check text (`xprv…`, `xpub…`, `tprv…`, `tpub…`).
    pub fn encode(&self, hashes: &HashEngine) -> String {
        base58::encode_check(hashes, &self.to_bytes())
    }

    pub fn decode(hashes: &HashEngine, s: &str) -> Result<Self, TreeError> {
        let payload = base58::decode_check(hashes, s.trim())?;
        Self::from_bytes(&payload)
    }
}

/// Network and key kind for a version prefix.
fn version_info(version: u32) -> Result<(Network, bool), TreeError> {
    [Network::Main, Network::Test]
        .into_iter()
        .find_map(|network| {
            if version == network.private_version() {
                Some((network, true))
            } else if version == network.public_version() {
                Some((network, false))
            } else {
                None
            }
        })
        .ok_or(TreeError::UnknownVersion(version))
}

impl std::fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("network", &self.network)
            .field("is_private", &self.is_private)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("child_index", &self.child_index)
            .finish_non_exhaustive()
    }
}
