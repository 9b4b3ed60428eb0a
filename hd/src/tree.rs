//! BIP-32 derivation.

use hdk_crypto::{hmac_sha512, HashEngine};
use hdk_curve::{Curve, Point};
use hdk_types::{
    ChainCode, ChildIndex, DerivationPath, Fingerprint, Hash160Digest, Network, PrivateKey,
    HARDENED_OFFSET,
};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::RngCore;
use zeroize::Zeroize;

use crate::extended_key::{ExtendedKey, KEY_DATA_LEN};
use crate::node::{Node, NodeKey};
use crate::{Degenerate, TreeError};

/// HMAC key for master key generation.
pub const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

/// Big-endian, left-padded to 32 bytes.
fn scalar_bytes(k: &BigUint) -> [u8; 32] {
    let raw = k.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - raw.len()..].copy_from_slice(&raw);
    out
}

fn split_hmac(i: &[u8; 64]) -> (BigUint, ChainCode) {
    let mut chain = [0u8; 32];
    chain.copy_from_slice(&i[32..]);
    (BigUint::from_bytes_be(&i[..32]), ChainCode(chain))
}

/// Derives and serializes nodes of a hierarchical deterministic key tree
/// over one curve and one hash engine.
#[derive(Clone, Debug)]
pub struct KeyTree {
    curve: Curve,
    hashes: HashEngine,
}

impl KeyTree {
    /// Keys are serialized in 32-byte fields, so the curve's field elements
    /// and scalars must fit in 256 bits.
    pub fn new(curve: Curve, hashes: HashEngine) -> Result<Self, TreeError> {
        let field_len = curve.params().field_len();
        if field_len != 32 || curve.order().bits() > 256 {
            return Err(TreeError::UnsupportedCurve(format!(
                "{}-byte field, {}-bit order",
                field_len,
                curve.order().bits()
            )));
        }
        Ok(Self { curve, hashes })
    }

    /// secp256k1 with the standard hash constants.
    pub fn bitcoin() -> Self {
        Self {
            curve: Curve::secp256k1(),
            hashes: HashEngine::standard(),
        }
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn hashes(&self) -> &HashEngine {
        &self.hashes
    }

    fn compressed(&self, point: &Point) -> Result<[u8; KEY_DATA_LEN], TreeError> {
        let encoded = self.curve.encode_compressed(point)?;
        let mut out = [0u8; KEY_DATA_LEN];
        if encoded.len() != KEY_DATA_LEN {
            return Err(TreeError::UnsupportedCurve(format!(
                "compressed point is {} bytes, expected {KEY_DATA_LEN}",
                encoded.len()
            )));
        }
        out.copy_from_slice(&encoded);
        Ok(out)
    }

    /// `HASH160` of the compressed public key, the payload of P2PKH-style
    /// addresses.
    pub fn key_hash(&self, node: &Node) -> Result<Hash160Digest, TreeError> {
        Ok(self.hashes.hash160(&self.compressed(node.public_key())?))
    }

    /// First four bytes of [`Self::key_hash`].
    pub fn fingerprint_of(&self, node: &Node) -> Result<Fingerprint, TreeError> {
        self.point_fingerprint(node.public_key())
    }

    fn point_fingerprint(&self, point: &Point) -> Result<Fingerprint, TreeError> {
        let hash = self.hashes.hash160(&self.compressed(point)?);
        Ok(Fingerprint(hash.prefix::<4>()))
    }

    /// Public point for a private scalar already known to lie in `[1, n)`.
    fn private_key_node(&self, k: &BigUint, header: Header) -> Result<Node, TreeError> {
        let public = self.curve.generator_mul(k)?;
        let fingerprint = self.point_fingerprint(&public)?;
        Ok(Node {
            depth: header.depth,
            child_index: header.child_index,
            chain_code: header.chain_code,
            parent_fingerprint: header.parent_fingerprint,
            fingerprint,
            path: header.path,
            network: header.network,
            key: NodeKey::Private {
                secret: PrivateKey::from_bytes(scalar_bytes(k)),
                public,
            },
        })
    }

    fn public_key_node(&self, public: Point, header: Header) -> Result<Node, TreeError> {
        let fingerprint = self.point_fingerprint(&public)?;
        Ok(Node {
            depth: header.depth,
            child_index: header.child_index,
            chain_code: header.chain_code,
            parent_fingerprint: header.parent_fingerprint,
            fingerprint,
            path: header.path,
            network: header.network,
            key: NodeKey::Public(public),
        })
    }

    /// Master node from a 16 to 64 byte seed.
    ///
    /// `I = HMAC-SHA512("Bitcoin seed", seed)`; `I[..32]` is the private key
    /// and `I[32..]` the chain code. Fails with a degenerate outcome when the
    /// key is zero or not below the group order.
    pub fn seed_to_master(&self, seed: &[u8], network: Network) -> Result<Node, TreeError> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(TreeError::InvalidSeedLength(seed.len()));
        }
        let mut i = hmac_sha512(&self.hashes, MASTER_HMAC_KEY, seed).into_bytes();
        let (k, chain_code) = split_hmac(&i);
        i.zeroize();

        if k.is_zero() {
            return Err(TreeError::InvalidDerivation(Degenerate::ZeroKey));
        }
        if &k >= self.curve.order() {
            return Err(TreeError::InvalidDerivation(Degenerate::ScalarOutOfRange));
        }

        let node = self.private_key_node(
            &k,
            Header {
                depth: 0,
                child_index: ChildIndex::from_raw(0),
                chain_code,
                parent_fingerprint: Fingerprint::MASTER,
                path: Some(DerivationPath::master()),
                network,
            },
        )?;
        tracing::debug!(fingerprint = %node.fingerprint, "derived master node");
        Ok(node)
    }

    fn child_header(
        &self,
        parent: &Node,
        index: ChildIndex,
        chain_code: ChainCode,
    ) -> Result<Header, TreeError> {
        let depth = parent.depth.checked_add(1).ok_or(TreeError::DepthExceeded)?;
        Ok(Header {
            depth,
            child_index: index,
            chain_code,
            parent_fingerprint: parent.fingerprint,
            path: parent.path.as_ref().map(|p| p.child(index)),
            network: parent.network,
        })
    }

    /// Private child derivation. The parent must hold a private key.
    ///
    /// Hardened children hash `0x00 ‖ k_par ‖ i`, normal children hash
    /// `serP(K_par) ‖ i`, both keyed by the parent chain code.
    pub fn derive_child(&self, parent: &Node, index: ChildIndex) -> Result<Node, TreeError> {
        let parent_k = parent.secret_scalar().ok_or(if index.is_hardened() {
            TreeError::HardenedFromPublic
        } else {
            TreeError::MissingPrivateKey
        })?;
        if parent.depth == u8::MAX {
            return Err(TreeError::DepthExceeded);
        }

        let mut data = Vec::with_capacity(37);
        if index.is_hardened() {
            data.push(0x00);
            data.extend_from_slice(&scalar_bytes(&parent_k));
        } else {
            data.extend_from_slice(&self.compressed(parent.public_key())?);
        }
        data.extend_from_slice(&index.to_be_bytes());

        let mut i = hmac_sha512(&self.hashes, parent.chain_code.as_bytes(), &data).into_bytes();
        data.zeroize();
        let (il, chain_code) = split_hmac(&i);
        i.zeroize();

        let n = self.curve.order();
        if &il >= n {
            return Err(TreeError::InvalidDerivation(Degenerate::ScalarOutOfRange));
        }
        let k = (il + parent_k) % n;
        if k.is_zero() {
            return Err(TreeError::InvalidDerivation(Degenerate::ZeroKey));
        }

        let header = self.child_header(parent, index, chain_code)?;
        let node = self.private_key_node(&k, header)?;
        tracing::debug!(
            depth = node.depth,
            index = %index,
            fingerprint = %node.fingerprint,
            "derived private child"
        );
        Ok(node)
    }

    /// Public-only child derivation, `K_child = IL·G + K_par`.
    ///
    /// Only normal indices are possible. The result is always watch-only,
    /// even when the parent holds a private key.
    pub fn derive_public_child(&self, parent: &Node, index: ChildIndex) -> Result<Node, TreeError> {
        if index.is_hardened() {
            return Err(TreeError::HardenedFromPublic);
        }
        if parent.depth == u8::MAX {
            return Err(TreeError::DepthExceeded);
        }

        let mut data = Vec::with_capacity(37);
        data.extend_from_slice(&self.compressed(parent.public_key())?);
        data.extend_from_slice(&index.to_be_bytes());
        let i = hmac_sha512(&self.hashes, parent.chain_code.as_bytes(), &data).into_bytes();
        let (il, chain_code) = split_hmac(&i);

        if &il >= self.curve.order() {
            return Err(TreeError::InvalidDerivation(Degenerate::ScalarOutOfRange));
        }
        let public = self
            .curve
            .add(&self.curve.generator_mul(&il)?, parent.public_key())?;
        if public.is_infinity() {
            return Err(TreeError::InvalidDerivation(Degenerate::PointAtInfinity));
        }

        let header = self.child_header(parent, index, chain_code)?;
        let node = self.public_key_node(public, header)?;
        tracing::debug!(
            depth = node.depth,
            index = %index,
            fingerprint = %node.fingerprint,
            "derived public child"
        );
        Ok(node)
    }

    /// Walk `path` down from `node`: private derivation while a private key
    /// is held, public derivation otherwise.
    pub fn derive_path(&self, node: &Node, path: &DerivationPath) -> Result<Node, TreeError> {
        let mut current = node.clone();
        for &index in path {
            current = if current.is_private() {
                self.derive_child(&current, index)?
            } else {
                self.derive_public_child(&current, index)?
            };
        }
        Ok(current)
    }

    /// `derive_path(seed_to_master(seed), path)`.
    pub fn seed_path_to_node(
        &self,
        seed: &[u8],
        path: &DerivationPath,
        network: Network,
    ) -> Result<Node, TreeError> {
        let master = self.seed_to_master(seed, network)?;
        self.derive_path(&master, path)
    }

    /// Derive at `start`, moving to the next index of the same kind while the
    /// outcome is degenerate.
    pub fn derive_next_valid(&self, parent: &Node, start: ChildIndex) -> Result<Node, TreeError> {
        let mut index = start;
        loop {
            let result = if parent.is_private() {
                self.derive_child(parent, index)
            } else {
                self.derive_public_child(parent, index)
            };
            match result {
                Err(e) if e.is_invalid_derivation() => {
                    tracing::warn!(index = %index, reason = %e, "skipping invalid child index");
                    let next = index.index().checked_add(1).filter(|i| *i < HARDENED_OFFSET);
                    index = match next {
                        Some(i) => ChildIndex::new(i, index.is_hardened())?,
                        None => return Err(TreeError::IndicesExhausted(index.raw())),
                    };
                }
                other => return other,
            }
        }
    }

    /// The node's extended key; `public` selects the `xpub` form.
    pub fn extended_key(&self, node: &Node, public: bool) -> Result<ExtendedKey, TreeError> {
        let key_data = if public {
            self.compressed(node.public_key())?
        } else {
            let secret = node.private_key().ok_or(TreeError::MissingPrivateKey)?;
            let mut data = [0u8; KEY_DATA_LEN];
            data[1..].copy_from_slice(secret.as_bytes());
            data
        };
        Ok(ExtendedKey {
            network: node.network,
            is_private: !public,
            depth: node.depth,
            parent_fingerprint: node.parent_fingerprint,
            child_index: node.child_index,
            chain_code: node.chain_code,
            key_data,
        })
    }

    /// Base58Check extended key text.
    pub fn serialize(&self, node: &Node, public: bool) -> Result<String, TreeError> {
        let mut key = self.extended_key(node, public)?;
        let encoded = key.encode(&self.hashes);
        key.key_data.zeroize();
        tracing::debug!(depth = node.depth, public, "serialized extended key");
        Ok(encoded)
    }

    /// Decode the wire fields without rebuilding the key.
    pub fn parse_extended_key(&self, s: &str) -> Result<ExtendedKey, TreeError> {
        ExtendedKey::decode(&self.hashes, s)
    }

    /// Rebuild a node from `xprv`/`xpub` text.
    ///
    /// Private scalars must lie in `[1, n)` and public keys must decompress
    /// to a curve point. The derivation path is only known for depth 0.
    pub fn import_extended_key<R: RngCore + ?Sized>(
        &self,
        s: &str,
        rng: &mut R,
    ) -> Result<Node, TreeError> {
        let mut key = self.parse_extended_key(s)?;
        let header = Header {
            depth: key.depth,
            child_index: key.child_index,
            chain_code: key.chain_code,
            parent_fingerprint: key.parent_fingerprint,
            path: (key.depth == 0).then(DerivationPath::master),
            network: key.network,
        };

        let node = if key.is_private {
            let k = BigUint::from_bytes_be(&key.key_data[1..]);
            key.key_data.zeroize();
            if k.is_zero() || &k >= self.curve.order() {
                return Err(TreeError::InvalidExtendedKey(
                    "private key is outside [1, n)".into(),
                ));
            }
            self.private_key_node(&k, header)?
        } else {
            let public = self.curve.decode_point(&key.key_data, rng)?;
            self.public_key_node(public, header)?
        };
        Ok(node)
    }
}

/// Node fields fixed before the key is known.
struct Header {
    depth: u8,
    child_index: ChildIndex,
    chain_code: ChainCode,
    parent_fingerprint: Fingerprint,
    path: Option<DerivationPath>,
    network: Network,
}
