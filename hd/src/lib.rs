//! Hierarchical deterministic key tree (BIP-32).
//!
//! A [`KeyTree`] turns a seed into a master [`Node`] and derives children
//! from it. Nodes serialize to and from the Base58Check extended key format
//! through [`ExtendedKey`]; single private keys travel as WIF.

mod error;
mod extended_key;
mod node;
mod tree;
mod wif;

pub use error::{Degenerate, TreeError};
pub use extended_key::{ExtendedKey, EXTENDED_KEY_LEN, KEY_DATA_LEN};
pub use node::{Node, NodeKey};
pub use tree::{KeyTree, MASTER_HMAC_KEY, MAX_SEED_LEN, MIN_SEED_LEN};
pub use wif::{decode_wif, encode_wif, WifKey};
