//! Key-tree nodes.

use std::fmt;

use hdk_curve::Point;
use hdk_types::{ChainCode, ChildIndex, DerivationPath, Fingerprint, Network, PrivateKey};
use num_bigint::BigUint;

/// The key material held by a node.
pub enum NodeKey {
    /// A private scalar `k ∈ [1, n)` and its public point `k·G`.
    Private { secret: PrivateKey, public: Point },
    /// Watch-only: the public point alone.
    Public(Point),
}

impl NodeKey {
    pub fn public(&self) -> &Point {
        match self {
            Self::Private { public, .. } => public,
            Self::Public(public) => public,
        }
    }

    pub fn secret(&self) -> Option<&PrivateKey> {
        match self {
            Self::Private { secret, .. } => Some(secret),
            Self::Public(_) => None,
        }
    }
}

impl Clone for NodeKey {
    fn clone(&self) -> Self {
        match self {
            Self::Private { secret, public } => Self::Private {
                secret: PrivateKey::from_bytes(*secret.as_bytes()),
                public: public.clone(),
            },
            Self::Public(public) => Self::Public(public.clone()),
        }
    }
}

/// One element of an HD key tree. Immutable once built; derivation returns
/// new nodes and never touches the parent.
#[derive(Clone)]
pub struct Node {
    pub(crate) depth: u8,
    pub(crate) child_index: ChildIndex,
    pub(crate) chain_code: ChainCode,
    pub(crate) parent_fingerprint: Fingerprint,
    pub(crate) fingerprint: Fingerprint,
    pub(crate) path: Option<DerivationPath>,
    pub(crate) network: Network,
    pub(crate) key: NodeKey,
}

impl Node {
    /// 0 for the master node.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Index this node was derived with (0 for the master).
    pub fn child_index(&self) -> ChildIndex {
        self.child_index
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    pub fn parent_fingerprint(&self) -> Fingerprint {
        self.parent_fingerprint
    }

    /// First four bytes of `HASH160` of this node's compressed public key.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Full path from the master, known unless the node was imported from
    /// an extended key below depth 0.
    pub fn path(&self) -> Option<&DerivationPath> {
        self.path.as_ref()
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn public_key(&self) -> &Point {
        self.key.public()
    }

    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.key.secret()
    }

    pub fn is_private(&self) -> bool {
        self.key.secret().is_some()
    }

    pub(crate) fn secret_scalar(&self) -> Option<BigUint> {
        self.private_key()
            .map(|k| BigUint::from_bytes_be(k.as_bytes()))
    }

    /// A watch-only copy with the private key dropped.
    pub fn neuter(&self) -> Node {
        Node {
            depth: self.depth,
            child_index: self.child_index,
            chain_code: self.chain_code,
            parent_fingerprint: self.parent_fingerprint,
            fingerprint: self.fingerprint,
            path: self.path.clone(),
            network: self.network,
            key: NodeKey::Public(self.public_key().clone()),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("depth", &self.depth)
            .field("child_index", &self.child_index)
            .field("fingerprint", &self.fingerprint)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("path", &self.path)
            .field("network", &self.network)
            .field("private", &self.is_private())
            .finish_non_exhaustive()
    }
}
