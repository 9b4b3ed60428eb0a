//! Network identifier.

use serde::{Deserialize, Serialize};

/// Selects the version bytes used when keys are serialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// The production network (`xprv`/`xpub`).
    #[default]
    Main,
    /// The public test network (`tprv`/`tpub`).
    Test,
}

impl Network {
    /// Extended private key version prefix.
    pub const fn private_version(self) -> u32 {
        match self {
            Self::Main => 0x0488_ADE4,
            Self::Test => 0x0435_8394,
        }
    }

    /// Extended public key version prefix.
    pub const fn public_version(self) -> u32 {
        match self {
            Self::Main => 0x0488_B21E,
            Self::Test => 0x0435_87CF,
        }
    }

    /// Wallet Import Format version byte.
    pub const fn wif_prefix(self) -> u8 {
        match self {
            Self::Main => 0x80,
            Self::Test => 0xef,
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Test => "test",
        }
    }
}
