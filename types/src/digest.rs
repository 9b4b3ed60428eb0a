//! Fixed-length digest values.
//!
//! Every hash function in the workspace returns a [`Digest`]. Presentation
//! (hex, big integer, binary string) lives in explicit helpers so the
//! algorithms never deal with output formats.

use num_bigint::BigUint;
use std::fmt;

/// An immutable `N`-byte digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest<const N: usize>([u8; N]);

pub type Sha224Digest = Digest<28>;
pub type Sha256Digest = Digest<32>;
pub type Sha384Digest = Digest<48>;
pub type Sha512Digest = Digest<64>;
pub type Ripemd160Digest = Digest<20>;
/// `RIPEMD160(SHA256(x))`.
pub type Hash160Digest = Digest<20>;

impl<const N: usize> Digest<N> {
    pub const LEN: usize = N;

    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    pub const fn zero() -> Self {
        Self([0u8; N])
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; N] {
        self.0
    }

    /// The first `M` bytes of the digest.
    ///
    /// # Panics
    /// Panics if `M > N`.
    pub fn prefix<const M: usize>(&self) -> [u8; M] {
        let mut out = [0u8; M];
        out.copy_from_slice(&self.0[..M]);
        out
    }

    /// Lower-case hexadecimal, two characters per byte.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The digest read as a big-endian unsigned integer.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    /// `8 * N` characters of `0`/`1`, most significant bit first.
    pub fn to_bin_string(&self) -> String {
        self.0.iter().map(|b| format!("{:08b}", b)).collect()
    }
}

impl<const N: usize> From<[u8; N]> for Digest<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> AsRef<[u8]> for Digest<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> AsMut<[u8]> for Digest<N> {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl<const N: usize> fmt::Debug for Digest<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest<{}>(", N)?;
        for b in self.0.iter().take(4) {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl<const N: usize> fmt::Display for Digest<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
