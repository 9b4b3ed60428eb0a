//! SHA-2 initial hash values and round constants.
//!
//! The tables are derived from prime numbers: fractional bits of square roots
//! for the initial values, fractional bits of cube roots for the round
//! constants. They can be generated from a [`PrimeTable`] or loaded from a
//! JSON file of the form
//!
//! ```json
//! { "SHA-256": { "h": ["0x6a09e667", ...], "k": ["0x428a2f98", ...] }, ... }
//! ```

use hdk_math::PrimeTable;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::HashError;

/// Primes needed to build every table (SHA-384/512 use 80 round constants).
pub const REQUIRED_PRIMES: usize = 80;

/// Constants for the 32-bit SHA-2 variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sha2Table32 {
    pub h: [u32; 8],
    pub k: [u32; 64],
}

/// Constants for the 64-bit SHA-2 variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sha2Table64 {
    pub h: [u64; 8],
    pub k: [u64; 80],
}

/// The four SHA-2 constant tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashConstants {
    pub sha224: Sha2Table32,
    pub sha256: Sha2Table32,
    pub sha384: Sha2Table64,
    pub sha512: Sha2Table64,
}

/// `bits` leading fractional bits of `prime^(1/root)`.
fn fractional_bits(prime: u64, root: u32, bits: u32) -> u64 {
    let scaled = BigUint::from(prime) << (bits as usize * root as usize);
    let mask = (BigUint::from(1u8) << bits as usize) - 1u8;
    // mask < 2^64, so the conversion always succeeds
    (scaled.nth_root(root) & mask).to_u64().unwrap_or_default()
}

impl HashConstants {
    /// FIPS 180-4 tables, computed from the first 80 primes.
    pub fn standard() -> Self {
        Self::generate(PrimeTable::first(REQUIRED_PRIMES).as_slice())
    }

    /// Derive all tables from the leading entries of `primes`.
    pub fn from_primes(primes: &PrimeTable) -> Result<Self, HashError> {
        if primes.len() < REQUIRED_PRIMES {
            return Err(HashError::NotEnoughPrimes {
                needed: REQUIRED_PRIMES,
                got: primes.len(),
            });
        }
        Ok(Self::generate(primes.as_slice()))
    }

    fn generate(primes: &[u64]) -> Self {
        let sqrt64 = |p: u64| fractional_bits(p, 2, 64);
        let cbrt64 = |p: u64| fractional_bits(p, 3, 64);

        let mut sha256_h = [0u32; 8];
        let mut sha512_h = [0u64; 8];
        let mut sha384_h = [0u64; 8];
        let mut sha224_h = [0u32; 8];
        for i in 0..8 {
            sha512_h[i] = sqrt64(primes[i]);
            sha256_h[i] = (sha512_h[i] >> 32) as u32;
            // 9th to 16th primes; SHA-224 keeps the second 32 bits
            sha384_h[i] = sqrt64(primes[i + 8]);
            sha224_h[i] = sha384_h[i] as u32;
        }

        let mut k64 = [0u64; 80];
        for (slot, &p) in k64.iter_mut().zip(primes) {
            *slot = cbrt64(p);
        }
        let mut k32 = [0u32; 64];
        for (slot, word) in k32.iter_mut().zip(k64) {
            *slot = (word >> 32) as u32;
        }

        Self {
            sha224: Sha2Table32 { h: sha224_h, k: k32 },
            sha256: Sha2Table32 { h: sha256_h, k: k32 },
            sha384: Sha2Table64 { h: sha384_h, k: k64 },
            sha512: Sha2Table64 { h: sha512_h, k: k64 },
        }
    }

    pub fn from_json(s: &str) -> Result<Self, HashError> {
        let file: ConstantsFile =
            serde_json::from_str(s).map_err(|e| HashError::InvalidTable(e.to_string()))?;
        Ok(Self {
            sha224: file.sha224.to_table32("SHA-224")?,
            sha256: file.sha256.to_table32("SHA-256")?,
            sha384: file.sha384.to_table64("SHA-384")?,
            sha512: file.sha512.to_table64("SHA-512")?,
        })
    }

    pub fn to_json(&self) -> Result<String, HashError> {
        let file = ConstantsFile {
            sha224: TableFile::from_words(&self.sha224.h, &self.sha224.k, 8),
            sha256: TableFile::from_words(&self.sha256.h, &self.sha256.k, 8),
            sha384: TableFile::from_words(&self.sha384.h, &self.sha384.k, 16),
            sha512: TableFile::from_words(&self.sha512.h, &self.sha512.k, 16),
        };
        serde_json::to_string_pretty(&file).map_err(|e| HashError::InvalidTable(e.to_string()))
    }
}

impl Default for HashConstants {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Serialize, Deserialize)]
struct ConstantsFile {
    #[serde(rename = "SHA-224")]
    sha224: TableFile,
    #[serde(rename = "SHA-256")]
    sha256: TableFile,
    #[serde(rename = "SHA-384")]
    sha384: TableFile,
    #[serde(rename = "SHA-512")]
    sha512: TableFile,
}

#[derive(Serialize, Deserialize)]
struct TableFile {
    h: Vec<String>,
    k: Vec<String>,
}

fn parse_word(s: &str, max_bits: u32, name: &str) -> Result<u64, HashError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let value = u64::from_str_radix(digits, 16)
        .map_err(|_| HashError::InvalidTable(format!("{name}: bad hex word {s:?}")))?;
    if max_bits < 64 && value >> max_bits != 0 {
        return Err(HashError::InvalidTable(format!(
            "{name}: word {s:?} wider than {max_bits} bits"
        )));
    }
    Ok(value)
}

fn parse_words<const N: usize>(
    words: &[String],
    max_bits: u32,
    name: &str,
    field: &str,
) -> Result<[u64; N], HashError> {
    if words.len() != N {
        return Err(HashError::InvalidTable(format!(
            "{name}.{field}: expected {N} words, got {}",
            words.len()
        )));
    }
    let mut out = [0u64; N];
    for (slot, word) in out.iter_mut().zip(words) {
        *slot = parse_word(word, max_bits, name)?;
    }
    Ok(out)
}

impl TableFile {
    fn to_table32(&self, name: &str) -> Result<Sha2Table32, HashError> {
        let h = parse_words::<8>(&self.h, 32, name, "h")?;
        let k = parse_words::<64>(&self.k, 32, name, "k")?;
        Ok(Sha2Table32 {
            h: h.map(|w| w as u32),
            k: k.map(|w| w as u32),
        })
    }

    fn to_table64(&self, name: &str) -> Result<Sha2Table64, HashError> {
        Ok(Sha2Table64 {
            h: parse_words::<8>(&self.h, 64, name, "h")?,
            k: parse_words::<80>(&self.k, 64, name, "k")?,
        })
    }

    fn from_words<T: Copy + Into<u64>>(h: &[T], k: &[T], width: usize) -> Self {
        let fmt = |w: &T| format!("0x{:0width$x}", Into::<u64>::into(*w), width = width);
        Self {
            h: h.iter().map(fmt).collect(),
            k: k.iter().map(fmt).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_match_fips() {
        let c = HashConstants::standard();
        assert_eq!(c.sha256.h[0], 0x6a09e667);
        assert_eq!(c.sha256.h[7], 0x5be0cd19);
        assert_eq!(c.sha256.k[0], 0x428a2f98);
        assert_eq!(c.sha256.k[63], 0xc67178f2);
        assert_eq!(c.sha224.h[0], 0xc1059ed8);
        assert_eq!(c.sha224.h[7], 0xbefa4fa4);
        assert_eq!(c.sha384.h[0], 0xcbbb9d5dc1059ed8);
        assert_eq!(c.sha512.h[0], 0x6a09e667f3bcc908);
        assert_eq!(c.sha512.k[0], 0x428a2f98d728ae22);
        assert_eq!(c.sha512.k[79], 0x6c44198c4a475817);
    }

    #[test]
    fn json_roundtrip() {
        let c = HashConstants::standard();
        let json = c.to_json().unwrap();
        assert!(json.contains("\"0x6a09e667\""));
        assert_eq!(HashConstants::from_json(&json).unwrap(), c);
    }

    #[test]
    fn json_rejects_bad_tables() {
        let c = HashConstants::standard();
        let json = c.to_json().unwrap();

        let short = json.replacen("\"0x6a09e667\",", "", 1);
        assert!(matches!(
            HashConstants::from_json(&short),
            Err(HashError::InvalidTable(_))
        ));

        let wide = json.replacen("\"0x6a09e667\"", "\"0x16a09e667\"", 1);
        assert!(HashConstants::from_json(&wide).is_err());

        let garbage = json.replacen("\"0x6a09e667\"", "\"0xzz\"", 1);
        assert!(HashConstants::from_json(&garbage).is_err());

        assert!(HashConstants::from_json("{}").is_err());
    }

    #[test]
    fn from_primes_needs_eighty() {
        assert_eq!(
            HashConstants::from_primes(&PrimeTable::first(79)),
            Err(HashError::NotEnoughPrimes { needed: 80, got: 79 })
        );
        assert_eq!(
            HashConstants::from_primes(&PrimeTable::standard()).unwrap(),
            HashConstants::standard()
        );
    }
}
