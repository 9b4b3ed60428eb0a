//! BIP-39 mnemonics.
//!
//! A mnemonic is handled as a list of 11-bit word indices. The first
//! `32·count/3` bits are entropy, the remaining `count/3` bits are the leading
//! bits of `SHA256(entropy)`. [`Wordlist`] maps indices to words; the codec
//! itself never looks at text except when stretching a phrase into a seed.

use std::collections::HashMap;

use hdk_types::Sha512Digest;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash::HashEngine;
use crate::pbkdf2::{pbkdf2_hmac_sha512, KdfError};

/// Number of words in a valid list.
pub const WORDLIST_LEN: usize = 2048;

/// Iteration count used by BIP-39 seed derivation.
pub const SEED_ITERATIONS: u32 = 2048;

/// Accepted mnemonic lengths.
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

const BITS_PER_WORD: usize = 11;
const SALT_PREFIX: &str = "mnemonic";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("invalid word count {0}, expected 12, 15, 18, 21 or 24")]
    InvalidWordCount(usize),

    #[error("word index {0} out of range")]
    IndexOutOfRange(u16),

    #[error("unknown word {0:?}")]
    UnknownWord(String),

    #[error("invalid word list: {0}")]
    InvalidWordlist(String),

    #[error("invalid entropy length {0} bytes, expected 16, 20, 24, 28 or 32")]
    InvalidEntropyLength(usize),

    #[error("mnemonic checksum mismatch")]
    ChecksumMismatch,

    #[error(transparent)]
    Kdf(#[from] KdfError),
}

/// An index-addressable list of exactly 2048 distinct words.
///
/// Deserializes from a plain JSON array of strings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Wordlist {
    words: Vec<String>,
    index: HashMap<String, u16>,
}

impl Wordlist {
    pub fn from_words<I, S>(words: I) -> Result<Self, MnemonicError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        Self::try_from(words)
    }

    pub fn from_json(s: &str) -> Result<Self, MnemonicError> {
        serde_json::from_str(s).map_err(|e| MnemonicError::InvalidWordlist(e.to_string()))
    }

    pub fn word(&self, index: u16) -> Result<&str, MnemonicError> {
        self.words
            .get(index as usize)
            .map(String::as_str)
            .ok_or(MnemonicError::IndexOutOfRange(index))
    }

    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.index.get(word).copied()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Split on whitespace and look up every word.
    pub fn phrase_to_indices(&self, phrase: &str) -> Result<Vec<u16>, MnemonicError> {
        phrase
            .split_whitespace()
            .map(|w| {
                self.index_of(w)
                    .ok_or_else(|| MnemonicError::UnknownWord(w.to_string()))
            })
            .collect()
    }

    /// Words joined by single spaces.
    pub fn indices_to_phrase(&self, indices: &[u16]) -> Result<String, MnemonicError> {
        let words = indices
            .iter()
            .map(|&i| self.word(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(words.join(" "))
    }
}

impl TryFrom<Vec<String>> for Wordlist {
    type Error = MnemonicError;

    fn try_from(words: Vec<String>) -> Result<Self, Self::Error> {
        if words.len() != WORDLIST_LEN {
            return Err(MnemonicError::InvalidWordlist(format!(
                "expected {WORDLIST_LEN} words, got {}",
                words.len()
            )));
        }
        let mut index = HashMap::with_capacity(WORDLIST_LEN);
        for (i, word) in words.iter().enumerate() {
            if word.is_empty() || word.chars().any(char::is_whitespace) {
                return Err(MnemonicError::InvalidWordlist(format!(
                    "word {i} is empty or contains whitespace"
                )));
            }
            if index.insert(word.clone(), i as u16).is_some() {
                return Err(MnemonicError::InvalidWordlist(format!("duplicate word {word:?}")));
            }
        }
        Ok(Self { words, index })
    }
}

impl From<Wordlist> for Vec<String> {
    fn from(list: Wordlist) -> Self {
        list.words
    }
}

impl PartialEq for Wordlist {
    fn eq(&self, other: &Self) -> bool {
        self.words == other.words
    }
}

impl Eq for Wordlist {}

fn check_word_count(count: usize) -> Result<(), MnemonicError> {
    if VALID_WORD_COUNTS.contains(&count) {
        Ok(())
    } else {
        Err(MnemonicError::InvalidWordCount(count))
    }
}

/// Bits of checksum carried by a mnemonic of `count` words.
fn checksum_len(count: usize) -> usize {
    count / 3
}

/// Pack 11-bit indices MSB-first into bytes.
fn pack(indices: &[u16]) -> Result<Vec<u8>, MnemonicError> {
    let mut bytes = vec![0u8; (indices.len() * BITS_PER_WORD).div_ceil(8)];
    for (i, &index) in indices.iter().enumerate() {
        if index as usize >= WORDLIST_LEN {
            return Err(MnemonicError::IndexOutOfRange(index));
        }
        for bit in 0..BITS_PER_WORD {
            if (index >> (BITS_PER_WORD - 1 - bit)) & 1 == 1 {
                let pos = i * BITS_PER_WORD + bit;
                bytes[pos / 8] |= 0x80 >> (pos % 8);
            }
        }
    }
    Ok(bytes)
}

/// Read `count` 11-bit indices MSB-first.
fn unpack(bytes: &[u8], count: usize) -> Vec<u16> {
    (0..count)
        .map(|i| {
            (0..BITS_PER_WORD).fold(0u16, |acc, bit| {
                let pos = i * BITS_PER_WORD + bit;
                let set = bytes.get(pos / 8).map_or(0, |b| (b >> (7 - pos % 8)) & 1);
                (acc << 1) | u16::from(set)
            })
        })
        .collect()
}

/// Checksum validation, generation and seed stretching for BIP-39 mnemonics.
#[derive(Clone, Debug)]
pub struct MnemonicCodec {
    hashes: HashEngine,
}

impl MnemonicCodec {
    pub fn new(hashes: HashEngine) -> Self {
        Self { hashes }
    }

    /// Leading `bits` bits of `SHA256(entropy)`, right-aligned.
    fn checksum(&self, entropy: &[u8], bits: usize) -> u8 {
        let first = self.hashes.sha256(entropy).as_bytes()[0];
        first >> (8 - bits)
    }

    /// Split a mnemonic into its entropy bytes and stored checksum.
    fn split(&self, indices: &[u16]) -> Result<(Vec<u8>, u8), MnemonicError> {
        check_word_count(indices.len())?;
        let cs_bits = checksum_len(indices.len());
        let entropy_len = (indices.len() * BITS_PER_WORD - cs_bits) / 8;
        let packed = pack(indices)?;
        let stored = packed[entropy_len] >> (8 - cs_bits);
        let mut entropy = packed;
        entropy.truncate(entropy_len);
        Ok((entropy, stored))
    }

    /// Whether the trailing checksum bits match the entropy.
    ///
    /// Fails only for an unsupported word count or an index above 2047.
    pub fn check_checksum(&self, indices: &[u16]) -> Result<bool, MnemonicError> {
        let (entropy, stored) = self.split(indices)?;
        Ok(stored == self.checksum(&entropy, checksum_len(indices.len())))
    }

    /// The entropy encoded by a mnemonic whose checksum is valid.
    pub fn indices_to_entropy(&self, indices: &[u16]) -> Result<Vec<u8>, MnemonicError> {
        let (entropy, stored) = self.split(indices)?;
        if stored != self.checksum(&entropy, checksum_len(indices.len())) {
            return Err(MnemonicError::ChecksumMismatch);
        }
        Ok(entropy)
    }

    /// Encode 16, 20, 24, 28 or 32 bytes of entropy as word indices.
    pub fn entropy_to_indices(&self, entropy: &[u8]) -> Result<Vec<u16>, MnemonicError> {
        if !(16..=32).contains(&entropy.len()) || entropy.len() % 4 != 0 {
            return Err(MnemonicError::InvalidEntropyLength(entropy.len()));
        }
        let count = entropy.len() * 8 * 3 / 32;
        let cs_bits = checksum_len(count);
        let mut data = entropy.to_vec();
        data.push(self.checksum(entropy, cs_bits) << (8 - cs_bits));
        Ok(unpack(&data, count))
    }

    /// Every word that completes `prefix` to a mnemonic with a valid checksum,
    /// in ascending index order.
    ///
    /// Exactly one candidate exists for each value of the entropy bits held
    /// by the last word, so the result has `2^(11 - count/3)` entries.
    pub fn last_word_candidates(&self, prefix: &[u16]) -> Result<Vec<u16>, MnemonicError> {
        let count = prefix.len() + 1;
        check_word_count(count)?;
        let cs_bits = checksum_len(count);
        let free_bits = BITS_PER_WORD - cs_bits;

        let mut indices = prefix.to_vec();
        indices.push(0);
        let mut candidates = Vec::with_capacity(1 << free_bits);
        for high in 0..(1u16 << free_bits) {
            indices[count - 1] = high << cs_bits;
            let (entropy, _) = self.split(&indices)?;
            let checksum = u16::from(self.checksum(&entropy, cs_bits));
            candidates.push((high << cs_bits) | checksum);
        }
        Ok(candidates)
    }

    /// A random valid mnemonic of `count` words.
    ///
    /// `count - 1` words are drawn uniformly; the last is drawn uniformly
    /// from [`Self::last_word_candidates`].
    pub fn generate<R: RngCore + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<u16>, MnemonicError> {
        check_word_count(count)?;
        // 2048 divides 2^32, so the reduction keeps the draw uniform
        let mut indices: Vec<u16> = (0..count - 1)
            .map(|_| (rng.next_u32() as usize % WORDLIST_LEN) as u16)
            .collect();
        let candidates = self.last_word_candidates(&indices)?;
        let pick = rng.next_u32() as usize % candidates.len();
        indices.push(candidates[pick]);
        tracing::debug!(words = count, "generated mnemonic");
        Ok(indices)
    }

    /// `PBKDF2-HMAC-SHA512(phrase, "mnemonic" ‖ passphrase, iterations)`.
    ///
    /// The phrase and passphrase are used byte-for-byte as UTF-8; no Unicode
    /// normalization is applied.
    pub fn to_seed(
        &self,
        phrase: &str,
        passphrase: &str,
        iterations: u32,
    ) -> Result<Sha512Digest, MnemonicError> {
        let salt = format!("{SALT_PREFIX}{passphrase}");
        tracing::trace!(iterations, "stretching mnemonic into seed");
        Ok(pbkdf2_hmac_sha512(
            &self.hashes,
            phrase.as_bytes(),
            salt.as_bytes(),
            iterations,
        )?)
    }

    /// Check a phrase against `wordlist` and return its entropy.
    pub fn parse_phrase(&self, wordlist: &Wordlist, phrase: &str) -> Result<Vec<u8>, MnemonicError> {
        let indices = wordlist.phrase_to_indices(phrase)?;
        self.indices_to_entropy(&indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn english() -> Wordlist {
        Wordlist::from_words(bip39::Language::English.word_list().iter().copied()).unwrap()
    }

    fn codec() -> MnemonicCodec {
        MnemonicCodec::new(HashEngine::standard())
    }

    const ABANDON_ABOUT: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn wordlist_lookups() {
        let w = english();
        assert_eq!(w.word(0).unwrap(), "abandon");
        assert_eq!(w.word(2047).unwrap(), "zoo");
        assert_eq!(w.index_of("about"), Some(3));
        assert_eq!(w.index_of("bitcoin"), None);
        assert_eq!(w.word(2048), Err(MnemonicError::IndexOutOfRange(2048)));
    }

    #[test]
    fn wordlist_validation() {
        assert!(matches!(
            Wordlist::from_words(["a", "b"]),
            Err(MnemonicError::InvalidWordlist(_))
        ));
        let mut dup: Vec<String> = english().words().to_vec();
        dup[1] = dup[0].clone();
        assert!(Wordlist::try_from(dup).is_err());

        let json = serde_json::to_string(&english()).unwrap();
        assert_eq!(Wordlist::from_json(&json).unwrap(), english());
        assert!(Wordlist::from_json("[\"abandon\"]").is_err());
    }

    #[test]
    fn known_valid_mnemonics() {
        let (w, c) = (english(), codec());
        for phrase in [
            ABANDON_ABOUT,
            "legal winner thank year wave sausage worth useful legal winner thank yellow",
            "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
            "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong",
            "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo vote",
        ] {
            let indices = w.phrase_to_indices(phrase).unwrap();
            assert!(c.check_checksum(&indices).unwrap(), "{phrase}");
        }
    }

    #[test]
    fn invalid_checksum_detected() {
        let (w, c) = (english(), codec());
        let indices = w.phrase_to_indices(&"abandon ".repeat(12)).unwrap();
        assert!(!c.check_checksum(&indices).unwrap());
        assert_eq!(c.indices_to_entropy(&indices), Err(MnemonicError::ChecksumMismatch));
    }

    #[test]
    fn word_count_and_index_validation() {
        let c = codec();
        assert_eq!(c.check_checksum(&[0; 11]), Err(MnemonicError::InvalidWordCount(11)));
        assert_eq!(c.check_checksum(&[0; 13]), Err(MnemonicError::InvalidWordCount(13)));
        let mut bad = vec![0u16; 12];
        bad[4] = 2048;
        assert_eq!(c.check_checksum(&bad), Err(MnemonicError::IndexOutOfRange(2048)));
    }

    #[test]
    fn entropy_roundtrip_known_vector() {
        let (w, c) = (english(), codec());
        let indices = c.entropy_to_indices(&[0x7f; 16]).unwrap();
        assert_eq!(
            w.indices_to_phrase(&indices).unwrap(),
            "legal winner thank year wave sausage worth useful legal winner thank yellow"
        );
        assert_eq!(c.indices_to_entropy(&indices).unwrap(), vec![0x7f; 16]);
        assert_eq!(
            c.entropy_to_indices(&[0u8; 15]),
            Err(MnemonicError::InvalidEntropyLength(15))
        );
        assert_eq!(
            c.entropy_to_indices(&[0u8; 36]),
            Err(MnemonicError::InvalidEntropyLength(36))
        );
    }

    #[test]
    fn trezor_seed_vector() {
        let seed = codec().to_seed(ABANDON_ABOUT, "TREZOR", SEED_ITERATIONS).unwrap();
        assert_eq!(
            seed.to_hex(),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e5349553\
             1f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn published_trezor_seeds() {
        let c = codec();
        for (phrase, expected) in [
            (
                "legal winner thank year wave sausage worth useful legal winner thank yellow",
                "2e8905819b8723fe2c1d161860e5ee1830318dbf49a83bd451cfb8440c28bd6f\
                 a457fe1296106559a3c80937a1c1069be3a3a5bd381ee6260e8d9739fce1f607",
            ),
            (
                "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
                "d71de856f81a8acc65e6fc851a38d4d7ec216fd0796d0a6827a3ad6ed5511a30\
                 fa280f12eb2e47ed2ac03b5c462a0358d18d69fe4f985ec81778c1b370b652a8",
            ),
            (
                "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong",
                "ac27495480225222079d7be181583751e86f571027b0497b5b5d11218e0a8a13\
                 332572917f0f8e5a589620c6f15b11c61dee327651a14c34e18231052e48c069",
            ),
        ] {
            let seed = c.to_seed(phrase, "TREZOR", SEED_ITERATIONS).unwrap();
            assert_eq!(seed.to_hex(), expected, "{phrase}");
        }
    }

    /// A 12-word phrase carries 4 checksum bits, so about one in sixteen
    /// single-word substitutions still validates. At the last position only
    /// the 127 other words sharing its entropy bits do.
    #[test]
    fn single_word_substitutions_mostly_fail() {
        let (w, c) = (english(), codec());
        let valid = w.phrase_to_indices(ABANDON_ABOUT).unwrap();
        for pos in 0..valid.len() {
            let accepted = (0..2048u16)
                .filter(|&word| word != valid[pos])
                .filter(|&word| {
                    let mut tampered = valid.clone();
                    tampered[pos] = word;
                    c.check_checksum(&tampered).unwrap()
                })
                .count();
            assert!(accepted < 2047 / 8, "position {pos}: {accepted} accepted");
            if pos == valid.len() - 1 {
                assert_eq!(accepted, 127);
            }
        }
    }

    #[test]
    fn zero_iteration_seed_is_an_error() {
        assert_eq!(
            codec().to_seed(ABANDON_ABOUT, "", 0),
            Err(MnemonicError::Kdf(KdfError::ZeroIterations))
        );
    }

    #[test]
    fn last_word_candidates_are_exactly_the_valid_ones() {
        let (w, c) = (english(), codec());
        let prefix = w.phrase_to_indices(&"abandon ".repeat(11)).unwrap();
        let candidates = c.last_word_candidates(&prefix).unwrap();
        assert_eq!(candidates.len(), 128);
        assert!(candidates.contains(&3)); // "about"

        let brute: Vec<u16> = (0..2048u16)
            .filter(|&last| {
                let mut full = prefix.clone();
                full.push(last);
                c.check_checksum(&full).unwrap()
            })
            .collect();
        assert_eq!(candidates, brute);

        let long = vec![2047u16; 23];
        assert_eq!(c.last_word_candidates(&long).unwrap().len(), 8);
    }

    #[test]
    fn generated_mnemonics_are_valid() {
        let c = codec();
        let mut rng = StdRng::seed_from_u64(39);
        for count in VALID_WORD_COUNTS {
            let indices = c.generate(count, &mut rng).unwrap();
            assert_eq!(indices.len(), count);
            assert!(c.check_checksum(&indices).unwrap());
        }
        assert_eq!(
            c.generate(13, &mut rng),
            Err(MnemonicError::InvalidWordCount(13))
        );
    }

    #[test]
    fn parse_phrase_reports_unknown_words() {
        let (w, c) = (english(), codec());
        assert_eq!(
            c.parse_phrase(&w, "abandon bitcoin"),
            Err(MnemonicError::UnknownWord("bitcoin".into()))
        );
        assert_eq!(c.parse_phrase(&w, ABANDON_ABOUT).unwrap(), vec![0u8; 16]);
    }
}
