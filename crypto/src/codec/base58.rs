//! Base58 and Base58Check with the Bitcoin alphabet.
//!
//! Each leading zero byte maps to one leading `1`; the rest of the input is
//! read as a big-endian integer and written in base 58. Base58Check appends
//! the first four bytes of `SHA256(SHA256(payload))` before encoding.

use num_bigint::BigUint;
use num_traits::Zero;

use super::CodecError;
use crate::hash::HashEngine;

/// The Bitcoin Base58 alphabet (no `0`, `O`, `I` or `l`).
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Checksum bytes appended by Base58Check.
pub const CHECKSUM_LEN: usize = 4;

/// ASCII byte → digit value (0xFF = invalid).
const DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 58 {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

pub fn encode(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();
    let mut value = BigUint::from_bytes_be(&bytes[zeros..]);

    let mut digits = Vec::new();
    let base = BigUint::from(58u32);
    while !value.is_zero() {
        let digit = (&value % &base).to_u32_digits().first().copied().unwrap_or(0);
        digits.push(ALPHABET[digit as usize]);
        value /= &base;
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat('1').take(zeros));
    out.extend(digits.iter().rev().map(|&b| b as char));
    out
}

pub fn decode(s: &str) -> Result<Vec<u8>, CodecError> {
    let mut value = BigUint::zero();
    let mut zeros = 0usize;
    let mut leading = true;

    for (position, c) in s.chars().enumerate() {
        let digit = if c.is_ascii() {
            DECODE[c as usize]
        } else {
            0xFF
        };
        if digit == 0xFF {
            return Err(CodecError::InvalidCharacter {
                character: c,
                position,
            });
        }
        if leading && digit == 0 {
            zeros += 1;
            continue;
        }
        leading = false;
        value = value * 58u32 + u32::from(digit);
    }

    let mut out = vec![0u8; zeros];
    if !value.is_zero() {
        out.extend_from_slice(&value.to_bytes_be());
    }
    Ok(out)
}

/// `payload ‖ SHA256(SHA256(payload))[..4]`, Base58-encoded.
pub fn encode_check(engine: &HashEngine, payload: &[u8]) -> String {
    let checksum = engine.double_sha256(payload);
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum.as_bytes()[..CHECKSUM_LEN]);
    encode(&data)
}

/// Decode and verify a Base58Check string, returning the payload.
pub fn decode_check(engine: &HashEngine, s: &str) -> Result<Vec<u8>, CodecError> {
    let mut data = decode(s)?;
    if data.len() < CHECKSUM_LEN {
        return Err(CodecError::InvalidLength(data.len()));
    }
    let split = data.len() - CHECKSUM_LEN;
    let expected = engine.double_sha256(&data[..split]);
    if data[split..] != expected.as_bytes()[..CHECKSUM_LEN] {
        return Err(CodecError::ChecksumMismatch);
    }
    data.truncate(split);
    Ok(data)
}
