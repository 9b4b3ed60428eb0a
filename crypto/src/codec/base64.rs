//! Standard Base64 (RFC 4648 §4) with `=` padding.
//!
//! Decoding is strict: the length must be a multiple of four, padding may only
//! appear at the end, and unused trailing bits must be zero.

use super::CodecError;

pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const PAD: u8 = b'=';

const DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 64 {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let n = (b0 << 16) | (b1 << 8) | b2;

        out.push(ALPHABET[(n >> 18) as usize & 0x3F] as char);
        out.push(ALPHABET[(n >> 12) as usize & 0x3F] as char);
        if chunk.len() > 1 {
            out.push(ALPHABET[(n >> 6) as usize & 0x3F] as char);
        } else {
            out.push(PAD as char);
        }
        if chunk.len() > 2 {
            out.push(ALPHABET[n as usize & 0x3F] as char);
        } else {
            out.push(PAD as char);
        }
    }
    out
}

fn sextet(c: u8, position: usize) -> Result<u32, CodecError> {
    let v = if c < 128 { DECODE[c as usize] } else { 0xFF };
    if v == 0xFF {
        return Err(CodecError::InvalidCharacter {
            character: c as char,
            position,
        });
    }
    Ok(v as u32)
}

pub fn decode(s: &str) -> Result<Vec<u8>, CodecError> {
    let input = s.as_bytes();
    if input.len() % 4 != 0 {
        return Err(CodecError::InvalidLength(input.len()));
    }
    if let Some(position) = input.iter().position(|b| !b.is_ascii()) {
        let character = s[position..].chars().next().unwrap_or('\u{FFFD}');
        return Err(CodecError::InvalidCharacter {
            character,
            position,
        });
    }

    let mut out = Vec::with_capacity(input.len() / 4 * 3);
    let quads = input.len() / 4;
    for (q, quad) in input.chunks_exact(4).enumerate() {
        let base = q * 4;
        let last = q + 1 == quads;
        let pad = quad.iter().rev().take_while(|&&b| b == PAD).count();
        if pad > 2 || (pad > 0 && !last) {
            return Err(CodecError::InvalidPadding);
        }

        let mut n = 0u32;
        for (i, &c) in quad[..4 - pad].iter().enumerate() {
            n |= sextet(c, base + i)? << (18 - 6 * i);
        }

        match pad {
            0 => out.extend_from_slice(&[(n >> 16) as u8, (n >> 8) as u8, n as u8]),
            1 => {
                if n & 0xFF != 0 {
                    return Err(CodecError::InvalidPadding);
                }
                out.extend_from_slice(&[(n >> 16) as u8, (n >> 8) as u8]);
            }
            _ => {
                if n & 0xFFFF != 0 {
                    return Err(CodecError::InvalidPadding);
                }
                out.push((n >> 16) as u8);
            }
        }
    }
    Ok(out)
}
