//! SHA-2 compression for the 32-bit (SHA-224/256) and 64-bit (SHA-384/512)
//! families.

use super::constants::{Sha2Table32, Sha2Table64};
use super::padding::md_pad;

pub(crate) fn digest256(table: &Sha2Table32, message: &[u8]) -> [u32; 8] {
    let padded = md_pad(message, 64, 8, true);
    let mut state = table.h;
    for block in padded.chunks_exact(64) {
        compress256(&mut state, &table.k, block);
    }
    state
}

pub(crate) fn digest512(table: &Sha2Table64, message: &[u8]) -> [u64; 8] {
    let padded = md_pad(message, 128, 16, true);
    let mut state = table.h;
    for block in padded.chunks_exact(128) {
        compress512(&mut state, &table.k, block);
    }
    state
}

fn compress256(state: &mut [u32; 8], k: &[u32; 64], block: &[u8]) {
    let mut w = [0u32; 64];
    for (i, chunk) in block.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    for t in 16..64 {
        let s0 = w[t - 15].rotate_right(7) ^ w[t - 15].rotate_right(18) ^ (w[t - 15] >> 3);
        let s1 = w[t - 2].rotate_right(17) ^ w[t - 2].rotate_right(19) ^ (w[t - 2] >> 10);
        w[t] = w[t - 16]
            .wrapping_add(s0)
            .wrapping_add(w[t - 7])
            .wrapping_add(s1);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;
    for t in 0..64 {
        let big_s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
        let ch = (e & f) ^ (!e & g);
        let t1 = h
            .wrapping_add(big_s1)
            .wrapping_add(ch)
            .wrapping_add(k[t])
            .wrapping_add(w[t]);
        let big_s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
        let maj = (a & b) ^ (a & c) ^ (b & c);
        let t2 = big_s0.wrapping_add(maj);

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *s = s.wrapping_add(v);
    }
}

fn compress512(state: &mut [u64; 8], k: &[u64; 80], block: &[u8]) {
    let mut w = [0u64; 80];
    for (i, chunk) in block.chunks_exact(8).enumerate() {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        w[i] = u64::from_be_bytes(word);
    }
    for t in 16..80 {
        let s0 = w[t - 15].rotate_right(1) ^ w[t - 15].rotate_right(8) ^ (w[t - 15] >> 7);
        let s1 = w[t - 2].rotate_right(19) ^ w[t - 2].rotate_right(61) ^ (w[t - 2] >> 6);
        w[t] = w[t - 16]
            .wrapping_add(s0)
            .wrapping_add(w[t - 7])
            .wrapping_add(s1);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;
    for t in 0..80 {
        let big_s1 = e.rotate_right(14) ^ e.rotate_right(18) ^ e.rotate_right(41);
        let ch = (e & f) ^ (!e & g);
        let t1 = h
            .wrapping_add(big_s1)
            .wrapping_add(ch)
            .wrapping_add(k[t])
            .wrapping_add(w[t]);
        let big_s0 = a.rotate_right(28) ^ a.rotate_right(34) ^ a.rotate_right(39);
        let maj = (a & b) ^ (a & c) ^ (b & c);
        let t2 = big_s0.wrapping_add(maj);

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *s = s.wrapping_add(v);
    }
}

/// Serialize the first `W` words big-endian into `B = 4·W` bytes.
pub(crate) fn words_to_bytes<const W: usize, const B: usize>(state: &[u32; 8]) -> [u8; B] {
    debug_assert_eq!(W * 4, B);
    let mut out = [0u8; B];
    for (chunk, word) in out.chunks_exact_mut(4).zip(&state[..W]) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// Serialize the first `W` words big-endian into `B = 8·W` bytes.
pub(crate) fn dwords_to_bytes<const W: usize, const B: usize>(state: &[u64; 8]) -> [u8; B] {
    debug_assert_eq!(W * 8, B);
    let mut out = [0u8; B];
    for (chunk, word) in out.chunks_exact_mut(8).zip(&state[..W]) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    out
}
