/// Merkle–Damgård strengthening: `0x80`, zeros, then the message length in
/// bits as a `length_bytes`-wide integer, so that the total is a multiple of
/// `block_len`.
///
/// SHA-2 writes the length big-endian, RIPEMD-160 little-endian.
pub(crate) fn md_pad(
    message: &[u8],
    block_len: usize,
    length_bytes: usize,
    big_endian: bool,
) -> Vec<u8> {
    let bit_len = (message.len() as u128).wrapping_mul(8);
    let mut padded_len = message.len() + 1 + length_bytes;
    padded_len = padded_len.div_ceil(block_len) * block_len;

    let mut out = Vec::with_capacity(padded_len);
    out.extend_from_slice(message);
    out.push(0x80);
    out.resize(padded_len - length_bytes, 0);

    let len_be = bit_len.to_be_bytes();
    let field = &len_be[16 - length_bytes.min(16)..];
    if big_endian {
        out.resize(padded_len - field.len(), 0);
        out.extend_from_slice(field);
    } else {
        out.extend(field.iter().rev());
        out.resize(padded_len, 0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_fits_one_block() {
        let p = md_pad(b"abc", 64, 8, true);
        assert_eq!(p.len(), 64);
        assert_eq!(&p[..4], &[b'a', b'b', b'c', 0x80]);
        assert_eq!(&p[56..], &[0, 0, 0, 0, 0, 0, 0, 24]);
    }

    #[test]
    fn fifty_six_bytes_spill_into_second_block() {
        let p = md_pad(&[0u8; 56], 64, 8, true);
        assert_eq!(p.len(), 128);
        assert_eq!(p[56], 0x80);
        assert_eq!(&p[120..], &(56u64 * 8).to_be_bytes());
    }

    #[test]
    fn little_endian_length() {
        let p = md_pad(b"abc", 64, 8, false);
        assert_eq!(&p[56..], &[24, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn sixteen_byte_length_field() {
        let p = md_pad(b"abc", 128, 16, true);
        assert_eq!(p.len(), 128);
        assert_eq!(p[127], 24);
        assert!(p[112..127].iter().all(|&b| b == 0));
    }
}
