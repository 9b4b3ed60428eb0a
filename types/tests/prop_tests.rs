use proptest::prelude::*;

use hdk_types::{ChildIndex, DerivationPath, Digest, HARDENED_OFFSET};

fn child_index() -> impl Strategy<Value = ChildIndex> {
    (0u32..HARDENED_OFFSET, any::<bool>()).prop_map(|(i, h)| ChildIndex::new(i, h).unwrap())
}

proptest! {
    /// Display followed by parse yields the same path.
    #[test]
    fn path_display_parse_roundtrip(indices in prop::collection::vec(child_index(), 0..12)) {
        let path = DerivationPath::from_indices(indices).unwrap();
        let parsed: DerivationPath = path.to_string().parse().unwrap();
        prop_assert_eq!(parsed, path);
    }

    /// The raw wire value carries the hardened flag in its top bit.
    #[test]
    fn child_index_raw_layout(i in 0u32..HARDENED_OFFSET, hardened in any::<bool>()) {
        let idx = ChildIndex::new(i, hardened).unwrap();
        prop_assert_eq!(idx.index(), i);
        prop_assert_eq!(idx.is_hardened(), hardened);
        prop_assert_eq!(idx.raw() >> 31 == 1, hardened);
    }

    /// Indices at or above 2^31 are never accepted as plain indices.
    #[test]
    fn child_index_rejects_high_values(i in HARDENED_OFFSET..=u32::MAX, hardened in any::<bool>()) {
        prop_assert!(ChildIndex::new(i, hardened).is_err());
    }

    /// Hex and integer views describe the same bytes.
    #[test]
    fn digest_hex_matches_bytes(bytes in prop::array::uniform32(0u8..)) {
        let d = Digest::new(bytes);
        prop_assert_eq!(hex::decode(d.to_hex()).unwrap(), bytes.to_vec());
        let mut be = d.to_biguint().to_bytes_be();
        while be.len() < 32 {
            be.insert(0, 0);
        }
        prop_assert_eq!(be, bytes.to_vec());
        prop_assert_eq!(d.to_bin_string().len(), 256);
    }
}
