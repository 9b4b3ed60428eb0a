use proptest::prelude::*;

use hdk_hd::{decode_wif, encode_wif, ExtendedKey, KeyTree, TreeError};
use hdk_types::{ChildIndex, DerivationPath, Network, HARDENED_OFFSET};

fn seed() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 16..=64)
}

fn network() -> impl Strategy<Value = Network> {
    prop_oneof![Just(Network::Main), Just(Network::Test)]
}

proptest! {
    // Every case runs several affine scalar multiplications.
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Neutering and deriving publicly lands on the same public node as
    /// deriving privately.
    #[test]
    fn public_and_private_derivation_agree(seed in seed(), i in 0u32..HARDENED_OFFSET) {
        let tree = KeyTree::bitcoin();
        let master = tree.seed_to_master(&seed, Network::Main).unwrap();
        let index = ChildIndex::normal(i).unwrap();
        let private = tree.derive_child(&master, index).unwrap();
        let public = tree.derive_public_child(&master.neuter(), index).unwrap();
        prop_assert_eq!(
            tree.serialize(&public, true).unwrap(),
            tree.serialize(&private, true).unwrap()
        );
    }

    /// Serialized keys parse back to the same fields and import to the same
    /// node.
    #[test]
    fn serialize_import_roundtrip(seed in seed(), net in network(), i in 0u32..HARDENED_OFFSET, hardened in any::<bool>()) {
        let tree = KeyTree::bitcoin();
        let master = tree.seed_to_master(&seed, net).unwrap();
        let node = tree.derive_child(&master, ChildIndex::new(i, hardened).unwrap()).unwrap();
        for public in [true, false] {
            let text = tree.serialize(&node, public).unwrap();
            let parsed = tree.parse_extended_key(&text).unwrap();
            prop_assert_eq!(&parsed, &tree.extended_key(&node, public).unwrap());
            prop_assert_eq!(parsed.network, net);
            prop_assert_eq!(parsed.depth, 1);

            let imported = tree.import_extended_key(&text, &mut rand::thread_rng()).unwrap();
            prop_assert_eq!(imported.public_key(), node.public_key());
            prop_assert_eq!(imported.is_private(), !public);
            prop_assert_eq!(tree.serialize(&imported, public).unwrap(), text);
        }
    }

    /// Walking a path equals deriving one step at a time.
    #[test]
    fn path_walk_is_stepwise(seed in seed(), steps in prop::collection::vec((0u32..1000, any::<bool>()), 0..3)) {
        let tree = KeyTree::bitcoin();
        let master = tree.seed_to_master(&seed, Network::Main).unwrap();
        let indices: Vec<ChildIndex> = steps
            .iter()
            .map(|&(i, h)| ChildIndex::new(i, h).unwrap())
            .collect();

        let mut stepwise = master.clone();
        for &index in &indices {
            stepwise = tree.derive_child(&stepwise, index).unwrap();
        }
        let path = DerivationPath::from_indices(indices).unwrap();
        let walked = tree.derive_path(&master, &path).unwrap();
        prop_assert_eq!(walked.path(), Some(&path));
        prop_assert_eq!(
            tree.serialize(&walked, false).unwrap(),
            tree.serialize(&stepwise, false).unwrap()
        );
    }

    /// Hardened indices never derive from a watch-only node.
    #[test]
    fn hardened_from_public_always_fails(seed in seed(), i in 0u32..HARDENED_OFFSET) {
        let tree = KeyTree::bitcoin();
        let public = tree.seed_to_master(&seed, Network::Main).unwrap().neuter();
        let index = ChildIndex::hardened(i).unwrap();
        prop_assert_eq!(tree.derive_child(&public, index).unwrap_err(), TreeError::HardenedFromPublic);
        prop_assert_eq!(tree.derive_public_child(&public, index).unwrap_err(), TreeError::HardenedFromPublic);
    }
}

proptest! {
    /// Corrupting one character of an extended key is always detected.
    #[test]
    fn extended_key_corruption_detected(pos in 0usize..111, replacement in 0usize..58) {
        let tree = KeyTree::bitcoin();
        let xprv = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
        let alphabet = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
        let mut chars: Vec<char> = xprv.chars().collect();
        let new = alphabet.as_bytes()[replacement] as char;
        prop_assume!(chars[pos] != new);
        chars[pos] = new;
        let corrupted: String = chars.into_iter().collect();
        prop_assert!(ExtendedKey::decode(tree.hashes(), &corrupted).is_err());
    }

    #[test]
    fn wif_roundtrip(bytes in prop::array::uniform32(any::<u8>()), net in network(), compressed in any::<bool>()) {
        let tree = KeyTree::bitcoin();
        let secret = hdk_types::PrivateKey::from_bytes(bytes);
        let text = encode_wif(tree.hashes(), &secret, net, compressed);
        let back = decode_wif(tree.hashes(), &text).unwrap();
        prop_assert_eq!(back.secret.as_bytes(), &bytes);
        prop_assert_eq!(back.network, net);
        prop_assert_eq!(back.compressed, compressed);
    }
}
