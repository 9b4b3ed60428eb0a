#![no_main]

use std::sync::OnceLock;

use hdk_crypto::base58;
use hdk_hd::{ExtendedKey, KeyTree};
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn tree() -> &'static KeyTree {
    static TREE: OnceLock<KeyTree> = OnceLock::new();
    TREE.get_or_init(KeyTree::bitcoin)
}

fuzz_target!(|data: &[u8]| {
    let tree = tree();

    // Raw payloads: frame parsing never panics and accepted frames re-serialize
    // byte for byte.
    if let Ok(key) = ExtendedKey::from_bytes(data) {
        assert_eq!(&key.to_bytes()[..], data);
    }

    // The same payload behind a valid checksum goes through the full import,
    // including point decompression.
    let text = base58::encode_check(tree.hashes(), data);
    let mut rng = StdRng::seed_from_u64(0);
    if let Ok(node) = tree.import_extended_key(&text, &mut rng) {
        let public = !node.is_private();
        assert_eq!(tree.serialize(&node, public).unwrap(), text);
    }

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = tree.parse_extended_key(s);
    }
});
