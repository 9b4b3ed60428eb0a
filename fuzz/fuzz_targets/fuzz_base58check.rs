#![no_main]

use std::sync::OnceLock;

use hdk_crypto::{base58, HashEngine};
use libfuzzer_sys::fuzz_target;

fn engine() -> &'static HashEngine {
    static ENGINE: OnceLock<HashEngine> = OnceLock::new();
    ENGINE.get_or_init(HashEngine::standard)
}

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must decode or fail cleanly.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = base58::decode(s);
        if let Ok(payload) = base58::decode_check(engine(), s) {
            assert_eq!(base58::encode_check(engine(), &payload), s);
        }
    }

    // Arbitrary payloads roundtrip.
    let plain = base58::encode(data);
    assert_eq!(base58::decode(&plain).unwrap(), data);
    let checked = base58::encode_check(engine(), data);
    assert_eq!(base58::decode_check(engine(), &checked).unwrap(), data);
});
