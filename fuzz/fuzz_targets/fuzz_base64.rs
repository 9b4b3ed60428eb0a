#![no_main]

use hdk_crypto::base64;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding is strict, so anything it accepts re-encodes identically.
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(bytes) = base64::decode(s) {
            assert_eq!(base64::encode(&bytes), s);
        }
    }

    let encoded = base64::encode(data);
    assert_eq!(encoded.len() % 4, 0);
    assert_eq!(base64::decode(&encoded).unwrap(), data);
});
