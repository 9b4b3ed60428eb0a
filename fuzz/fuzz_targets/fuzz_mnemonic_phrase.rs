#![no_main]

use std::sync::OnceLock;

use hdk_crypto::{HashEngine, MnemonicCodec, Wordlist};
use libfuzzer_sys::fuzz_target;

struct Setup {
    codec: MnemonicCodec,
    wordlist: Wordlist,
}

fn setup() -> &'static Setup {
    static SETUP: OnceLock<Setup> = OnceLock::new();
    SETUP.get_or_init(|| Setup {
        codec: MnemonicCodec::new(HashEngine::standard()),
        wordlist: Wordlist::from_words(bip39::Language::English.word_list().iter().copied())
            .expect("English word list has 2048 words"),
    })
}

fuzz_target!(|data: &[u8]| {
    let Setup { codec, wordlist } = setup();

    if let Ok(phrase) = std::str::from_utf8(data) {
        if let Ok(entropy) = codec.parse_phrase(wordlist, phrase) {
            let indices = codec.entropy_to_indices(&entropy).unwrap();
            assert_eq!(indices, wordlist.phrase_to_indices(phrase).unwrap());
        }
    }

    // Pairs of bytes as word indices.
    let indices: Vec<u16> = data
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]) & 0x07ff)
        .collect();
    if let Ok(valid) = codec.check_checksum(&indices) {
        assert_eq!(valid, codec.indices_to_entropy(&indices).is_ok());
    }
});
