#![no_main]

use hdk_types::DerivationPath;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(path) = s.parse::<DerivationPath>() {
            let reparsed: DerivationPath = path.to_string().parse().unwrap();
            assert_eq!(reparsed, path);
        }
    }
});
