#![no_main]

use libfuzzer_sys::fuzz_target;
use cshash_lib::{ContentPolicy, FingerprintOptions, RenderOptions};

fuzz_target!(|data: &[u8]| {
    // The decoder must never panic, regardless of input.
    if let Ok(root) = cshash_lib::decode(data) {
        // Pretty output is the compact output plus whitespace
        for policy in [ContentPolicy::OidOnly, ContentPolicy::Extensions] {
            let compact = cshash_lib::render_with(&root, RenderOptions { pretty: false, policy });
            let pretty = cshash_lib::render_with(&root, RenderOptions { pretty: true, policy });
            let stripped: String = pretty.chars().filter(|c| !c.is_whitespace()).collect();
            assert_eq!(stripped, compact, "pretty output diverged");

            let options = FingerprintOptions { policy, ..FingerprintOptions::default() };
            let digest = cshash_lib::fingerprint_with(data, &options).expect("decoded twice");
            assert_eq!(digest.len(), 32);
        }
        let _ = cshash_lib::csf_fingerprint(data).expect("decoded twice");
    } else {
        assert!(cshash_lib::fingerprint(data).is_err());
        assert!(cshash_lib::csf_fingerprint(data).is_err());
    }
});
