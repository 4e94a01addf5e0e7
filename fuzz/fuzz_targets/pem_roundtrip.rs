#![no_main]

use libfuzzer_sys::fuzz_target;
use cshash_lib::{der_to_pem, pem_to_der, to_der, InputFormat};

fuzz_target!(|data: &[u8]| {
    // Any DER survives a trip through PEM and keeps its fingerprint
    let pem = der_to_pem(data);
    if data.is_empty() {
        assert!(pem_to_der(pem.as_bytes()).is_err());
        return;
    }
    let der_back = pem_to_der(pem.as_bytes()).expect("PEM we wrote must parse");
    assert_eq!(der_back, data, "DER mismatch after roundtrip");
    assert_eq!(
        cshash_lib::fingerprint(data).ok(),
        cshash_lib::fingerprint(&der_back).ok()
    );

    // Arbitrary text through the PEM and base64 path must not panic
    let _ = to_der(data, InputFormat::Pem);
    let _ = to_der(data, InputFormat::Base64);
});
