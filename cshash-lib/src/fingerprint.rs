//! Structure fingerprint (digest) computation.

use crate::decoder::{self, DecodeOptions};
use crate::render::{self, ContentPolicy, RenderOptions};
use crate::DecodeError;
use digest::Digest;

/// Settings for [`fingerprint_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FingerprintOptions {
    pub decode: DecodeOptions,
    pub policy: ContentPolicy,
}

/// Compute the structure fingerprint of DER-encoded certificate bytes.
///
/// Returns the lowercase hex MD5 of the compact OID-only rendering
/// (32 characters). Decode failures are returned as-is; there is no
/// fallback digest.
pub fn fingerprint(der_bytes: &[u8]) -> Result<String, DecodeError> {
    fingerprint_with(der_bytes, &FingerprintOptions::default())
}

/// Compute the structure fingerprint with explicit options.
pub fn fingerprint_with(
    der_bytes: &[u8],
    options: &FingerprintOptions,
) -> Result<String, DecodeError> {
    let root = decoder::decode_with(der_bytes, &options.decode)?;
    let canonical = render::render_with(
        &root,
        RenderOptions {
            pretty: false,
            policy: options.policy,
        },
    );
    let digest = md5_hex(canonical.as_bytes());
    tracing::debug!(policy = options.policy.name(), %digest, "computed structure fingerprint");
    Ok(digest)
}

/// Lowercase hex MD5 of `data`.
pub(crate) fn md5_hex(data: &[u8]) -> String {
    hex::encode(md5::Md5::digest(data))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MINIMAL: [u8; 8] = [0x30, 0x06, 0x02, 0x01, 0x05, 0x06, 0x01, 0x2A];

    #[test]
    fn minimal_sequence_digest() {
        // md5("{SEQUENCE:{INTEGER:\"∅\",OBJECT_IDENTIFIER:\"1.2\"}}")
        assert_eq!(
            fingerprint(&MINIMAL).unwrap(),
            "9e78224e1a395da1893be7ac39ecb742"
        );
    }

    #[test]
    fn digest_is_the_md5_of_the_compact_rendering() {
        let root = decoder::decode(&MINIMAL).unwrap();
        let expected = md5_hex(render::render(&root, false).as_bytes());
        assert_eq!(fingerprint(&MINIMAL).unwrap(), expected);
    }

    #[test]
    fn empty_input_hashes_empty_group() {
        // md5("{}")
        assert_eq!(fingerprint(&[]).unwrap(), "99914b932bd37a50b983c5e7c90ae93b");
    }

    #[test]
    fn digest_shape() {
        let fp = fingerprint(&MINIMAL).unwrap();
        assert_eq!(fp.len(), 32);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn decode_errors_propagate() {
        assert_eq!(
            fingerprint(&[0x30, 0x05, 0x02]).unwrap_err(),
            DecodeError::TruncatedValue {
                offset: 2,
                length: 5
            }
        );
    }

    #[test]
    fn policy_changes_the_digest_only_when_content_is_kept() {
        let extensions = FingerprintOptions {
            policy: ContentPolicy::Extensions,
            ..FingerprintOptions::default()
        };
        // No BOOLEAN, NULL or selected extension: both policies agree.
        assert_eq!(
            fingerprint_with(&MINIMAL, &extensions).unwrap(),
            fingerprint(&MINIMAL).unwrap()
        );

        let with_bool = [0x30, 0x03, 0x01, 0x01, 0xFF];
        assert_ne!(
            fingerprint_with(&with_bool, &extensions).unwrap(),
            fingerprint(&with_bool).unwrap()
        );
    }
}
