//! Object identifier decoding and the OIDs the content policies single out.
//!
//! OID content bytes (X.690 Section 8.19) are a sequence of base-128
//! sub-identifiers, high bit set on every byte but the last of each. The
//! first sub-identifier packs the first two arcs as `first * 40 + second`.

// ── Extensions whose values the `Extensions` content policy retains ──────

pub const EXT_KEY_USAGE: &str = "2.5.29.15";
pub const EXT_EXTENDED_KEY_USAGE: &str = "2.5.29.37";
pub const EXT_BASIC_CONSTRAINTS: &str = "2.5.29.19";

// ── Additional extensions retained by the legacy binary scheme ───────────

pub const EXT_AUTHORITY_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.1";
pub const EXT_CERTIFICATE_POLICIES: &str = "2.5.29.32";
pub const EXT_CRL_DISTRIBUTION_POINTS: &str = "2.5.29.31";

/// Raw DER content of every OID the legacy binary scheme retains, in the
/// same order as the dotted constants above.
pub(crate) const LEGACY_RETAINED: [&[u8]; 6] = [
    &[0x55, 0x1D, 0x0F],
    &[0x55, 0x1D, 0x25],
    &[0x55, 0x1D, 0x13],
    &[0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x01, 0x01],
    &[0x55, 0x1D, 0x20],
    &[0x55, 0x1D, 0x1F],
];

/// Whether the `Extensions` policy keeps the value following this OID.
pub(crate) fn retains_extension_value(dotted: &str) -> bool {
    matches!(
        dotted,
        EXT_KEY_USAGE | EXT_EXTENDED_KEY_USAGE | EXT_BASIC_CONSTRAINTS
    )
}

/// Decode DER OID content bytes into dotted-decimal notation.
///
/// Never fails: an empty input yields an empty string, an unterminated
/// trailing sub-identifier is dropped, and an arc too large for `u128`
/// makes the whole OID fall back to uppercase hex.
pub fn oid_to_string(bytes: &[u8]) -> String {
    let mut arcs: Vec<u128> = Vec::new();
    let mut value: u128 = 0;
    for &byte in bytes {
        value = match value
            .checked_mul(128)
            .and_then(|v| v.checked_add(u128::from(byte & 0x7F)))
        {
            Some(v) => v,
            None => return hex::encode_upper(bytes),
        };
        if byte & 0x80 == 0 {
            arcs.push(value);
            value = 0;
        }
    }

    let Some((&first, rest)) = arcs.split_first() else {
        return String::new();
    };
    let (head, second) = if first < 80 {
        (first / 40, first % 40)
    } else {
        (2, first - 80)
    };

    let mut out = format!("{}.{}", head, second);
    for arc in rest {
        out.push('.');
        out.push_str(&arc.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authority_info_access() {
        let der = [0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x01, 0x01];
        assert_eq!(oid_to_string(&der), EXT_AUTHORITY_INFO_ACCESS);
    }

    #[test]
    fn multi_byte_arcs() {
        // sha256WithRSAEncryption
        let der = [0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0B];
        assert_eq!(oid_to_string(&der), "1.2.840.113549.1.1.11");
    }

    #[test]
    fn short_oids() {
        assert_eq!(oid_to_string(&[0x2A]), "1.2");
        assert_eq!(oid_to_string(&[0x55, 0x1D, 0x0F]), EXT_KEY_USAGE);
        assert_eq!(oid_to_string(&[0x00]), "0.0");
    }

    #[test]
    fn joint_iso_itu_large_second_arc() {
        // 2.999.3: first sub-identifier is 999 + 80 = 1079 = 0x88 0x37
        assert_eq!(oid_to_string(&[0x88, 0x37, 0x03]), "2.999.3");
    }

    #[test]
    fn single_byte_first_arc_at_80_and_above() {
        // 120 = 80 + 40, so the root arc is 2, not 3
        assert_eq!(oid_to_string(&[0x78]), "2.40");
        assert_eq!(oid_to_string(&[0x50, 0x01]), "2.0.1");
        assert_eq!(oid_to_string(&[0x4F]), "1.39");
    }

    #[test]
    fn uuid_sized_arc() {
        // 2.25.<2^100>: 2^100 is 4 * 128^14
        let mut der = vec![0x69];
        der.push(0x80 | 0x04);
        der.extend(std::iter::repeat(0x80).take(13));
        der.push(0x00);
        assert_eq!(
            oid_to_string(&der),
            format!("2.25.{}", 1u128 << 100)
        );
    }

    #[test]
    fn overflowing_arc_falls_back_to_hex() {
        let mut der = vec![0x2A];
        der.extend(std::iter::repeat(0xFF).take(20));
        der.push(0x7F);
        let rendered = oid_to_string(&der);
        assert_eq!(rendered, hex::encode_upper(&der));
    }

    #[test]
    fn empty_and_unterminated() {
        assert_eq!(oid_to_string(&[]), "");
        assert_eq!(oid_to_string(&[0x2A, 0x86]), "1.2");
        assert_eq!(oid_to_string(&[0x86]), "");
    }

    #[test]
    fn legacy_table_matches_dotted_constants() {
        let dotted: Vec<String> = LEGACY_RETAINED.iter().map(|b| oid_to_string(b)).collect();
        assert_eq!(
            dotted,
            vec![
                EXT_KEY_USAGE,
                EXT_EXTENDED_KEY_USAGE,
                EXT_BASIC_CONSTRAINTS,
                EXT_AUTHORITY_INFO_ACCESS,
                EXT_CERTIFICATE_POLICIES,
                EXT_CRL_DISTRIBUTION_POINTS,
            ]
        );
    }

    #[test]
    fn extension_policy_selection() {
        assert!(retains_extension_value(EXT_KEY_USAGE));
        assert!(retains_extension_value(EXT_BASIC_CONSTRAINTS));
        assert!(!retains_extension_value(EXT_AUTHORITY_INFO_ACCESS));
        assert!(!retains_extension_value("2.5.29.17"));
    }
}
