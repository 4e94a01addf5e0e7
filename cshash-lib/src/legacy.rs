//! Legacy binary structure fingerprint ("csf").
//!
//! The earlier scheme hashes raw bytes instead of a text rendering: the tag
//! byte of every record, the raw content of every OID, and the raw value of
//! the first OCTET STRING or BIT STRING following one of a handful of
//! extension OIDs in the same sibling group. Digests are not comparable
//! with [`fingerprint`](crate::fingerprint).

use crate::decoder::{self, DecodeOptions, Node};
use crate::fingerprint::md5_hex;
use crate::oid::LEGACY_RETAINED;
use crate::tag::TagKind;
use crate::DecodeError;

/// Binary structure of a decoded node's children.
pub fn csf_structure(node: &Node<'_>) -> Vec<u8> {
    let mut out = Vec::new();
    write_group(&node.children, &mut out);
    out
}

/// Lowercase hex MD5 of [`csf_structure`] for DER-encoded bytes.
pub fn csf_fingerprint(der_bytes: &[u8]) -> Result<String, DecodeError> {
    csf_fingerprint_with(der_bytes, &DecodeOptions::default())
}

/// [`csf_fingerprint`] with explicit decoder options.
pub fn csf_fingerprint_with(
    der_bytes: &[u8],
    options: &DecodeOptions,
) -> Result<String, DecodeError> {
    let root = decoder::decode_with(der_bytes, options)?;
    Ok(md5_hex(&csf_structure(&root)))
}

fn write_group(children: &[Node<'_>], out: &mut Vec<u8>) {
    let mut retain_next = false;
    for child in children {
        out.push(child.tag.to_byte());
        match child.tag {
            tag if tag.is_composite() => write_group(&child.children, out),
            TagKind::ObjectIdentifier => {
                out.extend_from_slice(child.value);
                if LEGACY_RETAINED.iter().any(|oid| *oid == child.value) {
                    retain_next = true;
                }
            }
            TagKind::OctetString | TagKind::BitString if retain_next => {
                out.extend_from_slice(child.value);
                retain_next = false;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn minimal_sequence() {
        let der = [0x30, 0x06, 0x02, 0x01, 0x05, 0x06, 0x01, 0x2A];
        let root = decoder::decode(&der).unwrap();
        assert_eq!(csf_structure(&root), vec![0x30, 0x02, 0x06, 0x2A]);
        assert_eq!(
            csf_fingerprint(&der).unwrap(),
            "e492e8d0eda2f3015a9802c1beda5203"
        );
    }

    #[test]
    fn retained_extension_value() {
        // SEQUENCE { OID cRLDistributionPoints, OCTET STRING AB, OCTET STRING CD }
        let der = [
            0x30, 0x0B, 0x06, 0x03, 0x55, 0x1D, 0x1F, 0x04, 0x01, 0xAB, 0x04, 0x01, 0xCD,
        ];
        let root = decoder::decode(&der).unwrap();
        assert_eq!(
            csf_structure(&root),
            vec![0x30, 0x06, 0x55, 0x1D, 0x1F, 0x04, 0xAB, 0x04]
        );
    }

    #[test]
    fn unknown_tags_keep_their_byte() {
        let root = decoder::decode(&[0x82, 0x01, 0x61]).unwrap();
        assert_eq!(csf_structure(&root), vec![0x82]);
    }

    #[test]
    fn errors_propagate() {
        assert!(csf_fingerprint(&[0x30]).is_err());
    }
}
