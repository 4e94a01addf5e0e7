//! DER tag classification.
//!
//! Only the first identifier byte of a TLV record is classified. Tags the
//! fingerprint does not know about keep their raw byte so the legacy binary
//! scheme can still emit it.

/// The DER universal and context-specific tags understood by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    ObjectDescriptor,
    External,
    Real,
    Utf8String,
    PrintableString,
    Ia5String,
    UtcTime,
    GeneralizedTime,
    Sequence,
    Set,
    /// `[0]` EXPLICIT, the TBSCertificate version.
    Version,
    /// `[1]` IMPLICIT issuerUniqueID.
    IssuerUniqueId,
    /// `[2]` IMPLICIT subjectUniqueID.
    SubjectUniqueId,
    /// `[3]` EXPLICIT, the extensions wrapper.
    Extension,
    /// Any other identifier byte.
    Unknown(u8),
}

impl TagKind {
    /// Classify a raw identifier byte.
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x01 => Self::Boolean,
            0x02 => Self::Integer,
            0x03 => Self::BitString,
            0x04 => Self::OctetString,
            0x05 => Self::Null,
            0x06 => Self::ObjectIdentifier,
            0x07 => Self::ObjectDescriptor,
            0x08 => Self::External,
            0x09 => Self::Real,
            0x0C => Self::Utf8String,
            0x13 => Self::PrintableString,
            0x16 => Self::Ia5String,
            0x17 => Self::UtcTime,
            0x18 => Self::GeneralizedTime,
            0x30 => Self::Sequence,
            0x31 => Self::Set,
            0xA0 => Self::Version,
            0xA1 => Self::IssuerUniqueId,
            0xA2 => Self::SubjectUniqueId,
            0xA3 => Self::Extension,
            other => Self::Unknown(other),
        }
    }

    /// The identifier byte this tag was decoded from.
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Boolean => 0x01,
            Self::Integer => 0x02,
            Self::BitString => 0x03,
            Self::OctetString => 0x04,
            Self::Null => 0x05,
            Self::ObjectIdentifier => 0x06,
            Self::ObjectDescriptor => 0x07,
            Self::External => 0x08,
            Self::Real => 0x09,
            Self::Utf8String => 0x0C,
            Self::PrintableString => 0x13,
            Self::Ia5String => 0x16,
            Self::UtcTime => 0x17,
            Self::GeneralizedTime => 0x18,
            Self::Sequence => 0x30,
            Self::Set => 0x31,
            Self::Version => 0xA0,
            Self::IssuerUniqueId => 0xA1,
            Self::SubjectUniqueId => 0xA2,
            Self::Extension => 0xA3,
            Self::Unknown(byte) => byte,
        }
    }

    /// Name used in the canonical structure string.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::BitString => "BIT_STRING",
            Self::OctetString => "OCTET_STRING",
            Self::Null => "NULL",
            Self::ObjectIdentifier => "OBJECT_IDENTIFIER",
            Self::ObjectDescriptor => "OBJECT_DESCRIPTOR",
            Self::External => "EXTERNAL",
            Self::Real => "REAL",
            Self::Utf8String => "UTF8_STRING",
            Self::PrintableString => "PRINTABLE_STRING",
            Self::Ia5String => "IA5_STRING",
            Self::UtcTime => "UTC_TIME",
            Self::GeneralizedTime => "GENERALIZED_TIME",
            Self::Sequence => "SEQUENCE",
            Self::Set => "SET",
            Self::Version => "VERSION",
            Self::IssuerUniqueId => "ISSUER_UNIQUE_ID",
            Self::SubjectUniqueId => "SUBJECT_UNIQUE_ID",
            Self::Extension => "EXTENSION",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// Whether the value bytes of this tag are themselves TLV records.
    ///
    /// `[1]` and `[2]` are IMPLICIT bit strings in X.509, so only the two
    /// EXPLICIT context tags recurse.
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            Self::Sequence | Self::Set | Self::Version | Self::Extension
        )
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_byte_round_trips() {
        for byte in 0..=u8::MAX {
            assert_eq!(TagKind::from_byte(byte).to_byte(), byte);
        }
    }

    #[test]
    fn unknown_bytes_render_as_unknown() {
        assert_eq!(TagKind::from_byte(0x1E).name(), "UNKNOWN");
        assert_eq!(TagKind::from_byte(0x82).name(), "UNKNOWN");
        assert_eq!(TagKind::from_byte(0x82), TagKind::Unknown(0x82));
    }

    #[test]
    fn composite_set_is_fixed() {
        let composites: Vec<u8> = (0..=u8::MAX)
            .filter(|&b| TagKind::from_byte(b).is_composite())
            .collect();
        assert_eq!(composites, vec![0x30, 0x31, 0xA0, 0xA3]);
    }

    #[test]
    fn context_tags_are_named() {
        assert_eq!(TagKind::from_byte(0xA0).to_string(), "VERSION");
        assert_eq!(TagKind::from_byte(0xA1).to_string(), "ISSUER_UNIQUE_ID");
        assert_eq!(TagKind::from_byte(0xA2).to_string(), "SUBJECT_UNIQUE_ID");
        assert_eq!(TagKind::from_byte(0xA3).to_string(), "EXTENSION");
    }
}
