//! PEM/base64 <-> DER format conversion.

use crate::util;
use crate::CshashError;
use base64::Engine;
use std::borrow::Cow;

const BEGIN_MARKER: &str = "-----BEGIN CERTIFICATE-----";
const END_MARKER: &str = "-----END CERTIFICATE-----";

/// Encoding of a certificate handed to [`to_der`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// Base64 DER, with or without PEM markers.
    #[default]
    Base64,
    /// PEM `CERTIFICATE` block.
    Pem,
    /// Raw DER bytes.
    Der,
}

/// Bring certificate input of the given format to DER.
///
/// Base64 and PEM share one decoding path; DER is borrowed unchanged.
pub fn to_der(input: &[u8], format: InputFormat) -> Result<Cow<'_, [u8]>, CshashError> {
    match format {
        InputFormat::Der => Ok(Cow::Borrowed(input)),
        InputFormat::Base64 | InputFormat::Pem => pem_to_der(input).map(Cow::Owned),
    }
}

/// Convert DER-encoded certificate bytes to a PEM string.
pub fn der_to_pem(der: &[u8]) -> String {
    format!(
        "{}\n{}\n{}\n",
        BEGIN_MARKER,
        util::base64_wrap(der),
        END_MARKER
    )
}

/// Convert a PEM-encoded or bare base64 certificate to DER bytes.
///
/// When the certificate markers are present only the text between them is
/// used. Dashes and whitespace are stripped before decoding, so wrapped or
/// single-line base64 are both accepted.
pub fn pem_to_der(pem: &[u8]) -> Result<Vec<u8>, CshashError> {
    let text = std::str::from_utf8(pem)
        .map_err(|_| CshashError::PemError("input is not valid UTF-8".into()))?;
    let body = certificate_body(text)?;

    let encoded: String = body
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '\n' | '\r' | '\t'))
        .collect();
    if encoded.is_empty() {
        return Err(CshashError::PemError("no certificate data".into()));
    }

    Ok(base64::engine::general_purpose::STANDARD.decode(encoded)?)
}

fn certificate_body(text: &str) -> Result<&str, CshashError> {
    match (text.find(BEGIN_MARKER), text.find(END_MARKER)) {
        (None, None) => Ok(text),
        (Some(begin), Some(end)) => text
            .get(begin + BEGIN_MARKER.len()..end)
            .ok_or_else(|| CshashError::PemError("END marker precedes BEGIN marker".into())),
        (Some(_), None) => Err(CshashError::PemError(format!("missing {}", END_MARKER))),
        (None, Some(_)) => Err(CshashError::PemError(format!("missing {}", BEGIN_MARKER))),
    }
}
