//! cshash-lib: Certificate structure fingerprints.
//!
//! A structure fingerprint hashes the ASN.1 shape of a DER-encoded X.509
//! certificate (the order and nesting of its tagged fields, plus the OIDs
//! naming its algorithms, attributes and extensions) while ignoring serial
//! numbers, names, dates, keys and signatures. Certificates issued by the
//! same CA software from the same template share a fingerprint.
//!
//! The pipeline is `decode` (bounds-checked TLV walk) → `render` (canonical
//! text) → MD5. MD5 is used for speed; fingerprints cluster certificates,
//! they do not authenticate them.

mod convert;
mod decoder;
mod fingerprint;
mod legacy;
pub mod oid;
mod render;
mod tag;
mod util;

pub use convert::{der_to_pem, pem_to_der, to_der, InputFormat};
pub use decoder::{
    decode, decode_with, DecodeOptions, Node, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT,
};
pub use fingerprint::{fingerprint, fingerprint_with, FingerprintOptions};
pub use legacy::{csf_fingerprint, csf_fingerprint_with, csf_structure};
pub use oid::oid_to_string;
pub use render::{render, render_with, ContentPolicy, RenderOptions, OMITTED};
pub use tag::TagKind;
pub use util::is_pem;

/// Errors from walking a DER buffer.
///
/// Offsets are absolute positions in the buffer handed to [`decode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A tag or length byte lies past the end of the enclosing slice.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd { offset: usize },

    /// A declared length runs past the end of the enclosing slice.
    #[error("value of {length} bytes at offset {offset} overruns its enclosing buffer")]
    TruncatedValue { offset: usize, length: usize },

    /// Composite nesting exceeded the configured ceiling.
    #[error("structure nested deeper than {max_depth} levels")]
    MaxDepthExceeded { max_depth: usize },
}

/// Errors returned by cshash-lib.
#[derive(Debug, thiserror::Error)]
pub enum CshashError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Invalid PEM format: {0}")]
    PemError(String),

    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}
