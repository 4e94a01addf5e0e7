//! Bounds-checked recursive DER tag-length-value decoder.
//!
//! The decoder walks a byte slice record by record. Composite records are
//! decoded again as a fresh slice one level deeper; everything else is kept
//! as a borrowed leaf for the renderer to interpret. Every read is checked
//! against the slice for the current level, so a malformed or truncated
//! certificate produces a [`DecodeError`] and never reads outside the input.
//!
//! Only definite lengths are supported. A length byte of `0x80` (BER
//! indefinite length) is read as a zero length and the cursor carries on,
//! which desynchronizes on genuine indefinite-length input.

use crate::tag::TagKind;
use crate::DecodeError;

/// Default ceiling on composite nesting. X.509 certificates nest roughly
/// ten levels deep.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hard ceiling on composite nesting. Larger `max_depth` settings are
/// clamped to it, which keeps decoding, rendering and dropping a tree
/// within a worker thread's stack.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest composite nesting accepted before failing with
    /// [`DecodeError::MaxDepthExceeded`]. The top-level records are at
    /// depth 1. Values above [`MAX_DEPTH_LIMIT`] are clamped.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// One decoded TLV record.
///
/// `value` borrows the record's content bytes from the input. Children are
/// populated only for composite tags, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'a> {
    pub tag: TagKind,
    pub children: Vec<Node<'a>>,
    pub value: &'a [u8],
}

impl<'a> Node<'a> {
    /// Whether this node's children were decoded from its value.
    pub fn is_composite(&self) -> bool {
        self.tag.is_composite()
    }

    /// Total number of records in this subtree, excluding `self`.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// Decode a DER buffer with the default options.
///
/// The returned root is a synthetic `SEQUENCE` spanning the whole buffer
/// whose children are the top-level records. An empty buffer decodes to a
/// root with no children.
pub fn decode(bytes: &[u8]) -> Result<Node<'_>, DecodeError> {
    decode_with(bytes, &DecodeOptions::default())
}

/// Decode a DER buffer with explicit options.
pub fn decode_with<'a>(bytes: &'a [u8], options: &DecodeOptions) -> Result<Node<'a>, DecodeError> {
    let max_depth = options.max_depth.min(MAX_DEPTH_LIMIT);
    let children = decode_level(bytes, 0, 1, max_depth).map_err(|e| {
        tracing::debug!(error = %e, len = bytes.len(), "certificate structure decode failed");
        e
    })?;
    let root = Node {
        tag: TagKind::Sequence,
        children,
        value: bytes,
    };
    tracing::trace!(
        top_level = root.children.len(),
        records = root.descendant_count(),
        "decoded certificate structure"
    );
    Ok(root)
}

/// Decode every record in `buf`, which starts at absolute offset `base` in
/// the top-level input. Records found here are at nesting `depth`.
fn decode_level<'a>(
    buf: &'a [u8],
    base: usize,
    depth: usize,
    max_depth: usize,
) -> Result<Vec<Node<'a>>, DecodeError> {
    let mut nodes = Vec::new();
    let mut i = 0;
    while i < buf.len() {
        if depth > max_depth {
            return Err(DecodeError::MaxDepthExceeded { max_depth });
        }
        let tag_byte = *buf
            .get(i)
            .ok_or(DecodeError::UnexpectedEnd { offset: base + i })?;
        let tag = TagKind::from_byte(tag_byte);
        i += 1;

        let (length, header_len) = read_length(buf, i, base)?;
        i += header_len;

        let value = i
            .checked_add(length)
            .and_then(|end| buf.get(i..end))
            .ok_or(DecodeError::TruncatedValue {
                offset: base + i,
                length,
            })?;

        let children = if tag.is_composite() {
            decode_level(value, base + i, depth + 1, max_depth)?
        } else {
            Vec::new()
        };
        i += length;

        nodes.push(Node {
            tag,
            children,
            value,
        });
    }
    Ok(nodes)
}

/// Read the length field starting at `i`. Returns `(length, bytes consumed)`.
fn read_length(buf: &[u8], i: usize, base: usize) -> Result<(usize, usize), DecodeError> {
    let first = *buf
        .get(i)
        .ok_or(DecodeError::UnexpectedEnd { offset: base + i })?;

    match first {
        0x00..=0x7F => Ok((usize::from(first), 1)),
        // Indefinite length: read as zero, see module docs.
        0x80 => Ok((0, 1)),
        _ => {
            let num_bytes = usize::from(first & 0x7F);
            let digits = buf
                .get(i + 1..i + 1 + num_bytes)
                .ok_or(DecodeError::UnexpectedEnd {
                    offset: base + buf.len(),
                })?;
            // A length that does not fit in usize cannot fit in the buffer.
            let length = bytes_to_usize(digits).ok_or(DecodeError::TruncatedValue {
                offset: base + i + 1 + num_bytes,
                length: usize::MAX,
            })?;
            Ok((length, 1 + num_bytes))
        }
    }
}

/// Big-endian unsigned integer, or `None` if it overflows `usize`.
fn bytes_to_usize(bytes: &[u8]) -> Option<usize> {
    bytes.iter().try_fold(0usize, |acc, &b| {
        acc.checked_mul(256)?.checked_add(usize::from(b))
    })
}
