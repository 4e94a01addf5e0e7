//! Canonical structure rendering.
//!
//! A decoded tree is rendered as nested `{NAME:value,...}` groups. Tag
//! names come from the tag table, composites recurse, OIDs are emitted in
//! dotted-decimal form and every other leaf collapses to a placeholder
//! unless the [`ContentPolicy`] says otherwise. Children are emitted in
//! encounter order, so the output is a pure function of the input bytes.
//!
//! Compact and pretty output are produced by the same writer; the pretty
//! form only adds whitespace, which never appears inside a value.

use crate::decoder::Node;
use crate::oid;
use crate::tag::TagKind;

/// Rendered in place of any leaf content the policy discards.
pub const OMITTED: &str = "\u{2205}";

const INDENT: &str = "  ";

/// Which leaf content survives into the canonical string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentPolicy {
    /// Keep OID values only.
    #[default]
    OidOnly,
    /// Also keep BOOLEAN values, mark NULLs, and keep the value of the
    /// keyUsage, extKeyUsage and basicConstraints extensions.
    Extensions,
}

impl ContentPolicy {
    /// Short name used in logs and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::OidOnly => "oid-only",
            Self::Extensions => "extensions",
        }
    }
}

/// Rendering settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Indent one entry per line instead of the compact hash input.
    pub pretty: bool,
    pub policy: ContentPolicy,
}

/// Render a node with the OID-only policy.
pub fn render(node: &Node<'_>, pretty: bool) -> String {
    render_with(
        node,
        RenderOptions {
            pretty,
            policy: ContentPolicy::OidOnly,
        },
    )
}

/// Render a node with explicit options.
///
/// A composite node renders as its group of children; a leaf renders as
/// its (possibly omitted) quoted value.
pub fn render_with(node: &Node<'_>, options: RenderOptions) -> String {
    let mut writer = Writer {
        out: String::new(),
        pretty: options.pretty,
        policy: options.policy,
    };
    if node.is_composite() {
        writer.group(&node.children, 0);
    } else {
        let mut retain_next = false;
        writer.leaf(node, &mut retain_next);
    }
    writer.out
}

struct Writer {
    out: String,
    pretty: bool,
    policy: ContentPolicy,
}

impl Writer {
    fn group(&mut self, children: &[Node<'_>], level: usize) {
        self.out.push('{');
        if children.is_empty() {
            self.out.push('}');
            return;
        }

        // Scoped to one sibling group, like the extension it refers to.
        let mut retain_next = false;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline(level + 1);
            self.out.push_str(child.tag.name());
            self.out.push(':');
            if self.pretty {
                self.out.push(' ');
            }
            if child.is_composite() {
                self.group(&child.children, level + 1);
            } else {
                self.leaf(child, &mut retain_next);
            }
        }
        self.newline(level);
        self.out.push('}');
    }

    fn leaf(&mut self, node: &Node<'_>, retain_next: &mut bool) {
        let content = match (node.tag, self.policy) {
            (TagKind::ObjectIdentifier, policy) => {
                let dotted = oid::oid_to_string(node.value);
                if policy == ContentPolicy::Extensions && oid::retains_extension_value(&dotted) {
                    *retain_next = true;
                }
                dotted
            }
            (TagKind::OctetString | TagKind::BitString, ContentPolicy::Extensions)
                if *retain_next =>
            {
                *retain_next = false;
                hex::encode_upper(node.value)
            }
            (TagKind::Boolean, ContentPolicy::Extensions) => hex::encode_upper(node.value),
            (TagKind::Null, ContentPolicy::Extensions) => String::new(),
            _ => OMITTED.to_string(),
        };
        self.out.push('"');
        self.out.push_str(&content);
        self.out.push('"');
    }

    fn newline(&mut self, level: usize) {
        if self.pretty {
            self.out.push('\n');
            for _ in 0..level {
                self.out.push_str(INDENT);
            }
        }
    }
}
