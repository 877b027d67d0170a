//! Scene node tree — the SVG document is assembled bottom-up as a tree
//! of nodes and serialized top-down into the final string.
//!
//! A node owns an opening marker, the matching closing marker derived
//! from it, and its children; leaves carry raw markup text and nothing
//! else. Nodes are built complete and never patched after assembly —
//! variants that need different attributes (e.g. an untranslated row
//! group in split mode) request them at construction.

/// A virtual SVG/XML node.
#[derive(Debug, Clone)]
pub(super) struct SvgNode {
    opening: String,
    closing: Option<String>,
    children: Vec<SvgNode>,
}

impl SvgNode {
    /// Container element. The closing tag is derived from the opening
    /// marker; an opening marker with no parsable tag name is a
    /// programming error and fails loudly.
    pub(super) fn elm(opening: impl Into<String>) -> Self {
        let opening = opening.into();
        let tag = match parse_tag_name(&opening) {
            Some(tag) => tag,
            None => panic!("unable to parse the opening tag: {opening}"),
        };
        Self {
            closing: Some(format!("</{tag}>")),
            opening,
            children: Vec::new(),
        }
    }

    /// Leaf node holding raw markup (or any text) verbatim.
    pub(super) fn text(content: impl Into<String>) -> Self {
        Self {
            opening: content.into(),
            closing: None,
            children: Vec::new(),
        }
    }

    /// Append a child node. Leaves cannot hold children.
    pub(super) fn push(&mut self, child: SvgNode) {
        assert!(
            self.closing.is_some(),
            "can't push a child into a self-closing node"
        );
        self.children.push(child);
    }

    /// Append a raw markup leaf.
    pub(super) fn push_text(&mut self, content: impl Into<String>) {
        self.push(SvgNode::text(content));
    }

    /// Builder-style variant of [`push`](Self::push).
    pub(super) fn child(mut self, child: SvgNode) -> Self {
        self.push(child);
        self
    }

    /// Serialize the subtree, two spaces of indentation per level.
    pub(super) fn serialize(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out, 0);
        out
    }

    fn write_into(&self, out: &mut String, indent: usize) {
        push_indent(out, indent);
        out.push_str(&self.opening);
        out.push('\n');

        for child in &self.children {
            child.write_into(out, indent + 1);
        }

        if let Some(ref closing) = self.closing {
            push_indent(out, indent);
            out.push_str(closing);
            out.push('\n');
        }
    }
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
    out.push(' ');
}

/// Extract the element name from an opening marker: the characters after
/// `<` up to the first space or `>`.
fn parse_tag_name(opening: &str) -> Option<&str> {
    let rest = opening.strip_prefix('<')?;
    let end = rest.find([' ', '>']).unwrap_or(rest.len());
    let tag = &rest[..end];
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derives_closing_tag_from_opening_marker() {
        let node = SvgNode::elm(r#"<g class="row" transform="translate(0 58)">"#);
        assert_eq!(
            node.serialize(),
            " <g class=\"row\" transform=\"translate(0 58)\">\n </g>\n"
        );
    }

    #[test]
    fn serializes_nested_children_with_indentation() {
        let mut svg = SvgNode::elm("<svg>");
        let mut group = SvgNode::elm("<g>");
        group.push_text(r#"<line x1="0"/>"#);
        svg.push(group);
        svg.push_text("leaf");

        assert_eq!(
            svg.serialize(),
            " <svg>\n   <g>\n     <line x1=\"0\"/>\n   </g>\n   leaf\n </svg>\n"
        );
    }

    #[test]
    #[should_panic(expected = "unable to parse the opening tag")]
    fn rejects_unparsable_opening_marker() {
        let _ = SvgNode::elm("not a tag");
    }

    #[test]
    #[should_panic(expected = "can't push a child")]
    fn rejects_children_on_leaves() {
        let mut leaf = SvgNode::text("<rect/>");
        leaf.push(SvgNode::text("child"));
    }
}
