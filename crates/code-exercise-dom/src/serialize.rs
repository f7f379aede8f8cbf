//! Writing a [`Document`] back to markup.

use quick_xml::escape::escape;

use crate::types::{Document, NodeData, NodeId};

/// HTML void elements, written as self-closing tags.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

impl Document {
    /// Serialize the whole document (the root's children).
    pub fn to_markup(&self) -> String {
        self.inner_markup(self.root())
    }

    /// Serialize a node including its own tag.
    pub fn outer_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize a node's children.
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            NodeData::Document => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeData::Text(text) => out.push_str(&escape(text.as_str())),
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for attr in &element.attributes {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&escape(attr.value.as_str()));
                    out.push('"');
                }

                let children = self.children(id);
                let is_void = VOID_ELEMENTS
                    .iter()
                    .any(|v| v.eq_ignore_ascii_case(&element.name));
                if is_void && children.is_empty() {
                    out.push_str("/>");
                    return;
                }

                out.push('>');
                for &child in children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    #[test]
    fn test_serialize_escapes_text_and_attributes() {
        let mut doc = crate::Document::new();
        let root = doc.root();
        let p = doc.create_element("p");
        doc.set_attribute(p, "title", "\"quoted\" & more").unwrap();
        doc.append_child(root, p).unwrap();
        doc.set_text_content(p, "<b>").unwrap();

        assert_eq!(
            doc.to_markup(),
            r#"<p title="&quot;quoted&quot; &amp; more">&lt;b&gt;</p>"#
        );
    }

    #[test]
    fn test_serialize_void_and_empty_elements() {
        let doc = parse("<div><br/><iframe/></div>").unwrap();
        assert_eq!(doc.to_markup(), "<div><br/><iframe></iframe></div>");
    }

    #[test]
    fn test_parse_serialize_is_stable() {
        let source = "<section data-x=\"1\">\n  <pre>a &lt; b</pre>\n</section>";
        let doc = parse(source).unwrap();
        let again = parse(&doc.to_markup()).unwrap();
        assert_eq!(doc.to_markup(), again.to_markup());
        assert_eq!(doc.to_markup(), source);
    }
}
