//! Markup parser that builds a [`Document`] from well-formed (XHTML-style) slide markup.
//!
//! Whitespace is preserved verbatim: exercise content is whitespace
//! sensitive, so text nodes are never trimmed or dropped. Several top-level
//! nodes are allowed since slide decks are usually fragments.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, BytesText, Event};

use crate::error::{DomError, Result};
use crate::types::{Document, NodeId};

/// Parse markup into a fresh document.
///
/// # Example
///
/// ```rust
/// use code_exercise_dom::parse;
///
/// let doc = parse("<section><h2>Title</h2></section>").unwrap();
/// let h2 = doc.elements_by_tag(doc.root(), "h2")[0];
/// assert_eq!(doc.text_content(h2), "Title");
/// ```
///
/// # Errors
///
/// Returns an error if the markup is malformed or elements are left open.
pub fn parse(content: &str) -> Result<Document> {
    let mut doc = Document::new();
    let root = doc.root();
    parse_into(&mut doc, root, content)?;
    Ok(doc)
}

/// Parse markup and append the resulting nodes under `parent`.
///
/// Returns the top-level nodes that were appended.
pub fn parse_into(doc: &mut Document, parent: NodeId, content: &str) -> Result<Vec<NodeId>> {
    let mut parser = MarkupParser::new(content, doc, parent);
    parser.parse()
}

/// Internal parser state.
struct MarkupParser<'a> {
    reader: Reader<&'a [u8]>,

    doc: &'a mut Document,

    /// Node that receives top-level content.
    parent: NodeId,

    /// Open elements, innermost last.
    stack: Vec<NodeId>,

    /// Top-level nodes appended under `parent`.
    top_level: Vec<NodeId>,
}

impl<'a> MarkupParser<'a> {
    fn new(source: &'a str, doc: &'a mut Document, parent: NodeId) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        reader.config_mut().check_end_names = false;

        Self {
            reader,
            doc,
            parent,
            stack: Vec::new(),
            top_level: Vec::new(),
        }
    }

    fn parse(&mut self) -> Result<Vec<NodeId>> {
        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    let id = self.handle_element(&e)?;
                    self.stack.push(id);
                }
                Ok(Event::End(e)) => {
                    let found = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    let open = self
                        .stack
                        .pop()
                        .ok_or_else(|| DomError::UnexpectedEndTag(found.clone()))?;
                    let expected = self.doc.tag_name(open).unwrap_or_default();
                    if expected != found {
                        return Err(DomError::MismatchedEndTag {
                            expected: expected.to_string(),
                            found,
                        });
                    }
                }
                Ok(Event::Empty(e)) => {
                    self.handle_element(&e)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(&e)?;
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).to_string();
                    self.insert_text(&text)?;
                }
                Ok(Event::Eof) => break,
                // Comments, processing instructions, declarations and DOCTYPE carry no content
                Ok(_) => {}
                Err(e) => {
                    return Err(DomError::Syntax {
                        message: e.to_string(),
                        position: self.reader.error_position(),
                    });
                }
            }
        }

        if let Some(&open) = self.stack.last() {
            let name = self.doc.tag_name(open).unwrap_or_default().to_string();
            return Err(DomError::UnclosedElement(name));
        }

        Ok(std::mem::take(&mut self.top_level))
    }

    fn current_parent(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(self.parent)
    }

    fn attach(&mut self, id: NodeId) -> Result<()> {
        let parent = self.current_parent();
        self.doc.append_child(parent, id)?;
        if self.stack.is_empty() {
            self.top_level.push(id);
        }
        Ok(())
    }

    fn handle_element(&mut self, e: &BytesStart<'_>) -> Result<NodeId> {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let id = self.doc.create_element(&name);

        // Valueless attributes (`<section data-code-exercise>`) read as empty values
        for attr_result in e.html_attributes() {
            let attr = attr_result.map_err(|err| DomError::Syntax {
                message: format!("Invalid attribute: {}", err),
                position: self.reader.buffer_position(),
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value().map_err(|err| DomError::Syntax {
                message: format!("Invalid attribute value: {}", err),
                position: self.reader.buffer_position(),
            })?;
            self.doc.set_attribute(id, &key, &value)?;
        }

        self.attach(id)?;
        Ok(id)
    }

    fn handle_text(&mut self, e: &BytesText<'_>) -> Result<()> {
        let text = e.unescape().map_err(|err| DomError::Syntax {
            message: format!("Invalid text content: {}", err),
            position: self.reader.buffer_position(),
        })?;
        self.insert_text(&text)
    }

    fn insert_text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let id = self.doc.create_text(text);
        self.attach(id)
    }
}
