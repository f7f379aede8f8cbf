//! In-memory slide document tree for code exercises.
//!
//! This crate stands in for the browser DOM that a presentation host would
//! normally hand to the code exercise plugin. It provides an arena-backed
//! [`Document`] of element and text nodes with the handful of operations the
//! plugin relies on: attribute lookup, `dataset` views, descendant queries,
//! child replacement and node relocation.
//!
//! Markup can be loaded with [`parse`] (built on [`quick-xml`]) and written
//! back with [`Document::to_markup`].
//!
//! # Example
//!
//! ```rust
//! use code_exercise_dom::parse;
//!
//! let doc = parse(r#"<section data-code-exercise="" data-code-exercise-type="html">
//!   <pre data-code-exercise-content="">&lt;p&gt;hi&lt;/p&gt;</pre>
//! </section>"#).unwrap();
//!
//! let section = doc.elements_by_tag(doc.root(), "section")[0];
//! let dataset = doc.dataset(section);
//! assert_eq!(dataset.get("codeExerciseType").map(String::as_str), Some("html"));
//!
//! let content = doc.query_attribute(section, "data-code-exercise-content").unwrap();
//! assert_eq!(doc.text_content(content), "<p>hi</p>");
//! ```

pub mod dataset;
pub mod error;
pub mod parser;
pub mod serialize;
pub mod types;

pub use dataset::{Dataset, attribute_to_dataset_key};
pub use error::{DomError, Result};
pub use parser::{parse, parse_into};
pub use types::{Attribute, Document, Element, NodeData, NodeId, SharedDocument};
