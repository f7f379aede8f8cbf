//! `data-*` attribute to dataset key conversion.

use indexmap::IndexMap;

/// An element's dataset: camelCase keys to raw string values, in attribute order.
pub type Dataset = IndexMap<String, String>;

/// Convert an attribute name to its `dataset` key.
///
/// Follows the HTML rules: the name is lowercased (HTML parsers lowercase
/// attribute names), the `data-` prefix is removed, and every `-` followed by
/// an ASCII lowercase letter is dropped while the letter is uppercased.
/// Returns `None` for attributes outside the `data-` family.
///
/// ```rust
/// use code_exercise_dom::attribute_to_dataset_key;
///
/// assert_eq!(
///     attribute_to_dataset_key("data-code-exercise-monaco-font-size").as_deref(),
///     Some("codeExerciseMonacoFontSize"),
/// );
/// assert_eq!(attribute_to_dataset_key("class"), None);
/// ```
pub fn attribute_to_dataset_key(name: &str) -> Option<String> {
    let lowered = name.to_ascii_lowercase();
    let rest = lowered.strip_prefix("data-")?;

    let mut key = String::with_capacity(rest.len());
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('-', Some(next)) if next.is_ascii_lowercase() => {
                key.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => key.push(c),
        }
    }
    Some(key)
}
