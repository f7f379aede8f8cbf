/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Slide declarations from slide attributes.
 */

//! Slide declarations from slide attributes.
//!
//! Resolution is read-only: it inspects each slide's dataset and marked
//! children and produces a [`SlideDeclaration`] without touching the
//! document. The whole deck is resolved before anything is materialized, so
//! a single bad slide aborts the pass with the deck still intact.

use code_exercise_config::{ConfigError, MergedConfig, PluginOptions, parse_dataset};
use code_exercise_dom::{Document, NodeId};
use serde_json::Value;

use crate::error::{ExerciseError, Result};
use crate::exercise::ExerciseKind;

/// Read-only view over one exercise slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideDeclaration {
    pub slide: NodeId,
    /// Position of the slide in the host's slide list.
    pub index: usize,
    pub content: String,
    pub kind: ExerciseKind,
    pub id: Option<String>,
    pub title: Option<String>,
    pub preview: bool,
    /// Marked node to relocate into the exercise container.
    pub custom_content: Option<NodeId>,
    /// Effective editor configuration for this slide.
    pub editor_options: Value,
}

/// Whether the slide carries the bare marker key. The value is ignored.
pub fn is_exercise_slide(doc: &Document, slide: NodeId, options: &PluginOptions) -> bool {
    doc.dataset(slide).contains_key(&options.data_set_prefix)
}

/// `true` only for a case-insensitive exact `"true"`.
pub fn decode_preview(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

/// Remove exactly one leading `\n`.
pub fn strip_leading_newline(text: &str) -> &str {
    text.strip_prefix('\n').unwrap_or(text)
}

/// Resolve one exercise slide.
///
/// The caller is expected to have checked [`is_exercise_slide`].
pub fn resolve_slide(
    doc: &Document,
    slide: NodeId,
    index: usize,
    options: &PluginOptions,
) -> Result<SlideDeclaration> {
    let dataset = doc.dataset(slide);
    let declared = |suffix: &str| dataset.get(&options.dataset_key(suffix)).cloned();

    let exercise_type = declared("Type").unwrap_or_else(|| options.exercise_type.clone());
    let kind = exercise_type
        .parse::<ExerciseKind>()
        .map_err(|exercise_type| ExerciseError::UnsupportedType {
            exercise_type,
            slide_index: index,
        })?;

    let content = match doc.query_attribute(slide, &options.content_attribute()) {
        Some(node) => strip_leading_newline(&doc.text_content(node)).to_string(),
        None => {
            tracing::debug!(slide = index, "No content element, starting empty");
            String::new()
        }
    };

    let preview_raw = declared("Preview").unwrap_or_else(|| options.show_preview.clone());

    let host_editor = Value::Object(options.monaco_editor_options.clone());
    let slide_editor = Value::Object(parse_dataset(&dataset, &options.editor_namespace()));
    let editor_options = match MergedConfig::new(vec![&host_editor, &slide_editor]).materialize() {
        Ok(merged) => merged,
        Err(err @ ConfigError::NestingTooDeep { .. }) => {
            tracing::warn!(slide = index, error = %err, "Ignoring slide editor options");
            MergedConfig::new(vec![&host_editor]).materialize()?
        }
        Err(err) => return Err(err.into()),
    };

    Ok(SlideDeclaration {
        slide,
        index,
        content,
        kind,
        id: declared("Id"),
        title: declared("Title"),
        preview: decode_preview(&preview_raw),
        custom_content: doc.query_attribute(slide, &options.custom_content_attribute()),
        editor_options,
    })
}

/// Resolve every exercise slide in presentation order.
///
/// Fails on the first slide declaring an unsupported type.
pub fn resolve_slides(
    doc: &Document,
    slides: &[NodeId],
    options: &PluginOptions,
) -> Result<Vec<SlideDeclaration>> {
    slides
        .iter()
        .enumerate()
        .filter(|&(_, &slide)| is_exercise_slide(doc, slide, options))
        .map(|(index, &slide)| resolve_slide(doc, slide, index, options))
        .collect()
}
