/*
 * feedback.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Hints panel bound to an exercise's validation results.
 */

//! Hints panel bound to an exercise's validation results.
//!
//! ```text
//! div.spoiler-element
//!   h4                       heading
//!   p                        intro, success text, or a list of hints
//!   span.sr-only[aria-live]  live hint count
//! ```
//!
//! Each validation event re-renders the body and the count from scratch.

use std::rc::{Rc, Weak};

use code_exercise_config::FeedbackText;
use code_exercise_dom::{Document, NodeId, SharedDocument};

use crate::error::{ExerciseError, Result};
use crate::exercise::{ExerciseRef, SubscriptionId, ValidationResult};

pub const PANEL_CLASS: &str = "spoiler-element";
pub const LIVE_COUNT_CLASS: &str = "sr-only";

/// Nodes of one hints panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackPanel {
    pub root: NodeId,
    pub body: NodeId,
    pub live_count: NodeId,
}

/// Build a detached hints panel in its initial state.
pub fn build_panel(doc: &mut Document, text: &FeedbackText) -> Result<FeedbackPanel> {
    let root = doc.create_element("div");
    doc.add_class(root, PANEL_CLASS)?;

    let heading = doc.create_element("h4");
    doc.set_text_content(heading, &text.heading)?;

    let body = doc.create_element("p");
    doc.set_text_content(body, &text.intro)?;

    let live_count = doc.create_element("span");
    doc.add_class(live_count, LIVE_COUNT_CLASS)?;
    doc.set_attribute(live_count, "aria-live", "polite")?;
    doc.set_text_content(live_count, &text.no_hints)?;

    doc.append_children(root, &[heading, body, live_count])?;

    Ok(FeedbackPanel {
        root,
        body,
        live_count,
    })
}

/// Render one validation result into the panel.
pub fn render_validation(
    doc: &mut Document,
    panel: &FeedbackPanel,
    text: &FeedbackText,
    result: &ValidationResult,
) -> Result<()> {
    doc.set_text_content(panel.live_count, &text.count_text(result.errors.len()))?;

    if result.valid {
        return Ok(doc.set_text_content(panel.body, &text.success)?);
    }

    let list = doc.create_element("ul");
    for (position, hint) in result.errors.iter().enumerate() {
        let item = hint_item(doc, text, position + 1, hint)?;
        doc.append_child(list, item)?;
    }
    Ok(doc.replace_children(panel.body, &[list])?)
}

/// `li > details > summary + p` for the 1-based hint `index`.
fn hint_item(doc: &mut Document, text: &FeedbackText, index: usize, hint: &str) -> Result<NodeId> {
    let summary = doc.create_element("summary");
    doc.set_text_content(summary, &text.toggle)?;
    doc.set_attribute(summary, "aria-label", &text.hint_label_text(index))?;

    let content = doc.create_element("p");
    doc.set_text_content(content, hint)?;

    let details = doc.create_element("details");
    doc.append_children(details, &[summary, content])?;

    let item = doc.create_element("li");
    doc.append_child(item, details)?;
    Ok(item)
}

/// Build a panel for `exercise` and subscribe it to validation results.
///
/// The handler holds the document weakly. If the document is gone or busy
/// when a result arrives, that result is skipped.
pub fn bind_feedback(
    document: &SharedDocument,
    exercise: &ExerciseRef,
    text: &FeedbackText,
) -> Result<(FeedbackPanel, SubscriptionId)> {
    let panel = {
        let mut doc = document
            .try_borrow_mut()
            .map_err(|_| ExerciseError::DocumentBusy)?;
        build_panel(&mut doc, text)?
    };

    let weak: Weak<_> = Rc::downgrade(document);
    let text = text.clone();
    let subscription = exercise.on_validate(Box::new(move |result| {
        let Some(document) = weak.upgrade() else {
            return;
        };
        let Ok(mut doc) = document.try_borrow_mut() else {
            tracing::warn!("Document busy, skipping validation render");
            return;
        };
        if let Err(e) = render_validation(&mut doc, &panel, &text, result) {
            tracing::warn!(error = %e, "Failed to render validation result");
        }
    }));

    Ok((panel, subscription))
}
