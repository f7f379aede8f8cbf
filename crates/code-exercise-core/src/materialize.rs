/*
 * materialize.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * DOM scaffold and exercise construction for one slide.
 */

//! DOM scaffold and exercise construction for one slide.
//!
//! The slide's children are replaced by a single container:
//!
//! ```text
//! div.code-exercise
//!   h3                          title, if declared
//!   div.monaco-editor-container editor mount
//!   iframe                      preview, if enabled
//!   div.spoiler-element         hints panel
//!   <custom content>            relocated, if marked
//! ```

use std::rc::Rc;

use code_exercise_config::FeedbackText;
use code_exercise_dom::{NodeId, SharedDocument};

use crate::error::{ExerciseError, Result};
use crate::exercise::{ExerciseCatalog, ExerciseMount, ExerciseRef, SubscriptionId};
use crate::feedback::{FeedbackPanel, bind_feedback};
use crate::resolve::SlideDeclaration;

pub const CONTAINER_CLASS: &str = "code-exercise";
pub const EDITOR_CLASS: &str = "monaco-editor-container";

/// Nodes and bindings produced for one slide.
#[derive(Clone)]
pub struct MaterializedExercise {
    pub container: NodeId,
    pub editor: NodeId,
    pub preview: Option<NodeId>,
    pub panel: FeedbackPanel,
    /// Subscription of the hints panel on the exercise.
    pub subscription: SubscriptionId,
    pub exercise: ExerciseRef,
}

impl std::fmt::Debug for MaterializedExercise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterializedExercise")
            .field("container", &self.container)
            .field("editor", &self.editor)
            .field("preview", &self.preview)
            .field("panel", &self.panel)
            .field("subscription", &self.subscription)
            .field("kind", &self.exercise.kind())
            .finish()
    }
}

/// Replace the slide's children with the exercise scaffold and build the exercise.
///
/// The document is not borrowed while the builder runs.
pub fn materialize(
    document: &SharedDocument,
    decl: &SlideDeclaration,
    catalog: &ExerciseCatalog,
    feedback: &FeedbackText,
) -> Result<MaterializedExercise> {
    let builder = catalog
        .get(decl.kind)
        .ok_or(ExerciseError::Unreachable(decl.kind))?;

    let (container, editor, preview) = {
        let mut doc = document
            .try_borrow_mut()
            .map_err(|_| ExerciseError::DocumentBusy)?;

        let container = doc.create_element("div");
        doc.add_class(container, CONTAINER_CLASS)?;
        doc.replace_children(decl.slide, &[container])?;

        if let Some(title) = &decl.title {
            let heading = doc.create_element("h3");
            doc.set_text_content(heading, title)?;
            doc.append_child(container, heading)?;
        }

        let editor = doc.create_element("div");
        doc.add_class(editor, EDITOR_CLASS)?;
        doc.append_child(container, editor)?;

        let preview = if decl.preview {
            let frame = doc.create_element("iframe");
            doc.append_child(container, frame)?;
            Some(frame)
        } else {
            None
        };

        (container, editor, preview)
    };

    let exercise = builder.build(ExerciseMount {
        document: Rc::clone(document),
        editor,
        content: decl.content.clone(),
        preview,
        editor_options: decl.editor_options.clone(),
    })?;

    let (panel, subscription) = bind_feedback(document, &exercise, feedback)?;

    {
        let mut doc = document
            .try_borrow_mut()
            .map_err(|_| ExerciseError::DocumentBusy)?;
        doc.append_child(container, panel.root)?;
        if let Some(custom) = decl.custom_content {
            doc.append_child(container, custom)?;
        }
    }

    tracing::debug!(
        slide = decl.index,
        kind = %decl.kind,
        id = decl.id.as_deref().unwrap_or(""),
        preview = decl.preview,
        "Materialized exercise"
    );

    Ok(MaterializedExercise {
        container,
        editor,
        preview,
        panel,
        subscription,
        exercise,
    })
}
