/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Static HTML exercise engine.
 */

//! Static HTML exercise engine.
//!
//! Renders the starter content as a code block inside the editor mount and
//! feeds the preview frame through `srcdoc`. Nothing is ever validated, so
//! subscribers are kept but never called.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use code_exercise_core::{
    Exercise, ExerciseBuilder, ExerciseCatalog, ExerciseError, ExerciseKind, ExerciseMount,
    ExerciseRef, NodeId, Result, SharedDocument, SubscriptionId, ValidationHandler,
};

/// Attribute carrying the effective editor options as JSON.
pub const EDITOR_OPTIONS_ATTRIBUTE: &str = "data-editor-options";

/// Attribute set on the editor mount once it has been laid out.
pub const LAYOUT_ATTRIBUTE: &str = "data-layout";

pub struct StaticHtmlExercise {
    document: SharedDocument,
    editor: NodeId,
    preview: Option<NodeId>,
    next_subscription: Cell<u64>,
    handlers: RefCell<Vec<(SubscriptionId, ValidationHandler)>>,
}

impl Exercise for StaticHtmlExercise {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Html
    }

    fn on_validate(&self, handler: ValidationHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        self.handlers
            .borrow_mut()
            .retain(|(id, _)| *id != subscription);
    }

    fn layout(&self) {
        match self.document.try_borrow_mut() {
            Ok(mut doc) => {
                if let Err(e) = doc.set_attribute(self.editor, LAYOUT_ATTRIBUTE, "ready") {
                    tracing::warn!(error = %e, "Failed to mark editor as laid out");
                }
            }
            Err(_) => tracing::warn!("Document busy, skipping layout"),
        }
    }

    fn preview(&self) -> Option<NodeId> {
        self.preview
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct StaticHtmlBuilder;

impl ExerciseBuilder for StaticHtmlBuilder {
    fn build(&self, mount: ExerciseMount) -> Result<ExerciseRef> {
        let options = serde_json::to_string(&mount.editor_options)
            .map_err(|e| ExerciseError::engine(ExerciseKind::Html, e.to_string()))?;

        {
            let mut doc = mount
                .document
                .try_borrow_mut()
                .map_err(|_| ExerciseError::DocumentBusy)?;

            let code = doc.create_element("code");
            doc.add_class(code, "language-html")?;
            doc.set_text_content(code, &mount.content)?;
            let pre = doc.create_element("pre");
            doc.append_child(pre, code)?;
            doc.append_child(mount.editor, pre)?;
            doc.set_attribute(mount.editor, EDITOR_OPTIONS_ATTRIBUTE, &options)?;

            if let Some(frame) = mount.preview {
                doc.set_attribute(frame, "srcdoc", &mount.content)?;
                doc.set_attribute(frame, "title", "Preview")?;
            }
        }

        Ok(Rc::new(StaticHtmlExercise {
            document: Rc::clone(&mount.document),
            editor: mount.editor,
            preview: mount.preview,
            next_subscription: Cell::new(0),
            handlers: RefCell::new(Vec::new()),
        }))
    }
}

/// Catalog with the static engine registered for every supported kind.
pub fn static_catalog() -> ExerciseCatalog {
    let mut catalog = ExerciseCatalog::new();
    for &kind in ExerciseKind::SUPPORTED {
        catalog.register(kind, Box::new(StaticHtmlBuilder));
    }
    catalog
}
