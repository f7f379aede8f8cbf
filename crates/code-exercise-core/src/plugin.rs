/*
 * plugin.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Plugin lifecycle: init, lookup, destroy.
 */

//! Plugin lifecycle: init, lookup, destroy.
//!
//! `init` resolves the options and every slide declaration first, then
//! materializes the slides in presentation order. An unsupported type is
//! therefore reported before the document is touched. Everything an init
//! pass leaves behind (validation subscriptions, pending re-layouts,
//! registry entries) is tracked in a session and released by `destroy`.

use std::rc::Rc;

use code_exercise_config::PluginOptions;
use code_exercise_dom::{Document, SharedDocument};

use crate::error::{ExerciseError, Result};
use crate::exercise::{EditableField, ExerciseCatalog, ExerciseRef, FieldRange};
use crate::host::PresentationHost;
use crate::layout::{RelayoutHandle, RelayoutPolicy, schedule_relayout};
use crate::materialize::{MaterializedExercise, materialize};
use crate::registry::ExerciseRegistry;
use crate::resolve::resolve_slides;

/// Identifier the host knows the plugin by.
pub const PLUGIN_ID: &str = "RevealCodeExercisePlugin";

struct ActiveExercise {
    materialized: MaterializedExercise,
    relayout: RelayoutHandle,
}

/// State of one init pass.
struct Session {
    host: Rc<dyn PresentationHost>,
    exercises: Vec<ActiveExercise>,
}

/// The code exercise plugin.
pub struct CodeExercisePlugin {
    catalog: ExerciseCatalog,
    relayout: RelayoutPolicy,
    options: PluginOptions,
    registry: ExerciseRegistry,
    session: Option<Session>,
}

impl CodeExercisePlugin {
    pub fn new(catalog: ExerciseCatalog) -> Self {
        Self {
            catalog,
            relayout: RelayoutPolicy::default(),
            options: PluginOptions::default(),
            registry: ExerciseRegistry::new(),
            session: None,
        }
    }

    pub fn with_relayout_policy(mut self, policy: RelayoutPolicy) -> Self {
        self.relayout = policy;
        self
    }

    pub fn id(&self) -> &'static str {
        PLUGIN_ID
    }

    /// Effective options of the last init pass (defaults before the first).
    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Run an initialization pass against `host`.
    ///
    /// A previous pass is torn down first. On error nothing from this pass
    /// stays subscribed, scheduled or registered, and slides materialized
    /// before an engine failure get their original markup back.
    pub fn init(&mut self, host: Rc<dyn PresentationHost>) -> Result<()> {
        self.destroy();
        let result = self.run_init(host);
        if let Err(e) = &result {
            tracing::debug!(error = %e, "Initialization failed, tearing down");
            self.destroy();
        }
        result
    }

    fn run_init(&mut self, host: Rc<dyn PresentationHost>) -> Result<()> {
        self.options = PluginOptions::resolve(host.config().as_ref())?;

        let document = host.document();
        let slides = host.slides();
        let (declarations, snapshot) = {
            let doc = document
                .try_borrow()
                .map_err(|_| ExerciseError::DocumentBusy)?;
            (resolve_slides(&doc, &slides, &self.options)?, doc.clone())
        };

        let session = self.session.insert(Session {
            host: Rc::clone(&host),
            exercises: Vec::with_capacity(declarations.len()),
        });

        for decl in &declarations {
            let materialized =
                match materialize(&document, decl, &self.catalog, &self.options.feedback) {
                    Ok(materialized) => materialized,
                    Err(e) => {
                        restore_document(&document, snapshot);
                        return Err(e);
                    }
                };
            let relayout = schedule_relayout(
                &host,
                materialized.container,
                Rc::clone(&materialized.exercise),
                self.relayout,
            );
            if let Some(id) = &decl.id {
                self.registry
                    .register(id.clone(), Rc::clone(&materialized.exercise));
            }
            session.exercises.push(ActiveExercise {
                materialized,
                relayout,
            });
        }

        tracing::info!(
            slides = slides.len(),
            exercises = declarations.len(),
            registered = self.registry.len(),
            "Initialized code exercises"
        );
        Ok(())
    }

    /// Release everything the last init pass set up. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        let Some(session) = self.session.take() else {
            self.registry.clear();
            return;
        };

        let count = session.exercises.len();
        for active in session.exercises {
            active.relayout.cancel();
            active
                .materialized
                .exercise
                .unsubscribe(active.materialized.subscription);
        }
        self.registry.clear();
        drop(session.host);

        tracing::debug!(exercises = count, "Destroyed code exercises");
    }

    /// The exercise registered under `id`, if any.
    pub fn get_exercise(&self, id: &str) -> Option<ExerciseRef> {
        self.registry.lookup(id)
    }

    /// An editable field over `range` (`[startLine, startChar, endLine, endChar]`).
    pub fn create_editable_field(
        &self,
        range: impl Into<FieldRange>,
        allow_multiline: Option<bool>,
    ) -> EditableField {
        EditableField::new(range, allow_multiline)
    }

    /// Every exercise of the current pass, registered or not, in slide order.
    pub fn exercises(&self) -> impl Iterator<Item = &MaterializedExercise> {
        self.session
            .iter()
            .flat_map(|session| session.exercises.iter().map(|active| &active.materialized))
    }

    pub fn registry(&self) -> &ExerciseRegistry {
        &self.registry
    }
}

/// Put back the markup a failed pass started from.
fn restore_document(document: &SharedDocument, snapshot: Document) {
    match document.try_borrow_mut() {
        Ok(mut doc) => *doc = snapshot,
        Err(_) => tracing::warn!("Document busy, materialized slides keep their new markup"),
    }
}

impl Drop for CodeExercisePlugin {
    fn drop(&mut self) {
        self.destroy();
    }
}
