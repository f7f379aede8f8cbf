/*
 * exercise.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Boundary with the exercise engine.
 */

//! Boundary with the exercise engine.
//!
//! The engine owns the editor widget and the validation logic; this crate
//! only needs to construct instances, listen to their validation results and
//! poke them to re-layout. Construction goes through an [`ExerciseCatalog`]
//! that maps each supported [`ExerciseKind`] to an [`ExerciseBuilder`], so
//! supporting a new language is a registration rather than a new branch.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use code_exercise_dom::{NodeId, SharedDocument};
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Result;

/// The fixed allow-list of exercise languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExerciseKind {
    Html,
}

impl ExerciseKind {
    /// Every supported kind.
    pub const SUPPORTED: &'static [ExerciseKind] = &[ExerciseKind::Html];

    /// The name used in slide attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseKind::Html => "html",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = String;

    /// Exact, case-sensitive match against the allow-list.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::SUPPORTED
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// One validation notification from an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    pub valid: bool,
    /// Hints in display order.
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            valid: false,
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }
}

/// Token returned by [`Exercise::on_validate`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Callback invoked on every validation result.
pub type ValidationHandler = Box<dyn FnMut(&ValidationResult)>;

/// A live exercise instance owned by the engine.
///
/// Methods take `&self`; implementations use interior mutability since the
/// instance is shared between the registry, the plugin and its callbacks.
pub trait Exercise {
    fn kind(&self) -> ExerciseKind;

    /// Subscribe to validation results for the lifetime of the exercise.
    fn on_validate(&self, handler: ValidationHandler) -> SubscriptionId;

    /// Drop a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, subscription: SubscriptionId);

    /// Recompute the editor layout from its container's current size.
    fn layout(&self);

    /// The preview surface the exercise renders into, if any.
    fn preview(&self) -> Option<NodeId>;

    /// Access to the concrete engine type.
    fn as_any(&self) -> &dyn Any;
}

pub type ExerciseRef = Rc<dyn Exercise>;

/// Everything an engine needs to construct one exercise.
#[derive(Debug, Clone)]
pub struct ExerciseMount {
    pub document: SharedDocument,
    /// Element the editor surface mounts into.
    pub editor: NodeId,
    /// Starter content.
    pub content: String,
    /// Preview frame, attached to the container before construction.
    pub preview: Option<NodeId>,
    /// Effective editor configuration.
    pub editor_options: Value,
}

/// Constructs exercises of one kind.
///
/// The document is not borrowed while `build` runs, so builders may mutate it.
pub trait ExerciseBuilder {
    fn build(&self, mount: ExerciseMount) -> Result<ExerciseRef>;
}

/// Registry of exercise kinds to their builders.
#[derive(Default)]
pub struct ExerciseCatalog {
    builders: IndexMap<ExerciseKind, Box<dyn ExerciseBuilder>>,
}

impl ExerciseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the builder for `kind`.
    pub fn register(&mut self, kind: ExerciseKind, builder: Box<dyn ExerciseBuilder>) -> &mut Self {
        self.builders.insert(kind, builder);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, kind: ExerciseKind, builder: Box<dyn ExerciseBuilder>) -> Self {
        self.register(kind, builder);
        self
    }

    pub fn get(&self, kind: ExerciseKind) -> Option<&dyn ExerciseBuilder> {
        self.builders.get(&kind).map(|b| b.as_ref())
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> Vec<ExerciseKind> {
        self.builders.keys().copied().collect()
    }
}

impl fmt::Debug for ExerciseCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExerciseCatalog")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Editable range inside an exercise: `[startLine, startChar, endLine, endChar]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRange {
    pub start_line: u32,
    pub start_char: u32,
    pub end_line: u32,
    pub end_char: u32,
}

impl From<[u32; 4]> for FieldRange {
    fn from([start_line, start_char, end_line, end_char]: [u32; 4]) -> Self {
        Self {
            start_line,
            start_char,
            end_line,
            end_char,
        }
    }
}

/// An editable field handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditableField {
    pub range: FieldRange,
    /// Whether newline characters may be typed into the field.
    pub allow_multiline: bool,
}

impl EditableField {
    /// `allow_multiline` defaults to `false` when not given.
    pub fn new(range: impl Into<FieldRange>, allow_multiline: Option<bool>) -> Self {
        Self {
            range: range.into(),
            allow_multiline: allow_multiline.unwrap_or(false),
        }
    }
}
