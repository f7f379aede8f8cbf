/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for code-exercise-core

use code_exercise_config::ConfigError;
use code_exercise_dom::DomError;
use thiserror::Error;

use crate::exercise::ExerciseKind;

#[derive(Error, Debug)]
pub enum ExerciseError {
    /// A slide declared (or defaulted to) a type outside the supported set.
    ///
    /// Fatal for the whole initialization pass.
    #[error("Unsupported exercise type: {exercise_type} (slide {slide_index})")]
    UnsupportedType {
        exercise_type: String,
        slide_index: usize,
    },

    /// A resolved type has no builder. This is a logic defect, not bad input.
    #[error("Unreachable: no exercise builder registered for type {0}")]
    Unreachable(ExerciseKind),

    #[error("Exercise engine failed to build a {kind} exercise: {message}")]
    Engine { kind: ExerciseKind, message: String },

    /// The shared document was already borrowed when the plugin needed it.
    #[error("Document is borrowed elsewhere")]
    DocumentBusy,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Document error: {0}")]
    Dom(#[from] DomError),
}

impl ExerciseError {
    /// Create an engine error from any message.
    pub fn engine(kind: ExerciseKind, message: impl Into<String>) -> Self {
        Self::Engine {
            kind,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExerciseError>;
