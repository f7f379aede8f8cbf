//! Core of the code exercise slide plugin.
//!
//! This crate discovers exercise slides in a presentation, resolves their
//! declarative configuration, and materializes one live exercise per slide
//! with its editor mount, optional preview surface and hints panel.
//!
//! # Architecture
//!
//! The initialization pass is organized around these key pieces:
//!
//! - [`PresentationHost`] - The host engine: document, slides, config, scheduler
//! - [`resolve_slides`] - Slide attributes to [`SlideDeclaration`]s (fails fast)
//! - [`materialize`] - Builds the DOM scaffold and the exercise instance
//! - [`bind_feedback`] - Renders validation results into the hints panel
//! - [`ExerciseRegistry`] - Declared id to live exercise
//! - [`CodeExercisePlugin`] - Ties the above into `init` / `destroy`
//!
//! The exercise engine itself (editor widget, validation rules) stays
//! outside; it plugs in through [`ExerciseBuilder`]s registered in an
//! [`ExerciseCatalog`].
//!
//! # Example
//!
//! ```ignore
//! use code_exercise_core::{CodeExercisePlugin, ExerciseCatalog, ExerciseKind};
//!
//! let mut catalog = ExerciseCatalog::new();
//! catalog.register(ExerciseKind::Html, Box::new(MyHtmlBuilder));
//!
//! let mut plugin = CodeExercisePlugin::new(catalog);
//! plugin.init(host)?;
//!
//! if let Some(exercise) = plugin.get_exercise("ex1") {
//!     // ...
//! }
//! plugin.destroy();
//! ```

pub mod error;
pub mod exercise;
pub mod feedback;
pub mod host;
pub mod layout;
pub mod materialize;
pub mod plugin;
pub mod registry;
pub mod resolve;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use error::{ExerciseError, Result};
pub use exercise::{
    EditableField, Exercise, ExerciseBuilder, ExerciseCatalog, ExerciseKind, ExerciseMount,
    ExerciseRef, FieldRange, SubscriptionId, ValidationHandler, ValidationResult,
};
pub use feedback::{FeedbackPanel, bind_feedback, build_panel, render_validation};
pub use host::{DeferredTask, ManualScheduler, PresentationHost, Scheduler, Size, TaskId};
pub use layout::{RelayoutHandle, RelayoutPolicy, schedule_relayout};
pub use materialize::{MaterializedExercise, materialize};
pub use plugin::{CodeExercisePlugin, PLUGIN_ID};
pub use registry::ExerciseRegistry;
pub use resolve::{
    SlideDeclaration, decode_preview, is_exercise_slide, resolve_slide, resolve_slides,
    strip_leading_newline,
};

pub use code_exercise_config::{FeedbackText, PluginOptions};
pub use code_exercise_dom::{Document, NodeId, SharedDocument};
