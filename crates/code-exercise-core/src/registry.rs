//! Declared exercise id to live exercise.

use std::collections::HashMap;

use crate::exercise::ExerciseRef;

/// Exercises registered under the ids their slides declared.
#[derive(Default)]
pub struct ExerciseRegistry {
    exercises: HashMap<String, ExerciseRef>,
}

impl ExerciseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `exercise` under `id`, replacing any previous entry.
    pub fn register(&mut self, id: impl Into<String>, exercise: ExerciseRef) {
        let id = id.into();
        if self.exercises.insert(id.clone(), exercise).is_some() {
            tracing::debug!(id = %id, "Exercise id reused, replacing previous exercise");
        }
    }

    pub fn lookup(&self, id: &str) -> Option<ExerciseRef> {
        self.exercises.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.exercises.contains_key(id)
    }

    pub fn clear(&mut self) {
        self.exercises.clear();
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.exercises.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for ExerciseRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExerciseRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::ExerciseKind;
    use crate::test_support::RecordingExercise;
    use std::rc::Rc;

    #[test]
    fn test_lookup_missing_is_none() {
        let registry = ExerciseRegistry::new();
        assert!(registry.lookup("nope").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_overwrite_keeps_second() {
        let mut registry = ExerciseRegistry::new();
        let first = RecordingExercise::shared(ExerciseKind::Html, None);
        let second = RecordingExercise::shared(ExerciseKind::Html, None);
        let first_ref: ExerciseRef = first.clone();
        let second_ref: ExerciseRef = second.clone();

        registry.register("ex", first_ref);
        registry.register("ex", Rc::clone(&second_ref));

        assert_eq!(registry.len(), 1);
        let found = registry.lookup("ex").unwrap();
        assert!(Rc::ptr_eq(&found, &second_ref));
        assert_eq!(Rc::strong_count(&first), 1);
    }

    #[test]
    fn test_clear() {
        let mut registry = ExerciseRegistry::new();
        registry.register("b", RecordingExercise::shared(ExerciseKind::Html, None));
        registry.register("a", RecordingExercise::shared(ExerciseKind::Html, None));
        assert_eq!(registry.ids(), vec!["a", "b"]);

        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.contains("a"));
    }
}
