//! Recording exercise engine and in-memory host for unit tests.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use code_exercise_dom::{NodeId, SharedDocument, parse};
use serde_json::Value;

use crate::error::{ExerciseError, Result};
use crate::exercise::{
    Exercise, ExerciseBuilder, ExerciseKind, ExerciseMount, ExerciseRef, SubscriptionId,
    ValidationHandler, ValidationResult,
};
use crate::host::{ManualScheduler, PresentationHost, Scheduler, Size};

pub struct RecordingExercise {
    kind: ExerciseKind,
    preview: Option<NodeId>,
    pub mount: Option<ExerciseMount>,
    next_subscription: Cell<u64>,
    handlers: RefCell<Vec<(SubscriptionId, ValidationHandler)>>,
    layouts: Cell<usize>,
}

impl RecordingExercise {
    pub fn shared(kind: ExerciseKind, preview: Option<NodeId>) -> Rc<Self> {
        Rc::new(Self {
            kind,
            preview,
            mount: None,
            next_subscription: Cell::new(0),
            handlers: RefCell::new(Vec::new()),
            layouts: Cell::new(0),
        })
    }

    fn from_mount(kind: ExerciseKind, mount: ExerciseMount) -> Rc<Self> {
        Rc::new(Self {
            kind,
            preview: mount.preview,
            mount: Some(mount),
            next_subscription: Cell::new(0),
            handlers: RefCell::new(Vec::new()),
            layouts: Cell::new(0),
        })
    }

    pub fn emit(&self, result: &ValidationResult) {
        for (_, handler) in self.handlers.borrow_mut().iter_mut() {
            handler(result);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn layout_count(&self) -> usize {
        self.layouts.get()
    }
}

impl Exercise for RecordingExercise {
    fn kind(&self) -> ExerciseKind {
        self.kind
    }

    fn on_validate(&self, handler: ValidationHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        self.handlers.borrow_mut().retain(|(id, _)| *id != subscription);
    }

    fn layout(&self) {
        self.layouts.set(self.layouts.get() + 1);
    }

    fn preview(&self) -> Option<NodeId> {
        self.preview
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builds [`RecordingExercise`]s and keeps every instance it built.
#[derive(Default, Clone)]
pub struct RecordingBuilder {
    pub built: Rc<RefCell<Vec<Rc<RecordingExercise>>>>,
    /// Fail every build once this many exercises have been built.
    pub fail_after: Option<usize>,
}

impl ExerciseBuilder for RecordingBuilder {
    fn build(&self, mount: ExerciseMount) -> Result<ExerciseRef> {
        if self
            .fail_after
            .is_some_and(|limit| self.built.borrow().len() >= limit)
        {
            return Err(ExerciseError::engine(ExerciseKind::Html, "engine unavailable"));
        }
        let exercise = RecordingExercise::from_mount(ExerciseKind::Html, mount);
        self.built.borrow_mut().push(Rc::clone(&exercise));
        Ok(exercise)
    }
}

/// Host over an in-memory document with a manual scheduler.
pub struct TestHost {
    pub document: SharedDocument,
    pub slides: Vec<NodeId>,
    pub config: Option<Value>,
    pub scheduler: Rc<ManualScheduler>,
    /// Size reported for every element; `None` means the host cannot measure.
    pub size: Cell<Option<Size>>,
}

impl TestHost {
    /// Parse `markup` and use its `section` elements as slides.
    pub fn from_markup(markup: &str, config: Option<Value>) -> Rc<Self> {
        let doc = parse(markup).unwrap();
        let slides = doc.elements_by_tag(doc.root(), "section");
        Rc::new(Self {
            document: doc.into_shared(),
            slides,
            config,
            scheduler: Rc::new(ManualScheduler::new()),
            size: Cell::new(None),
        })
    }
}

impl PresentationHost for TestHost {
    fn document(&self) -> SharedDocument {
        Rc::clone(&self.document)
    }

    fn slides(&self) -> Vec<NodeId> {
        self.slides.clone()
    }

    fn config(&self) -> Option<Value> {
        self.config.clone()
    }

    fn scheduler(&self) -> Rc<dyn Scheduler> {
        self.scheduler.clone()
    }

    fn measure(&self, _node: NodeId) -> Option<Size> {
        self.size.get()
    }
}
