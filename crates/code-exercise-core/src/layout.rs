/*
 * layout.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Deferred editor re-layout after attachment.
 */

//! Deferred editor re-layout after attachment.
//!
//! An editor cannot size itself before its container has been attached and
//! laid out by the host. After materialization a task is scheduled that
//! calls [`Exercise::layout`] once the container is connected and, when the
//! host can measure it, has a non-zero size. Containers that never get a
//! size are retried a bounded number of times.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use code_exercise_dom::NodeId;

use crate::exercise::ExerciseRef;
use crate::host::{PresentationHost, Scheduler, TaskId};

/// Timing of the deferred re-layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayoutPolicy {
    /// Delay before the first attempt.
    pub initial_delay: Duration,
    /// Delay between attempts while the container has no size.
    pub retry_interval: Duration,
    /// Total number of attempts, the first one included.
    pub max_attempts: u32,
}

impl Default for RelayoutPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            retry_interval: Duration::from_millis(50),
            max_attempts: 10,
        }
    }
}

/// Owner-side handle of a scheduled re-layout.
pub struct RelayoutHandle {
    pending: Rc<Cell<Option<TaskId>>>,
    scheduler: Rc<dyn Scheduler>,
}

impl RelayoutHandle {
    /// Whether an attempt is still scheduled.
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Cancel the scheduled attempt, if any.
    pub fn cancel(&self) {
        if let Some(task) = self.pending.take() {
            self.scheduler.cancel(task);
        }
    }
}

enum Readiness {
    Detached,
    NotSized,
    Ready,
}

struct RelayoutTask {
    host: Weak<dyn PresentationHost>,
    container: NodeId,
    exercise: ExerciseRef,
    policy: RelayoutPolicy,
    pending: Rc<Cell<Option<TaskId>>>,
}

impl RelayoutTask {
    fn schedule(self: &Rc<Self>, scheduler: &dyn Scheduler, delay: Duration, attempt: u32) {
        let task = Rc::clone(self);
        let id = scheduler.schedule(delay, Box::new(move || task.run(attempt)));
        self.pending.set(Some(id));
    }

    fn readiness(&self, host: &dyn PresentationHost) -> Readiness {
        let document = host.document();
        match document.try_borrow() {
            Ok(doc) if !doc.is_connected(self.container) => return Readiness::Detached,
            Ok(_) => {}
            Err(_) => return Readiness::NotSized,
        }
        match host.measure(self.container) {
            Some(size) if size.is_empty() => Readiness::NotSized,
            _ => Readiness::Ready,
        }
    }

    fn run(self: Rc<Self>, attempt: u32) {
        self.pending.set(None);
        let Some(host) = self.host.upgrade() else {
            return;
        };

        match self.readiness(host.as_ref()) {
            Readiness::Detached => {
                tracing::debug!(attempt, "Exercise container detached, skipping re-layout");
            }
            Readiness::Ready => self.exercise.layout(),
            Readiness::NotSized if attempt + 1 < self.policy.max_attempts => {
                let scheduler = host.scheduler();
                self.schedule(scheduler.as_ref(), self.policy.retry_interval, attempt + 1);
            }
            Readiness::NotSized => {
                tracing::debug!(
                    attempts = attempt + 1,
                    "Exercise container never got a size, giving up re-layout"
                );
            }
        }
    }
}

/// Schedule the deferred re-layout of `exercise` mounted in `container`.
///
/// The task holds the host weakly, so a dropped host turns it into a no-op.
pub fn schedule_relayout(
    host: &Rc<dyn PresentationHost>,
    container: NodeId,
    exercise: ExerciseRef,
    policy: RelayoutPolicy,
) -> RelayoutHandle {
    let scheduler = host.scheduler();
    let pending = Rc::new(Cell::new(None));

    if policy.max_attempts > 0 {
        let task = Rc::new(RelayoutTask {
            host: Rc::downgrade(host),
            container,
            exercise,
            policy,
            pending: Rc::clone(&pending),
        });
        task.schedule(scheduler.as_ref(), policy.initial_delay, 0);
    }

    RelayoutHandle { pending, scheduler }
}
