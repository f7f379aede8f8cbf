/*
 * host.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Boundary with the host presentation engine.
 */

//! Boundary with the host presentation engine.
//!
//! The plugin never walks the deck itself: the host hands over the shared
//! document, the slides in presentation order and its configuration object.
//! Deferred work goes through a [`Scheduler`] so that hosts with an event loop
//! can map it onto timers, while hosts without one (and tests) drive a
//! [`ManualScheduler`] explicitly.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use code_exercise_dom::{NodeId, SharedDocument};
use serde_json::Value;

/// Handle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// A fire-and-forget callback run by a [`Scheduler`].
pub type DeferredTask = Box<dyn FnOnce()>;

/// Deferred execution of callbacks.
pub trait Scheduler {
    /// Run `task` once, no earlier than `delay` from now.
    fn schedule(&self, delay: Duration, task: DeferredTask) -> TaskId;

    /// Drop a task that has not run yet. Unknown or finished ids are ignored.
    fn cancel(&self, task: TaskId);
}

/// Rendered size of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Zero-area sizes mean the element has not been laid out yet.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// The host presentation engine, as seen by the plugin.
pub trait PresentationHost {
    fn document(&self) -> SharedDocument;

    /// Slide elements in presentation order.
    fn slides(&self) -> Vec<NodeId>;

    /// The full host configuration object, if any.
    fn config(&self) -> Option<Value>;

    fn scheduler(&self) -> Rc<dyn Scheduler>;

    /// Rendered size of an element, `None` when the host cannot measure.
    fn measure(&self, _node: NodeId) -> Option<Size> {
        None
    }
}

struct PendingTask {
    id: TaskId,
    due: Duration,
    task: DeferredTask,
}

#[derive(Default)]
struct SchedulerState {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTask>,
}

/// A deterministic scheduler driven by explicit calls to [`advance`](Self::advance).
///
/// Time is virtual. Tasks due at the same instant run in scheduling order,
/// and tasks may schedule further tasks while running.
#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<SchedulerState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Move virtual time forward by `by`, running every task that becomes due.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;
        while let Some(next) = self.pop_due(target) {
            (next.task)();
            ran += 1;
        }
        self.state.borrow_mut().now = target;
        ran
    }

    /// Run tasks until none are left, advancing virtual time as needed.
    ///
    /// Returns the number of tasks run.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(next) = self.pop_due(Duration::MAX) {
            (next.task)();
            ran += 1;
        }
        ran
    }

    /// Remove the earliest task due at or before `limit`, moving the clock to it.
    ///
    /// The state borrow ends before the task runs, so tasks can reschedule.
    fn pop_due(&self, limit: Duration) -> Option<PendingTask> {
        let mut state = self.state.borrow_mut();
        let position = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= limit)
            .min_by_key(|(_, p)| (p.due, p.id))
            .map(|(i, _)| i)?;
        let next = state.pending.remove(position);
        if next.due > state.now {
            state.now = next.due;
        }
        Some(next)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: DeferredTask) -> TaskId {
        let mut state = self.state.borrow_mut();
        let id = TaskId(state.next_id);
        state.next_id += 1;
        let due = state.now + delay;
        state.pending.push(PendingTask { id, due, task });
        id
    }

    fn cancel(&self, task: TaskId) {
        self.state.borrow_mut().pending.retain(|p| p.id != task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> DeferredTask {
        let log = Rc::clone(log);
        Box::new(move || log.borrow_mut().push(name))
    }

    #[test]
    fn test_tasks_run_in_due_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scheduler.schedule(Duration::from_millis(100), recorder(&log, "late"));
        scheduler.schedule(Duration::from_millis(10), recorder(&log, "early"));
        scheduler.schedule(Duration::from_millis(10), recorder(&log, "early-second"));

        assert_eq!(scheduler.advance(Duration::from_millis(50)), 2);
        assert_eq!(*log.borrow(), vec!["early", "early-second"]);
        assert_eq!(scheduler.now(), Duration::from_millis(50));

        assert_eq!(scheduler.advance(Duration::from_millis(50)), 1);
        assert_eq!(*log.borrow(), vec!["early", "early-second", "late"]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_cancel_drops_task() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = scheduler.schedule(Duration::from_millis(5), recorder(&log, "cancelled"));
        scheduler.cancel(id);
        scheduler.cancel(TaskId(999));

        assert_eq!(scheduler.run_until_idle(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_tasks_can_reschedule() {
        let scheduler = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0));

        fn tick(scheduler: Rc<ManualScheduler>, count: Rc<Cell<u32>>) {
            count.set(count.get() + 1);
            if count.get() < 3 {
                let next = Rc::clone(&scheduler);
                scheduler.schedule(
                    Duration::from_millis(10),
                    Box::new(move || tick(next, count)),
                );
            }
        }

        let first = (Rc::clone(&scheduler), Rc::clone(&count));
        scheduler.schedule(Duration::ZERO, Box::new(move || tick(first.0, first.1)));

        assert_eq!(scheduler.run_until_idle(), 3);
        assert_eq!(count.get(), 3);
        assert_eq!(scheduler.now(), Duration::from_millis(20));
    }

    #[test]
    fn test_size_is_empty() {
        assert!(Size::default().is_empty());
        assert!(Size::new(100.0, 0.0).is_empty());
        assert!(!Size::new(100.0, 40.0).is_empty());
    }
}
