//! Notification batching.
//!
//! The reconciler never calls listeners directly. It runs each update inside
//! `Batcher::batch` and hands listener delivery to `Batcher::schedule`, so a
//! batcher decides when downstream consumers observe a change.
//!
//! `NotifyManager` defers scheduled tasks until the outermost batch returns,
//! then flushes them in FIFO order. Consumers see one settled state per batch
//! instead of every intermediate step.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::cell::{Cell, RefCell};

/// A deferred notification task.
pub type Task = Box<dyn FnOnce()>;

/// A transaction boundary for notifications.
pub trait Batcher {
    /// Runs `f`, deferring any tasks scheduled inside it until it returns.
    fn batch(&self, f: &mut dyn FnMut());

    /// Runs `task` now, or queues it if a batch is open.
    fn schedule(&self, task: Task);
}

/// A batcher that never defers.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateBatcher;

impl Batcher for ImmediateBatcher {
    fn batch(&self, f: &mut dyn FnMut()) {
        f();
    }

    fn schedule(&self, task: Task) {
        task();
    }
}

/// Single-threaded batching scheduler.
///
/// # Example
///
/// ```ignore
/// use synq_reactive::{Batcher, NotifyManager};
///
/// let manager = NotifyManager::new();
/// manager.batch(&mut || {
///     manager.schedule(Box::new(|| println!("runs after the batch")));
///     println!("runs first");
/// });
/// ```
#[derive(Default)]
pub struct NotifyManager {
    /// Open batch nesting depth
    depth: Cell<usize>,
    /// Tasks waiting for the outermost batch to close
    queue: RefCell<VecDeque<Task>>,
}

impl NotifyManager {
    /// Creates a new notify manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a batch is open.
    #[inline]
    pub fn is_batching(&self) -> bool {
        self.depth.get() > 0
    }

    /// Returns the number of queued tasks.
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Runs queued tasks until the queue is empty.
    ///
    /// Tasks may schedule further tasks; those run in the same flush.
    fn flush(&self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(task) => task(),
                None => break,
            }
        }
    }
}

impl Batcher for NotifyManager {
    fn batch(&self, f: &mut dyn FnMut()) {
        self.depth.set(self.depth.get() + 1);
        f();
        let depth = self.depth.get() - 1;
        self.depth.set(depth);
        if depth == 0 {
            self.flush();
        }
    }

    fn schedule(&self, task: Task) {
        if self.is_batching() {
            self.queue.borrow_mut().push_back(task);
        } else {
            task();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        let make = move |label: &'static str| -> Task {
            let log = log_clone.clone();
            Box::new(move || log.borrow_mut().push(label))
        };
        (log, make)
    }

    #[test]
    fn test_schedule_outside_batch_runs_immediately() {
        let manager = NotifyManager::new();
        let (log, task) = recorder();

        manager.schedule(task("a"));

        assert_eq!(*log.borrow(), vec!["a"]);
        assert_eq!(manager.pending_count(), 0);
    }

    #[test]
    fn test_schedule_inside_batch_is_deferred() {
        let manager = NotifyManager::new();
        let (log, task) = recorder();

        manager.batch(&mut || {
            manager.schedule(task("a"));
            manager.schedule(task("b"));
            assert!(log.borrow().is_empty());
            assert_eq!(manager.pending_count(), 2);
        });

        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert!(!manager.is_batching());
    }

    #[test]
    fn test_nested_batches_flush_once_at_outermost() {
        let manager = NotifyManager::new();
        let (log, task) = recorder();

        manager.batch(&mut || {
            manager.batch(&mut || {
                manager.schedule(task("inner"));
            });
            assert!(log.borrow().is_empty());
            manager.schedule(task("outer"));
        });

        assert_eq!(*log.borrow(), vec!["inner", "outer"]);
    }

    #[test]
    fn test_task_scheduled_during_flush_runs() {
        let manager = Rc::new(NotifyManager::new());
        let (log, task) = recorder();
        let mut nested = Some(task("nested"));

        let m = manager.clone();
        manager.batch(&mut || {
            if let Some(nested) = nested.take() {
                let m = m.clone();
                manager.schedule(Box::new(move || m.schedule(nested)));
            }
            manager.schedule(task("first"));
        });

        // The flush has closed the batch, so the nested task runs inline.
        assert_eq!(*log.borrow(), vec!["nested", "first"]);
    }

    #[test]
    fn test_immediate_batcher() {
        let batcher = ImmediateBatcher;
        let (log, task) = recorder();

        batcher.batch(&mut || {
            batcher.schedule(task("a"));
            assert_eq!(log.borrow().len(), 1);
        });
        assert_eq!(*log.borrow(), vec!["a"]);
    }
}
