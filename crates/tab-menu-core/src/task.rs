//! Deferred task queue for the main context.
//!
//! Work that must wait until the current event has been fully handled (layout
//! settled, transitions started) is posted here and executed on the next
//! turn of the host's run loop. A task posted while a turn is running is
//! never executed in that same turn, so every posted task yields at least
//! once.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use tab_menu_core::TaskQueue;
//!
//! let queue = TaskQueue::new();
//! let ran = Arc::new(AtomicBool::new(false));
//!
//! let ran_clone = ran.clone();
//! queue.post(move || ran_clone.store(true, Ordering::SeqCst));
//! assert!(!ran.load(Ordering::SeqCst));
//!
//! queue.run_turn();
//! assert!(ran.load(Ordering::SeqCst));
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::logging::targets;

/// A unique identifier for a deferred task.
///
/// Identifiers increase monotonically in posting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// A boxed task closure.
type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

/// Internal task data.
struct TaskData {
    id: TaskId,
    task: BoxedTask,
}

/// The main-context deferred task queue.
///
/// The host binding drives the queue by calling [`run_turn`](Self::run_turn)
/// once per run-loop iteration. The queue's lock is never held while a task
/// runs, so tasks may post or cancel other tasks.
#[derive(Default)]
pub struct TaskQueue {
    tasks: Mutex<VecDeque<TaskData>>,
}

impl TaskQueue {
    /// Create a new, empty task queue.
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(VecDeque::new()),
        }
    }

    /// Post a task to run on the next turn.
    ///
    /// Returns the task ID that can be used to cancel the task.
    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.tasks.lock().push_back(TaskData {
            id,
            task: Box::new(task),
        });
        tracing::trace!(target: targets::TASK, task = id.as_u64(), "task posted");
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was found and cancelled.
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut tasks = self.tasks.lock();
        if let Some(pos) = tasks.iter().position(|t| t.id == id) {
            tasks.remove(pos);
            tracing::trace!(target: targets::TASK, task = id.as_u64(), "task cancelled");
            true
        } else {
            false
        }
    }

    /// Check whether a task is still waiting to run.
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.lock().iter().any(|t| t.id == id)
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.lock().is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Run one turn: every task that was pending when the turn started.
    ///
    /// Tasks posted by tasks of this turn wait for the next one. Returns the
    /// number of tasks executed.
    #[tracing::instrument(skip_all, target = "tab_menu_core::task", level = "trace")]
    pub fn run_turn(&self) -> usize {
        let Some(boundary) = self.tasks.lock().back().map(|t| t.id) else {
            return 0;
        };

        let mut count = 0;
        loop {
            let next = {
                let mut tasks = self.tasks.lock();
                match tasks.front() {
                    Some(front) if front.id <= boundary => tasks.pop_front(),
                    _ => None,
                }
            };
            let Some(task_data) = next else {
                break;
            };
            (task_data.task)();
            count += 1;
        }
        count
    }

    /// Run turns until the queue is empty or `max_turns` turns have run.
    ///
    /// Returns the total number of tasks executed.
    pub fn run_until_idle(&self, max_turns: usize) -> usize {
        let mut total = 0;
        for _ in 0..max_turns {
            if !self.has_pending() {
                break;
            }
            total += self.run_turn();
        }
        total
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.tasks.lock().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(TaskQueue: Send, Sync);
