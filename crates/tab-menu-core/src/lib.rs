//! Core primitives for Tab Menu.
//!
//! This crate provides the small building blocks the tab menu coordinator is
//! assembled from:
//!
//! - **Signal/Slot System**: [`Signal`] for change notification between the
//!   host binding and the coordinator
//! - **Task Queue**: [`TaskQueue`], the main-context deferred work queue used to
//!   postpone menu presentation by one run-loop turn
//! - **Geometry**: [`Point`], [`Size`] and [`Rect`] in container coordinates
//! - **Logging**: tracing targets for filtering per subsystem
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tab_menu_core::{Signal, TaskQueue};
//!
//! let queue = Arc::new(TaskQueue::new());
//! let changed = Signal::<()>::new();
//!
//! let queue_clone = queue.clone();
//! changed.connect(move |_| {
//!     queue_clone.post(|| println!("deferred work"));
//! });
//!
//! changed.emit(());
//! assert_eq!(queue.run_turn(), 1);
//! ```

pub mod geometry;
pub mod logging;
pub mod signal;
mod task;

pub use geometry::{Point, Rect, Size};
pub use signal::{ConnectionId, Signal};
pub use task::{TaskId, TaskQueue};
