//! Item-collection change notification and selection interception.
//!
//! The host owns the tab bar's item collection and does not announce changes
//! to it. A host binding instruments the collection's mutators (however the
//! platform allows) and reports them through an [`ItemsChangeNotifier`]:
//!
//! - every mutator runs inside a [`MutationScope`]; scopes nest, and
//!   [`items_changed`](ItemsChangeNotifier::items_changed) fires once when the
//!   outermost scope closes;
//! - before performing its default activation of an item, the binding asks
//!   [`should_activate`](ItemsChangeNotifier::should_activate), which consults
//!   the single installed [`SelectionHandler`].
//!
//! ```
//! use tab_menu::ItemsChangeNotifier;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let notifier = ItemsChangeNotifier::new();
//! let count = Arc::new(AtomicUsize::new(0));
//! let count_clone = count.clone();
//! notifier.items_changed.connect(move |_| {
//!     count_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! // `set_items` implemented through two primitive mutations
//! notifier.mutate(|| {
//!     notifier.mutate(|| { /* remove all */ });
//!     notifier.mutate(|| { /* insert new */ });
//! });
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//! ```

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tab_menu_core::logging::targets;
use tab_menu_core::Signal;

use crate::host::HostId;
use crate::item::BarItem;

/// Decides whether the host may perform its default activation of an item.
///
/// Returning `false` suppresses the default behavior.
pub type SelectionHandler = Arc<dyn Fn(HostId, &BarItem) -> bool + Send + Sync>;

/// Handle identifying one installation of a [`SelectionHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionHandlerId(u64);

/// Coalescing change notifier and selection interceptor for one host control.
pub struct ItemsChangeNotifier {
    /// Current mutation nesting depth.
    depth: AtomicUsize,
    /// The installed selection handler, latest installation wins.
    selection_handler: Mutex<Option<(SelectionHandlerId, SelectionHandler)>>,
    next_handler_id: AtomicU64,
    /// Emitted once per outermost mutation.
    pub items_changed: Signal<()>,
}

impl Default for ItemsChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemsChangeNotifier {
    /// Create a notifier with no subscribers and no handler.
    pub fn new() -> Self {
        Self {
            depth: AtomicUsize::new(0),
            selection_handler: Mutex::new(None),
            next_handler_id: AtomicU64::new(1),
            items_changed: Signal::new(),
        }
    }

    /// Enter a mutation. The returned scope leaves it when dropped.
    pub fn begin_mutation(&self) -> MutationScope<'_> {
        let depth = self.depth.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(target: targets::NOTIFIER, depth, "mutation entered");
        MutationScope { notifier: self }
    }

    /// Run `f` as one mutation of the item collection.
    pub fn mutate<R>(&self, f: impl FnOnce() -> R) -> R {
        let _scope = self.begin_mutation();
        f()
    }

    /// Current mutation nesting depth.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Returns true while a mutation is in progress.
    pub fn is_mutating(&self) -> bool {
        self.depth() > 0
    }

    fn end_mutation(&self) {
        let previous = self.depth.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "unbalanced mutation scope");
        if previous == 1 {
            tracing::trace!(target: targets::NOTIFIER, "items changed");
            self.items_changed.emit(());
        }
    }

    /// Install the selection handler, replacing any previous one.
    pub fn install_selection_handler(&self, handler: SelectionHandler) -> SelectionHandlerId {
        let id = SelectionHandlerId(self.next_handler_id.fetch_add(1, Ordering::Relaxed));
        let replaced = self.selection_handler.lock().replace((id, handler)).is_some();
        tracing::trace!(target: targets::NOTIFIER, replaced, "selection handler installed");
        id
    }

    /// Remove the selection handler if `id` is still the installed one.
    ///
    /// Returns `true` if the handler was removed.
    pub fn remove_selection_handler(&self, id: SelectionHandlerId) -> bool {
        let mut slot = self.selection_handler.lock();
        if slot.as_ref().is_some_and(|(current, _)| *current == id) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Returns true if a selection handler is installed.
    pub fn has_selection_handler(&self) -> bool {
        self.selection_handler.lock().is_some()
    }

    /// Ask whether the host may perform its default activation of `item`.
    ///
    /// Without an installed handler the answer is always `true`.
    pub fn should_activate(&self, host: HostId, item: &BarItem) -> bool {
        let handler = self
            .selection_handler
            .lock()
            .as_ref()
            .map(|(_, handler)| handler.clone());
        match handler {
            Some(handler) => handler(host, item),
            None => true,
        }
    }
}

impl std::fmt::Debug for ItemsChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemsChangeNotifier")
            .field("depth", &self.depth())
            .field("has_selection_handler", &self.has_selection_handler())
            .field("items_changed", &self.items_changed)
            .finish()
    }
}

/// An open mutation of the item collection.
///
/// Dropping the scope, including during unwinding, closes the mutation.
#[must_use = "the mutation ends when the scope is dropped"]
#[derive(Debug)]
pub struct MutationScope<'a> {
    notifier: &'a ItemsChangeNotifier,
}

impl Drop for MutationScope<'_> {
    fn drop(&mut self) {
        self.notifier.end_mutation();
    }
}

static_assertions::assert_impl_all!(ItemsChangeNotifier: Send, Sync);
