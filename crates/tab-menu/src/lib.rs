//! Tab Menu - long-press and overflow context menus for host-owned tab bars.
//!
//! The host application keeps its own tab bar control. This crate adds a
//! contextual menu per tab, including the collapsed overflow ("more") slot,
//! by installing long-press recognizers on the control's buttons and keeping
//! them in sync as the control's items change.
//!
//! The pieces, leaves first:
//!
//! - [`Configuration`]: press duration, overflow trigger and overflow size
//! - [`ItemsChangeNotifier`]: coalesced "items changed" events and the
//!   selection veto hook a host binding drives
//! - [`OverflowLayout`]: overflow-slot arithmetic
//! - [`RequestRouter`]: turns a logical index into a [`MenuRequest`]
//! - [`PresentationScheduler`]: deferred, cancellable presentation
//! - [`TabMenuCoordinator`]: attachment, button discovery and gesture flows
//! - [`TabBarMenu`]: the per-control wrapper host bindings store
//!
//! Host bindings implement [`TabBarHost`] and [`MenuHost`]; applications
//! implement [`TabMenuDelegate`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tab_menu::{TabBarMenu, OverflowTrigger};
//! use tab_menu_core::TaskQueue;
//!
//! let queue = Arc::new(TaskQueue::new());
//! let mut menus = TabBarMenu::new(tab_bar, queue.clone());
//! menus.configuration_mut().set_overflow_trigger(OverflowTrigger::Tap);
//! menus.set_delegate(Some(Arc::new(MyDelegate)));
//!
//! // In the host's run loop:
//! queue.run_turn();
//! ```

mod config;
mod coordinator;
mod delegate;
mod error;
mod host;
mod item;
mod menu;
mod notifier;
mod overflow;
mod presentation;
mod router;
mod tab_bar_menu;

pub use config::{
    Configuration, DEFAULT_MAX_VISIBLE_COUNT, DEFAULT_MINIMUM_PRESS_DURATION,
    IMMEDIATE_PRESS_DURATION, OverflowTrigger,
};
pub use coordinator::{
    InstalledRecognizer, TabMenuCoordinator, discover_buttons, order_by_leading_edge,
    press_duration,
};
pub use delegate::{Capabilities, PlacementContext, TabMenuDelegate};
pub use error::{ConfigError, Resolution, SkipReason};
pub use host::{
    ButtonId, ButtonView, HostId, LayoutDirection, MenuHost, PressHandler, RecognizerId,
    TabBarHost,
};
pub use item::{BarItem, ItemId, Page, PageHandle, Tab};
pub use menu::{
    DEFAULT_ABOVE_OFFSET, ElementOrder, Menu, MenuAction, MenuElement, MenuPlan, Placement,
};
pub use notifier::{ItemsChangeNotifier, MutationScope, SelectionHandler, SelectionHandlerId};
pub use overflow::OverflowLayout;
pub use presentation::{PresentationContext, PresentationScheduler};
pub use router::{ItemSnapshot, MenuRequest, MenuTarget, RequestRouter, Source, SourceSelection};
pub use tab_bar_menu::{ConfigurationMut, TabBarMenu};

/// Re-exported core primitives.
pub use tab_menu_core::{Point, Rect, Size, TaskId, TaskQueue};
