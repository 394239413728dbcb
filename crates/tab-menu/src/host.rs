//! The host boundary.
//!
//! [`TabBarHost`] is everything the coordinator needs from the platform's tab
//! bar: its items in both content models, button discovery, recognizer
//! installation and a factory for the invisible [`MenuHost`] that anchors
//! presented menus. Implementations live in host bindings; the coordinator
//! never assumes how any of it is done.

use std::sync::Arc;
use std::time::Duration;

use tab_menu_core::{Point, Rect};

use crate::item::{BarItem, ItemId, Page, Tab};
use crate::menu::{ElementOrder, Menu, MenuPlan, Placement};
use crate::notifier::ItemsChangeNotifier;

/// Identity of a host control instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostId(pub u64);

/// Identity of a button view inside the host control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ButtonId(pub u64);

/// Identity of an installed long-press recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecognizerId(pub u64);

/// A button view as currently laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonView {
    pub id: ButtonId,
    /// Frame in container coordinates.
    pub frame: Rect,
}

impl ButtonView {
    /// Create a button view.
    pub fn new(id: ButtonId, frame: Rect) -> Self {
        Self { id, frame }
    }
}

/// Horizontal layout direction of the host control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Callback invoked when an installed long-press recognizer begins.
pub type PressHandler = Arc<dyn Fn() + Send + Sync>;

/// A host-provided tab bar control.
pub trait TabBarHost: Send + Sync {
    /// Identity of this control instance.
    fn host_id(&self) -> HostId;

    /// The bar items currently shown, in logical order.
    fn bar_items(&self) -> Vec<BarItem>;

    /// The full tab collection, if the host uses value descriptors.
    fn tabs(&self) -> Vec<Tab>;

    /// The full page collection, if the host uses page-backed descriptors.
    fn pages(&self) -> Vec<Page>;

    /// The change notifier instrumenting this control's item collection.
    ///
    /// `None` when the collection cannot be observed; the coordinator then
    /// only re-synchronizes on its own explicit calls.
    fn notifier(&self) -> Option<Arc<ItemsChangeNotifier>> {
        None
    }

    /// Look up the button view representing `item`.
    fn button_for_item(&self, item: ItemId) -> Option<ButtonView>;

    /// All interactive controls directly under the bar, in any order.
    fn interactive_controls(&self) -> Vec<ButtonView>;

    /// Layout direction of the bar.
    fn layout_direction(&self) -> LayoutDirection {
        LayoutDirection::LeftToRight
    }

    /// Bounds of the container the bar lives in.
    fn bounds(&self) -> Rect;

    /// Current frame of a button, or `None` if it left the view hierarchy.
    fn button_frame(&self, button: ButtonId) -> Option<Rect>;

    /// Returns true while the control is transitioning between items.
    fn is_transitioning(&self) -> bool {
        false
    }

    /// Install a long-press recognizer on a button.
    fn install_long_press(
        &self,
        button: ButtonId,
        minimum_duration: Duration,
        on_begin: PressHandler,
    ) -> RecognizerId;

    /// Remove a recognizer previously installed with
    /// [`install_long_press`](Self::install_long_press).
    fn remove_long_press(&self, button: ButtonId, recognizer: RecognizerId);

    /// Clear any highlighted or tracking state left on a button.
    fn cancel_tracking(&self, button: ButtonId);

    /// Create the invisible control that anchors presented menus.
    fn create_menu_host(&self) -> Arc<dyn MenuHost>;

    /// Placement used when the delegate does not override it.
    fn default_placement(&self) -> Placement {
        Placement::Inside
    }
}

/// The invisible presentation trigger menus are anchored to.
pub trait MenuHost: Send + Sync {
    /// Move the trigger to a point in container coordinates.
    fn set_anchor(&self, point: Point);

    /// Current trigger position.
    fn anchor(&self) -> Point;

    /// Apply an element ordering hint.
    fn set_element_order(&self, _order: ElementOrder) {}

    /// Present a resolved plan, replacing whatever plan was associated before.
    fn present(&self, plan: &MenuPlan);

    /// Replace the content of the visible menu.
    fn update(&self, menu: &Menu);

    /// Returns true while a menu is visible.
    fn is_presenting(&self) -> bool;

    /// Dismiss the visible menu, if any.
    fn dismiss(&self);

    /// Remove the trigger from the view hierarchy.
    fn remove(&self);
}
