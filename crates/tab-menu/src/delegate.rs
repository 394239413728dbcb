//! The application-facing delegate.
//!
//! A delegate supplies menu content for one of the two content models and,
//! optionally, placement overrides. Which menu methods it implements is
//! declared through [`TabMenuDelegate::capabilities`]; the coordinator reads
//! the declaration once per delegate assignment.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use tab_menu_core::Rect;

use crate::host::MenuHost;
use crate::item::{Page, Tab};
use crate::menu::{Menu, Placement};

/// The menu-supplying methods a delegate implements.
///
/// These flags can be combined using bitwise OR operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No menus are supplied.
    pub const NONE: Capabilities = Capabilities(0);

    /// [`TabMenuDelegate::menu_for_tab`] is implemented.
    pub const TAB_MENU: Capabilities = Capabilities(1 << 0);

    /// [`TabMenuDelegate::menu_for_page`] is implemented.
    pub const PAGE_MENU: Capabilities = Capabilities(1 << 1);

    /// [`TabMenuDelegate::overflow_menu_for_tabs`] is implemented.
    pub const OVERFLOW_TAB_MENU: Capabilities = Capabilities(1 << 2);

    /// [`TabMenuDelegate::overflow_menu_for_pages`] is implemented.
    pub const OVERFLOW_PAGE_MENU: Capabilities = Capabilities(1 << 3);

    /// Check if the given flags are all set.
    pub fn contains(&self, other: Capabilities) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns true if no flag is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Capabilities(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capabilities {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Capabilities {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Capabilities(self.0 & rhs.0)
    }
}

/// What a placement override gets to look at.
pub struct PlacementContext<'a> {
    /// Frame of the triggering button in container coordinates.
    pub button_frame: Rect,
    /// Bounds of the container.
    pub container_bounds: Rect,
    /// The presentation trigger; [`Placement::Manual`] overrides position it
    /// themselves before returning.
    pub menu_host: &'a dyn MenuHost,
}

impl std::fmt::Debug for PlacementContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacementContext")
            .field("button_frame", &self.button_frame)
            .field("container_bounds", &self.container_bounds)
            .finish_non_exhaustive()
    }
}

/// Supplies menus for a tab bar.
///
/// Every method has a default that supplies nothing. Implement the menu
/// methods for the content model your host uses and declare them in
/// [`capabilities`](Self::capabilities).
pub trait TabMenuDelegate: Send + Sync {
    /// The menu methods this delegate implements.
    fn capabilities(&self) -> Capabilities;

    /// Menu for a single value-descriptor tab.
    fn menu_for_tab(&self, _tab: &Tab) -> Option<Menu> {
        None
    }

    /// Menu for a single page-backed tab.
    fn menu_for_page(&self, _page: &Page) -> Option<Menu> {
        None
    }

    /// Menu for the tabs collapsed into the overflow slot, in logical order.
    fn overflow_menu_for_tabs(&self, _tabs: &[Tab]) -> Option<Menu> {
        None
    }

    /// Menu for the pages collapsed into the overflow slot, in logical order.
    fn overflow_menu_for_pages(&self, _pages: &[Page]) -> Option<Menu> {
        None
    }

    /// Placement override for a tab's menu.
    fn placement_for_tab(&self, _tab: &Tab, _context: &PlacementContext<'_>) -> Option<Placement> {
        None
    }

    /// Placement override for a page's menu.
    fn placement_for_page(
        &self,
        _page: &Page,
        _context: &PlacementContext<'_>,
    ) -> Option<Placement> {
        None
    }

    /// Placement override for the overflow menu of tabs.
    fn placement_for_overflow_tabs(
        &self,
        _tabs: &[Tab],
        _context: &PlacementContext<'_>,
    ) -> Option<Placement> {
        None
    }

    /// Placement override for the overflow menu of pages.
    fn placement_for_overflow_pages(
        &self,
        _pages: &[Page],
        _context: &PlacementContext<'_>,
    ) -> Option<Placement> {
        None
    }
}
