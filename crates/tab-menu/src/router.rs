//! Request routing.
//!
//! Resolves a logical index into a [`MenuRequest`]: either a single item of
//! the active content model or the overflow slot's batch. The active model is
//! chosen from the delegate's declared [`Capabilities`], tabs before pages,
//! independently for item menus and for overflow menus.

use tab_menu_core::logging::targets;

use crate::delegate::{Capabilities, PlacementContext, TabMenuDelegate};
use crate::error::{Resolution, SkipReason};
use crate::host::TabBarHost;
use crate::item::{Page, Tab};
use crate::menu::{Menu, Placement};
use crate::overflow::OverflowLayout;

/// The two content models a host can describe its items with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Value-type [`Tab`] descriptors.
    Tabs,
    /// Page-backed [`Page`] descriptors.
    Pages,
}

/// Which source supplies item menus and which supplies overflow menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceSelection {
    item: Option<Source>,
    overflow: Option<Source>,
}

impl SourceSelection {
    /// Nothing is supplied.
    pub const NONE: SourceSelection = SourceSelection {
        item: None,
        overflow: None,
    };

    /// Derive the selection from declared capabilities.
    pub fn from_capabilities(capabilities: Capabilities) -> Self {
        let pick = |tabs: Capabilities, pages: Capabilities| {
            if capabilities.contains(tabs) {
                Some(Source::Tabs)
            } else if capabilities.contains(pages) {
                Some(Source::Pages)
            } else {
                None
            }
        };

        Self {
            item: pick(Capabilities::TAB_MENU, Capabilities::PAGE_MENU),
            overflow: pick(Capabilities::OVERFLOW_TAB_MENU, Capabilities::OVERFLOW_PAGE_MENU),
        }
    }

    /// Derive the selection for an optional delegate.
    pub fn for_delegate(delegate: Option<&dyn TabMenuDelegate>) -> Self {
        delegate.map_or(Self::NONE, |d| Self::from_capabilities(d.capabilities()))
    }

    /// Source of per-item menus.
    pub fn item_source(&self) -> Option<Source> {
        self.item
    }

    /// Source of overflow menus.
    pub fn overflow_source(&self) -> Option<Source> {
        self.overflow
    }

    /// Returns true if no menu can ever be resolved.
    pub fn is_empty(&self) -> bool {
        self.item.is_none() && self.overflow.is_none()
    }
}

/// The descriptors of both content models, captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub tabs: Vec<Tab>,
    pub pages: Vec<Page>,
}

impl ItemSnapshot {
    /// Capture the current descriptors from a host.
    pub fn capture(host: &dyn TabBarHost) -> Self {
        Self {
            tabs: host.tabs(),
            pages: host.pages(),
        }
    }

    /// Number of items in a source's collection.
    pub fn count(&self, source: Source) -> usize {
        match source {
            Source::Tabs => self.tabs.len(),
            Source::Pages => self.pages.len(),
        }
    }
}

/// What a resolved request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    /// A single item at a logical index.
    Item(usize),
    /// The overflow slot, whose batch starts at `start`.
    Overflow { start: usize },
}

/// A resolved menu request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRequest {
    Tab { index: usize, tab: Tab },
    Page { index: usize, page: Page },
    OverflowTabs { start: usize, tabs: Vec<Tab> },
    OverflowPages { start: usize, pages: Vec<Page> },
}

impl MenuRequest {
    /// The source this request was resolved from.
    pub fn source(&self) -> Source {
        match self {
            Self::Tab { .. } | Self::OverflowTabs { .. } => Source::Tabs,
            Self::Page { .. } | Self::OverflowPages { .. } => Source::Pages,
        }
    }

    /// What this request targets.
    pub fn target(&self) -> MenuTarget {
        match *self {
            Self::Tab { index, .. } | Self::Page { index, .. } => MenuTarget::Item(index),
            Self::OverflowTabs { start, .. } | Self::OverflowPages { start, .. } => {
                MenuTarget::Overflow { start }
            }
        }
    }

    /// Returns true if this request targets the overflow slot.
    pub fn is_overflow(&self) -> bool {
        matches!(self.target(), MenuTarget::Overflow { .. })
    }

    /// Ask the delegate for this request's menu content.
    pub fn menu(&self, delegate: &dyn TabMenuDelegate) -> Resolution<Menu> {
        let menu = match self {
            Self::Tab { tab, .. } => delegate.menu_for_tab(tab),
            Self::Page { page, .. } => delegate.menu_for_page(page),
            Self::OverflowTabs { tabs, .. } => delegate.overflow_menu_for_tabs(tabs),
            Self::OverflowPages { pages, .. } => delegate.overflow_menu_for_pages(pages),
        };
        menu.ok_or(SkipReason::NoContent)
    }

    /// Ask the delegate for a placement override.
    pub fn placement(
        &self,
        delegate: &dyn TabMenuDelegate,
        context: &PlacementContext<'_>,
    ) -> Option<Placement> {
        match self {
            Self::Tab { tab, .. } => delegate.placement_for_tab(tab, context),
            Self::Page { page, .. } => delegate.placement_for_page(page, context),
            Self::OverflowTabs { tabs, .. } => delegate.placement_for_overflow_tabs(tabs, context),
            Self::OverflowPages { pages, .. } => {
                delegate.placement_for_overflow_pages(pages, context)
            }
        }
    }
}

/// Resolves logical indices against a snapshot of the host's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestRouter {
    layout: OverflowLayout,
    selection: SourceSelection,
}

impl RequestRouter {
    /// Create a router.
    pub fn new(layout: OverflowLayout, selection: SourceSelection) -> Self {
        Self { layout, selection }
    }

    /// The overflow layout in use.
    pub fn layout(&self) -> OverflowLayout {
        self.layout
    }

    /// The source selection in use.
    pub fn selection(&self) -> SourceSelection {
        self.selection
    }

    /// Whether `index` is the overflow slot of the active overflow source.
    pub fn is_overflow_index(&self, index: usize, items: &ItemSnapshot) -> bool {
        self.selection
            .overflow
            .is_some_and(|source| self.layout.is_overflow_index(index, items.count(source)))
    }

    /// Resolve `index` to a request, or `None` when no menu applies.
    pub fn resolve(&self, index: usize, items: &ItemSnapshot) -> Option<MenuRequest> {
        self.try_resolve(index, items)
            .inspect_err(|reason| {
                tracing::debug!(target: targets::ROUTER, index, %reason, "no menu request");
            })
            .ok()
    }

    /// Resolve `index` to a request, reporting why none applies.
    pub fn try_resolve(&self, index: usize, items: &ItemSnapshot) -> Resolution<MenuRequest> {
        if self.is_overflow_index(index, items) {
            return self.try_resolve_overflow(items);
        }
        self.try_resolve_item(index, items)
    }

    /// Resolve a single-item request at `index`.
    pub fn try_resolve_item(&self, index: usize, items: &ItemSnapshot) -> Resolution<MenuRequest> {
        let source = self.selection.item.ok_or(SkipReason::MissingCapability("item"))?;
        let count = items.count(source);
        if self.layout.is_overflow_index(index, count) {
            return Err(SkipReason::OverflowIndex(index));
        }
        let out_of_range = SkipReason::OutOfRange { index, count };

        let request = match source {
            Source::Tabs => MenuRequest::Tab {
                index,
                tab: self.layout.item_at(index, &items.tabs).ok_or(out_of_range)?.clone(),
            },
            Source::Pages => MenuRequest::Page {
                index,
                page: self.layout.item_at(index, &items.pages).ok_or(out_of_range)?.clone(),
            },
        };
        tracing::trace!(target: targets::ROUTER, index, ?source, "resolved item request");
        Ok(request)
    }

    /// Resolve the overflow slot's batch request.
    pub fn try_resolve_overflow(&self, items: &ItemSnapshot) -> Resolution<MenuRequest> {
        let source = self
            .selection
            .overflow
            .ok_or(SkipReason::MissingCapability("overflow"))?;
        let start = self
            .layout
            .overflow_index(items.count(source))
            .ok_or(SkipReason::EmptyOverflow)?;

        let request = match source {
            Source::Tabs => MenuRequest::OverflowTabs {
                start,
                tabs: self.layout.overflow_items(&items.tabs).to_vec(),
            },
            Source::Pages => MenuRequest::OverflowPages {
                start,
                pages: self.layout.overflow_items(&items.pages).to_vec(),
            },
        };
        tracing::trace!(target: targets::ROUTER, start, ?source, "resolved overflow request");
        Ok(request)
    }
}
