//! Scriptable host, delegate and menu host for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tab_menu::{
    BarItem, ButtonId, ButtonView, Capabilities, ElementOrder, HostId, ItemId, ItemsChangeNotifier,
    LayoutDirection, Menu, MenuAction, MenuHost, MenuPlan, Page, PageHandle, Placement,
    PlacementContext, Point, PressHandler, RecognizerId, Rect, Tab, TabBarHost, TabMenuDelegate,
};

pub const BUTTON_WIDTH: f32 = 60.0;
pub const BAR_HEIGHT: f32 = 49.0;
pub const MORE_ITEM: ItemId = ItemId(u64::MAX);

static NEXT_RECOGNIZER_ID: AtomicU64 = AtomicU64::new(1);

/// Install a test subscriber once; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Tabs,
    Pages,
}

#[derive(Clone)]
pub struct Recognizer {
    pub button: ButtonId,
    pub duration: Duration,
    pub handler: PressHandler,
}

struct BarState {
    model: Model,
    count: usize,
    /// Visible item count before the host collapses the rest into "More".
    collapse_after: Option<usize>,
    direct_lookup: bool,
    direction: LayoutDirection,
    transitioning: bool,
    hidden_buttons: HashSet<ButtonId>,
    /// Number of interactive controls, when it differs from the visible count.
    control_count: Option<usize>,
    recognizers: HashMap<RecognizerId, Recognizer>,
    installs: usize,
    tracking_cancelled: Vec<ButtonId>,
    menu_hosts: Vec<Arc<MockMenuHost>>,
    placement: Placement,
}

/// A tab bar laying out one fixed-width button per visible item.
pub struct MockTabBar {
    id: HostId,
    notifier: Option<Arc<ItemsChangeNotifier>>,
    state: Mutex<BarState>,
}

impl MockTabBar {
    pub fn with_tabs(id: u64, count: usize) -> Arc<Self> {
        Self::build(id, Model::Tabs, count, true)
    }

    pub fn with_pages(id: u64, count: usize) -> Arc<Self> {
        Self::build(id, Model::Pages, count, true)
    }

    /// A bar whose item collection cannot be observed.
    pub fn unobserved(id: u64, count: usize) -> Arc<Self> {
        Self::build(id, Model::Tabs, count, false)
    }

    fn build(id: u64, model: Model, count: usize, observed: bool) -> Arc<Self> {
        Arc::new(Self {
            id: HostId(id),
            notifier: observed.then(|| Arc::new(ItemsChangeNotifier::new())),
            state: Mutex::new(BarState {
                model,
                count,
                collapse_after: None,
                direct_lookup: true,
                direction: LayoutDirection::LeftToRight,
                transitioning: false,
                hidden_buttons: HashSet::new(),
                control_count: None,
                recognizers: HashMap::new(),
                installs: 0,
                tracking_cancelled: Vec::new(),
                menu_hosts: Vec::new(),
                placement: Placement::Inside,
            }),
        })
    }

    pub fn items_notifier(&self) -> &Arc<ItemsChangeNotifier> {
        self.notifier.as_ref().expect("bar is not observed")
    }

    /// Change the item count as one mutation.
    pub fn set_count(&self, count: usize) {
        let apply = || self.state.lock().count = count;
        match &self.notifier {
            Some(notifier) => notifier.mutate(apply),
            None => apply(),
        }
    }

    pub fn collapse_after(&self, visible: usize) {
        self.state.lock().collapse_after = Some(visible);
    }

    pub fn set_direct_lookup(&self, enabled: bool) {
        self.state.lock().direct_lookup = enabled;
    }

    pub fn set_direction(&self, direction: LayoutDirection) {
        self.state.lock().direction = direction;
    }

    pub fn set_transitioning(&self, transitioning: bool) {
        self.state.lock().transitioning = transitioning;
    }

    pub fn hide_button(&self, button: ButtonId) {
        self.state.lock().hidden_buttons.insert(button);
    }

    /// Report `count` interactive controls, laid out left to right from slot 0.
    pub fn set_control_count(&self, count: usize) {
        self.state.lock().control_count = Some(count);
    }

    pub fn set_default_placement(&self, placement: Placement) {
        self.state.lock().placement = placement;
    }

    /// Button id of the visual slot `slot`, counted from the left edge.
    pub fn button_id(&self, slot: usize) -> ButtonId {
        ButtonId(self.id.0 * 1000 + slot as u64)
    }

    /// Button at a logical index, honoring the layout direction.
    pub fn button_for_index(&self, index: usize) -> ButtonId {
        let (visible, direction) = {
            let state = self.state.lock();
            (Self::visible_count(&state), state.direction)
        };
        match direction {
            LayoutDirection::LeftToRight => self.button_id(index),
            LayoutDirection::RightToLeft => self.button_id(visible - 1 - index),
        }
    }

    pub fn recognizers(&self) -> HashMap<RecognizerId, Recognizer> {
        self.state.lock().recognizers.clone()
    }

    pub fn recognizer_count(&self) -> usize {
        self.state.lock().recognizers.len()
    }

    /// Total recognizers ever installed on this bar.
    pub fn install_count(&self) -> usize {
        self.state.lock().installs
    }

    pub fn recognizer_on(&self, button: ButtonId) -> Option<Recognizer> {
        self.state
            .lock()
            .recognizers
            .values()
            .find(|r| r.button == button)
            .cloned()
    }

    /// Fire the long-press recognizer on the button showing `index`.
    ///
    /// Returns false if no recognizer is installed there.
    pub fn long_press(&self, index: usize) -> bool {
        let button = self.button_for_index(index);
        match self.recognizer_on(button) {
            Some(recognizer) => {
                (recognizer.handler)();
                true
            }
            None => false,
        }
    }

    /// Tap the item at `index`, returning whether the host may activate it.
    pub fn tap(&self, index: usize) -> bool {
        let item = self.bar_items()[index].clone();
        match &self.notifier {
            Some(notifier) => notifier.should_activate(self.id, &item),
            None => true,
        }
    }

    pub fn tracking_cancelled(&self) -> Vec<ButtonId> {
        self.state.lock().tracking_cancelled.clone()
    }

    pub fn menu_hosts(&self) -> Vec<Arc<MockMenuHost>> {
        self.state.lock().menu_hosts.clone()
    }

    pub fn menu_host(&self) -> Option<Arc<MockMenuHost>> {
        self.state.lock().menu_hosts.last().cloned()
    }

    fn visible_count(state: &BarState) -> usize {
        match state.collapse_after {
            Some(visible) if state.count > visible && visible > 0 => visible,
            _ => state.count,
        }
    }

    fn slot_frame(slot: usize) -> Rect {
        Rect::new(slot as f32 * BUTTON_WIDTH, 0.0, BUTTON_WIDTH, BAR_HEIGHT)
    }

    fn slot_of(&self, button: ButtonId) -> Option<usize> {
        let raw = button.0.checked_sub(self.id.0 * 1000)?;
        let slot = usize::try_from(raw).ok()?;
        (slot < Self::visible_count(&self.state.lock())).then_some(slot)
    }

    fn view(&self, slot: usize) -> ButtonView {
        ButtonView::new(self.button_id(slot), Self::slot_frame(slot))
    }
}

impl TabBarHost for MockTabBar {
    fn host_id(&self) -> HostId {
        self.id
    }

    fn bar_items(&self) -> Vec<BarItem> {
        let state = self.state.lock();
        let visible = Self::visible_count(&state);
        let mut items: Vec<BarItem> = (0..visible)
            .map(|i| BarItem::new(ItemId(i as u64), format!("Item {i}")))
            .collect();
        if visible < state.count {
            items[visible - 1] = BarItem::new(MORE_ITEM, "More");
        }
        items
    }

    fn tabs(&self) -> Vec<Tab> {
        let state = self.state.lock();
        match state.model {
            Model::Tabs => (0..state.count)
                .map(|i| Tab::new(format!("tab-{i}"), format!("Tab {i}")))
                .collect(),
            Model::Pages => Vec::new(),
        }
    }

    fn pages(&self) -> Vec<Page> {
        let state = self.state.lock();
        match state.model {
            Model::Pages => (0..state.count)
                .map(|i| Page::new(PageHandle(i as u64), format!("Page {i}")))
                .collect(),
            Model::Tabs => Vec::new(),
        }
    }

    fn notifier(&self) -> Option<Arc<ItemsChangeNotifier>> {
        self.notifier.clone()
    }

    fn button_for_item(&self, item: ItemId) -> Option<ButtonView> {
        let (direct, visible, direction) = {
            let state = self.state.lock();
            (state.direct_lookup, Self::visible_count(&state), state.direction)
        };
        if !direct {
            return None;
        }
        let index = if item == MORE_ITEM {
            visible.checked_sub(1)?
        } else {
            usize::try_from(item.0).ok().filter(|i| *i < visible)?
        };
        let slot = match direction {
            LayoutDirection::LeftToRight => index,
            LayoutDirection::RightToLeft => visible - 1 - index,
        };
        Some(self.view(slot))
    }

    fn interactive_controls(&self) -> Vec<ButtonView> {
        let count = {
            let state = self.state.lock();
            state.control_count.unwrap_or_else(|| Self::visible_count(&state))
        };
        // Subview order is unrelated to visual order.
        let mut controls: Vec<ButtonView> = (0..count).map(|slot| self.view(slot)).collect();
        controls.rotate_left(count / 2);
        controls
    }

    fn layout_direction(&self) -> LayoutDirection {
        self.state.lock().direction
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 390.0, 844.0)
    }

    fn button_frame(&self, button: ButtonId) -> Option<Rect> {
        if self.state.lock().hidden_buttons.contains(&button) {
            return None;
        }
        self.slot_of(button).map(Self::slot_frame)
    }

    fn is_transitioning(&self) -> bool {
        self.state.lock().transitioning
    }

    fn install_long_press(
        &self,
        button: ButtonId,
        minimum_duration: Duration,
        on_begin: PressHandler,
    ) -> RecognizerId {
        let id = RecognizerId(NEXT_RECOGNIZER_ID.fetch_add(1, Ordering::Relaxed));
        let mut state = self.state.lock();
        state.installs += 1;
        state.recognizers.insert(
            id,
            Recognizer {
                button,
                duration: minimum_duration,
                handler: on_begin,
            },
        );
        id
    }

    fn remove_long_press(&self, button: ButtonId, recognizer: RecognizerId) {
        let removed = self.state.lock().recognizers.remove(&recognizer);
        assert!(
            removed.is_some_and(|r| r.button == button),
            "removed a recognizer that was not installed on {button:?}"
        );
    }

    fn cancel_tracking(&self, button: ButtonId) {
        self.state.lock().tracking_cancelled.push(button);
    }

    fn create_menu_host(&self) -> Arc<dyn MenuHost> {
        let host = Arc::new(MockMenuHost::default());
        self.state.lock().menu_hosts.push(host.clone());
        host
    }

    fn default_placement(&self) -> Placement {
        self.state.lock().placement
    }
}

#[derive(Debug, Default)]
struct MenuHostState {
    anchor: Option<Point>,
    order: ElementOrder,
    presented: Vec<MenuPlan>,
    updates: Vec<Menu>,
    presenting: bool,
    dismissed: usize,
    removed: bool,
}

/// Records everything the coordinator does to the presentation trigger.
#[derive(Debug, Default)]
pub struct MockMenuHost {
    state: Mutex<MenuHostState>,
}

impl MockMenuHost {
    pub fn presented(&self) -> Vec<MenuPlan> {
        self.state.lock().presented.clone()
    }

    pub fn updates(&self) -> Vec<Menu> {
        self.state.lock().updates.clone()
    }

    pub fn anchor_point(&self) -> Option<Point> {
        self.state.lock().anchor
    }

    pub fn element_order(&self) -> ElementOrder {
        self.state.lock().order
    }

    pub fn dismissed(&self) -> usize {
        self.state.lock().dismissed
    }

    pub fn is_removed(&self) -> bool {
        self.state.lock().removed
    }

    /// Simulate the user closing the menu.
    pub fn close(&self) {
        self.state.lock().presenting = false;
    }
}

impl MenuHost for MockMenuHost {
    fn set_anchor(&self, point: Point) {
        self.state.lock().anchor = Some(point);
    }

    fn anchor(&self) -> Point {
        self.state.lock().anchor.unwrap_or(Point::ZERO)
    }

    fn set_element_order(&self, order: ElementOrder) {
        self.state.lock().order = order;
    }

    fn present(&self, plan: &MenuPlan) {
        let mut state = self.state.lock();
        state.presented.push(plan.clone());
        state.presenting = true;
    }

    fn update(&self, menu: &Menu) {
        self.state.lock().updates.push(menu.clone());
    }

    fn is_presenting(&self) -> bool {
        self.state.lock().presenting
    }

    fn dismiss(&self) {
        let mut state = self.state.lock();
        state.dismissed += 1;
        state.presenting = false;
    }

    fn remove(&self) {
        self.state.lock().removed = true;
    }
}

/// What a delegate call was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Tab(String),
    Page(PageHandle),
    OverflowTabs(Vec<String>),
    OverflowPages(Vec<PageHandle>),
}

/// A delegate returning one-action menus titled after what it was asked for.
pub struct MockDelegate {
    capabilities: Capabilities,
    placement: Option<Placement>,
    manual_anchor: Option<(Point, ElementOrder)>,
    declined: HashSet<String>,
    queries: Mutex<Vec<Query>>,
}

impl MockDelegate {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            placement: None,
            manual_anchor: None,
            declined: HashSet::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn tabs() -> Self {
        Self::new(Capabilities::TAB_MENU | Capabilities::OVERFLOW_TAB_MENU)
    }

    pub fn pages() -> Self {
        Self::new(Capabilities::PAGE_MENU | Capabilities::OVERFLOW_PAGE_MENU)
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Position the trigger by hand and return [`Placement::Manual`].
    pub fn with_manual_anchor(mut self, point: Point, order: ElementOrder) -> Self {
        self.manual_anchor = Some((point, order));
        self
    }

    /// Return no menu for the tab with this identifier.
    pub fn declining(mut self, identifier: &str) -> Self {
        self.declined.insert(identifier.to_owned());
        self
    }

    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().clone()
    }

    fn menu(title: String) -> Menu {
        Menu::new(title).with_action(MenuAction::new("close", "Close"))
    }

    fn placement(&self, context: &PlacementContext<'_>) -> Option<Placement> {
        if let Some((point, order)) = self.manual_anchor {
            context.menu_host.set_anchor(point);
            context.menu_host.set_element_order(order);
            return Some(Placement::Manual);
        }
        self.placement
    }
}

impl TabMenuDelegate for MockDelegate {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn menu_for_tab(&self, tab: &Tab) -> Option<Menu> {
        self.queries.lock().push(Query::Tab(tab.identifier.clone()));
        (!self.declined.contains(&tab.identifier)).then(|| Self::menu(tab.title.clone()))
    }

    fn menu_for_page(&self, page: &Page) -> Option<Menu> {
        self.queries.lock().push(Query::Page(page.handle));
        Some(Self::menu(page.title.clone()))
    }

    fn overflow_menu_for_tabs(&self, tabs: &[Tab]) -> Option<Menu> {
        self.queries.lock().push(Query::OverflowTabs(
            tabs.iter().map(|t| t.identifier.clone()).collect(),
        ));
        Some(Self::menu(format!("{} more", tabs.len())))
    }

    fn overflow_menu_for_pages(&self, pages: &[Page]) -> Option<Menu> {
        self.queries
            .lock()
            .push(Query::OverflowPages(pages.iter().map(|p| p.handle).collect()));
        Some(Self::menu(format!("{} more", pages.len())))
    }

    fn placement_for_tab(&self, _tab: &Tab, context: &PlacementContext<'_>) -> Option<Placement> {
        self.placement(context)
    }

    fn placement_for_page(
        &self,
        _page: &Page,
        context: &PlacementContext<'_>,
    ) -> Option<Placement> {
        self.placement(context)
    }

    fn placement_for_overflow_tabs(
        &self,
        _tabs: &[Tab],
        context: &PlacementContext<'_>,
    ) -> Option<Placement> {
        self.placement(context)
    }

    fn placement_for_overflow_pages(
        &self,
        _pages: &[Page],
        context: &PlacementContext<'_>,
    ) -> Option<Placement> {
        self.placement(context)
    }
}
