//! The view/gesture coordinator.
//!
//! [`TabMenuCoordinator`] attaches to one [`TabBarHost`] at a time and keeps a
//! long-press recognizer on every visible tab button, re-synchronizing
//! whenever the host's items, the configuration or the delegate change. A
//! recognized press is resolved into a [`MenuRequest`] and handed to the
//! [`PresentationScheduler`]; in [`OverflowTrigger::Tap`] mode the host's
//! default activation of the overflow slot is intercepted and replaced with
//! the overflow menu.
//!
//! Every callback the coordinator hands to the host holds only a weak
//! reference plus the attachment generation it was created for, so events
//! arriving for a replaced or dropped attachment are ignored.
//!
//! # Button discovery
//!
//! Buttons are looked up per item first. When that lookup does not find
//! exactly one button per item, the coordinator falls back to the bar's
//! interactive controls ordered by leading edge (see [`discover_buttons`]).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tab_menu_core::logging::targets;
use tab_menu_core::{ConnectionId, TaskQueue};

use crate::config::{Configuration, OverflowTrigger, IMMEDIATE_PRESS_DURATION};
use crate::delegate::TabMenuDelegate;
use crate::error::{Resolution, SkipReason};
use crate::host::{
    ButtonId, ButtonView, HostId, LayoutDirection, MenuHost, PressHandler, RecognizerId,
    TabBarHost,
};
use crate::item::BarItem;
use crate::menu::{Menu, MenuPlan};
use crate::notifier::{ItemsChangeNotifier, SelectionHandlerId};
use crate::overflow::OverflowLayout;
use crate::presentation::{PresentationAttempt, PresentationContext, PresentationScheduler};
use crate::router::{ItemSnapshot, MenuRequest, RequestRouter, Source, SourceSelection};

/// A long-press recognizer installed on a host button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstalledRecognizer {
    pub id: RecognizerId,
    pub button: ButtonId,
    /// Logical index the button was paired with.
    pub index: usize,
    pub minimum_duration: Duration,
}

/// Pair visible buttons with logical indices.
///
/// Direct per-item lookup is used when it yields exactly one button per item.
/// Otherwise all interactive controls are sorted by their leading edge
/// (left edge, ties broken by button id) and reversed for right-to-left
/// layouts, then paired positionally. At most `items.len()` pairs are
/// returned.
pub fn discover_buttons(host: &dyn TabBarHost, items: &[BarItem]) -> Vec<(usize, ButtonView)> {
    let direct: Vec<ButtonView> = items
        .iter()
        .filter_map(|item| host.button_for_item(item.id))
        .collect();
    if direct.len() == items.len() {
        return direct.into_iter().enumerate().collect();
    }

    tracing::debug!(
        target: targets::COORDINATOR,
        found = direct.len(),
        items = items.len(),
        "direct button lookup incomplete, falling back to positional order"
    );
    let mut controls = host.interactive_controls();
    order_by_leading_edge(&mut controls, host.layout_direction());
    controls.into_iter().take(items.len()).enumerate().collect()
}

/// Sort controls so that the first one is at the leading edge.
pub fn order_by_leading_edge(controls: &mut [ButtonView], direction: LayoutDirection) {
    controls.sort_by(|a, b| {
        a.frame
            .left()
            .total_cmp(&b.frame.left())
            .then(a.id.cmp(&b.id))
    });
    if direction == LayoutDirection::RightToLeft {
        controls.reverse();
    }
}

/// Minimum press duration for the button at `index`.
///
/// The overflow slot gets [`IMMEDIATE_PRESS_DURATION`] in tap mode when tabs
/// supply its menu: that model's overflow tap does not reliably reach the
/// selection interceptor.
pub fn press_duration(
    configuration: &Configuration,
    router: &RequestRouter,
    index: usize,
    items: &ItemSnapshot,
) -> Duration {
    let tap_workaround = configuration.overflow_trigger() == OverflowTrigger::Tap
        && router.selection().overflow_source() == Some(Source::Tabs)
        && router.is_overflow_index(index, items);
    if tap_workaround {
        IMMEDIATE_PRESS_DURATION
    } else {
        configuration.minimum_press_duration()
    }
}

/// Binding to the currently attached host.
struct Attachment {
    host: Arc<dyn TabBarHost>,
    host_id: HostId,
    generation: u64,
    notifier: Option<Arc<ItemsChangeNotifier>>,
    connection: Option<ConnectionId>,
    selection_handler: Option<SelectionHandlerId>,
    recognizers: Vec<InstalledRecognizer>,
    menu_host: Option<Arc<dyn MenuHost>>,
}

struct State {
    configuration: Configuration,
    delegate: Option<Arc<dyn TabMenuDelegate>>,
    selection: SourceSelection,
    attachment: Option<Attachment>,
}

/// What callbacks need from the state, copied out so no lock is held while
/// calling into the host or the delegate.
#[derive(Clone)]
struct Session {
    host: Arc<dyn TabBarHost>,
    host_id: HostId,
    generation: u64,
    configuration: Configuration,
    delegate: Option<Arc<dyn TabMenuDelegate>>,
    selection: SourceSelection,
}

impl Session {
    fn router(&self) -> RequestRouter {
        RequestRouter::new(OverflowLayout::from(&self.configuration), self.selection)
    }
}

struct Inner {
    state: Mutex<State>,
    scheduler: PresentationScheduler,
    next_generation: AtomicU64,
}

/// Coordinates tab menus for one host control at a time.
pub struct TabMenuCoordinator {
    inner: Arc<Inner>,
}

impl TabMenuCoordinator {
    /// Create a detached coordinator with the default configuration.
    pub fn new(queue: Arc<TaskQueue>) -> Self {
        Self::with_configuration(queue, Configuration::default())
    }

    /// Create a detached coordinator.
    pub fn with_configuration(queue: Arc<TaskQueue>, configuration: Configuration) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    configuration,
                    delegate: None,
                    selection: SourceSelection::NONE,
                    attachment: None,
                }),
                scheduler: PresentationScheduler::new(queue),
                next_generation: AtomicU64::new(1),
            }),
        }
    }

    /// The current configuration.
    pub fn configuration(&self) -> Configuration {
        self.inner.state.lock().configuration
    }

    /// Replace the configuration; re-synchronizes if it changed.
    pub fn set_configuration(&self, configuration: Configuration) {
        {
            let mut state = self.inner.state.lock();
            if state.configuration == configuration {
                return;
            }
            state.configuration = configuration;
        }
        self.inner.synchronize();
    }

    /// The assigned delegate.
    pub fn delegate(&self) -> Option<Arc<dyn TabMenuDelegate>> {
        self.inner.state.lock().delegate.clone()
    }

    /// Assign or clear the delegate and re-synchronize.
    ///
    /// The delegate's capabilities are read here, once.
    pub fn set_delegate(&self, delegate: Option<Arc<dyn TabMenuDelegate>>) {
        {
            let mut state = self.inner.state.lock();
            state.selection = SourceSelection::for_delegate(delegate.as_deref());
            state.delegate = delegate;
            tracing::debug!(
                target: targets::COORDINATOR,
                selection = ?state.selection,
                "delegate assigned"
            );
        }
        self.inner.synchronize();
    }

    /// The source selection derived from the current delegate.
    pub fn selection(&self) -> SourceSelection {
        self.inner.state.lock().selection
    }

    /// Attach to `host`, detaching from any other host first.
    ///
    /// Attaching to the host that is already attached only re-synchronizes.
    pub fn attach(&self, host: Arc<dyn TabBarHost>) {
        self.inner.attach(host);
    }

    /// Detach from the current host. Does nothing when detached.
    pub fn detach(&self) {
        self.inner.detach();
    }

    /// Reinstall recognizers for the current items, configuration and delegate.
    pub fn synchronize(&self) {
        self.inner.synchronize();
    }

    /// Returns true while attached to a host.
    pub fn is_attached(&self) -> bool {
        self.inner.state.lock().attachment.is_some()
    }

    /// Identity of the attached host.
    pub fn attached_host(&self) -> Option<HostId> {
        self.inner
            .state
            .lock()
            .attachment
            .as_ref()
            .map(|attachment| attachment.host_id)
    }

    /// The recognizers currently installed on the attached host.
    pub fn installed_recognizers(&self) -> Vec<InstalledRecognizer> {
        self.inner
            .state
            .lock()
            .attachment
            .as_ref()
            .map(|attachment| attachment.recognizers.clone())
            .unwrap_or_default()
    }

    /// Returns true while a presentation attempt is waiting to run.
    pub fn has_pending_presentation(&self) -> bool {
        self.inner.scheduler.has_pending()
    }

    /// Request the menu for `index` as if its button had been long-pressed.
    ///
    /// Returns `true` if a presentation attempt was scheduled.
    pub fn present_menu(&self, index: usize) -> bool {
        self.inner.present_menu(index)
    }

    /// Replace the content of the visible menu.
    ///
    /// Returns `false` if no menu is currently presented.
    pub fn update_visible_menu(&self, menu: Menu) -> bool {
        let menu_host = self
            .inner
            .state
            .lock()
            .attachment
            .as_ref()
            .and_then(|attachment| attachment.menu_host.clone());
        match menu_host {
            Some(menu_host) if menu_host.is_presenting() => {
                menu_host.update(&menu);
                true
            }
            _ => false,
        }
    }
}

impl Drop for TabMenuCoordinator {
    fn drop(&mut self) {
        self.inner.detach();
    }
}

impl std::fmt::Debug for TabMenuCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("TabMenuCoordinator")
            .field("configuration", &state.configuration)
            .field("selection", &state.selection)
            .field("attached_host", &state.attachment.as_ref().map(|a| a.host_id))
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(TabMenuCoordinator: Send, Sync);

impl Inner {
    fn session(&self) -> Option<Session> {
        let state = self.state.lock();
        let attachment = state.attachment.as_ref()?;
        Some(Session {
            host: attachment.host.clone(),
            host_id: attachment.host_id,
            generation: attachment.generation,
            configuration: state.configuration,
            delegate: state.delegate.clone(),
            selection: state.selection,
        })
    }

    fn session_for(&self, generation: u64) -> Resolution<Session> {
        let session = self.session().ok_or(SkipReason::Detached)?;
        if session.generation != generation {
            return Err(SkipReason::Stale);
        }
        Ok(session)
    }

    fn attach(self: &Arc<Self>, host: Arc<dyn TabBarHost>) {
        let host_id = host.host_id();
        if self.session().is_some_and(|s| s.host_id == host_id) {
            tracing::trace!(target: targets::COORDINATOR, ?host_id, "already attached");
            self.synchronize();
            return;
        }

        self.detach();

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let notifier = host.notifier();
        if notifier.is_none() {
            tracing::debug!(
                target: targets::COORDINATOR,
                ?host_id,
                "host items are not observable, synchronizing on explicit calls only"
            );
        }
        self.state.lock().attachment = Some(Attachment {
            host,
            host_id,
            generation,
            notifier: notifier.clone(),
            connection: None,
            selection_handler: None,
            recognizers: Vec::new(),
            menu_host: None,
        });
        tracing::debug!(target: targets::COORDINATOR, ?host_id, generation, "attached");

        if let Some(notifier) = notifier {
            let weak = Arc::downgrade(self);
            let connection = notifier.items_changed.connect(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_items_changed(generation);
                }
            });

            let weak = Arc::downgrade(self);
            let handler = notifier.install_selection_handler(Arc::new(
                move |host_id: HostId, item: &BarItem| {
                    weak.upgrade()
                        .is_none_or(|inner| inner.should_activate(generation, host_id, item))
                },
            ));

            let stored = {
                let mut state = self.state.lock();
                match state.attachment.as_mut() {
                    Some(attachment) if attachment.generation == generation => {
                        attachment.connection = Some(connection);
                        attachment.selection_handler = Some(handler);
                        true
                    }
                    _ => false,
                }
            };
            if !stored {
                notifier.items_changed.disconnect(connection);
                notifier.remove_selection_handler(handler);
                return;
            }
        }

        self.synchronize();
    }

    fn detach(&self) {
        self.scheduler.cancel();

        let Some(attachment) = self.state.lock().attachment.take() else {
            return;
        };

        for recognizer in &attachment.recognizers {
            attachment.host.remove_long_press(recognizer.button, recognizer.id);
        }
        if let Some(notifier) = &attachment.notifier {
            if let Some(connection) = attachment.connection {
                notifier.items_changed.disconnect(connection);
            }
            if let Some(handler) = attachment.selection_handler {
                notifier.remove_selection_handler(handler);
            }
        }
        if let Some(menu_host) = &attachment.menu_host {
            menu_host.dismiss();
            menu_host.remove();
        }

        tracing::debug!(
            target: targets::COORDINATOR,
            host_id = ?attachment.host_id,
            removed = attachment.recognizers.len(),
            "detached"
        );
    }

    fn on_items_changed(self: &Arc<Self>, generation: u64) {
        if self.session_for(generation).is_ok() {
            self.synchronize();
        }
    }

    #[tracing::instrument(skip_all, target = "tab_menu::coordinator", level = "trace")]
    fn synchronize(self: &Arc<Self>) {
        let Some(session) = self.session() else {
            tracing::trace!(target: targets::COORDINATOR, "not attached, nothing to synchronize");
            return;
        };
        let host = &*session.host;

        let stale = self.take_recognizers(session.generation);
        for recognizer in &stale {
            host.remove_long_press(recognizer.button, recognizer.id);
        }

        if session.delegate.is_none() || session.selection.is_empty() {
            tracing::debug!(
                target: targets::COORDINATOR,
                removed = stale.len(),
                "no menus can be supplied, recognizers removed"
            );
            return;
        }

        let items = host.bar_items();
        let snapshot = ItemSnapshot::capture(host);
        let router = session.router();

        let installed: Vec<InstalledRecognizer> = discover_buttons(host, &items)
            .into_iter()
            .map(|(index, button)| {
                let minimum_duration =
                    press_duration(&session.configuration, &router, index, &snapshot);
                let id = host.install_long_press(
                    button.id,
                    minimum_duration,
                    self.press_handler(session.generation, index, button.id),
                );
                InstalledRecognizer {
                    id,
                    button: button.id,
                    index,
                    minimum_duration,
                }
            })
            .collect();

        tracing::debug!(
            target: targets::COORDINATOR,
            items = items.len(),
            installed = installed.len(),
            removed = stale.len(),
            "recognizers synchronized"
        );
        self.store_recognizers(&session, installed);
    }

    /// Take the stored recognizers of attachment `generation`.
    fn take_recognizers(&self, generation: u64) -> Vec<InstalledRecognizer> {
        let mut state = self.state.lock();
        match state.attachment.as_mut() {
            Some(attachment) if attachment.generation == generation => {
                std::mem::take(&mut attachment.recognizers)
            }
            _ => Vec::new(),
        }
    }

    /// Store a freshly installed set, removing whatever a nested pass stored
    /// meanwhile. If the attachment changed, the set is removed instead.
    fn store_recognizers(&self, session: &Session, installed: Vec<InstalledRecognizer>) {
        let leftover = {
            let mut state = self.state.lock();
            match state.attachment.as_mut() {
                Some(attachment) if attachment.generation == session.generation => {
                    std::mem::replace(&mut attachment.recognizers, installed)
                }
                _ => installed,
            }
        };
        for recognizer in leftover {
            session.host.remove_long_press(recognizer.button, recognizer.id);
        }
    }

    fn press_handler(
        self: &Arc<Self>,
        generation: u64,
        index: usize,
        button: ButtonId,
    ) -> PressHandler {
        let weak: Weak<Self> = Arc::downgrade(self);
        Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.handle_press(generation, index, button);
            }
        })
    }

    fn handle_press(self: &Arc<Self>, generation: u64, index: usize, button: ButtonId) {
        if let Err(reason) = self.begin_presentation(generation, index, button) {
            tracing::debug!(target: targets::COORDINATOR, index, %reason, "press produced no menu");
        }
    }

    fn present_menu(self: &Arc<Self>, index: usize) -> bool {
        let result = self.session().ok_or(SkipReason::Detached).and_then(|session| {
            let items = session.host.bar_items();
            let button = button_at(&*session.host, &items, index)?;
            self.begin_presentation(session.generation, index, button)
        });
        match result {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(
                    target: targets::COORDINATOR,
                    index,
                    %reason,
                    "programmatic menu request dropped"
                );
                false
            }
        }
    }

    /// Resolve the menu for `index` and schedule its presentation.
    fn begin_presentation(
        self: &Arc<Self>,
        generation: u64,
        index: usize,
        button: ButtonId,
    ) -> Resolution<()> {
        let session = self.session_for(generation)?;
        session.host.button_frame(button).ok_or(SkipReason::ViewDetached)?;
        let items = ItemSnapshot::capture(&*session.host);
        let request = session.router().try_resolve(index, &items)?;
        self.schedule(&session, request, button)
    }

    /// Selection interception for the overflow slot in tap mode.
    fn should_activate(
        self: &Arc<Self>,
        generation: u64,
        host_id: HostId,
        item: &BarItem,
    ) -> bool {
        let Ok(session) = self.session_for(generation) else {
            return true;
        };
        if session.host_id != host_id
            || session.configuration.overflow_trigger() != OverflowTrigger::Tap
        {
            return true;
        }

        let items = session.host.bar_items();
        let Some(index) = items.iter().position(|candidate| candidate.id == item.id) else {
            return true;
        };
        let snapshot = ItemSnapshot::capture(&*session.host);
        let router = session.router();
        if !router.is_overflow_index(index, &snapshot) {
            return true;
        }

        let result = button_at(&*session.host, &items, index).and_then(|button| {
            let request = router.try_resolve_overflow(&snapshot)?;
            self.schedule(&session, request, button)
        });
        match result {
            Ok(()) => {
                tracing::debug!(target: targets::COORDINATOR, index, "overflow tap intercepted");
                false
            }
            Err(reason) => {
                tracing::debug!(
                    target: targets::COORDINATOR,
                    index,
                    %reason,
                    "overflow tap left to the host"
                );
                true
            }
        }
    }

    /// Fetch the menu content and hand the attempt to the scheduler.
    fn schedule(
        self: &Arc<Self>,
        session: &Session,
        request: MenuRequest,
        button: ButtonId,
    ) -> Resolution<()> {
        let delegate = session.delegate.clone().ok_or(SkipReason::NoDelegate)?;
        let content = request.menu(&*delegate)?;
        let attempt = PresentationAttempt {
            generation: session.generation,
            button,
            delegate,
            request,
            content,
        };

        let weak = Arc::downgrade(self);
        self.scheduler.schedule(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Err(reason) = inner.run_attempt(attempt) {
                tracing::debug!(target: targets::PRESENTATION, %reason, "presentation abandoned");
            }
        });
        Ok(())
    }

    /// Re-validate and present. Runs one turn after scheduling.
    fn run_attempt(&self, attempt: PresentationAttempt) -> Resolution<MenuPlan> {
        let session = self.session_for(attempt.generation)?;
        let host = &*session.host;
        let context = PresentationContext::validate(host, attempt.button)?;
        let menu_host = self.menu_host(&session)?;
        Ok(attempt.present(host, &*menu_host, context))
    }

    /// The attachment's menu host, created on first use.
    fn menu_host(&self, session: &Session) -> Resolution<Arc<dyn MenuHost>> {
        let existing = {
            let state = self.state.lock();
            let attachment = state
                .attachment
                .as_ref()
                .filter(|a| a.generation == session.generation)
                .ok_or(SkipReason::Stale)?;
            attachment.menu_host.clone()
        };
        if let Some(menu_host) = existing {
            return Ok(menu_host);
        }

        let created = session.host.create_menu_host();
        let stored = {
            let mut state = self.state.lock();
            match state.attachment.as_mut() {
                Some(attachment) if attachment.generation == session.generation => {
                    Some(attachment.menu_host.get_or_insert(created.clone()).clone())
                }
                _ => None,
            }
        };
        match stored {
            Some(menu_host) => Ok(menu_host),
            None => {
                created.remove();
                Err(SkipReason::Stale)
            }
        }
    }
}

/// The button currently paired with `index`.
fn button_at(host: &dyn TabBarHost, items: &[BarItem], index: usize) -> Resolution<ButtonId> {
    discover_buttons(host, items)
        .into_iter()
        .find(|(candidate, _)| *candidate == index)
        .map(|(_, button)| button.id)
        .ok_or(SkipReason::OutOfRange {
            index,
            count: items.len(),
        })
}
