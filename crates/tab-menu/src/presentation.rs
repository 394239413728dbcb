//! Deferred menu presentation.
//!
//! A long press is recognized while the host is still handling the touch, and
//! the same touch may be starting a transition to another tab. Presenting
//! right away would anchor the menu to a layout that is about to change, so
//! presentation is posted to the main-context [`TaskQueue`] and runs one turn
//! later, after re-validating that it still makes sense.
//!
//! [`PresentationScheduler`] keeps at most one attempt in flight: scheduling
//! a new attempt cancels the previous one, and an attempt that was cancelled
//! after its task started checks a token and bails out before touching
//! anything visible.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tab_menu_core::logging::targets;
use tab_menu_core::{Rect, TaskId, TaskQueue};

use crate::delegate::{PlacementContext, TabMenuDelegate};
use crate::error::{Resolution, SkipReason};
use crate::host::{ButtonId, MenuHost, TabBarHost};
use crate::menu::{Menu, MenuPlan};
use crate::router::MenuRequest;

/// Layout facts captured for one presentation attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationContext {
    pub container_bounds: Rect,
    /// Frame of the triggering button.
    pub anchor_frame: Rect,
}

impl PresentationContext {
    /// Capture the context immediately before presenting.
    ///
    /// Fails if the button is no longer part of a live view hierarchy, or
    /// while the host is transitioning between items.
    pub fn validate(host: &dyn TabBarHost, button: ButtonId) -> Resolution<Self> {
        let anchor_frame = host.button_frame(button).ok_or(SkipReason::ViewDetached)?;
        if host.is_transitioning() {
            return Err(SkipReason::TransitionInFlight);
        }
        Ok(Self {
            container_bounds: host.bounds(),
            anchor_frame,
        })
    }
}

/// Everything needed to present one resolved menu.
pub(crate) struct PresentationAttempt {
    pub(crate) generation: u64,
    pub(crate) button: ButtonId,
    pub(crate) delegate: Arc<dyn TabMenuDelegate>,
    pub(crate) request: MenuRequest,
    pub(crate) content: Menu,
}

impl PresentationAttempt {
    /// Resolve the plan and present it on `menu_host`.
    pub(crate) fn present(
        self,
        host: &dyn TabBarHost,
        menu_host: &dyn MenuHost,
        context: PresentationContext,
    ) -> MenuPlan {
        let placement_context = PlacementContext {
            button_frame: context.anchor_frame,
            container_bounds: context.container_bounds,
            menu_host,
        };
        let placement = self
            .request
            .placement(&*self.delegate, &placement_context)
            .unwrap_or_else(|| host.default_placement());

        let plan = MenuPlan::new(self.content, placement, context.anchor_frame);
        if let Some(anchor) = plan.anchor {
            menu_host.set_anchor(anchor);
        }
        menu_host.present(&plan);
        host.cancel_tracking(self.button);

        tracing::debug!(
            target: targets::PRESENTATION,
            target_kind = ?self.request.target(),
            ?placement,
            "menu presented"
        );
        plan
    }
}

/// The in-flight attempt.
#[derive(Debug, Clone, Copy)]
struct PendingAttempt {
    task: TaskId,
    token: u64,
}

/// Keeps at most one deferred presentation attempt in flight.
pub struct PresentationScheduler {
    queue: Arc<TaskQueue>,
    pending: Arc<Mutex<Option<PendingAttempt>>>,
    next_token: AtomicU64,
}

impl PresentationScheduler {
    /// Create a scheduler posting to `queue`.
    pub fn new(queue: Arc<TaskQueue>) -> Self {
        Self {
            queue,
            pending: Arc::new(Mutex::new(None)),
            next_token: AtomicU64::new(1),
        }
    }

    /// Schedule `attempt` for the next turn, cancelling any in-flight attempt.
    pub fn schedule<F>(&self, attempt: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let pending = self.pending.clone();

        let mut slot = self.pending.lock();
        if let Some(previous) = slot.take() {
            self.queue.cancel(previous.task);
            tracing::debug!(
                target: targets::PRESENTATION,
                reason = %SkipReason::Superseded,
                "presentation attempt cancelled"
            );
        }

        let task = self.queue.post(move || {
            let current = {
                let mut slot = pending.lock();
                if slot.as_ref().is_some_and(|p| p.token == token) {
                    *slot = None;
                    true
                } else {
                    false
                }
            };
            if current {
                attempt();
            } else {
                tracing::debug!(
                    target: targets::PRESENTATION,
                    reason = %SkipReason::Superseded,
                    "presentation attempt abandoned"
                );
            }
        });
        *slot = Some(PendingAttempt { task, token });
        task
    }

    /// Cancel the in-flight attempt.
    ///
    /// Returns `true` if an attempt was pending.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(previous) => {
                self.queue.cancel(previous.task);
                true
            }
            None => false,
        }
    }

    /// Returns true while an attempt is waiting to run.
    pub fn has_pending(&self) -> bool {
        self.pending.lock().is_some()
    }
}

impl std::fmt::Debug for PresentationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationScheduler")
            .field("pending", &*self.pending.lock())
            .finish_non_exhaustive()
    }
}
