//! Per-control menu state.
//!
//! [`TabBarMenu`] is what a host binding stores next to each tab bar control:
//! it owns the control reference, the configuration and the coordinator, and
//! turns delegate assignment into attachment.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tab_menu_core::TaskQueue;

use crate::config::Configuration;
use crate::coordinator::TabMenuCoordinator;
use crate::delegate::TabMenuDelegate;
use crate::host::TabBarHost;
use crate::menu::Menu;

/// Menu support for one tab bar control.
///
/// # Example
///
/// ```ignore
/// let mut menus = TabBarMenu::new(tab_bar.clone(), queue.clone());
/// menus.configuration_mut().set_overflow_trigger(OverflowTrigger::Tap);
/// menus.set_delegate(Some(Arc::new(MyDelegate)));
/// ```
pub struct TabBarMenu {
    host: Arc<dyn TabBarHost>,
    configuration: Configuration,
    coordinator: TabMenuCoordinator,
}

impl TabBarMenu {
    /// Create menu support for `host`. Nothing is attached until a delegate
    /// is assigned.
    pub fn new(host: Arc<dyn TabBarHost>, queue: Arc<TaskQueue>) -> Self {
        Self::with_configuration(host, queue, Configuration::default())
    }

    /// Create menu support with an initial configuration.
    pub fn with_configuration(
        host: Arc<dyn TabBarHost>,
        queue: Arc<TaskQueue>,
        configuration: Configuration,
    ) -> Self {
        Self {
            host,
            configuration,
            coordinator: TabMenuCoordinator::with_configuration(queue, configuration),
        }
    }

    /// The control this menu support belongs to.
    pub fn host(&self) -> &Arc<dyn TabBarHost> {
        &self.host
    }

    /// The underlying coordinator.
    pub fn coordinator(&self) -> &TabMenuCoordinator {
        &self.coordinator
    }

    /// The assigned delegate.
    pub fn delegate(&self) -> Option<Arc<dyn TabMenuDelegate>> {
        self.coordinator.delegate()
    }

    /// Assign the delegate. Assigning one attaches to the control, clearing
    /// it detaches. Either way recognizers are synchronized at most once.
    pub fn set_delegate(&self, delegate: Option<Arc<dyn TabMenuDelegate>>) {
        let attached_here = self.coordinator.attached_host() == Some(self.host.host_id());
        match delegate {
            Some(delegate) if attached_here => self.coordinator.set_delegate(Some(delegate)),
            Some(delegate) => {
                // Stored while detached; `attach` performs the only pass.
                self.coordinator.detach();
                self.coordinator.set_delegate(Some(delegate));
                self.coordinator.attach(self.host.clone());
            }
            None => {
                self.coordinator.detach();
                self.coordinator.set_delegate(None);
            }
        }
    }

    /// The current configuration.
    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    /// Edit the configuration in place.
    ///
    /// Changes take effect when the returned guard is dropped.
    pub fn configuration_mut(&mut self) -> ConfigurationMut<'_> {
        let original = self.configuration;
        ConfigurationMut {
            configuration: &mut self.configuration,
            coordinator: &self.coordinator,
            original,
        }
    }

    /// Replace the content of the visible menu.
    ///
    /// Returns `false` if no menu is currently presented.
    pub fn update_visible_menu(&self, menu: Menu) -> bool {
        self.coordinator.update_visible_menu(menu)
    }
}

impl std::fmt::Debug for TabBarMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabBarMenu")
            .field("host", &self.host.host_id())
            .field("configuration", &self.configuration)
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

static_assertions::assert_impl_all!(TabBarMenu: Send, Sync);

/// Mutable access to a [`TabBarMenu`]'s configuration.
///
/// Pushes the configuration to the coordinator on drop if it changed.
pub struct ConfigurationMut<'a> {
    configuration: &'a mut Configuration,
    coordinator: &'a TabMenuCoordinator,
    original: Configuration,
}

impl Deref for ConfigurationMut<'_> {
    type Target = Configuration;

    fn deref(&self) -> &Configuration {
        self.configuration
    }
}

impl DerefMut for ConfigurationMut<'_> {
    fn deref_mut(&mut self) -> &mut Configuration {
        self.configuration
    }
}

impl Drop for ConfigurationMut<'_> {
    fn drop(&mut self) {
        if *self.configuration != self.original {
            self.coordinator.set_configuration(*self.configuration);
        }
    }
}
