//! Logging facilities for Tab Menu.
//!
//! Tab Menu uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("tab_menu=debug")
//!     .init();
//! ```
//!
//! Interactions that end without a menu are reported at `debug` level on the
//! subsystem target that dropped them, which is usually the quickest way to
//! find out why a long press did nothing.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "tab_menu_core::signal";
    /// Deferred task queue target.
    pub const TASK: &str = "tab_menu_core::task";
    /// Item-collection change notifier target.
    pub const NOTIFIER: &str = "tab_menu::notifier";
    /// Request routing target.
    pub const ROUTER: &str = "tab_menu::router";
    /// Coordinator (attachment, synchronization, gestures) target.
    pub const COORDINATOR: &str = "tab_menu::coordinator";
    /// Presentation scheduling target.
    pub const PRESENTATION: &str = "tab_menu::presentation";
}

