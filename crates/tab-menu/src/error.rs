//! Error types for Tab Menu.
//!
//! Nothing in the interaction path surfaces an error to the host: a missing
//! menu must never be worse than no menu at all. Internally, resolution steps
//! return [`SkipReason`] so the reason can be propagated with `?` and logged
//! once at the point where the interaction is dropped.

/// Why an interaction ended without presenting a menu.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// No delegate is assigned.
    #[error("no delegate is assigned")]
    NoDelegate,

    /// The delegate implements neither source's capability for this request.
    #[error("delegate does not supply {0} menus")]
    MissingCapability(&'static str),

    /// The logical index does not address an item.
    #[error("index {index} is out of range for {count} items")]
    OutOfRange { index: usize, count: usize },

    /// The index is the overflow slot and cannot be resolved as a single item.
    #[error("index {0} is the overflow slot")]
    OverflowIndex(usize),

    /// The overflow slot has no items to offer.
    #[error("overflow slot has no items")]
    EmptyOverflow,

    /// The delegate declined to supply menu content.
    #[error("delegate returned no menu content")]
    NoContent,

    /// The coordinator is not attached to a host control.
    #[error("coordinator is not attached")]
    Detached,

    /// The event belongs to an attachment that has since been replaced.
    #[error("event belongs to a previous attachment")]
    Stale,

    /// The triggering button is no longer part of a live view hierarchy.
    #[error("triggering view left the view hierarchy")]
    ViewDetached,

    /// The host control is transitioning between items.
    #[error("host control is mid-transition")]
    TransitionInFlight,

    /// A newer presentation attempt replaced this one.
    #[error("superseded by a newer presentation attempt")]
    Superseded,
}

/// Invalid configuration input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The press duration in seconds is negative, NaN or out of range.
    #[error("invalid minimum press duration: {0} seconds")]
    InvalidPressDuration(f64),
}

/// Result of an internal resolution step.
pub type Resolution<T> = std::result::Result<T, SkipReason>;
