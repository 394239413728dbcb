//! Trigger configuration.
//!
//! [`Configuration`] is a small `Copy` value owned by the host wrapper and
//! passed by value into the coordinator. Two configurations are compared by
//! equality to decide whether a re-synchronization pass is needed.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tab_menu::{Configuration, OverflowTrigger};
//!
//! let config = Configuration::default()
//!     .with_minimum_press_duration(Duration::from_millis(500))
//!     .with_overflow_trigger(OverflowTrigger::Tap)
//!     .with_max_visible_count(4);
//!
//! assert_eq!(config.max_visible_count(), 4);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default long-press duration before a menu is requested.
pub const DEFAULT_MINIMUM_PRESS_DURATION: Duration = Duration::from_millis(350);

/// Default number of visible tab buttons before the overflow slot appears.
pub const DEFAULT_MAX_VISIBLE_COUNT: usize = 5;

/// Press duration used for the overflow slot's tap workaround.
///
/// Hosts using tab descriptors do not always route a tap on the overflow slot
/// through the interceptable selection path, so the overflow button gets a
/// long-press recognizer that fires almost immediately instead.
pub const IMMEDIATE_PRESS_DURATION: Duration = Duration::from_millis(10);

/// What interaction opens the overflow slot's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowTrigger {
    /// The overflow menu opens on long press, like every other tab.
    #[default]
    LongPress,
    /// The overflow menu opens on tap, replacing the host's overflow screen.
    Tap,
}

/// Trigger thresholds for tab menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    #[serde(rename = "minimum_press_duration_secs", with = "press_duration_secs")]
    minimum_press_duration: Duration,
    overflow_trigger: OverflowTrigger,
    max_visible_count: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            minimum_press_duration: DEFAULT_MINIMUM_PRESS_DURATION,
            overflow_trigger: OverflowTrigger::default(),
            max_visible_count: DEFAULT_MAX_VISIBLE_COUNT,
        }
    }
}

impl Configuration {
    /// Create a configuration with explicit values.
    pub fn new(
        minimum_press_duration: Duration,
        overflow_trigger: OverflowTrigger,
        max_visible_count: usize,
    ) -> Self {
        Self {
            minimum_press_duration,
            overflow_trigger,
            max_visible_count,
        }
    }

    /// Create a configuration from a press duration given in seconds.
    ///
    /// Fails if `seconds` is negative, NaN or too large for a [`Duration`].
    pub fn from_secs(
        seconds: f64,
        overflow_trigger: OverflowTrigger,
        max_visible_count: usize,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            press_duration_from_secs(seconds)?,
            overflow_trigger,
            max_visible_count,
        ))
    }

    /// How long a press must last before a menu is requested.
    pub fn minimum_press_duration(&self) -> Duration {
        self.minimum_press_duration
    }

    /// Set the press duration.
    pub fn set_minimum_press_duration(&mut self, duration: Duration) {
        self.minimum_press_duration = duration;
    }

    /// Set the press duration using builder pattern.
    pub fn with_minimum_press_duration(mut self, duration: Duration) -> Self {
        self.minimum_press_duration = duration;
        self
    }

    /// What opens the overflow slot's menu.
    pub fn overflow_trigger(&self) -> OverflowTrigger {
        self.overflow_trigger
    }

    /// Set the overflow trigger.
    pub fn set_overflow_trigger(&mut self, trigger: OverflowTrigger) {
        self.overflow_trigger = trigger;
    }

    /// Set the overflow trigger using builder pattern.
    pub fn with_overflow_trigger(mut self, trigger: OverflowTrigger) -> Self {
        self.overflow_trigger = trigger;
        self
    }

    /// Maximum number of tab buttons shown before the overflow slot appears.
    ///
    /// Zero disables overflow handling entirely.
    pub fn max_visible_count(&self) -> usize {
        self.max_visible_count
    }

    /// Set the maximum visible count.
    pub fn set_max_visible_count(&mut self, count: usize) {
        self.max_visible_count = count;
    }

    /// Set the maximum visible count using builder pattern.
    pub fn with_max_visible_count(mut self, count: usize) -> Self {
        self.max_visible_count = count;
        self
    }
}

fn press_duration_from_secs(seconds: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(seconds).map_err(|_| ConfigError::InvalidPressDuration(seconds))
}

mod press_duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        let seconds = f64::deserialize(deserializer)?;
        super::press_duration_from_secs(seconds).map_err(serde::de::Error::custom)
    }
}
