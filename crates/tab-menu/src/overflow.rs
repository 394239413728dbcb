//! Overflow-slot arithmetic.
//!
//! When a tab bar holds more items than it can show, the last visible
//! position turns into a synthetic "more items" slot. [`OverflowLayout`]
//! answers which logical index that slot occupies and which items it stands
//! for. Everything here is pure.

use crate::config::Configuration;

/// Overflow geometry for a given maximum visible count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverflowLayout {
    max_visible: usize,
}

impl OverflowLayout {
    /// Create a layout for `max_visible` buttons. Zero disables overflow.
    pub const fn new(max_visible: usize) -> Self {
        Self { max_visible }
    }

    /// The configured maximum visible count.
    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// The logical index of the overflow slot, if `total` items overflow.
    pub fn overflow_index(&self, total: usize) -> Option<usize> {
        (self.max_visible > 0 && total > self.max_visible).then(|| self.max_visible - 1)
    }

    /// Whether `index` is the overflow slot for `total` items.
    pub fn is_overflow_index(&self, index: usize, total: usize) -> bool {
        self.overflow_index(total) == Some(index)
    }

    /// The item at a logical index.
    ///
    /// Returns `None` for the overflow slot and for out-of-range indices.
    pub fn item_at<'a, T>(&self, index: usize, items: &'a [T]) -> Option<&'a T> {
        if self.is_overflow_index(index, items.len()) {
            return None;
        }
        items.get(index)
    }

    /// The items collapsed into the overflow slot, in logical order.
    ///
    /// Empty when there is no overflow.
    pub fn overflow_items<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        match self.overflow_index(items.len()) {
            Some(start) => &items[start..],
            None => &[],
        }
    }
}

impl From<&Configuration> for OverflowLayout {
    fn from(config: &Configuration) -> Self {
        Self::new(config.max_visible_count())
    }
}
