//! Item descriptors.
//!
//! A host configuration describes its tabs through exactly one of two
//! content models:
//!
//! - **Tabs** ([`Tab`]): lightweight value descriptors.
//! - **Pages** ([`Page`]): descriptors backed by a content page the host owns.
//!
//! The bar itself renders [`BarItem`]s, one per visible button; their order
//! matches the logical order of whichever model is in use.

/// Identity of a bar item (the model behind one visible button).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u64);

/// One visible entry of the host tab bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarItem {
    pub id: ItemId,
    pub title: String,
}

impl BarItem {
    /// Create a bar item.
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// A value-type tab descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tab {
    /// Stable identifier chosen by the application.
    pub identifier: String,
    pub title: String,
    pub image: Option<String>,
}

impl Tab {
    /// Create a tab descriptor without an image.
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            image: None,
        }
    }

    /// Set the image name using builder pattern.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Handle to a host-owned content page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageHandle(pub u64);

/// A page-backed tab descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Page {
    pub handle: PageHandle,
    pub title: String,
    pub image: Option<String>,
}

impl Page {
    /// Create a page descriptor without an image.
    pub fn new(handle: PageHandle, title: impl Into<String>) -> Self {
        Self {
            handle,
            title: title.into(),
            image: None,
        }
    }

    /// Set the image name using builder pattern.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
