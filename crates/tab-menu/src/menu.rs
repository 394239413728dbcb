//! Menu content, placement policy and resolved plans.
//!
//! [`Menu`] is built by the application and rendered by the host; this crate
//! only carries it from the delegate to the [`MenuHost`](crate::MenuHost).

use tab_menu_core::{Point, Rect};

/// Upward offset used by [`Placement::Above`] on hosts that default to it.
pub const DEFAULT_ABOVE_OFFSET: f32 = 8.0;

/// A single selectable menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuAction {
    /// Identifier reported back to the application when selected.
    pub identifier: String,
    pub title: String,
    pub image: Option<String>,
    /// Rendered with destructive styling.
    pub destructive: bool,
    pub disabled: bool,
}

impl MenuAction {
    /// Create an enabled, non-destructive action.
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            image: None,
            destructive: false,
            disabled: false,
        }
    }

    /// Set the image name using builder pattern.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Mark the action destructive using builder pattern.
    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    /// Mark the action disabled using builder pattern.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// An element of a [`Menu`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuElement {
    Action(MenuAction),
    Submenu(Menu),
    Separator,
}

/// Menu content supplied by the delegate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Menu {
    pub title: String,
    pub children: Vec<MenuElement>,
}

impl Menu {
    /// Create an empty menu.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Append an action using builder pattern.
    pub fn with_action(mut self, action: MenuAction) -> Self {
        self.children.push(MenuElement::Action(action));
        self
    }

    /// Append a submenu using builder pattern.
    pub fn with_submenu(mut self, menu: Menu) -> Self {
        self.children.push(MenuElement::Submenu(menu));
        self
    }

    /// Append a separator using builder pattern.
    pub fn with_separator(mut self) -> Self {
        self.children.push(MenuElement::Separator);
        self
    }

    /// Iterate over the actions at the top level of this menu.
    pub fn actions(&self) -> impl Iterator<Item = &MenuAction> {
        self.children.iter().filter_map(|child| match child {
            MenuElement::Action(action) => Some(action),
            _ => None,
        })
    }

    /// Returns true if the menu has no elements.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Ordering hint for menu elements, applied to the presentation trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementOrder {
    /// Let the host decide based on where the menu opens.
    #[default]
    Automatic,
    /// Keep the order the delegate supplied.
    Fixed,
    /// Put the first element closest to the touch point.
    Priority,
}

/// Where the menu is anchored relative to the triggering button.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Placement {
    /// Inside the button, halfway between its vertical center and bottom edge.
    #[default]
    Inside,
    /// Above the button's top edge by the given offset, horizontally centered.
    Above(f32),
    /// A fixed point in container coordinates.
    Custom(Point),
    /// No anchor is computed; the delegate positions the trigger itself.
    Manual,
}

impl Placement {
    /// Compute the anchor point for a button frame.
    ///
    /// Returns `None` for [`Placement::Manual`].
    pub fn anchor(&self, button_frame: Rect) -> Option<Point> {
        match *self {
            Self::Inside => Some(Point::new(
                button_frame.mid_x(),
                (button_frame.mid_y() + button_frame.bottom()) / 2.0,
            )),
            Self::Above(offset) => Some(Point::new(
                button_frame.mid_x(),
                button_frame.top() - offset,
            )),
            Self::Custom(point) => Some(point),
            Self::Manual => None,
        }
    }
}

/// A fully resolved menu, ready to hand to the menu host.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuPlan {
    pub content: Menu,
    pub placement: Placement,
    /// `None` when the placement is [`Placement::Manual`].
    pub anchor: Option<Point>,
}

impl MenuPlan {
    /// Resolve a plan for the given button frame.
    pub fn new(content: Menu, placement: Placement, button_frame: Rect) -> Self {
        Self {
            content,
            placement,
            anchor: placement.anchor(button_frame),
        }
    }
}
