// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed property values.

use core::fmt;

/// A 32-bit ARGB color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    /// Opaque black.
    pub const BLACK: Self = Self(0xff00_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xffff_ffff);

    /// Returns the alpha channel.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// Whether the color contributes nothing when drawn.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.alpha() == 0
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:08x})", self.0)
    }
}

/// Author-declared display state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Display {
    /// Shown and laid out.
    #[default]
    Normal,
    /// Laid out but not drawn.
    Invisible,
    /// Neither drawn nor laid out.
    None,
}

/// Accessibility role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    /// No role.
    #[default]
    None,
    /// Activatable button.
    Button,
    /// Two-state check box.
    CheckBox,
    /// Section header.
    Header,
    /// Image content.
    Image,
    /// Hyperlink.
    Link,
    /// Static text.
    Text,
    /// Control whose value can be adjusted (slider, stepper).
    Adjustable,
}

/// Pager navigation policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Pages move in both directions, stopping at the ends.
    #[default]
    Normal,
    /// Pages wrap around at the ends.
    Wrap,
    /// Pages only move forward.
    ForwardOnly,
    /// Pages do not move.
    None,
}

/// Resource scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Scale {
    /// Natural size.
    None,
    /// Stretched to fill, ignoring aspect.
    Fill,
    /// Largest aspect-preserving fit.
    #[default]
    BestFit,
    /// Smallest aspect-preserving cover.
    BestFill,
    /// Like `BestFit`, but never scaled up.
    BestFitDown,
}

/// Resource alignment inside its bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    /// Centered on both axes.
    #[default]
    Center,
    /// Top edge, horizontally centered.
    Top,
    /// Bottom edge, horizontally centered.
    Bottom,
    /// Left edge, vertically centered.
    Left,
    /// Right edge, vertically centered.
    Right,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

/// Scroll axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Scrolls top to bottom.
    #[default]
    Vertical,
    /// Scrolls start to end.
    Horizontal,
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Follows layout direction.
    #[default]
    Auto,
    /// Left aligned.
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

/// A typed property value as reported by the component tree.
///
/// Accessors return `None` when the value has a different type; adapters
/// treat that as a malformed value and fall back to the documented default.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Boolean flag.
    Bool(bool),
    /// Number (dimensions, opacity, indices).
    Number(f64),
    /// Color.
    Color(Color),
    /// String.
    Text(String),
    /// Display state.
    Display(Display),
    /// Accessibility role.
    Role(Role),
    /// Pager navigation policy.
    Navigation(Navigation),
    /// Resource scaling.
    Scale(Scale),
    /// Resource alignment.
    Align(Align),
    /// Scroll axis.
    ScrollDirection(ScrollDirection),
    /// Text alignment.
    TextAlign(TextAlign),
}

impl PropertyValue {
    /// Returns the boolean, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the number, if this is a `Number`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the color, if this is a `Color`.
    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string, if this is a `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the display state, if this is a `Display`.
    #[must_use]
    pub fn as_display(&self) -> Option<Display> {
        match self {
            Self::Display(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the role, if this is a `Role`.
    #[must_use]
    pub fn as_role(&self) -> Option<Role> {
        match self {
            Self::Role(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the navigation policy, if this is a `Navigation`.
    #[must_use]
    pub fn as_navigation(&self) -> Option<Navigation> {
        match self {
            Self::Navigation(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the scale, if this is a `Scale`.
    #[must_use]
    pub fn as_scale(&self) -> Option<Scale> {
        match self {
            Self::Scale(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the alignment, if this is an `Align`.
    #[must_use]
    pub fn as_align(&self) -> Option<Align> {
        match self {
            Self::Align(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the scroll direction, if this is a `ScrollDirection`.
    #[must_use]
    pub fn as_scroll_direction(&self) -> Option<ScrollDirection> {
        match self {
            Self::ScrollDirection(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text alignment, if this is a `TextAlign`.
    #[must_use]
    pub fn as_text_align(&self) -> Option<TextAlign> {
        match self {
            Self::TextAlign(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<Color> for PropertyValue {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Text(v.into())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Display> for PropertyValue {
    fn from(v: Display) -> Self {
        Self::Display(v)
    }
}

impl From<Role> for PropertyValue {
    fn from(v: Role) -> Self {
        Self::Role(v)
    }
}

impl From<Navigation> for PropertyValue {
    fn from(v: Navigation) -> Self {
        Self::Navigation(v)
    }
}

impl From<Scale> for PropertyValue {
    fn from(v: Scale) -> Self {
        Self::Scale(v)
    }
}

impl From<Align> for PropertyValue {
    fn from(v: Align) -> Self {
        Self::Align(v)
    }
}

impl From<ScrollDirection> for PropertyValue {
    fn from(v: ScrollDirection) -> Self {
        Self::ScrollDirection(v)
    }
}

impl From<TextAlign> for PropertyValue {
    fn from(v: TextAlign) -> Self {
        Self::TextAlign(v)
    }
}
