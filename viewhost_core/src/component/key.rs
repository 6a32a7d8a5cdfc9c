// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property identifiers and per-frame dirty sets.

use core::fmt;

/// Identifier of a component property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKey {
    /// Outer bounds rectangle.
    Bounds,
    /// Bounds minus content inset.
    InnerBounds,
    /// Author-declared opacity.
    Opacity,
    /// Author-declared display state.
    Display,
    /// Disabled flag.
    Disabled,
    /// Author-declared focusability.
    Focusable,
    /// Accessibility label.
    AccessibilityLabel,
    /// Accessibility role.
    Role,
    /// Checked state.
    Checked,
    /// Background fill color.
    BackgroundColor,
    /// Border stroke color.
    BorderColor,
    /// Border stroke width.
    BorderWidth,
    /// Corner radius.
    BorderRadius,
    /// Text content.
    Text,
    /// Text color.
    Color,
    /// Font size.
    FontSize,
    /// Maximum displayed lines.
    MaxLines,
    /// Horizontal text alignment.
    TextAlign,
    /// Placeholder shown by empty edit text.
    Placeholder,
    /// Resource source (image, vector graphic, media).
    Source,
    /// Resource scaling.
    Scale,
    /// Resource alignment.
    Align,
    /// Current page of a pager.
    CurrentPage,
    /// Pager navigation policy.
    Navigation,
    /// Scroll offset.
    ScrollPosition,
    /// Scroll axis.
    ScrollDirection,
    /// Engine-side displayed-children window changed.
    DisplayedChildren,
    /// Presence of a press handler.
    OnPress,
    /// Presence of a submit handler.
    Submit,
}

impl PropertyKey {
    /// Number of keys.
    pub const COUNT: usize = 29;

    /// Every key, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Bounds,
        Self::InnerBounds,
        Self::Opacity,
        Self::Display,
        Self::Disabled,
        Self::Focusable,
        Self::AccessibilityLabel,
        Self::Role,
        Self::Checked,
        Self::BackgroundColor,
        Self::BorderColor,
        Self::BorderWidth,
        Self::BorderRadius,
        Self::Text,
        Self::Color,
        Self::FontSize,
        Self::MaxLines,
        Self::TextAlign,
        Self::Placeholder,
        Self::Source,
        Self::Scale,
        Self::Align,
        Self::CurrentPage,
        Self::Navigation,
        Self::ScrollPosition,
        Self::ScrollDirection,
        Self::DisplayedChildren,
        Self::OnPress,
        Self::Submit,
    ];

    /// Dense index of this key.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    const fn bit(self) -> u64 {
        1 << (self as u32)
    }
}

/// A set of dirty [`PropertyKey`]s.
///
/// Backed by a bitset over the closed key enum, so insertion is idempotent
/// and iteration order is always declaration order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirtySet(u64);

impl DirtySet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a set from a slice of keys.
    #[must_use]
    pub const fn of(keys: &[PropertyKey]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < keys.len() {
            bits |= keys[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Raw bit representation, one bit per [`PropertyKey::index`].
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Rebuilds a set from [`bits`](Self::bits), dropping unknown bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits & ((1 << PropertyKey::COUNT) - 1))
    }

    /// Adds a key. Returns `true` if it was not already present.
    pub fn insert(&mut self, key: PropertyKey) -> bool {
        let had = self.contains(key);
        self.0 |= key.bit();
        !had
    }

    /// Removes a key. Returns `true` if it was present.
    pub fn remove(&mut self, key: PropertyKey) -> bool {
        let had = self.contains(key);
        self.0 &= !key.bit();
        had
    }

    /// Whether the set contains `key`.
    #[must_use]
    pub const fn contains(self, key: PropertyKey) -> bool {
        self.0 & key.bit() != 0
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of keys in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Keys present in either set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Keys present in `self` but not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Whether the two sets share at least one key.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Iterates keys in declaration order.
    pub fn iter(self) -> impl Iterator<Item = PropertyKey> {
        PropertyKey::ALL
            .into_iter()
            .filter(move |key| self.contains(*key))
    }
}

impl FromIterator<PropertyKey> for DirtySet {
    fn from_iter<I: IntoIterator<Item = PropertyKey>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<PropertyKey> for DirtySet {
    fn extend<I: IntoIterator<Item = PropertyKey>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl fmt::Debug for DirtySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
