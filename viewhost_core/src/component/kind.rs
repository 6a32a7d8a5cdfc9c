// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of component variants.

use crate::materialize::RecyclePolicy;

/// The variant tag of a component.
///
/// The set is closed: every variant has exactly one adapter in a complete
/// [`AdapterRegistry`](crate::registry::AdapterRegistry). Lookup is by exact
/// variant, never by capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    /// Generic absolute-positioned container.
    Container,
    /// Container with background, border, and corner radius.
    Frame,
    /// Static text.
    Text,
    /// Editable single-line text.
    EditText,
    /// Bitmap image loaded asynchronously.
    Image,
    /// Vector graphic loaded asynchronously.
    VectorGraphic,
    /// Single-child container that reacts to presses.
    TouchWrapper,
    /// Scrollable single-axis container.
    ScrollView,
    /// Paged container showing one page at a time.
    Pager,
    /// Virtualized scrolling list.
    Sequence,
    /// Virtualized scrolling grid.
    GridSequence,
    /// Media surface (shown as a static placeholder).
    Video,
    /// Component with no visual representation.
    Virtual,
}

/// How a component's widget positions its children and content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Children take their frames straight from component bounds; the widget
    /// never carries padding.
    Absolute,
    /// The widget lays out its own content inside platform padding derived
    /// from `bounds - inner_bounds`.
    Box,
}

impl ComponentKind {
    /// Number of variants.
    pub const COUNT: usize = 13;

    /// Every variant, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Container,
        Self::Frame,
        Self::Text,
        Self::EditText,
        Self::Image,
        Self::VectorGraphic,
        Self::TouchWrapper,
        Self::ScrollView,
        Self::Pager,
        Self::Sequence,
        Self::GridSequence,
        Self::Video,
        Self::Virtual,
    ];

    /// Dense index of this variant, suitable for array-indexed tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns a short, stable name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Container => "Container",
            Self::Frame => "Frame",
            Self::Text => "Text",
            Self::EditText => "EditText",
            Self::Image => "Image",
            Self::VectorGraphic => "VectorGraphic",
            Self::TouchWrapper => "TouchWrapper",
            Self::ScrollView => "ScrollView",
            Self::Pager => "Pager",
            Self::Sequence => "Sequence",
            Self::GridSequence => "GridSequence",
            Self::Video => "Video",
            Self::Virtual => "Virtual",
        }
    }

    /// Whether components of this kind own child widgets.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::Container
                | Self::Frame
                | Self::TouchWrapper
                | Self::ScrollView
                | Self::Pager
                | Self::Sequence
                | Self::GridSequence
        )
    }

    /// Whether this kind virtualizes its children into a moving window.
    #[must_use]
    pub const fn is_lazy_list(self) -> bool {
        matches!(self, Self::Pager | Self::Sequence | Self::GridSequence)
    }

    /// Layout mode used for padding derivation.
    #[must_use]
    pub const fn layout_mode(self) -> LayoutMode {
        match self {
            Self::Container | Self::Frame | Self::TouchWrapper | Self::Pager | Self::Virtual => {
                LayoutMode::Absolute
            }
            Self::Text
            | Self::EditText
            | Self::Image
            | Self::VectorGraphic
            | Self::ScrollView
            | Self::Sequence
            | Self::GridSequence
            | Self::Video => LayoutMode::Box,
        }
    }

    /// What happens to a child widget that leaves the displayed window.
    ///
    /// Lazy lists keep detached widgets alive for cheap reattachment; all
    /// other containers release them. See
    /// [`SyncConfig::with_recycle_policy`](crate::config::SyncConfig::with_recycle_policy)
    /// for per-kind overrides.
    #[must_use]
    pub const fn default_recycle_policy(self) -> RecyclePolicy {
        if self.is_lazy_list() {
            RecyclePolicy::KeepDetached
        } else {
            RecyclePolicy::Destroy
        }
    }

    /// Focusability used when the component does not declare `focusable`.
    #[must_use]
    pub const fn default_focusable(self) -> bool {
        matches!(
            self,
            Self::EditText
                | Self::TouchWrapper
                | Self::ScrollView
                | Self::Pager
                | Self::Sequence
                | Self::GridSequence
        )
    }

    /// Alpha used when the component does not declare `opacity`.
    #[must_use]
    pub const fn default_alpha(self) -> f32 {
        match self {
            Self::Virtual => 0.0,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, kind) in ComponentKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i, "{} out of order", kind.name());
        }
    }

    #[test]
    fn lazy_lists_keep_detached_widgets() {
        assert_eq!(
            ComponentKind::Sequence.default_recycle_policy(),
            RecyclePolicy::KeepDetached
        );
        assert_eq!(
            ComponentKind::Pager.default_recycle_policy(),
            RecyclePolicy::KeepDetached
        );
        assert_eq!(
            ComponentKind::Container.default_recycle_policy(),
            RecyclePolicy::Destroy
        );
    }

    #[test]
    fn lazy_lists_are_containers() {
        for kind in ComponentKind::ALL {
            if kind.is_lazy_list() {
                assert!(kind.is_container(), "{} must be a container", kind.name());
            }
        }
    }
}
