// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The read-only view of the external component tree.

use core::fmt;

use kurbo::Rect;

use super::key::{DirtySet, PropertyKey};
use super::kind::ComponentKind;
use super::value::{Color, PropertyValue};

/// Stable identity of a component in the external tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({})", self.0)
    }
}

/// Read access to the authoritative component tree.
///
/// The layout engine owns and mutates the tree; the synchronization engine
/// only reads it. Unknown ids answer with empty or default values rather
/// than panicking, since a component can disappear between the moment an id
/// is captured and the moment it is read.
pub trait ComponentSource {
    /// Monotonic index of the frame whose dirty sets are currently exposed.
    fn frame_index(&self) -> u64;

    /// Components with a non-empty dirty set in the current frame.
    fn dirty_components(&self) -> Vec<ComponentId>;

    /// Whether `id` currently exists in the tree.
    fn contains(&self, id: ComponentId) -> bool;

    /// Variant tag of `id`.
    fn kind(&self, id: ComponentId) -> Option<ComponentKind>;

    /// Parent of `id`, if it is attached below another component.
    fn parent(&self, id: ComponentId) -> Option<ComponentId>;

    /// Outer bounds of `id`.
    fn bounds(&self, id: ComponentId) -> Rect;

    /// Bounds of `id` minus its content inset.
    fn inner_bounds(&self, id: ComponentId) -> Rect;

    /// Current value of `key` on `id`, if declared.
    fn property(&self, id: ComponentId, key: PropertyKey) -> Option<&PropertyValue>;

    /// Keys of `id` that changed in the current frame.
    fn dirty_keys(&self, id: ComponentId) -> DirtySet;

    /// Ordered children of `id`.
    fn children(&self, id: ComponentId) -> &[ComponentId];

    /// Ordered children of `id` that are currently eligible for on-screen
    /// materialization, already windowed by the engine's layout decisions.
    fn displayed_children(&self, id: ComponentId) -> Vec<ComponentId>;

    /// Layout-driven override that hides `id` regardless of its declared
    /// display state.
    fn invisible_override(&self, id: ComponentId) -> bool;

    /// Whether `key` is declared on `id`.
    fn has_property(&self, id: ComponentId, key: PropertyKey) -> bool {
        self.property(id, key).is_some()
    }

    /// `key` as a boolean, if declared with that type.
    fn bool_property(&self, id: ComponentId, key: PropertyKey) -> Option<bool> {
        self.property(id, key).and_then(PropertyValue::as_bool)
    }

    /// `key` as a number, if declared with that type.
    fn number_property(&self, id: ComponentId, key: PropertyKey) -> Option<f64> {
        self.property(id, key).and_then(PropertyValue::as_number)
    }

    /// `key` as a color, if declared with that type.
    fn color_property(&self, id: ComponentId, key: PropertyKey) -> Option<Color> {
        self.property(id, key).and_then(PropertyValue::as_color)
    }

    /// `key` as a string, if declared with that type.
    fn text_property(&self, id: ComponentId, key: PropertyKey) -> Option<&str> {
        self.property(id, key).and_then(PropertyValue::as_text)
    }
}

/// Kind of a user-originated change routed back to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    /// Edit text content changed.
    TextChanged,
    /// Edit text was submitted.
    Submit,
    /// Pager settled on a new page.
    PageChanged,
    /// Scrollable settled on a new offset.
    ScrollPosition,
    /// Checked state toggled.
    Checked,
    /// Widget was pressed.
    Press,
}

/// Receives user-originated updates for the component tree.
pub trait UpdateSink {
    /// Applies an update originating from the widget bound to `component`.
    fn update(&mut self, component: ComponentId, kind: UpdateKind, value: PropertyValue);
}
