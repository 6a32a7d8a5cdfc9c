// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory component tree.
//!
//! [`ComponentTree`] is a small stand-in for the external layout engine: it
//! stores components, tracks per-frame dirty keys, derives displayed-children
//! windows for pagers and lazy lists, and accepts user updates. Hosts that
//! embed a real engine implement [`ComponentSource`] and [`UpdateSink`] on
//! that engine instead.

use hashbrown::HashMap;
use kurbo::Rect;

use super::key::{DirtySet, PropertyKey};
use super::kind::ComponentKind;
use super::source::{ComponentId, ComponentSource, UpdateKind, UpdateSink};
use super::value::{Navigation, PropertyValue};
use crate::materialize::ChildChange;

#[derive(Clone, Debug)]
struct Node {
    kind: ComponentKind,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    bounds: Rect,
    inner_bounds: Rect,
    properties: HashMap<PropertyKey, PropertyValue>,
    dirty: DirtySet,
    invisible_override: bool,
    viewport: Option<(usize, usize)>,
}

impl Node {
    fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            bounds: Rect::ZERO,
            inner_bounds: Rect::ZERO,
            properties: HashMap::new(),
            dirty: DirtySet::new(),
            invisible_override: false,
            viewport: None,
        }
    }
}

/// An in-memory, mutable component tree.
///
/// Every mutation marks the affected keys dirty. Dirty sets stay visible
/// until [`end_frame`](Self::end_frame) clears them and advances the frame
/// index.
#[derive(Clone, Debug)]
pub struct ComponentTree {
    nodes: HashMap<ComponentId, Node>,
    next_id: u64,
    frame_index: u64,
    pager_window_radius: usize,
    updates: Vec<(ComponentId, UpdateKind, PropertyValue)>,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    /// Creates an empty tree with a pager window of one page on each side.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 1,
            frame_index: 0,
            pager_window_radius: 1,
            updates: Vec::new(),
        }
    }

    /// Sets how many pages on each side of the current page a pager keeps in
    /// its displayed window.
    #[must_use]
    pub fn with_pager_window_radius(mut self, radius: usize) -> Self {
        self.pager_window_radius = radius;
        self
    }

    /// Creates a detached component of the given kind.
    pub fn create(&mut self, kind: ComponentKind) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(kind));
        id
    }

    /// Removes a component and its whole subtree from the tree.
    ///
    /// The component is unlinked from its parent first; the returned
    /// notification (if any) describes that removal.
    pub fn destroy(&mut self, id: ComponentId) -> Option<ChildChange> {
        let change = match self.nodes.get(&id).and_then(|n| n.parent) {
            Some(parent) => self.remove_child(parent, id),
            None => None,
        };
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
            }
        }
        change
    }

    /// Appends `child` to `parent`.
    pub fn append_child(&mut self, parent: ComponentId, child: ComponentId) -> ChildChange {
        let len = self.nodes.get(&parent).map_or(0, |n| n.children.len());
        self.insert_child(parent, child, len)
    }

    /// Inserts `child` into `parent` at `index` (clamped to the child count).
    ///
    /// # Panics
    ///
    /// Panics if either component is unknown or `child` already has a parent.
    pub fn insert_child(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
        index: usize,
    ) -> ChildChange {
        let child_node = self.nodes.get_mut(&child).expect("unknown child component");
        assert!(child_node.parent.is_none(), "child already has a parent");
        child_node.parent = Some(parent);

        let parent_node = self
            .nodes
            .get_mut(&parent)
            .expect("unknown parent component");
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, child);
        parent_node.dirty.insert(PropertyKey::DisplayedChildren);
        ChildChange::insert(child)
    }

    /// Unlinks `child` from `parent`. Returns `None` if it was not a child.
    pub fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> Option<ChildChange> {
        let parent_node = self.nodes.get_mut(&parent)?;
        let pos = parent_node.children.iter().position(|c| *c == child)?;
        parent_node.children.remove(pos);
        parent_node.dirty.insert(PropertyKey::DisplayedChildren);
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = None;
        }
        Some(ChildChange::remove(child))
    }

    /// Sets a property and marks it dirty.
    pub fn set(&mut self, id: ComponentId, key: PropertyKey, value: impl Into<PropertyValue>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.properties.insert(key, value.into());
            node.dirty.insert(key);
            if matches!(
                key,
                PropertyKey::CurrentPage | PropertyKey::Navigation | PropertyKey::ScrollPosition
            ) && node.kind.is_lazy_list()
            {
                node.dirty.insert(PropertyKey::DisplayedChildren);
            }
        }
    }

    /// Removes a property declaration and marks it dirty.
    pub fn unset(&mut self, id: ComponentId, key: PropertyKey) {
        if let Some(node) = self.nodes.get_mut(&id)
            && node.properties.remove(&key).is_some()
        {
            node.dirty.insert(key);
        }
    }

    /// Sets bounds and inner bounds, marking whichever changed.
    pub fn set_bounds(&mut self, id: ComponentId, bounds: Rect, inner_bounds: Rect) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if node.bounds != bounds {
                node.bounds = bounds;
                node.dirty.insert(PropertyKey::Bounds);
            }
            if node.inner_bounds != inner_bounds {
                node.inner_bounds = inner_bounds;
                node.dirty.insert(PropertyKey::InnerBounds);
            }
        }
    }

    /// Sets the layout-driven invisible override.
    pub fn set_invisible_override(&mut self, id: ComponentId, invisible: bool) {
        if let Some(node) = self.nodes.get_mut(&id)
            && node.invisible_override != invisible
        {
            node.invisible_override = invisible;
            node.dirty.insert(PropertyKey::Display);
        }
    }

    /// Sets the visible range of a lazy list to `count` children starting at
    /// `first`.
    pub fn set_viewport(&mut self, id: ComponentId, first: usize, count: usize) {
        if let Some(node) = self.nodes.get_mut(&id)
            && node.viewport != Some((first, count))
        {
            node.viewport = Some((first, count));
            node.dirty.insert(PropertyKey::DisplayedChildren);
        }
    }

    /// Marks `key` dirty without changing its value.
    pub fn mark_dirty(&mut self, id: ComponentId, key: PropertyKey) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.dirty.insert(key);
        }
    }

    /// Clears every dirty set and advances to the next frame.
    pub fn end_frame(&mut self) {
        for node in self.nodes.values_mut() {
            node.dirty = DirtySet::new();
        }
        self.frame_index += 1;
    }

    /// Drains the user updates received since the last call.
    pub fn take_updates(&mut self) -> Vec<(ComponentId, UpdateKind, PropertyValue)> {
        core::mem::take(&mut self.updates)
    }

    fn pager_window(&self, node: &Node) -> Vec<ComponentId> {
        let count = node.children.len();
        if count == 0 {
            return Vec::new();
        }
        let current = node
            .properties
            .get(&PropertyKey::CurrentPage)
            .and_then(PropertyValue::as_number)
            .filter(|n| n.is_finite())
            .map_or(0, |n| clamp_index(n, count));
        let navigation = node
            .properties
            .get(&PropertyKey::Navigation)
            .and_then(PropertyValue::as_navigation)
            .unwrap_or_default();

        let radius = self.pager_window_radius.min(count - 1);
        let mut window = Vec::with_capacity(2 * radius + 1);
        let mut push = |idx: usize| {
            let child = node.children[idx];
            if !window.contains(&child) {
                window.push(child);
            }
        };
        match navigation {
            Navigation::None => push(current),
            Navigation::ForwardOnly => {
                for idx in current..=(current + radius).min(count - 1) {
                    push(idx);
                }
            }
            Navigation::Normal => {
                let lo = current.saturating_sub(radius);
                let hi = (current + radius).min(count - 1);
                for idx in lo..=hi {
                    push(idx);
                }
            }
            Navigation::Wrap => {
                for offset in 0..=2 * radius {
                    push((current + count * radius + offset - radius) % count);
                }
            }
        }
        window
    }
}

/// Truncates a page number into `0..count`.
fn clamp_index(n: f64, count: usize) -> usize {
    if n <= 0.0 {
        return 0;
    }
    let max = count - 1;
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is positive and compared against max before use"
    )]
    let idx = n as usize;
    idx.min(max)
}

impl ComponentSource for ComponentTree {
    fn frame_index(&self) -> u64 {
        self.frame_index
    }

    fn dirty_components(&self) -> Vec<ComponentId> {
        let mut ids: Vec<_> = self
            .nodes
            .iter()
            .filter(|(_, node)| !node.dirty.is_empty())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn kind(&self, id: ComponentId) -> Option<ComponentKind> {
        self.nodes.get(&id).map(|n| n.kind)
    }

    fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    fn bounds(&self, id: ComponentId) -> Rect {
        self.nodes.get(&id).map_or(Rect::ZERO, |n| n.bounds)
    }

    fn inner_bounds(&self, id: ComponentId) -> Rect {
        self.nodes.get(&id).map_or(Rect::ZERO, |n| n.inner_bounds)
    }

    fn property(&self, id: ComponentId, key: PropertyKey) -> Option<&PropertyValue> {
        self.nodes.get(&id)?.properties.get(&key)
    }

    fn dirty_keys(&self, id: ComponentId) -> DirtySet {
        self.nodes.get(&id).map_or(DirtySet::EMPTY, |n| n.dirty)
    }

    fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    fn displayed_children(&self, id: ComponentId) -> Vec<ComponentId> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        match node.kind {
            ComponentKind::Pager => self.pager_window(node),
            ComponentKind::Sequence | ComponentKind::GridSequence => match node.viewport {
                Some((first, count)) => node
                    .children
                    .iter()
                    .skip(first)
                    .take(count)
                    .copied()
                    .collect(),
                None => node.children.clone(),
            },
            _ => node.children.clone(),
        }
    }

    fn invisible_override(&self, id: ComponentId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.invisible_override)
    }
}

impl UpdateSink for ComponentTree {
    fn update(&mut self, component: ComponentId, kind: UpdateKind, value: PropertyValue) {
        let key = match kind {
            UpdateKind::TextChanged => Some(PropertyKey::Text),
            UpdateKind::PageChanged => Some(PropertyKey::CurrentPage),
            UpdateKind::ScrollPosition => Some(PropertyKey::ScrollPosition),
            UpdateKind::Checked => Some(PropertyKey::Checked),
            UpdateKind::Submit | UpdateKind::Press => None,
        };
        if let Some(key) = key {
            self.set(component, key, value.clone());
        }
        self.updates.push((component, kind, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialize::ChildAction;

    fn pager_with_pages(tree: &mut ComponentTree, n: usize) -> (ComponentId, Vec<ComponentId>) {
        let pager = tree.create(ComponentKind::Pager);
        let pages: Vec<_> = (0..n)
            .map(|_| {
                let page = tree.create(ComponentKind::Frame);
                tree.append_child(pager, page);
                page
            })
            .collect();
        (pager, pages)
    }

    #[test]
    fn pager_window_normal_navigation() {
        let mut tree = ComponentTree::new();
        let (pager, pages) = pager_with_pages(&mut tree, 4);

        assert_eq!(tree.displayed_children(pager), vec![pages[0], pages[1]]);

        tree.set(pager, PropertyKey::CurrentPage, 2.0);
        assert_eq!(
            tree.displayed_children(pager),
            vec![pages[1], pages[2], pages[3]]
        );

        tree.set(pager, PropertyKey::CurrentPage, 3.0);
        assert_eq!(tree.displayed_children(pager), vec![pages[2], pages[3]]);
    }

    #[test]
    fn pager_window_wraps() {
        let mut tree = ComponentTree::new();
        let (pager, pages) = pager_with_pages(&mut tree, 4);
        tree.set(pager, PropertyKey::Navigation, Navigation::Wrap);

        assert_eq!(
            tree.displayed_children(pager),
            vec![pages[3], pages[0], pages[1]]
        );
    }

    #[test]
    fn pager_window_forward_only_and_none() {
        let mut tree = ComponentTree::new();
        let (pager, pages) = pager_with_pages(&mut tree, 4);
        tree.set(pager, PropertyKey::CurrentPage, 1.0);

        tree.set(pager, PropertyKey::Navigation, Navigation::ForwardOnly);
        assert_eq!(tree.displayed_children(pager), vec![pages[1], pages[2]]);

        tree.set(pager, PropertyKey::Navigation, Navigation::None);
        assert_eq!(tree.displayed_children(pager), vec![pages[1]]);
    }

    #[test]
    fn malformed_current_page_is_clamped() {
        let mut tree = ComponentTree::new();
        let (pager, pages) = pager_with_pages(&mut tree, 3);

        tree.set(pager, PropertyKey::CurrentPage, -5.0);
        assert_eq!(tree.displayed_children(pager), vec![pages[0], pages[1]]);

        tree.set(pager, PropertyKey::CurrentPage, 99.0);
        assert_eq!(tree.displayed_children(pager), vec![pages[1], pages[2]]);

        tree.set(pager, PropertyKey::CurrentPage, f64::NAN);
        assert_eq!(tree.displayed_children(pager), vec![pages[0], pages[1]]);
    }

    #[test]
    fn viewport_windows_lazy_lists() {
        let mut tree = ComponentTree::new();
        let list = tree.create(ComponentKind::Sequence);
        let items: Vec<_> = (0..10)
            .map(|_| {
                let item = tree.create(ComponentKind::Text);
                tree.append_child(list, item);
                item
            })
            .collect();

        assert_eq!(tree.displayed_children(list).len(), 10);
        tree.set_viewport(list, 3, 4);
        assert_eq!(tree.displayed_children(list), items[3..7].to_vec());
        tree.set_viewport(list, 8, 4);
        assert_eq!(tree.displayed_children(list), items[8..].to_vec());
    }

    #[test]
    fn mutations_mark_dirty_until_end_frame() {
        let mut tree = ComponentTree::new();
        let text = tree.create(ComponentKind::Text);
        tree.set(text, PropertyKey::Opacity, 0.5);
        tree.set_bounds(
            text,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 0.0, 10.0, 10.0),
        );

        let dirty = tree.dirty_keys(text);
        assert!(dirty.contains(PropertyKey::Opacity));
        assert!(dirty.contains(PropertyKey::Bounds));
        assert_eq!(tree.dirty_components(), vec![text]);

        tree.end_frame();
        assert!(tree.dirty_keys(text).is_empty());
        assert!(tree.dirty_components().is_empty());
        assert_eq!(tree.frame_index(), 1);
    }

    #[test]
    fn child_changes_are_reported() {
        let mut tree = ComponentTree::new();
        let parent = tree.create(ComponentKind::Container);
        let child = tree.create(ComponentKind::Text);

        let change = tree.append_child(parent, child);
        assert_eq!(change.action, ChildAction::Insert);
        assert_eq!(tree.parent(child), Some(parent));

        let change = tree.destroy(child).expect("child was attached");
        assert_eq!(change.action, ChildAction::Remove);
        assert!(!tree.contains(child));
        assert!(tree.children(parent).is_empty());
    }

    #[test]
    fn updates_write_back_and_are_recorded() {
        let mut tree = ComponentTree::new();
        let edit = tree.create(ComponentKind::EditText);
        tree.update(edit, UpdateKind::TextChanged, "typed".into());
        tree.update(edit, UpdateKind::Submit, PropertyValue::Bool(true));

        assert_eq!(tree.text_property(edit, PropertyKey::Text), Some("typed"));
        assert_eq!(tree.take_updates().len(), 2);
    }
}
