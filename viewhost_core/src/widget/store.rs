// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays widget storage with allocation, topology, and property management.

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, WidgetId};
use super::props::WidgetProps;
use crate::component::ComponentKind;
use crate::dirty;

/// Struct-of-arrays storage for all platform widgets.
///
/// Widgets are addressed by [`WidgetId`] handles. Internally, each widget
/// occupies a slot in parallel arrays. Destroyed widgets are recycled via a
/// free list, and generation counters prevent stale handle access.
///
/// The store is the only place widget state lives. Adapters write
/// [`WidgetProps`] through [`props_mut`](Self::props_mut), the materializer
/// edits topology, and backends read both after
/// [`evaluate`](Self::evaluate).
#[derive(Debug)]
pub struct WidgetStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) last_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Properties (written by adapters) --
    pub(crate) props: Vec<WidgetProps>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) live: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    /// Set by any create, destroy, attach, or detach since the last evaluate.
    pub(crate) topology_dirty: bool,
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for WidgetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetStore {
    /// Creates an empty widget store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            last_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            props: Vec::new(),
            generation: Vec::new(),
            live: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            topology_dirty: false,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new widget for `kind` and returns its handle.
    ///
    /// The widget starts detached, with [`WidgetProps::new`] defaults.
    pub fn create_widget(&mut self, kind: ComponentKind) -> WidgetId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.last_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.props[i] = WidgetProps::new(kind);
            self.live[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.last_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.props.push(WidgetProps::new(kind));
            self.generation.push(0);
            self.live.push(true);
            idx
        };

        self.topology_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::PROPS);

        WidgetId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a widget, freeing its slot for reuse.
    ///
    /// A widget created and destroyed between two evaluations is reported in
    /// neither [`added`](super::WidgetChanges::added) nor
    /// [`removed`](super::WidgetChanges::removed).
    ///
    /// # Panics
    ///
    /// Panics if the widget has attached children (detach or destroy them
    /// first) or if the handle is stale.
    pub fn destroy_widget(&mut self, id: WidgetId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy widget with attached children"
        );

        if self.parent[idx as usize] != INVALID {
            self.detach_idx(idx);
        }

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.live[idx as usize] = false;

        self.free_list.push(idx);
        self.topology_dirty = true;
        if let Some(pos) = self.pending_added.iter().position(|&a| a == idx) {
            self.pending_added.swap_remove(pos);
        } else {
            self.pending_removed.push(idx);
        }
    }

    /// Returns whether the given handle refers to a live widget.
    #[must_use]
    pub fn is_alive(&self, id: WidgetId) -> bool {
        id.idx < self.len
            && self.live[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live widgets.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.iter().filter(|&&l| l).count()
    }

    // -- Topology API --

    /// Attaches `child` as the last child of `parent`.
    ///
    /// Adds a [`LAYOUT`](dirty::LAYOUT) edge so layout requests on `child`
    /// reach `parent`, and marks `parent` for [`TOPOLOGY`](dirty::TOPOLOGY).
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` is already attached, or
    /// if `child` is `parent` or one of its ancestors.
    pub fn attach_child(&mut self, parent: WidgetId, child: WidgetId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "widget is already attached"
        );
        assert!(
            !self.is_ancestor_or_self(c, p),
            "attaching {child:?} under {parent:?} would create a cycle"
        );

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = INVALID;
        let last = self.last_child[p as usize];
        self.prev_sibling[c as usize] = last;
        if last == INVALID {
            self.first_child[p as usize] = c;
        } else {
            self.next_sibling[last as usize] = c;
        }
        self.last_child[p as usize] = c;

        // Parent depends on child for LAYOUT: marking the child dirties the parent.
        let _ = self.dirty.add_dependency(p, c, dirty::LAYOUT);

        self.topology_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Detaches `child` from its parent.
    ///
    /// Returns `false` if it was not attached. The widget stays alive and
    /// keeps its properties and children.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn detach(&mut self, child: WidgetId) -> bool {
        self.validate(child);
        if self.parent[child.idx as usize] == INVALID {
            return false;
        }
        self.detach_idx(child.idx);
        true
    }

    /// Detaches every attached child of `parent`, returning them in their
    /// former order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn detach_all_children(&mut self, parent: WidgetId) -> Vec<WidgetId> {
        let kids = self.child_ids(parent);
        for &kid in &kids {
            self.detach_idx(kid.idx);
        }
        kids
    }

    /// Returns the parent of a widget, if it is attached.
    #[must_use]
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(WidgetId {
                idx: p,
                generation: self.generation[p as usize],
            })
        }
    }

    /// Returns an iterator over the attached children of a widget, in
    /// attach order. It can also be walked from the last child backwards.
    #[must_use]
    pub fn children(&self, id: WidgetId) -> Children<'_> {
        self.validate(id);
        Children {
            store: self,
            front: self.first_child[id.idx as usize],
            back: self.last_child[id.idx as usize],
        }
    }

    /// Collects the attached children of a widget.
    #[must_use]
    pub fn child_ids(&self, id: WidgetId) -> Vec<WidgetId> {
        self.children(id).collect()
    }

    /// Returns the number of attached children of a widget.
    #[must_use]
    pub fn child_count(&self, id: WidgetId) -> usize {
        self.children(id).count()
    }

    /// Whether `ancestor` is `id` itself or one of its attached ancestors.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        self.validate(ancestor);
        self.validate(id);
        self.is_ancestor_or_self(ancestor.idx, id.idx)
    }

    // -- Property API --

    /// Returns the properties of a widget.
    #[must_use]
    pub fn props(&self, id: WidgetId) -> &WidgetProps {
        self.validate(id);
        &self.props[id.idx as usize]
    }

    /// Returns the properties of a widget for writing and marks it for
    /// [`PROPS`](dirty::PROPS).
    pub fn props_mut(&mut self, id: WidgetId) -> &mut WidgetProps {
        self.validate(id);
        self.dirty.mark(id.idx, dirty::PROPS);
        &mut self.props[id.idx as usize]
    }

    /// Returns the variant a widget was created for.
    #[must_use]
    pub fn kind(&self, id: WidgetId) -> ComponentKind {
        self.props(id).kind
    }

    /// Requests a layout pass for a widget and all of its ancestors.
    pub fn request_layout(&mut self, id: WidgetId) {
        self.validate(id);
        self.dirty.mark_with(id.idx, dirty::LAYOUT, &EagerPolicy);
    }

    // -- Raw-index accessors for backends --
    //
    // These accept raw slot indices (as found in `WidgetChanges`) rather than
    // `WidgetId` handles, skipping generation validation.

    /// Returns the properties at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn props_at(&self, idx: u32) -> &WidgetProps {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        &self.props[idx as usize]
    }

    /// Returns the parent slot of raw slot `idx`, if attached.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn parent_at(&self, idx: u32) -> Option<u32> {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        let p = self.parent[idx as usize];
        (p != INVALID).then_some(p)
    }

    /// Returns the handle currently occupying raw slot `idx`, if live.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> Option<WidgetId> {
        (idx < self.len && self.live[idx as usize]).then(|| WidgetId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    fn validate(&self, id: WidgetId) {
        assert!(
            self.is_alive(id),
            "stale WidgetId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn is_ancestor_or_self(&self, ancestor: u32, mut idx: u32) -> bool {
        while idx != INVALID {
            if idx == ancestor {
                return true;
            }
            idx = self.parent[idx as usize];
        }
        false
    }

    /// Unlinks `idx` from its parent and drops the layout edge.
    fn detach_idx(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev == INVALID {
            self.first_child[p as usize] = next;
        } else {
            self.next_sibling[prev as usize] = next;
        }
        if next == INVALID {
            self.last_child[p as usize] = prev;
        } else {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;

        self.dirty.remove_dependency(p, idx, dirty::LAYOUT);
        self.topology_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }
}

/// The attached children of a widget.
///
/// Created by [`WidgetStore::children`]. Yields children front to back, or
/// back to front through [`DoubleEndedIterator`]; the two ends meet without
/// yielding any child twice.
#[derive(Clone, Debug)]
pub struct Children<'a> {
    store: &'a WidgetStore,
    front: u32,
    back: u32,
}

impl Children<'_> {
    fn handle(&self, idx: u32) -> WidgetId {
        WidgetId {
            idx,
            generation: self.store.generation[idx as usize],
        }
    }

    /// Marks the iterator exhausted once `idx`, the last unvisited child,
    /// has been taken from either end.
    fn take(&mut self, idx: u32) -> WidgetId {
        if self.front == self.back {
            self.front = INVALID;
            self.back = INVALID;
        }
        self.handle(idx)
    }
}

impl Iterator for Children<'_> {
    type Item = WidgetId;

    fn next(&mut self) -> Option<WidgetId> {
        let idx = self.front;
        if idx == INVALID {
            return None;
        }
        let item = self.take(idx);
        if self.front != INVALID {
            self.front = self.store.next_sibling[idx as usize];
        }
        Some(item)
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<WidgetId> {
        let idx = self.back;
        if idx == INVALID {
            return None;
        }
        let item = self.take(idx);
        if self.back != INVALID {
            self.back = self.store.prev_sibling[idx as usize];
        }
        Some(item)
    }
}
