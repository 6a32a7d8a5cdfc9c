// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change collection for backends.
//!
//! Evaluation drains every dirty channel once:
//!
//! 1. **PROPS** — widgets whose [`WidgetProps`](super::WidgetProps) were
//!    written since the last evaluation.
//! 2. **LAYOUT** — widgets that requested layout, plus every ancestor the
//!    request propagated to.
//! 3. **TOPOLOGY** — parents whose attached children changed.
//!
//! [`WidgetChanges`] uses raw slot indices (`u32`) rather than
//! [`WidgetId`](super::WidgetId) handles so that backends can index directly
//! via [`props_at`](super::WidgetStore::props_at) without paying for
//! generation checks on every access. Slots destroyed before evaluation are
//! filtered out of every list except `removed`.

use super::store::WidgetStore;
use crate::dirty;

/// The set of changes produced by a single [`WidgetStore::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct WidgetChanges {
    /// Widgets created since the last evaluate.
    pub added: Vec<u32>,
    /// Widgets destroyed since the last evaluate.
    pub removed: Vec<u32>,
    /// Widgets whose properties were written.
    pub props: Vec<u32>,
    /// Widgets that need a layout pass.
    pub layout: Vec<u32>,
    /// Parents whose attached children changed.
    pub reordered: Vec<u32>,
    /// Whether any attach, detach, create, or destroy happened.
    pub topology_changed: bool,
}

impl WidgetChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
        self.props.clear();
        self.layout.clear();
        self.reordered.clear();
        self.topology_changed = false;
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.props.is_empty()
            && self.layout.is_empty()
            && self.reordered.is_empty()
            && !self.topology_changed
    }
}

impl WidgetStore {
    /// Drains all dirty channels and returns the set of changes.
    pub fn evaluate(&mut self) -> WidgetChanges {
        let mut changes = WidgetChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut WidgetChanges) {
        changes.clear();

        changes.topology_changed = core::mem::take(&mut self.topology_dirty);

        changes.props = self
            .dirty
            .drain(dirty::PROPS)
            .deterministic()
            .run()
            .filter(|&idx| self.live[idx as usize])
            .collect();

        changes.layout = self
            .dirty
            .drain(dirty::LAYOUT)
            .affected()
            .deterministic()
            .run()
            .filter(|&idx| self.live[idx as usize])
            .collect();

        changes.reordered = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .filter(|&idx| self.live[idx as usize])
            .collect();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
        changes.added.sort_unstable();
        changes.removed.sort_unstable();
    }
}
