// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Children reconciliation for container widgets.
//!
//! After reconciliation the widgets attached under a container's widget are
//! exactly the widgets of its displayed children, in displayed order. The
//! steps are:
//!
//! 1. Detach the widgets of children named by `Remove` notifications.
//! 2. Detach every widget still attached under the container.
//! 3. Walk the displayed children in order, reattaching the existing widget
//!    or inflating a new one. A child that cannot be inflated is logged and
//!    left out; the rest of the window is still reconciled.
//! 4. Widgets that did not come back are either kept alive, detached, for
//!    cheap reattachment ([`RecyclePolicy::KeepDetached`]) or destroyed
//!    ([`RecyclePolicy::Destroy`]). The policy is chosen per container kind
//!    by [`SyncConfig::recycle_policy`](crate::config::SyncConfig::recycle_policy).
//! 5. Request layout on the container's widget.
//!
//! A kept widget stays bound to its component, so its state is current when
//! it is reattached. A widget whose component was removed from the tree is
//! destroyed regardless of policy. One whose component moved to another
//! container is left detached until the end of the pass, so the new
//! container can pick up the same widget.

use hashbrown::HashSet;

use crate::component::{ComponentId, ComponentSource};
use crate::engine::SyncEngine;
use crate::error::SyncError;
use crate::presenter::Presenter;
use crate::trace::{ReconcileEvent, Tracer};
use crate::widget::WidgetId;

/// Kind of a children-changed notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChildAction {
    /// A child was inserted.
    Insert,
    /// A child was removed.
    Remove,
}

/// One entry of a children-changed notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChildChange {
    /// What happened.
    pub action: ChildAction,
    /// The child it happened to.
    pub child: ComponentId,
}

impl ChildChange {
    /// An insertion of `child`.
    #[must_use]
    pub const fn insert(child: ComponentId) -> Self {
        Self {
            action: ChildAction::Insert,
            child,
        }
    }

    /// A removal of `child`.
    #[must_use]
    pub const fn remove(child: ComponentId) -> Self {
        Self {
            action: ChildAction::Remove,
            child,
        }
    }
}

/// What happens to a child widget that leaves its container's window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecyclePolicy {
    /// Keep the widget alive and bound, but detached.
    KeepDetached,
    /// Destroy the widget and its subtree.
    Destroy,
}

/// Counts from one reconciliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Children attached afterwards.
    pub attached: usize,
    /// Children whose widget was newly created.
    pub created: usize,
    /// Children whose existing widget was reattached.
    pub reattached: usize,
    /// Widgets newly moved to the detached pool.
    pub kept_detached: usize,
    /// Widgets destroyed, including descendants.
    pub destroyed: usize,
    /// Widgets detached because of a `Remove` notification.
    pub removed_by_notification: usize,
}

impl<P: Presenter> SyncEngine<P> {
    /// Applies a children-changed notification for `container` and
    /// reconciles its widget's children.
    ///
    /// Does nothing if `container` has no widget yet.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownComponent`] if the source does not know
    /// `container`.
    pub fn on_children_notification(
        &mut self,
        source: &dyn ComponentSource,
        container: ComponentId,
        changes: &[ChildChange],
    ) -> Result<ReconcileReport, SyncError> {
        if !source.contains(container) {
            return Err(SyncError::UnknownComponent(container));
        }
        let Some(widget) = self.find_widget(container) else {
            return Ok(ReconcileReport::default());
        };
        let mut tracer = Tracer::none();
        let mut report = self.reconcile_children(source, container, widget, changes, &mut tracer);
        report.destroyed += self.flush_orphans(&mut tracer);
        Ok(report)
    }

    /// Reconciles the widgets attached under `parent` with the displayed
    /// children of `container`.
    pub(crate) fn reconcile_children(
        &mut self,
        source: &dyn ComponentSource,
        container: ComponentId,
        parent: WidgetId,
        notifications: &[ChildChange],
        tracer: &mut Tracer<'_>,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut leaving = Vec::new();

        for change in notifications {
            if change.action != ChildAction::Remove {
                continue;
            }
            if let Some(widget) = self.find_widget(change.child)
                && self.store.parent(widget) == Some(parent)
            {
                self.store.detach(widget);
                leaving.push(change.child);
                report.removed_by_notification += 1;
            }
        }

        for widget in self.store.detach_all_children(parent) {
            if let Some(component) = self.presenter.find_component(widget) {
                leaving.push(component);
            }
        }

        let mut displayed = Vec::new();
        for child in displayed_children(source, container) {
            match self.find_widget(child) {
                Some(widget) => {
                    if self.store.is_ancestor_of(widget, parent) {
                        log::warn!(
                            "{container:?}: {child:?} is bound above this container, skipping"
                        );
                        continue;
                    }
                    if self.store.parent(widget).is_some() {
                        self.store.detach(widget);
                    }
                    self.store.attach_child(parent, widget);
                    report.reattached += 1;
                }
                None => match self.inflate(source, child, Some(parent), tracer) {
                    Ok(_) => report.created += 1,
                    Err(err) => {
                        log::error!("{container:?}: cannot inflate {child:?}: {err}");
                        continue;
                    }
                },
            }
            displayed.push(child);
        }

        let shown: HashSet<ComponentId> = displayed.iter().copied().collect();
        leaving.retain(|c| !shown.contains(c));
        self.retire(source, container, &shown, leaving, &mut report, tracer);

        if self.config.verify_reconciliation {
            self.verify_children(container, parent, &displayed);
        }
        report.attached = self.store.child_count(parent);
        self.store.request_layout(parent);

        tracer.reconcile(&ReconcileEvent {
            container,
            widget: parent,
            attached: report.attached,
            created: report.created,
            reattached: report.reattached,
            kept_detached: report.kept_detached,
            destroyed: report.destroyed,
        });
        report
    }

    /// Applies the recycle policy to widgets that left the window and
    /// maintains the container's detached pool.
    fn retire(
        &mut self,
        source: &dyn ComponentSource,
        container: ComponentId,
        shown: &HashSet<ComponentId>,
        leaving: Vec<ComponentId>,
        report: &mut ReconcileReport,
        tracer: &mut Tracer<'_>,
    ) {
        let policy = source
            .kind(container)
            .map(|kind| self.config.recycle_policy(kind));
        let mut pool = self.detached.remove(&container).unwrap_or_default();
        let mut fresh = Vec::new();
        for child in leaving {
            if !pool.contains(&child) {
                pool.push(child);
                fresh.push(child);
            }
        }

        let mut kept = Vec::with_capacity(pool.len());
        for child in pool {
            if shown.contains(&child) {
                continue;
            }
            let Some(widget) = self.find_widget(child) else {
                continue;
            };
            if self.store.parent(widget).is_some() {
                // Reattached elsewhere; no longer ours.
                continue;
            }
            match source.parent(child) {
                Some(p) if p == container && policy == Some(RecyclePolicy::KeepDetached) => {
                    kept.push(child);
                }
                // Moved to another container, which may reconcile later in
                // this pass and reattach the same widget.
                Some(p) if p != container => self.orphans.push(child),
                _ => report.destroyed += self.destroy_subtree(widget, tracer),
            }
        }

        if let Some(cap) = self.config.max_detached_per_container
            && kept.len() > cap
        {
            let excess = kept.len() - cap;
            for child in kept.drain(..excess) {
                if let Some(widget) = self.find_widget(child) {
                    report.destroyed += self.destroy_subtree(widget, tracer);
                }
            }
        }
        report.kept_detached = kept.iter().filter(|c| fresh.contains(c)).count();

        if !kept.is_empty() {
            self.detached.insert(container, kept);
        }
    }

    /// Checks that the widgets under `parent` are exactly those of
    /// `displayed`, in order. Divergence is a bug in reconciliation and
    /// fails debug builds; release builds repair it and carry on.
    fn verify_children(
        &mut self,
        container: ComponentId,
        parent: WidgetId,
        displayed: &[ComponentId],
    ) {
        let consistent = self.detach_undisplayed(container, parent, displayed);
        debug_assert!(consistent, "widget hierarchy diverged under {container:?}");
    }

    /// Returns whether the widgets under `parent` match `displayed`, in
    /// order. On mismatch, detaches every attached widget that is not
    /// displayed, so the tree errs toward a missing widget rather than a
    /// ghost one.
    fn detach_undisplayed(
        &mut self,
        container: ComponentId,
        parent: WidgetId,
        displayed: &[ComponentId],
    ) -> bool {
        let attached = self.store.child_ids(parent);
        let consistent = attached.len() == displayed.len()
            && attached
                .iter()
                .zip(displayed)
                .all(|(w, c)| self.presenter.find_component(*w) == Some(*c));
        if consistent {
            return true;
        }
        log::error!(
            "{container:?}: {} widgets attached for {} displayed children",
            attached.len(),
            displayed.len()
        );
        for widget in attached {
            let shown = self
                .presenter
                .find_component(widget)
                .is_some_and(|c| displayed.contains(&c));
            if !shown {
                self.store.detach(widget);
            }
        }
        false
    }
}

/// The displayed children of `container` that the source knows, with
/// duplicates removed. The container itself and its ancestors are dropped,
/// since attaching them would close a cycle.
fn displayed_children(source: &dyn ComponentSource, container: ComponentId) -> Vec<ComponentId> {
    let mut lineage = HashSet::new();
    let mut next = Some(container);
    while let Some(id) = next {
        if !lineage.insert(id) {
            break;
        }
        next = source.parent(id);
    }

    let mut seen = HashSet::new();
    let mut displayed = Vec::new();
    for child in source.displayed_children(container) {
        if !source.contains(child) {
            log::warn!("{container:?}: displayed child {child:?} does not exist, skipping");
        } else if lineage.contains(&child) {
            log::warn!("{container:?}: {child:?} is the container or an ancestor, skipping");
        } else if !seen.insert(child) {
            log::warn!("{container:?}: {child:?} is displayed twice, skipping");
        } else {
            displayed.push(child);
        }
    }
    displayed
}
