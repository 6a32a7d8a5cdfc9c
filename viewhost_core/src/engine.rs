// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The synchronization engine.
//!
//! [`SyncEngine`] ties the pieces together. Once per frame it walks the
//! components the source reports dirty and, for each one that already has a
//! widget, runs the adapter's dirty refresh. Containers whose displayed
//! window moved then have their children reconciled. A dirty component
//! without a widget is skipped: widgets come into existence only through
//! [`inflate_hierarchy`](SyncEngine::inflate_hierarchy) or a container's
//! reconciliation, so a component no container displays never gets one.
//!
//! A component that cannot be synchronized is logged and counted in
//! [`FrameReport::failed`]; it never stops the rest of the frame.
//!
//! Everything runs on the caller's thread. The only cross-thread traffic is
//! the completion channel of the [`LoadQueue`], which is drained explicitly
//! by [`drain_completions`](SyncEngine::drain_completions).

use hashbrown::HashMap;

use crate::adapter::{Adapter, BindContext, SyncEnv};
use crate::backend::WidgetBackend;
use crate::component::{
    ComponentId, ComponentKind, ComponentSource, DirtySet, PropertyKey, PropertyValue, UpdateKind,
    UpdateSink,
};
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::load::{LoadQueue, Loader};
use crate::presenter::{BindingMap, Presenter};
use crate::registry::AdapterRegistry;
use crate::trace::{
    FrameBeginEvent, FrameEndEvent, FullBindEvent, RefreshEvent, StaleCompletionEvent, Tracer,
    WidgetCreatedEvent, WidgetDestroyedEvent,
};
use crate::widget::{ResourceState, WidgetChanges, WidgetId, WidgetStore};

/// Dirty keys that move a container's displayed window.
pub const WINDOW_KEYS: DirtySet = DirtySet::of(&[
    PropertyKey::DisplayedChildren,
    PropertyKey::ScrollPosition,
    PropertyKey::CurrentPage,
    PropertyKey::Navigation,
]);

/// Summary of one [`SyncEngine::sync_frame`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame index reported by the source.
    pub frame_index: u64,
    /// Whether the frame had already been synchronized and was skipped.
    pub skipped: bool,
    /// Widgets refreshed through their dispatch table.
    pub refreshed: usize,
    /// Containers whose children were reconciled.
    pub reconciled: usize,
    /// Widgets created, including whole inflated subtrees.
    pub created: usize,
    /// Widgets destroyed.
    pub destroyed: usize,
    /// Dirty components skipped because they could not be synchronized.
    pub failed: usize,
}

/// Keeps a [`WidgetStore`] synchronized with a [`ComponentSource`].
#[derive(Debug)]
pub struct SyncEngine<P: Presenter = BindingMap> {
    pub(crate) registry: AdapterRegistry,
    pub(crate) config: SyncConfig,
    pub(crate) env: SyncEnv,
    pub(crate) store: WidgetStore,
    pub(crate) presenter: P,
    pub(crate) loads: LoadQueue,
    /// Child components whose widgets are detached but alive, per container,
    /// oldest first.
    pub(crate) detached: HashMap<ComponentId, Vec<ComponentId>>,
    /// Children detached from a container they have left, waiting to be
    /// reattached by their new container or destroyed.
    pub(crate) orphans: Vec<ComponentId>,
    /// Components inflated through `inflate_hierarchy`, in call order.
    pub(crate) roots: Vec<ComponentId>,
    pub(crate) last_synced_frame: Option<u64>,
    pub(crate) created_total: usize,
    pub(crate) destroyed_total: usize,
}

impl SyncEngine<BindingMap> {
    /// Creates an engine that owns a fresh [`BindingMap`].
    #[must_use]
    pub fn new(registry: AdapterRegistry, config: SyncConfig) -> Self {
        Self::with_presenter(registry, config, BindingMap::new())
    }
}

impl<P: Presenter> SyncEngine<P> {
    /// Creates an engine that reads and writes bindings through `presenter`.
    #[must_use]
    pub fn with_presenter(registry: AdapterRegistry, config: SyncConfig, presenter: P) -> Self {
        Self {
            registry,
            config,
            env: SyncEnv::default(),
            store: WidgetStore::new(),
            presenter,
            loads: LoadQueue::new(),
            detached: HashMap::new(),
            orphans: Vec::new(),
            roots: Vec::new(),
            last_synced_frame: None,
            created_total: 0,
            destroyed_total: 0,
        }
    }

    // -- Accessors --

    /// The widget store.
    #[must_use]
    pub fn store(&self) -> &WidgetStore {
        &self.store
    }

    /// The binding map.
    #[must_use]
    pub fn bindings(&self) -> &P {
        &self.presenter
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The host environment.
    #[must_use]
    pub fn env(&self) -> &SyncEnv {
        &self.env
    }

    /// The asynchronous load queue.
    pub fn loads_mut(&mut self) -> &mut LoadQueue {
        &mut self.loads
    }

    /// Number of detached-but-alive widgets kept for `container`.
    #[must_use]
    pub fn detached_count(&self, container: ComponentId) -> usize {
        self.detached.get(&container).map_or(0, Vec::len)
    }

    /// The widget bound to `component`, if it is alive.
    #[must_use]
    pub fn find_widget(&self, component: ComponentId) -> Option<WidgetId> {
        self.presenter
            .find_widget(component)
            .filter(|w| self.store.is_alive(*w))
    }

    /// The component `widget` is bound to.
    #[must_use]
    pub fn find_component(&self, widget: WidgetId) -> Option<ComponentId> {
        self.presenter.find_component(widget)
    }

    /// Widgets of the components passed to
    /// [`inflate_hierarchy`](Self::inflate_hierarchy) that are still alive
    /// and unparented, in call order.
    ///
    /// Detached widgets kept for reuse by a container are never roots.
    #[must_use]
    pub fn roots(&self) -> Vec<WidgetId> {
        self.roots
            .iter()
            .filter_map(|&root| self.find_widget(root))
            .filter(|&widget| self.store.parent(widget).is_none())
            .collect()
    }

    // -- Materialization --

    /// Returns the adapter for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Registry`] if no adapter serves `kind`.
    pub fn resolve_adapter(&self, kind: ComponentKind) -> Result<&dyn Adapter, SyncError> {
        Ok(self.registry.resolve(kind)?)
    }

    /// Returns the widget for `component`, creating and fully binding one
    /// if it has none. Children are not touched.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownComponent`] if the source does not know
    /// `component`, or [`SyncError::Registry`] if its variant is unmapped.
    pub fn materialize(
        &mut self,
        source: &dyn ComponentSource,
        component: ComponentId,
    ) -> Result<WidgetId, SyncError> {
        self.materialize_traced(source, component, &mut Tracer::none())
    }

    pub(crate) fn materialize_traced(
        &mut self,
        source: &dyn ComponentSource,
        component: ComponentId,
        tracer: &mut Tracer<'_>,
    ) -> Result<WidgetId, SyncError> {
        if let Some(widget) = self.find_widget(component) {
            return Ok(widget);
        }
        let kind = source
            .kind(component)
            .ok_or(SyncError::UnknownComponent(component))?;
        let adapter = self.registry.resolve(kind)?;
        let widget = adapter.create_widget(&mut self.store);
        self.presenter.bind(component, widget);
        self.created_total += 1;
        tracer.widget_created(&WidgetCreatedEvent {
            component,
            widget,
            kind,
        });

        let mut cx = BindContext {
            source,
            store: &mut self.store,
            env: &self.env,
            loads: &mut self.loads,
        };
        adapter.full_bind(&mut cx, component, widget);
        tracer.full_bind(&FullBindEvent { component, widget });
        Ok(widget)
    }

    /// Materializes `root` and, recursively, every displayed descendant,
    /// attaching each child widget under its parent's, and records `root`
    /// as one of the engine's [`roots`](Self::roots).
    ///
    /// A descendant that cannot be materialized is logged and left without
    /// a widget; its siblings are still inflated.
    ///
    /// # Errors
    ///
    /// Fails like [`materialize`](Self::materialize) if `root` itself cannot
    /// be materialized.
    pub fn inflate_hierarchy(
        &mut self,
        source: &dyn ComponentSource,
        root: ComponentId,
    ) -> Result<WidgetId, SyncError> {
        let mut tracer = Tracer::none();
        let widget = self.inflate(source, root, None, &mut tracer)?;
        self.flush_orphans(&mut tracer);
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
        Ok(widget)
    }

    /// Materializes `component`, attaches it under `parent`, then inflates
    /// its displayed children. Attaching first keeps the widget's ancestry
    /// visible while its subtree is built.
    pub(crate) fn inflate(
        &mut self,
        source: &dyn ComponentSource,
        component: ComponentId,
        parent: Option<WidgetId>,
        tracer: &mut Tracer<'_>,
    ) -> Result<WidgetId, SyncError> {
        let widget = self.materialize_traced(source, component, tracer)?;
        if let Some(parent) = parent {
            self.store.attach_child(parent, widget);
        }
        if self.store.kind(widget).is_container() {
            self.reconcile_children(source, component, widget, &[], tracer);
        }
        Ok(widget)
    }

    // -- Frame loop --

    /// Applies the current frame's dirty keys.
    ///
    /// A frame whose index was already synchronized is skipped, so keys are
    /// never applied twice. Dirty components without a widget are skipped
    /// too; their container, if any, creates one when it displays them.
    pub fn sync_frame(&mut self, source: &dyn ComponentSource) -> FrameReport {
        self.sync_frame_traced(source, &mut Tracer::none())
    }

    /// Like [`sync_frame`](Self::sync_frame), reporting to `tracer`.
    pub fn sync_frame_traced(
        &mut self,
        source: &dyn ComponentSource,
        tracer: &mut Tracer<'_>,
    ) -> FrameReport {
        let frame_index = source.frame_index();
        let mut report = FrameReport {
            frame_index,
            ..FrameReport::default()
        };
        if self.last_synced_frame == Some(frame_index) {
            report.skipped = true;
            return report;
        }

        let created_before = self.created_total;
        let destroyed_before = self.destroyed_total;
        let dirty_components = source.dirty_components();
        tracer.frame_begin(&FrameBeginEvent {
            frame_index,
            dirty_components: dirty_components.len(),
        });

        for component in dirty_components {
            let Some(widget) = self.find_widget(component) else {
                log::trace!("{component:?}: dirty but not materialized, skipped");
                continue;
            };
            if let Err(err) = self.sync_component(source, component, widget, &mut report, tracer) {
                log::error!("{component:?}: {err}, skipped this frame");
                report.failed += 1;
            }
        }

        self.flush_orphans(tracer);
        report.created = self.created_total - created_before;
        report.destroyed = self.destroyed_total - destroyed_before;
        self.last_synced_frame = Some(frame_index);
        tracer.frame_end(&FrameEndEvent {
            frame_index,
            refreshed: report.refreshed,
            reconciled: report.reconciled,
            created: report.created,
            destroyed: report.destroyed,
        });
        report
    }

    /// Refreshes one materialized component and, if its window moved,
    /// reconciles its children.
    fn sync_component(
        &mut self,
        source: &dyn ComponentSource,
        component: ComponentId,
        widget: WidgetId,
        report: &mut FrameReport,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), SyncError> {
        let kind = source
            .kind(component)
            .ok_or(SyncError::UnknownComponent(component))?;
        let adapter = self.registry.resolve(kind)?;
        let dirty = source.dirty_keys(component);

        // The displayed window is the materializer's business; only adapters
        // that mirror it onto the widget see the key.
        let mut keys = dirty;
        if !adapter.dispatch().keys().contains(PropertyKey::DisplayedChildren) {
            keys.remove(PropertyKey::DisplayedChildren);
        }
        if !keys.is_empty() {
            let mut cx = BindContext {
                source,
                store: &mut self.store,
                env: &self.env,
                loads: &mut self.loads,
            };
            let outcome = adapter.refresh(&mut cx, component, widget, keys);
            tracer.refresh(&RefreshEvent {
                component,
                widget,
                dirty: keys,
                handlers: &outcome.invoked,
                unrecognized: outcome.unrecognized,
            });
            report.refreshed += 1;
        }

        if kind.is_container() && dirty.intersects(WINDOW_KEYS) {
            self.reconcile_children(source, component, widget, &[], tracer);
            report.reconciled += 1;
        }
        Ok(())
    }

    /// Evaluates the widget store and hands the changes to `backend`.
    pub fn present(&mut self, backend: &mut dyn WidgetBackend) -> WidgetChanges {
        let changes = self.store.evaluate();
        backend.apply(&self.store, &changes);
        changes
    }

    // -- Inbound events --

    /// Routes a user-originated change on `widget` back to the engine that
    /// owns the component tree.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::StaleWidget`] if `widget` is dead or unbound.
    pub fn on_user_update(
        &mut self,
        widget: WidgetId,
        kind: UpdateKind,
        value: PropertyValue,
        sink: &mut dyn UpdateSink,
    ) -> Result<(), SyncError> {
        if !self.store.is_alive(widget) {
            return Err(SyncError::StaleWidget(widget));
        }
        let component = self
            .presenter
            .find_component(widget)
            .ok_or(SyncError::StaleWidget(widget))?;
        sink.update(component, kind, value);
        Ok(())
    }

    /// Switches the assistive-technology signal and recomputes
    /// focusability of every bound widget.
    ///
    /// Each widget is refreshed through its own adapter with a `Focusable`
    /// dirty key, so variants that ignore focus keep ignoring it.
    pub fn set_screen_reader_enabled(&mut self, source: &dyn ComponentSource, enabled: bool) {
        if self.env.screen_reader_enabled == enabled {
            return;
        }
        self.env.screen_reader_enabled = enabled;
        let keys = DirtySet::of(&[PropertyKey::Focusable]);
        for (component, widget) in self.presenter.bound() {
            if !self.store.is_alive(widget) || !source.contains(component) {
                continue;
            }
            let kind = self.store.kind(widget);
            let adapter = match self.registry.resolve(kind) {
                Ok(adapter) => adapter,
                Err(err) => {
                    log::error!("{component:?}: {err}, focus not recomputed");
                    continue;
                }
            };
            let mut cx = BindContext {
                source,
                store: &mut self.store,
                env: &self.env,
                loads: &mut self.loads,
            };
            adapter.refresh(&mut cx, component, widget, keys);
        }
    }

    // -- Asynchronous loads --

    /// Hands every queued load request to `loader`.
    ///
    /// Returns the number of requests dispatched.
    pub fn dispatch_loads(&mut self, loader: &mut dyn Loader) -> usize {
        let requests = self.loads.take_requests();
        let count = requests.len();
        for request in requests {
            loader.load(request, self.loads.sender());
        }
        count
    }

    /// Applies every completion received so far.
    ///
    /// Returns the number of completions applied. Stale completions are
    /// dropped, and one whose widget variant has no adapter is logged and
    /// dropped without holding back the rest.
    pub fn drain_completions(&mut self, source: &dyn ComponentSource) -> usize {
        self.drain_completions_traced(source, &mut Tracer::none())
    }

    /// Like [`drain_completions`](Self::drain_completions), reporting to
    /// `tracer`.
    pub fn drain_completions_traced(
        &mut self,
        source: &dyn ComponentSource,
        tracer: &mut Tracer<'_>,
    ) -> usize {
        let mut applied = 0;
        for completion in self.loads.try_recv_all() {
            let ticket = completion.ticket;
            let current = source
                .kind(ticket.component)
                .filter(|_| self.is_current(ticket.widget, ticket.component, ticket.id));
            let Some(kind) = current else {
                log::trace!("dropping stale completion {ticket:?}");
                tracer.stale_completion(&StaleCompletionEvent { ticket });
                continue;
            };
            self.loads.resolve(ticket.widget, ticket.id, completion.result);
            let adapter = match self.registry.resolve(kind) {
                Ok(adapter) => adapter,
                Err(err) => {
                    log::error!("{:?}: {err}, completion dropped", ticket.component);
                    continue;
                }
            };
            let mut cx = BindContext {
                source,
                store: &mut self.store,
                env: &self.env,
                loads: &mut self.loads,
            };
            let keys = DirtySet::of(&[ticket.key]);
            let outcome = adapter.refresh(&mut cx, ticket.component, ticket.widget, keys);
            tracer.refresh(&RefreshEvent {
                component: ticket.component,
                widget: ticket.widget,
                dirty: keys,
                handlers: &outcome.invoked,
                unrecognized: outcome.unrecognized,
            });
            applied += 1;
        }
        applied
    }

    /// Whether a completion for `ticket` may still be applied to `widget`:
    /// the widget is alive, still bound to `component`, and still waiting
    /// on that exact ticket.
    fn is_current(&self, widget: WidgetId, component: ComponentId, ticket: u64) -> bool {
        self.store.is_alive(widget)
            && self.presenter.find_component(widget) == Some(component)
            && self
                .store
                .props(widget)
                .resource
                .as_ref()
                .is_some_and(|view| {
                    matches!(view.state, ResourceState::Pending { ticket: t, .. } if t == ticket)
                })
    }

    // -- Teardown --

    /// Destroys the widget of `component` and its whole widget subtree,
    /// including detached widgets kept for it, and forgets `component` as a
    /// root.
    ///
    /// Returns the number of widgets destroyed.
    pub fn release(&mut self, component: ComponentId) -> usize {
        self.roots.retain(|&root| root != component);
        match self.find_widget(component) {
            Some(widget) => self.destroy_subtree(widget, &mut Tracer::none()),
            None => 0,
        }
    }

    /// Destroys every orphaned widget that no container reattached.
    pub(crate) fn flush_orphans(&mut self, tracer: &mut Tracer<'_>) -> usize {
        let mut destroyed = 0;
        for child in core::mem::take(&mut self.orphans) {
            if let Some(widget) = self.find_widget(child)
                && self.store.parent(widget).is_none()
            {
                destroyed += self.destroy_subtree(widget, tracer);
            }
        }
        destroyed
    }

    /// Destroys `root`, its attached descendants, and every detached widget
    /// kept for any of them. Bindings and queued loads are dropped too.
    pub(crate) fn destroy_subtree(&mut self, root: WidgetId, tracer: &mut Tracer<'_>) -> usize {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(widget) = stack.pop() {
            order.push(widget);
            stack.extend(self.store.children(widget));
            let pooled = self
                .presenter
                .find_component(widget)
                .and_then(|c| self.detached.remove(&c))
                .unwrap_or_default();
            for child in pooled {
                if let Some(w) = self.find_widget(child)
                    && self.store.parent(w).is_none()
                {
                    stack.push(w);
                }
            }
        }

        // Pre-order reversed: every child goes before its parent.
        for &widget in order.iter().rev() {
            let component = self.presenter.unbind_widget(widget);
            tracer.widget_destroyed(&WidgetDestroyedEvent { component, widget });
            self.loads.cancel_widget(widget);
            self.store.destroy_widget(widget);
        }
        self.destroyed_total += order.len();
        order.len()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::backend::RecordingBackend;
    use crate::component::ComponentTree;
    use crate::load::{CompletionSender, LoadRequest, LoadResult};
    use crate::widget::Visibility;

    fn engine() -> SyncEngine {
        SyncEngine::new(AdapterRegistry::standard(), SyncConfig::new())
    }

    #[test]
    fn materialize_is_create_or_fetch() {
        let mut tree = ComponentTree::new();
        let text = tree.create(ComponentKind::Text);
        tree.set(text, PropertyKey::Text, "hi");
        let mut engine = engine();

        let a = engine.materialize(&tree, text).unwrap();
        let b = engine.materialize(&tree, text).unwrap();
        assert_eq!(a, b, "second materialize must fetch");
        assert_eq!(engine.store().props(a).bind_count, 1);
        assert_eq!(engine.find_component(a), Some(text));
    }

    #[test]
    fn unknown_component_is_an_error() {
        let tree = ComponentTree::new();
        let mut engine = engine();
        assert_eq!(
            engine.materialize(&tree, ComponentId(99)),
            Err(SyncError::UnknownComponent(ComponentId(99)))
        );
    }

    #[test]
    fn inflate_attaches_children_in_order() {
        let mut tree = ComponentTree::new();
        let root = tree.create(ComponentKind::Container);
        let frame = tree.create(ComponentKind::Frame);
        let text = tree.create(ComponentKind::Text);
        let image = tree.create(ComponentKind::Image);
        tree.append_child(root, frame);
        tree.append_child(frame, text);
        tree.append_child(root, image);

        let mut engine = engine();
        let w = engine.inflate_hierarchy(&tree, root).unwrap();
        let kids: Vec<_> = engine
            .store()
            .children(w)
            .map(|c| engine.find_component(c).unwrap())
            .collect();
        assert_eq!(kids, vec![frame, image]);
        let frame_w = engine.find_widget(frame).unwrap();
        assert_eq!(engine.store().child_count(frame_w), 1);
        assert_eq!(engine.store().live_count(), 4);
    }

    #[test]
    fn frames_are_not_replayed() {
        let mut tree = ComponentTree::new();
        let text = tree.create(ComponentKind::Text);
        let mut engine = engine();
        let w = engine.inflate_hierarchy(&tree, text).unwrap();
        tree.end_frame();

        tree.set(text, PropertyKey::Opacity, 0.5);
        let report = engine.sync_frame(&tree);
        assert_eq!(report.refreshed, 1);
        assert!(!report.skipped);

        let report = engine.sync_frame(&tree);
        assert!(report.skipped, "same frame index must not be applied twice");
        assert_eq!(engine.store().props(w).alpha, 0.5);
    }

    #[test]
    fn dirty_component_without_widget_is_skipped() {
        let mut tree = ComponentTree::new();
        let root = tree.create(ComponentKind::Container);
        let child = tree.create(ComponentKind::Text);
        tree.append_child(root, child);

        let mut engine = engine();
        let report = engine.sync_frame(&tree);
        assert_eq!(report.created, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(engine.store().live_count(), 0);
        assert!(engine.roots().is_empty());
    }

    /// Removes `child` from `root` and dirties it in the same frame.
    fn remove_and_dirty(tree: &mut ComponentTree, root: ComponentId, child: ComponentId) {
        tree.remove_child(root, child);
        tree.set(child, PropertyKey::Opacity, 0.25);
    }

    #[test]
    fn removed_child_dirtied_after_its_parent_is_not_revived() {
        let mut tree = ComponentTree::new();
        let root = tree.create(ComponentKind::Container);
        let child = tree.create(ComponentKind::Container);
        let leaf = tree.create(ComponentKind::Text);
        tree.append_child(root, child);
        tree.append_child(child, leaf);
        let mut engine = engine();
        engine.inflate_hierarchy(&tree, root).unwrap();
        tree.end_frame();

        remove_and_dirty(&mut tree, root, child);
        let report = engine.sync_frame(&tree);
        assert_eq!(report.created, 0);
        assert_eq!(report.destroyed, 2);
        assert_eq!(engine.find_widget(child), None);
        assert_eq!(engine.find_widget(leaf), None);
        assert_eq!(engine.store().live_count(), 1);
        assert_eq!(engine.roots(), vec![engine.find_widget(root).unwrap()]);
    }

    #[test]
    fn removed_child_dirtied_before_its_parent_is_not_revived() {
        let mut tree = ComponentTree::new();
        // Created first, so it is visited ahead of the container.
        let child = tree.create(ComponentKind::Text);
        let root = tree.create(ComponentKind::Container);
        tree.append_child(root, child);
        let mut engine = engine();
        engine.inflate_hierarchy(&tree, root).unwrap();
        tree.end_frame();

        remove_and_dirty(&mut tree, root, child);
        let report = engine.sync_frame(&tree);
        assert_eq!(report.created, 0);
        assert_eq!(report.destroyed, 1);
        assert_eq!(engine.find_widget(child), None);
        assert_eq!(engine.store().live_count(), 1);
        assert_eq!(engine.roots().len(), 1);
    }

    #[test]
    fn user_updates_route_to_bound_component() {
        let mut tree = ComponentTree::new();
        let edit = tree.create(ComponentKind::EditText);
        let mut engine = engine();
        let w = engine.materialize(&tree, edit).unwrap();

        engine
            .on_user_update(w, UpdateKind::TextChanged, "typed".into(), &mut tree)
            .unwrap();
        assert_eq!(tree.text_property(edit, PropertyKey::Text), Some("typed"));

        engine.release(edit);
        assert_eq!(
            engine.on_user_update(w, UpdateKind::Submit, true.into(), &mut tree),
            Err(SyncError::StaleWidget(w))
        );
    }

    #[test]
    fn screen_reader_toggle_recomputes_focus() {
        let mut tree = ComponentTree::new();
        let text = tree.create(ComponentKind::Text);
        tree.set(text, PropertyKey::AccessibilityLabel, "Title");
        let mut engine = engine();
        let w = engine.materialize(&tree, text).unwrap();
        assert!(!engine.store().props(w).focusable);

        engine.set_screen_reader_enabled(&tree, true);
        assert!(engine.store().props(w).focusable);
        engine.set_screen_reader_enabled(&tree, false);
        assert!(!engine.store().props(w).focusable);
    }

    #[test]
    fn screen_reader_toggle_leaves_virtual_widgets_alone() {
        let mut tree = ComponentTree::new();
        let virt = tree.create(ComponentKind::Virtual);
        tree.set(virt, PropertyKey::AccessibilityLabel, "Hidden");
        let mut engine = engine();
        let w = engine.materialize(&tree, virt).unwrap();

        engine.set_screen_reader_enabled(&tree, true);
        assert!(!engine.store().props(w).focusable);
        assert_eq!(engine.store().props(w).visibility, Visibility::Gone);
    }

    #[derive(Default)]
    struct QueueLoader {
        pending: Vec<(LoadRequest, CompletionSender)>,
    }

    impl Loader for QueueLoader {
        fn load(&mut self, request: LoadRequest, done: CompletionSender) {
            self.pending.push((request, done));
        }
    }

    #[test]
    fn completion_refreshes_through_source_handler() {
        let mut tree = ComponentTree::new();
        let image = tree.create(ComponentKind::Image);
        tree.set(image, PropertyKey::Source, "a.png");
        let mut engine = engine();
        let w = engine.materialize(&tree, image).unwrap();

        let mut loader = QueueLoader::default();
        assert_eq!(engine.dispatch_loads(&mut loader), 1);
        let (request, done) = loader.pending.pop().unwrap();
        done.complete(
            request.ticket,
            LoadResult::Image {
                width: 10,
                height: 20,
            },
        );

        assert_eq!(engine.drain_completions(&tree), 1);
        assert_eq!(
            engine.store().props(w).resource.as_ref().unwrap().state,
            ResourceState::Loaded {
                source: "a.png".into(),
                width: 10,
                height: 20,
            }
        );
    }

    #[test]
    fn superseded_completion_is_dropped() {
        let mut tree = ComponentTree::new();
        let image = tree.create(ComponentKind::Image);
        tree.set(image, PropertyKey::Source, "a.png");
        let mut engine = engine();
        let w = engine.inflate_hierarchy(&tree, image).unwrap();
        let mut loader = QueueLoader::default();
        engine.dispatch_loads(&mut loader);
        tree.end_frame();

        // The source changes while the first load is in flight.
        tree.set(image, PropertyKey::Source, "b.png");
        engine.sync_frame(&tree);
        let (old, done) = loader.pending.remove(0);
        done.complete(old.ticket, LoadResult::Failed);

        assert_eq!(engine.drain_completions(&tree), 0);
        let state = &engine.store().props(w).resource.as_ref().unwrap().state;
        assert!(
            matches!(state, ResourceState::Pending { source, .. } if source == "b.png"),
            "stale result must not land: {state:?}"
        );
    }

    #[test]
    fn release_destroys_subtree_and_bindings() {
        let mut tree = ComponentTree::new();
        let root = tree.create(ComponentKind::Frame);
        let child = tree.create(ComponentKind::Text);
        tree.append_child(root, child);
        let mut engine = engine();
        engine.inflate_hierarchy(&tree, root).unwrap();

        assert_eq!(engine.roots().len(), 1);
        assert_eq!(engine.release(root), 2);
        assert_eq!(engine.store().live_count(), 0);
        assert!(engine.roots().is_empty());
        assert!(engine.bindings().is_empty());
        assert_eq!(engine.release(root), 0);
    }

    #[test]
    fn present_hands_changes_to_backend() {
        let mut tree = ComponentTree::new();
        let root = tree.create(ComponentKind::Container);
        let virt = tree.create(ComponentKind::Virtual);
        tree.append_child(root, virt);
        tree.set_bounds(
            root,
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
        );
        let mut engine = engine();
        engine.inflate_hierarchy(&tree, root).unwrap();

        let mut backend = RecordingBackend::new();
        let changes = engine.present(&mut backend);
        assert_eq!(changes.added.len(), 2);
        assert!(changes.topology_changed);
        assert_eq!(backend.frames.len(), 1);

        let virt_w = engine.find_widget(virt).unwrap();
        assert_eq!(engine.store().props(virt_w).visibility, Visibility::Gone);
        assert!(engine.present(&mut backend).is_empty());
    }
}
