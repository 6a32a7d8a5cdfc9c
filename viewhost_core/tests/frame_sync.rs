// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-frame scenarios driven through the public engine API.

use kurbo::{Insets, Rect};

use viewhost_core::adapter::common::focusable_state;
use viewhost_core::backend::RecordingBackend;
use viewhost_core::component::{
    ComponentId, ComponentKind, ComponentSource, ComponentTree, DirtySet, PropertyKey,
};
use viewhost_core::config::SyncConfig;
use viewhost_core::engine::SyncEngine;
use viewhost_core::load::{CompletionSender, LoadRequest, LoadResult, Loader};
use viewhost_core::registry::AdapterRegistry;
use viewhost_core::widget::ResourceState;

fn engine() -> SyncEngine {
    SyncEngine::new(AdapterRegistry::standard(), SyncConfig::new())
}

/// Components currently attached under `container`'s widget, in order.
fn attached(engine: &SyncEngine, container: ComponentId) -> Vec<ComponentId> {
    let widget = engine.find_widget(container).unwrap();
    engine
        .store()
        .children(widget)
        .map(|w| engine.find_component(w).unwrap())
        .collect()
}

fn list_with_rows(tree: &mut ComponentTree, kind: ComponentKind, rows: usize) -> ComponentId {
    let list = tree.create(kind);
    for row in 0..rows {
        let child = tree.create(ComponentKind::Text);
        tree.set(child, PropertyKey::Text, format!("row {row}"));
        tree.append_child(list, child);
    }
    list
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
fn split_dirty_passes_converge() {
    fn scene() -> (ComponentTree, ComponentId, ComponentId) {
        let mut tree = ComponentTree::new();
        let root = tree.create(ComponentKind::Frame);
        let label = tree.create(ComponentKind::Text);
        tree.append_child(root, label);
        tree.set(label, PropertyKey::Text, "before");
        (tree, root, label)
    }

    let (mut once, root_a, label_a) = scene();
    let (mut split, root_b, label_b) = scene();
    let mut engine_a = engine();
    let mut engine_b = engine();
    engine_a.inflate_hierarchy(&once, root_a).unwrap();
    engine_b.inflate_hierarchy(&split, root_b).unwrap();
    once.end_frame();
    split.end_frame();

    let bounds = Rect::new(10.0, 10.0, 210.0, 60.0);
    let inner = Rect::new(14.0, 12.0, 206.0, 58.0);

    once.set(label_a, PropertyKey::Opacity, 0.25);
    once.set(label_a, PropertyKey::Text, "after");
    once.set_bounds(label_a, bounds, inner);
    engine_a.sync_frame(&once);

    split.set(label_b, PropertyKey::Opacity, 0.25);
    engine_b.sync_frame(&split);
    split.end_frame();
    split.set(label_b, PropertyKey::Text, "after");
    split.set_bounds(label_b, bounds, inner);
    engine_b.sync_frame(&split);

    let a = engine_a.store().props(engine_a.find_widget(label_a).unwrap());
    let b = engine_b.store().props(engine_b.find_widget(label_b).unwrap());
    assert_eq!(a, b);
    assert_eq!(a.padding, Insets::new(4.0, 2.0, 4.0, 2.0));
}

#[test]
fn padding_never_doubles_up() {
    let mut tree = ComponentTree::new();
    let root = tree.create(ComponentKind::Frame);
    let label = tree.create(ComponentKind::Text);
    let degenerate = tree.create(ComponentKind::Text);
    tree.append_child(root, label);
    tree.append_child(root, degenerate);
    tree.set_bounds(
        root,
        Rect::new(0.0, 0.0, 400.0, 300.0),
        Rect::new(20.0, 20.0, 380.0, 280.0),
    );
    tree.set_bounds(
        label,
        Rect::new(20.0, 20.0, 120.0, 60.0),
        Rect::new(25.0, 22.0, 115.0, 58.0),
    );
    // Inner larger than outer: the inset is clamped rather than negative.
    tree.set_bounds(
        degenerate,
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Rect::new(-5.0, -5.0, 15.0, 15.0),
    );

    let mut engine = engine();
    let root_w = engine.inflate_hierarchy(&tree, root).unwrap();
    let store = engine.store();
    assert_eq!(store.props(root_w).padding, Insets::ZERO);
    let label_w = engine.find_widget(label).unwrap();
    assert_eq!(store.props(label_w).padding, Insets::new(5.0, 2.0, 5.0, 2.0));
    assert_eq!(
        store.props(label_w).frame,
        Rect::new(20.0, 20.0, 120.0, 60.0)
    );
    let degenerate_w = engine.find_widget(degenerate).unwrap();
    assert_eq!(store.props(degenerate_w).padding, Insets::ZERO);
}

#[test]
fn viewport_window_matches_at_every_offset() {
    const ROWS: usize = 8;
    let mut tree = ComponentTree::new();
    let list = list_with_rows(&mut tree, ComponentKind::Sequence, ROWS);
    tree.set_viewport(list, 0, 3);
    let mut engine = engine();
    engine.inflate_hierarchy(&tree, list).unwrap();
    assert_eq!(attached(&engine, list), tree.displayed_children(list));

    for first in (0..ROWS).chain((0..ROWS).rev()) {
        tree.end_frame();
        tree.set_viewport(list, first, 3);
        engine.sync_frame(&tree);
        assert_eq!(
            attached(&engine, list),
            tree.displayed_children(list),
            "viewport at {first}"
        );
    }
    // Every row was visible at some point and is kept alive for reuse.
    let kept = engine.detached_count(list) + attached(&engine, list).len();
    assert_eq!(kept, ROWS);
}

#[test]
fn pager_window_matches_at_every_page() {
    const PAGES: usize = 6;
    let mut tree = ComponentTree::new().with_pager_window_radius(1);
    let pager = list_with_rows(&mut tree, ComponentKind::Pager, PAGES);
    let mut engine = engine();
    engine.inflate_hierarchy(&tree, pager).unwrap();

    for page in (0..PAGES).chain((0..PAGES).rev()) {
        tree.end_frame();
        tree.set(pager, PropertyKey::CurrentPage, page as f64);
        engine.sync_frame(&tree);
        assert_eq!(
            attached(&engine, pager),
            tree.displayed_children(pager),
            "current page {page}"
        );
        let pager_w = engine.find_widget(pager).unwrap();
        assert_eq!(
            engine.store().props(pager_w).pager.map(|p| p.current),
            Some(page)
        );
    }
}

#[test]
fn paging_away_and_back_reattaches_the_same_widget() {
    let mut tree = ComponentTree::new().with_pager_window_radius(1);
    let pager = list_with_rows(&mut tree, ComponentKind::Pager, 4);
    let pages = tree.children(pager).to_vec();
    let (a, b, c, d) = (pages[0], pages[1], pages[2], pages[3]);

    let mut engine = engine();
    engine.inflate_hierarchy(&tree, pager).unwrap();
    assert_eq!(attached(&engine, pager), vec![a, b]);
    let widget_a = engine.find_widget(a).unwrap();

    tree.end_frame();
    tree.set(pager, PropertyKey::CurrentPage, 3.0);
    engine.sync_frame(&tree);
    assert_eq!(attached(&engine, pager), vec![c, d]);
    assert!(engine.store().is_alive(widget_a));
    assert_eq!(engine.store().parent(widget_a), None);
    assert_eq!(engine.find_widget(a), Some(widget_a));

    tree.end_frame();
    tree.set(pager, PropertyKey::CurrentPage, 0.0);
    let report = engine.sync_frame(&tree);
    assert_eq!(attached(&engine, pager), vec![a, b]);
    assert_eq!(engine.find_widget(a), Some(widget_a));
    assert_eq!(report.created, 0, "pages come back from the detached pool");
}

#[test]
fn appending_pages_revalidates_the_current_page() {
    let mut tree = ComponentTree::new().with_pager_window_radius(1);
    let pager = list_with_rows(&mut tree, ComponentKind::Pager, 1);
    tree.set(pager, PropertyKey::CurrentPage, 2.0);
    let mut engine = engine();
    let pager_w = engine.inflate_hierarchy(&tree, pager).unwrap();
    assert_eq!(engine.store().props(pager_w).pager.map(|p| p.current), Some(0));

    tree.end_frame();
    for _ in 0..2 {
        let page = tree.create(ComponentKind::Text);
        tree.append_child(pager, page);
    }
    engine.sync_frame(&tree);
    assert_eq!(engine.store().props(pager_w).pager.map(|p| p.current), Some(2));
    assert_eq!(attached(&engine, pager), tree.displayed_children(pager));
}

#[test]
fn removed_frame_child_is_destroyed_but_scrolled_row_is_kept() {
    let mut tree = ComponentTree::new();
    let root = tree.create(ComponentKind::Frame);
    let child = tree.create(ComponentKind::Text);
    tree.append_child(root, child);
    let list = list_with_rows(&mut tree, ComponentKind::Sequence, 4);
    tree.set_viewport(list, 0, 2);
    tree.append_child(root, list);
    let first_row = tree.children(list)[0];

    let mut engine = engine();
    engine.inflate_hierarchy(&tree, root).unwrap();
    let child_w = engine.find_widget(child).unwrap();
    let row_w = engine.find_widget(first_row).unwrap();
    tree.end_frame();

    tree.remove_child(root, child);
    tree.set_viewport(list, 2, 2);
    engine.sync_frame(&tree);

    assert!(!engine.store().is_alive(child_w));
    assert_eq!(engine.find_widget(child), None);
    assert!(engine.store().is_alive(row_w));
    assert_eq!(engine.find_widget(first_row), Some(row_w));
}

#[test]
fn opacity_only_frame_runs_only_the_opacity_handler() {
    let registry = AdapterRegistry::standard();
    let opacity = DirtySet::of(&[PropertyKey::Opacity]);
    for kind in ComponentKind::ALL {
        if kind == ComponentKind::Virtual {
            continue;
        }
        let table = registry.resolve(kind).unwrap().dispatch();
        let resolution = table.resolve(opacity);
        let names: Vec<_> = resolution
            .handlers
            .iter()
            .map(|&i| table.handler_names().nth(i).unwrap())
            .collect();
        assert_eq!(names, ["opacity"], "{kind:?}");
        assert!(resolution.unrecognized.is_empty(), "{kind:?}");
    }

    let mut tree = ComponentTree::new();
    let frame = tree.create(ComponentKind::Frame);
    tree.set(frame, PropertyKey::BorderWidth, 2.0);
    tree.set_bounds(
        frame,
        Rect::new(0.0, 0.0, 50.0, 50.0),
        Rect::new(2.0, 2.0, 48.0, 48.0),
    );
    let mut engine = engine();
    let widget = engine.inflate_hierarchy(&tree, frame).unwrap();
    let mut backend = RecordingBackend::new();
    engine.present(&mut backend);
    let before = engine.store().props(widget).clone();
    tree.end_frame();

    tree.set(frame, PropertyKey::Opacity, 0.5);
    let report = engine.sync_frame(&tree);
    assert_eq!(report.refreshed, 1);

    let after = engine.store().props(widget);
    assert!((after.alpha - 0.5).abs() < f32::EPSILON);
    let mut expected = before;
    expected.alpha = after.alpha;
    assert_eq!(after, &expected);

    let changes = engine.present(&mut backend);
    assert_eq!(changes.props, vec![widget.index()]);
    assert!(changes.layout.is_empty());
    assert!(!changes.topology_changed);
}

#[test]
fn focus_follows_all_sixteen_input_combinations() {
    for bits in 0_u8..16 {
        let focusable = bits & 1 != 0;
        let disabled = bits & 2 != 0;
        let screen_reader = bits & 4 != 0;
        let labelled = bits & 8 != 0;

        let mut tree = ComponentTree::new();
        let c = tree.create(ComponentKind::Frame);
        tree.set(c, PropertyKey::Focusable, focusable);
        tree.set(c, PropertyKey::Disabled, disabled);
        if labelled {
            tree.set(c, PropertyKey::AccessibilityLabel, "Play");
        }
        let mut engine = engine();
        let w = engine.inflate_hierarchy(&tree, c).unwrap();
        engine.set_screen_reader_enabled(&tree, screen_reader);

        assert_eq!(
            engine.store().props(w).focusable,
            focusable_state(focusable, disabled, screen_reader, labelled),
            "focusable={focusable} disabled={disabled} sr={screen_reader} label={labelled}"
        );
    }
}

#[test]
fn completion_for_a_recycled_slot_is_dropped() {
    let mut tree = ComponentTree::new();
    let first = tree.create(ComponentKind::Image);
    tree.set(first, PropertyKey::Source, "first.png");
    let mut engine = engine();
    let first_w = engine.inflate_hierarchy(&tree, first).unwrap();
    let mut loader = QueueLoader::default();
    assert_eq!(engine.dispatch_loads(&mut loader), 1);

    // The widget goes away and its slot is reused by another image.
    assert_eq!(engine.release(first), 1);
    let second = tree.create(ComponentKind::Image);
    tree.set(second, PropertyKey::Source, "second.png");
    let second_w = engine.inflate_hierarchy(&tree, second).unwrap();
    assert_eq!(second_w.index(), first_w.index());
    assert_ne!(second_w, first_w);

    let (request, done) = loader.pending.remove(0);
    assert!(done.complete(
        request.ticket,
        LoadResult::Image {
            width: 4,
            height: 4,
        },
    ));
    assert_eq!(engine.drain_completions(&tree), 0);

    let state = &engine.store().props(second_w).resource.as_ref().unwrap().state;
    assert!(
        matches!(state, ResourceState::Pending { source, .. } if source == "second.png"),
        "stale result must not land: {state:?}"
    );
}
