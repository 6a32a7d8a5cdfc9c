// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that exercises synchronization and diagnostics.
//!
//! Builds a component tree with a pager, a lazy list, and an image, then runs
//! a handful of frames that page forward and back, scroll the list, fade a
//! label, and resolve the image on a worker thread. Every engine event goes to
//! a [`PrettyPrintSink`](viewhost_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](viewhost_debug::recorder::RecorderSink); the final widget
//! tree is written out as a JSON snapshot.

use std::fs::File;
use std::io::BufWriter;
use std::thread::{self, JoinHandle};

use kurbo::Rect;

use viewhost_core::backend::WidgetBackend;
use viewhost_core::component::{ComponentId, ComponentKind, ComponentTree, PropertyKey};
use viewhost_core::config::SyncConfig;
use viewhost_core::engine::SyncEngine;
use viewhost_core::load::{CompletionSender, LoadRequest, LoadResult, Loader};
use viewhost_core::registry::AdapterRegistry;
use viewhost_core::trace::{
    FrameBeginEvent, FrameEndEvent, FullBindEvent, ReconcileEvent, RefreshEvent,
    StaleCompletionEvent, SyncTraceSink, Tracer, WidgetCreatedEvent, WidgetDestroyedEvent,
};
use viewhost_core::widget::{WidgetChanges, WidgetStore};

use viewhost_debug::pretty::PrettyPrintSink;
use viewhost_debug::recorder::{RecordedEvent, RecorderSink, decode};
use viewhost_debug::snapshot;

const FRAME_COUNT: u64 = 12;
const PAGE_COUNT: usize = 4;
const ROW_COUNT: usize = 20;
const ROWS_VISIBLE: usize = 5;

/// Fans trace events out to two sinks.
struct Tee<'a> {
    a: &'a mut dyn SyncTraceSink,
    b: &'a mut dyn SyncTraceSink,
}

impl SyncTraceSink for Tee<'_> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.a.on_frame_begin(e);
        self.b.on_frame_begin(e);
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.a.on_frame_end(e);
        self.b.on_frame_end(e);
    }

    fn on_widget_created(&mut self, e: &WidgetCreatedEvent) {
        self.a.on_widget_created(e);
        self.b.on_widget_created(e);
    }

    fn on_widget_destroyed(&mut self, e: &WidgetDestroyedEvent) {
        self.a.on_widget_destroyed(e);
        self.b.on_widget_destroyed(e);
    }

    fn on_full_bind(&mut self, e: &FullBindEvent) {
        self.a.on_full_bind(e);
        self.b.on_full_bind(e);
    }

    fn on_refresh(&mut self, e: &RefreshEvent<'_>) {
        self.a.on_refresh(e);
        self.b.on_refresh(e);
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.a.on_reconcile(e);
        self.b.on_reconcile(e);
    }

    fn on_stale_completion(&mut self, e: &StaleCompletionEvent) {
        self.a.on_stale_completion(e);
        self.b.on_stale_completion(e);
    }
}

/// Resolves every request on its own thread with a fixed image size.
#[derive(Default)]
struct ThreadLoader {
    workers: Vec<JoinHandle<()>>,
}

impl ThreadLoader {
    fn join_all(&mut self) {
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Loader for ThreadLoader {
    fn load(&mut self, request: LoadRequest, done: CompletionSender) {
        self.workers.push(thread::spawn(move || {
            let result = if request.source.ends_with(".png") {
                LoadResult::Image {
                    width: 320,
                    height: 180,
                }
            } else {
                LoadResult::Failed
            };
            done.complete(request.ticket, result);
        }));
    }
}

/// Prints a one-line summary of each evaluated batch.
struct ConsoleBackend;

impl WidgetBackend for ConsoleBackend {
    fn apply(&mut self, store: &WidgetStore, changes: &WidgetChanges) {
        if changes.is_empty() {
            return;
        }
        println!(
            "[present] live={} added={} removed={} props={} layout={} reordered={}",
            store.live_count(),
            changes.added.len(),
            changes.removed.len(),
            changes.props.len(),
            changes.layout.len(),
            changes.reordered.len(),
        );
    }
}

struct Scene {
    root: ComponentId,
    pager: ComponentId,
    list: ComponentId,
    label: ComponentId,
}

fn build_scene(tree: &mut ComponentTree) -> Scene {
    let root = tree.create(ComponentKind::Frame);
    tree.set_bounds(
        root,
        Rect::new(0.0, 0.0, 1280.0, 720.0),
        Rect::new(16.0, 16.0, 1264.0, 704.0),
    );

    let label = tree.create(ComponentKind::Text);
    tree.set(label, PropertyKey::Text, "Now playing");
    tree.append_child(root, label);

    let image = tree.create(ComponentKind::Image);
    tree.set(image, PropertyKey::Source, "cover.png");
    tree.append_child(root, image);

    let pager = tree.create(ComponentKind::Pager);
    for page in 0..PAGE_COUNT {
        let child = tree.create(ComponentKind::Text);
        tree.set(child, PropertyKey::Text, format!("Page {page}"));
        tree.append_child(pager, child);
    }
    tree.append_child(root, pager);

    let list = tree.create(ComponentKind::Sequence);
    for row in 0..ROW_COUNT {
        let child = tree.create(ComponentKind::Text);
        tree.set(child, PropertyKey::Text, format!("Row {row}"));
        tree.append_child(list, child);
    }
    tree.set_viewport(list, 0, ROWS_VISIBLE);
    tree.append_child(root, list);

    Scene {
        root,
        pager,
        list,
        label,
    }
}

/// Applies the scripted mutations for `frame`.
fn script(tree: &mut ComponentTree, scene: &Scene, frame: u64) {
    tree.set(
        scene.label,
        PropertyKey::Opacity,
        frame as f64 / FRAME_COUNT as f64,
    );
    match frame {
        3 => tree.set(scene.pager, PropertyKey::CurrentPage, 3.0),
        4 => tree.set_viewport(scene.list, 6, ROWS_VISIBLE),
        6 => tree.set(scene.pager, PropertyKey::CurrentPage, 0.0),
        8 => tree.set_viewport(scene.list, 0, ROWS_VISIBLE),
        _ => {}
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- engine ------------------------------------------------------------
    let mut tree = ComponentTree::new().with_pager_window_radius(1);
    let scene = build_scene(&mut tree);
    let mut engine = SyncEngine::new(AdapterRegistry::standard(), SyncConfig::new());
    let mut loader = ThreadLoader::default();
    let mut backend = ConsoleBackend;

    let root_widget = match engine.inflate_hierarchy(&tree, scene.root) {
        Ok(widget) => widget,
        Err(err) => {
            eprintln!("failed to inflate the scene: {err}");
            return;
        }
    };
    engine.dispatch_loads(&mut loader);
    engine.present(&mut backend);
    tree.end_frame();

    // -- simulated loop ----------------------------------------------------
    for frame in 1..=FRAME_COUNT {
        script(&mut tree, &scene, frame);
        loader.join_all();

        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);
        engine.drain_completions_traced(&tree, &mut tracer);
        let report = engine.sync_frame_traced(&tree, &mut tracer);
        drop(tracer);
        if report.failed > 0 {
            eprintln!("frame {frame}: {} components skipped", report.failed);
        }

        engine.dispatch_loads(&mut loader);
        engine.present(&mut backend);
        tree.end_frame();
    }
    loader.join_all();

    // -- summary -----------------------------------------------------------
    let mut refreshes = 0;
    let mut reconciles = 0;
    for event in decode(recorder.as_bytes()) {
        match event {
            RecordedEvent::Refresh { .. } => refreshes += 1,
            RecordedEvent::Reconcile { .. } => reconciles += 1,
            _ => {}
        }
    }
    println!(
        "\nRecorded {} bytes: {refreshes} refreshes, {reconciles} reconciles, {} widgets alive.",
        recorder.as_bytes().len(),
        engine.store().live_count(),
    );
    println!(
        "Pager keeps {} detached pages; list keeps {} detached rows.",
        engine.detached_count(scene.pager),
        engine.detached_count(scene.list),
    );

    // -- snapshot ----------------------------------------------------------
    let path = "pager_demo_snapshot.json";
    match File::create(path) {
        Ok(file) => {
            let mut writer = BufWriter::new(file);
            match snapshot::write_snapshot(engine.store(), root_widget, &mut writer) {
                Ok(()) => println!("Widget snapshot written to {path}"),
                Err(err) => eprintln!("failed to write snapshot: {err}"),
            }
        }
        Err(err) => eprintln!("failed to create {path}: {err}"),
    }
}
