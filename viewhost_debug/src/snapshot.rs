// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of the widget tree.
//!
//! [`to_json`] walks a widget subtree and produces a nested
//! [`serde_json::Value`] mirroring what a platform backend would show. Two
//! snapshots taken around a frame can be diffed to see exactly what the
//! engine changed. [`engine_to_json`] does the same for every root the
//! engine inflated; detached widgets kept for reuse are not shown.

use std::io::{self, Write};

use serde_json::{Value, json};

use viewhost_core::engine::SyncEngine;
use viewhost_core::presenter::Presenter;
use viewhost_core::widget::{ResourceState, Visibility, WidgetId, WidgetProps, WidgetStore};

/// Snapshots the subtree rooted at `root`.
///
/// Returns [`Value::Null`] if `root` is not alive.
#[must_use]
pub fn to_json(store: &WidgetStore, root: WidgetId) -> Value {
    if !store.is_alive(root) {
        return Value::Null;
    }
    let props = store.props(root);
    let mut node = props_json(props);
    let children: Vec<Value> = store
        .children(root)
        .map(|child| to_json(store, child))
        .collect();
    node["widget"] = json!(format!("{}@{}", root.index(), root.generation()));
    node["children"] = Value::Array(children);
    node
}

/// Snapshots every root of `engine` as a JSON array.
#[must_use]
pub fn engine_to_json<P: Presenter>(engine: &SyncEngine<P>) -> Value {
    Value::Array(
        engine
            .roots()
            .into_iter()
            .map(|root| to_json(engine.store(), root))
            .collect(),
    )
}

/// Writes a pretty-printed snapshot of `root` to `writer`.
pub fn write_snapshot(
    store: &WidgetStore,
    root: WidgetId,
    writer: &mut dyn Write,
) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &to_json(store, root))?;
    writeln!(writer)
}

fn props_json(props: &WidgetProps) -> Value {
    let mut node = json!({
        "kind": props.kind.name(),
        "frame": [props.frame.x0, props.frame.y0, props.frame.x1, props.frame.y1],
        "padding": [
            props.padding.x0,
            props.padding.y0,
            props.padding.x1,
            props.padding.y1,
        ],
        "alpha": props.alpha,
        "visibility": visibility_name(props.visibility),
        "enabled": props.enabled,
        "focusable": props.focusable,
        "clickable": props.clickable,
        "role": format!("{:?}", props.role),
        "bind_count": props.bind_count,
    });
    if let Some(description) = &props.content_description {
        node["content_description"] = json!(description);
    }
    if let Some(text) = &props.text {
        node["text"] = json!(text.text);
    }
    if let Some(resource) = &props.resource {
        node["resource"] = resource_json(&resource.state);
    }
    if let Some(scroll) = &props.scroll {
        node["scroll_position"] = json!(scroll.position);
    }
    if let Some(pager) = &props.pager {
        node["current_page"] = json!(pager.current);
    }
    node
}

fn visibility_name(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Visible => "visible",
        Visibility::Invisible => "invisible",
        Visibility::Gone => "gone",
    }
}

fn resource_json(state: &ResourceState) -> Value {
    match state {
        ResourceState::Empty => json!({ "state": "empty" }),
        ResourceState::Pending { ticket, source } => {
            json!({ "state": "pending", "ticket": ticket, "source": source })
        }
        ResourceState::Loaded {
            source,
            width,
            height,
        } => json!({
            "state": "loaded",
            "source": source,
            "width": width,
            "height": height,
        }),
        ResourceState::Failed { source } => json!({ "state": "failed", "source": source }),
        ResourceState::Placeholder { source } => {
            json!({ "state": "placeholder", "source": source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewhost_core::component::{ComponentKind, ComponentTree, PropertyKey};
    use viewhost_core::config::SyncConfig;
    use viewhost_core::registry::AdapterRegistry;

    #[test]
    fn dead_root_is_null() {
        let mut store = WidgetStore::new();
        let w = store.create_widget(ComponentKind::Text);
        store.destroy_widget(w);
        assert_eq!(to_json(&store, w), Value::Null);
    }

    #[test]
    fn snapshot_nests_children_in_order() {
        let mut tree = ComponentTree::new();
        let root = tree.create(ComponentKind::Frame);
        let a = tree.create(ComponentKind::Text);
        let b = tree.create(ComponentKind::Text);
        tree.append_child(root, a);
        tree.append_child(root, b);
        tree.set(a, PropertyKey::Text, "first");
        tree.set(b, PropertyKey::Text, "second");

        let mut engine = SyncEngine::new(AdapterRegistry::standard(), SyncConfig::new());
        let widget = engine.inflate_hierarchy(&tree, root).unwrap();
        let snap = to_json(engine.store(), widget);

        assert_eq!(snap["kind"], "Frame");
        assert_eq!(snap["children"][0]["text"], "first");
        assert_eq!(snap["children"][1]["text"], "second");
        assert_eq!(snap["children"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn engine_snapshot_lists_only_inflated_roots() {
        let mut tree = ComponentTree::new();
        let list = tree.create(ComponentKind::Sequence);
        for _ in 0..4 {
            let row = tree.create(ComponentKind::Text);
            tree.append_child(list, row);
        }
        tree.set_viewport(list, 0, 2);
        let mut engine = SyncEngine::new(AdapterRegistry::standard(), SyncConfig::new());
        engine.inflate_hierarchy(&tree, list).unwrap();
        tree.end_frame();

        tree.set_viewport(list, 2, 2);
        engine.sync_frame(&tree);
        assert_eq!(engine.detached_count(list), 2);

        let snap = engine_to_json(&engine);
        let roots = snap.as_array().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0]["kind"], "Sequence");
        assert_eq!(roots[0]["children"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn write_snapshot_emits_valid_json() {
        let mut store = WidgetStore::new();
        let w = store.create_widget(ComponentKind::Image);
        let mut out = Vec::new();
        write_snapshot(&store, w, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["kind"], "Image");
        assert_eq!(parsed["visibility"], "visible");
    }
}
