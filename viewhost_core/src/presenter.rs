// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component-to-widget binding map.
//!
//! The bidirectional lookup between components and widgets lives in one
//! place, behind [`Presenter`]. The engine reads it and requests mutations
//! through it; it never keeps a second copy. Neither tree stores a pointer
//! into the other, so there is no ownership cycle to manage.

use hashbrown::HashMap;

use crate::component::ComponentId;
use crate::widget::WidgetId;

/// Owner of the component-to-widget binding map.
pub trait Presenter {
    /// The widget currently bound to `component`.
    fn find_widget(&self, component: ComponentId) -> Option<WidgetId>;

    /// The component `widget` is currently bound to.
    fn find_component(&self, widget: WidgetId) -> Option<ComponentId>;

    /// Binds `component` to `widget`, replacing any previous binding of
    /// either side.
    fn bind(&mut self, component: ComponentId, widget: WidgetId);

    /// Removes the binding of `widget`. Returns the component it was bound
    /// to, if any.
    fn unbind_widget(&mut self, widget: WidgetId) -> Option<ComponentId>;

    /// Every current binding, ordered by component id.
    fn bound(&self) -> Vec<(ComponentId, WidgetId)>;
}

/// A hash-map-backed [`Presenter`].
#[derive(Clone, Debug, Default)]
pub struct BindingMap {
    by_component: HashMap<ComponentId, WidgetId>,
    by_widget: HashMap<WidgetId, ComponentId>,
}

impl BindingMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_component.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_component.is_empty()
    }
}

impl Presenter for BindingMap {
    fn find_widget(&self, component: ComponentId) -> Option<WidgetId> {
        self.by_component.get(&component).copied()
    }

    fn find_component(&self, widget: WidgetId) -> Option<ComponentId> {
        self.by_widget.get(&widget).copied()
    }

    fn bind(&mut self, component: ComponentId, widget: WidgetId) {
        if let Some(old_widget) = self.by_component.insert(component, widget)
            && old_widget != widget
        {
            self.by_widget.remove(&old_widget);
        }
        if let Some(old_component) = self.by_widget.insert(widget, component)
            && old_component != component
        {
            self.by_component.remove(&old_component);
        }
    }

    fn unbind_widget(&mut self, widget: WidgetId) -> Option<ComponentId> {
        let component = self.by_widget.remove(&widget)?;
        self.by_component.remove(&component);
        Some(component)
    }

    fn bound(&self) -> Vec<(ComponentId, WidgetId)> {
        let mut pairs: Vec<_> = self.by_component.iter().map(|(c, w)| (*c, *w)).collect();
        pairs.sort_unstable();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;
    use crate::widget::WidgetStore;

    #[test]
    fn lookups_are_bidirectional() {
        let mut store = WidgetStore::new();
        let w = store.create_widget(ComponentKind::Text);
        let mut map = BindingMap::new();
        map.bind(ComponentId(7), w);
        assert_eq!(map.find_widget(ComponentId(7)), Some(w));
        assert_eq!(map.find_component(w), Some(ComponentId(7)));

        assert_eq!(map.unbind_widget(w), Some(ComponentId(7)));
        assert!(map.is_empty());
        assert_eq!(map.find_widget(ComponentId(7)), None);
    }

    #[test]
    fn rebinding_keeps_both_sides_consistent() {
        let mut store = WidgetStore::new();
        let a = store.create_widget(ComponentKind::Text);
        let b = store.create_widget(ComponentKind::Text);
        let mut map = BindingMap::new();
        map.bind(ComponentId(1), a);
        map.bind(ComponentId(2), b);

        // Widget `a` moves to component 2; `b` and component 1 are orphaned.
        map.bind(ComponentId(2), a);
        assert_eq!(map.len(), 1);
        assert_eq!(map.find_widget(ComponentId(2)), Some(a));
        assert_eq!(map.find_widget(ComponentId(1)), None);
        assert_eq!(map.find_component(b), None);
        assert_eq!(map.bound(), vec![(ComponentId(2), a)]);
    }
}
