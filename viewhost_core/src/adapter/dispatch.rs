// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-key dispatch tables.
//!
//! A [`DispatchTable`] maps each [`PropertyKey`] an adapter understands to
//! one or more named update functions. Tables are built once when the
//! adapter is constructed and never change afterwards.
//!
//! Resolution is set-based: the handlers for every dirty key are collected
//! into a bitmask, so a function shared by several keys runs once, and the
//! run order is the registration order regardless of which keys were dirty.
//! Applying `{A, B}` therefore runs the same functions as applying `{A}` and
//! then `{B}`, each once.

use core::fmt;

use smallvec::SmallVec;

use super::{BindContext, UpdateFn};
use crate::component::{ComponentId, DirtySet, PropertyKey};
use crate::widget::WidgetId;

/// Maximum number of distinct handlers in one table.
pub const MAX_HANDLERS: usize = 64;

#[derive(Clone, Copy)]
struct Handler {
    name: &'static str,
    func: UpdateFn,
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Immutable dirty-key to update-function table.
#[derive(Clone, Debug)]
pub struct DispatchTable {
    handlers: Vec<Handler>,
    by_key: [SmallVec<[u8; 2]>; PropertyKey::COUNT],
}

/// Handlers selected for one dirty set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Handler indices in registration order, each at most once.
    pub handlers: SmallVec<[usize; 8]>,
    /// Dirty keys no handler is registered for.
    pub unrecognized: DirtySet,
}

/// What a refresh did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Names of the handlers that ran, in run order.
    pub invoked: SmallVec<[&'static str; 8]>,
    /// Dirty keys that were skipped because no handler is registered.
    pub unrecognized: DirtySet,
}

impl DispatchTable {
    /// Starts building a table.
    #[must_use]
    pub fn builder() -> DispatchTableBuilder {
        DispatchTableBuilder {
            table: Self {
                handlers: Vec::new(),
                by_key: core::array::from_fn(|_| SmallVec::new()),
            },
        }
    }

    /// Keys with at least one registered handler.
    #[must_use]
    pub fn keys(&self) -> DirtySet {
        PropertyKey::ALL
            .into_iter()
            .filter(|k| !self.by_key[k.index()].is_empty())
            .collect()
    }

    /// Registered handler names, in registration order.
    pub fn handler_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.iter().map(|h| h.name)
    }

    /// Names of the handlers registered for `key`.
    #[must_use]
    pub fn handlers_for(&self, key: PropertyKey) -> SmallVec<[&'static str; 2]> {
        self.by_key[key.index()]
            .iter()
            .map(|&i| self.handlers[usize::from(i)].name)
            .collect()
    }

    /// Resolves `dirty` into a deduplicated, ordered handler list.
    #[must_use]
    pub fn resolve(&self, dirty: DirtySet) -> Resolution {
        let mut mask = 0_u64;
        let mut unrecognized = DirtySet::new();
        for key in dirty.iter() {
            let slots = &self.by_key[key.index()];
            if slots.is_empty() {
                unrecognized.insert(key);
            }
            for &i in slots {
                mask |= 1 << i;
            }
        }
        let mut handlers = SmallVec::new();
        while mask != 0 {
            handlers.push(mask.trailing_zeros() as usize);
            mask &= mask - 1;
        }
        Resolution {
            handlers,
            unrecognized,
        }
    }

    /// Resolves `dirty` and invokes each selected handler once.
    ///
    /// Unrecognized keys are logged at debug level and reported back.
    pub fn run(
        &self,
        cx: &mut BindContext<'_>,
        component: ComponentId,
        widget: WidgetId,
        dirty: DirtySet,
    ) -> RefreshOutcome {
        let resolution = self.resolve(dirty);
        for key in resolution.unrecognized.iter() {
            log::debug!("{component:?}: no handler for dirty key {key:?}, skipped");
        }
        let mut invoked = SmallVec::new();
        for i in resolution.handlers {
            let handler = self.handlers[i];
            (handler.func)(cx, component, widget);
            invoked.push(handler.name);
        }
        RefreshOutcome {
            invoked,
            unrecognized: resolution.unrecognized,
        }
    }
}

/// Builder for [`DispatchTable`].
#[derive(Clone, Debug)]
pub struct DispatchTableBuilder {
    table: DispatchTable,
}

impl DispatchTableBuilder {
    /// Registers `func` under `name` for every key in `keys`.
    ///
    /// Registering an existing name again adds keys to that handler instead
    /// of creating a second one; the function from the first registration
    /// is kept.
    ///
    /// # Panics
    ///
    /// Panics if the table would exceed [`MAX_HANDLERS`] handlers.
    #[must_use]
    pub fn on(mut self, keys: &[PropertyKey], name: &'static str, func: UpdateFn) -> Self {
        let index = match self.table.handlers.iter().position(|h| h.name == name) {
            Some(index) => index,
            None => {
                assert!(
                    self.table.handlers.len() < MAX_HANDLERS,
                    "dispatch table supports at most {MAX_HANDLERS} handlers"
                );
                self.table.handlers.push(Handler { name, func });
                self.table.handlers.len() - 1
            }
        };
        #[expect(
            clippy::cast_possible_truncation,
            reason = "index is below MAX_HANDLERS"
        )]
        let slot = index as u8;
        for key in keys {
            let slots = &mut self.table.by_key[key.index()];
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
        self
    }

    /// Finishes the table.
    #[must_use]
    pub fn build(self) -> DispatchTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::PropertyKey as K;

    fn nop(_: &mut BindContext<'_>, _: ComponentId, _: WidgetId) {}

    fn table() -> DispatchTable {
        DispatchTable::builder()
            .on(&[K::Bounds, K::InnerBounds], "layout", nop)
            .on(&[K::Opacity], "opacity", nop)
            .on(&[K::Disabled], "disabled", nop)
            .on(&[K::Disabled, K::AccessibilityLabel], "focusable", nop)
            .build()
    }

    fn names(t: &DispatchTable, r: &Resolution) -> Vec<&'static str> {
        r.handlers.iter().map(|&i| t.handlers[i].name).collect()
    }

    #[test]
    fn shared_handler_runs_once() {
        let t = table();
        let r = t.resolve(DirtySet::of(&[K::Bounds, K::InnerBounds]));
        assert_eq!(names(&t, &r), ["layout"]);
    }

    #[test]
    fn order_follows_registration_not_keys() {
        let t = table();
        let r = t.resolve(DirtySet::of(&[K::AccessibilityLabel, K::Opacity, K::Disabled]));
        assert_eq!(names(&t, &r), ["opacity", "disabled", "focusable"]);
    }

    #[test]
    fn split_resolution_covers_same_handlers() {
        let t = table();
        let whole = t.resolve(DirtySet::of(&[K::Bounds, K::Opacity]));
        let a = t.resolve(DirtySet::of(&[K::Bounds]));
        let b = t.resolve(DirtySet::of(&[K::Opacity]));
        let mut split: Vec<_> = a.handlers.into_iter().chain(b.handlers).collect();
        split.sort_unstable();
        assert_eq!(whole.handlers.to_vec(), split);
    }

    #[test]
    fn unknown_keys_are_reported() {
        let t = table();
        let r = t.resolve(DirtySet::of(&[K::Opacity, K::Text]));
        assert_eq!(names(&t, &r), ["opacity"]);
        assert_eq!(r.unrecognized, DirtySet::of(&[K::Text]));
    }

    #[test]
    fn re_registering_a_name_extends_its_keys() {
        let t = DispatchTable::builder()
            .on(&[K::Text], "text", nop)
            .on(&[K::Placeholder], "text", nop)
            .build();
        assert_eq!(t.handler_names().count(), 1);
        assert_eq!(t.keys(), DirtySet::of(&[K::Text, K::Placeholder]));
        assert_eq!(t.handlers_for(K::Placeholder).as_slice(), ["text"]);
    }
}
