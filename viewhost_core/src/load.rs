// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Asynchronous resource loading.
//!
//! Adapters never decode or fetch inline. A property handler that needs
//! off-thread work files a [`LoadRequest`] on the [`LoadQueue`] and leaves
//! its widget in a pending state. The host hands queued requests to a
//! [`Loader`] (typically a worker pool), which answers through a cloneable
//! [`CompletionSender`]. The main loop later drains completions and
//! re-enters the ordinary dirty-refresh path for the affected widget.
//!
//! Completions are addressed by [`LoadTicket`], which carries the widget
//! handle, the component it was bound to when the request was made, and a
//! ticket id. A result is applied only if all three still match; anything
//! else is a stale result and is dropped.

use std::sync::mpsc;

use hashbrown::HashMap;

use crate::component::{ComponentId, PropertyKey};
use crate::widget::WidgetId;

/// Identity of one asynchronous request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    /// Monotonic request id, unique per [`LoadQueue`].
    pub id: u64,
    /// Widget that issued the request.
    pub widget: WidgetId,
    /// Component the widget was bound to when the request was issued.
    pub component: ComponentId,
    /// Property the request resolves.
    pub key: PropertyKey,
}

/// A request waiting to be handed to a [`Loader`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    /// Ticket the completion must carry back.
    pub ticket: LoadTicket,
    /// Resource locator, as declared by the component.
    pub source: String,
}

/// Outcome of a load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadResult {
    /// The resource decoded to an image of the given intrinsic size.
    Image {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// The resource could not be loaded.
    Failed,
}

/// A finished load travelling back to the main loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Ticket of the originating request.
    pub ticket: LoadTicket,
    /// Outcome.
    pub result: LoadResult,
}

/// Sending half of the completion channel, handed to loaders.
#[derive(Clone, Debug)]
pub struct CompletionSender(mpsc::Sender<Completion>);

impl CompletionSender {
    /// Posts a completion. Returns `false` if the queue is gone.
    pub fn complete(&self, ticket: LoadTicket, result: LoadResult) -> bool {
        self.0.send(Completion { ticket, result }).is_ok()
    }
}

/// Performs loads off the main loop.
pub trait Loader {
    /// Starts `request`. Must not block; the result is posted to `done`.
    fn load(&mut self, request: LoadRequest, done: CompletionSender);
}

/// Outgoing requests and incoming completions.
#[derive(Debug)]
pub struct LoadQueue {
    next_id: u64,
    outgoing: Vec<LoadRequest>,
    tx: mpsc::Sender<Completion>,
    rx: mpsc::Receiver<Completion>,
    resolved: HashMap<WidgetId, (u64, LoadResult)>,
}

impl Default for LoadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            next_id: 1,
            outgoing: Vec::new(),
            tx,
            rx,
            resolved: HashMap::new(),
        }
    }

    /// Files a request for `source` on behalf of `widget` and returns the
    /// new ticket id.
    ///
    /// Any request still queued for the same widget and key is superseded.
    pub fn request(
        &mut self,
        widget: WidgetId,
        component: ComponentId,
        key: PropertyKey,
        source: &str,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.outgoing
            .retain(|r| !(r.ticket.widget == widget && r.ticket.key == key));
        self.outgoing.push(LoadRequest {
            ticket: LoadTicket {
                id,
                widget,
                component,
                key,
            },
            source: source.into(),
        });
        id
    }

    /// Removes and returns every queued request, oldest first.
    pub fn take_requests(&mut self) -> Vec<LoadRequest> {
        core::mem::take(&mut self.outgoing)
    }

    /// Number of requests not yet handed to a loader.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.outgoing.len()
    }

    /// Returns a sender loaders can post completions to.
    #[must_use]
    pub fn sender(&self) -> CompletionSender {
        CompletionSender(self.tx.clone())
    }

    /// Drops queued requests and buffered results for `widget`.
    ///
    /// Requests already handed to a loader cannot be recalled; their
    /// completions fail the identity check when drained.
    pub fn cancel_widget(&mut self, widget: WidgetId) {
        self.outgoing.retain(|r| r.ticket.widget != widget);
        self.resolved.remove(&widget);
    }

    /// Receives every completion posted so far without blocking.
    pub fn try_recv_all(&mut self) -> Vec<Completion> {
        self.rx.try_iter().collect()
    }

    /// Buffers a validated result for pickup by the widget's source handler.
    pub fn resolve(&mut self, widget: WidgetId, ticket: u64, result: LoadResult) {
        self.resolved.insert(widget, (ticket, result));
    }

    /// Takes the buffered result for `widget` if it answers `ticket`.
    pub fn take_resolved(&mut self, widget: WidgetId, ticket: u64) -> Option<LoadResult> {
        match self.resolved.get(&widget) {
            Some(&(t, result)) if t == ticket => {
                self.resolved.remove(&widget);
                Some(result)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::component::ComponentKind;
    use crate::widget::WidgetStore;

    use super::*;

    #[test]
    fn requests_get_monotonic_ids() {
        let mut store = WidgetStore::new();
        let w = store.create_widget(ComponentKind::Image);
        let mut queue = LoadQueue::new();
        let a = queue.request(w, ComponentId(1), PropertyKey::Source, "a.png");
        let b = queue.request(w, ComponentId(1), PropertyKey::Source, "b.png");
        assert!(b > a);
        let reqs = queue.take_requests();
        assert_eq!(reqs.len(), 1, "second request supersedes the first");
        assert_eq!(reqs[0].source, "b.png");
        assert_eq!(reqs[0].ticket.id, b);
    }

    #[test]
    fn completions_cross_threads() {
        let mut store = WidgetStore::new();
        let w = store.create_widget(ComponentKind::Image);
        let mut queue = LoadQueue::new();
        queue.request(w, ComponentId(7), PropertyKey::Source, "a.png");
        let req = queue.take_requests().remove(0);
        let done = queue.sender();
        std::thread::spawn(move || {
            done.complete(
                req.ticket,
                LoadResult::Image {
                    width: 4,
                    height: 3,
                },
            );
        })
        .join()
        .unwrap();
        let got = queue.try_recv_all();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].ticket.component, ComponentId(7));
    }

    #[test]
    fn resolved_result_matches_ticket() {
        let mut store = WidgetStore::new();
        let w = store.create_widget(ComponentKind::Image);
        let mut queue = LoadQueue::new();
        queue.resolve(w, 3, LoadResult::Failed);
        assert_eq!(queue.take_resolved(w, 2), None);
        assert_eq!(queue.take_resolved(w, 3), Some(LoadResult::Failed));
        assert_eq!(queue.take_resolved(w, 3), None);
    }

    #[test]
    fn cancel_drops_queued_requests() {
        let mut store = WidgetStore::new();
        let w1 = store.create_widget(ComponentKind::Image);
        let w2 = store.create_widget(ComponentKind::Image);
        let mut queue = LoadQueue::new();
        queue.request(w1, ComponentId(1), PropertyKey::Source, "a.png");
        queue.request(w2, ComponentId(2), PropertyKey::Source, "b.png");
        queue.cancel_widget(w1);
        let reqs = queue.take_requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].ticket.widget, w2);
    }
}
