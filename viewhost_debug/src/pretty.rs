// Copyright 2026 the Viewhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`SyncTraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).

use std::fmt;
use std::io::Write;

use viewhost_core::component::DirtySet;
use viewhost_core::trace::{
    FrameBeginEvent, FrameEndEvent, FullBindEvent, ReconcileEvent, RefreshEvent,
    StaleCompletionEvent, SyncTraceSink, WidgetCreatedEvent, WidgetDestroyedEvent,
};
use viewhost_core::widget::WidgetId;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Compact `index@generation` form of a widget handle.
struct Handle(WidgetId);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.0.index(), self.0.generation())
    }
}

/// Comma-separated key list.
struct Keys(DirtySet);

impl fmt::Display for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key:?}")?;
        }
        Ok(())
    }
}

impl<W: Write> SyncTraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] begin frame={} dirty={}",
            e.frame_index, e.dirty_components,
        );
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] end frame={} refreshed={} reconciled={} created={} destroyed={}",
            e.frame_index, e.refreshed, e.reconciled, e.created, e.destroyed,
        );
    }

    fn on_widget_created(&mut self, e: &WidgetCreatedEvent) {
        let _ = writeln!(
            self.writer,
            "[create] component={} widget={} kind={}",
            e.component.0,
            Handle(e.widget),
            e.kind.name(),
        );
    }

    fn on_widget_destroyed(&mut self, e: &WidgetDestroyedEvent) {
        match e.component {
            Some(component) => {
                let _ = writeln!(
                    self.writer,
                    "[destroy] component={} widget={}",
                    component.0,
                    Handle(e.widget),
                );
            }
            None => {
                let _ = writeln!(self.writer, "[destroy] widget={}", Handle(e.widget));
            }
        }
    }

    fn on_full_bind(&mut self, e: &FullBindEvent) {
        let _ = writeln!(
            self.writer,
            "[bind] component={} widget={}",
            e.component.0,
            Handle(e.widget),
        );
    }

    fn on_refresh(&mut self, e: &RefreshEvent<'_>) {
        let _ = write!(
            self.writer,
            "[refresh] component={} widget={} keys={} handlers={}",
            e.component.0,
            Handle(e.widget),
            Keys(e.dirty),
            e.handlers.join(","),
        );
        if !e.unrecognized.is_empty() {
            let _ = write!(self.writer, " unrecognized={}", Keys(e.unrecognized));
        }
        let _ = writeln!(self.writer);
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        let _ = writeln!(
            self.writer,
            "[reconcile] container={} widget={} attached={} created={} reattached={} kept={} \
             destroyed={}",
            e.container.0,
            Handle(e.widget),
            e.attached,
            e.created,
            e.reattached,
            e.kept_detached,
            e.destroyed,
        );
    }

    fn on_stale_completion(&mut self, e: &StaleCompletionEvent) {
        let _ = writeln!(
            self.writer,
            "[stale] ticket={} component={} widget={} key={:?}",
            e.ticket.id,
            e.ticket.component.0,
            Handle(e.ticket.widget),
            e.ticket.key,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewhost_core::component::{ComponentId, ComponentKind, PropertyKey};
    use viewhost_core::widget::WidgetStore;

    #[test]
    fn pretty_print_frame_begin() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_begin(&FrameBeginEvent {
            frame_index: 4,
            dirty_components: 2,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[frame] begin"), "got: {output}");
        assert!(output.contains("frame=4"), "got: {output}");
        assert!(output.contains("dirty=2"), "got: {output}");
    }

    #[test]
    fn pretty_print_refresh_lists_handlers_and_unrecognized_keys() {
        let widget = WidgetStore::new().create_widget(ComponentKind::Text);
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_refresh(&RefreshEvent {
            component: ComponentId(7),
            widget,
            dirty: DirtySet::of(&[PropertyKey::Opacity, PropertyKey::Checked]),
            handlers: &["opacity"],
            unrecognized: DirtySet::of(&[PropertyKey::Checked]),
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("component=7"), "got: {output}");
        assert!(output.contains("handlers=opacity"), "got: {output}");
        assert!(output.contains("unrecognized=Checked"), "got: {output}");
        assert_eq!(output.lines().count(), 1, "got: {output}");
    }
}
