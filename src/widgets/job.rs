//! Render jobs: a fetched snapshot bound to a title and options.

use super::kind::WidgetKind;
use crate::error::{DashboardError, Result};
use crate::render::RenderSink;
use crate::types::{Options, Snapshot};

/// Deferred drawing of one widget.
///
/// Built once per widget activation with data that was already fetched;
/// rendering consumes it, so a job never re-fetches and never draws stale
/// data twice.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a render job does nothing until it is rendered"]
pub struct RenderJob {
    kind: WidgetKind,
    title: String,
    options: Options,
    snapshot: Snapshot,
}

impl RenderJob {
    pub(crate) fn new(kind: WidgetKind, title: String, options: &Options, snapshot: Snapshot) -> Self {
        Self { kind, title, options: options.clone(), snapshot }
    }

    /// The widget this job draws.
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Resolved title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Options as configured, unrecognized keys included.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The fetched data.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Draws the widget with exactly one sink call.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Render`] if the sink rejects the tile.
    pub fn render(self, sink: &mut dyn RenderSink) -> Result<()> {
        let result = match &self.snapshot {
            Snapshot::Text(content) => sink.add_text_box(content, &self.title, &self.options),
            Snapshot::Bars { values, labels } => {
                sink.add_bar_chart(values, labels, &self.title, &self.options)
            }
            Snapshot::Table(rows) => sink.add_table(rows, &self.title, &self.options),
        };

        result.map_err(|source| DashboardError::Render { widget: self.kind.name(), source })
    }
}
