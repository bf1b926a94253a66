//! Fire-and-forget analytics events.

use crate::device::ViewportTier;

/// One reported interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsEvent {
    /// Event category (e.g. `"form"`).
    pub category: String,
    /// Event action (e.g. `"submit"`).
    pub action: String,
    /// Free-form label.
    pub label: String,
    /// Device tier at the time of the event.
    pub device: ViewportTier,
}

/// Destination for analytics events.
///
/// Calls are fire-and-forget; a missing sink is a silent no-op and no
/// sink implementation may fail the caller.
pub trait AnalyticsSink {
    /// Record one event.
    fn record(&self, event: &AnalyticsEvent);
}

/// Default sink: logs events for debugging.
#[derive(Debug, Default)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn record(&self, event: &AnalyticsEvent) {
        tracing::debug!(
            category = %event.category,
            action = %event.action,
            label = %event.label,
            device = ?event.device,
            "analytics event"
        );
    }
}
