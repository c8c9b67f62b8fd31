use crate::presenter::Indicator;
use std::sync::Arc;

/// All messages that can flow through the application event loop.
///
/// Sources:
/// - Scheduler tick        → `Indicators`
/// - Config watcher task   → `ConfigReloaded`
/// - Signal handler        → `Shutdown`
#[derive(Debug, Clone)]
pub enum Message {
    /// Freshly rendered indicators, one per metric, in [`MetricKind::ALL`] order.
    ///
    /// [`MetricKind::ALL`]: crate::state::MetricKind::ALL
    Indicators(Vec<Arc<Indicator>>),
    /// Config file changed on disk; triggers a live reload of chart styling.
    ConfigReloaded,
    /// Graceful shutdown requested.
    Shutdown,
}
