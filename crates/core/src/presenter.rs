use crate::{image::ChartImage, state::MetricKind};
use chrono::{DateTime, Local};
use std::sync::Arc;

/// One metric's output for a tick, ready for the notification area.
#[derive(Debug, Clone)]
pub struct Indicator {
    pub kind:       MetricKind,
    /// Sparkline raster; shared so handing it on never copies pixels.
    pub image:      Arc<ChartImage>,
    /// Short status text, e.g. `"CPU: 42.3%"` or `"Network: 1.2 MB/s"`.
    pub status:     String,
    /// When this indicator was produced.
    pub updated_at: DateTime<Local>,
}

/// The presentation boundary.
///
/// Implementations display what they are given; they are called from the
/// scheduler task roughly once per second for as long as it runs, so they
/// must return quickly and must never block on the UI.
pub trait Presenter: Send + Sync {
    /// Receive the indicators of one tick, in [`MetricKind::ALL`] order.
    fn present(&self, indicators: &[Arc<Indicator>]);
}
