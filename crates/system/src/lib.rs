//! Host metric acquisition: providers, rolling histories, rate derivation
//! and the per-tick sampler.

pub mod cpu;
pub mod history;
pub mod memory;
pub mod network;
pub mod provider;
pub mod rate;
pub mod sampler;

pub use history::{BoundedHistory, SharedHistory};
pub use provider::{InterfaceCounters, MetricProvider, SysinfoProvider};
pub use rate::{CounterSnapshot, RateTracker};
pub use sampler::{MetricSampler, MetricState};

use meter_core::MetricKind;

/// Status string for the notification area, e.g. `"CPU: 42.3%"` or
/// `"Network: 1.2 MB/s"`.
pub fn status_text(kind: MetricKind, value: f32) -> String {
    match kind {
        MetricKind::Cpu | MetricKind::Ram => format!("{kind}: {value:.1}%"),
        MetricKind::Network => format!("{kind}: {}", network::format_rate(value as f64)),
    }
}

/// The short value drawn inside the chart.
pub fn overlay_text(kind: MetricKind, value: f32) -> String {
    match kind {
        MetricKind::Cpu | MetricKind::Ram => format!("{:.0}", value.clamp(0.0, 100.0)),
        MetricKind::Network => network::format_rate_short(value as f64),
    }
}
