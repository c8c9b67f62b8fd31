use std::fmt;

/// The three metric streams the meter tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Cpu,
    Ram,
    Network,
}

impl MetricKind {
    /// Every metric, in presentation order.
    pub const ALL: [MetricKind; 3] = [MetricKind::Cpu, MetricKind::Ram, MetricKind::Network];

    /// Human-readable title used as the status-string prefix.
    pub fn title(self) -> &'static str {
        match self {
            MetricKind::Cpu     => "CPU",
            MetricKind::Ram     => "RAM",
            MetricKind::Network => "Network",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// The values produced by one sampler tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings {
    /// CPU utilisation (0.0 – 100.0).
    pub cpu: f32,
    /// RAM utilisation (0.0 – 100.0).
    pub ram: f32,
    /// Combined network throughput in bytes/second (≥ 0, no upper bound).
    pub net: f32,
}

impl Readings {
    /// Value for a single metric.
    #[must_use]
    pub fn get(&self, kind: MetricKind) -> f32 {
        match kind {
            MetricKind::Cpu     => self.cpu,
            MetricKind::Ram     => self.ram,
            MetricKind::Network => self.net,
        }
    }
}
