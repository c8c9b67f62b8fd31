use serde::{Deserialize, Serialize};
use tracing::warn;

/// Root configuration structure parsed from `meter.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Sampling cadence and history size.
    pub sampler: SamplerConfig,
    /// Network throughput scaling.
    pub network: NetworkConfig,
    /// Sparkline geometry and overlays.
    pub chart: ChartConfig,
    /// Colours.
    pub theme: ThemeConfig,
}

impl MeterConfig {
    /// Smallest history that still draws a line.
    pub const MIN_CAPACITY: usize = 2;
    pub const MIN_SIZE: u32 = 8;
    pub const MAX_SIZE: u32 = 256;
    pub const MIN_INTERVAL_MS: u64 = 100;

    /// Clamp every out-of-range value into something the sampler and renderer
    /// can run with, logging each correction.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let s = &mut self.sampler;
        if s.history_capacity < Self::MIN_CAPACITY {
            warn!(
                "sampler.history_capacity = {} is too small; using {}",
                s.history_capacity,
                Self::MIN_CAPACITY
            );
            s.history_capacity = Self::MIN_CAPACITY;
        }
        if s.interval_ms < Self::MIN_INTERVAL_MS {
            warn!(
                "sampler.interval_ms = {} is too short; using {}",
                s.interval_ms,
                Self::MIN_INTERVAL_MS
            );
            s.interval_ms = Self::MIN_INTERVAL_MS;
        }
        if s.timeout_ms == 0 || s.timeout_ms > s.interval_ms {
            warn!(
                "sampler.timeout_ms = {} must lie in 1..={}; clamping",
                s.timeout_ms, s.interval_ms
            );
            s.timeout_ms = s.timeout_ms.clamp(1, s.interval_ms);
        }

        let c = &mut self.chart;
        if !(Self::MIN_SIZE..=Self::MAX_SIZE).contains(&c.size) {
            let size = c.size.clamp(Self::MIN_SIZE, Self::MAX_SIZE);
            warn!("chart.size = {} is out of range; using {size}", c.size);
            c.size = size;
        }
        if !c.high_threshold.is_finite() {
            warn!("chart.high_threshold is not a number; using 80");
            c.high_threshold = ChartConfig::default().high_threshold;
        }

        let n = &mut self.network;
        if !(n.scale_floor_kbps.is_finite() && n.scale_floor_kbps > 0.0) {
            warn!(
                "network.scale_floor_kbps = {} must be positive; using default",
                n.scale_floor_kbps
            );
            n.scale_floor_kbps = NetworkConfig::default().scale_floor_kbps;
        }

        self
    }
}

/// Sampling settings.  Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Tick period in milliseconds.
    pub interval_ms: u64,
    /// Per-tick budget for provider calls in milliseconds.
    pub timeout_ms: u64,
    /// Number of samples kept per metric.
    pub history_capacity: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms:      1_000,
            timeout_ms:       800,
            history_capacity: 32,
        }
    }
}

/// Network chart scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Lower bound of the chart's full-scale value in KB/s.  The chart scales
    /// against `max(floor, peak of history)` so idle links stay flat.
    pub scale_floor_kbps: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { scale_floor_kbps: 1_000.0 }
    }
}

impl NetworkConfig {
    /// The floor in bytes/second.
    pub fn scale_floor_bytes(&self) -> f64 {
        self.scale_floor_kbps * 1_000.0
    }
}

/// Sparkline geometry and overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Edge length of the square icon in pixels.
    pub size: u32,
    /// Fill the area under the line with a translucent line colour.
    pub fill: bool,
    /// Overlay the latest value in the top-left corner.
    pub show_value: bool,
    /// Values above this percentage draw the overlay in the alert colour.
    pub high_threshold: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            size:           32,
            fill:           true,
            show_value:     true,
            high_threshold: 80.0,
        }
    }
}

/// Colours as hex strings (`#RRGGBB` or `#RRGGBBAA`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub background: String,
    /// Line colour of the CPU chart.
    pub cpu: String,
    /// Line colour of the RAM chart.
    pub ram: String,
    /// Line colour of the network chart.
    pub network: String,
    /// Overlay text colour.
    pub text: String,
    /// Overlay text colour above `chart.high_threshold`.
    pub alert: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#1e1e2e".to_string(), // Catppuccin Mocha: base
            cpu:        "#a6e3a1".to_string(), // Catppuccin Mocha: green
            ram:        "#89b4fa".to_string(), // Catppuccin Mocha: blue
            network:    "#f9e2af".to_string(), // Catppuccin Mocha: yellow
            text:       "#cdd6f4".to_string(), // Catppuccin Mocha: text
            alert:      "#f38ba8".to_string(), // Catppuccin Mocha: red
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_survive_sanitizing() {
        assert_eq!(MeterConfig::default().sanitized(), MeterConfig::default());
    }

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let mut cfg = MeterConfig::default();
        cfg.sampler.history_capacity = 1;
        cfg.sampler.interval_ms = 10;
        cfg.sampler.timeout_ms = 5_000;
        cfg.chart.size = 4_096;
        cfg.network.scale_floor_kbps = -3.0;

        let cfg = cfg.sanitized();
        assert_eq!(cfg.sampler.history_capacity, 2);
        assert_eq!(cfg.sampler.interval_ms, 100);
        assert_eq!(cfg.sampler.timeout_ms, 100);
        assert_eq!(cfg.chart.size, 256);
        assert_eq!(cfg.network.scale_floor_kbps, 1_000.0);
    }

    #[test]
    fn zero_timeout_becomes_one_millisecond() {
        let mut cfg = MeterConfig::default();
        cfg.sampler.timeout_ms = 0;
        assert_eq!(cfg.sanitized().sampler.timeout_ms, 1);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: MeterConfig = toml::from_str(
            r##"
            [chart]
            size = 16

            [theme]
            cpu = "#ff0000"
            "##,
        )
        .unwrap();
        assert_eq!(cfg.chart.size, 16);
        assert!(cfg.chart.fill);
        assert_eq!(cfg.theme.cpu, "#ff0000");
        assert_eq!(cfg.theme.ram, ThemeConfig::default().ram);
        assert_eq!(cfg.sampler, SamplerConfig::default());
    }

    #[test]
    fn floor_converts_to_bytes() {
        assert_eq!(NetworkConfig::default().scale_floor_bytes(), 1_000_000.0);
    }
}
