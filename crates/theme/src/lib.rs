pub mod colors;
pub mod style;

pub use colors::Color;
pub use style::{ChartPalette, ChartStyle, FILL_ALPHA};

use meter_config::{ChartConfig, ThemeConfig};
use meter_core::MetricKind;

/// Compiled theme derived from the `[theme]` and `[chart]` config sections.
///
/// All colors are pre-parsed from hex strings.  Calling [`Theme::from_config`]
/// is infallible: invalid color strings fall back to safe defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub style:   ChartStyle,
    pub cpu:     ChartPalette,
    pub ram:     ChartPalette,
    pub network: ChartPalette,
}

impl Theme {
    /// Build a [`Theme`] from the config file.
    pub fn from_config(colors: &ThemeConfig, chart: &ChartConfig) -> Self {
        let parse = |hex: &str, fallback: Color| {
            Color::from_hex(hex).unwrap_or_else(|| {
                tracing::warn!("Invalid colour '{hex}' in theme; using fallback.");
                fallback
            })
        };

        let background = parse(&colors.background, Color::DARK);
        let text       = parse(&colors.text, Color::WHITE);
        let alert      = parse(&colors.alert, Color::RED);
        let palette = |line: Color| ChartPalette { background, line, text, alert };

        Self {
            style: ChartStyle {
                width:          chart.size,
                height:         chart.size,
                fill:           chart.fill,
                show_value:     chart.show_value,
                high_threshold: chart.high_threshold,
            },
            cpu:     palette(parse(&colors.cpu, Color::GREEN)),
            ram:     palette(parse(&colors.ram, Color::BLUE)),
            network: palette(parse(&colors.network, Color::YELLOW)),
        }
    }

    /// Palette for one metric's chart.
    pub fn palette(&self, kind: MetricKind) -> &ChartPalette {
        match kind {
            MetricKind::Cpu     => &self.cpu,
            MetricKind::Ram     => &self.ram,
            MetricKind::Network => &self.network,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default(), &ChartConfig::default())
    }
}
