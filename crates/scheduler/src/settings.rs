use meter_config::MeterConfig;
use meter_theme::Theme;

/// Everything that shapes the rendered charts and may change while running.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub theme: Theme,
    /// Minimum full-scale value of the network chart, bytes/second.
    pub net_scale_floor: f64,
}

impl RenderSettings {
    pub fn from_config(config: &MeterConfig) -> Self {
        Self {
            theme:           Theme::from_config(&config.theme, &config.chart),
            net_scale_floor: config.network.scale_floor_bytes(),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from_config(&MeterConfig::default())
    }
}
