use crate::colors::Color;

/// Alpha applied to the line colour when filling the area under the line.
pub const FILL_ALPHA: u8 = 50;

/// Geometry and overlay settings shared by every chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub width:          u32,
    pub height:         u32,
    /// Fill the area between the line and the bottom edge.
    pub fill:           bool,
    /// Overlay the latest value in the top-left corner.
    pub show_value:     bool,
    /// Latest values above this switch the overlay to the alert colour.
    pub high_threshold: f32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width:          32,
            height:         32,
            fill:           true,
            show_value:     true,
            high_threshold: 80.0,
        }
    }
}

/// Colours for a single metric's chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPalette {
    pub background: Color,
    pub line:       Color,
    pub text:       Color,
    pub alert:      Color,
}

impl ChartPalette {
    /// The translucent fill derived from the line colour.
    #[inline]
    pub fn fill(&self) -> Color {
        self.line.with_alpha(FILL_ALPHA)
    }
}
