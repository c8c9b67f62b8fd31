use crate::{canvas::Canvas, font};
use meter_core::{ChartImage, MeterError, Result};
use meter_theme::{ChartPalette, ChartStyle};

/// Inset of the value overlay from the top-left corner.
const OVERLAY_MARGIN: i32 = 1;

/// Everything one chart needs besides geometry.
#[derive(Debug, Clone, Copy)]
pub struct ChartRequest<'a> {
    /// Samples on a 0–100 scale, oldest first.
    pub samples: &'a [f32],
    pub palette: &'a ChartPalette,
    /// Short value drawn in the corner; empty for none.
    pub caption: &'a str,
    /// Status string carried alongside the pixels.
    pub label:   &'a str,
}

/// Rasterizes sample histories into sparkline icons.
///
/// Rendering is a pure function of the request and the style: the same
/// inputs always produce byte-identical images.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
    }

    /// Render one chart.
    ///
    /// Fewer than two samples draw only the background and the caption.
    /// Fails only for a zero-sized style.
    pub fn render(&self, req: ChartRequest<'_>) -> Result<ChartImage> {
        let ChartStyle { width, height, .. } = self.style;
        if width == 0 || height == 0 {
            return Err(MeterError::Render(format!("degenerate chart size {width}x{height}")));
        }

        let mut canvas = Canvas::new(width, height, req.palette.background);

        if req.samples.len() >= 2 {
            let points = plot(req.samples, width, height);
            if self.style.fill {
                canvas.fill_under(&points, req.palette.fill());
            }
            canvas.draw_polyline(&points, req.palette.line);
        }

        if self.style.show_value && !req.caption.is_empty() && caption_fits(&canvas, req.caption) {
            let alert = req
                .samples
                .last()
                .is_some_and(|&v| v > self.style.high_threshold);
            let color = if alert { req.palette.alert } else { req.palette.text };
            font::draw_text(&mut canvas, OVERLAY_MARGIN, OVERLAY_MARGIN, req.caption, color);
        }

        ChartImage::new(width, height, canvas.into_pixels(), req.label)
            .ok_or_else(|| MeterError::Render("pixel buffer does not match geometry".into()))
    }
}

/// Whether `caption` fits inside the canvas at the overlay margin.  A caption
/// that would be clipped is left out rather than drawn partially.
fn caption_fits(canvas: &Canvas, caption: &str) -> bool {
    let margin = OVERLAY_MARGIN as u32;
    font::text_width(caption) + margin <= canvas.width()
        && font::GLYPH_HEIGHT + margin <= canvas.height()
}

/// Map samples to pixel coordinates: index spread evenly across the width,
/// value `v` at row `height - clamp(v / 100) * height`, kept inside the image.
fn plot(samples: &[f32], width: u32, height: u32) -> Vec<(i32, i32)> {
    let last_index = (samples.len() - 1) as f32;
    let x_span = (width - 1) as f32;
    let h = height as f32;

    samples
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let norm = if v.is_finite() { (v / 100.0).clamp(0.0, 1.0) } else { 0.0 };
            let x = (i as f32 * x_span / last_index).round() as i32;
            let y = (h - norm * h).round().min(h - 1.0) as i32;
            (x, y)
        })
        .collect()
}
