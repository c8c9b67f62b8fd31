use meter_theme::Color;

/// A mutable RGBA8 raster.  All drawing clips silently at the edges.
#[derive(Debug, Clone)]
pub struct Canvas {
    width:  u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// A `width × height` canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let rgba = background.to_rgba();
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let i = self.index(x, y)?;
        let p = &self.pixels[i..i + 4];
        Some(Color { r: p[0], g: p[1], b: p[2], a: p[3] })
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.to_rgba());
        }
    }

    /// Composite `color` over the existing pixel.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(bg) = self.pixel(x, y) {
            self.set_pixel(x, y, color.over(bg));
        }
    }

    /// Bresenham line, both endpoints inclusive.
    pub fn draw_line(&mut self, (x1, y1): (i32, i32), (x2, y2): (i32, i32), color: Color) {
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;

        let (mut x, mut y) = (x1, y1);
        loop {
            self.set_pixel(x, y, color);
            if x == x2 && y == y2 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Connect consecutive points with lines.
    pub fn draw_polyline(&mut self, points: &[(i32, i32)], color: Color) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color);
        }
    }

    /// Blend `color` into the region between a polyline and the bottom edge.
    ///
    /// `points` must be sorted by x.  Every column is filled at most once, so
    /// translucent colours do not darken where segments share a column.
    pub fn fill_under(&mut self, points: &[(i32, i32)], color: Color) {
        let bottom = self.height as i32 - 1;
        let mut next_x = i32::MIN;

        for pair in points.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            for x in x0.max(next_x)..=x1 {
                let y = if x1 == x0 {
                    y0.min(y1)
                } else {
                    y0 + ((y1 - y0) as f32 * (x - x0) as f32 / (x1 - x0) as f32).round() as i32
                };
                for row in y..=bottom {
                    self.blend_pixel(x, row, color);
                }
            }
            next_x = next_x.max(x1 + 1);
        }
    }

    /// Finish drawing and hand over the raw RGBA bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Color = Color::rgb(0, 0, 0);
    const FG: Color = Color::rgb(255, 255, 255);

    #[test]
    fn new_fills_background() {
        let c = Canvas::new(3, 2, Color::RED);
        assert_eq!(c.clone().into_pixels().len(), 24);
        assert_eq!(c.pixel(2, 1), Some(Color::RED));
        assert_eq!(c.pixel(3, 0), None);
    }

    #[test]
    fn set_pixel_clips() {
        let mut c = Canvas::new(2, 2, BG);
        c.set_pixel(-1, 0, FG);
        c.set_pixel(0, 5, FG);
        assert!(c.into_pixels().chunks(4).all(|p| p == BG.to_rgba()));
    }

    #[test]
    fn diagonal_line_hits_both_endpoints() {
        let mut c = Canvas::new(4, 4, BG);
        c.draw_line((0, 3), (3, 0), FG);
        for i in 0..4 {
            assert_eq!(c.pixel(i, 3 - i), Some(FG));
        }
        assert_eq!(c.pixel(0, 0), Some(BG));
    }

    #[test]
    fn fill_under_stops_at_line() {
        let mut c = Canvas::new(4, 4, BG);
        c.fill_under(&[(0, 2), (3, 2)], FG);
        for x in 0..4 {
            assert_eq!(c.pixel(x, 1), Some(BG));
            assert_eq!(c.pixel(x, 2), Some(FG));
            assert_eq!(c.pixel(x, 3), Some(FG));
        }
    }

    #[test]
    fn fill_under_blends_each_column_once() {
        let half = FG.with_alpha(128);
        let mut c = Canvas::new(4, 4, BG);
        // Several points share column 1.
        c.fill_under(&[(0, 3), (1, 3), (1, 3), (1, 3), (3, 3)], half);
        assert_eq!(c.pixel(1, 3), c.pixel(2, 3));
        assert_eq!(c.pixel(1, 3), Some(half.over(BG)));
    }
}
