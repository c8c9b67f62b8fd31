/// A rendered sparkline: an RGBA8 raster plus its status string.
///
/// Images are immutable once built.  Two images are equal exactly when their
/// geometry, pixels and label match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    width:  u32,
    height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pixels: Vec<u8>,
    label:  String,
}

impl ChartImage {
    /// Wrap a finished pixel buffer.
    ///
    /// Returns `None` when `pixels` does not hold exactly `width * height`
    /// RGBA pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, label: impl Into<String>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self { width, height, pixels, label: label.into() })
    }

    /// An image with no raster, only a status string.  Used when rendering
    /// could not produce pixels.
    pub fn label_only(label: impl Into<String>) -> Self {
        Self { width: 0, height: 0, pixels: Vec::new(), label: label.into() }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// `true` when the image carries no raster.
    pub fn is_label_only(&self) -> bool {
        self.pixels.is_empty()
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let px = &self.pixels[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }
}
