/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const DARK:        Self = Self::rgb(0x1e, 0x1e, 0x2e); // #1e1e2e
    pub const WHITE:       Self = Self::rgb(0xcd, 0xd6, 0xf4); // #cdd6f4
    pub const GREEN:       Self = Self::rgb(0xa6, 0xe3, 0xa1); // #a6e3a1
    pub const BLUE:        Self = Self::rgb(0x89, 0xb4, 0xfa); // #89b4fa
    pub const YELLOW:      Self = Self::rgb(0xf9, 0xe2, 0xaf); // #f9e2af
    pub const RED:         Self = Self::rgb(0xf3, 0x8b, 0xa8); // #f38ba8
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    /// Opaque colour from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let byte = |s: &str| -> Option<u8> { u8::from_str_radix(s, 16).ok() };

        match hex.len() {
            6 => Some(Self::rgb(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?)),
            8 => Some(Self {
                r: byte(&hex[0..2])?,
                g: byte(&hex[2..4])?,
                b: byte(&hex[4..6])?,
                a: byte(&hex[6..8])?,
            }),
            _ => None,
        }
    }

    /// Return a copy with the alpha channel set to `alpha`.
    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.a = alpha;
        self
    }

    /// Composite `self` over `bg` (source-over, integer arithmetic).
    ///
    /// The result keeps `bg`'s alpha when `bg` is opaque, so drawing onto an
    /// opaque background never punches holes into it.
    #[must_use]
    pub fn over(self, bg: Color) -> Color {
        match self.a {
            255 => return self,
            0   => return bg,
            _   => {}
        }

        let alpha = self.a as u32;
        let inv   = 255 - alpha;
        let mix   = |fg: u8, bg: u8| ((fg as u32 * alpha + bg as u32 * inv) / 255) as u8;

        Color {
            r: mix(self.r, bg.r),
            g: mix(self.g, bg.g),
            b: mix(self.b, bg.b),
            a: (alpha + bg.a as u32 * inv / 255).min(255) as u8,
        }
    }

    /// Channels as `[r, g, b, a]`.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
