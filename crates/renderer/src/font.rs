//! A 3×5 pixel font covering what chart overlays print.

pub const GLYPH_WIDTH: u32 = 3;
pub const GLYPH_HEIGHT: u32 = 5;
/// Horizontal distance between glyph origins.
pub const ADVANCE: u32 = GLYPH_WIDTH + 1;

/// Rows top to bottom; bit 2 is the leftmost pixel.
fn glyph(c: char) -> Option<[u8; 5]> {
    Some(match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        _ => return None,
    })
}

/// Width in pixels of `text` when drawn with [`draw_text`].
pub fn text_width(text: &str) -> u32 {
    match text.chars().count() as u32 {
        0 => 0,
        n => n * ADVANCE - 1,
    }
}

/// Draw `text` with its top-left corner at `(x, y)`.  Unknown characters
/// leave a blank cell.
pub fn draw_text(canvas: &mut crate::Canvas, x: i32, y: i32, text: &str, color: meter_theme::Color) {
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let origin = x + (i as u32 * ADVANCE) as i32;
        for (dy, bits) in rows.iter().enumerate() {
            for dx in 0..GLYPH_WIDTH {
                if bits & (0b100 >> dx) != 0 {
                    canvas.set_pixel(origin + dx as i32, y + dy as i32, color);
                }
            }
        }
    }
}
