//! Deterministic header text from an embedded 8x8 bitmap font
//!
//! Glyphs are scaled by an integer block factor so the output is identical on
//! every platform and needs no font files.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};

/// Native glyph edge length of the bitmap font
pub const GLYPH_CELLS: u32 = 8;

/// How a run of text is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Target glyph height in pixels (rounded down to a multiple of 8)
    pub size_px: u32,
    /// Thicken strokes horizontally
    pub bold: bool,
    /// Fill color
    pub color: Rgba<u8>,
}

impl TextStyle {
    /// Pixel size of one font cell
    pub const fn block(&self) -> u32 {
        let block = self.size_px / GLYPH_CELLS;
        if block == 0 { 1 } else { block }
    }

    const fn embolden(&self) -> u32 {
        if self.bold {
            let extra = self.block() / 3;
            if extra == 0 { 1 } else { extra }
        } else {
            0
        }
    }

    /// Horizontal distance from one glyph origin to the next
    pub const fn advance(&self) -> u32 {
        GLYPH_CELLS * self.block() + self.embolden()
    }

    /// Height of a rendered line
    pub const fn line_height(&self) -> u32 {
        GLYPH_CELLS * self.block()
    }
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Rendered width of `text` in pixels
pub fn text_width(text: &str, style: &TextStyle) -> u32 {
    let count = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    count.saturating_mul(style.advance())
}

fn fill_block(canvas: &mut RgbaImage, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
    let (canvas_w, canvas_h) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let x0 = x.clamp(0, canvas_w);
    let y0 = y.clamp(0, canvas_h);
    let x1 = (x + i64::from(width)).clamp(0, canvas_w);
    let y1 = (y + i64::from(height)).clamp(0, canvas_h);

    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}

/// Draw a single line of text with its left edge at `x`, vertically centred
/// on `center_y`; pixels outside the canvas are clipped
pub fn draw_text(canvas: &mut RgbaImage, text: &str, x: i64, center_y: i64, style: &TextStyle) {
    let block = style.block();
    let top = center_y - i64::from(style.line_height() / 2);
    let stroke = block + style.embolden();

    for (index, ch) in text.chars().enumerate() {
        let origin_x = x + index as i64 * i64::from(style.advance());
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_CELLS {
                // Bit 0 is the leftmost column
                if bits & (1 << col) == 0 {
                    continue;
                }
                fill_block(
                    canvas,
                    origin_x + i64::from(col * block),
                    top + row as i64 * i64::from(block),
                    stroke,
                    block,
                    style.color,
                );
            }
        }
    }
}
