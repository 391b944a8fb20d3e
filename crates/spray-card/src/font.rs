//! 5x7 bitmap glyphs for section labels.
//!
//! Covers exactly the characters the labels use: digits, `.`, `%`, space
//! and the letters of `Sec`.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

pub(crate) const GLYPH_W: u32 = 5;
pub(crate) const GLYPH_H: u32 = 7;
/// Blank columns between glyphs.
const ADVANCE_GAP: u32 = 1;

// One byte per row, bit 4 is the leftmost column.
fn glyph(c: char) -> Option<[u8; 7]> {
    Some(match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'e' => [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        'c' => [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E],
        ' ' => [0x00; 7],
        _ => return None,
    })
}

/// Width in font dots (multiply by the scale for pixels).
pub(crate) fn text_width(text: &str) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        0
    } else {
        n * (GLYPH_W + ADVANCE_GAP) - ADVANCE_GAP
    }
}

/// Draw `text` with its top-left corner at `(x, y)`, each dot `scale` pixels
/// square. Unknown characters advance without drawing; dots outside the
/// image are clipped.
pub(crate) fn draw_text(img: &mut RgbImage, x: i32, y: i32, scale: u32, color: Rgb<u8>, text: &str) {
    let scale = scale.max(1);
    let step = ((GLYPH_W + ADVANCE_GAP) * scale) as i32;
    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let gx = x + i as i32 * step;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                let px = gx + (col * scale) as i32;
                let py = y + (row as u32 * scale) as i32;
                draw_filled_rect_mut(img, Rect::at(px, py).of_size(scale, scale), color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_characters_have_glyphs() {
        for c in "Sec 0123456789.%".chars() {
            assert!(glyph(c).is_some(), "missing glyph for {c:?}");
        }
        assert!(glyph('#').is_none());
    }

    #[test]
    fn width_counts_gaps_between_glyphs() {
        assert_eq!(text_width(""), 0);
        assert_eq!(text_width("1"), 5);
        assert_eq!(text_width("45.2%"), 5 * 5 + 4);
    }

    #[test]
    fn draws_scaled_dots_and_clips() {
        let white = Rgb([255, 255, 255]);
        let red = Rgb([255, 0, 0]);
        let mut img = RgbImage::from_pixel(20, 20, white);
        draw_text(&mut img, 0, 0, 2, red, "1");
        // Top row of '1' is the single centre dot: columns 4..6 at scale 2.
        assert_eq!(*img.get_pixel(4, 0), red);
        assert_eq!(*img.get_pixel(5, 1), red);
        assert_eq!(*img.get_pixel(0, 0), white);

        let mut small = RgbImage::from_pixel(3, 3, white);
        draw_text(&mut small, -4, -4, 3, red, "8");
    }
}
