//! Blocky 3x5 bitmap font
//!
//! Text is turned into solid rectangles so the sprite pipeline can draw it
//! with the same untextured quad path as `fill_rect`. Lowercase maps to
//! uppercase; unknown characters render as `?`.

use super::surface::{Rect, TextAlign, TextStyle};

const GLYPH_W: u8 = 3;
const GLYPH_H: u8 = 5;
/// Horizontal advance in cells (glyph plus one cell of spacing)
const ADVANCE: f32 = 4.0;
/// Cap height relative to the requested font size
const CAP_RATIO: f32 = 0.7;

#[rustfmt::skip]
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '$' => [0b011, 0b110, 0b010, 0b011, 0b110],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        _   => [0b111, 0b001, 0b010, 0b000, 0b010],
    }
}

/// Side of one font pixel for a given font size
pub fn cell_size(size: f32) -> f32 {
    size * CAP_RATIO / GLYPH_H as f32
}

pub fn text_width(text: &str, size: f32) -> f32 {
    let n = text.chars().count();
    if n == 0 {
        return 0.0;
    }
    let cell = cell_size(size);
    (n as f32 * ADVANCE - 1.0) * cell
}

/// Solid rectangles for `text` with its baseline at `y`. Runs of lit pixels
/// in a glyph row are merged into one rectangle.
pub fn layout(text: &str, x: f32, y: f32, style: &TextStyle) -> Vec<Rect> {
    let cell = cell_size(style.size);
    let left = match style.align {
        TextAlign::Left => x,
        TextAlign::Center => x - text_width(text, style.size) / 2.0,
        TextAlign::Right => x - text_width(text, style.size),
    };
    let top = y - GLYPH_H as f32 * cell;

    let mut rects = Vec::new();
    for (i, c) in text.chars().enumerate() {
        let gx = left + i as f32 * ADVANCE * cell;
        for (row, bits) in glyph(c).iter().enumerate() {
            let ry = top + row as f32 * cell;
            let mut col = 0;
            while col < GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < GLYPH_W && bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                    col += 1;
                }
                rects.push(Rect::new(
                    gx + start as f32 * cell,
                    ry,
                    (col - start) as f32 * cell,
                    cell,
                ));
            }
        }
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::surface::Color;

    fn style(align: TextAlign) -> TextStyle {
        TextStyle::new(50.0 / CAP_RATIO, Color::WHITE, align)
    }

    #[test]
    fn test_runs_are_merged() {
        // '0': full top row, two side pixels x3, full bottom row
        let rects = layout("0", 0.0, 50.0, &style(TextAlign::Left));
        assert_eq!(rects.len(), 2 + 3 * 2);
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 30.0, 10.0));
    }

    #[test]
    fn test_alignment() {
        let w = text_width("AB", style(TextAlign::Left).size);
        assert!((w - 70.0).abs() < 1e-3);
        let right = layout("AB", 100.0, 50.0, &style(TextAlign::Right));
        let max_x = right.iter().map(|r| r.x + r.w).fold(f32::MIN, f32::max);
        assert!((max_x - 100.0).abs() < 1e-3);
        let centered = layout("AB", 100.0, 50.0, &style(TextAlign::Center));
        let min_x = centered.iter().map(|r| r.x).fold(f32::MAX, f32::min);
        assert!((min_x - 65.0).abs() < 1e-3);
    }

    #[test]
    fn test_space_and_lowercase() {
        assert!(layout(" ", 0.0, 0.0, &style(TextAlign::Left)).is_empty());
        assert_eq!(
            layout("a", 0.0, 0.0, &style(TextAlign::Left)),
            layout("A", 0.0, 0.0, &style(TextAlign::Left))
        );
    }
}
