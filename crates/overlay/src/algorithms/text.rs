//! Score labels drawn with a small built-in stroke font.
//!
//! Glyphs are polylines on a cell 10 units wide and 20 units tall with the
//! baseline at `y = 20`. One unit maps to `scale` pixels, so a scale of 0.5
//! gives 10 pixel tall digits. Only the characters needed to print numbers are
//! defined; anything else advances the pen without drawing.

use image::{Rgb, RgbImage};

use crate::algorithms::drawing::draw_polyline;

pub const CELL_HEIGHT: i32 = 20;
const BLANK_ADVANCE: i32 = 8;

type Stroke = &'static [[i32; 2]];

struct Glyph {
    strokes: &'static [Stroke],
    advance: i32,
}

static ZERO: Glyph = Glyph {
    strokes: &[&[[3, 0], [7, 0], [10, 3], [10, 17], [7, 20], [3, 20], [0, 17], [0, 3], [3, 0]]],
    advance: 14,
};
static ONE: Glyph = Glyph {
    strokes: &[&[[2, 4], [5, 0], [5, 20]], &[[2, 20], [8, 20]]],
    advance: 14,
};
static TWO: Glyph = Glyph {
    strokes: &[&[[0, 4], [3, 0], [7, 0], [10, 3], [10, 7], [0, 20], [10, 20]]],
    advance: 14,
};
static THREE: Glyph = Glyph {
    strokes: &[
        &[[0, 2], [3, 0], [7, 0], [10, 3], [10, 7], [7, 10], [3, 10]],
        &[[7, 10], [10, 13], [10, 17], [7, 20], [3, 20], [0, 18]],
    ],
    advance: 14,
};
static FOUR: Glyph = Glyph {
    strokes: &[&[[7, 20], [7, 0], [0, 14], [10, 14]]],
    advance: 14,
};
static FIVE: Glyph = Glyph {
    strokes: &[&[[10, 0], [1, 0], [0, 9], [7, 8], [10, 11], [10, 17], [7, 20], [3, 20], [0, 18]]],
    advance: 14,
};
static SIX: Glyph = Glyph {
    strokes: &[&[
        [9, 1], [6, 0], [3, 0], [0, 4], [0, 17], [3, 20], [7, 20], [10, 17], [10, 12], [7, 9],
        [3, 9], [0, 12],
    ]],
    advance: 14,
};
static SEVEN: Glyph = Glyph {
    strokes: &[&[[0, 0], [10, 0], [3, 20]]],
    advance: 14,
};
static EIGHT: Glyph = Glyph {
    strokes: &[
        &[[3, 0], [7, 0], [10, 3], [10, 7], [7, 10], [3, 10], [0, 7], [0, 3], [3, 0]],
        &[[3, 10], [0, 13], [0, 17], [3, 20], [7, 20], [10, 17], [10, 13], [7, 10]],
    ],
    advance: 14,
};
static NINE: Glyph = Glyph {
    strokes: &[&[
        [10, 8], [7, 11], [3, 11], [0, 8], [0, 3], [3, 0], [7, 0], [10, 3], [10, 16], [7, 20],
        [4, 20], [1, 19],
    ]],
    advance: 14,
};
static DOT: Glyph = Glyph {
    strokes: &[&[[1, 19], [2, 19], [2, 20], [1, 20], [1, 19]]],
    advance: 6,
};
static MINUS: Glyph = Glyph {
    strokes: &[&[[1, 11], [9, 11]]],
    advance: 12,
};
static PLUS: Glyph = Glyph {
    strokes: &[&[[5, 6], [5, 16]], &[[0, 11], [10, 11]]],
    advance: 14,
};
static PERCENT: Glyph = Glyph {
    strokes: &[
        &[[1, 1], [3, 1], [3, 4], [1, 4], [1, 1]],
        &[[10, 0], [0, 20]],
        &[[7, 16], [9, 16], [9, 19], [7, 19], [7, 16]],
    ],
    advance: 14,
};

fn glyph(ch: char) -> Option<&'static Glyph> {
    let glyph = match ch {
        '0' => &ZERO,
        '1' => &ONE,
        '2' => &TWO,
        '3' => &THREE,
        '4' => &FOUR,
        '5' => &FIVE,
        '6' => &SIX,
        '7' => &SEVEN,
        '8' => &EIGHT,
        '9' => &NINE,
        '.' => &DOT,
        '-' => &MINUS,
        '+' => &PLUS,
        '%' => &PERCENT,
        _ => return None,
    };
    Some(glyph)
}

fn advance(ch: char) -> i32 {
    glyph(ch).map_or(BLANK_ADVANCE, |g| g.advance)
}

fn to_pixels(units: i32, scale: f32) -> i32 {
    (units as f32 * scale).round() as i32
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub color: Rgb<u8>,
    pub scale: f32,
    pub thickness: u32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            color: Rgb([255, 255, 255]),
            scale: 0.5,
            thickness: 1,
        }
    }
}

/// Format a confidence score with a fixed number of decimals
pub fn format_score(score: f32, precision: usize) -> String {
    format!("{score:.precision$}")
}

/// Width and height in pixels of `text` at `scale`
pub fn measure_label(text: &str, scale: f32) -> (i32, i32) {
    let units = text.chars().map(advance).fold(0i32, i32::saturating_add);
    (to_pixels(units, scale), to_pixels(CELL_HEIGHT, scale))
}

/// Draw `text` with its baseline-left corner at `origin`.
///
/// Labels lying entirely off the canvas are skipped; partly visible ones are clipped.
pub fn draw_label(canvas: &mut RgbImage, text: &str, origin: [i32; 2], style: &LabelStyle) {
    let [left, baseline] = origin;
    if !overlaps_canvas(canvas, text, origin, style) {
        return;
    }

    let mut pen: i32 = 0;
    for ch in text.chars() {
        if let Some(glyph) = glyph(ch) {
            for stroke in glyph.strokes {
                let points: Vec<[i32; 2]> = stroke
                    .iter()
                    .map(|&[gx, gy]| {
                        [
                            left.saturating_add(to_pixels(pen.saturating_add(gx), style.scale)),
                            baseline.saturating_sub(to_pixels(CELL_HEIGHT - gy, style.scale)),
                        ]
                    })
                    .collect();
                draw_polyline(canvas, &points, style.color, style.thickness);
            }
        }
        pen = pen.saturating_add(advance(ch));
    }
}

fn overlaps_canvas(canvas: &RgbImage, text: &str, [left, baseline]: [i32; 2], style: &LabelStyle) -> bool {
    let (width, height) = measure_label(text, style.scale);
    let reach = i32::try_from(style.thickness).unwrap_or(i32::MAX);
    let (canvas_width, canvas_height) = canvas.dimensions();

    let x_min = left.saturating_sub(reach);
    let x_max = left.saturating_add(width).saturating_add(reach);
    let y_min = baseline.saturating_sub(height).saturating_sub(reach);
    let y_max = baseline.saturating_add(reach);

    x_max >= 0
        && y_max >= 0
        && i64::from(x_min) < i64::from(canvas_width)
        && i64::from(y_min) < i64::from(canvas_height)
}
