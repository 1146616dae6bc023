use image::{Rgb, RgbImage};
use imageproc::drawing::BresenhamLineIter;

/// Paint a `thickness` x `thickness` square brush at `(x, y)`, clipped to the canvas.
/// Even sizes extend one pixel further up and left than down and right.
pub fn stamp(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, thickness: u32) {
    let size = thickness.max(1) as i32;
    let start = -(size / 2);
    let (width, height) = canvas.dimensions();

    for dy in start..start + size {
        for dx in start..start + size {
            let (px, py) = (x + dx, y + dy);
            if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

/// Rasterize a segment with both end points included
pub fn draw_thick_segment(
    canvas: &mut RgbImage,
    start: [i32; 2],
    end: [i32; 2],
    color: Rgb<u8>,
    thickness: u32,
) {
    let line = BresenhamLineIter::new(
        (start[0] as f32, start[1] as f32),
        (end[0] as f32, end[1] as f32),
    );
    for (x, y) in line {
        stamp(canvas, x, y, color, thickness);
    }
    stamp(canvas, end[0], end[1], color, thickness);
}

/// Draw an open polyline
pub fn draw_polyline(canvas: &mut RgbImage, points: &[[i32; 2]], color: Rgb<u8>, thickness: u32) {
    match points {
        [] => {}
        [point] => stamp(canvas, point[0], point[1], color, thickness),
        _ => {
            for segment in points.windows(2) {
                draw_thick_segment(canvas, segment[0], segment[1], color, thickness);
            }
        }
    }
}

/// Draw a polygon, joining the last vertex back to the first
pub fn draw_closed_polyline(canvas: &mut RgbImage, points: &[[i32; 2]], color: Rgb<u8>, thickness: u32) {
    draw_polyline(canvas, points, color, thickness);
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if points.len() > 2 {
            draw_thick_segment(canvas, last, first, color, thickness);
        }
    }
}
