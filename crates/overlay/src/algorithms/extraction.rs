use image::{imageops, GrayImage};
use imageproc::contours::{find_contours, BorderType};
use crate::{error::Result, traits::ContourExtractor, types::Outline};

/// Imageproc-based contour extractor.
///
/// Only top-level outer borders are kept: hole borders and regions nested
/// inside holes are dropped. With `simplify` set, straight runs of the traced
/// border are collapsed to their end points.
///
/// Pixels outside the image count as background, so regions touching the
/// frame are traced like any other.
#[derive(Debug, Clone)]
pub struct ImageprocContourExtractor {
    pub simplify: bool,
}

impl Default for ImageprocContourExtractor {
    fn default() -> Self {
        Self { simplify: true }
    }
}

impl ContourExtractor for ImageprocContourExtractor {
    /// Outlines come back in raster-scan order of their first border pixel:
    /// topmost region first, ties broken by the leftmost.
    fn extract_contours(&self, binary_image: &GrayImage) -> Result<Vec<Outline>> {
        let contours = find_contours::<i32>(&pad_with_background(binary_image));

        let result = contours
            .into_iter()
            .filter(|contour| matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none())
            .map(|contour| {
                let points: Vec<[i32; 2]> = contour.points.iter().map(|p| [p.x - 1, p.y - 1]).collect();
                if self.simplify {
                    Outline::new(compress_runs(&points))
                } else {
                    Outline::new(points)
                }
            })
            .collect();

        Ok(result)
    }
}

/// Surround the image with a one pixel background frame. Border following
/// only starts an outer border right of a background pixel, which column 0
/// never has.
fn pad_with_background(binary_image: &GrayImage) -> GrayImage {
    let (width, height) = binary_image.dimensions();
    let mut padded = GrayImage::new(width + 2, height + 2);
    imageops::replace(&mut padded, binary_image, 1, 1);
    padded
}

/// Drop every vertex whose incoming and outgoing steps point the same way.
/// The border is treated as closed.
pub fn compress_runs(points: &[[i32; 2]]) -> Vec<[i32; 2]> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |a: [i32; 2], b: [i32; 2]| [(b[0] - a[0]).signum(), (b[1] - a[1]).signum()];

    let kept: Vec<[i32; 2]> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let curr = points[i];
            let next = points[(i + 1) % n];
            step(prev, curr) != step(curr, next)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() {
        points[..1].to_vec()
    } else {
        kept
    }
}
