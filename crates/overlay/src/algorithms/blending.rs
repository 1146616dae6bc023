use image::{GrayImage, Rgb, RgbImage};

use crate::error::{OverlayError, Result};
use crate::algorithms::threshold::BACKGROUND;

/// Add `alpha * color` onto every foreground pixel of `canvas`.
///
/// The weights are not normalized: `out = base * 1.0 + color * alpha`, rounded
/// and saturated to the 8-bit range. Background pixels receive a zero layer
/// and stay untouched, so overlapping masks accumulate in render order.
pub fn blend_additive(
    canvas: &mut RgbImage,
    binary: &GrayImage,
    color: Rgb<u8>,
    alpha: f32,
) -> Result<usize> {
    if canvas.dimensions() != binary.dimensions() {
        return Err(OverlayError::ShapeMismatch(format!(
            "mask is {:?} but the overlay is {:?}",
            binary.dimensions(),
            canvas.dimensions()
        )));
    }

    let mut blended = 0;
    for (x, y, mask_pixel) in binary.enumerate_pixels() {
        if mask_pixel[0] == BACKGROUND {
            continue;
        }
        let pixel = canvas.get_pixel_mut(x, y);
        for (channel, &layer) in pixel.0.iter_mut().zip(color.0.iter()) {
            *channel = saturate(f32::from(*channel) + f32::from(layer) * alpha);
        }
        blended += 1;
    }

    Ok(blended)
}

fn saturate(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_only_foreground_is_blended() {
        let mut canvas = RgbImage::from_pixel(2, 1, Rgb([10, 20, 30]));
        let mut binary = GrayImage::new(2, 1);
        binary.put_pixel(1, 0, Luma([255]));

        let count = blend_additive(&mut canvas, &binary, Rgb([100, 50, 0]), 0.5)
            .expect("Should blend");

        assert_eq!(count, 1);
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([10, 20, 30]));
        assert_eq!(canvas.get_pixel(1, 0), &Rgb([60, 45, 30]));
    }

    #[test]
    fn test_accumulation_saturates() {
        let mut canvas = RgbImage::from_pixel(1, 1, Rgb([200, 0, 0]));
        let binary = GrayImage::from_pixel(1, 1, Luma([255]));

        blend_additive(&mut canvas, &binary, Rgb([254, 254, 0]), 1.0).expect("Should blend");
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([255, 254, 0]));

        blend_additive(&mut canvas, &binary, Rgb([0, 254, 0]), 1.0).expect("Should blend");
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([255, 255, 0]));
    }

    #[test]
    fn test_zero_alpha_leaves_canvas() {
        let mut canvas = RgbImage::from_pixel(3, 3, Rgb([7, 7, 7]));
        let binary = GrayImage::from_pixel(3, 3, Luma([255]));
        blend_additive(&mut canvas, &binary, Rgb([200, 200, 200]), 0.0).expect("Should blend");
        assert!(canvas.pixels().all(|p| *p == Rgb([7, 7, 7])));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut canvas = RgbImage::new(3, 3);
        let binary = GrayImage::new(4, 3);
        assert!(matches!(
            blend_additive(&mut canvas, &binary, Rgb([1, 1, 1]), 0.5),
            Err(OverlayError::ShapeMismatch(_))
        ));
    }
}
