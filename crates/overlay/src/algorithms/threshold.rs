use image::{GrayImage, Luma};
use ndarray::ArrayView2;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Strict-inequality binarization of a probability mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBinarizer {
    pub threshold: f32,
}

impl Default for ThresholdBinarizer {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl ThresholdBinarizer {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Map `value > threshold` to 255 and everything else (NaN included) to 0
    pub fn binarize(&self, mask: ArrayView2<'_, f32>) -> GrayImage {
        let (height, width) = mask.dim();
        GrayImage::from_fn(width as u32, height as u32, |x, y| {
            let value = mask[[y as usize, x as usize]];
            if value > self.threshold {
                Luma([FOREGROUND])
            } else {
                Luma([BACKGROUND])
            }
        })
    }
}

/// Number of foreground pixels of a binary image
pub fn count_foreground(binary: &GrayImage) -> usize {
    binary.pixels().filter(|p| p[0] != BACKGROUND).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_threshold_is_strict() {
        let mask = array![[0.5f32, 0.500_001], [0.2, 0.9]];
        let binary = ThresholdBinarizer::new(0.5).binarize(mask.view());

        assert_eq!(binary.get_pixel(0, 0)[0], BACKGROUND, "value equal to threshold is background");
        assert_eq!(binary.get_pixel(1, 0)[0], FOREGROUND, "value marginally above is foreground");
        assert_eq!(binary.get_pixel(0, 1)[0], BACKGROUND);
        assert_eq!(binary.get_pixel(1, 1)[0], FOREGROUND);
        assert_eq!(count_foreground(&binary), 2);
    }

    #[test]
    fn test_layout_is_row_major() {
        // 2 rows, 3 columns
        let mask = array![[0.0f32, 0.0, 1.0], [0.0, 0.0, 0.0]];
        let binary = ThresholdBinarizer::default().binarize(mask.view());
        assert_eq!(binary.dimensions(), (3, 2));
        assert_eq!(binary.get_pixel(2, 0)[0], FOREGROUND);
    }

    #[test]
    fn test_nan_is_background() {
        let mask = array![[f32::NAN]];
        let binary = ThresholdBinarizer::new(0.0).binarize(mask.view());
        assert_eq!(count_foreground(&binary), 0);
    }
}
