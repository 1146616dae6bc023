use image::{GrayImage, Rgb};
use crate::{error::Result, types::Outline};

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Extract the external outlines of the nonzero regions of a binary image
    fn extract_contours(&self, image: &GrayImage) -> Result<Vec<Outline>>;
}

/// Trait for per-mask color assignment
pub trait ColorPalette: Send + Sync {
    /// Colors for `count` masks, in render order
    fn colors(&self, count: usize) -> Vec<Rgb<u8>>;
}
