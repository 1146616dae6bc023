//! # Segmentation Overlay Rendering Library
//!
//! Turns the per-object probability masks returned by a segmentation service
//! into a single annotated image: each mask is thresholded, painted in its own
//! color, added onto the base image, outlined, and optionally labeled with its
//! confidence score.
//!
//! ## Core Features
//!
//! - **Deterministic colors**: a locally seeded sequence, identical on every call
//! - **Additive compositing**: overlapping masks accumulate in render order
//! - **External outlines**: imageproc border following, holes ignored
//! - **Typed payloads**: prediction responses validated once at ingestion
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use overlay::{render, PredictionResponse};
//!
//! let image = image::open("photo.jpg")?;
//! let response = PredictionResponse::from_json_str(&std::fs::read_to_string("prediction.json")?)?;
//! let (masks, scores) = response.into_batch()?;
//!
//! let overlay = render(&image, &masks, scores.as_deref(), None)?;
//! overlay.save("overlay.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Renderer
//!
//! ```rust,no_run
//! use overlay::{OverlayRenderer, algorithms::*};
//!
//! let renderer = OverlayRenderer::builder()
//!     .threshold(0.4)
//!     .alpha(0.6)
//!     .set_contour_extractor(ImageprocContourExtractor { simplify: false })
//!     .set_palette(FixedPalette::new(vec![image::Rgb([255, 0, 0])]))
//!     .build()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod config;
pub mod batch;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod renderer;
pub mod io;

// Re-exports for convenience
pub use error::{OverlayError, Result};
pub use config::{
    RenderConfig, ResizeFilter, DEFAULT_SEED, MAX_LABEL_PRECISION, MAX_LABEL_SCALE, MAX_THICKNESS,
};
pub use batch::MaskBatch;
pub use types::{Outline, RegionReport, RenderedOverlay};
pub use traits::*;
pub use renderer::{OverlayRenderer, builder::OverlayRendererBuilder};
pub use io::*;

use image::{DynamicImage, RgbImage};

/// Render `masks` onto `image` with the default components.
///
/// Without a configuration [`RenderConfig::default`] is used. The configuration
/// is validated before anything else happens.
pub fn render(
    image: &DynamicImage,
    masks: &MaskBatch,
    scores: Option<&[f32]>,
    config: Option<&RenderConfig>,
) -> Result<RgbImage> {
    OverlayRenderer::builder()
        .with_config(config.cloned().unwrap_or_default())
        .build()?
        .render(image, masks, scores)
}

/// Like [`render`], also returning a summary of every mask
pub fn render_with_report(
    image: &DynamicImage,
    masks: &MaskBatch,
    scores: Option<&[f32]>,
    config: Option<&RenderConfig>,
) -> Result<RenderedOverlay> {
    OverlayRenderer::builder()
        .with_config(config.cloned().unwrap_or_default())
        .build()?
        .render_with_report(image, masks, scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use ndarray::{Array2, Array3};

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 90])
        }))
    }

    #[test]
    fn test_render_scenario_single_mask() {
        let masks = MaskBatch::new(Array3::from_elem((1, 4, 4), 0.9));
        let overlay = render(&test_image(16, 16), &masks, Some(&[0.87]), None)
            .expect("Should render successfully");
        assert_eq!(overlay.dimensions(), (4, 4));
        assert_eq!(overlay.get_pixel(0, 0), &Rgb([0, 255, 0]));
    }

    #[test]
    fn test_render_rejects_mismatched_masks() {
        let result = MaskBatch::from_masks(vec![Array2::zeros((4, 4)), Array2::zeros((5, 5))]);
        assert!(matches!(result, Err(OverlayError::ShapeMismatch(_))));
    }

    #[test]
    fn test_render_rejects_short_scores() {
        let masks = MaskBatch::new(Array3::from_elem((2, 4, 4), 0.9));
        let result = render(&test_image(4, 4), &masks, Some(&[0.5]), None);
        assert!(matches!(result, Err(OverlayError::ShapeMismatch(_))));
    }

    #[test]
    fn test_render_rejects_bad_config_first() {
        // The score mismatch is never reached: configuration fails fast
        let masks = MaskBatch::new(Array3::from_elem((2, 4, 4), 0.9));
        let config = RenderConfig { alpha: 2.0, ..RenderConfig::default() };
        let result = render(&test_image(4, 4), &masks, Some(&[0.5]), Some(&config));
        assert!(matches!(result, Err(OverlayError::Configuration(_))));
    }

    #[test]
    fn test_explicit_default_config_matches_none() {
        let image = test_image(12, 12);
        let masks = MaskBatch::new(Array3::from_shape_fn((2, 6, 6), |(i, y, x)| {
            if (x + i) % 4 < 2 && y > 0 { 0.8 } else { 0.1 }
        }));
        let implicit = render(&image, &masks, Some(&[0.4, 0.6]), None).expect("Should render");
        let explicit = render(&image, &masks, Some(&[0.4, 0.6]), Some(&RenderConfig::default()))
            .expect("Should render");
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn test_no_masks_is_identity() {
        let image = test_image(9, 5);
        let overlay = render(&image, &MaskBatch::empty(), None, None)
            .expect("Should render successfully");
        assert_eq!(overlay, image.to_rgb8());
    }

    #[test]
    fn test_payload_to_overlay() {
        let json = r#"{"masks": [[[[0.0, 0.9, 0.9], [0.0, 0.9, 0.9]]]], "boxes": [], "scores": [0.66]}"#;
        let (masks, scores) = PredictionResponse::from_json_str(json)
            .and_then(PredictionResponse::into_batch)
            .expect("Should ingest payload");

        let result = render_with_report(&test_image(6, 4), &masks, scores.as_deref(), None)
            .expect("Should render successfully");

        assert_eq!((result.width(), result.height()), (3, 2));
        assert_eq!(result.regions.len(), 1);
        assert_eq!(result.regions[0].foreground_pixels, 4);
        assert_eq!(result.regions[0].score, Some(0.66));

        let report = result.report_json().expect("Report should serialize");
        assert!(report.contains("\"foreground_pixels\": 4"));
    }
}
