pub mod builder;

use image::{imageops, DynamicImage, Rgb, RgbImage};
use tracing::{debug, info};

use crate::{
    algorithms::{
        blend_additive, count_foreground, draw_closed_polyline, draw_label, format_score,
        LabelStyle, ThresholdBinarizer,
    },
    batch::MaskBatch,
    config::{RenderConfig, ResizeFilter},
    error::{OverlayError, Result},
    traits::{ColorPalette, ContourExtractor},
    types::{RegionReport, RenderedOverlay},
};

/// Composites a batch of probability masks onto a base image.
///
/// Each mask is binarized, painted with its own color, added onto the running
/// overlay, outlined, and optionally labeled with its score. The renderer holds
/// no per-call state; one instance can serve any number of calls.
pub struct OverlayRenderer {
    config: RenderConfig,
    binarizer: ThresholdBinarizer,
    contour_extractor: Box<dyn ContourExtractor>,
    palette: Box<dyn ColorPalette>,
}

impl OverlayRenderer {
    /// Create a new renderer builder
    pub fn builder() -> builder::OverlayRendererBuilder {
        builder::OverlayRendererBuilder::new()
    }

    /// Assemble a renderer from an already validated configuration
    pub(crate) fn new(
        config: RenderConfig,
        contour_extractor: Box<dyn ContourExtractor>,
        palette: Box<dyn ColorPalette>,
    ) -> Self {
        Self {
            binarizer: ThresholdBinarizer::new(config.threshold),
            config,
            contour_extractor,
            palette,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render the overlay image
    pub fn render(
        &self,
        image: &DynamicImage,
        masks: &MaskBatch,
        scores: Option<&[f32]>,
    ) -> Result<RgbImage> {
        Ok(self.render_with_report(image, masks, scores)?.image)
    }

    /// Render the overlay image and describe what was drawn for each mask
    pub fn render_with_report(
        &self,
        image: &DynamicImage,
        masks: &MaskBatch,
        scores: Option<&[f32]>,
    ) -> Result<RenderedOverlay> {
        // Step 1: Validate every input before touching pixels
        if image.width() == 0 || image.height() == 0 {
            return Err(OverlayError::EmptyInput("base image has no pixels".to_string()));
        }

        if let Some(scores) = scores {
            if scores.len() != masks.len() {
                return Err(OverlayError::ShapeMismatch(format!(
                    "{} scores supplied for {} masks",
                    scores.len(),
                    masks.len()
                )));
            }
        }

        let (height, width) = match masks.resolution() {
            Some(resolution) => resolution,
            None if masks.is_empty() => (image.height(), image.width()),
            None => {
                return Err(OverlayError::EmptyInput(format!(
                    "{} masks with zero area ({}x{})",
                    masks.len(),
                    masks.height(),
                    masks.width()
                )));
            }
        };

        let colors = self.palette.colors(masks.len());
        if colors.len() != masks.len() {
            return Err(OverlayError::Configuration(format!(
                "palette produced {} colors for {} masks",
                colors.len(),
                masks.len()
            )));
        }

        // Step 2: Bring the base image to mask resolution
        let mut canvas = resize_base(image, width, height, self.config.resize_filter);

        if masks.is_empty() {
            debug!(width, height, "no masks to render");
            return Ok(RenderedOverlay { image: canvas, regions: Vec::new() });
        }

        // Step 3: Composite the masks in order
        let outline_color = Rgb(self.config.outline_color);
        let label_style = LabelStyle {
            color: Rgb(self.config.label_color),
            scale: self.config.label_scale,
            thickness: self.config.label_thickness,
        };

        let mut regions = Vec::with_capacity(masks.len());
        for (index, (mask, color)) in masks.iter().zip(colors).enumerate() {
            let binary = self.binarizer.binarize(mask);
            let foreground_pixels = count_foreground(&binary);

            blend_additive(&mut canvas, &binary, color, self.config.alpha)?;

            let outlines = self.contour_extractor.extract_contours(&binary)?;
            for outline in &outlines {
                draw_closed_polyline(&mut canvas, &outline.points, outline_color, self.config.outline_thickness);
            }

            let score = scores.map(|scores| scores[index]);
            let label_anchor = match (score, outlines.first()) {
                (Some(score), Some(first)) => {
                    let anchor = first.label_anchor(self.config.label_offset);
                    if let Some(anchor) = anchor {
                        let text = format_score(score, self.config.label_precision);
                        draw_label(&mut canvas, &text, anchor, &label_style);
                    }
                    anchor
                }
                _ => None,
            };

            debug!(
                index,
                foreground_pixels,
                outlines = outlines.len(),
                color = ?color.0,
                "composited mask"
            );

            regions.push(RegionReport {
                index,
                color: color.0,
                score,
                foreground_pixels,
                outlines,
                label_anchor,
            });
        }

        info!(masks = masks.len(), width, height, "rendered overlay");

        Ok(RenderedOverlay { image: canvas, regions })
    }

    /// Get information about the renderer configuration
    pub fn info(&self) -> String {
        format!(
            "OverlayRenderer: threshold={}, alpha={}, seed={}, resize={}",
            self.config.threshold, self.config.alpha, self.config.seed, self.config.resize_filter
        )
    }
}

/// Convert to RGB at the requested size. A base image already at that size is
/// returned pixel-for-pixel.
fn resize_base(image: &DynamicImage, width: u32, height: u32, filter: ResizeFilter) -> RgbImage {
    let rgb = image.to_rgb8();
    if rgb.dimensions() == (width, height) {
        rgb
    } else {
        imageops::resize(&rgb, width, height, filter.into())
    }
}
