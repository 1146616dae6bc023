use crate::{
    algorithms::{ImageprocContourExtractor, SeededPalette},
    config::{RenderConfig, ResizeFilter},
    error::Result,
    renderer::OverlayRenderer,
    traits::{ColorPalette, ContourExtractor},
};

/// Builder for creating renderers with a fluent API
pub struct OverlayRendererBuilder {
    config: RenderConfig,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    palette: Option<Box<dyn ColorPalette>>,
}

impl OverlayRendererBuilder {
    /// Create a new builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: RenderConfig::default(),
            contour_extractor: None,
            palette: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Seed of the default palette; ignored when a palette is set explicitly
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn outline(mut self, color: [u8; 3], thickness: u32) -> Self {
        self.config.outline_color = color;
        self.config.outline_thickness = thickness;
        self
    }

    pub fn resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.config.resize_filter = filter;
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Set the color palette (replaces the seeded default)
    pub fn set_palette<P>(mut self, palette: P) -> Self
    where
        P: ColorPalette + 'static,
    {
        self.palette = Some(Box::new(palette));
        self
    }

    /// Validate the configuration and build the renderer with default
    /// components where none were given
    pub fn build(self) -> Result<OverlayRenderer> {
        self.config.validate()?;

        let contour_extractor = self
            .contour_extractor
            .unwrap_or_else(|| Box::new(ImageprocContourExtractor::default()));

        let palette = self
            .palette
            .unwrap_or_else(|| Box::new(SeededPalette::new(self.config.seed)));

        Ok(OverlayRenderer::new(self.config, contour_extractor, palette))
    }
}

impl Default for OverlayRendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}
