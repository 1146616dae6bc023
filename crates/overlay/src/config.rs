use image::imageops::FilterType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::error::{OverlayError, Result};

/// Seed of the default mask color sequence
pub const DEFAULT_SEED: u64 = 42;

/// Largest accepted outline or label stroke width, in pixels
pub const MAX_THICKNESS: u32 = 64;

/// Largest accepted label font scale
pub const MAX_LABEL_SCALE: f32 = 16.0;

/// Largest accepted number of printed score decimals
pub const MAX_LABEL_PRECISION: usize = 8;

/// Filter used when the base image is resized to mask resolution
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Bilinear => FilterType::Triangle,
            ResizeFilter::Bicubic => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Rendering parameters. Every field is optional when deserialized.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Binarization cutoff; a pixel is foreground iff its probability is strictly greater
    #[schemars(range(min = 0.0, max = 1.0))]
    pub threshold: f32,

    /// Weight of each colored mask layer added onto the overlay
    #[schemars(range(min = 0.0, max = 1.0))]
    pub alpha: f32,

    /// Seed of the per-mask color sequence
    pub seed: u64,

    pub outline_color: [u8; 3],

    #[schemars(range(min = 1, max = 64))]
    pub outline_thickness: u32,

    pub label_color: [u8; 3],

    /// Font scale of score labels (1.0 draws 20 px tall digits)
    #[schemars(range(max = 16.0))]
    pub label_scale: f32,

    #[schemars(range(min = 1, max = 64))]
    pub label_thickness: u32,

    /// Distance in pixels between the label baseline and the top of its outline
    pub label_offset: i32,

    /// Decimal places of the printed score
    #[schemars(range(max = 8))]
    pub label_precision: usize,

    pub resize_filter: ResizeFilter,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            alpha: 0.5,
            seed: DEFAULT_SEED,
            outline_color: [0, 255, 0],
            outline_thickness: 2,
            label_color: [255, 255, 255],
            label_scale: 0.5,
            label_thickness: 1,
            label_offset: 10,
            label_precision: 2,
            resize_filter: ResizeFilter::default(),
        }
    }
}

impl RenderConfig {
    /// Reject out of range parameters before any pixel is touched
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("threshold", self.threshold)?;
        check_unit_interval("alpha", self.alpha)?;

        check_thickness("outline_thickness", self.outline_thickness)?;
        check_thickness("label_thickness", self.label_thickness)?;

        if !(self.label_scale > 0.0 && self.label_scale <= MAX_LABEL_SCALE) {
            return Err(OverlayError::Configuration(format!(
                "label_scale must lie in (0, {MAX_LABEL_SCALE}], got {}",
                self.label_scale
            )));
        }
        if self.label_precision > MAX_LABEL_PRECISION {
            return Err(OverlayError::Configuration(format!(
                "label_precision must be at most {MAX_LABEL_PRECISION}, got {}",
                self.label_precision
            )));
        }

        Ok(())
    }

    /// Get the JSON schema of the configuration surface
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RenderConfig)
    }
}

fn check_thickness(name: &str, value: u32) -> Result<()> {
    if (1..=MAX_THICKNESS).contains(&value) {
        Ok(())
    } else {
        Err(OverlayError::Configuration(format!(
            "{name} must lie in [1, {MAX_THICKNESS}], got {value}"
        )))
    }
}

fn check_unit_interval(name: &str, value: f32) -> Result<()> {
    // NaN fails the range check as well
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(OverlayError::Configuration(format!(
            "{name} must lie in [0, 1], got {value}"
        )))
    }
}
