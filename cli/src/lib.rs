use overlay::{OverlayError, OverlayRenderer, PredictionResponse, RenderConfig};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;


#[derive(Error, Debug)]
pub enum OverlayCliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    ImageError(#[from] image::ImageError),
    #[error(transparent)]
    OverlayError(#[from] OverlayError),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}


/// One base image and saved prediction to render
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RenderJob {
    pub image: PathBuf,
    pub prediction: PathBuf,
    pub output: PathBuf,
    /// Where to write the per-mask JSON report, if anywhere
    pub report: Option<PathBuf>,
}

/// A list of render jobs sharing one configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RenderJobs {
    #[serde(default)]
    pub config: RenderConfig,
    pub jobs: Vec<RenderJob>,
}

impl RenderJobs {
    /// Load RenderJobs from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, OverlayCliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load RenderJobs from TOML string
    pub fn from_toml(content: &str) -> Result<Self, OverlayCliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load RenderJobs from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, OverlayCliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load RenderJobs from JSON string
    pub fn from_json(content: &str) -> Result<Self, OverlayCliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load the jobs
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OverlayCliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(OverlayCliError::UnsupportedFileFormat),
        }
    }

    /// Convert RenderJobs to TOML string
    pub fn to_toml(&self) -> Result<String, OverlayCliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert RenderJobs to JSON string
    pub fn to_json(&self) -> Result<String, OverlayCliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }
}

/// Load a saved prediction response from disk
pub fn load_prediction<P: AsRef<Path>>(path: P) -> Result<PredictionResponse, OverlayCliError> {
    let file = File::open(path)?;
    Ok(PredictionResponse::from_reader(BufReader::new(file))?)
}

/// Render one job and write its outputs. Returns the number of masks drawn.
pub fn run_job(job: &RenderJob, renderer: &OverlayRenderer) -> Result<usize, OverlayCliError> {
    let image = image::open(&job.image)?;
    let (masks, scores) = load_prediction(&job.prediction)?.into_batch()?;

    let rendered = renderer.render_with_report(&image, &masks, scores.as_deref())?;

    if let Some(parent) = job.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    rendered.image.save(&job.output)?;
    info!(
        "Rendered {} masks from {:?} -> {:?} ({}x{})",
        masks.len(),
        job.prediction,
        job.output,
        rendered.width(),
        rendered.height()
    );

    if let Some(report_path) = &job.report {
        fs::write(report_path, rendered.report_json()?)?;
        info!("Report saved to {:?}", report_path);
    }

    Ok(rendered.regions.len())
}
