use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use overlay::{OverlayRenderer, RenderConfig, ResizeFilter};
use overlay_cli::{run_job, RenderJob, RenderJobs};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Render segmentation masks as an annotated overlay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one image with a saved prediction response
    Render {
        /// Path to the base image
        #[arg(short, long)]
        image: PathBuf,
        /// Path to the prediction JSON ({"masks": [...], "boxes": [...], "scores": [...]})
        #[arg(short, long)]
        prediction: PathBuf,
        /// Where to save the overlay (format from extension)
        #[arg(short, long)]
        output: PathBuf,
        /// Binarization threshold in [0, 1]
        #[arg(long, default_value = "0.5")]
        threshold: f32,
        /// Weight of the colored mask layers in [0, 1]
        #[arg(long, default_value = "0.5")]
        alpha: f32,
        /// Seed of the mask color sequence
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Filter used to resize the image to mask resolution
        #[arg(long, default_value = "bilinear")]
        resize_filter: ResizeFilter,
        /// Optional path for a JSON report of the drawn regions
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Render every job listed in a TOML or JSON file
    Batch {
        /// Path to the job file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the JSON schema of the render configuration
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            image,
            prediction,
            output,
            threshold,
            alpha,
            seed,
            resize_filter,
            report,
        } => {
            let config = RenderConfig {
                threshold,
                alpha,
                seed,
                resize_filter,
                ..RenderConfig::default()
            };
            let job = RenderJob { image, prediction, output, report };
            render_single(&job, config)?;
        }
        Commands::Batch { config } => {
            render_batch(&config)?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&RenderConfig::schema())?);
        }
    }

    Ok(())
}

fn render_single(job: &RenderJob, config: RenderConfig) -> Result<()> {
    let renderer = OverlayRenderer::builder().with_config(config).build()?;
    info!("{}", renderer.info());

    let drawn = run_job(job, &renderer)?;
    info!("✅ Overlay with {} masks saved to {:?}", drawn, job.output);
    Ok(())
}

fn render_batch(config_path: &Path) -> Result<()> {
    let jobs = RenderJobs::from_file(config_path)?;
    info!("Loaded {} render jobs from {:?}", jobs.jobs.len(), config_path);

    let renderer = OverlayRenderer::builder().with_config(jobs.config.clone()).build()?;
    info!("{}", renderer.info());

    let mut failures = 0;
    for job in &jobs.jobs {
        if let Err(e) = run_job(job, &renderer) {
            error!("Failed to render {:?}: {}", job.image, e);
            failures += 1;
        }
    }

    info!(
        "✅ Batch completed: {} rendered, {} failed",
        jobs.jobs.len() - failures,
        failures
    );

    if failures > 0 {
        return Err(color_eyre::eyre::eyre!("{} of {} jobs failed", failures, jobs.jobs.len()));
    }
    Ok(())
}
