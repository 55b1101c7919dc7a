// CLI front door: run the pipeline on local files and print JSON reports.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lokerscan::config::{PipelineConfig, Policy};
use lokerscan::pipeline::PipelineContext;

#[derive(Parser, Debug)]
#[command(name = "lokerscan", version, about = "Score a job-posting screenshot for authenticity")]
struct Cli {
    /// TOML file overriding the scoring policy table.
    #[arg(long, global = true)]
    policy: Option<PathBuf>,
    /// JSON file replacing the built-in keyword lists.
    #[arg(long, global = true)]
    lexicons: Option<PathBuf>,
    /// Directory holding serialized backing models.
    #[arg(long, global = true)]
    models: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// OCR an image and print the extraction report.
    Extract { image: PathBuf },
    /// Analyze text (inline or from a file) and print its feature record.
    Analyze {
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Full pipeline: image in, verdict and recommendations out.
    Classify {
        image: PathBuf,
        /// Filename hint for label analysis; defaults to the image path.
        #[arg(long)]
        filename: Option<String>,
    },
    /// Print model and OCR availability.
    Status,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = PipelineConfig::default();
    if let Some(path) = &cli.policy {
        config.policy = Policy::from_toml_file(path)?;
    }
    if let Some(path) = &cli.models {
        config.model_dir = path.clone();
    }
    config.lexicon_path = cli.lexicons.clone();

    let ctx = PipelineContext::new(config);

    let json = match cli.command {
        Command::Extract { image } => {
            let bytes = std::fs::read(&image)
                .with_context(|| format!("reading {}", image.display()))?;
            let name = image.to_string_lossy().to_string();
            let report = ctx.extract(&bytes, Some(&name))?;
            serde_json::to_string_pretty(&report)?
        }
        Command::Analyze { text, file } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => anyhow::bail!("provide --text or --file"),
            };
            let features = ctx.analyze_text(&text);
            serde_json::to_string_pretty(&features)?
        }
        Command::Classify { image, filename } => {
            let bytes = std::fs::read(&image)
                .with_context(|| format!("reading {}", image.display()))?;
            let name = filename.unwrap_or_else(|| image.to_string_lossy().to_string());
            let report = ctx.classify_image(&bytes, Some(&name))?;
            serde_json::to_string_pretty(&report)?
        }
        Command::Status => serde_json::to_string_pretty(&ctx.status())?,
    };

    println!("{json}");
    Ok(())
}
