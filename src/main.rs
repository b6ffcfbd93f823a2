use anyhow::{Context, Result};
use clap::Parser;
use laserpost::{encode_job, init_logging, load_job, PostConfig, WriterSink, BUILD_DATE, VERSION};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "laserpost")]
#[command(about = "Encode a recorded laser job as Grbl G-code", long_about = None)]
struct Cli {
    /// Post configuration (.toml or .json); defaults to the user config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Recorded job (JSON event list)
    #[arg(short, long)]
    job: PathBuf,
    /// Output file; G-code goes to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    info!(version = VERSION, build_date = BUILD_DATE, "laserpost starting");

    let config = load_config(cli.config.as_deref())?;
    let events = load_job(&cli.job)?;

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let output = encode_job(config, &events, WriterSink::new(BufWriter::new(writer)))?;
    output
        .sink
        .into_inner()
        .context("Failed to flush G-code output")?;

    for message in &output.warnings {
        eprintln!("warning: {}", message);
    }
    info!(lines = output.lines, warnings = output.warnings.len(), "job encoded");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<PostConfig> {
    if let Some(path) = path {
        return PostConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    match PostConfig::default_path() {
        Ok(path) if path.exists() => PostConfig::load_from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        Ok(_) => Ok(PostConfig::default()),
        Err(e) => {
            warn!("No user config directory ({}), using defaults", e);
            Ok(PostConfig::default())
        }
    }
}
