use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use customer_radius::config::PipelineConfig;
use customer_radius::{run_files, CoordinateBounds};

/// Write the customers within a radius of a reference point, sorted by user_id
#[derive(Parser)]
#[command(name = "customer-radius")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Customer file, one JSON object per line
    #[arg(short, long, default_value = "customers.txt")]
    input: PathBuf,

    /// Output file (overwritten)
    #[arg(short, long, default_value = "customers_outfile.txt")]
    output: PathBuf,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search radius in kilometers [default: 100]
    #[arg(short = 'd', long)]
    max_distance_km: Option<f64>,

    /// Reference latitude in degrees [default: 53.339428]
    #[arg(long, allow_negative_numbers = true)]
    reference_latitude: Option<f64>,

    /// Reference longitude in degrees [default: -6.257664]
    #[arg(long, allow_negative_numbers = true)]
    reference_longitude: Option<f64>,

    /// Validate latitude in [-90, 90] and longitude in [-180, 180]
    #[arg(long)]
    geographic_bounds: bool,
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(km) = self.max_distance_km {
            config.max_distance_km = km;
        }
        if let Some(lat) = self.reference_latitude {
            config.reference.latitude = lat;
        }
        if let Some(lon) = self.reference_longitude {
            config.reference.longitude = lon;
        }
        if self.geographic_bounds {
            config.bounds = CoordinateBounds::geographic();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.pipeline_config().context("building configuration")?;

    let report = run_files(&cli.input, &cli.output, &config).with_context(|| {
        format!(
            "selecting customers from {} into {}",
            cli.input.display(),
            cli.output.display()
        )
    })?;

    if report.rejected() > 0 {
        log::warn!("{} of {} lines were skipped", report.rejected(), report.lines_read);
    }
    Ok(())
}
