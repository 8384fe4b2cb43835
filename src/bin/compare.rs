use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use exportkit::{
    backend::ImageRsBackend,
    config::{DEFAULT_MAX_VALUE, MetricConfig, parse_max_value},
    logging,
};

#[derive(Parser, Debug)]
#[command(name = "compare", version, about = "Compare a test image against its ground truth")]
struct Cli {
    /// Path to the test image
    #[arg(value_name = "testImg")]
    test_img: PathBuf,

    /// Path to the ground truth image
    #[arg(value_name = "groundImg")]
    ground_img: PathBuf,

    /// Peak sample value used to scale RMSE and PSNR
    #[arg(long, value_name = "F", default_value_t = DEFAULT_MAX_VALUE, value_parser = parse_max_value)]
    max_value: f64,

    /// Also report peak signal to noise ratio
    #[arg(long)]
    psnr: bool,

    /// Print all metrics as one JSON object
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let metric = MetricConfig::new(cli.max_value)?;
    let backend = ImageRsBackend::new(metric);
    let similarity = exportkit::compare(&backend, &cli.test_img, &cli.ground_img)
        .with_context(|| {
            format!(
                "failed to compare {} with {}",
                cli.test_img.display(),
                cli.ground_img.display()
            )
        })?;

    if cli.json {
        println!("{}", similarity.to_json().dump());
    } else {
        println!("{}", similarity.summary_line(cli.psnr));
    }
    Ok(())
}
