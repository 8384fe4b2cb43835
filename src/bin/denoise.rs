use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use exportkit::{backend::ImageRsBackend, config::KernelSize, logging};

#[derive(Parser, Debug)]
#[command(name = "denoise", version, about = "Median-filter an image to remove impulse noise")]
struct Cli {
    /// Path to the noisy image
    #[arg(value_name = "srcImg")]
    src_img: PathBuf,

    /// Size of the reconstruction filter (positive odd integer)
    #[arg(value_name = "filterSize", allow_hyphen_values = true)]
    filter_size: KernelSize,

    /// Path to export the denoised image to
    #[arg(value_name = "outImg")]
    out_img: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    exportkit::denoise(
        &ImageRsBackend::default(),
        &cli.src_img,
        cli.filter_size,
        &cli.out_img,
    )
    .with_context(|| {
        format!(
            "failed to denoise {} into {}",
            cli.src_img.display(),
            cli.out_img.display()
        )
    })?;
    Ok(())
}
