use std::path::Path;

use tracing::info;

use crate::{backend::ImageBackend, config::KernelSize, metrics::Similarity};

pub mod backend;
pub mod config;
pub mod csv_append;
pub mod error;
pub mod logging;
pub mod median;
pub mod metrics;
pub mod raster;

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use super::backend::{ImageBackend, ImageRsBackend};
    pub use super::config::{KernelSize, MetricConfig};
    pub use super::csv_append::{AppendReport, LabelPair, append};
    pub use super::error::{ExportError, Result};
    pub use super::metrics::Similarity;
    pub use super::raster::Raster;
}

/// Decode both images and measure how close `test` is to `ground`.
pub fn compare<B: ImageBackend>(
    backend: &B,
    test: &Path,
    ground: &Path,
) -> error::Result<Similarity> {
    let ground_image = backend.decode(ground)?;
    let test_image = backend.decode(test)?;
    let similarity = backend.similarity(&test_image, &ground_image)?;
    info!(
        rmse = similarity.rmse,
        sre = similarity.sre,
        psnr = similarity.psnr,
        "compared images"
    );
    Ok(similarity)
}

/// Median-filter `source` and write the result to `output`.
///
/// The output format is checked before anything is decoded.
pub fn denoise<B: ImageBackend>(
    backend: &B,
    source: &Path,
    kernel: KernelSize,
    output: &Path,
) -> error::Result {
    backend.output_format(output)?;
    let image = backend.decode(source)?;
    let filtered = backend.median_blur(&image, kernel)?;
    backend.encode(output, &filtered)?;
    info!(
        source = %source.display(),
        output = %output.display(),
        kernel = kernel.get(),
        "denoised image"
    );
    Ok(())
}
