//! The image capability the comparator and denoiser are written against.
//!
//! Everything outside this module sees images only as [Raster]s, so the
//! codec and numerics behind [ImageBackend] can be replaced in one place.

use std::{io::Cursor, path::Path};

use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use crate::{
    config::{KernelSize, MetricConfig},
    error::{ExportError, Result},
    median::MedianFilter,
    metrics::{self, Similarity},
    raster::Raster,
};

pub trait ImageBackend {
    /// Read and decode an image as 3-channel 8-bit samples.
    fn decode(&self, path: &Path) -> Result<Raster<u8>>;

    /// Fails with [ExportError::UnsupportedFormat] if `path` cannot be encoded to.
    fn output_format(&self, path: &Path) -> Result<ImageFormat>;

    /// Encode `image` to `path` in the format implied by its extension.
    fn encode(&self, path: &Path, image: &Raster<u8>) -> Result;

    fn rmse(&self, test: &Raster<u8>, ground: &Raster<u8>) -> Result<f64>;
    fn sre(&self, test: &Raster<u8>, ground: &Raster<u8>) -> Result<f64>;
    fn psnr(&self, test: &Raster<u8>, ground: &Raster<u8>) -> Result<f64>;

    fn median_blur(&self, image: &Raster<u8>, kernel: KernelSize) -> Result<Raster<u8>>;

    /// All metrics at once; backends may override to share work between them.
    fn similarity(&self, test: &Raster<u8>, ground: &Raster<u8>) -> Result<Similarity> {
        Ok(Similarity {
            rmse: self.rmse(test, ground)?,
            sre: self.sre(test, ground)?,
            psnr: self.psnr(test, ground)?,
        })
    }
}

/// Codecs from the `image` crate, metrics and median filter from this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsBackend {
    pub metric: MetricConfig,
}

impl ImageRsBackend {
    pub fn new(metric: MetricConfig) -> Self {
        ImageRsBackend { metric }
    }
}

impl ImageBackend for ImageRsBackend {
    fn decode(&self, path: &Path) -> Result<Raster<u8>> {
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "decoded image"
        );
        Ok(image.into())
    }

    fn output_format(&self, path: &Path) -> Result<ImageFormat> {
        match ImageFormat::from_path(path) {
            Ok(format) if format.writing_enabled() => Ok(format),
            _ => Err(ExportError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn encode(&self, path: &Path, image: &Raster<u8>) -> Result {
        let format = self.output_format(path)?;
        let encoded = encode_to_memory(image, format)?;
        std::fs::write(path, &encoded)?;
        debug!(path = %path.display(), ?format, bytes = encoded.len(), "encoded image");
        Ok(())
    }

    fn rmse(&self, test: &Raster<u8>, ground: &Raster<u8>) -> Result<f64> {
        metrics::rmse(test, ground, self.metric)
    }

    fn sre(&self, test: &Raster<u8>, ground: &Raster<u8>) -> Result<f64> {
        metrics::sre(test, ground)
    }

    fn psnr(&self, test: &Raster<u8>, ground: &Raster<u8>) -> Result<f64> {
        metrics::psnr(test, ground, self.metric)
    }

    fn median_blur(&self, image: &Raster<u8>, kernel: KernelSize) -> Result<Raster<u8>> {
        Ok(MedianFilter::auto(image.shape(), kernel).apply(image, kernel))
    }

    fn similarity(&self, test: &Raster<u8>, ground: &Raster<u8>) -> Result<Similarity> {
        Similarity::measure(test, ground, self.metric)
    }
}

/// Convert to a pixel type `format` accepts and encode in memory, so a
/// rejected image never leaves a file behind.
fn encode_to_memory(image: &Raster<u8>, format: ImageFormat) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(image.clone().into_rgb_image());
    let converted = match format {
        ImageFormat::OpenExr | ImageFormat::Hdr => DynamicImage::ImageRgb32F(rgb.to_rgb32f()),
        ImageFormat::Farbfeld => DynamicImage::ImageRgba16(rgb.to_rgba16()),
        _ => rgb,
    };
    let mut buffer = Cursor::new(Vec::new());
    converted
        .write_to(&mut buffer, format)
        .map_err(ExportError::ImageEncode)?;
    Ok(buffer.into_inner())
}
