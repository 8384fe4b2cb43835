//! Full-reference similarity metrics between a test image and its ground truth.
//!
//! Every metric is computed per channel and then averaged over channels.
//! Identical inputs produce `rmse == 0.0` and infinite `sre` / `psnr`.

use std::fmt::Display;

use json::JsonValue;
use multiversion::multiversion;

use crate::{
    config::MetricConfig,
    error::{ExportError, Result},
    raster::Raster,
};

/// Per-channel accumulators over every pixel of a pair of images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelSums {
    /// Σ (test - ground)²
    pub squared_error: u64,
    /// Σ test
    pub test_total: u64,
}

/// Accumulates [ChannelSums] for interleaved samples.
#[multiversion(targets("x86_64+avx2", "x86_64+sse2", "aarch64+neon"))]
fn channel_sums_impl(test: &[u8], ground: &[u8], channels: usize) -> Vec<ChannelSums> {
    debug_assert_eq!(test.len(), ground.len());
    let mut sums = vec![ChannelSums::default(); channels];
    test.chunks_exact(channels)
        .zip(ground.chunks_exact(channels))
        .for_each(|(test_pixel, ground_pixel)| {
            for c in 0..channels {
                let diff = test_pixel[c] as i64 - ground_pixel[c] as i64;
                sums[c].squared_error += (diff * diff) as u64;
                sums[c].test_total += test_pixel[c] as u64;
            }
        });
    sums
}

/// Fails with [ExportError::ShapeMismatch] unless both rasters have the same layout.
pub fn ensure_same_shape(test: &Raster<u8>, ground: &Raster<u8>) -> Result {
    if test.shape() != ground.shape() {
        return Err(ExportError::ShapeMismatch {
            expected: test.dimensions(),
            found: ground.dimensions(),
        });
    }
    Ok(())
}

pub fn channel_sums(test: &Raster<u8>, ground: &Raster<u8>) -> Result<Vec<ChannelSums>> {
    ensure_same_shape(test, ground)?;
    Ok(channel_sums_impl(
        test.as_ref(),
        ground.as_ref(),
        test.channels() as usize,
    ))
}

fn pixel_count(raster: &Raster<u8>) -> f64 {
    raster.width() as f64 * raster.height() as f64
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (total, count) = values.fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    total / count as f64
}

/// Root mean squared error with samples scaled by `1 / max_value`.
pub fn rmse(test: &Raster<u8>, ground: &Raster<u8>, config: MetricConfig) -> Result<f64> {
    let sums = channel_sums(test, ground)?;
    Ok(rmse_from_sums(&sums, pixel_count(test), config))
}

fn rmse_from_sums(sums: &[ChannelSums], n: f64, config: MetricConfig) -> f64 {
    let max_sq = config.max_value * config.max_value;
    mean(
        sums.iter()
            .map(|c| (c.squared_error as f64 / max_sq / n).sqrt()),
    )
}

/// Signal to reconstruction error ratio, in decibels.
///
/// Per channel: `mean(test)² / (‖test - ground‖₂ / pixels)`.
pub fn sre(test: &Raster<u8>, ground: &Raster<u8>) -> Result<f64> {
    let sums = channel_sums(test, ground)?;
    Ok(sre_from_sums(&sums, pixel_count(test)))
}

fn sre_from_sums(sums: &[ChannelSums], n: f64) -> f64 {
    let ratio = mean(sums.iter().map(|c| {
        let signal = (c.test_total as f64 / n).powi(2);
        let error = (c.squared_error as f64).sqrt() / n;
        signal / error
    }));
    10.0 * ratio.log10()
}

/// Peak signal to noise ratio, in decibels.
pub fn psnr(test: &Raster<u8>, ground: &Raster<u8>, config: MetricConfig) -> Result<f64> {
    let sums = channel_sums(test, ground)?;
    Ok(psnr_from_sums(&sums, pixel_count(test), config))
}

fn psnr_from_sums(sums: &[ChannelSums], n: f64, config: MetricConfig) -> f64 {
    let mse = mean(sums.iter().map(|c| c.squared_error as f64 / n));
    20.0 * config.max_value.log10() - 10.0 * mse.log10()
}

/// Every metric the comparator reports, computed in one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    pub rmse: f64,
    pub sre: f64,
    pub psnr: f64,
}

impl Similarity {
    pub fn measure(test: &Raster<u8>, ground: &Raster<u8>, config: MetricConfig) -> Result<Self> {
        let sums = channel_sums(test, ground)?;
        let n = pixel_count(test);
        Ok(Similarity {
            rmse: rmse_from_sums(&sums, n, config),
            sre: sre_from_sums(&sums, n),
            psnr: psnr_from_sums(&sums, n, config),
        })
    }

    /// `Root Mean Squared: <rmse>, Signal to Reconstruction: <sre>`
    pub fn summary_line(&self, with_psnr: bool) -> String {
        let mut line = format!(
            "Root Mean Squared: {}, Signal to Reconstruction: {}",
            format_metric(self.rmse),
            format_metric(self.sre)
        );
        if with_psnr {
            line.push_str(&format!(", Peak Signal to Noise: {}", format_metric(self.psnr)));
        }
        line
    }

    /// Non-finite values have no JSON representation and become `null`.
    pub fn to_json(&self) -> JsonValue {
        let mut data = JsonValue::new_object();
        data["rmse"] = json_number(self.rmse);
        data["sre"] = json_number(self.sre);
        data["psnr"] = json_number(self.psnr);
        data
    }
}

impl Display for Similarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary_line(false))
    }
}

/// Shortest round-trip form with a fractional part (`0.0`, `inf`, `nan`)
/// and a signed, two-digit exponent (`2.4e-07`, `1e+16`).
pub fn format_metric(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let shortest = format!("{:?}", value);
    match shortest.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => format!(
                "{}e{}{:02}",
                mantissa,
                if exp < 0 { '-' } else { '+' },
                exp.unsigned_abs()
            ),
            Err(_) => shortest,
        },
        None => shortest,
    }
}

fn json_number(value: f64) -> JsonValue {
    if value.is_finite() {
        value.into()
    } else {
        JsonValue::Null
    }
}
