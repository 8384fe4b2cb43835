use multiversion::multiversion;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    config::KernelSize,
    raster::{Raster, Shape},
};

const PAR_MIN_WINDOW_SAMPLES: usize = 1 << 20;

/// Median filter over a square window with replicated borders.
///
/// Each channel is filtered on its own. Both strategies produce identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedianFilter {
    Seq,
    Par,
}

impl MedianFilter {
    /// Pick by the number of window samples one pass visits.
    ///
    /// Below about a million samples the thread pool costs more than it
    /// saves; `benches/median_filter.rs` compares `auto` against both strategies.
    pub fn auto(shape_hint: Shape, kernel: KernelSize) -> Self {
        let (width, height, channels) = shape_hint;
        let side = kernel.get() as usize;
        let work = width * height * channels * side * side;

        if side == 1 || height < 2 || work < PAR_MIN_WINDOW_SAMPLES {
            return MedianFilter::Seq;
        }
        MedianFilter::Par
    }

    pub fn apply(self, input: &Raster<u8>, kernel: KernelSize) -> Raster<u8> {
        let mut output = input.clone();
        if kernel.get() == 1 || output.as_ref().is_empty() {
            return output;
        }
        debug!(strategy = ?self, kernel = kernel.get(), shape = ?input.shape(), "median filter");

        let window = Window::new(input.shape(), kernel.radius());
        match self {
            MedianFilter::Seq => {
                let mut scratch = window.scratch();
                output
                    .as_mut()
                    .chunks_exact_mut(window.stride)
                    .enumerate()
                    .for_each(|(y, out_row)| {
                        median_row(input.as_ref(), out_row, y, &window, &mut scratch)
                    });
            }
            MedianFilter::Par => {
                output
                    .as_mut()
                    .par_chunks_exact_mut(window.stride)
                    .enumerate()
                    .for_each_init(
                        || window.scratch(),
                        |scratch, (y, out_row)| {
                            median_row(input.as_ref(), out_row, y, &window, scratch)
                        },
                    );
            }
        }
        output
    }
}

/// Geometry shared by every row of one filter pass.
struct Window {
    height: usize,
    channels: usize,
    stride: usize,
    radius: usize,
    /// Clamped source column for every padded column `x + radius`.
    columns: Vec<usize>,
}

impl Window {
    fn new(shape: Shape, radius: usize) -> Self {
        let (width, height, channels) = shape;
        let columns = (0..width + 2 * radius)
            .map(|padded| padded.saturating_sub(radius).min(width - 1))
            .collect();
        Window {
            height,
            channels,
            stride: width * channels,
            radius,
            columns,
        }
    }

    fn side(&self) -> usize {
        2 * self.radius + 1
    }

    fn scratch(&self) -> Vec<u8> {
        Vec::with_capacity(self.side() * self.side())
    }

    #[inline]
    fn source_row(&self, y: usize, dy: usize) -> usize {
        (y + dy).saturating_sub(self.radius).min(self.height - 1)
    }
}

#[multiversion(targets("x86_64+avx2", "x86_64+sse2", "aarch64+neon"))]
fn median_row(input: &[u8], out_row: &mut [u8], y: usize, window: &Window, scratch: &mut Vec<u8>) {
    let side = window.side();
    let middle = side * side / 2;
    let channels = window.channels;

    out_row
        .chunks_exact_mut(channels)
        .enumerate()
        .for_each(|(x, out_pixel)| {
            for c in 0..channels {
                scratch.clear();
                for dy in 0..side {
                    let row_start = window.source_row(y, dy) * window.stride;
                    for &column in &window.columns[x..x + side] {
                        scratch.push(input[row_start + column * channels + c]);
                    }
                }
                let (_, median, _) = scratch.select_nth_unstable(middle);
                out_pixel[c] = *median;
            }
        });
}
