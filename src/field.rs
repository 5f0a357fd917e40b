// RustPixel
// copyright zipxing@hotmail.com 2022～2025
//
// Windowed distance field approximation
//
// Each output pixel sweeps a (2F)x(2F) window over the mask, offsets in
// [-F, F). Two running maxima are kept over the window:
//   d1 = max(p * w)        proximity to ink
//   d2 = max((1 - p) * w)  proximity to background
// and the stored value is floor((d1 + 1 - d2) / 2 * 255), about 0.5 on
// glyph edges. This is not a true Euclidean SDF, quality is bounded by
// the window radius.

use crate::raster::MaskImage;
use image::{ImageBuffer, Rgba, RgbaImage};
use log::info;
use rayon::prelude::*;
use std::time::Instant;

/// Green channel carries the distance value
pub type FieldImage = RgbaImage;

/// Channel of FieldImage holding the distance
pub const FIELD_CHANNEL: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelTap {
    pub dx: i64,
    pub dy: i64,
    pub weight: f64,
}

/// Precomputed falloff weights of the sampling window.
///
/// `w = 1 - sqrt(x² + y²) / (F * sqrt(2))`, not clamped: the far corner
/// lands on 0 up to rounding.
#[derive(Debug, Clone)]
pub struct FilterKernel {
    taps: Vec<KernelTap>,
}

impl FilterKernel {
    pub fn new(filter_size: u32) -> Self {
        let f = filter_size as i64;
        let radius = filter_size as f64 * 2f64.sqrt();
        let mut taps = Vec::with_capacity((4 * f * f) as usize);
        for dx in -f..f {
            for dy in -f..f {
                let dist = ((dx * dx + dy * dy) as f64).sqrt();
                taps.push(KernelTap {
                    dx,
                    dy,
                    weight: 1.0 - dist / radius,
                });
            }
        }
        Self { taps }
    }

    pub fn taps(&self) -> &[KernelTap] {
        &self.taps
    }
}

/// Ink intensity in [0, 1].
///
/// Row and column 0 count as outside the image, same as anything past
/// the far edges. The lower bound is strict (`> 0`) and must stay so,
/// output has to match atlases built before.
#[inline]
fn sample(mask: &MaskImage, x: i64, y: i64) -> f64 {
    let (w, h) = (mask.width() as i64, mask.height() as i64);
    if x > 0 && x < w && y > 0 && y < h {
        mask.get_pixel(x as u32, y as u32)[0] as f64 / 255.0
    } else {
        0.0
    }
}

/// Distance value of a single pixel
pub fn field_value(mask: &MaskImage, kernel: &FilterKernel, x: u32, y: u32) -> u8 {
    let mut d1 = 0.0f64; // outer
    let mut d2 = 0.0f64; // inner

    for tap in kernel.taps() {
        let p = sample(mask, x as i64 + tap.dx, y as i64 + tap.dy);
        d1 = d1.max(p * tap.weight);
        d2 = d2.max((1.0 - p) * tap.weight);
    }

    let d = (d1 + (1.0 - d2)) / 2.0;
    (d * 255.0) as u8
}

/// Build the field image for a whole mask. Rows run in parallel, each
/// pixel only reads the mask.
pub fn distance_field(mask: &MaskImage, filter_size: u32) -> FieldImage {
    let start = Instant::now();
    let kernel = FilterKernel::new(filter_size);
    let (width, height) = mask.dimensions();
    let mut field: FieldImage = ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, 255]));

    let row_len = width as usize * 4;
    if row_len > 0 {
        field
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                for x in 0..width {
                    row[x as usize * 4 + FIELD_CHANNEL] = field_value(mask, &kernel, x, y as u32);
                }
            });
    }

    info!(
        "Distance field {}x{} (filter {}) in {:.1?}",
        width,
        height,
        filter_size,
        start.elapsed()
    );
    field
}
