//! Column-band work split for parallel shading.
//!
//! The buffer is cut into vertical bands, one per worker. Each band shades
//! the primary rays whose pixel column falls inside it and hands back the
//! colors; nothing is written to the frame buffer until every band is done.

use crate::{Color, Ray, Tracer};
use std::ops::Range;

/// A contiguous range of buffer columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First column (inclusive)
    pub x_start: u32,
    /// Last column (exclusive)
    pub x_end: u32,
}

impl Band {
    pub fn new(x_start: u32, x_end: u32) -> Self {
        Self { x_start, x_end }
    }

    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }

    /// Indices into `rays` for the rays this band owns.
    ///
    /// `rays` must be sorted by column.
    pub fn ray_range(&self, rays: &[Ray]) -> Range<usize> {
        let start = rays.partition_point(|ray| ray.x < self.x_start);
        let end = rays.partition_point(|ray| ray.x < self.x_end);
        start..end
    }
}

/// Split `[0, width)` into `workers` bands.
///
/// The worker count is clamped to `[1, width]`. Every band is
/// `width / workers` columns wide except the last, which also takes the
/// remainder.
pub fn generate_bands(width: u32, workers: usize) -> Vec<Band> {
    if width == 0 {
        return Vec::new();
    }

    let count = workers.clamp(1, width as usize) as u32;
    let band_width = width / count;

    (0..count)
        .map(|i| {
            let x_start = i * band_width;
            let x_end = if i + 1 == count { width } else { x_start + band_width };
            Band::new(x_start, x_end)
        })
        .collect()
}

/// Result of shading one band.
#[derive(Debug, Clone)]
pub struct BandResult {
    pub band: Band,
    /// Indices of the shaded rays in the frame's ray list
    pub rays: Range<usize>,
    /// One color per ray, in ray order
    pub colors: Vec<Color>,
}

/// Shade every ray that belongs to `band`.
pub fn render_band(band: &Band, rays: &[Ray], tracer: &Tracer) -> BandResult {
    let range = band.ray_range(rays);
    let colors = rays[range.clone()].iter().map(|ray| tracer.shade(ray)).collect();

    BandResult {
        band: *band,
        rays: range,
        colors,
    }
}
