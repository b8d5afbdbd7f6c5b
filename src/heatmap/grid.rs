//! Per-group normalization and 2-D histogram binning

use tracing::{debug, warn};

use crate::config::{BinCounts, ScreenSize};
use crate::error::{Error, Result};
use crate::gaze::SampleGroup;

/// Observed range of one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn of(values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let (min, max) = values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(Self { min, max })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// All values identical, min-max scaling is undefined
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }
}

/// Min-max rescale `values` onto `[0, extent]`.
///
/// A degenerate axis maps every value to 0.
pub fn normalize_axis(values: &[f64], extent: f64) -> Result<Vec<f64>> {
    let Some(range) = AxisRange::of(values) else {
        return Ok(Vec::new());
    };
    if range.is_degenerate() {
        return Ok(vec![0.0; values.len()]);
    }

    let span = range.span();
    let scaled: Vec<f64> = values
        .iter()
        .map(|v| (v - range.min) / span * extent)
        .collect();
    if scaled.iter().any(|v| !v.is_finite()) {
        return Err(Error::Computation(format!(
            "normalizing range {} to {} produced non-finite values",
            range.min, range.max
        )));
    }
    Ok(scaled)
}

/// Counts of gaze points per screen cell, row-major with row 0 at the top
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapGrid {
    cols: u32,
    rows: u32,
    counts: Vec<u32>,
}

impl HeatmapGrid {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            counts: vec![0; (cols * rows) as usize],
        }
    }

    /// Bin points jointly over `[0, width] x [0, height]`.
    ///
    /// Bins are half-open except the last one on each axis, which also takes
    /// the upper edge. Points outside the range are dropped.
    pub fn from_points(xs: &[f64], ys: &[f64], bins: BinCounts, screen: ScreenSize) -> Self {
        let mut grid = Self::new(bins.x, bins.y);
        let width = screen.width as f64;
        let height = screen.height as f64;
        for (&x, &y) in xs.iter().zip(ys) {
            let (Some(cx), Some(cy)) = (bin_index(x, width, bins.x), bin_index(y, height, bins.y))
            else {
                continue;
            };
            grid.increment(cx, cy);
        }
        grid
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    fn index(&self, cx: u32, cy: u32) -> usize {
        (cy * self.cols + cx) as usize
    }

    pub fn get(&self, cx: u32, cy: u32) -> u32 {
        self.counts[self.index(cx, cy)]
    }

    fn increment(&mut self, cx: u32, cy: u32) {
        let idx = self.index(cx, cy);
        self.counts[idx] += 1;
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Percentile of all cell counts, zeros included, linear interpolation
    pub fn percentile(&self, pct: f64) -> f64 {
        let mut values: Vec<f64> = self.counts.iter().map(|&c| c as f64).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        percentile_sorted(&values, pct)
    }

    /// Upper end of the colour scale. Counts above it saturate; when it is 0
    /// every non-empty cell does.
    pub fn color_ceiling(&self, pct: f64) -> f64 {
        self.percentile(pct)
    }

    /// `x_bin,y_bin,count` lines for every cell
    pub fn to_csv(&self) -> String {
        let mut out = String::from("x_bin,y_bin,count\n");
        for cy in 0..self.rows {
            for cx in 0..self.cols {
                out.push_str(&format!("{},{},{}\n", cx, cy, self.get(cx, cy)));
            }
        }
        out
    }
}

fn bin_index(value: f64, extent: f64, bins: u32) -> Option<u32> {
    if !(0.0..=extent).contains(&value) {
        return None;
    }
    // Evenly spaced edges k * step; a value on an interior edge opens bin k
    let step = extent / bins as f64;
    let mut idx = ((value / extent * bins as f64).floor() as u32).min(bins - 1);
    while idx + 1 < bins && value >= (idx + 1) as f64 * step {
        idx += 1;
    }
    while idx > 0 && value < idx as f64 * step {
        idx -= 1;
    }
    Some(idx)
}

/// Linear-interpolated percentile of already sorted values
pub fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// Normalize one group onto the screen and bin it
pub fn bin_group(group: &SampleGroup, bins: BinCounts, screen: ScreenSize) -> Result<HeatmapGrid> {
    let (Some(x_range), Some(y_range)) = (AxisRange::of(&group.xs), AxisRange::of(&group.ys))
    else {
        return Ok(HeatmapGrid::new(bins.x, bins.y));
    };
    debug!(
        "Original ranges - {}: X {:.2} to {:.2}, Y {:.2} to {:.2}",
        group.key, x_range.min, x_range.max, y_range.min, y_range.max
    );
    if x_range.is_degenerate() {
        warn!("{}: all x values equal {:.2}, mapping to 0", group.key, x_range.min);
    }
    if y_range.is_degenerate() {
        warn!("{}: all y values equal {:.2}, mapping to 0", group.key, y_range.min);
    }

    let xs = normalize_axis(&group.xs, screen.width as f64)?;
    let ys = normalize_axis(&group.ys, screen.height as f64)?;
    if let (Some(nx), Some(ny)) = (AxisRange::of(&xs), AxisRange::of(&ys)) {
        debug!(
            "Normalized ranges - {}: X {:.2} to {:.2}, Y {:.2} to {:.2}",
            group.key, nx.min, nx.max, ny.min, ny.max
        );
    }

    Ok(HeatmapGrid::from_points(&xs, &ys, bins, screen))
}
