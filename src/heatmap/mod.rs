//! Heatmap generation: normalization, binning, colouring and PNG output

pub mod colormap;
pub mod grid;
mod render;
mod sheet;

pub use grid::{AxisRange, HeatmapGrid, bin_group, normalize_axis};
pub use render::HeatmapRenderer;
pub use sheet::write_contact_sheet;
