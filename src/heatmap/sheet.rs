//! Contact sheets: every heatmap of a condition tiled into one image

use image::{Rgb, RgbImage, imageops};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

const SHEET_COLUMNS: u32 = 4;
const SHEET_BACKGROUND: Rgb<u8> = Rgb([20, 20, 20]);

/// Tile the images at `image_paths` into a grid and save it to `output_path`.
///
/// Returns `None` when there is nothing to tile.
pub fn write_contact_sheet(image_paths: &[PathBuf], output_path: &Path) -> Result<Option<PathBuf>> {
    if image_paths.is_empty() {
        return Ok(None);
    }

    let mut images = Vec::with_capacity(image_paths.len());
    for path in image_paths {
        images.push(image::open(path)?.to_rgb8());
    }

    let cell_w = images.iter().map(|img| img.width()).max().unwrap_or(1);
    let cell_h = images.iter().map(|img| img.height()).max().unwrap_or(1);
    let cols = SHEET_COLUMNS.min(images.len() as u32);
    let rows = (images.len() as u32).div_ceil(cols);

    let mut sheet = RgbImage::from_pixel(cell_w * cols, cell_h * rows, SHEET_BACKGROUND);
    for (idx, img) in images.iter().enumerate() {
        let col = idx as u32 % cols;
        let row = idx as u32 / cols;
        imageops::replace(&mut sheet, img, (col * cell_w) as i64, (row * cell_h) as i64);
    }

    sheet.save(output_path)?;
    info!("Saved contact sheet {}", output_path.display());
    Ok(Some(output_path.to_path_buf()))
}
