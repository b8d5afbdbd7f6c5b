//! Heatmap rendering to PNG
//!
//! Layout of every image:
//! - black canvas with a two-line white title
//! - the grid, one `cell_size` square per histogram cell, row 0 at the top
//! - tick labels in screen pixels on both axes
//! - a colour bar on the right labelled "Gaze Frequency"
//!
//! Empty cells are masked so the canvas (or the backdrop) shows through.
//! Colours run from 0 to the configured percentile of the grid's counts;
//! anything above saturates.

use ab_glyph::{FontRef, PxScale};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::colormap::{blend_hot, scale_position};
use super::grid::HeatmapGrid;
use crate::config::{BinCounts, RenderSettings, ScreenSize};
use crate::error::Result;
use crate::gaze::GroupKey;

const FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

const MARGIN_LEFT: u32 = 100;
const MARGIN_RIGHT: u32 = 150;
const MARGIN_TOP: u32 = 90;
const MARGIN_BOTTOM: u32 = 80;
const COLORBAR_GAP: u32 = 30;
const COLORBAR_WIDTH: u32 = 24;
const TICK_LENGTH: f32 = 6.0;
const TARGET_TICKS: u32 = 6;

const TITLE_SCALE: f32 = 26.0;
const LABEL_SCALE: f32 = 20.0;
const TICK_SCALE: f32 = 14.0;

const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
const FOREGROUND: Rgb<u8> = Rgb([255, 255, 255]);

pub struct HeatmapRenderer {
    font: FontRef<'static>,
    screen: ScreenSize,
    cell_size: u32,
    upper_percentile: f64,
    alpha: f32,
    backdrop: Option<RgbImage>,
}

impl HeatmapRenderer {
    pub fn new(settings: &RenderSettings, screen: ScreenSize) -> Result<Self> {
        let font = FontRef::try_from_slice(FONT_DATA)?;
        Ok(Self {
            font,
            screen,
            cell_size: settings.cell_size,
            upper_percentile: settings.upper_percentile,
            alpha: settings.alpha,
            backdrop: None,
        })
    }

    /// Draw `backdrop` under every heatmap, stretched to the grid area
    pub fn with_backdrop(mut self, backdrop: &DynamicImage, bins: BinCounts) -> Self {
        let fitted = imageops::resize(
            &backdrop.to_rgb8(),
            bins.x * self.cell_size,
            bins.y * self.cell_size,
            FilterType::Triangle,
        );
        self.backdrop = Some(fitted);
        self
    }

    /// Pixel size of a rendered heatmap, `None` if it does not fit in `u32`
    pub fn image_size(bins: BinCounts, cell_size: u32) -> Option<(u32, u32)> {
        let width = bins
            .x
            .checked_mul(cell_size)?
            .checked_add(MARGIN_LEFT + MARGIN_RIGHT)?;
        let height = bins
            .y
            .checked_mul(cell_size)?
            .checked_add(MARGIN_TOP + MARGIN_BOTTOM)?;
        Some((width, height))
    }

    /// Render and write `<file stem>.png` into `output_dir`
    pub fn save(&self, grid: &HeatmapGrid, key: &GroupKey, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(format!("{}.png", key.file_stem()));
        let img = self.render(grid, key);
        img.save(&path)?;
        info!("Saved heatmap {}", path.display());
        Ok(path)
    }

    pub fn render(&self, grid: &HeatmapGrid, key: &GroupKey) -> RgbImage {
        let plot_w = grid.cols() * self.cell_size;
        let plot_h = grid.rows() * self.cell_size;
        let width = MARGIN_LEFT + plot_w + MARGIN_RIGHT;
        let height = MARGIN_TOP + plot_h + MARGIN_BOTTOM;
        let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

        if let Some(backdrop) = &self.backdrop {
            if backdrop.width() == plot_w && backdrop.height() == plot_h {
                imageops::overlay(&mut img, backdrop, MARGIN_LEFT as i64, MARGIN_TOP as i64);
            } else {
                warn!(
                    "Backdrop is {}x{} but the plot is {}x{}, drawing without it",
                    backdrop.width(),
                    backdrop.height(),
                    plot_w,
                    plot_h
                );
            }
        }

        let ceiling = grid.color_ceiling(self.upper_percentile);
        self.draw_cells(&mut img, grid, ceiling);
        self.draw_axes(&mut img, grid);
        self.draw_title(&mut img, key, plot_w);
        self.draw_colorbar(&mut img, plot_w, plot_h, ceiling);
        img
    }

    fn draw_cells(&self, img: &mut RgbImage, grid: &HeatmapGrid, ceiling: f64) {
        for cy in 0..grid.rows() {
            for cx in 0..grid.cols() {
                let count = grid.get(cx, cy);
                if count == 0 {
                    continue;
                }
                let t = scale_position(count as f64, ceiling);
                let x0 = MARGIN_LEFT + cx * self.cell_size;
                let y0 = MARGIN_TOP + cy * self.cell_size;
                for y in y0..y0 + self.cell_size {
                    for x in x0..x0 + self.cell_size {
                        let under = *img.get_pixel(x, y);
                        img.put_pixel(x, y, blend_hot(t, self.alpha, under));
                    }
                }
            }
        }
    }

    fn draw_axes(&self, img: &mut RgbImage, grid: &HeatmapGrid) {
        let plot_w = grid.cols() * self.cell_size;
        let plot_h = grid.rows() * self.cell_size;
        let left = MARGIN_LEFT as f32;
        let top = MARGIN_TOP as f32;
        let bottom = (MARGIN_TOP + plot_h) as f32;

        draw_hollow_rect_mut(
            img,
            Rect::at(MARGIN_LEFT as i32 - 1, MARGIN_TOP as i32 - 1).of_size(plot_w + 2, plot_h + 2),
            FOREGROUND,
        );

        let tick_scale = PxScale::from(TICK_SCALE);
        let x_step = (grid.cols() / TARGET_TICKS).max(1);
        for i in (0..=grid.cols()).step_by(x_step as usize) {
            let px = left + (i * self.cell_size) as f32;
            draw_line_segment_mut(img, (px, bottom), (px, bottom + TICK_LENGTH), FOREGROUND);
            let value = tick_value(i, grid.cols(), self.screen.width);
            let (tw, _) = text_size(tick_scale, &self.font, &value);
            draw_text_mut(
                img,
                FOREGROUND,
                px as i32 - tw as i32 / 2,
                (bottom + TICK_LENGTH + 4.0) as i32,
                tick_scale,
                &self.font,
                &value,
            );
        }

        let y_step = (grid.rows() / TARGET_TICKS).max(1);
        for i in (0..=grid.rows()).step_by(y_step as usize) {
            let py = top + (i * self.cell_size) as f32;
            draw_line_segment_mut(img, (left - TICK_LENGTH, py), (left, py), FOREGROUND);
            let value = tick_value(i, grid.rows(), self.screen.height);
            let (tw, th) = text_size(tick_scale, &self.font, &value);
            draw_text_mut(
                img,
                FOREGROUND,
                (left - TICK_LENGTH - 4.0) as i32 - tw as i32,
                py as i32 - th as i32 / 2,
                tick_scale,
                &self.font,
                &value,
            );
        }

        let label_scale = PxScale::from(LABEL_SCALE);
        let x_label = "X Coordinate";
        let (lw, _) = text_size(label_scale, &self.font, x_label);
        draw_text_mut(
            img,
            FOREGROUND,
            (MARGIN_LEFT + plot_w / 2) as i32 - lw as i32 / 2,
            (bottom + TICK_LENGTH + 30.0) as i32,
            label_scale,
            &self.font,
            x_label,
        );
        self.draw_vertical_text(
            img,
            "Y Coordinate",
            label_scale,
            20,
            (MARGIN_TOP + plot_h / 2) as i64,
        );
    }

    fn draw_title(&self, img: &mut RgbImage, key: &GroupKey, plot_w: u32) {
        let scale = PxScale::from(TITLE_SCALE);
        let lines = [
            format!("Eye Tracking Heatmap - {}", key.condition),
            format!("Participant {}, Trial {}", key.participant_id, key.trial_number),
        ];
        let center = (MARGIN_LEFT + plot_w / 2) as i32;
        let mut y = 14;
        for line in &lines {
            let (tw, th) = text_size(scale, &self.font, line);
            draw_text_mut(img, FOREGROUND, center - tw as i32 / 2, y, scale, &self.font, line);
            y += th as i32 + 8;
        }
    }

    fn draw_colorbar(&self, img: &mut RgbImage, plot_w: u32, plot_h: u32, ceiling: f64) {
        let bar_x = MARGIN_LEFT + plot_w + COLORBAR_GAP;
        let span = plot_h.saturating_sub(1).max(1) as f32;
        for row in 0..plot_h {
            let t = 1.0 - row as f32 / span;
            let color = blend_hot(t, self.alpha, BACKGROUND);
            draw_filled_rect_mut(
                img,
                Rect::at(bar_x as i32, (MARGIN_TOP + row) as i32).of_size(COLORBAR_WIDTH, 1),
                color,
            );
        }
        draw_hollow_rect_mut(
            img,
            Rect::at(bar_x as i32, MARGIN_TOP as i32).of_size(COLORBAR_WIDTH, plot_h),
            FOREGROUND,
        );

        let tick_scale = PxScale::from(TICK_SCALE);
        let labels = [
            (format_count(ceiling), MARGIN_TOP),
            (format_count(ceiling / 2.0), MARGIN_TOP + plot_h / 2),
            (format_count(0.0), MARGIN_TOP + plot_h),
        ];
        let text_x = (bar_x + COLORBAR_WIDTH + 6) as i32;
        for (text, y) in &labels {
            let (_, th) = text_size(tick_scale, &self.font, text);
            draw_text_mut(
                img,
                FOREGROUND,
                text_x,
                *y as i32 - th as i32 / 2,
                tick_scale,
                &self.font,
                text,
            );
        }

        self.draw_vertical_text(
            img,
            "Gaze Frequency",
            PxScale::from(LABEL_SCALE),
            (bar_x + COLORBAR_WIDTH + 50) as i64,
            (MARGIN_TOP + plot_h / 2) as i64,
        );
    }

    /// Draw `text` rotated to read bottom-to-top, centred on `center_y`
    fn draw_vertical_text(&self, img: &mut RgbImage, text: &str, scale: PxScale, x: i64, center_y: i64) {
        let (tw, th) = text_size(scale, &self.font, text);
        let mut label = RgbImage::from_pixel(tw + 4, th + 8, BACKGROUND);
        draw_text_mut(&mut label, FOREGROUND, 2, 2, scale, &self.font, text);
        let rotated = imageops::rotate270(&label);
        imageops::overlay(img, &rotated, x, center_y - rotated.height() as i64 / 2);
    }
}

/// Screen coordinate at bin edge `i` of `bins`
fn tick_value(i: u32, bins: u32, extent: u32) -> String {
    let value = i as f64 * extent as f64 / bins as f64;
    format!("{:.0}", value)
}

fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
