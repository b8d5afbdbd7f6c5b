//! Shared constants for the gaze report generator

// Screen the gaze coordinates are normalized onto
pub const SCREEN_WIDTH: u32 = 1920;
pub const SCREEN_HEIGHT: u32 = 1080;

// Histogram resolution, chosen to keep the 16:9 ratio
pub const HEATMAP_BINS_X: u32 = 60;
pub const HEATMAP_BINS_Y: u32 = 34;

// Inclusive trial filter
pub const FIRST_TRIAL: i64 = 0;
pub const LAST_TRIAL: i64 = 4;

// Rendering
pub const HEATMAP_CELL_SIZE: u32 = 16; // pixels per histogram cell
pub const HEATMAP_UPPER_PERCENTILE: f64 = 95.0;
pub const HEATMAP_ALPHA: f32 = 0.7;

// Statistics
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

// Default file locations
pub const DEFAULT_CONFIG_FILE: &str = "config/gazemap.toml";
pub const DEFAULT_AI_ADVISOR_FILE: &str = "data/condition_aiadvisor_data_group_a_rows.csv";
pub const DEFAULT_NO_ADVISOR_FILE: &str = "data/condition_noadvisor_data_group_a_rows.csv";
pub const DEFAULT_BACKDROP_FILE: &str = "data/backdrop.png";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const REPORT_FILE: &str = "analysis_summary.txt";

// Required CSV columns
pub const COL_PARTICIPANT: &str = "participant_id";
pub const COL_TRIAL: &str = "trial_number";
pub const COL_X: &str = "x";
pub const COL_Y: &str = "y";
