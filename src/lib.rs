//! gazemap - Eye tracking heatmaps for the AI Advisor study
//!
//! Loads gaze samples for two experimental conditions, renders one heatmap per
//! participant and trial, and writes a statistical comparison of the conditions.

pub mod analytics;
pub mod config;
pub mod constants;
pub mod error;
pub mod gaze;
pub mod heatmap;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use analytics::{AnalysisReport, ConditionSummary, TTestKind, TTestResult};
pub use config::AnalysisConfig;
pub use error::{Error, InputRole, Result};
pub use gaze::{Condition, GazeSample, GroupKey, ParticipantId, SampleGroup};
pub use heatmap::{HeatmapGrid, HeatmapRenderer};
pub use pipeline::{HeatmapOutput, RunSummary, run};
