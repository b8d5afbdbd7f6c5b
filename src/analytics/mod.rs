//! Statistics over the loaded gaze samples
//!
//! Provides descriptive statistics per condition, between-condition
//! t-tests and the text summary report.

mod report;
pub mod stats;
pub mod ttest;

pub use report::{AnalysisReport, Axis, AxisComparison, PointShare};
pub use stats::{AxisStats, ConditionSummary};
pub use ttest::{TTestKind, TTestResult, independent_t_test};
