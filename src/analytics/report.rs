//! Plain-text analysis summary comparing the two conditions

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;
use tracing::info;

use super::stats::{AxisStats, ConditionSummary};
use super::ttest::{TTestKind, TTestResult, independent_t_test};
use crate::config::StatsSettings;
use crate::error::Result;
use crate::gaze::{Condition, GazeSample};

const NOT_AVAILABLE: &str = "n/a";

/// Which coordinate a comparison refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
        }
    }
}

/// Between-condition test for one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisComparison {
    pub axis: Axis,
    pub result: Option<TTestResult>,
}

/// Share of all gaze points contributed by one condition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointShare {
    pub condition: Condition,
    pub points: usize,
    pub percent: f64,
}

/// Everything written to the summary file
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub summaries: Vec<ConditionSummary>,
    pub comparisons: Vec<AxisComparison>,
    pub distribution: Vec<PointShare>,
    pub significance: f64,
}

impl AnalysisReport {
    pub fn from_samples(samples: &[GazeSample], settings: &StatsSettings) -> Self {
        let summaries: Vec<ConditionSummary> = Condition::ALL
            .iter()
            .map(|&c| ConditionSummary::from_samples(c, samples))
            .collect();

        let kind = TTestKind::from_equal_variance(settings.equal_variance);
        let (first, second) = (&summaries[0], &summaries[1]);
        let comparisons = Axis::ALL
            .iter()
            .map(|&axis| {
                let result = match axis {
                    Axis::X => independent_t_test(&first.xs, &second.xs, kind),
                    Axis::Y => independent_t_test(&first.ys, &second.ys, kind),
                };
                AxisComparison { axis, result }
            })
            .collect();

        let total: usize = summaries.iter().map(|s| s.sample_count).sum();
        let distribution = summaries
            .iter()
            .map(|s| PointShare {
                condition: s.condition,
                points: s.sample_count,
                percent: if total == 0 {
                    0.0
                } else {
                    s.sample_count as f64 / total as f64 * 100.0
                },
            })
            .collect();

        Self {
            summaries,
            comparisons,
            distribution,
            significance: settings.significance,
        }
    }

    pub fn total_points(&self) -> usize {
        self.summaries.iter().map(|s| s.sample_count).sum()
    }

    /// Render the report text
    pub fn format(&self) -> String {
        let mut out = String::new();
        out.push_str("Eye Tracking Analysis Summary\n");
        out.push_str("============================\n\n");

        for summary in &self.summaries {
            format_condition(&mut out, summary);
        }

        let labels: Vec<&str> = self.summaries.iter().map(|s| s.condition.label()).collect();
        let _ = writeln!(out, "\n\nComparative Analysis between {}", labels.join(" and "));
        out.push_str("================================================\n\n");

        for comparison in &self.comparisons {
            let _ = writeln!(out, "{}-coordinate comparison:", comparison.axis.label());
            match &comparison.result {
                Some(result) => {
                    let _ = writeln!(out, "  T-statistic: {:.4}", result.t_statistic);
                    let _ = writeln!(out, "  P-value: {:.4}", result.p_value);
                }
                None => {
                    let _ = writeln!(out, "  T-statistic: {}", NOT_AVAILABLE);
                    let _ = writeln!(out, "  P-value: {}", NOT_AVAILABLE);
                }
            }
            let significant = comparison
                .result
                .is_some_and(|r| r.is_significant(self.significance));
            let _ = writeln!(
                out,
                "  Significant difference: {}\n",
                if significant { "Yes" } else { "No" }
            );
        }

        out.push_str("Gaze Point Distribution:\n");
        for share in &self.distribution {
            let _ = writeln!(
                out,
                "  {}: {} points ({:.1}%)",
                share.condition, share.points, share.percent
            );
        }

        out
    }

    /// Write the report, replacing any previous one at `path`
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.format())?;
        info!("Detailed statistical analysis saved to: {}", path.display());
        Ok(())
    }
}

fn format_condition(out: &mut String, summary: &ConditionSummary) {
    let label = summary.condition.label();
    let _ = writeln!(out, "\n{} Analysis", label);
    let _ = writeln!(out, "{}", "=".repeat(label.len() + 9));

    out.push_str("\n1. Basic Summary\n");
    out.push_str("--------------\n");
    let _ = writeln!(out, "Total number of gaze points: {}", summary.sample_count);
    let _ = writeln!(
        out,
        "Number of unique participants: {}",
        summary.participant_count
    );
    let _ = writeln!(out, "Number of unique trials: {}", summary.trial_count);

    out.push_str("\n2. Coordinate Analysis\n");
    out.push_str("--------------------\n");
    format_axis(out, Axis::X, &summary.x);
    format_axis(out, Axis::Y, &summary.y);
}

fn format_axis(out: &mut String, axis: Axis, stats: &AxisStats) {
    let _ = writeln!(out, "\n{}-coordinate:", axis.label());
    let _ = writeln!(out, "  Mean: {}", fixed2(stats.mean));
    let _ = writeln!(out, "  Median: {}", fixed2(stats.median));
    let _ = writeln!(out, "  Std Dev: {}", fixed2(stats.std_dev));
    let _ = writeln!(
        out,
        "  Range: {} to {}",
        fixed2(stats.min),
        fixed2(stats.max)
    );
}

fn fixed2(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}
