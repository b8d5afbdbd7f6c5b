//! Descriptive statistics over coordinate samples
//!
//! All functions return `None` when the statistic is undefined for the input
//! (empty slice, or a single value for the sample standard deviation).

use std::collections::BTreeSet;

use crate::gaze::{Condition, GazeSample};

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample variance (n - 1 denominator)
pub fn variance(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let m = mean(data)?;
    let ss: f64 = data.iter().map(|v| (v - m) * (v - m)).sum();
    Some(ss / (data.len() - 1) as f64)
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn min(data: &[f64]) -> Option<f64> {
    data.iter().copied().reduce(f64::min)
}

pub fn max(data: &[f64]) -> Option<f64> {
    data.iter().copied().reduce(f64::max)
}

/// Summary of one coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisStats {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            mean: mean(values),
            median: median(values),
            std_dev: std_dev(values),
            min: min(values),
            max: max(values),
        }
    }
}

/// Everything the report says about one condition
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSummary {
    pub condition: Condition,
    pub sample_count: usize,
    pub participant_count: usize,
    pub trial_count: usize,
    pub x: AxisStats,
    pub y: AxisStats,
    /// Raw coordinates, kept for the between-condition tests
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl ConditionSummary {
    /// Summarize the samples of `condition` found in `samples`
    pub fn from_samples(condition: Condition, samples: &[GazeSample]) -> Self {
        let selected: Vec<&GazeSample> = samples
            .iter()
            .filter(|s| s.condition == condition)
            .collect();

        let participants: BTreeSet<&str> = selected
            .iter()
            .map(|s| s.participant_id.as_str())
            .collect();
        let trials: BTreeSet<i64> = selected.iter().map(|s| s.trial_number).collect();
        let xs: Vec<f64> = selected.iter().map(|s| s.x).collect();
        let ys: Vec<f64> = selected.iter().map(|s| s.y).collect();

        Self {
            condition,
            sample_count: selected.len(),
            participant_count: participants.len(),
            trial_count: trials.len(),
            x: AxisStats::from_values(&xs),
            y: AxisStats::from_values(&ys),
            xs,
            ys,
        }
    }
}
