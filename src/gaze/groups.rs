//! Splitting a dataset into per-heatmap groups

use std::collections::BTreeMap;

use super::sample::{GazeSample, GroupKey};

/// Coordinates of one (condition, participant, trial) group
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGroup {
    pub key: GroupKey,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl SampleGroup {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Materialize every group present in `samples`, ordered by key.
///
/// Samples keep their input order within a group.
pub fn group_samples(samples: &[GazeSample]) -> Vec<SampleGroup> {
    let mut grouped: BTreeMap<GroupKey, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for sample in samples {
        let entry = grouped.entry(GroupKey::of(sample)).or_default();
        entry.0.push(sample.x);
        entry.1.push(sample.y);
    }

    grouped
        .into_iter()
        .map(|(key, (xs, ys))| SampleGroup { key, xs, ys })
        .collect()
}
