//! Gaze data: sample types, CSV loading and grouping

pub mod groups;
pub mod loader;
mod sample;

pub use groups::{SampleGroup, group_samples};
pub use loader::{filter_trials, load_condition, load_dataset, parse_condition, preflight};
pub use sample::{Condition, GazeSample, GroupKey, ParticipantId};
