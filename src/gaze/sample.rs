//! Gaze sample types

use std::cmp::Ordering;
use std::fmt;

/// Experimental arm a sample was recorded under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Condition {
    AiAdvisor,
    NoAdvisor,
}

impl Condition {
    /// Both conditions in report order
    pub const ALL: [Condition; 2] = [Condition::AiAdvisor, Condition::NoAdvisor];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::AiAdvisor => "AI Advisor",
            Condition::NoAdvisor => "No Advisor",
        }
    }

    /// Label with spaces replaced, used in output file names
    pub fn file_label(&self) -> String {
        self.label().replace(' ', "_")
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Participant identifier as written in the CSV.
///
/// Numeric ids order numerically (`2` before `10`), everything else orders
/// after them lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl Ord for ParticipantId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ParticipantId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One recorded eye position
#[derive(Debug, Clone, PartialEq)]
pub struct GazeSample {
    pub participant_id: ParticipantId,
    pub trial_number: i64,
    pub x: f64,
    pub y: f64,
    pub condition: Condition,
}

/// Identifies the samples behind one heatmap
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub condition: Condition,
    pub participant_id: ParticipantId,
    pub trial_number: i64,
}

impl GroupKey {
    pub fn of(sample: &GazeSample) -> Self {
        Self {
            condition: sample.condition,
            participant_id: sample.participant_id.clone(),
            trial_number: sample.trial_number,
        }
    }

    /// File stem shared by every output derived from this group
    pub fn file_stem(&self) -> String {
        let participant: String = self
            .participant_id
            .as_str()
            .chars()
            .map(|ch| match ch {
                '/' | '\\' | ':' => '_',
                other => other,
            })
            .collect();
        format!(
            "heatmap_{}_participant_{}_trial_{}",
            self.condition.file_label(),
            participant,
            self.trial_number
        )
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Participant {}, Trial {}",
            self.condition, self.participant_id, self.trial_number
        )
    }
}
