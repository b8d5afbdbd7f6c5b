//! CSV loading for gaze recordings
//!
//! Each condition is a CSV with a header row. Only `participant_id`,
//! `trial_number`, `x` and `y` are read; other columns are ignored.

use std::fs;
use std::path::Path;
use tracing::info;

use super::sample::{Condition, GazeSample, ParticipantId};
use crate::config::{AnalysisConfig, TrialRange};
use crate::constants::{COL_PARTICIPANT, COL_TRIAL, COL_X, COL_Y};
use crate::error::{Error, InputRole, Result};

/// Check that every required input exists before anything is written.
///
/// Inputs are checked in a fixed order and the first missing one is reported.
pub fn preflight(config: &AnalysisConfig) -> Result<()> {
    let inputs = [
        (InputRole::AiAdvisor, &config.ai_advisor_path),
        (InputRole::NoAdvisor, &config.no_advisor_path),
        (InputRole::Backdrop, &config.backdrop_path),
    ];
    for (role, path) in inputs {
        if !path.exists() {
            return Err(Error::FileNotFound {
                role,
                path: path.clone(),
            });
        }
    }
    Ok(())
}

/// Load both conditions, concatenate them and keep the configured trials
pub fn load_dataset(config: &AnalysisConfig) -> Result<Vec<GazeSample>> {
    let mut samples = load_condition(&config.ai_advisor_path, Condition::AiAdvisor)?;
    samples.extend(load_condition(&config.no_advisor_path, Condition::NoAdvisor)?);

    let loaded = samples.len();
    let samples = filter_trials(samples, &config.trials);
    info!(
        "Loaded {} gaze samples, {} within trials {}..={}",
        loaded,
        samples.len(),
        config.trials.first,
        config.trials.last
    );
    Ok(samples)
}

/// Load one condition's CSV file
pub fn load_condition(path: &Path, condition: Condition) -> Result<Vec<GazeSample>> {
    let content = fs::read_to_string(path)?;
    let samples = parse_condition(&content, path, condition)?;
    info!(
        "Read {} rows for {} from {}",
        samples.len(),
        condition,
        path.display()
    );
    Ok(samples)
}

pub fn filter_trials(samples: Vec<GazeSample>, trials: &TrialRange) -> Vec<GazeSample> {
    samples
        .into_iter()
        .filter(|s| trials.contains(s.trial_number))
        .collect()
}

/// Column positions of the required fields
struct ColumnIndex {
    participant: usize,
    trial: usize,
    x: usize,
    y: usize,
}

impl ColumnIndex {
    fn from_header(header: &[String], path: &Path) -> Result<Self> {
        let find = |column: &'static str| {
            header
                .iter()
                .position(|name| name == column)
                .ok_or_else(|| Error::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        };
        Ok(Self {
            participant: find(COL_PARTICIPANT)?,
            trial: find(COL_TRIAL)?,
            x: find(COL_X)?,
            y: find(COL_Y)?,
        })
    }
}

/// Parse CSV text; `path` is only used for error messages
pub fn parse_condition(
    content: &str,
    path: &Path,
    condition: Condition,
) -> Result<Vec<GazeSample>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break split_record(line),
            None => {
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    line: 1,
                    message: "empty CSV".to_string(),
                });
            }
        }
    };
    let columns = ColumnIndex::from_header(&header, path)?;

    let mut samples = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields = split_record(line);
        let parse_err = |message: String| Error::Parse {
            path: path.to_path_buf(),
            line: line_no,
            message,
        };
        let field = |i: usize, name: &'static str| {
            fields
                .get(i)
                .map(|s| s.as_str())
                .ok_or_else(|| parse_err(format!("missing value for '{}'", name)))
        };

        let participant = field(columns.participant, COL_PARTICIPANT)?;
        if participant.is_empty() {
            return Err(parse_err(format!("empty '{}'", COL_PARTICIPANT)));
        }
        let trial_number = parse_trial(field(columns.trial, COL_TRIAL)?).map_err(&parse_err)?;
        let x = parse_coordinate(field(columns.x, COL_X)?, COL_X).map_err(&parse_err)?;
        let y = parse_coordinate(field(columns.y, COL_Y)?, COL_Y).map_err(&parse_err)?;

        samples.push(GazeSample {
            participant_id: ParticipantId::new(participant),
            trial_number,
            x,
            y,
            condition,
        });
    }

    Ok(samples)
}

/// Trial numbers may be exported as integral floats (`3.0`)
fn parse_trial(raw: &str) -> std::result::Result<i64, String> {
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(n);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        _ => Err(format!("invalid {} '{}'", COL_TRIAL, raw)),
    }
}

fn parse_coordinate(raw: &str, name: &str) -> std::result::Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid {} coordinate '{}'", name, raw)),
    }
}

/// Split one CSV record, honouring double-quoted fields
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            other => current.push(other),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> Result<Vec<GazeSample>> {
        parse_condition(content, Path::new("test.csv"), Condition::AiAdvisor)
    }

    #[test]
    fn reads_required_columns_in_any_order() {
        let samples = parse(
            "timestamp,y,x,trial_number,participant_id\n\
             0.1,200.5,100.25,1,7\n\
             0.2,210,110,2.0,7\n",
        )
        .expect("parse csv");

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].participant_id.as_str(), "7");
        assert_eq!(samples[0].trial_number, 1);
        assert_eq!(samples[0].x, 100.25);
        assert_eq!(samples[0].y, 200.5);
        assert_eq!(samples[1].trial_number, 2);
        assert_eq!(samples[1].condition, Condition::AiAdvisor);
    }

    #[test]
    fn handles_bom_quotes_and_blank_lines() {
        let samples = parse(
            "\u{feff}participant_id,trial_number,x,y,note\n\
             \n\
             \"p, 1\",0,1,2,\"said \"\"hi\"\"\"\n",
        )
        .expect("parse csv");
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].participant_id.as_str(), "p, 1");
    }

    #[test]
    fn missing_column_is_reported() {
        let err = parse("participant_id,trial_number,x\n1,0,5\n").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column: "y", .. }));
    }

    #[test]
    fn bad_value_reports_line_number() {
        let err = parse("participant_id,trial_number,x,y\n1,0,5,6\n1,0,abc,6\n").unwrap_err();
        match err {
            Error::Parse { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("abc"), "{}", message);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let err = parse("participant_id,trial_number,x,y\n1,0,NaN,6\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn fractional_trial_is_rejected() {
        let err = parse("participant_id,trial_number,x,y\n1,1.5,0,0\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn filter_keeps_inclusive_trial_range() {
        let samples = parse(
            "participant_id,trial_number,x,y\n\
             1,-1,0,0\n1,0,0,0\n1,4,0,0\n1,5,0,0\n",
        )
        .expect("parse csv");
        let kept = filter_trials(samples, &TrialRange { first: 0, last: 4 });
        let trials: Vec<i64> = kept.iter().map(|s| s.trial_number).collect();
        assert_eq!(trials, vec![0, 4]);
    }

    #[test]
    fn preflight_reports_first_missing_input() {
        let mut config = AnalysisConfig::default();
        config.ai_advisor_path = PathBuf::from("/nonexistent/gazemap/ai.csv");
        config.no_advisor_path = PathBuf::from("/nonexistent/gazemap/none.csv");
        let err = preflight(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::FileNotFound {
                role: InputRole::AiAdvisor,
                ..
            }
        ));
    }
}
