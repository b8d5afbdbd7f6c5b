//! End-to-end run: load, bin and render every group, then report
//!
//! Groups are processed one after another; the first error aborts the run
//! and leaves whatever was already written in place.

use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::analytics::AnalysisReport;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::gaze::{self, Condition, SampleGroup};
use crate::heatmap::{HeatmapGrid, HeatmapRenderer, bin_group, write_contact_sheet};

/// One heatmap produced by a run
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapOutput {
    pub group: SampleGroup,
    pub grid: HeatmapGrid,
    pub image_path: PathBuf,
    pub counts_path: Option<PathBuf>,
}

/// What a run wrote
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub heatmaps: Vec<HeatmapOutput>,
    pub contact_sheets: Vec<PathBuf>,
    pub report: AnalysisReport,
    pub report_path: PathBuf,
}

/// Run the whole analysis described by `config`
pub fn run(config: &AnalysisConfig) -> Result<RunSummary> {
    config.validate()?;
    gaze::preflight(config)?;

    let samples = gaze::load_dataset(config)?;
    let mut renderer = HeatmapRenderer::new(&config.render, config.screen)?;
    if config.render.backdrop_overlay {
        let backdrop = image::open(&config.backdrop_path)?;
        renderer = renderer.with_backdrop(&backdrop, config.bins);
    }
    fs::create_dir_all(&config.output_dir)?;

    let groups = gaze::group_samples(&samples);
    info!(
        "Generating {} heatmaps: {}x{} bins over {}x{} screen",
        groups.len(),
        config.bins.x,
        config.bins.y,
        config.screen.width,
        config.screen.height
    );

    let mut heatmaps = Vec::with_capacity(groups.len());
    for group in groups {
        heatmaps.push(render_group(config, &renderer, group)?);
    }

    let contact_sheets = if config.render.contact_sheet {
        write_contact_sheets(config, &heatmaps)?
    } else {
        Vec::new()
    };

    let report = AnalysisReport::from_samples(&samples, &config.stats);
    let report_path = config.report_path();
    report.write_to_file(&report_path)?;

    info!(
        "Analysis complete! Results saved to: {}",
        config.output_dir.display()
    );
    Ok(RunSummary {
        heatmaps,
        contact_sheets,
        report,
        report_path,
    })
}

fn render_group(
    config: &AnalysisConfig,
    renderer: &HeatmapRenderer,
    group: SampleGroup,
) -> Result<HeatmapOutput> {
    let grid = bin_group(&group, config.bins, config.screen)?;
    let image_path = renderer.save(&grid, &group.key, &config.output_dir)?;

    let counts_path = if config.render.export_counts {
        let path = config
            .output_dir
            .join(format!("{}_counts.txt", group.key.file_stem()));
        fs::write(&path, grid.to_csv())?;
        Some(path)
    } else {
        None
    };

    Ok(HeatmapOutput {
        group,
        grid,
        image_path,
        counts_path,
    })
}

fn write_contact_sheets(
    config: &AnalysisConfig,
    heatmaps: &[HeatmapOutput],
) -> Result<Vec<PathBuf>> {
    let mut sheets = Vec::new();
    for condition in Condition::ALL {
        let paths: Vec<PathBuf> = heatmaps
            .iter()
            .filter(|h| h.group.key.condition == condition)
            .map(|h| h.image_path.clone())
            .collect();
        let output = config
            .output_dir
            .join(format!("contact_sheet_{}.png", condition.file_label()));
        if let Some(path) = write_contact_sheet(&paths, &output)? {
            sheets.push(path);
        }
    }
    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, InputRole};
    use image::{Rgb, RgbImage};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("gazemap_{}_{}", label, nanos));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    /// 2 participants x 2 trials x `points` samples, plus rows outside the trial filter
    fn write_condition_csv(path: &Path, seed: u64, offset: f64, points: usize) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut csv = String::from("participant_id,trial_number,x,y,timestamp\n");
        for participant in [1, 2] {
            for trial in [0, 3] {
                for i in 0..points {
                    let x = offset + rng.gen_range(0.0..800.0);
                    let y = offset + rng.gen_range(0.0..450.0);
                    csv.push_str(&format!("{},{},{:.3},{:.3},{}\n", participant, trial, x, y, i));
                }
            }
        }
        csv.push_str("1,7,5.0,5.0,0\n");
        fs::write(path, csv).expect("write csv");
    }

    fn test_config(dir: &Path) -> AnalysisConfig {
        let ai = dir.join("ai.csv");
        let none = dir.join("none.csv");
        let backdrop = dir.join("backdrop.png");
        write_condition_csv(&ai, 1, 0.0, 10);
        write_condition_csv(&none, 2, 100.0, 10);
        RgbImage::from_pixel(32, 18, Rgb([40, 40, 80]))
            .save(&backdrop)
            .expect("write backdrop");

        AnalysisConfig {
            ai_advisor_path: ai,
            no_advisor_path: none,
            backdrop_path: backdrop,
            output_dir: dir.join("output"),
            ..AnalysisConfig::default()
        }
    }

    fn output_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .map(|entries| {
                entries
                    .flatten()
                    .filter_map(|e| e.file_name().to_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    #[test]
    fn synthetic_study_produces_eight_heatmaps_and_one_report() {
        let dir = scratch_dir("run");
        let config = test_config(&dir);

        let summary = run(&config).expect("run analysis");

        assert_eq!(summary.heatmaps.len(), 8);
        for heatmap in &summary.heatmaps {
            assert_eq!(heatmap.grid.total(), heatmap.group.len() as u64);
            assert_eq!(heatmap.group.len(), 10);
            assert!(heatmap.image_path.exists());
        }

        let files = output_files(&config.output_dir);
        assert_eq!(files.len(), 9, "{:?}", files);
        assert!(files.contains(&"analysis_summary.txt".to_string()));
        assert!(files.contains(&"heatmap_AI_Advisor_participant_1_trial_0.png".to_string()));
        assert!(files.contains(&"heatmap_No_Advisor_participant_2_trial_3.png".to_string()));

        assert_eq!(summary.report.summaries.len(), 2);
        assert_eq!(summary.report.total_points(), 80);
        for condition_summary in &summary.report.summaries {
            assert_eq!(condition_summary.sample_count, 40);
            assert_eq!(condition_summary.participant_count, 2);
            assert_eq!(condition_summary.trial_count, 2);
        }

        let text = fs::read_to_string(&summary.report_path).expect("read report");
        assert_eq!(text.matches("1. Basic Summary").count(), 2);
        assert!(text.contains("  AI Advisor: 40 points (50.0%)\n"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let dir = scratch_dir("repeat");
        let config = test_config(&dir);

        let first = run(&config).expect("first run");
        let first_report = fs::read(&first.report_path).expect("read report");
        let second = run(&config).expect("second run");
        let second_report = fs::read(&second.report_path).expect("read report");

        assert_eq!(first_report, second_report);
        let grids = |s: &RunSummary| s.heatmaps.iter().map(|h| h.grid.clone()).collect::<Vec<_>>();
        assert_eq!(grids(&first), grids(&second));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_input_writes_nothing() {
        let dir = scratch_dir("missing");
        let mut config = test_config(&dir);
        config.ai_advisor_path = dir.join("does_not_exist.csv");

        let err = run(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::FileNotFound {
                role: InputRole::AiAdvisor,
                ..
            }
        ));
        assert!(err.to_string().contains("not found at path"));
        assert!(!config.output_dir.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn optional_outputs() {
        let dir = scratch_dir("extras");
        let mut config = test_config(&dir);
        config.render.export_counts = true;
        config.render.contact_sheet = true;
        config.render.backdrop_overlay = true;

        let summary = run(&config).expect("run analysis");

        assert_eq!(summary.contact_sheets.len(), 2);
        for heatmap in &summary.heatmaps {
            let counts = heatmap.counts_path.as_ref().expect("counts exported");
            let text = fs::read_to_string(counts).expect("read counts");
            let total: u64 = text
                .lines()
                .skip(1)
                .filter_map(|l| l.rsplit(',').next()?.parse::<u64>().ok())
                .sum();
            assert_eq!(total, 10);
        }
        let files = output_files(&config.output_dir);
        assert!(files.contains(&"contact_sheet_AI_Advisor.png".to_string()));
        assert!(files.contains(&"contact_sheet_No_Advisor.png".to_string()));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_backdrop_leaves_no_output_dir() {
        let dir = scratch_dir("bad_backdrop");
        let mut config = test_config(&dir);
        fs::write(&config.backdrop_path, b"not a png").expect("overwrite backdrop");
        config.render.backdrop_overlay = true;

        let err = run(&config).unwrap_err();
        assert!(matches!(err, Error::Image(_)));
        assert!(!config.output_dir.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_row_aborts_before_any_heatmap() {
        let dir = scratch_dir("malformed");
        let config = test_config(&dir);
        fs::write(
            &config.no_advisor_path,
            "participant_id,trial_number,x,y\n1,0,1.0,2.0\n1,0,oops,2.0\n",
        )
        .expect("overwrite csv");

        let err = run(&config).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
        assert!(output_files(&config.output_dir).is_empty());

        let _ = fs::remove_dir_all(&dir);
    }
}
