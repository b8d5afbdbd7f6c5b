//! gazemap - Eye tracking heatmaps and condition comparison
//!
//! Usage:
//!   cargo run -- --ai-advisor ai.csv --no-advisor none.csv --output results
//!   cargo run -- --config config/gazemap.toml --verbose

use std::path::PathBuf;
use std::process::ExitCode;

use gazemap::{AnalysisConfig, run};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = CliArgs::from_args();

    if cli.show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(summary) => {
            info!(
                "{} heatmaps written, report at {}",
                summary.heatmaps.len(),
                summary.report_path.display()
            );
            if !summary.contact_sheets.is_empty() {
                info!("{} contact sheets written", summary.contact_sheets.len());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &CliArgs) -> gazemap::Result<AnalysisConfig> {
    let mut config = match &cli.config_file {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::load_default()?,
    };
    cli.apply(&mut config);
    Ok(config)
}

/// Command-line options; every path flag overrides the config file
#[derive(Default)]
struct CliArgs {
    config_file: Option<PathBuf>,
    ai_advisor: Option<PathBuf>,
    no_advisor: Option<PathBuf>,
    backdrop: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    verbose: bool,
    show_help: bool,
}

impl CliArgs {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut cli = Self::default();

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).map(PathBuf::from);
            match args[i].as_str() {
                "--config" | "-c" => {
                    cli.config_file = value;
                    i += 1;
                }
                "--ai-advisor" => {
                    cli.ai_advisor = value;
                    i += 1;
                }
                "--no-advisor" => {
                    cli.no_advisor = value;
                    i += 1;
                }
                "--backdrop" => {
                    cli.backdrop = value;
                    i += 1;
                }
                "--output" | "-o" => {
                    cli.output_dir = value;
                    i += 1;
                }
                "--verbose" | "-v" => {
                    cli.verbose = true;
                }
                "--help" | "-h" => {
                    cli.show_help = true;
                }
                other => {
                    eprintln!("Ignoring unknown argument: {}", other);
                }
            }
            i += 1;
        }

        cli
    }

    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(path) = &self.ai_advisor {
            config.ai_advisor_path = path.clone();
        }
        if let Some(path) = &self.no_advisor {
            config.no_advisor_path = path.clone();
        }
        if let Some(path) = &self.backdrop {
            config.backdrop_path = path.clone();
        }
        if let Some(path) = &self.output_dir {
            config.output_dir = path.clone();
        }
    }
}

fn print_help() {
    println!(
        r#"gazemap - Eye tracking heatmaps and condition comparison

USAGE:
    gazemap [OPTIONS]

OPTIONS:
    --config, -c <FILE>     Load settings from a TOML file (default: config/gazemap.toml if present)
    --ai-advisor <CSV>      Gaze samples recorded with the AI advisor
    --no-advisor <CSV>      Gaze samples recorded without an advisor
    --backdrop <IMG>        Screen backdrop image (must exist)
    --output, -o <DIR>      Output directory (default: output)
    --verbose, -v           Debug-level logging (RUST_LOG overrides)
    --help, -h              Show this help

OUTPUTS:
    heatmap_<Condition>_participant_<id>_trial_<n>.png   one per participant and trial
    analysis_summary.txt                                 descriptive stats and t-tests

CONFIG FILE FORMAT (TOML):
    ai_advisor_path = "data/condition_aiadvisor_data_group_a_rows.csv"
    output_dir = "output"

    [trials]
    first = 0
    last = 4

    [render]
    backdrop_overlay = true
    export_counts = true
    contact_sheet = true

    [stats]
    equal_variance = false
"#
    );
}
