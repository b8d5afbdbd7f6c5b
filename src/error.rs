//! Error types for the gaze report generator

use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Which required input a path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    AiAdvisor,
    NoAdvisor,
    Backdrop,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InputRole::AiAdvisor => "AI Advisor file",
            InputRole::NoAdvisor => "No Advisor file",
            InputRole::Backdrop => "Backdrop image",
        };
        f.write_str(label)
    }
}

/// Everything that can abort a run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{role} not found at path: {}", .path.display())]
    FileNotFound { role: InputRole, path: PathBuf },

    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("computation failed: {0}")]
    Computation(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to load font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
