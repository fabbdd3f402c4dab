use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsmillError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    #[error("Template selection error: {0}")]
    Select(#[from] SelectError),

    #[error("Realization error: {0}")]
    Realize(#[from] RealizeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid matcher or realizer pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("max_paragraphs must be at least 1")]
    NoParagraphsAllowed,

    #[error("min_satellites_per_nucleus ({min}) exceeds max_satellites_per_nucleus ({max})")]
    SatelliteBounds { min: usize, max: usize },

    #[error("Threshold '{name}' must be non-negative, got {value}")]
    NegativeThreshold { name: &'static str, value: f64 },
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read data file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No usable facts for location '{location}'")]
    NoCandidateMessages { location: String },
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("No messages available for headline selection")]
    NoHeadlineMessage,

    #[error("Document planning finished without selecting a single nucleus")]
    NoViableNucleus,
}

#[derive(Error, Debug)]
pub enum SelectError {
    #[error("No templates registered for language '{0}'")]
    NoTemplatesForLanguage(String),

    #[error("No template can express a message with value type '{value_type}'")]
    NoTemplateForMessage { value_type: String },
}

#[derive(Error, Debug)]
pub enum RealizeError {
    #[error("Empty sentence in surface realization")]
    EmptySentence,
}
