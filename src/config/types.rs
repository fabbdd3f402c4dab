use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub planner: PlannerConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Thresholds steering paragraph construction. The overview/in-depth
/// relaxation factors are tuned per dataset, so they live here rather than
/// in code.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PlannerConfig {
    #[serde(default = "default_max_paragraphs")]
    pub max_paragraphs: usize,

    #[serde(default = "default_min_satellites")]
    pub min_satellites_per_nucleus: usize,

    #[serde(default = "default_max_satellites")]
    pub max_satellites_per_nucleus: usize,

    /// A nucleus scoring below this never starts a paragraph.
    #[serde(default = "default_paragraph_absolute_threshold")]
    pub new_paragraph_absolute_threshold: f64,

    /// Satellites must beat this fraction of the nucleus score...
    #[serde(default = "default_satellite_relative_threshold")]
    pub satellite_relative_threshold: f64,

    /// ...or this absolute floor.
    #[serde(default = "default_satellite_absolute_threshold")]
    pub satellite_absolute_threshold: f64,

    /// Weight of the nucleus relative to the latest satellite when
    /// rescoring candidates for context similarity.
    #[serde(default = "default_nucleus_weight")]
    pub nucleus_weight: f64,

    /// Fraction of the first nucleus score a second paragraph's nucleus
    /// must reach. Kept low to encourage at least two paragraphs.
    #[serde(default = "default_second_paragraph_factor")]
    pub second_paragraph_factor: f64,

    /// Fraction of the first nucleus score required from the third
    /// paragraph onwards.
    #[serde(default = "default_later_paragraph_factor")]
    pub later_paragraph_factor: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_paragraphs: default_max_paragraphs(),
            min_satellites_per_nucleus: default_min_satellites(),
            max_satellites_per_nucleus: default_max_satellites(),
            new_paragraph_absolute_threshold: default_paragraph_absolute_threshold(),
            satellite_relative_threshold: default_satellite_relative_threshold(),
            satellite_absolute_threshold: default_satellite_absolute_threshold(),
            nucleus_weight: default_nucleus_weight(),
            second_paragraph_factor: default_second_paragraph_factor(),
            later_paragraph_factor: default_later_paragraph_factor(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ScoringConfig {
    /// Pin the year used for recency decay and staleness cuts. Unset means
    /// the current calendar year.
    #[serde(default)]
    pub reference_year: Option<i32>,
}

/// Which document planning strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlannerKind {
    #[default]
    Full,
    Score,
    EarlyStop,
    Random,
}

impl std::fmt::Display for PlannerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlannerKind::Full => write!(f, "full"),
            PlannerKind::Score => write!(f, "score"),
            PlannerKind::EarlyStop => write!(f, "earlystop"),
            PlannerKind::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for PlannerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(PlannerKind::Full),
            "score" => Ok(PlannerKind::Score),
            "earlystop" | "early_stop" => Ok(PlannerKind::EarlyStop),
            "random" => Ok(PlannerKind::Random),
            _ => Err(format!("Unknown planner: {}", s)),
        }
    }
}
