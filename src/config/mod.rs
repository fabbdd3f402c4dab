mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            planner: PlannerConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        let planner = &self.planner;

        if planner.max_paragraphs == 0 {
            return Err(ConfigError::NoParagraphsAllowed);
        }

        if planner.min_satellites_per_nucleus > planner.max_satellites_per_nucleus {
            return Err(ConfigError::SatelliteBounds {
                min: planner.min_satellites_per_nucleus,
                max: planner.max_satellites_per_nucleus,
            });
        }

        for (name, value) in [
            (
                "new_paragraph_absolute_threshold",
                planner.new_paragraph_absolute_threshold,
            ),
            (
                "satellite_relative_threshold",
                planner.satellite_relative_threshold,
            ),
            (
                "satellite_absolute_threshold",
                planner.satellite_absolute_threshold,
            ),
            ("nucleus_weight", planner.nucleus_weight),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeThreshold { name, value });
            }
        }

        Ok(())
    }
}
