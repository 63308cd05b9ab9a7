use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use paperpress_content::{DEFAULT_EXCERPT_LENGTH, DEFAULT_WORDS_PER_MINUTE};
use paperpress_core::{
    EngagementWeights, RecommendationStrategy, TrendingMode, DEFAULT_RECOMMENDATION_LIMIT,
    DEFAULT_TRENDING_LIMIT,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_PATH: &str = "./paperpress.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings read from `paperpress.ron`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressConfig {
    pub store_path: PathBuf,
    pub content: ContentConfig,
    pub trending: TrendingConfig,
    pub recommendations: RecommendationConfig,
    pub logging: LoggingConfig,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("./paperpress_store.ron"),
            content: ContentConfig::default(),
            trending: TrendingConfig::default(),
            recommendations: RecommendationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub words_per_minute: u32,
    pub excerpt_max_length: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            excerpt_max_length: DEFAULT_EXCERPT_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingConfig {
    pub default_mode: TrendingMode,
    pub limit: usize,
    pub weights: EngagementWeights,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            default_mode: TrendingMode::Views,
            limit: DEFAULT_TRENDING_LIMIT,
            weights: EngagementWeights::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub strategy: RecommendationStrategy,
    pub limit: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            strategy: RecommendationStrategy::ByTag,
            limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub destination: LogDestination,
    pub level: String,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            destination: LogDestination::Terminal,
            level: "info".to_string(),
            file: PathBuf::from("./paperpress.log"),
        }
    }
}

impl LoggingConfig {
    /// Falls back to `Info`; `validate` has already rejected bad names.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.level).unwrap_or(LevelFilter::Info)
    }
}

impl PressConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content.words_per_minute == 0 {
            return Err(ConfigError::Invalid(
                "content.words_per_minute must be positive".into(),
            ));
        }
        let weights = &self.trending.weights;
        let all_weights = [weights.views, weights.likes, weights.comments];
        if all_weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Invalid(
                "trending.weights must be finite and non-negative".into(),
            ));
        }
        if LevelFilter::from_str(&self.logging.level).is_err() {
            return Err(ConfigError::Invalid(format!(
                "logging.level {:?} is not a log level",
                self.logging.level
            )));
        }
        Ok(())
    }
}

/// Loads configuration from `path`. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<PressConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(PressConfig::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: PressConfig = ron::from_str(&text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use paperpress_core::TrendingMode;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::{load, ConfigError, PressConfig};
    use crate::logging::LogDestination;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, PressConfig::default());
        assert_eq!(config.content.words_per_minute, 200);
        assert_eq!(config.trending.limit, 10);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("paperpress.ron");
        fs::write(
            &path,
            r#"(
                content: (words_per_minute: 250),
                trending: (default_mode: weighted, weights: (likes: 10.0)),
                logging: (destination: both, level: "debug"),
            )"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.content.words_per_minute, 250);
        assert_eq!(config.content.excerpt_max_length, 200);
        assert_eq!(config.trending.default_mode, TrendingMode::Weighted);
        assert_eq!(config.trending.weights.likes, 10.0);
        assert_eq!(config.trending.weights.comments, 3.0);
        assert_eq!(config.logging.destination, LogDestination::Both);
        assert_eq!(config.logging.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn zero_reading_rate_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("paperpress.ron");
        fs::write(&path, "(content: (words_per_minute: 0))").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn negative_weights_are_rejected() {
        let mut config = PressConfig::default();
        config.trending.weights.views = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("paperpress.ron");
        fs::write(&path, "(content: [").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }
}
