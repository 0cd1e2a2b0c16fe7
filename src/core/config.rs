//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::snapshot::StageOrder;

/// Name of the project configuration file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "maestro.yaml";

/// Smallest number of candidates listed per station
pub const MIN_RECOMMENDATIONS: usize = 5;

/// maestro configuration with layered hierarchy
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default snapshot file or directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Number of ranked candidates kept per station
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<usize>,

    /// Override for the canonical stage sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_order: Option<Vec<String>>,

    /// Currency symbol used when printing costs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/maestro/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (./maestro.yaml)
        if let Some(project) = Self::read_file(&Self::project_config_path()) {
            config.merge(project);
        }

        // 4. Environment variables
        if let Ok(snapshot) = std::env::var("MAESTRO_SNAPSHOT") {
            if !snapshot.is_empty() {
                config.snapshot = Some(PathBuf::from(snapshot));
            }
        }
        if let Ok(format) = std::env::var("MAESTRO_FORMAT") {
            if !format.is_empty() {
                config.default_format = Some(format);
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded configuration");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable configuration");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "maestro")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to the project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_CONFIG_FILE)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.snapshot.is_some() {
            self.snapshot = other.snapshot;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.recommendations.is_some() {
            self.recommendations = other.recommendations;
        }
        if other.stage_order.is_some() {
            self.stage_order = other.stage_order;
        }
        if other.currency.is_some() {
            self.currency = other.currency;
        }
    }

    /// Candidates kept per station, never below the minimum
    pub fn recommendations(&self) -> usize {
        self.recommendations
            .unwrap_or(MIN_RECOMMENDATIONS)
            .max(MIN_RECOMMENDATIONS)
    }

    /// Stage sequence, falling back to the canonical assembly order
    pub fn stage_order(&self) -> StageOrder {
        match &self.stage_order {
            Some(names) if !names.is_empty() => StageOrder::new(names.clone()),
            _ => StageOrder::default(),
        }
    }

    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or("€")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_layer() {
        let mut config = Config {
            snapshot: Some("a.yaml".into()),
            currency: Some("$".into()),
            ..Default::default()
        };
        config.merge(Config {
            snapshot: Some("b.yaml".into()),
            ..Default::default()
        });
        assert_eq!(config.snapshot, Some(PathBuf::from("b.yaml")));
        assert_eq!(config.currency(), "$");
    }

    #[test]
    fn test_recommendations_clamped() {
        let config = Config {
            recommendations: Some(2),
            ..Default::default()
        };
        assert_eq!(config.recommendations(), 5);

        let config = Config {
            recommendations: Some(8),
            ..Default::default()
        };
        assert_eq!(config.recommendations(), 8);
        assert_eq!(Config::default().recommendations(), 5);
    }

    #[test]
    fn test_stage_order_override() {
        let config = Config {
            stage_order: Some(vec!["B".into(), "A".into()]),
            ..Default::default()
        };
        assert_eq!(config.stage_order().position("A"), Some(1));
        assert_eq!(Config::default().stage_order().names().len(), 23);
    }

    #[test]
    fn test_parse_yaml_config() {
        let config: Config =
            serde_yml::from_str("snapshot: data/snapshot.yaml\nrecommendations: 7\n").unwrap();
        assert_eq!(config.snapshot, Some(PathBuf::from("data/snapshot.yaml")));
        assert_eq!(config.recommendations(), 7);
        assert!(config.default_format.is_none());
    }
}
