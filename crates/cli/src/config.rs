//! Configuration file support for the monitor

use anyhow::{Context, Result};
use descwatch_ai::AssessorConfig;
use descwatch_core::{EngineConfig, RulesConfig};
use descwatch_filters::{AlertConfig, HeuristicsConfig, LengthThresholds, ScoreTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete monitor configuration
///
/// Credentials never live here; the CLI takes them from flags or the
/// environment and hands them to the client directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub thresholds: LengthThresholds,
    pub scores: ScoreTable,
    pub alert: AlertConfig,
    pub rules: RulesConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiConfig>,
}

impl MonitorConfig {
    /// Load configuration from a file (YAML or TOML)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        match extension(path) {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            "toml" => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            other => Err(anyhow::anyhow!(
                "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                other
            )),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match extension(path) {
            "yaml" | "yml" => serde_yaml::to_string(self)?,
            "toml" => toml::to_string_pretty(self)?,
            other => {
                return Err(anyhow::anyhow!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                    other
                ))
            }
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// High bar: alert below 90
    pub fn strict() -> Self {
        Self {
            alert: AlertConfig { threshold: 90.0 },
            ai: Some(AiConfig::default()),
            ..Default::default()
        }
    }

    /// Low bar: alert below 50
    pub fn lenient() -> Self {
        Self {
            alert: AlertConfig { threshold: 50.0 },
            ..Default::default()
        }
    }

    pub fn engine_config(&self, num_threads: Option<usize>) -> EngineConfig {
        EngineConfig {
            thresholds: self.thresholds,
            scores: self.scores,
            alert: self.alert,
            rules: self.rules,
            num_threads,
        }
    }
}

/// Settings for the AI summary assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub concurrency: usize,
    pub heuristics: HeuristicsConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o".to_string(),
            timeout_secs: 30,
            concurrency: 1,
            heuristics: HeuristicsConfig::default(),
        }
    }
}

impl AiConfig {
    pub fn assessor_config(&self) -> AssessorConfig {
        AssessorConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            concurrency: self.concurrency,
            heuristics: self.heuristics.clone(),
        }
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|s| s.to_str()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("monitor.yaml");

        let config = MonitorConfig::strict();
        config.save(&path).unwrap();
        let loaded = MonitorConfig::load(&path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_save_and_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("monitor.toml");

        let config = MonitorConfig::lenient();
        config.save(&path).unwrap();
        let loaded = MonitorConfig::load(&path).unwrap();

        assert_eq!(loaded.alert.threshold, 50.0);
        assert!(loaded.ai.is_none());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.yml");
        std::fs::write(
            &path,
            "alert:\n  threshold: 65\nai:\n  model: gpt-4o-mini\n  heuristics:\n    min_words: 3\n",
        )
        .unwrap();

        let config = MonitorConfig::load(&path).unwrap();
        assert_eq!(config.alert.threshold, 65.0);
        assert_eq!(config.thresholds, LengthThresholds::default());
        assert_eq!(config.rules, RulesConfig::default());

        let ai = config.ai.unwrap();
        assert_eq!(ai.model, "gpt-4o-mini");
        assert_eq!(ai.timeout_secs, 30);
        assert_eq!(ai.heuristics.min_words, 3);
        assert_eq!(ai.heuristics.generic_phrases.len(), 6);
    }

    #[test]
    fn test_unsupported_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("monitor.json");

        assert!(MonitorConfig::default().save(&path).is_err());
    }

    #[test]
    fn test_engine_config_carries_settings() {
        let engine = MonitorConfig::strict().engine_config(Some(2));
        assert_eq!(engine.alert.threshold, 90.0);
        assert_eq!(engine.num_threads, Some(2));
    }

    #[test]
    fn test_rule_thresholds_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, "[rules]\nid_uniqueness = 0.99\n").unwrap();

        let config = MonitorConfig::load(&path).unwrap();
        assert_eq!(config.rules.id_uniqueness, 0.99);
        assert_eq!(config.rules.title_completeness, 0.95);
        assert_eq!(config.engine_config(None).rules, config.rules);
    }
}
