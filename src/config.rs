// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "SENTIMENT_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/analyzer.toml";

/// Tunable constants of the scoring pipeline. All of these are recognized
/// configuration, not derived values; `max_headlines` doubles as the decay
/// normalization denominator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Headline fetch cap per ticker.
    pub max_headlines: usize,
    /// Below this many qualifying headlines the result is NO_DATA.
    pub min_headlines: usize,
    /// Decay applied with zero corroborating headlines.
    pub min_decay: f64,
    /// Decay applied at (or beyond) `max_headlines`.
    pub max_decay: f64,
    /// Distinct ticker keys held by the score cache.
    pub cache_capacity: usize,
    /// Seconds a computed score stays fresh.
    pub cache_ttl_secs: u64,
    /// Total timeout for one provider fetch.
    pub fetch_timeout_secs: u64,
    /// Model ids for the two ensemble classifiers.
    pub model_a: String,
    pub model_b: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_headlines: 10,
            min_headlines: 2,
            min_decay: 0.6,
            max_decay: 0.95,
            cache_capacity: 100,
            cache_ttl_secs: 600,
            fetch_timeout_secs: 6,
            model_a: "yiyanghkust/finbert-tone".to_string(),
            model_b: "ProsusAI/finbert".to_string(),
        }
    }
}

impl AnalyzerConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Load from an explicit TOML path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading analyzer config from {}", path.display()))?;
        let cfg: Self = toml::from_str(&content)
            .with_context(|| format!("parsing analyzer config from {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $SENTIMENT_CONFIG_PATH
    /// 2) config/analyzer.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            return Self::from_path(&pb);
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::from_path(&default_p);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.max_headlines > 0, "max_headlines must be positive");
        // Below 2 headlines a score would be a guess; NO_DATA is the contract.
        anyhow::ensure!(
            self.min_headlines >= 2,
            "min_headlines must be at least 2"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.min_decay) && (0.0..=1.0).contains(&self.max_decay),
            "decay bounds must lie in [0,1]"
        );
        anyhow::ensure!(
            self.min_decay <= self.max_decay,
            "min_decay must not exceed max_decay"
        );
        anyhow::ensure!(self.cache_capacity > 0, "cache_capacity must be positive");
        Ok(())
    }
}
