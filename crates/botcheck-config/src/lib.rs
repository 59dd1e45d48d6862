//! Runtime configuration for the bot-detection scoring engine (§6.4).
//!
//! Every analyzer threshold, fraud weight, and band is a config option with
//! a documented default; nothing is a hardcoded magic number in the
//! analyzer crates.

mod error;

pub use error::{Error, Result};

use botcheck_types::RiskLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location, mirroring
/// the teacher's `AGTRACE_PATH` resolution order.
pub const CONFIG_PATH_ENV: &str = "BOTCHECK_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeystrokeConfig {
    pub regular_ms: f64,
    pub fast_ms: f64,
    pub slow_ms: f64,
    pub round_share: f64,
}

impl Default for KeystrokeConfig {
    fn default() -> Self {
        Self {
            regular_ms: 15.0,
            fast_ms: 50.0,
            slow_ms: 400.0,
            round_share: 0.50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseConfig {
    pub max_speed_px_s: f64,
    pub perfect_precision: f64,
    pub distance_stddev_px: f64,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            max_speed_px_s: 8000.0,
            perfect_precision: 0.98,
            distance_stddev_px: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionTimingConfig {
    pub min_duration_s: f64,
    pub max_rate_ev_s: f64,
    pub interval_stddev_s: f64,
}

impl Default for SessionTimingConfig {
    fn default() -> Self {
        Self {
            min_duration_s: 5.0,
            max_rate_ev_s: 50.0,
            interval_stddev_s: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotResolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FraudWeights {
    pub ip: f64,
    pub device: f64,
    pub duplicate: f64,
    pub geo: f64,
    pub velocity: f64,
}

impl Default for FraudWeights {
    fn default() -> Self {
        Self {
            ip: 0.25,
            device: 0.25,
            duplicate: 0.20,
            geo: 0.15,
            velocity: 0.15,
        }
    }
}

impl FraudWeights {
    pub fn sum(&self) -> f64 {
        self.ip + self.device + self.duplicate + self.geo + self.velocity
    }

    pub fn is_valid(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-6
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityBand {
    pub per_hour: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub behavioral: f64,
    pub text: f64,
    pub fraud: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            behavioral: 0.40,
            text: 0.30,
            fraud: 0.30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBand {
    pub composite_ge: f64,
    pub level: RiskLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub straightline_share: f64,
    pub min_rows: usize,
    pub pattern_min_rows: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            straightline_share: 0.80,
            min_rows: 2,
            pattern_min_rows: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseTimingConfig {
    pub speeder_ms: u64,
    pub flatliner_ms: u64,
    pub anomaly_z: f64,
    pub adaptive_timing_enabled: bool,
    pub adaptive_k: f64,
}

impl Default for ResponseTimingConfig {
    fn default() -> Self {
        Self {
            speeder_ms: 2_000,
            flatliner_ms: 300_000,
            anomaly_z: 2.5,
            adaptive_timing_enabled: true,
            adaptive_k: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub min_event_count_keystroke: usize,
    pub min_event_count_timing: usize,
    pub min_event_count_mouse: usize,
    pub keystroke: KeystrokeConfig,
    pub mouse: MouseConfig,
    pub session_timing: SessionTimingConfig,
    pub bot_resolutions: Vec<BotResolution>,
    pub min_response_length_chars: usize,
    pub text_classifier_timeout_ms: u64,
    pub text_classifier_retries: u32,
    pub text_cache_capacity: usize,
    pub text_cache_ttl_s: u64,
    pub text_classifier_queue_capacity: usize,
    pub fraud_weights: FraudWeights,
    pub duplicate_threshold: f64,
    pub velocity_bands: Vec<VelocityBand>,
    pub composite_weights: CompositeWeights,
    pub composite_bot_threshold: f64,
    pub risk_bands: Vec<RiskBand>,
    pub grid: GridConfig,
    pub response_timing: ResponseTimingConfig,
    pub event_count_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_event_count_keystroke: 5,
            min_event_count_timing: 5,
            min_event_count_mouse: 3,
            keystroke: KeystrokeConfig::default(),
            mouse: MouseConfig::default(),
            session_timing: SessionTimingConfig::default(),
            bot_resolutions: vec![
                BotResolution { width: 1920, height: 1080 },
                BotResolution { width: 1366, height: 768 },
                BotResolution { width: 1280, height: 720 },
            ],
            min_response_length_chars: 10,
            text_classifier_timeout_ms: 10_000,
            text_classifier_retries: 3,
            text_cache_capacity: 10_000,
            text_cache_ttl_s: 86_400,
            text_classifier_queue_capacity: 32,
            fraud_weights: FraudWeights::default(),
            duplicate_threshold: 0.70,
            velocity_bands: vec![
                VelocityBand { per_hour: 20.0, score: 1.00 },
                VelocityBand { per_hour: 10.0, score: 0.80 },
                VelocityBand { per_hour: 5.0, score: 0.60 },
                VelocityBand { per_hour: 3.0, score: 0.40 },
            ],
            composite_weights: CompositeWeights::default(),
            composite_bot_threshold: 0.70,
            risk_bands: vec![
                RiskBand { composite_ge: 0.80, level: RiskLevel::Critical },
                RiskBand { composite_ge: 0.60, level: RiskLevel::High },
                RiskBand { composite_ge: 0.40, level: RiskLevel::Medium },
                RiskBand { composite_ge: 0.0, level: RiskLevel::Low },
            ],
            grid: GridConfig::default(),
            response_timing: ResponseTimingConfig::default(),
            event_count_cap: 10_000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Priority: explicit `BOTCHECK_CONFIG` env var, then the XDG config
    /// directory, then `~/.botcheck/config.toml`.
    pub fn default_path() -> PathBuf {
        if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(env_path);
        }
        if let Some(dir) = dirs::config_dir() {
            return dir.join("botcheck").join("config.toml");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".botcheck").join("config.toml");
        }
        PathBuf::from("botcheck.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fraud_weights.is_valid() {
            return Err(Error::Invalid(format!(
                "fraud_weights must sum to 1.0, got {}",
                self.fraud_weights.sum()
            )));
        }
        if self.composite_weights.behavioral + self.composite_weights.text + self.composite_weights.fraud
            - 1.0
            > 1e-6
        {
            return Err(Error::Invalid(
                "composite_weights must sum to 1.0".to_string(),
            ));
        }
        if self.risk_bands.is_empty() {
            return Err(Error::Invalid("risk_bands must not be empty".to_string()));
        }
        Ok(())
    }

    /// The risk level for a composite score, walking `risk_bands` in the
    /// configured (descending) order and taking the first match.
    pub fn risk_level_for(&self, composite_score: f64) -> RiskLevel {
        self.risk_bands
            .iter()
            .find(|band| composite_score >= band.composite_ge)
            .map(|band| band.level)
            .unwrap_or(RiskLevel::Low)
    }

    /// Discrete velocity-band score for a responses-per-hour rate.
    pub fn velocity_score_for(&self, per_hour: f64) -> f64 {
        self.velocity_bands
            .iter()
            .find(|band| per_hour >= band.per_hour)
            .map(|band| band.score)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_fraud_weights_sum_to_one() {
        assert!(Config::default().fraud_weights.is_valid());
    }

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn save_and_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::default();
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nonexistent.toml");
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn risk_level_walks_bands_in_descending_order() {
        let config = Config::default();
        assert_eq!(config.risk_level_for(0.85), RiskLevel::Critical);
        assert_eq!(config.risk_level_for(0.65), RiskLevel::High);
        assert_eq!(config.risk_level_for(0.45), RiskLevel::Medium);
        assert_eq!(config.risk_level_for(0.10), RiskLevel::Low);
    }

    #[test]
    fn velocity_score_picks_the_highest_matching_band() {
        let config = Config::default();
        assert_eq!(config.velocity_score_for(25.0), 1.00);
        assert_eq!(config.velocity_score_for(4.0), 0.40);
        assert_eq!(config.velocity_score_for(0.5), 0.0);
    }
}
