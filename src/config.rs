//! TOML configuration for the vipwatch daemon.
//!
//! Layered model with compiled-in defaults, environment variable override
//! for the config file path, and a standard filesystem location. Fusion
//! weights and the alert threshold live here deliberately: they are policy
//! parameters, and the shipped defaults are non-normative.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::FusionPolicy;
use crate::source::Platform;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for the vipwatch process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub monitoring: MonitoringConfig,
    pub scoring: ScoringConfig,
    pub assessor: AssessorConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Try to load configuration from, in order:
    /// 1. The path specified by the `VIPWATCH_CONFIG` environment variable.
    /// 2. `/etc/vipwatch/vipwatch.toml`.
    /// 3. Fall back to compiled-in defaults.
    pub fn load_or_default() -> Self {
        if let Ok(env_path) = std::env::var("VIPWATCH_CONFIG") {
            let path = Path::new(&env_path);
            match Self::load(path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "VIPWATCH_CONFIG set but file could not be loaded, trying fallback"
                    );
                }
            }
        }

        let system_path = Path::new("/etc/vipwatch/vipwatch.toml");
        if system_path.exists() {
            match Self::load(system_path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %system_path.display(),
                        error = %e,
                        "system config file exists but could not be loaded, using defaults"
                    );
                }
            }
        }

        debug!("no config file found, using compiled-in defaults");
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address and port for the dashboard API listener.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite alert database.
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "data/vipwatch.db".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Monitoring
// ---------------------------------------------------------------------------

/// Scan-loop and target configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Seconds between scan cycles.
    pub interval_secs: u64,
    /// Maximum posts pulled per platform per cycle.
    pub batch_size: usize,
    /// Platforms scanned each cycle.
    pub platforms: Vec<Platform>,
    /// Display name of the protected individual.
    pub vip_name: String,
    /// Primary handle of the protected individual.
    pub vip_handle: String,
    /// Search keywords handed to live feed clients (the mock feed ignores
    /// them and serves its roster directly).
    pub keywords: Vec<String>,
    /// References of official VIP imagery, matched by the image-misuse
    /// detector.
    pub official_image_refs: Vec<String>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            batch_size: 10,
            platforms: Platform::ALL.to_vec(),
            vip_name: "Celebrity VIP".to_string(),
            vip_handle: "@celebrityvip".to_string(),
            keywords: vec!["Celebrity VIP".to_string(), "@celebrityvip".to_string()],
            official_image_refs: vec![
                "img:official-headshot-2024".to_string(),
                "img:official-press-kit-2023".to_string(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Fusion policy parameters. See [`FusionPolicy`] for semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub toxicity_weight: f64,
    pub sentiment_weight: f64,
    pub fake_account_weight: f64,
    pub image_misuse_weight: f64,
    pub confidence_floor: f64,
    pub alert_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let policy = FusionPolicy::default();
        Self {
            toxicity_weight: policy.toxicity_weight,
            sentiment_weight: policy.sentiment_weight,
            fake_account_weight: policy.fake_account_weight,
            image_misuse_weight: policy.image_misuse_weight,
            confidence_floor: policy.confidence_floor,
            alert_threshold: policy.alert_threshold,
        }
    }
}

impl ScoringConfig {
    pub fn to_policy(&self) -> FusionPolicy {
        FusionPolicy {
            toxicity_weight: self.toxicity_weight,
            sentiment_weight: self.sentiment_weight,
            fake_account_weight: self.fake_account_weight,
            image_misuse_weight: self.image_misuse_weight,
            confidence_floor: self.confidence_floor,
            alert_threshold: self.alert_threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// Assessor
// ---------------------------------------------------------------------------

/// Semantic assessor endpoint configuration. Disabled by default: with no
/// endpoint the pipeline runs detector-only and stays deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessorConfig {
    pub enabled: bool,
    /// URL of the reasoning endpoint accepting the assessment contract.
    pub endpoint: String,
    /// Name of the environment variable holding the bearer token, if any.
    pub api_key_env: String,
    /// Hard deadline for one assessment call.
    pub timeout_secs: u64,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            api_key_env: "VIPWATCH_ASSESSOR_KEY".to_string(),
            timeout_secs: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum tracing level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
