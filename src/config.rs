//! Scheduler configuration.
//!
//! Values are resolved per field with priority: config.toml > environment >
//! built-in default. The result is an immutable [`SchedulerConfig`] built once
//! at startup and handed to the scheduler.

use serde::Deserialize;
use std::path::Path;

use crate::domain::DeckStepConfig;

// ==================== Defaults ====================

/// Target probability of recall at the moment a card comes due
pub const DEFAULT_DESIRED_RETENTION: f64 = 0.9;

/// Longest interval ever scheduled, in days
pub const DEFAULT_MAXIMUM_INTERVAL: u32 = 36500;

/// Learning steps in minutes: 1min → 10min → graduate
pub const DEFAULT_LEARNING_STEPS: [u32; 2] = [1, 10];

/// Relearning steps in minutes after a lapse
pub const DEFAULT_RELEARNING_STEPS: [u32; 1] = [10];

pub const CONFIG_FILE: &str = "config.toml";

pub const ENV_DESIRED_RETENTION: &str = "SRS_DESIRED_RETENTION";
pub const ENV_MAXIMUM_INTERVAL: &str = "SRS_MAXIMUM_INTERVAL";
pub const ENV_ENABLE_FUZZ: &str = "SRS_ENABLE_FUZZ";

// ==================== Types ====================

/// Global memory-model parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerParams {
    pub desired_retention: f64,
    pub maximum_interval: u32,
    pub enable_fuzz: bool,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            desired_retention: DEFAULT_DESIRED_RETENTION,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            enable_fuzz: true,
        }
    }
}

impl SchedulerParams {
    /// Same parameters with fuzz switched off, for reproducible intervals
    pub fn without_fuzz(self) -> Self {
        Self {
            enable_fuzz: false,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.desired_retention > 0.0 && self.desired_retention < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "desired_retention must be between 0 and 1, got {}",
                self.desired_retention
            )));
        }
        if self.maximum_interval == 0 {
            return Err(ConfigError::Invalid(
                "maximum_interval must be at least 1 day".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything the scheduler needs from configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchedulerConfig {
    pub params: SchedulerParams,
    /// Step ladders for decks without their own settings
    pub default_steps: DeckStepConfig,
}

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    scheduler: Option<FileSchedulerSection>,
    steps: Option<FileStepsSection>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSchedulerSection {
    desired_retention: Option<f64>,
    maximum_interval: Option<u32>,
    enable_fuzz: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct FileStepsSection {
    learning: Option<Vec<u32>>,
    relearning: Option<Vec<u32>>,
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(String, String),
    Parse(String, String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, err) => write!(f, "IO error reading {}: {}", path, err),
            ConfigError::Parse(path, err) => write!(f, "Parse error in {}: {}", path, err),
            ConfigError::Invalid(err) => write!(f, "Invalid scheduler configuration: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

// ==================== Loading ====================

/// Load scheduler configuration from ./config.toml and the environment
pub fn load_scheduler_config() -> Result<SchedulerConfig, ConfigError> {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    load_scheduler_config_from(Path::new(CONFIG_FILE))
}

/// Load scheduler configuration from a specific file (missing file = defaults)
pub fn load_scheduler_config_from(path: &Path) -> Result<SchedulerConfig, ConfigError> {
    let file = read_config_file(path)?;
    resolve(file, |key| std::env::var(key).ok())
}

fn read_config_file(path: &Path) -> Result<Option<FileConfig>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No {} found, using environment and defaults", path.display());
            return Ok(None);
        }
        Err(e) => return Err(ConfigError::Io(path.display().to_string(), e.to_string())),
    };

    let config = toml::from_str::<FileConfig>(&contents)
        .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))?;
    tracing::info!("Using scheduler settings from {}", path.display());
    Ok(Some(config))
}

fn resolve(
    file: Option<FileConfig>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SchedulerConfig, ConfigError> {
    let file = file.unwrap_or_default();
    let scheduler = file.scheduler.unwrap_or_default();
    let steps = file.steps.unwrap_or_default();

    let params = SchedulerParams {
        desired_retention: pick(scheduler.desired_retention, ENV_DESIRED_RETENTION, &env)?
            .unwrap_or(DEFAULT_DESIRED_RETENTION),
        maximum_interval: pick(scheduler.maximum_interval, ENV_MAXIMUM_INTERVAL, &env)?
            .unwrap_or(DEFAULT_MAXIMUM_INTERVAL),
        enable_fuzz: pick(scheduler.enable_fuzz, ENV_ENABLE_FUZZ, &env)?.unwrap_or(true),
    };
    params.validate()?;

    let default_steps = DeckStepConfig::new(
        steps.learning.unwrap_or_else(|| DEFAULT_LEARNING_STEPS.to_vec()),
        steps.relearning.unwrap_or_else(|| DEFAULT_RELEARNING_STEPS.to_vec()),
    );
    default_steps
        .validate()
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

    Ok(SchedulerConfig {
        params,
        default_steps,
    })
}

/// File value if present, otherwise the parsed environment variable
fn pick<T: std::str::FromStr>(
    from_file: Option<T>,
    key: &str,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<Option<T>, ConfigError> {
    if from_file.is_some() {
        return Ok(from_file);
    }
    match env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{}={} is not a valid value", key, raw))),
        None => Ok(None),
    }
}
