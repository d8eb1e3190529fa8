use pairing_core::economy::EconomyConfig;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_DATA_DIR: &str = "files";

/// Root event configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EventConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Seed for bye and pairing draws. Unset means a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            seed: None,
            economy: EconomyConfig::default(),
            outputs: OutputsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EventConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: EventConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "data_dir".to_string(),
                message: "path must not be empty".to_string(),
            });
        }

        if self.economy.chip_value == 0 {
            return Err(ValidationError::InvalidField {
                field: "economy.chip_value".to_string(),
                message: "chip value must be greater than zero".to_string(),
            });
        }

        self.outputs.validate()?;
        self.logging.normalize();
        if self.logging.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.logging.tracing_level),
            });
        }
        Ok(())
    }

    /// Paths of the flat files and optional outputs, relative to `data_dir`
    /// unless given as absolute paths.
    pub fn resolved_paths(&self) -> ResolvedPaths {
        ResolvedPaths {
            players: self.data_dir.join("players.txt"),
            rounds: self.data_dir.join("rounds.txt"),
            byes: self.data_dir.join("byes.txt"),
            round_log: self
                .outputs
                .round_log
                .as_ref()
                .map(|path| self.data_dir.join(path)),
            telemetry: self.data_dir.join("telemetry.jsonl"),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

/// Optional artifacts written alongside the flat files.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct OutputsConfig {
    /// JSON-lines log with one row per started round.
    #[serde(default)]
    pub round_log: Option<PathBuf>,
}

impl OutputsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(path) = &self.round_log
            && path.as_os_str().is_empty()
        {
            return Err(ValidationError::InvalidField {
                field: "outputs.round_log".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging defaults to warnings on stderr.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

/// Fully resolved file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub players: PathBuf,
    pub rounds: PathBuf,
    pub byes: PathBuf,
    pub round_log: Option<PathBuf>,
    pub telemetry: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
