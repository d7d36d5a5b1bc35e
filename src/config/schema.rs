use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use directories::UserDirs;

use crate::core::olog::{PRESETS, SpecLoader, StyleParams};
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,
    #[serde(default)]
    pub spec: SpecConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecConfig {
    /// Olog document used when `--spec` is not given. `~` is expanded.
    #[serde(default)]
    pub path: Option<String>,
    /// Explicit intentionality document; overrides discovery.
    #[serde(default)]
    pub intentionality: Option<String>,
    /// Look for `<stem>_intentionality.<ext>` beside the olog.
    #[serde(default = "default_true")]
    pub discover_intentionality: bool,
}

impl Default for SpecConfig {
    fn default() -> Self {
        Self {
            path: None,
            intentionality: None,
            discover_intentionality: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Treat any coherence violation as a failed transformation.
    #[serde(default)]
    pub strict: bool,
    /// Style parameters merged under every request's own parameters.
    #[serde(default)]
    pub default_params: BTreeMap<String, f64>,
    #[serde(default = "default_variant_count")]
    pub variant_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict: false,
            default_params: BTreeMap::new(),
            variant_count: default_variant_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_variant_count() -> usize {
    3
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        Self {
            config_path: home.join(".ologstyle").join("config.toml"),
            spec: SpecConfig::default(),
            engine: EngineConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

impl Config {
    pub fn spec_path(&self) -> Option<PathBuf> {
        self.spec.path.as_deref().map(expand)
    }

    /// Loader honouring the intentionality settings.
    pub fn spec_loader(&self) -> SpecLoader {
        match (&self.spec.intentionality, self.spec.discover_intentionality) {
            (Some(path), _) => SpecLoader::new().with_intentionality(expand(path)),
            (None, true) => SpecLoader::new(),
            (None, false) => SpecLoader::new().without_intentionality(),
        }
    }

    pub fn log_level(&self) -> Result<tracing::Level, ConfigError> {
        tracing::Level::from_str(self.logging.level.trim()).map_err(|_| {
            ConfigError::Validation(format!(
                "logging.level `{}` is not one of trace, debug, info, warn, error",
                self.logging.level
            ))
        })
    }

    /// `request` on top of the configured defaults.
    pub fn merged_params(&self, request: &StyleParams) -> StyleParams {
        let mut merged = self.engine.default_params.clone();
        merged.extend(request.iter().map(|(k, v)| (k.clone(), *v)));
        merged
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level()?;
        for (name, value) in &self.engine.default_params {
            if !value.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "engine.default_params.{name} must be a finite number"
                )));
            }
        }
        if !(1..=PRESETS.len()).contains(&self.engine.variant_count) {
            return Err(ConfigError::Validation(format!(
                "engine.variant_count must be between 1 and {}",
                PRESETS.len()
            )));
        }
        Ok(())
    }
}
