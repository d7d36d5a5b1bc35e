use super::Config;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    /// Read `path`, or `~/.ologstyle/config.toml` (created with defaults on
    /// first run) when no path is given. Env overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load_or_init()?,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let ologstyle_dir = home.join(".ologstyle");
        let config_path = ologstyle_dir.join("config.toml");

        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        fs::create_dir_all(&ologstyle_dir)
            .map_err(ConfigError::Io)
            .context("Failed to create .ologstyle directory")?;
        let config = Self {
            config_path,
            ..Self::default()
        };
        config.save()?;
        tracing::info!(path = %config.config_path.display(), "wrote default config");
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(ConfigError::Io)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        config.config_path = path.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str)
            .map_err(ConfigError::Io)
            .context("Failed to write config file")?;
        Ok(())
    }
}
