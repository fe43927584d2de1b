use crate::codec::{CodecFormat, DEFAULT_MAX_NESTING_DEPTH, MAX_NESTING_DEPTH_CEILING};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Directory checked for a higher-priority `Settings.toml`
pub const CONFIG_DIR_ENV: &str = "SESSIONCODEC_CONFIG_DIR";

const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Toml(#[from] basic_toml::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub codec: CodecSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CodecSettings {
    pub format: CodecFormat,
    /// Deepest nesting of lists/maps accepted in session values
    pub max_nesting_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    /// How long a freshly created session lives before its deadline passes
    pub lifetime_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            format: CodecFormat::Json,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { lifetime_hours: 24 }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A settings file exists but cannot be read or parsed
    /// - The resulting settings fail validation
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);
        settings.validate()?;

        Self::init_logging(&settings.logging);
        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `SESSIONCODEC_CONFIG_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    fn load_base_settings() -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        let default_config_path = Path::new(SETTINGS_FILE);
        if default_config_path.exists() {
            settings = Self::from_file(default_config_path)?;
        }

        if let Ok(config_dir) = std::env::var(CONFIG_DIR_ENV) {
            let config_path = Path::new(&config_dir).join(SETTINGS_FILE);
            if config_path.exists() {
                settings = Self::from_file(&config_path)?;
            } else {
                log::debug!(
                    "{CONFIG_DIR_ENV} set but no {SETTINGS_FILE} found at: {}",
                    config_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a single TOML settings file; absent sections keep their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        let settings = basic_toml::from_str(&content)?;
        Ok(settings)
    }

    fn apply_env_overrides(settings: &mut Self) {
        Self::apply_codec_env_overrides(&mut settings.codec);
        Self::apply_session_env_overrides(&mut settings.session);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    /// Apply environment overrides for codec settings
    pub fn apply_codec_env_overrides(codec_settings: &mut CodecSettings) {
        if let Ok(format) = std::env::var("SESSION_CODEC") {
            match format.parse() {
                Ok(format) => codec_settings.format = format,
                Err(e) => log::warn!("Ignoring SESSION_CODEC: {e}"),
            }
        }
        if let Ok(depth) = std::env::var("SESSION_CODEC_MAX_DEPTH") {
            match depth.parse::<usize>() {
                Ok(depth) => codec_settings.max_nesting_depth = depth,
                Err(e) => log::warn!("Ignoring SESSION_CODEC_MAX_DEPTH '{depth}': {e}"),
            }
        }
    }

    /// Apply environment overrides for session settings
    pub fn apply_session_env_overrides(session_settings: &mut SessionSettings) {
        if let Ok(hours) = std::env::var("SESSION_LIFETIME_HOURS") {
            match hours.parse::<u64>() {
                Ok(hours) => session_settings.lifetime_hours = hours,
                Err(e) => log::warn!("Ignoring SESSION_LIFETIME_HOURS '{hours}': {e}"),
            }
        }
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Check ranges that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` naming the offending field
    pub fn validate(&self) -> Result<(), SettingsError> {
        let depth = self.codec.max_nesting_depth;
        if depth == 0 || depth > MAX_NESTING_DEPTH_CEILING {
            return Err(SettingsError::Invalid(format!(
                "codec.max_nesting_depth must be between 1 and {MAX_NESTING_DEPTH_CEILING}, got {depth}"
            )));
        }
        if self.session.lifetime_hours == 0 {
            return Err(SettingsError::Invalid(
                "session.lifetime_hours must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Initialise `env_logger` at the configured level; a second call is a no-op
    fn init_logging(logging: &LoggingSettings) {
        let _ = env_logger::Builder::new()
            .parse_filters(&logging.level)
            .try_init();
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    if std::env::var_os(key.trim()).is_none() {
                        std::env::set_var(key.trim(), value.trim());
                    }
                }
            }
        }
    }
}
