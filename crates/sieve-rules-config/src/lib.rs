use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid script_glob {pattern:?}: {source}")]
    InvalidScriptGlob {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Invalid format.indent {0}: must be between 1 and {MAX_INDENT}")]
    InvalidIndent(usize),
}

pub const DEFAULT_SCRIPT_GLOB: &str = "*.sieve";
pub const DEFAULT_INDENT: usize = 4;
pub const MAX_INDENT: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub scripts_path: PathBuf,
    /// Which files under `scripts_path` count as scripts
    #[serde(default = "default_script_glob")]
    pub script_glob: String,
    #[serde(default)]
    pub format: FormatConfig,
}

/// How generated rules are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

fn default_script_glob() -> String {
    DEFAULT_SCRIPT_GLOB.to_string()
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl Config {
    pub fn new(scripts_path: impl Into<PathBuf>) -> Self {
        Self {
            scripts_path: scripts_path.into(),
            script_glob: default_script_glob(),
            format: FormatConfig::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded scripts path
        config.scripts_path =
            Self::expand_path(&config.scripts_path).unwrap_or(config.scripts_path);
        config.validate()?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/sieve-rules");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Check the values serde can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        glob::Pattern::new(&self.script_glob).map_err(|source| {
            ConfigError::InvalidScriptGlob {
                pattern: self.script_glob.clone(),
                source,
            }
        })?;

        if !(1..=MAX_INDENT).contains(&self.format.indent) {
            return Err(ConfigError::InvalidIndent(self.format.indent));
        }

        Ok(())
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
