//! `lq` configuration.
//!
//! Resolution order for the file: `--config`, then `LEARNQUEST_CONFIG`, then
//! `.learnquest/config.toml` when it exists. A missing default file means
//! defaults. `LEARNQUEST_DB_PATH` overrides `db_path` from any source.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = ".learnquest/config.toml";
pub const DEFAULT_DB_PATH: &str = ".learnquest/learnquest.db";
pub const DEFAULT_LOG_FILTER: &str = "lq=info,lq_core=info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub db_path: String,
    /// Balance seeded into newly created profiles.
    pub starting_tokens: u32,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            starting_tokens: 1000,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Environment inputs, captured once so loading stays testable.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub config_path: Option<PathBuf>,
    pub db_path: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            config_path: std::env::var_os("LEARNQUEST_CONFIG").map(PathBuf::from),
            db_path: std::env::var("LEARNQUEST_DB_PATH")
                .ok()
                .filter(|value| !value.trim().is_empty()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    pub fn load(explicit: Option<&Path>, env: &EnvOverrides) -> Result<Self, ConfigError> {
        let requested = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.config_path.clone());
        let mut config = match requested {
            Some(path) => Self::from_file(&path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        if let Some(db_path) = &env.db_path {
            config.db_path = db_path.clone();
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
