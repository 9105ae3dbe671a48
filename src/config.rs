use std::{path::PathBuf, sync::OnceLock};

use config::{Config, Environment, File};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The configuration has already been initialized")]
    ConfigAlreadyInitialized,

    #[error("Unable to read the configuration: {0}")]
    UnableToReadConfig(#[from] config::ConfigError),
}

/// Configuration of the rules engine and its command line driver.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct ChessgridConfig {
    /// Number of threads to use for the perft command
    pub perft_threads: usize,

    /// Filter directives for the log output, used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for ChessgridConfig {
    fn default() -> Self {
        Self { perft_threads: 1, log_filter: "warn".to_string() }
    }
}

static CONFIG: OnceLock<ChessgridConfig> = OnceLock::new();

/// Get the configuration, or the default configuration if it was never initialized.
pub fn get_config() -> &'static ChessgridConfig {
    CONFIG.get_or_init(ChessgridConfig::default)
}

/// Reads the configuration from the defaults, an optional file and `CHESSGRID_*` environment variables, in that
/// order of precedence.
///
/// # Errors
/// * `ConfigError::UnableToReadConfig` - If the file cannot be read or a value has the wrong type
pub fn load(path: Option<PathBuf>) -> Result<ChessgridConfig, ConfigError> {
    let defaults = ChessgridConfig::default();
    let mut builder = Config::builder()
        .set_default("perft_threads", defaults.perft_threads as u64)?
        .set_default("log_filter", defaults.log_filter)?;
    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }

    let settings = builder.add_source(Environment::with_prefix("CHESSGRID")).build()?;
    Ok(settings.try_deserialize()?)
}

/// Initialize the configuration.
///
/// # Errors
/// * `ConfigError::UnableToReadConfig` - If the configuration cannot be read
/// * `ConfigError::ConfigAlreadyInitialized` - If the configuration was already initialized or read
pub fn initialize(path: Option<PathBuf>) -> Result<(), ConfigError> {
    let config = load(path)?;
    CONFIG.set(config).map_err(|_| ConfigError::ConfigAlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = load(None).unwrap();
        assert_eq!(config, ChessgridConfig::default());
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("chessgrid-config-{}.toml", std::process::id()));
        std::fs::write(&path, "perft_threads = 4\n").unwrap();

        let config = load(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.perft_threads, 4);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("chessgrid-missing-config.toml");
        assert!(matches!(load(Some(path)), Err(ConfigError::UnableToReadConfig(_))));
    }
}
