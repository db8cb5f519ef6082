use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AiSettings, AuthSettings, Config, LoggingSettings, ServerSettings, StorageSettings,
};

/// The file read when no explicit path is given. It may be absent.
pub const DEFAULT_CONFIG_FILE: &str = "journal.toml";

/// Environment variables checked, in order, when no API key is configured.
const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file at `path`
/// (or `journal.toml`; a missing file is fine), then `JOURNAL_*` environment
/// variables using `__` between section and key, e.g. `JOURNAL_SERVER__PORT=8080`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("JOURNAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let mut config = builder.try_deserialize::<Config>()?;

    if config.ai.api_key.is_empty() {
        if let Some(key) = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        {
            config.ai.api_key = key;
        }
    }

    config.validate()?;
    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.username.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.username must not be empty".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than zero".to_string(),
            ));
        }
        if self.ai.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "ai.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
