//! Configuration file parser for ~/.config/horizon/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde and reported with a warning.
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Default model asked for briefings.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Production endpoint of the Gemini REST API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variables consulted for the API key, in priority order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

const KNOWN_KEYS: [&str; 7] = [
    "theme",
    "gemini_api_key",
    "gemini_model",
    "gemini_base_url",
    "articles_per_request",
    "temperature",
    "keybindings",
];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// Every field has a default, so any subset of keys can be given.
/// `Debug` masks `gemini_api_key`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme used until the user toggles one: "dark" or "light".
    pub theme: String,

    /// Gemini API key. `GEMINI_API_KEY` / `API_KEY` take precedence.
    pub gemini_api_key: Option<String>,

    pub gemini_model: String,

    /// Override for the API origin. Must be HTTPS unless it is loopback.
    pub gemini_base_url: Option<String>,

    /// Number of articles requested per category.
    pub articles_per_request: u32,

    /// Sampling temperature sent with each request.
    pub temperature: f32,

    /// Keybinding overrides: action name to key string.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: None,
            articles_per_request: 3,
            temperature: 0.7,
            keybindings: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("theme", &self.theme)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("articles_per_request", &self.articles_per_request)
            .field("temperature", &self.temperature)
            .field("keybindings", &self.keybindings)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Upper bound on `articles_per_request`.
    const MAX_ARTICLES_PER_REQUEST: u32 = 20;

    /// Load configuration from a TOML file.
    ///
    /// - Missing or blank file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line information
    /// - Out-of-range numbers → `Err(ConfigError::Invalid)`
    /// - Unknown keys → accepted, logged as a warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse config text. Blank input yields the defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        tracing::info!(
            theme = %config.theme,
            model = %config.gemini_model,
            "Loaded configuration"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.articles_per_request == 0
            || self.articles_per_request > Self::MAX_ARTICLES_PER_REQUEST
        {
            return Err(ConfigError::Invalid(format!(
                "articles_per_request must be between 1 and {}, got {}",
                Self::MAX_ARTICLES_PER_REQUEST,
                self.articles_per_request
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.gemini_model.trim().is_empty() {
            return Err(ConfigError::Invalid("gemini_model must not be empty".into()));
        }
        Ok(())
    }

    /// Resolve the API key from the process environment, then the file.
    pub fn api_key(&self) -> Option<SecretString> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::api_key`] with an injectable environment lookup.
    pub fn api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<SecretString> {
        API_KEY_ENV_VARS
            .iter()
            .find_map(|name| env(name).filter(|v| !v.trim().is_empty()))
            .or_else(|| {
                self.gemini_api_key
                    .clone()
                    .filter(|v| !v.trim().is_empty())
            })
            .map(SecretString::from)
    }

    /// API origin, falling back to the production endpoint.
    pub fn base_url(&self) -> &str {
        self.gemini_base_url
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_BASE_URL)
    }
}

// ============================================================================
// Tests
// ============================================================================
