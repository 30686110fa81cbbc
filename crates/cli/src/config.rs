//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SOLEMATE_SOURCE` - Where records live: `json` (default) or `rest`
//! - `SOLEMATE_DATA_DIR` - Directory of JSON record files (default: ./data)
//! - `SOLEMATE_CURRENCY_SYMBOL` - Symbol shown before amounts (default: £)
//! - `SOLEMATE_LOG_FORMAT` - `text` (default) or `json`
//!
//! ## Required when `SOLEMATE_SOURCE=rest`
//! - `SUPABASE_URL` - Project URL of the hosted backend
//! - `SUPABASE_ANON_KEY` - Public anon API key
//! - `SOLEMATE_USER_ID` - Auth user UUID whose records are read
//!
//! ## Optional when `SOLEMATE_SOURCE=rest`
//! - `SUPABASE_ACCESS_TOKEN` - User session JWT (row-level security); falls
//!   back to the anon key

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use solemate_core::UserId;

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_CURRENCY_SYMBOL: &str = "£";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Where records are read from (and written to, for JSON)
    pub source: SourceConfig,
    /// Currency symbol for text output
    pub currency_symbol: String,
    /// Log output format
    pub log_format: LogFormat,
}

/// Record source selection.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    /// JSON files in a local directory (read/write).
    Json { data_dir: PathBuf },
    /// Hosted backend REST API (read-only).
    Rest(RestConfig),
}

/// Hosted backend REST API configuration.
///
/// Implements `Debug` manually to redact the keys.
#[derive(Clone)]
pub struct RestConfig {
    /// Project base URL, always ending in `/`
    pub base_url: Url,
    /// Public anon API key
    pub anon_key: SecretString,
    /// Optional user session token used instead of the anon key for auth
    pub access_token: Option<SecretString>,
    /// User whose records are read
    pub user_id: UserId,
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the anon key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`CliConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let source = match env.get_or_default("SOLEMATE_SOURCE", "json").to_lowercase().as_str() {
            "json" => SourceConfig::Json {
                data_dir: PathBuf::from(env.get_or_default("SOLEMATE_DATA_DIR", DEFAULT_DATA_DIR)),
            },
            "rest" | "supabase" => SourceConfig::Rest(RestConfig::from_env(&env)?),
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "SOLEMATE_SOURCE".to_string(),
                    format!("expected 'json' or 'rest', got '{other}'"),
                ));
            }
        };

        let log_format = match env.get_or_default("SOLEMATE_LOG_FORMAT", "text").to_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "SOLEMATE_LOG_FORMAT".to_string(),
                    format!("expected 'text' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            source,
            currency_symbol: env.get_or_default("SOLEMATE_CURRENCY_SYMBOL", DEFAULT_CURRENCY_SYMBOL),
            log_format,
        })
    }
}

impl RestConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = env.required("SUPABASE_URL")?;
        let mut base_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let anon_key = env.required("SUPABASE_ANON_KEY")?;
        validate_not_placeholder(&anon_key, "SUPABASE_ANON_KEY")?;

        let user_id = env
            .required("SOLEMATE_USER_ID")?
            .parse::<UserId>()
            .map_err(|e| ConfigError::InvalidEnvVar("SOLEMATE_USER_ID".to_string(), e.to_string()))?;

        Ok(Self {
            base_url,
            anon_key: SecretString::from(anon_key),
            access_token: env.optional("SUPABASE_ACCESS_TOKEN").map(SecretString::from),
            user_id,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the usual required/optional/default accessors.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Reject values that are obviously copied from a template.
fn validate_not_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}
