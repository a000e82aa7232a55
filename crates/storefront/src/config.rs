//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ROCKETSHOES_API_URL` - Catalog/stock API base URL (default: `http://localhost:3333`)
//! - `ROCKETSHOES_DATA_DIR` - Directory holding the durable cart slot (default: `.rocketshoes`)
//! - `ROCKETSHOES_HTTP_TIMEOUT_SECS` - Request timeout for all API clients (default: 10)
//! - `PRISMIC_API_ENDPOINT` - Content API endpoint (enables the blog client)
//! - `PRISMIC_ACCESS_TOKEN` - Content API access token
//! - `UPFI_API_URL` - Image gallery API base URL (enables the gallery client)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `LOG_FORMAT` - `json` for JSON log lines, anything else for human-readable output

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_DATA_DIR: &str = ".rocketshoes";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

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

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog and stock API
    pub catalog: CatalogConfig,
    /// Directory holding the durable key-value slots
    pub data_dir: PathBuf,
    /// Content API, if configured
    pub content: Option<ContentConfig>,
    /// Image gallery API, if configured
    pub gallery: Option<GalleryConfig>,
    /// Logging and error tracking
    pub telemetry: TelemetryConfig,
}

/// Catalog/stock API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

/// Headless content API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ContentConfig {
    /// Repository API endpoint (e.g., `https://my-blog.cdn.prismic.io/api/v2`)
    pub endpoint: Url,
    /// Access token for private repositories
    pub access_token: Option<SecretString>,
    pub timeout: Duration,
}

impl std::fmt::Debug for ContentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Image gallery API configuration.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging and error tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub log_format: LogFormat,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or the access token
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let timeout_secs = env
            .or_default(
                "ROCKETSHOES_HTTP_TIMEOUT_SECS",
                &DEFAULT_TIMEOUT_SECS.to_string(),
            )
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ROCKETSHOES_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let timeout = Duration::from_secs(timeout_secs);

        let catalog = CatalogConfig {
            base_url: parse_url(
                "ROCKETSHOES_API_URL",
                &env.or_default("ROCKETSHOES_API_URL", DEFAULT_API_URL),
            )?,
            timeout,
        };

        let data_dir = PathBuf::from(env.or_default("ROCKETSHOES_DATA_DIR", DEFAULT_DATA_DIR));

        let content = match env.optional("PRISMIC_API_ENDPOINT") {
            Some(endpoint) => Some(ContentConfig {
                endpoint: parse_url("PRISMIC_API_ENDPOINT", &endpoint)?,
                access_token: env
                    .optional("PRISMIC_ACCESS_TOKEN")
                    .map(|token| validated_secret(token, "PRISMIC_ACCESS_TOKEN"))
                    .transpose()?,
                timeout,
            }),
            None => None,
        };

        let gallery = env
            .optional("UPFI_API_URL")
            .map(|url| {
                Ok::<_, ConfigError>(GalleryConfig {
                    base_url: parse_url("UPFI_API_URL", &url)?,
                    timeout,
                })
            })
            .transpose()?;

        let telemetry = TelemetryConfig {
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            log_format: match env.optional("LOG_FORMAT").as_deref() {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(Self {
            catalog,
            data_dir,
            content,
            gallery,
            telemetry,
        })
    }

    /// Returns the content configuration or an error naming the missing variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if the content API is not configured.
    pub fn require_content(&self) -> Result<&ContentConfig, ConfigError> {
        self.content
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("PRISMIC_API_ENDPOINT".to_string()))
    }

    /// Returns the gallery configuration or an error naming the missing variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if the gallery API is not configured.
    pub fn require_gallery(&self) -> Result<&GalleryConfig, ConfigError> {
        self.gallery
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("UPFI_API_URL".to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Parse a base URL, making sure it ends with a slash so `Url::join` appends.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

fn validated_secret(value: String, var_name: &str) -> Result<SecretString, ConfigError> {
    validate_secret_strength(&value, var_name)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.catalog.base_url.as_str(), "http://localhost:3333/");
        assert_eq!(config.catalog.timeout, Duration::from_secs(10));
        assert_eq!(config.data_dir, PathBuf::from(".rocketshoes"));
        assert!(config.content.is_none());
        assert!(config.gallery.is_none());
        assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = StorefrontConfig::from_lookup(lookup(&[(
            "ROCKETSHOES_API_URL",
            "http://api.local:8080/v1",
        )]))
        .unwrap();

        assert_eq!(config.catalog.base_url.as_str(), "http://api.local:8080/v1/");
        assert_eq!(
            config.catalog.base_url.join("stock/1").unwrap().as_str(),
            "http://api.local:8080/v1/stock/1"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = StorefrontConfig::from_lookup(lookup(&[("UPFI_API_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "UPFI_API_URL"));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = StorefrontConfig::from_lookup(lookup(&[(
            "ROCKETSHOES_HTTP_TIMEOUT_SECS",
            "soon",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_require_content_missing() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        let err = config.require_content().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: PRISMIC_API_ENDPOINT"
        );
    }

    #[test]
    fn test_json_log_format() {
        let config = StorefrontConfig::from_lookup(lookup(&[("LOG_FORMAT", "JSON")])).unwrap();
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = StorefrontConfig::from_lookup(lookup(&[
            ("PRISMIC_API_ENDPOINT", "https://blog.cdn.prismic.io/api/v2"),
            ("PRISMIC_ACCESS_TOKEN", "your-access-token"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_content_config_debug_redacts_token() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("PRISMIC_API_ENDPOINT", "https://blog.cdn.prismic.io/api/v2"),
            ("PRISMIC_ACCESS_TOKEN", "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6"),
        ]))
        .unwrap();

        let content = config.require_content().unwrap();
        assert_eq!(
            content.endpoint.as_str(),
            "https://blog.cdn.prismic.io/api/v2/"
        );

        let debug_output = format!("{content:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("aB3$xY9"));
    }
}
