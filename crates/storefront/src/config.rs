//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SMTP_HOST` - SMTP relay hostname
//! - `SMTP_USER` - SMTP authentication username
//! - `SMTP_PASS` - SMTP authentication password (app password, high entropy)
//! - `CEO_EMAIL` - Merchant address receiving order and contact notifications
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3002)
//! - `STATIC_DIR` - Public site directory (default: crates/storefront/static)
//! - `DATA_DIR` - Directory served under `/data` (default: crates/storefront/data)
//! - `ALLOW_ORIGIN` - Comma-separated CORS origins (default: any origin)
//! - `RATE_LIMIT_ENABLED` - Rate limit `/api` routes (default: true)
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `SMTP_SECURE` - `true` for implicit TLS (port 465), otherwise STARTTLS
//! - `FROM_EMAIL` - From header (default: `SMTP_USER`)
//! - `SHOP_NAME` - Shop name used in emails (default: Youm's Interior)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use boutique_core::Email;
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the public site (HTML, CSS, JS, images)
    pub static_dir: PathBuf,
    /// Directory served under `/data` (catalog JSON)
    pub data_dir: PathBuf,
    /// Origins allowed by CORS; empty means any origin
    pub allowed_origins: Vec<String>,
    /// Whether `/api` routes are rate limited per client IP
    pub rate_limit_enabled: bool,
    /// Outgoing email configuration
    pub email: EmailConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// SMTP and addressing configuration for notifications.
///
/// Implements `Debug` manually to redact the SMTP password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// Use implicit TLS instead of STARTTLS
    pub smtp_secure: bool,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
    /// Merchant address receiving order and contact notifications
    pub merchant_address: String,
    /// Shop name shown in email bodies and subjects
    pub shop_name: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_secure", &self.smtp_secure)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("merchant_address", &self.merchant_address)
            .field("shop_name", &self.shop_name)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the SMTP password fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let rate_limit_enabled = parse_bool("RATE_LIMIT_ENABLED", true)?;

        Ok(Self {
            host,
            port,
            static_dir: get_env_or_default("STATIC_DIR", "crates/storefront/static").into(),
            data_dir: get_env_or_default("DATA_DIR", "crates/storefront/data").into(),
            allowed_origins: parse_origins(get_optional_env("ALLOW_ORIGIN").as_deref()),
            rate_limit_enabled,
            email: EmailConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;
        let smtp_username = get_required_env("SMTP_USER")?;

        Ok(Self {
            smtp_host: get_required_env("SMTP_HOST")?,
            smtp_port,
            smtp_secure: parse_bool("SMTP_SECURE", false)?,
            from_address: get_optional_env("FROM_EMAIL").unwrap_or_else(|| smtp_username.clone()),
            smtp_username,
            smtp_password: get_validated_secret("SMTP_PASS")?,
            merchant_address: parse_email("CEO_EMAIL", &get_required_env("CEO_EMAIL")?)?,
            shop_name: get_env_or_default("SHOP_NAME", "Youm's Interior"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a boolean flag (`true`/`false`/`1`/`0`).
fn parse_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    match get_optional_env(key) {
        None => Ok(default),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected true or false, got '{other}'"),
            )),
        },
    }
}

/// Check that `value` is a usable email address.
fn parse_email(key: &str, value: &str) -> Result<String, ConfigError> {
    Email::parse(value)
        .map(String::from)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
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
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a generated app password."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email_config() -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_secure: false,
            smtp_username: "boutique@example.com".to_string(),
            smtp_password: SecretString::from("super_secret_smtp_pass"),
            from_address: "boutique@example.com".to_string(),
            merchant_address: "ceo@example.com".to_string(),
            shop_name: "Youm's Interior".to_string(),
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-smtp-password", "SMTP_PASS");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaa", "SMTP_PASS");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_app_password() {
        // Gmail-style app password
        assert!(validate_secret_strength("qwer tyui opas dfgh", "SMTP_PASS").is_ok());
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#", "SMTP_PASS").is_ok());
    }

    #[test]
    fn test_parse_email_rejects_typos() {
        assert_eq!(
            parse_email("CEO_EMAIL", " ceo@youms.example ").unwrap(),
            "ceo@youms.example"
        );

        let err = parse_email("CEO_EMAIL", "ceo.youms.example").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CEO_EMAIL"));
    }

    #[test]
    fn test_parse_origins() {
        assert!(parse_origins(None).is_empty());
        assert_eq!(
            parse_origins(Some("http://localhost:5500, https://youms.example ,")),
            vec!["http://localhost:5500", "https://youms.example"]
        );
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3002,
            static_dir: "static".into(),
            data_dir: "data".into(),
            allowed_origins: Vec::new(),
            rate_limit_enabled: false,
            email: email_config(),
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3002);
    }

    #[test]
    fn test_email_config_debug_redacts_password() {
        let debug_output = format!("{:?}", email_config());

        assert!(debug_output.contains("smtp.example.com"));
        assert!(debug_output.contains("ceo@example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_smtp_pass"));
    }
}
