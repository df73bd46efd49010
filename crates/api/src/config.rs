//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `JWT_SECRET` - HS256 signing secret shared with the identity provider (min 32 chars, high entropy)
//! - `JWT_ISSUER` - Expected `iss` claim
//! - `OTELIER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`;
//!   not needed when `OTELIER_STORAGE=memory`)
//!
//! ## Optional
//! - `OTELIER_STORAGE` - `postgres` (default) or `memory`
//! - `OTELIER_HOST` - Bind address (default: 127.0.0.1)
//! - `OTELIER_PORT` - Listen port (default: 8080)
//! - `JWT_AUDIENCE` - Expected `aud` claim (audience is not checked when unset)
//! - `JWT_ROLE_CLAIM` - Where the role lives in the token: `auto` (default), `role`, `roles`, `app_metadata`
//! - `HOTEL_ACCESS_POLICY` - `assignment` (default) or `employee` (legacy single-hotel staff)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! ## Optional (notifications)
//! - `SLACK_WEBHOOK_URL` - Slack incoming webhook for new-booking messages
//! - `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM`,
//!   `NOTIFICATION_SUPPORT_EMAIL` - Email notifications (all or none)
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `NOTIFY_QUEUE_CAPACITY` - Pending notification jobs (default: 256)
//! - `NOTIFY_MAX_ATTEMPTS` - Delivery attempts per job (default: 3)
//! - `NOTIFY_BACKOFF_MS` - Base retry delay, doubled per attempt (default: 500)
//! - `NOTIFY_ATTEMPT_TIMEOUT_MS` - Limit for a single delivery attempt (default: 10000)
//!
//! ## Optional (TLS)
//! - `OTELIER_TLS_CERT` - PEM-encoded certificate chain
//! - `OTELIER_TLS_KEY` - PEM-encoded private key

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::auth::RoleClaimMode;
use crate::services::AccessPolicy;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

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

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Storage backend
    pub storage: StorageConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Access token verification
    pub jwt: JwtConfig,
    /// How hotel access is decided
    pub access_policy: AccessPolicy,
    /// Slack webhook notifications (optional)
    pub slack: Option<SlackConfig>,
    /// Email notifications (optional)
    pub email: Option<EmailConfig>,
    /// Notification queue tuning
    pub notifications: NotificationConfig,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// Storage backend selection.
#[derive(Clone)]
pub enum StorageConfig {
    /// `PostgreSQL` via sqlx.
    Postgres {
        /// Connection URL (contains password)
        database_url: SecretString,
    },
    /// Process-local store, lost on restart. For local development.
    Memory,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"[REDACTED]")
                .finish(),
            Self::Memory => f.write_str("Memory"),
        }
    }
}

/// Access token verification settings.
///
/// Implements `Debug` manually to redact the signing secret.
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 shared secret
    pub secret: SecretString,
    /// Expected `iss` claim
    pub issuer: String,
    /// Expected `aud` claim, if any
    pub audience: Option<String>,
    /// Where the caller's role is read from
    pub role_claim: RoleClaimMode,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("role_claim", &self.role_claim)
            .finish()
    }
}

/// Slack incoming webhook configuration.
///
/// The webhook URL is itself the credential, so it is kept secret.
#[derive(Clone)]
pub struct SlackConfig {
    /// Incoming webhook URL
    pub webhook_url: SecretString,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("webhook_url", &"[REDACTED]")
            .finish()
    }
}

/// Email (SMTP) configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP authentication username
    pub smtp_username: String,
    /// SMTP authentication password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
    /// Recipient of new-booking notifications
    pub support_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("support_address", &self.support_address)
            .finish()
    }
}

/// Notification queue settings.
#[derive(Debug, Clone, Copy)]
pub struct NotificationConfig {
    /// Maximum queued jobs before new ones are dropped
    pub queue_capacity: usize,
    /// Delivery attempts per job (at least 1)
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each attempt
    pub base_backoff: Duration,
    /// A delivery attempt running longer than this counts as failed
    pub attempt_timeout: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            max_attempts: 3,
            base_backoff: Duration::from_millis(500),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

/// Source of configuration values, keyed by variable name.
///
/// Production reads the process environment; tests pass a map.
trait Env {
    fn get(&self, key: &str) -> Option<String>;
}

struct ProcessEnv;

impl Env for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Env for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::load(&ProcessEnv)
    }

    /// Load configuration from an explicit set of variables.
    ///
    /// # Errors
    ///
    /// Same as [`ApiConfig::from_env`].
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(vars)
    }

    fn load(env: &dyn Env) -> Result<Self, ConfigError> {
        let storage = StorageConfig::from_env(env)?;
        let host = parse_env(env, "OTELIER_HOST", "127.0.0.1")?;
        let port = parse_env(env, "OTELIER_PORT", "8080")?;
        let jwt = JwtConfig::from_env(env)?;
        let access_policy = parse_env(env, "HOTEL_ACCESS_POLICY", "assignment")?;
        let slack = SlackConfig::from_env(env)?;
        let email = EmailConfig::from_env(env)?;
        let notifications = NotificationConfig::from_env(env)?;
        let json_logs = env
            .get("LOG_FORMAT")
            .is_some_and(|f| f.eq_ignore_ascii_case("json"));
        let sentry_dsn = env.get("SENTRY_DSN");
        let sentry_environment = env.get("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .get("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .get("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let tls = TlsConfig::from_env(env)?;

        Ok(Self {
            storage,
            host,
            port,
            jwt,
            access_policy,
            slack,
            email,
            notifications,
            json_logs,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StorageConfig {
    /// Load only the storage settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the backend is unknown or the database URL is missing.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_env(&ProcessEnv)
    }

    fn from_env(env: &dyn Env) -> Result<Self, ConfigError> {
        let backend = env
            .get("OTELIER_STORAGE")
            .unwrap_or_else(|| "postgres".to_string());
        match backend.to_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres {
                database_url: get_database_url(env, "OTELIER_DATABASE_URL")?,
            }),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidEnvVar(
                "OTELIER_STORAGE".to_string(),
                format!("expected 'postgres' or 'memory', got '{other}'"),
            )),
        }
    }
}

impl JwtConfig {
    /// Load only the access token settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the secret is missing or weak, or the issuer is unset.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_env(&ProcessEnv)
    }

    fn from_env(env: &dyn Env) -> Result<Self, ConfigError> {
        let secret = get_validated_secret(env, "JWT_SECRET")?;
        validate_secret_length(&secret, "JWT_SECRET")?;

        Ok(Self {
            secret,
            issuer: get_required_env(env, "JWT_ISSUER")?,
            audience: env.get("JWT_AUDIENCE").filter(|a| !a.trim().is_empty()),
            role_claim: parse_env(env, "JWT_ROLE_CLAIM", "auto")?,
        })
    }
}

impl SlackConfig {
    /// Returns `None` if `SLACK_WEBHOOK_URL` is not set (Slack notifications disabled).
    fn from_env(env: &dyn Env) -> Result<Option<Self>, ConfigError> {
        let Some(url) = env.get("SLACK_WEBHOOK_URL").filter(|u| !u.is_empty()) else {
            return Ok(None);
        };

        let parsed = url::Url::parse(&url)
            .map_err(|e| ConfigError::InvalidEnvVar("SLACK_WEBHOOK_URL".to_string(), e.to_string()))?;
        if parsed.scheme() != "https" {
            return Err(ConfigError::InvalidEnvVar(
                "SLACK_WEBHOOK_URL".to_string(),
                "must use https".to_string(),
            ));
        }

        Ok(Some(Self {
            webhook_url: SecretString::from(url),
        }))
    }
}

impl EmailConfig {
    /// Returns `None` if no SMTP variable is set (email notifications disabled).
    /// All required variables must be set together.
    fn from_env(env: &dyn Env) -> Result<Option<Self>, ConfigError> {
        const KEYS: [&str; 5] = [
            "SMTP_HOST",
            "SMTP_USERNAME",
            "SMTP_PASSWORD",
            "SMTP_FROM",
            "NOTIFICATION_SUPPORT_EMAIL",
        ];

        let present = KEYS.iter().filter(|k| env.get(k).is_some()).count();
        if present == 0 {
            return Ok(None);
        }
        if present != KEYS.len() {
            return Err(ConfigError::InvalidEnvVar(
                "SMTP_*".to_string(),
                format!("{} must be set together", KEYS.join(", ")),
            ));
        }

        let smtp_port = parse_env(env, "SMTP_PORT", "587")?;

        Ok(Some(Self {
            smtp_host: get_required_env(env, "SMTP_HOST")?,
            smtp_port,
            smtp_username: get_required_env(env, "SMTP_USERNAME")?,
            smtp_password: get_validated_secret(env, "SMTP_PASSWORD")?,
            from_address: get_required_env(env, "SMTP_FROM")?,
            support_address: get_required_env(env, "NOTIFICATION_SUPPORT_EMAIL")?,
        }))
    }
}

impl NotificationConfig {
    fn from_env(env: &dyn Env) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let queue_capacity: usize = parse_env(
            env,
            "NOTIFY_QUEUE_CAPACITY",
            &defaults.queue_capacity.to_string(),
        )?;
        let max_attempts: u32 =
            parse_env(env, "NOTIFY_MAX_ATTEMPTS", &defaults.max_attempts.to_string())?;
        let backoff_ms: u64 = parse_env(env, "NOTIFY_BACKOFF_MS", "500")?;
        let timeout_ms: u64 = parse_env(env, "NOTIFY_ATTEMPT_TIMEOUT_MS", "10000")?;

        if queue_capacity == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "NOTIFY_QUEUE_CAPACITY".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "NOTIFY_ATTEMPT_TIMEOUT_MS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            queue_capacity,
            max_attempts: max_attempts.max(1),
            base_backoff: Duration::from_millis(backoff_ms),
            attempt_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

impl TlsConfig {
    fn from_env(env: &dyn Env) -> Result<Option<Self>, ConfigError> {
        let cert_pem = env.get("OTELIER_TLS_CERT");
        let key_pem = env.get("OTELIER_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "OTELIER_TLS_*".to_string(),
                "Both OTELIER_TLS_CERT and OTELIER_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(env: &dyn Env, key: &str) -> Result<String, ConfigError> {
    env.get(key)
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse an environment variable, falling back to a default string.
fn parse_env<T>(env: &dyn Env, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env.get(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(env: &dyn Env, primary_key: &str) -> Result<SecretString, ConfigError> {
    env.get(primary_key)
        .or_else(|| env.get("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
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
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(env: &dyn Env, key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(env, key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STRONG_SECRET: &str = "q8Vt2LmZ4rXc9NbK7wPy3HsJ6dFgA1eU";

    fn base_vars() -> HashMap<String, String> {
        [
            ("OTELIER_STORAGE", "memory"),
            ("JWT_SECRET", STRONG_SECRET),
            ("JWT_ISSUER", "https://auth.otelier.test/"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn with(mut vars: HashMap<String, String>, key: &str, value: &str) -> HashMap<String, String> {
        vars.insert(key.to_string(), value.to_string());
        vars
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
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-jwt-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"a".repeat(40), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength(STRONG_SECRET, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_map(&base_vars()).unwrap();
        assert!(matches!(config.storage, StorageConfig::Memory));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.jwt.role_claim, RoleClaimMode::Auto);
        assert_eq!(config.access_policy, AccessPolicy::Assignment);
        assert!(config.jwt.audience.is_none());
        assert!(config.slack.is_none());
        assert!(config.email.is_none());
        assert!(config.tls.is_none());
        assert_eq!(config.notifications.max_attempts, 3);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_missing_issuer() {
        let mut vars = base_vars();
        vars.remove("JWT_ISSUER");
        let err = ApiConfig::from_map(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "JWT_ISSUER"));
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let vars = with(base_vars(), "JWT_SECRET", "q8Vt2LmZ4rXc9");
        let err = ApiConfig::from_map(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let vars = with(base_vars(), "OTELIER_STORAGE", "postgres");
        let err = ApiConfig::from_map(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));

        let vars = with(vars, "DATABASE_URL", "postgres://localhost/otelier");
        let config = ApiConfig::from_map(&vars).unwrap();
        assert!(matches!(config.storage, StorageConfig::Postgres { .. }));
    }

    #[test]
    fn test_unknown_storage_backend() {
        let vars = with(base_vars(), "OTELIER_STORAGE", "mongo");
        assert!(matches!(
            ApiConfig::from_map(&vars),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_role_claim_and_policy_parse() {
        let vars = with(base_vars(), "JWT_ROLE_CLAIM", "app_metadata");
        let vars = with(vars, "HOTEL_ACCESS_POLICY", "employee");
        let config = ApiConfig::from_map(&vars).unwrap();
        assert_eq!(config.jwt.role_claim, RoleClaimMode::AppMetadata);
        assert_eq!(config.access_policy, AccessPolicy::Employee);

        let vars = with(base_vars(), "JWT_ROLE_CLAIM", "groups");
        assert!(ApiConfig::from_map(&vars).is_err());
    }

    #[test]
    fn test_slack_webhook_must_be_https() {
        let vars = with(base_vars(), "SLACK_WEBHOOK_URL", "http://hooks.slack.test/T/B/x");
        assert!(ApiConfig::from_map(&vars).is_err());

        let vars = with(base_vars(), "SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/T/B/x");
        assert!(ApiConfig::from_map(&vars).unwrap().slack.is_some());
    }

    #[test]
    fn test_partial_email_config_rejected() {
        let vars = with(base_vars(), "SMTP_HOST", "smtp.mail.test");
        assert!(matches!(
            ApiConfig::from_map(&vars),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_full_email_config() {
        let vars = [
            ("SMTP_HOST", "smtp.mail.test"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USERNAME", "mailer"),
            ("SMTP_PASSWORD", "Zr7!kQ2@vL9#pW4$"),
            ("SMTP_FROM", "bookings@otelier.test"),
            ("NOTIFICATION_SUPPORT_EMAIL", "support@otelier.test"),
        ]
        .into_iter()
        .fold(base_vars(), |acc, (k, v)| with(acc, k, v));

        let email = ApiConfig::from_map(&vars).unwrap().email.unwrap();
        assert_eq!(email.smtp_port, 2525);
        assert_eq!(email.support_address, "support@otelier.test");
    }

    #[test]
    fn test_notification_attempts_at_least_one() {
        let vars = with(base_vars(), "NOTIFY_MAX_ATTEMPTS", "0");
        let config = ApiConfig::from_map(&vars).unwrap();
        assert_eq!(config.notifications.max_attempts, 1);
    }

    #[test]
    fn test_notification_attempt_timeout() {
        let config = ApiConfig::from_map(&base_vars()).unwrap();
        assert_eq!(config.notifications.attempt_timeout, Duration::from_secs(10));

        let vars = with(base_vars(), "NOTIFY_ATTEMPT_TIMEOUT_MS", "250");
        let config = ApiConfig::from_map(&vars).unwrap();
        assert_eq!(config.notifications.attempt_timeout, Duration::from_millis(250));

        let vars = with(base_vars(), "NOTIFY_ATTEMPT_TIMEOUT_MS", "0");
        assert!(matches!(
            ApiConfig::from_map(&vars),
            Err(ConfigError::InvalidEnvVar(name, _)) if name == "NOTIFY_ATTEMPT_TIMEOUT_MS"
        ));
    }

    #[test]
    fn test_jwt_config_debug_redacts_secret() {
        let config = ApiConfig::from_map(&base_vars()).unwrap();
        let debug_output = format!("{:?}", config.jwt);
        assert!(debug_output.contains("https://auth.otelier.test/"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(STRONG_SECRET));
    }

    #[test]
    fn test_email_config_debug_redacts_secrets() {
        let config = EmailConfig {
            smtp_host: "smtp.mail.test".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: SecretString::from("super_secret_smtp_password"),
            from_address: "bookings@otelier.test".to_string(),
            support_address: "support@otelier.test".to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("smtp.mail.test"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_smtp_password"));
    }
}
