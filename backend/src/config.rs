//! Application settings loaded via OrthoConfig.
//!
//! Every value may come from the command line or from an `ODONTO_*`
//! environment variable. Absent values fall back to the defaults exposed by
//! the accessor methods.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use url::Url;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_ALLOWED_UPLOAD_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/webp", "application/pdf"];
const MIN_JWT_SECRET_BYTES: usize = 32;

/// A setting holds a value the server cannot use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid setting {setting}: {reason}")]
pub struct SettingError {
    setting: &'static str,
    reason: String,
}

impl SettingError {
    fn new(setting: &'static str, reason: impl Into<String>) -> Self {
        Self {
            setting,
            reason: reason.into(),
        }
    }
}

/// Startup configuration for the backend.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ODONTO")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Bearer token lifetime.
    #[ortho_config(default = 60)]
    pub token_ttl_minutes: i64,
    /// Gemini API key. Without it report drafting is disabled.
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_endpoint: Option<String>,
    /// Timeout for text-generation calls; unset waits indefinitely.
    pub ai_timeout_secs: Option<u64>,
    /// Directory uploaded evidence files are written to.
    pub upload_dir: Option<PathBuf>,
    /// Base of the URLs stored for uploaded files.
    pub public_base_url: Option<String>,
    /// Upload size limit in bytes (10 MiB).
    #[ortho_config(default = 10_485_760)]
    pub max_upload_bytes: u64,
    /// MIME types accepted for uploads, comma-separated in the environment.
    #[serde(default, deserialize_with = "comma_list")]
    pub allowed_upload_types: Option<Vec<String>>,
    /// CORS origins, comma-separated in the environment; unset allows any
    /// origin.
    #[serde(default, deserialize_with = "comma_list")]
    pub cors_allowed_origins: Option<Vec<String>>,
    /// Admin account created when no users exist yet.
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

fn redact<T>(value: &Option<T>) -> &'static str {
    if value.is_some() { "<redacted>" } else { "<unset>" }
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &redact(&self.database_url))
            .field("db_max_connections", &self.db_max_connections)
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_endpoint", &self.gemini_endpoint)
            .field("ai_timeout_secs", &self.ai_timeout_secs)
            .field("upload_dir", &self.upload_dir)
            .field("public_base_url", &self.public_base_url)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("allowed_upload_types", &self.allowed_upload_types)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("bootstrap_admin_email", &redact(&self.bootstrap_admin_email))
            .field("bootstrap_admin_password", &redact(&self.bootstrap_admin_password))
            .finish()
    }
}

/// A list setting arrives as a sequence when the environment layer splits
/// it, or as one string when it holds a single value.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListSetting {
    Many(Vec<String>),
    One(String),
}

fn comma_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<ListSetting>::deserialize(deserializer)?;
    Ok(raw.map(|setting| {
        let items = match setting {
            ListSetting::Many(items) => items,
            ListSetting::One(item) => vec![item],
        };
        items
            .iter()
            .flat_map(|item| item.split(','))
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    }))
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|err| SettingError::new("bind_addr", format!("'{raw}': {err}")))
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    /// Signing secret, if one is configured. Short secrets are rejected.
    pub fn jwt_secret(&self) -> Result<Option<Zeroizing<Vec<u8>>>, SettingError> {
        match self.jwt_secret.as_deref() {
            None => Ok(None),
            Some(secret) if secret.len() < MIN_JWT_SECRET_BYTES => Err(SettingError::new(
                "jwt_secret",
                format!("must be at least {MIN_JWT_SECRET_BYTES} bytes"),
            )),
            Some(secret) => Ok(Some(Zeroizing::new(secret.as_bytes().to_vec()))),
        }
    }

    pub fn token_ttl(&self) -> Result<chrono::Duration, SettingError> {
        let minutes = self.token_ttl_minutes;
        if minutes <= 0 {
            return Err(SettingError::new("token_ttl_minutes", "must be positive"));
        }
        Ok(chrono::Duration::minutes(minutes))
    }

    pub fn gemini_api_key(&self) -> Option<Zeroizing<String>> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| Zeroizing::new(key.to_owned()))
    }

    pub fn gemini_model(&self) -> &str {
        self.gemini_model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    pub fn gemini_endpoint(&self) -> Result<Url, SettingError> {
        let raw = self
            .gemini_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_ENDPOINT);
        Url::parse(raw).map_err(|err| SettingError::new("gemini_endpoint", err.to_string()))
    }

    pub fn ai_timeout(&self) -> Option<Duration> {
        self.ai_timeout_secs.map(Duration::from_secs)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    pub fn public_base_url(&self) -> Result<Url, SettingError> {
        let raw = self
            .public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL);
        Url::parse(raw).map_err(|err| SettingError::new("public_base_url", err.to_string()))
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    pub fn allowed_upload_types(&self) -> Vec<String> {
        match &self.allowed_upload_types {
            Some(types) if !types.is_empty() => types.clone(),
            _ => DEFAULT_ALLOWED_UPLOAD_TYPES
                .iter()
                .map(|item| (*item).to_owned())
                .collect(),
        }
    }

    /// Allowed CORS origins; empty means any origin.
    pub fn cors_allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins.clone().unwrap_or_default()
    }

    /// Bootstrap admin credentials, when both halves are configured.
    pub fn bootstrap_admin(&self) -> Option<(String, Zeroizing<String>)> {
        match (&self.bootstrap_admin_email, &self.bootstrap_admin_password) {
            (Some(email), Some(password)) => {
                Some((email.clone(), Zeroizing::new(password.clone())))
            }
            _ => None,
        }
    }
}
