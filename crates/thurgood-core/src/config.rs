//! Configuration module
//!
//! Client configuration is read from the environment (after loading `.env`)
//! and from an optional JSON configuration file holding per-provider options:
//!
//! ```json
//! { "provider": { "casedev": { "options": { "apiKey": "...", "baseURL": "..." } } } }
//! ```

use std::collections::HashMap;
use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Provider id used for auth records and configuration options.
pub const PROVIDER_ID: &str = "casedev";
pub const DEFAULT_BASE_URL: &str = "https://api.case.dev";

const REQUEST_TIMEOUT_MS: u64 = 30_000;
const TRANSFER_TIMEOUT_MS: u64 = 300_000;

/// Options configured for this provider in the configuration file.
#[derive(Clone, Default, Deserialize)]
pub struct ProviderOptions {
    #[serde(rename = "apiKey", alias = "api_key", default)]
    pub api_key: Option<String>,
    #[serde(rename = "baseURL", alias = "baseUrl", alias = "base_url", default)]
    pub base_url: Option<String>,
}

impl Debug for ProviderOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProviderOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    provider: HashMap<String, ProviderEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderEntry {
    #[serde(default)]
    options: ProviderOptions,
}

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    /// Default deadline for backend requests
    pub request_timeout_ms: u64,
    /// Deadline for byte transfers to presigned storage URLs
    pub transfer_timeout_ms: u64,
    /// Persisted auth store (JSON map of provider id to auth record)
    pub auth_file: Option<PathBuf>,
    pub provider: ProviderOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout_ms: REQUEST_TIMEOUT_MS,
            transfer_timeout_ms: TRANSFER_TIMEOUT_MS,
            auth_file: None,
            provider: ProviderOptions::default(),
        }
    }

    /// Load configuration from the process environment.
    ///
    /// `THURGOOD_BASE_URL`, `THURGOOD_TIMEOUT_MS`, `THURGOOD_TRANSFER_TIMEOUT_MS`,
    /// `THURGOOD_AUTH_FILE` and `THURGOOD_CONFIG` are recognised.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match var("THURGOOD_CONFIG") {
            Some(path) => load_provider_options(Path::new(&path))?,
            None => ProviderOptions::default(),
        };

        let base_url = var("THURGOOD_BASE_URL")
            .or_else(|| provider.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout_ms = match var("THURGOOD_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("THURGOOD_TIMEOUT_MS must be a number"))?,
            None => REQUEST_TIMEOUT_MS,
        };

        let transfer_timeout_ms = match var("THURGOOD_TRANSFER_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("THURGOOD_TRANSFER_TIMEOUT_MS must be a number"))?,
            None => TRANSFER_TIMEOUT_MS,
        };

        let auth_file = var("THURGOOD_AUTH_FILE").map(PathBuf::from).or_else(|| {
            var("HOME").map(|home| {
                PathBuf::from(home)
                    .join(".local")
                    .join("share")
                    .join("thurgood")
                    .join("auth.json")
            })
        });

        let config = ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout_ms,
            transfer_timeout_ms,
            auth_file,
            provider,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(anyhow::anyhow!(
                "Base URL must start with http:// or https:// (got '{}')",
                self.base_url
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err(anyhow::anyhow!("THURGOOD_TIMEOUT_MS must be greater than 0"));
        }

        if self.transfer_timeout_ms == 0 {
            return Err(anyhow::anyhow!(
                "THURGOOD_TRANSFER_TIMEOUT_MS must be greater than 0"
            ));
        }

        Ok(())
    }

    /// API key configured under this provider's options, if any.
    pub fn configured_api_key(&self) -> Option<&str> {
        self.provider
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Read this provider's options from a JSON configuration file.
pub fn load_provider_options(path: &Path) -> Result<ProviderOptions, anyhow::Error> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let file: ConfigFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(file
        .provider
        .into_iter()
        .find(|(id, _)| id == PROVIDER_ID)
        .map(|(_, entry)| entry.options)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_ms, 30_000);
        assert_eq!(config.transfer_timeout_ms, 300_000);
        assert!(config.auth_file.is_none());
        assert!(config.configured_api_key().is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("THURGOOD_BASE_URL", "http://localhost:8080/"),
            ("THURGOOD_TIMEOUT_MS", "1500"),
            ("HOME", "/home/counsel"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout_ms, 1500);
        assert_eq!(
            config.auth_file.as_deref(),
            Some(Path::new("/home/counsel/.local/share/thurgood/auth.json"))
        );
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[("THURGOOD_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("THURGOOD_TIMEOUT_MS"));

        let err =
            ClientConfig::from_lookup(lookup_from(&[("THURGOOD_TIMEOUT_MS", "0")])).unwrap_err();
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn test_non_http_base_url_is_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[("THURGOOD_BASE_URL", "ftp://x")]))
            .unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn test_provider_options_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"provider": {{
                "other": {{"options": {{"apiKey": "wrong"}}}},
                "casedev": {{"options": {{"apiKey": "from-config", "baseURL": "https://staging.case.dev"}}}}
            }}}}"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config =
            ClientConfig::from_lookup(lookup_from(&[("THURGOOD_CONFIG", path.as_str())])).unwrap();
        assert_eq!(config.configured_api_key(), Some("from-config"));
        assert_eq!(config.base_url, "https://staging.case.dev");
        assert!(!format!("{:?}", config).contains("from-config"));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = ClientConfig::from_lookup(lookup_from(&[(
            "THURGOOD_CONFIG",
            "/nonexistent/thurgood.json",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
