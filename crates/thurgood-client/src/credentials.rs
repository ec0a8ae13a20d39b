//! API key resolution.
//!
//! Sources are consulted in order on every request, so a key rotated in the
//! environment or the auth file takes effect on the next call without a
//! restart.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thurgood_core::{ClientConfig, PROVIDER_ID};

/// Environment variables checked for a key, highest priority first.
pub const ENV_KEYS: [&str; 2] = ["THURGOOD_API_KEY", "CASEDEV_API_KEY"];

/// A resolved API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for blank keys.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("Credential(***)")
    }
}

/// One place an API key may come from.
pub trait CredentialSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn credential(&self) -> Option<Credential>;
}

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Process environment (`THURGOOD_API_KEY`, then `CASEDEV_API_KEY`).
#[derive(Clone)]
pub struct EnvCredential {
    lookup: Lookup,
}

impl EnvCredential {
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Read variables through `lookup` instead of the process environment.
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for EnvCredential {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn credential(&self) -> Option<Credential> {
        ENV_KEYS
            .iter()
            .find_map(|name| (self.lookup)(name).and_then(Credential::new))
    }
}

#[derive(Debug, Deserialize)]
struct AuthRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    key: Option<String>,
}

/// Shared auth store: `{"casedev": {"type": "api", "key": "..."}}`.
///
/// Only `api` records are used. A missing, unreadable or malformed file
/// counts as no credential.
#[derive(Debug, Clone)]
pub struct AuthFileCredential {
    path: PathBuf,
}

impl AuthFileCredential {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Option<Credential> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let records: HashMap<String, serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "Ignoring malformed auth file");
                return None;
            }
        };

        let record: AuthRecord = serde_json::from_value(records.get(PROVIDER_ID)?.clone()).ok()?;
        if record.kind != "api" {
            return None;
        }
        record.key.and_then(Credential::new)
    }
}

impl CredentialSource for AuthFileCredential {
    fn name(&self) -> &'static str {
        "auth file"
    }

    fn credential(&self) -> Option<Credential> {
        self.read()
    }
}

/// Key from the provider's configuration options.
#[derive(Clone)]
pub struct ConfigCredential {
    key: Option<Credential>,
}

impl ConfigCredential {
    pub fn new(key: Option<&str>) -> Self {
        Self {
            key: key.and_then(Credential::new),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.configured_api_key())
    }
}

impl CredentialSource for ConfigCredential {
    fn name(&self) -> &'static str {
        "config"
    }

    fn credential(&self) -> Option<Credential> {
        self.key.clone()
    }
}

/// Ordered chain of credential sources. The first source with a key wins.
pub struct CredentialResolver {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialResolver {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// Environment, then auth file (if configured), then config options.
    pub fn standard(config: &ClientConfig) -> Self {
        let mut sources: Vec<Box<dyn CredentialSource>> = vec![Box::new(EnvCredential::new())];
        if let Some(path) = &config.auth_file {
            sources.push(Box::new(AuthFileCredential::new(path)));
        }
        sources.push(Box::new(ConfigCredential::from_config(config)));
        Self::new(sources)
    }

    /// A single fixed key, mainly for tests and embedding.
    pub fn fixed(key: &str) -> Self {
        Self::new(vec![Box::new(ConfigCredential::new(Some(key)))])
    }

    pub fn resolve(&self) -> Option<Credential> {
        for source in &self.sources {
            if let Some(credential) = source.credential() {
                tracing::trace!(source = source.name(), "Resolved API key");
                return Some(credential);
            }
        }
        None
    }
}

impl Debug for CredentialResolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_list()
            .entries(self.sources.iter().map(|s| s.name()))
            .finish()
    }
}
