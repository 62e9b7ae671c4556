//! CLI configuration management.
//!
//! Persists the backend URL override and auth session to
//! `~/.snaplink/config.json`. The stored bearer token is the only durable
//! client-side state besides these preferences.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use snaplink_client::TokenStore;

/// Persistent CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Backend API base URL (e.g., "<https://api.snap.link/api>").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Authentication session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthSession>,
}

/// Stored authentication session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub token: String,
}

impl CliConfig {
    /// Path to the config directory: `~/.snaplink/`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".snaplink"))
    }

    /// Path to the config file: `~/.snaplink/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.json"))
    }

    /// Load config from disk. Returns default if file doesn't exist or is
    /// invalid.
    pub fn load() -> Self {
        Self::config_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    pub(crate) fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path =
            Self::config_path().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
        self.save_to(&path)
    }

    pub(crate) fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Clear stored auth credentials.
    pub fn clear_auth(&mut self) {
        self.auth = None;
    }

    /// Whether a session token is stored.
    pub const fn is_logged_in(&self) -> bool {
        self.auth.is_some()
    }
}

/// [`TokenStore`] backed by the CLI config file. The 401 invalidation
/// hook lands here: clearing drops the whole stored session.
#[derive(Debug, Default)]
pub struct ConfigTokenStore;

impl TokenStore for ConfigTokenStore {
    fn read(&self) -> Option<String> {
        CliConfig::load().auth.map(|a| a.token)
    }

    fn write(&self, token: &str) {
        let mut cfg = CliConfig::load();
        match &mut cfg.auth {
            Some(auth) => auth.token = token.to_string(),
            None => {
                cfg.auth = Some(AuthSession {
                    token: token.to_string(),
                    ..AuthSession::default()
                });
            }
        }
        if let Err(err) = cfg.save() {
            warn!(%err, "failed to persist session token");
        }
    }

    fn clear(&self) {
        let mut cfg = CliConfig::load();
        cfg.clear_auth();
        if let Err(err) = cfg.save() {
            warn!(%err, "failed to clear stored session");
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_logged_out() {
        let cfg = CliConfig::default();
        assert!(!cfg.is_logged_in());
        assert!(cfg.api_url.is_none());
    }

    #[test]
    fn config_roundtrip_json() {
        let cfg = CliConfig {
            api_url: Some("https://api.snap.link/api".into()),
            auth: Some(AuthSession {
                user_id: "u1".into(),
                email: "alice@example.com".into(),
                name: "Alice".into(),
                token: "jwt".into(),
            }),
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let loaded: CliConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.api_url.unwrap(), "https://api.snap.link/api");
        assert_eq!(loaded.auth.unwrap().email, "alice@example.com");
    }

    #[test]
    fn clear_auth_removes_credentials() {
        let mut cfg = CliConfig {
            auth: Some(AuthSession::default()),
            ..CliConfig::default()
        };
        cfg.clear_auth();
        assert!(cfg.auth.is_none());
    }

    #[test]
    fn config_path_contains_snaplink() {
        if let Some(path) = CliConfig::config_path() {
            assert!(path.to_string_lossy().contains(".snaplink"));
            assert!(path.to_string_lossy().contains("config.json"));
        }
    }

    #[test]
    fn unset_fields_omitted_from_json() {
        let json = serde_json::to_string(&CliConfig::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn load_from_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CliConfig::load_from(&dir.path().join("config.json"));
        assert!(!cfg.is_logged_in());
    }

    #[test]
    fn load_from_corrupt_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let cfg = CliConfig::load_from(&path);
        assert!(!cfg.is_logged_in());
    }

    #[test]
    fn save_to_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let cfg = CliConfig {
            api_url: Some("http://localhost:5001/api".into()),
            ..CliConfig::default()
        };
        cfg.save_to(&path).unwrap();
        let loaded = CliConfig::load_from(&path);
        assert_eq!(loaded.api_url.unwrap(), "http://localhost:5001/api");
    }
}
