//! Loading of the Google OAuth "installed application" client secret file.
//!
//! The file is the JSON blob downloaded from the Google Cloud console:
//!
//! ```json
//! { "installed": { "client_id": "...", "client_secret": "...",
//!                  "auth_uri": "...", "token_uri": "..." } }
//! ```
//!
//! Its absence is a fatal precondition, not an authentication failure: the
//! tool cannot even start an OAuth flow without it.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://www.googleapis.com/oauth2/v3/token".to_string()
}

/// Top-level shape of the client secret file.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub installed: InstalledClientSecret,
}

/// OAuth client material for an installed (desktop) application.
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ClientSecret {
    /// Reads and decodes the client secret file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingClientSecret(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::UnreadableClientSecret {
                path: path.to_path_buf(),
                source,
            }
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::MalformedClientSecret {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_precondition_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientSecret::load(&dir.path().join("client_secret.json")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingClientSecret(_)));
    }

    #[test]
    fn loads_installed_blob_with_default_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client_secret.json");
        std::fs::write(
            &path,
            r#"{"installed": {"client_id": "id-123", "client_secret": "shh"}}"#,
        )
        .unwrap();
        let secret = ClientSecret::load(&path).unwrap();
        assert_eq!(secret.installed.client_id, "id-123");
        assert_eq!(
            secret.installed.token_uri,
            "https://www.googleapis.com/oauth2/v3/token"
        );
    }

    #[test]
    fn malformed_blob_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client_secret.json");
        std::fs::write(&path, "not json").unwrap();
        let err = ClientSecret::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedClientSecret { .. }));
    }
}
