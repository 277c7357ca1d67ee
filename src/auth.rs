//! Credential persistence and the authentication entry point.

use crate::error::AuthError;
use crate::oauth::{ConsentPrompt, OAuthManager};
use crate::youtube_api::client::{TimeBoundAccessToken, YouTubeClient};
use oauth2::basic::BasicTokenResponse;
use std::path::PathBuf;
use std::sync::Arc;

/// File-backed store for the single supported user's OAuth credentials.
///
/// The token is persisted as one JSON blob: read at session start,
/// rewritten after a fresh code exchange or token refresh. There is no
/// cross-process locking; concurrent invocations are unsupported.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the stored token, if any.
    ///
    /// A missing or empty file yields `Ok(None)`. A file that no longer
    /// decodes is treated the same way, with a warning: forcing one fresh
    /// authorization beats refusing to start.
    pub async fn load(&self) -> Result<Option<BasicTokenResponse>, AuthError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(None);
        }
        let raw = tokio::fs::read_to_string(&self.path).await?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&raw) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "stored credentials are unreadable, will re-authorize",
                );
                Ok(None)
            }
        }
    }

    /// Rewrites the store with `token`.
    pub async fn save(&self, token: &BasicTokenResponse) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(token).map_err(std::io::Error::other)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::debug!(path = %self.path.display(), "persisted credentials");
        Ok(())
    }
}

/// Produces an authenticated API session, preferring stored credentials and
/// falling back to the interactive OAuth flow.
pub struct Authenticator {
    manager: OAuthManager,
    store: CredentialStore,
    http: reqwest::Client,
}

impl Authenticator {
    pub fn new(manager: OAuthManager, store: CredentialStore, http: reqwest::Client) -> Self {
        Self {
            manager,
            store,
            http,
        }
    }

    /// Fast path: stored credentials exist and decode, so the session is
    /// authenticated immediately. The persisted blob carries only a
    /// relative expiry, so the token is marked expired and the first API
    /// call refreshes it through the refresh token.
    ///
    /// Slow path: no stored credentials. Run the full consent flow via
    /// `prompt`, persist the result, and return a session with the fresh
    /// token. Nothing is persisted when the flow fails.
    pub async fn authenticate(
        &self,
        prompt: &mut impl ConsentPrompt,
    ) -> Result<YouTubeClient, AuthError> {
        if let Some(stored) = self.store.load().await? {
            tracing::debug!("using stored credentials");
            return Ok(YouTubeClient::new(
                TimeBoundAccessToken::expired(stored),
                Arc::new(self.manager.clone()),
                self.http.clone(),
            ));
        }

        let token = self.manager.authorize(prompt).await?;
        self.store.save(&token).await?;
        Ok(YouTubeClient::new(
            TimeBoundAccessToken::new(token),
            Arc::new(self.manager.clone()),
            self.http.clone(),
        ))
    }
}
