//! Error taxonomy for authentication, remote operations, and persistence.
//!
//! The split matters for callers: configuration problems are preconditions
//! that escape all the way to `main`, authentication failures are terminal
//! for one `authenticate` call but retryable, and remote failures carry a
//! [`RemoteErrorKind`] so callers can tell an expired session apart from a
//! quota problem or a transient outage.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration and deployment preconditions.
///
/// These are never wrapped into a remote-failure category; a missing client
/// secret file means the tool cannot work at all.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("client secret file not found: {0}")]
    MissingClientSecret(PathBuf),

    #[error("failed to read client secret file {path}")]
    UnreadableClientSecret {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse client secret file {path}")]
    MalformedClientSecret {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Terminal outcomes of a single authentication attempt.
///
/// All of these leave the credential store untouched; the caller may retry
/// the whole flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The user did not complete the consent flow (empty or missing code).
    #[error("authorization cancelled: no authorization code was provided")]
    Cancelled,

    /// The provider rejected the authorization-code or refresh-token
    /// exchange.
    #[error("authorization code exchange failed: {0}")]
    Exchange(String),

    /// The provider answered the exchange without an error but returned no
    /// usable access token.
    #[error("the provider returned no usable credentials")]
    CredentialsUnobtainable,

    /// The consent interaction itself broke (stdin closed, redirect
    /// listener died, browser could not be driven).
    #[error("consent interaction failed: {0}")]
    Interaction(String),

    /// Reading or writing the credential store failed.
    #[error("credential store error: {0}")]
    Store(#[from] std::io::Error),
}

/// How a remote API failure should be treated by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// 4xx-class problems: quota exhausted, bad metadata, unsupported
    /// media. Actionable by fixing the request, not by re-authenticating.
    Client,
    /// The session's token is expired or revoked. Re-authentication helps.
    Authorization,
    /// Transport failures, 5xx responses, undecodable bodies.
    Other,
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteErrorKind::Client => write!(f, "client"),
            RemoteErrorKind::Authorization => write!(f, "authorization"),
            RemoteErrorKind::Other => write!(f, "unexpected"),
        }
    }
}

/// Failures surfaced by the remote video gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The session handle carries no access token. Checked at the start of
    /// every operation, before any network traffic.
    #[error("authentication required: no authenticated session is available")]
    AuthenticationRequired,

    /// The video file named by the upload request does not exist. An input
    /// validation error, distinct from anything the remote API said.
    #[error("video file not found: {0}")]
    FileNotFound(PathBuf),

    /// A remote call failed. The provider's own message is preserved in
    /// `message`; `kind` tells callers how to react.
    #[error("{kind} error from the YouTube API: {message}")]
    Remote {
        kind: RemoteErrorKind,
        message: String,
    },
}

impl GatewayError {
    /// Whether re-running the authentication flow would plausibly fix this.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            GatewayError::AuthenticationRequired
                | GatewayError::Remote {
                    kind: RemoteErrorKind::Authorization,
                    ..
                }
        )
    }
}

/// Failures while appending to the audit log. Always propagated: a silently
/// lost audit record is worse than a visible crash.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit log write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Per-field validation failures when constructing upload metadata.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidVideoDetails {
    #[error("video title must not be empty")]
    EmptyTitle,

    #[error("video file path must not be empty")]
    EmptyFilePath,

    #[error("category id must not be empty")]
    EmptyCategoryId,

    #[error("unknown privacy status {0:?} (expected public, private, or unlisted)")]
    UnknownPrivacyStatus(String),
}
