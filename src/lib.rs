//! Upload videos to YouTube and keep a local, append-only audit log of
//! every attempt.
//!
//! The crate is organized around three seams:
//!
//! - [`auth::Authenticator`] turns stored or freshly granted OAuth
//!   credentials into an authenticated [`youtube_api::YouTubeClient`],
//!   with the user interaction abstracted behind [`oauth::ConsentPrompt`].
//! - [`workflows::UploadWorkflow`] binds one upload attempt to exactly one
//!   [`model::UploadLogEntry`] persisted through [`audit::AuditLog`], no
//!   matter which stage failed; [`workflows::ListWorkflow`] wraps the
//!   read-only listing with a degrade-to-empty policy.
//! - [`youtube_api`] holds the wire types and the client for the three
//!   remote operations consumed: `videos.insert`, `channels.list`, and
//!   `playlistItems.list`.

pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod oauth;
pub mod workflows;
pub mod youtube_api;

pub use audit::{AuditLog, CsvAuditLog};
pub use auth::{Authenticator, CredentialStore};
pub use config::{ClientSecret, InstalledClientSecret};
pub use error::{
    AuditError, AuthError, ConfigError, GatewayError, InvalidVideoDetails, RemoteErrorKind,
};
pub use model::{
    PrivacyStatus, UploadLogEntry, UploadStatus, VideoDetails, VideoListItem, watch_url,
};
pub use oauth::{ConsentPrompt, LoopbackPrompt, OAuthManager, StdinPrompt};
pub use workflows::{ListWorkflow, UploadWorkflow, VideoGateway};
pub use youtube_api::{TimeBoundAccessToken, YouTubeClient};
