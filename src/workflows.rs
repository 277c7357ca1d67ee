//! Use-case orchestration: bind one remote operation to its bookkeeping.
//!
//! The workflows depend on the [`VideoGateway`] trait rather than the
//! concrete client, so tests can substitute scripted gateways without any
//! network or runtime reflection.

use crate::audit::AuditLog;
use crate::error::GatewayError;
use crate::model::{UploadLogEntry, VideoDetails, VideoListItem};
use crate::youtube_api::client::YouTubeClient;

/// The authenticated remote operations a session supports.
#[allow(async_fn_in_trait)]
pub trait VideoGateway {
    /// Uploads one video, returning the remote-assigned id.
    async fn upload(&self, details: &VideoDetails) -> Result<String, GatewayError>;

    /// Lists one page of the user's uploaded videos.
    async fn list(
        &self,
        max_results: Option<u32>,
        page_token: Option<String>,
    ) -> Result<Vec<VideoListItem>, GatewayError>;
}

impl VideoGateway for YouTubeClient {
    async fn upload(&self, details: &VideoDetails) -> Result<String, GatewayError> {
        self.upload_video(details).await
    }

    async fn list(
        &self,
        max_results: Option<u32>,
        page_token: Option<String>,
    ) -> Result<Vec<VideoListItem>, GatewayError> {
        self.list_uploaded_videos(max_results, page_token).await
    }
}

/// Runs one upload attempt and guarantees exactly one audit entry for it,
/// whatever happens.
///
/// The entry is also the operation's result: callers branch on its status
/// for user-facing messaging instead of handling errors themselves.
pub struct UploadWorkflow<G, L> {
    gateway: G,
    audit: L,
}

impl<G: VideoGateway, L: AuditLog> UploadWorkflow<G, L> {
    pub fn new(gateway: G, audit: L) -> Self {
        Self { gateway, audit }
    }

    pub async fn run(&mut self, details: &VideoDetails) -> UploadLogEntry {
        let entry = match self.gateway.upload(details).await {
            Ok(video_id) => {
                tracing::info!(video_id = %video_id, title = %details.title, "upload succeeded");
                UploadLogEntry::success(details, &video_id)
            }
            Err(e) => {
                tracing::error!(error = %e, title = %details.title, "upload attempt failed");
                UploadLogEntry::failure(details, e.to_string())
            }
        };

        // A lost audit row must not mask the upload's own outcome, nor the
        // other way around: record the persistence failure and still hand
        // the entry back.
        if let Err(e) = self.audit.save(&entry) {
            tracing::error!(error = %e, "failed to record the upload attempt in the audit log");
        }

        entry
    }
}

/// Runs one listing and converts every failure into an empty result with a
/// diagnostic. The gateway already degrades most failures itself; this
/// layer exists so no error whatsoever escapes a read-only convenience
/// operation.
pub struct ListWorkflow<G> {
    gateway: G,
}

impl<G: VideoGateway> ListWorkflow<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub async fn run(
        &self,
        max_results: Option<u32>,
        page_token: Option<String>,
    ) -> Vec<VideoListItem> {
        match self.gateway.list(max_results, page_token).await {
            Ok(items) => items,
            Err(e) if e.requires_reauthentication() => {
                tracing::error!(
                    error = %e,
                    "listing failed because the session is no longer authorized; \
                     re-run the command to authenticate again",
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "listing failed, showing no videos");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuditError, RemoteErrorKind};
    use crate::model::{PrivacyStatus, UploadStatus};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    /// Gateway whose next responses are scripted by the test.
    #[derive(Default)]
    struct ScriptedGateway {
        upload_response: Mutex<Option<Result<String, GatewayError>>>,
        list_response: Mutex<Option<Result<Vec<VideoListItem>, GatewayError>>>,
    }

    impl ScriptedGateway {
        fn uploading(result: Result<String, GatewayError>) -> Self {
            Self {
                upload_response: Mutex::new(Some(result)),
                ..Self::default()
            }
        }

        fn listing(result: Result<Vec<VideoListItem>, GatewayError>) -> Self {
            Self {
                list_response: Mutex::new(Some(result)),
                ..Self::default()
            }
        }
    }

    impl VideoGateway for ScriptedGateway {
        async fn upload(&self, _details: &VideoDetails) -> Result<String, GatewayError> {
            self.upload_response
                .lock()
                .unwrap()
                .take()
                .expect("upload scripted exactly once")
        }

        async fn list(
            &self,
            _max_results: Option<u32>,
            _page_token: Option<String>,
        ) -> Result<Vec<VideoListItem>, GatewayError> {
            self.list_response
                .lock()
                .unwrap()
                .take()
                .expect("list scripted exactly once")
        }
    }

    /// In-memory audit sink the test can inspect after the workflow ran.
    #[derive(Clone, Default)]
    struct MemoryAudit(Arc<Mutex<Vec<UploadLogEntry>>>);

    impl MemoryAudit {
        fn entries(&self) -> Vec<UploadLogEntry> {
            self.0.lock().unwrap().clone()
        }
    }

    impl AuditLog for MemoryAudit {
        fn save(&mut self, entry: &UploadLogEntry) -> Result<(), AuditError> {
            self.0.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    struct BrokenAudit;

    impl AuditLog for BrokenAudit {
        fn save(&mut self, _entry: &UploadLogEntry) -> Result<(), AuditError> {
            Err(AuditError::Io(std::io::Error::other("disk full")))
        }
    }

    fn demo_details() -> VideoDetails {
        VideoDetails::new(
            "clips/demo.mp4",
            "Demo",
            "",
            "22",
            PrivacyStatus::Private,
            vec![],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn successful_upload_yields_one_success_entry() {
        let audit = MemoryAudit::default();
        let mut workflow = UploadWorkflow::new(
            ScriptedGateway::uploading(Ok("abc123".to_string())),
            audit.clone(),
        );

        let entry = workflow.run(&demo_details()).await;

        assert_eq!(entry.status, UploadStatus::Success);
        assert_eq!(entry.details, "abc123");
        assert_eq!(
            entry.youtube_url.as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );

        let recorded = audit.entries();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].status, UploadStatus::Success);
    }

    #[tokio::test]
    async fn failed_upload_yields_one_failure_entry() {
        let audit = MemoryAudit::default();
        let mut workflow = UploadWorkflow::new(
            ScriptedGateway::uploading(Err(GatewayError::FileNotFound("nope.mp4".into()))),
            audit.clone(),
        );

        let entry = workflow.run(&demo_details()).await;

        assert_eq!(entry.status, UploadStatus::Failure);
        assert_eq!(entry.youtube_url, None);
        assert!(entry.details.contains("not found"));

        let recorded = audit.entries();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].status, UploadStatus::Failure);
        assert_eq!(recorded[0].youtube_url, None);
    }

    #[tokio::test]
    async fn audit_failure_does_not_mask_the_upload_outcome() {
        let mut workflow =
            UploadWorkflow::new(ScriptedGateway::uploading(Ok("abc123".to_string())), BrokenAudit);

        let entry = workflow.run(&demo_details()).await;
        assert_eq!(entry.status, UploadStatus::Success);
        assert_eq!(entry.details, "abc123");
    }

    #[tokio::test]
    async fn listing_errors_degrade_to_an_empty_result() {
        let workflow = ListWorkflow::new(ScriptedGateway::listing(Err(GatewayError::Remote {
            kind: RemoteErrorKind::Client,
            message: "quota exceeded".to_string(),
        })));
        assert_eq!(workflow.run(Some(5), None).await, vec![]);

        // belt and braces: even an authorization failure ends as an empty
        // result at this layer, with the diagnostic carrying the re-auth
        // hint
        let workflow = ListWorkflow::new(ScriptedGateway::listing(Err(
            GatewayError::AuthenticationRequired,
        )));
        assert_eq!(workflow.run(None, None).await, vec![]);
    }

    #[tokio::test]
    async fn listing_passes_results_through() {
        let items = vec![VideoListItem {
            id: "vid1".to_string(),
            title: "First".to_string(),
            youtube_url: "https://www.youtube.com/watch?v=vid1".to_string(),
            published_at: None,
            thumbnail_url: None,
        }];
        let workflow = ListWorkflow::new(ScriptedGateway::listing(Ok(items.clone())));
        assert_eq!(workflow.run(None, None).await, items);
    }
}
