//! Authenticated YouTube API client: token lifetime management, request
//! plumbing, error classification, and the upload/listing operations.

use crate::error::{GatewayError, RemoteErrorKind};
use crate::model::{VideoDetails, VideoListItem, watch_url};
use crate::oauth::OAuthManager;
use crate::youtube_api::channels::ChannelListResponse;
use crate::youtube_api::playlist_items::{PlaylistItem, PlaylistItemListResponse};
use crate::youtube_api::videos::{UploadedVideo, VideoUploadRequest};
use bytes::Bytes;
use http::Method;
use jiff::Timestamp;
use oauth2::TokenResponse;
use oauth2::basic::BasicTokenResponse;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::io::AsyncReadExt;
use tokio::sync::Mutex;
use tracing::instrument;

const CHANNELS_URL: &str = "https://www.googleapis.com/youtube/v3/channels";
const PLAYLIST_ITEMS_URL: &str = "https://www.googleapis.com/youtube/v3/playlistItems";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";

/// Page size used when the caller does not ask for one.
const DEFAULT_PAGE_SIZE: u32 = 25;
/// The provider rejects page sizes above this.
const MAX_PAGE_SIZE: u32 = 50;

/// Boundary for the hand-built multipart/related upload body.
const UPLOAD_BOUNDARY: &str = "yt_uploader_8a1f40c2";

/// An OAuth2 token plus the wall-clock instant it stops being trustworthy.
#[derive(Debug, Clone)]
pub struct TimeBoundAccessToken {
    token: BasicTokenResponse,
    /// When the current access token expires (with safety buffer).
    expires_at: SystemTime,
}

impl TimeBoundAccessToken {
    /// Wraps a token that is already considered expired, forcing a refresh
    /// before first use. This is the right constructor for tokens loaded
    /// from storage, whose `expires_in` is relative to a write that may be
    /// arbitrarily old.
    pub fn expired(token: BasicTokenResponse) -> Self {
        Self {
            expires_at: SystemTime::UNIX_EPOCH,
            token,
        }
    }

    /// Wraps a token freshly minted by the provider, with expiry calculated
    /// from its `expires_in` minus a 5-minute safety buffer.
    pub fn new(token: BasicTokenResponse) -> Self {
        Self {
            expires_at: Self::calculate_expiry(&token),
            token,
        }
    }

    pub fn raw_token(&self) -> &BasicTokenResponse {
        &self.token
    }

    /// Refreshes this token in place, preserving the refresh token when the
    /// provider omits one from the response.
    ///
    /// Returns `Ok(false)` when the grant is gone and a full
    /// re-authorization is needed.
    pub async fn refresh(&mut self, oauth_manager: &OAuthManager) -> eyre::Result<bool> {
        tracing::trace!("refreshing token");
        match oauth_manager.refresh(self.token.clone()).await? {
            Some(new_token) => {
                let old_token = std::mem::replace(&mut self.token, new_token);
                if self.token.refresh_token().is_none() {
                    tracing::trace!("new token lacks refresh token, preserving original");
                    self.token
                        .set_refresh_token(old_token.refresh_token().cloned());
                }
                self.expires_at = Self::calculate_expiry(&self.token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn calculate_expiry(token: &BasicTokenResponse) -> SystemTime {
        let now = SystemTime::now();
        if let Some(expires_in) = token.expires_in() {
            now + expires_in.saturating_sub(Duration::from_secs(300))
        } else {
            // no expires_in field: assume 1 hour minus the buffer
            now + Duration::from_secs(3300)
        }
    }
}

/// Classifies a failed API response so callers can react appropriately:
/// 401 means the session's token is no longer accepted, other 4xx responses
/// (quota, bad metadata, unsupported media) mean the request itself is the
/// problem, and everything else is an unexpected failure.
pub(crate) fn classify_status(status: reqwest::StatusCode) -> RemoteErrorKind {
    if status == reqwest::StatusCode::UNAUTHORIZED {
        RemoteErrorKind::Authorization
    } else if status.is_client_error() {
        RemoteErrorKind::Client
    } else {
        RemoteErrorKind::Other
    }
}

fn transport_error(context: &str, e: reqwest::Error) -> GatewayError {
    GatewayError::Remote {
        kind: RemoteErrorKind::Other,
        message: format!("{context}: {e}"),
    }
}

/// Turns a non-success response into a classified [`GatewayError`] carrying
/// the provider's own message. Every remote call funnels its response
/// through here, so classification happens in exactly one place.
async fn error_for_status(
    context: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(GatewayError::Remote {
        kind: classify_status(status),
        message: format!("{context} returned {status}: {body}"),
    })
}

/// Listing degrades to "no results" for anything except authorization
/// failures, which must surface so the user knows to re-authenticate.
/// Applied identically to both remote calls of the listing flow.
fn swallow_unless_authorization(e: GatewayError) -> Result<Vec<VideoListItem>, GatewayError> {
    if e.requires_reauthentication() {
        Err(e)
    } else {
        tracing::warn!(error = %e, "listing failed, returning no results");
        Ok(Vec::new())
    }
}

/// Maps one raw playlist item to the listing projection.
///
/// Items without an embedded video reference are dropped with a warning;
/// an unparseable publish date keeps the item but clears the timestamp.
fn map_playlist_item(item: PlaylistItem) -> Option<VideoListItem> {
    let video_id = match item
        .snippet
        .resource_id
        .as_ref()
        .and_then(|r| r.video_id.as_deref())
        .filter(|id| !id.is_empty())
    {
        Some(id) => id.to_string(),
        None => {
            tracing::warn!(
                playlist_item = %item.id,
                "playlist item has no embedded video reference, skipping it",
            );
            return None;
        }
    };

    let published_at = item
        .snippet
        .published_at
        .as_deref()
        .and_then(|raw| match raw.parse::<Timestamp>() {
            Ok(ts) => Some(ts),
            Err(e) => {
                tracing::warn!(
                    video_id = %video_id,
                    raw,
                    error = %e,
                    "unparseable publish date, keeping the item without one",
                );
                None
            }
        });

    let thumbnail_url = item
        .snippet
        .thumbnails
        .as_ref()
        .and_then(|t| t.preferred_url())
        .map(str::to_string);

    Some(VideoListItem {
        youtube_url: watch_url(&video_id),
        id: video_id,
        title: item.snippet.title,
        published_at,
        thumbnail_url,
    })
}

/// Picks the uploads playlist out of a `channels.list` response.
///
/// `None` covers both "no channel at all" and "channel without an uploads
/// playlist"; neither is an error, the user simply has nothing to list.
fn uploads_playlist_id(channels: ChannelListResponse) -> Option<String> {
    let Some(channel) = channels.items.into_iter().next() else {
        tracing::warn!("authenticated user has no YouTube channel");
        return None;
    };
    let channel_id = channel.id;
    match channel
        .content_details
        .and_then(|cd| cd.related_playlists.uploads)
        .filter(|uploads| !uploads.is_empty())
    {
        Some(uploads) => Some(uploads),
        None => {
            tracing::warn!(channel_id = %channel_id, "channel has no uploads playlist");
            None
        }
    }
}

/// Maps one `playlistItems.list` page to the listing projection. A page
/// with no items yields an empty sequence, not an error.
fn map_playlist_page(page: PlaylistItemListResponse) -> Vec<VideoListItem> {
    if page.items.is_empty() {
        tracing::debug!("uploads playlist page contained no items");
    }
    page.items.into_iter().filter_map(map_playlist_item).collect()
}

/// Streams the multipart/related upload body: a JSON metadata part followed
/// by the raw video bytes, so the file is never buffered whole in memory.
fn multipart_related_body(metadata: Vec<u8>, path: PathBuf) -> reqwest::Body {
    let stream = async_stream::try_stream! {
        let mut head = Vec::new();
        head.extend_from_slice(
            format!("--{UPLOAD_BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n")
                .as_bytes(),
        );
        head.extend_from_slice(&metadata);
        head.extend_from_slice(
            format!("\r\n--{UPLOAD_BOUNDARY}\r\nContent-Type: application/octet-stream\r\n\r\n")
                .as_bytes(),
        );
        yield Bytes::from(head);

        let mut file = tokio::fs::File::open(&path).await?;
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            yield Bytes::copy_from_slice(&buf[..n]);
        }

        yield Bytes::from(format!("\r\n--{UPLOAD_BOUNDARY}--\r\n"));
    };
    let stream: std::pin::Pin<
        Box<dyn tokio_stream::Stream<Item = std::io::Result<Bytes>> + Send>,
    > = Box::pin(stream);
    reqwest::Body::wrap_stream(stream)
}

/// Client for the YouTube Data API v3 operations this tool performs.
///
/// Wraps an OAuth2 token and refreshes it automatically before API calls
/// using the stored refresh token; expiry tracking includes a safety buffer
/// so a token never goes stale mid-request.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    /// The current OAuth2 token, behind a mutex so refreshes are atomic.
    token: Arc<Mutex<TimeBoundAccessToken>>,
    /// OAuth manager for refreshing tokens.
    oauth_manager: Arc<OAuthManager>,
    /// HTTP client for API requests.
    client: reqwest::Client,
}

impl YouTubeClient {
    pub fn new(
        token: TimeBoundAccessToken,
        oauth_manager: Arc<OAuthManager>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            token: Arc::new(Mutex::new(token)),
            oauth_manager,
            client,
        }
    }

    /// Returns a clone of the underlying OAuth2 token, for persisting back
    /// to the credential store after it may have been refreshed.
    pub async fn token(&self) -> BasicTokenResponse {
        self.token.lock().await.token.clone()
    }

    /// Session precondition, checked at the start of every operation: the
    /// handle must carry a non-empty access token. This is a programmer /
    /// flow error, distinct from a token the provider has since revoked.
    async fn ensure_session(&self) -> Result<(), GatewayError> {
        let token = self.token.lock().await;
        if token.raw_token().access_token().secret().is_empty() {
            return Err(GatewayError::AuthenticationRequired);
        }
        Ok(())
    }

    /// Gets a guaranteed-fresh access token, refreshing first if the
    /// current one is at or past its expiry buffer.
    #[instrument(skip(self))]
    async fn fresh_access_token(&self) -> Result<String, GatewayError> {
        let mut token = self.token.lock().await;
        if SystemTime::now() >= token.expires_at {
            tracing::debug!("access token expired, attempting refresh");
            match token.refresh(&self.oauth_manager).await {
                Ok(true) => tracing::debug!("access token successfully refreshed"),
                Ok(false) => {
                    return Err(GatewayError::Remote {
                        kind: RemoteErrorKind::Authorization,
                        message: "access token expired and could not be refreshed; \
                                  re-authentication is required"
                            .to_string(),
                    });
                }
                Err(e) => {
                    return Err(GatewayError::Remote {
                        kind: RemoteErrorKind::Other,
                        message: format!("token refresh failed: {e}"),
                    });
                }
            }
        }
        Ok(token.raw_token().access_token().secret().to_string())
    }

    /// Makes an authenticated request and classifies any failure: token
    /// freshness, the bearer header, query parameters, optional JSON body,
    /// and status checking are all handled here so the per-operation
    /// methods stay declarative.
    async fn make_authenticated_request(
        &self,
        method: Method,
        url: &str,
        query_params: Option<&[(&str, &str)]>,
        json_body: Option<&impl Serialize>,
    ) -> Result<reqwest::Response, GatewayError> {
        let access_token = self.fresh_access_token().await?;

        let mut request = self
            .client
            .request(method.clone(), url)
            .header("Authorization", format!("Bearer {access_token}"));
        if let Some(params) = query_params {
            request = request.query(params);
        }
        if let Some(body) = json_body {
            request = request
                .header("Content-Type", "application/json")
                .json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(&format!("send {method} request to {url}"), e))?;
        error_for_status(&format!("{method} {url}"), response).await
    }

    /// Uploads the video described by `details` and returns the
    /// remote-assigned video id.
    ///
    /// Single attempt, fail-fast: no retry of any kind happens here.
    ///
    /// # Required scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube.upload`
    ///
    /// # API reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/insert>
    #[instrument(skip(self, details), fields(title = %details.title))]
    pub async fn upload_video(&self, details: &VideoDetails) -> Result<String, GatewayError> {
        self.ensure_session().await?;
        if tokio::fs::metadata(&details.file_path).await.is_err() {
            return Err(GatewayError::FileNotFound(details.file_path.clone()));
        }

        let metadata = serde_json::to_vec(&VideoUploadRequest::from_details(details)).map_err(
            |e| GatewayError::Remote {
                kind: RemoteErrorKind::Other,
                message: format!("encode upload metadata: {e}"),
            },
        )?;

        let access_token = self.fresh_access_token().await?;
        let response = self
            .client
            .post(UPLOAD_URL)
            .query(&[("uploadType", "multipart"), ("part", "snippet,status")])
            .header("Authorization", format!("Bearer {access_token}"))
            .header(
                "Content-Type",
                format!("multipart/related; boundary={UPLOAD_BOUNDARY}"),
            )
            .body(multipart_related_body(
                metadata,
                details.file_path.clone(),
            ))
            .send()
            .await
            .map_err(|e| transport_error("send upload request", e))?;
        let response = error_for_status("upload", response).await?;

        let uploaded: UploadedVideo = response.json().await.map_err(|e| GatewayError::Remote {
            kind: RemoteErrorKind::Other,
            message: format!("parse upload response: {e}"),
        })?;

        tracing::info!(video_id = %uploaded.id, "video uploaded");
        Ok(uploaded.id)
    }

    /// Lists one page of the authenticated user's uploaded videos.
    ///
    /// Two chained remote calls: resolve the uploads playlist via
    /// `channels.list` (`mine=true`, `part=contentDetails`), then fetch one
    /// `playlistItems.list` page. `max_results` defaults to 25 and is
    /// capped at the provider's limit of 50.
    ///
    /// A user without a channel or without an uploads playlist yields an
    /// empty list, as do client-side and unexpected remote failures;
    /// authorization failures propagate so the expired session is not
    /// silently hidden.
    ///
    /// # Required scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube.readonly`
    ///
    /// # API reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/playlistItems/list>
    #[instrument(skip(self))]
    pub async fn list_uploaded_videos(
        &self,
        max_results: Option<u32>,
        page_token: Option<String>,
    ) -> Result<Vec<VideoListItem>, GatewayError> {
        self.ensure_session().await?;

        let playlist_id = match self.my_uploads_playlist().await {
            Ok(Some(id)) => id,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => return swallow_unless_authorization(e),
        };

        let page_size = max_results.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        match self
            .playlist_page(&playlist_id, page_size, page_token)
            .await
        {
            Ok(items) => Ok(items),
            Err(e) => swallow_unless_authorization(e),
        }
    }

    /// Resolves the uploads playlist of the authenticated user's channel;
    /// [`uploads_playlist_id`] does the actual picking.
    async fn my_uploads_playlist(&self) -> Result<Option<String>, GatewayError> {
        let query = [("part", "contentDetails"), ("mine", "true")];
        let response = self
            .make_authenticated_request(Method::GET, CHANNELS_URL, Some(&query), None::<&()>)
            .await?;

        let channels: ChannelListResponse =
            response.json().await.map_err(|e| GatewayError::Remote {
                kind: RemoteErrorKind::Other,
                message: format!("parse channels response: {e}"),
            })?;

        Ok(uploads_playlist_id(channels))
    }

    /// Fetches one page of the uploads playlist and maps it to
    /// [`VideoListItem`]s.
    async fn playlist_page(
        &self,
        playlist_id: &str,
        max_results: u32,
        page_token: Option<String>,
    ) -> Result<Vec<VideoListItem>, GatewayError> {
        let max_results_string = max_results.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results_string.as_str()),
        ];
        if let Some(ref token) = page_token {
            query.push(("pageToken", token.as_str()));
        }

        let response = self
            .make_authenticated_request(Method::GET, PLAYLIST_ITEMS_URL, Some(&query), None::<&()>)
            .await?;

        let page: PlaylistItemListResponse =
            response.json().await.map_err(|e| GatewayError::Remote {
                kind: RemoteErrorKind::Other,
                message: format!("parse playlist items response: {e}"),
            })?;

        tracing::debug!(
            playlist_id,
            total_results = page.page_info.total_results,
            returned_items = page.items.len(),
            "fetched uploads playlist page",
        );
        Ok(map_playlist_page(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InstalledClientSecret;
    use crate::model::PrivacyStatus;
    use oauth2::basic::BasicTokenType;
    use oauth2::{AccessToken, EmptyExtraTokenFields, StandardTokenResponse};
    use pretty_assertions::assert_eq;

    fn test_manager() -> Arc<OAuthManager> {
        Arc::new(OAuthManager::new(&InstalledClientSecret {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            auth_uri: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_uri: "https://www.googleapis.com/oauth2/v3/token".to_string(),
        }))
    }

    fn client_with_access_token(access: &str) -> YouTubeClient {
        let token = StandardTokenResponse::new(
            AccessToken::new(access.to_string()),
            BasicTokenType::Bearer,
            EmptyExtraTokenFields {},
        );
        YouTubeClient::new(
            TimeBoundAccessToken::new(token),
            test_manager(),
            reqwest::Client::new(),
        )
    }

    fn item(json: serde_json::Value) -> PlaylistItem {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn classification_separates_auth_client_and_other() {
        use reqwest::StatusCode;
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED),
            RemoteErrorKind::Authorization
        );
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN),
            RemoteErrorKind::Client
        );
        assert_eq!(
            classify_status(StatusCode::BAD_REQUEST),
            RemoteErrorKind::Client
        );
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            RemoteErrorKind::Other
        );
    }

    #[test]
    fn listing_swallows_client_errors_but_not_authorization() {
        let client_err = GatewayError::Remote {
            kind: RemoteErrorKind::Client,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(swallow_unless_authorization(client_err).unwrap(), vec![]);

        let auth_err = GatewayError::Remote {
            kind: RemoteErrorKind::Authorization,
            message: "token revoked".to_string(),
        };
        assert!(swallow_unless_authorization(auth_err).is_err());
    }

    #[test]
    fn bad_publish_date_keeps_the_item_without_a_timestamp() {
        let mapped = map_playlist_item(item(serde_json::json!({
            "id": "pl-item-1",
            "snippet": {
                "title": "First",
                "publishedAt": "not a date",
                "resourceId": { "kind": "youtube#video", "videoId": "vid1" },
            },
        })))
        .unwrap();
        assert_eq!(mapped.id, "vid1");
        assert_eq!(mapped.published_at, None);
        assert_eq!(mapped.youtube_url, "https://www.youtube.com/watch?v=vid1");
    }

    #[test]
    fn missing_video_reference_drops_the_item() {
        let mapped = map_playlist_item(item(serde_json::json!({
            "id": "pl-item-2",
            "snippet": { "title": "Ghost", "publishedAt": "2024-01-15T10:00:00Z" },
        })));
        assert!(mapped.is_none());
    }

    #[test]
    fn valid_item_maps_completely() {
        let mapped = map_playlist_item(item(serde_json::json!({
            "id": "pl-item-3",
            "snippet": {
                "title": "Full",
                "publishedAt": "2024-01-15T10:00:00Z",
                "thumbnails": {
                    "medium": { "url": "https://i.ytimg.com/vi/vid3/mq.jpg" },
                    "default": { "url": "https://i.ytimg.com/vi/vid3/def.jpg" },
                },
                "resourceId": { "kind": "youtube#video", "videoId": "vid3" },
            },
        })))
        .unwrap();
        assert_eq!(
            mapped.published_at,
            Some("2024-01-15T10:00:00Z".parse().unwrap())
        );
        assert_eq!(
            mapped.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/vid3/mq.jpg")
        );
    }

    #[test]
    fn thumbnail_falls_back_to_default_resolution() {
        let mapped = map_playlist_item(item(serde_json::json!({
            "id": "pl-item-4",
            "snippet": {
                "title": "Fallback",
                "thumbnails": { "default": { "url": "https://i.ytimg.com/vi/vid4/def.jpg" } },
                "resourceId": { "videoId": "vid4" },
            },
        })))
        .unwrap();
        assert_eq!(
            mapped.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/vid4/def.jpg")
        );
    }

    #[test]
    fn no_channel_resolves_to_no_uploads_playlist() {
        let resolved = uploads_playlist_id(
            serde_json::from_value(serde_json::json!({
                "kind": "youtube#channelListResponse",
                "items": [],
                "pageInfo": { "totalResults": 0, "resultsPerPage": 0 },
            }))
            .unwrap(),
        );
        assert_eq!(resolved, None);
    }

    #[test]
    fn channel_without_uploads_playlist_resolves_to_none() {
        // contentDetails missing entirely
        let resolved = uploads_playlist_id(
            serde_json::from_value(serde_json::json!({
                "kind": "youtube#channelListResponse",
                "items": [{ "id": "chan1" }],
                "pageInfo": { "totalResults": 1, "resultsPerPage": 1 },
            }))
            .unwrap(),
        );
        assert_eq!(resolved, None);

        // contentDetails present but the uploads id is empty
        let resolved = uploads_playlist_id(
            serde_json::from_value(serde_json::json!({
                "kind": "youtube#channelListResponse",
                "items": [{
                    "id": "chan1",
                    "contentDetails": { "relatedPlaylists": { "uploads": "" } },
                }],
                "pageInfo": { "totalResults": 1, "resultsPerPage": 1 },
            }))
            .unwrap(),
        );
        assert_eq!(resolved, None);
    }

    #[test]
    fn channel_with_uploads_playlist_resolves_to_its_id() {
        let resolved = uploads_playlist_id(
            serde_json::from_value(serde_json::json!({
                "kind": "youtube#channelListResponse",
                "items": [{
                    "id": "chan1",
                    "contentDetails": { "relatedPlaylists": { "uploads": "UUchan1uploads" } },
                }],
                "pageInfo": { "totalResults": 1, "resultsPerPage": 1 },
            }))
            .unwrap(),
        );
        assert_eq!(resolved.as_deref(), Some("UUchan1uploads"));
    }

    #[test]
    fn empty_playlist_page_maps_to_an_empty_sequence() {
        let page: PlaylistItemListResponse = serde_json::from_value(serde_json::json!({
            "kind": "youtube#playlistItemListResponse",
            "items": [],
            "pageInfo": { "totalResults": 0, "resultsPerPage": 0 },
        }))
        .unwrap();
        assert_eq!(map_playlist_page(page), vec![]);
    }

    #[test]
    fn unmappable_items_are_filtered_from_the_page() {
        let page: PlaylistItemListResponse = serde_json::from_value(serde_json::json!({
            "kind": "youtube#playlistItemListResponse",
            "items": [
                {
                    "id": "pl-item-1",
                    "snippet": {
                        "title": "Kept",
                        "resourceId": { "kind": "youtube#video", "videoId": "vid1" },
                    },
                },
                {
                    "id": "pl-item-2",
                    "snippet": { "title": "Ghost" },
                },
            ],
            "pageInfo": { "totalResults": 2, "resultsPerPage": 2 },
        }))
        .unwrap();

        let mapped = map_playlist_page(page);
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].id, "vid1");
    }

    fn response_with_status(status: u16, body: &str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body(body.to_string())
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn failed_responses_are_classified_with_the_provider_message() {
        let err = error_for_status("upload", response_with_status(403, "quota exceeded"))
            .await
            .unwrap_err();
        match err {
            GatewayError::Remote { kind, message } => {
                assert_eq!(kind, RemoteErrorKind::Client);
                assert!(message.contains("403"));
                assert!(message.contains("quota exceeded"));
            }
            other => panic!("expected Remote, got {other:?}"),
        }

        let err = error_for_status("upload", response_with_status(401, "token revoked"))
            .await
            .unwrap_err();
        assert!(err.requires_reauthentication());

        assert!(
            error_for_status("upload", response_with_status(200, "{}"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn operations_require_a_session_with_an_access_token() {
        let client = client_with_access_token("");
        let details = VideoDetails::new(
            "clips/demo.mp4",
            "Demo",
            "",
            "22",
            PrivacyStatus::Private,
            vec![],
        )
        .unwrap();

        let err = client.upload_video(&details).await.unwrap_err();
        assert!(matches!(err, GatewayError::AuthenticationRequired));

        // the precondition propagates for listing too; it is not part of
        // the degrade-to-empty policy
        let err = client.list_uploaded_videos(None, None).await.unwrap_err();
        assert!(matches!(err, GatewayError::AuthenticationRequired));
    }

    #[tokio::test]
    async fn upload_of_a_missing_file_fails_before_any_network_call() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.mp4");
        let client = client_with_access_token("valid-token");
        let details = VideoDetails::new(
            missing.clone(),
            "Demo",
            "",
            "22",
            PrivacyStatus::Private,
            vec![],
        )
        .unwrap();

        let err = client.upload_video(&details).await.unwrap_err();
        match err {
            GatewayError::FileNotFound(path) => assert_eq!(path, missing),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }
}
