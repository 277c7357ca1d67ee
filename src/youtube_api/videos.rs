//! YouTube Videos API types for the upload call.

use crate::model::{PrivacyStatus, VideoDetails};
use serde::{Deserialize, Serialize};

/// Metadata half of a `videos.insert` multipart upload.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/insert>
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoUploadRequest {
    pub snippet: VideoUploadSnippet,
    pub status: VideoUploadStatus,
}

impl VideoUploadRequest {
    pub fn from_details(details: &VideoDetails) -> Self {
        Self {
            snippet: VideoUploadSnippet {
                title: details.title.clone(),
                description: details.description.clone(),
                tags: details.tags.clone(),
                category_id: details.category_id.clone(),
            },
            status: VideoUploadStatus {
                privacy_status: details.privacy_status,
            },
        }
    }
}

/// The snippet part of the upload metadata.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#snippet>
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoUploadSnippet {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "categoryId")]
    pub category_id: String,
}

/// The status part of the upload metadata.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#status>
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoUploadStatus {
    #[serde(rename = "privacyStatus")]
    pub privacy_status: PrivacyStatus,
}

/// The subset of the `video` resource returned by `videos.insert` that this
/// tool consumes: the remote-assigned identifier.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadedVideo {
    /// The ID that YouTube uses to uniquely identify the video.
    pub id: String,
}
