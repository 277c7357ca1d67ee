//! Domain value types: upload metadata, audit log entries, and the listing
//! projection of remote videos.
//!
//! All of these are validated at construction and immutable afterwards.

use crate::error::InvalidVideoDetails;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Base of the viewer-facing watch page. The upload API returns only an
/// opaque video id; the watch URL is always derived locally.
pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// Derives the watch-page URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL_BASE}{video_id}")
}

/// Visibility of an uploaded video.
///
/// Unknown strings are rejected when parsing rather than being silently
/// normalized to [`PrivacyStatus::Private`]; a typo'd `--privacy` flag
/// should fail loudly instead of publishing (or hiding) a video by
/// accident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    Public,
    #[default]
    Private,
    Unlisted,
}

impl FromStr for PrivacyStatus {
    type Err = InvalidVideoDetails;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(PrivacyStatus::Public),
            "private" => Ok(PrivacyStatus::Private),
            "unlisted" => Ok(PrivacyStatus::Unlisted),
            _ => Err(InvalidVideoDetails::UnknownPrivacyStatus(s.to_string())),
        }
    }
}

impl fmt::Display for PrivacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivacyStatus::Public => write!(f, "public"),
            PrivacyStatus::Private => write!(f, "private"),
            PrivacyStatus::Unlisted => write!(f, "unlisted"),
        }
    }
}

/// Metadata for a single upload attempt.
///
/// Whether the file actually exists is checked at upload time by the
/// gateway, not here; this type only guarantees the metadata is
/// well-formed.
#[derive(Debug, Clone)]
pub struct VideoDetails {
    pub file_path: PathBuf,
    pub title: String,
    /// May be empty.
    pub description: String,
    /// Numeric YouTube category code, e.g. `"22"`.
    pub category_id: String,
    pub privacy_status: PrivacyStatus,
    pub tags: Vec<String>,
}

impl VideoDetails {
    pub fn new(
        file_path: impl Into<PathBuf>,
        title: impl Into<String>,
        description: impl Into<String>,
        category_id: impl Into<String>,
        privacy_status: PrivacyStatus,
        tags: Vec<String>,
    ) -> Result<Self, InvalidVideoDetails> {
        let file_path = file_path.into();
        let title = title.into();
        let category_id = category_id.into();

        if file_path.as_os_str().is_empty() {
            return Err(InvalidVideoDetails::EmptyFilePath);
        }
        if title.trim().is_empty() {
            return Err(InvalidVideoDetails::EmptyTitle);
        }
        if category_id.trim().is_empty() {
            return Err(InvalidVideoDetails::EmptyCategoryId);
        }

        Ok(Self {
            file_path,
            title,
            description: description.into(),
            category_id,
            privacy_status,
            tags,
        })
    }
}

/// Outcome of one upload attempt, as recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Success,
    Failure,
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Success => write!(f, "SUCCESS"),
            UploadStatus::Failure => write!(f, "FAILURE"),
        }
    }
}

/// One row of the audit log.
///
/// [`UploadLogEntry::success`] and [`UploadLogEntry::failure`] are the
/// supported constructors; they guarantee that a `Success` entry carries a
/// watch URL and that `details` is never empty. The fields stay public for
/// the log writer and for callers branching on the outcome.
#[derive(Debug, Clone)]
pub struct UploadLogEntry {
    pub video_title: String,
    pub file_path: PathBuf,
    pub youtube_url: Option<String>,
    pub upload_date: Timestamp,
    pub status: UploadStatus,
    /// Remote video id on success, human-readable error on failure.
    pub details: String,
}

impl UploadLogEntry {
    /// Records a successful upload of `video` that the remote side assigned
    /// `video_id`.
    pub fn success(video: &VideoDetails, video_id: &str) -> Self {
        Self {
            video_title: video.title.clone(),
            file_path: video.file_path.clone(),
            youtube_url: Some(watch_url(video_id)),
            upload_date: Timestamp::now(),
            status: UploadStatus::Success,
            details: video_id.to_string(),
        }
    }

    /// Records a failed upload attempt of `video` with a human-readable
    /// reason.
    pub fn failure(video: &VideoDetails, reason: impl Into<String>) -> Self {
        let mut reason = reason.into();
        if reason.trim().is_empty() {
            reason = "unknown error".to_string();
        }
        Self {
            video_title: video.title.clone(),
            file_path: video.file_path.clone(),
            youtube_url: None,
            upload_date: Timestamp::now(),
            status: UploadStatus::Failure,
            details: reason,
        }
    }
}

/// Read-only projection of one previously uploaded video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoListItem {
    pub id: String,
    pub title: String,
    pub youtube_url: String,
    /// None when the remote publish date was absent or unparseable; a bad
    /// date never drops the item from the listing.
    pub published_at: Option<Timestamp>,
    pub thumbnail_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn valid_details_construct() {
        let details = VideoDetails::new(
            "clips/demo.mp4",
            "Demo",
            "",
            "22",
            PrivacyStatus::Private,
            vec!["rust".into(), "demo".into()],
        )
        .unwrap();
        assert_eq!(details.title, "Demo");
        assert_eq!(details.category_id, "22");
        assert_eq!(details.privacy_status, PrivacyStatus::Private);
        assert_eq!(details.tags.len(), 2);
    }

    #[test]
    fn empty_title_is_rejected() {
        let err = VideoDetails::new(
            "clips/demo.mp4",
            "   ",
            "",
            "22",
            PrivacyStatus::default(),
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, InvalidVideoDetails::EmptyTitle);
    }

    #[test]
    fn empty_file_path_is_rejected() {
        let err =
            VideoDetails::new("", "Demo", "", "22", PrivacyStatus::default(), vec![]).unwrap_err();
        assert_eq!(err, InvalidVideoDetails::EmptyFilePath);
    }

    #[test]
    fn empty_category_is_rejected() {
        let err = VideoDetails::new(
            "clips/demo.mp4",
            "Demo",
            "",
            "",
            PrivacyStatus::default(),
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, InvalidVideoDetails::EmptyCategoryId);
    }

    #[test]
    fn privacy_parses_known_values_case_insensitively() {
        assert_eq!("public".parse::<PrivacyStatus>().unwrap(), PrivacyStatus::Public);
        assert_eq!("Private".parse::<PrivacyStatus>().unwrap(), PrivacyStatus::Private);
        assert_eq!("UNLISTED".parse::<PrivacyStatus>().unwrap(), PrivacyStatus::Unlisted);
    }

    #[test]
    fn unknown_privacy_is_rejected_not_defaulted() {
        let err = "friends-only".parse::<PrivacyStatus>().unwrap_err();
        assert_eq!(
            err,
            InvalidVideoDetails::UnknownPrivacyStatus("friends-only".to_string())
        );
    }

    #[test]
    fn success_entry_carries_watch_url_and_id() {
        let details = VideoDetails::new(
            "clips/demo.mp4",
            "Demo",
            "",
            "22",
            PrivacyStatus::Private,
            vec![],
        )
        .unwrap();
        let entry = UploadLogEntry::success(&details, "abc123");
        assert_eq!(entry.status, UploadStatus::Success);
        assert_eq!(entry.details, "abc123");
        assert_eq!(
            entry.youtube_url.as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );
    }

    #[test]
    fn failure_entry_has_no_url_and_nonempty_details() {
        let details = VideoDetails::new(
            "clips/demo.mp4",
            "Demo",
            "",
            "22",
            PrivacyStatus::Private,
            vec![],
        )
        .unwrap();
        let entry = UploadLogEntry::failure(&details, "quota exceeded");
        assert_eq!(entry.status, UploadStatus::Failure);
        assert_eq!(entry.youtube_url, None);
        assert_eq!(entry.details, "quota exceeded");

        // even an empty reason leaves the details column populated
        let entry = UploadLogEntry::failure(&details, "");
        assert_eq!(entry.details, "unknown error");
    }
}
