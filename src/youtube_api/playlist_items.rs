//! YouTube PlaylistItems API types.
//!
//! Listing a user's uploads pages through the uploads playlist resolved via
//! [`crate::youtube_api::channels`].

use crate::youtube_api::types::{PageInfo, Thumbnails};
use serde::{Deserialize, Serialize};

/// Response structure for the `playlistItems.list` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems/list>
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistItemListResponse {
    /// Identifies the API resource's type.
    ///
    /// The value will be `youtube#playlistItemListResponse`.
    pub kind: String,
    /// A list of playlist items that match the request criteria.
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    /// Token that can be used as the value of the pageToken parameter to
    /// retrieve the next page in the result set.
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// A `playlistItem` resource, restricted to the parts this tool requests.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// The ID that YouTube uses to uniquely identify the playlist item
    /// (not the video it references).
    pub id: String,
    pub snippet: PlaylistItemSnippet,
}

/// The snippet object of a playlist item.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlistItems#snippet>
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistItemSnippet {
    /// The item's title (the video title for uploads-playlist items).
    pub title: String,
    /// When the item was added to the playlist, ISO 8601.
    ///
    /// Kept as the raw string so a malformed date degrades to a missing
    /// timestamp on the mapped item instead of failing the whole page.
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Thumbnails>,
    /// Reference to the video this item wraps. Occasionally absent (e.g.
    /// deleted videos); such items cannot be listed.
    #[serde(rename = "resourceId")]
    pub resource_id: Option<ResourceId>,
}

/// The `resourceId` object identifying the wrapped resource.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResourceId {
    /// The kind of the referred resource, e.g. `youtube#video`.
    pub kind: Option<String>,
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}
