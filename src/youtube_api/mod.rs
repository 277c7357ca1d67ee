//! YouTube Data API v3 client for the operations this tool consumes:
//! uploading a video, resolving the authenticated user's uploads playlist,
//! and paging through that playlist.
//!
//! Each submodule holds the wire types for one API resource; the
//! authenticated client and its error classification live in [`client`].

pub mod channels;
pub mod client;
pub mod playlist_items;
pub mod types;
pub mod videos;

pub use client::{TimeBoundAccessToken, YouTubeClient};
pub use types::{PageInfo, Thumbnail, Thumbnails};

pub use channels::{Channel, ChannelContentDetails, ChannelListResponse, RelatedPlaylists};
pub use playlist_items::{
    PlaylistItem, PlaylistItemListResponse, PlaylistItemSnippet, ResourceId,
};
pub use videos::{UploadedVideo, VideoUploadRequest, VideoUploadSnippet, VideoUploadStatus};
