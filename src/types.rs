//! Data types for scraped album pages and the playlists built from them.
//!
//! The flow is `EmbeddedPayload` + `ScrapedFallbacks` → `AlbumExtract` →
//! `PlaylistEntry`. None of these types are cached or persisted; they live
//! for a single request.

use serde::{Deserialize, Serialize};

// ================================================================================================
// EMBEDDED PAYLOAD
// ================================================================================================

/// The JSON object carried in a page's `<script data-tralbum="...">` attribute.
///
/// Only the fields the extractor needs are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedPayload {
    /// Release-level information. Some pages publish it as `null`.
    #[serde(default)]
    pub current: Option<CurrentRelease>,
    /// Ordered track listing.
    pub trackinfo: Vec<RawTrack>,
}

impl EmbeddedPayload {
    /// Album-level artist, if the payload names one.
    pub fn album_artist(&self) -> Option<&str> {
        self.current.as_ref().and_then(|c| c.artist.as_deref())
    }

    /// Album title as recorded in the payload.
    pub fn album_title(&self) -> Option<&str> {
        self.current.as_ref().and_then(|c| c.title.as_deref())
    }
}

/// The `current` block of the embedded payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentRelease {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// One raw entry of `trackinfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrack {
    /// Per-track artist, set on compilations and label releases.
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub track_num: Option<u32>,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Stream links. `null` when the track cannot be played.
    #[serde(default)]
    pub file: Option<TrackFile>,
}

/// Stream links of a raw track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackFile {
    #[serde(rename = "mp3-128", default)]
    pub mp3_128: Option<String>,
}

// ================================================================================================
// HTML FALLBACKS
// ================================================================================================

/// Values scraped from the page markup to cover gaps in the embedded payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedFallbacks {
    /// Text of the first `h2.trackTitle` heading.
    pub page_title: Option<String>,
    /// Text of the first link after the "by" marker in the artist heading.
    pub page_artist: Option<String>,
    /// Link to the full-size cover art.
    pub album_art_url: Option<String>,
    /// Tag link texts in document order, duplicates kept.
    pub tags: Vec<String>,
}

// ================================================================================================
// EXTRACTED ALBUM
// ================================================================================================

/// The reconciled result of extracting one album page.
///
/// `tracks` keeps the order of `trackinfo` and still contains unplayable
/// tracks; they are removed by [`crate::playlist::build_playlist`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlbumExtract {
    /// Payload artist if present, otherwise the page-derived artist.
    pub album_artist: Option<String>,
    pub album_title: String,
    pub album_art_url: Option<String>,
    /// Album-wide tags; also copied onto every track.
    pub tags: Vec<String>,
    pub tracks: Vec<TrackExtract>,
}

impl AlbumExtract {
    /// Number of tracks that have a stream URL.
    pub fn playable_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_playable()).count()
    }
}

/// A single track of an [`AlbumExtract`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackExtract {
    /// Track number on the release.
    pub index: u32,
    /// Resolved artist. `None` only when neither the track, the payload nor
    /// the page names one.
    pub artist: Option<String>,
    pub title: String,
    pub duration_seconds: f64,
    /// 128kbps MP3 stream. `None` marks the track as unplayable.
    pub stream_url: Option<String>,
    pub tags: Vec<String>,
}

impl TrackExtract {
    pub fn is_playable(&self) -> bool {
        self.stream_url.is_some()
    }
}

// ================================================================================================
// PLAYLIST
// ================================================================================================

/// One playable track, ready to be formatted or downloaded.
///
/// Only `media_location` ever changes after construction: a download rewrites
/// it from the remote stream URL to the published local path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub track_number: u32,
    pub album_artist: String,
    pub artist: String,
    pub title: String,
    pub album: String,
    pub album_art_url: Option<String>,
    /// Remote stream URL or published local path.
    pub media_location: String,
    pub duration_seconds: f64,
    pub tags: Vec<String>,
}

impl PlaylistEntry {
    /// Return the same entry pointing at a different media location.
    pub fn relocated(self, media_location: impl Into<String>) -> Self {
        Self {
            media_location: media_location.into(),
            ..self
        }
    }
}
