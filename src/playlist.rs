//! Turning extracted albums into playlist entries and playlist text.

use crate::types::{AlbumExtract, PlaylistEntry};
use serde::{Deserialize, Serialize};

/// Text layout of a rendered playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistFormat {
    /// `# Artist - Title` comment line followed by the media location.
    #[default]
    Plain,
    /// One `annotate:` line per entry carrying artist, title, album and duration.
    Annotated,
}

/// Build playlist entries for every playable track, in album order.
///
/// Tracks without a stream URL are dropped; everything else maps 1:1 with the
/// stream URL as the media location.
pub fn build_playlist(extract: &AlbumExtract) -> Vec<PlaylistEntry> {
    let album_artist = extract.album_artist.clone().unwrap_or_default();

    extract
        .tracks
        .iter()
        .filter_map(|track| {
            let stream_url = track.stream_url.as_ref()?;
            Some(PlaylistEntry {
                track_number: track.index,
                album_artist: album_artist.clone(),
                artist: track.artist.clone().unwrap_or_default(),
                title: track.title.clone(),
                album: extract.album_title.clone(),
                album_art_url: extract.album_art_url.clone(),
                media_location: stream_url.clone(),
                duration_seconds: track.duration_seconds,
                tags: track.tags.clone(),
            })
        })
        .collect()
}

/// Render entries as playlist text, one block per entry joined by newlines.
pub fn format_playlist(entries: &[PlaylistEntry], format: PlaylistFormat) -> String {
    entries
        .iter()
        .map(|entry| match format {
            PlaylistFormat::Plain => format_plain(entry),
            PlaylistFormat::Annotated => format_annotated(entry),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_plain(entry: &PlaylistEntry) -> String {
    format!(
        "# {} - {}\n{}",
        entry.artist, entry.title, entry.media_location
    )
}

fn format_annotated(entry: &PlaylistEntry) -> String {
    format!(
        "annotate:artist=\"{}\",title=\"{}\",album=\"{}\",duration=\"{}\":{}",
        escape_quotes(&entry.artist),
        escape_quotes(&entry.title),
        escape_quotes(&entry.album),
        entry.duration_seconds,
        entry.media_location
    )
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}
