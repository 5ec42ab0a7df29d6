//! Embedded metadata for downloaded tracks, written with `lofty`.

use crate::types::PlaylistEntry;
use crate::{BandcampError, Result};
use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::picture::{Picture, PictureType};
use lofty::prelude::Accessor;
use lofty::read_from_path;
use lofty::tag::{ItemKey, Tag};
use std::path::Path;

/// Metadata written into a downloaded file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackTags {
    pub track_number: u32,
    pub album_artist: String,
    pub artist: String,
    pub album: String,
    pub title: String,
    /// Cover image bytes. When set, existing pictures, comments and the
    /// recording date are removed before writing.
    pub cover: Option<Vec<u8>>,
    pub comment: Option<String>,
}

impl TrackTags {
    /// Text fields of an entry, without cover or comment.
    pub fn from_entry(entry: &PlaylistEntry) -> Self {
        Self {
            track_number: entry.track_number,
            album_artist: entry.album_artist.clone(),
            artist: entry.artist.clone(),
            album: entry.album.clone(),
            title: entry.title.clone(),
            cover: None,
            comment: None,
        }
    }

    /// Attach a cover image and a comment listing the album tags.
    pub fn with_cover(mut self, cover: Vec<u8>, tags: &[String]) -> Self {
        self.cover = Some(cover);
        self.comment = Some(tags.join(","));
        self
    }
}

/// Writes [`TrackTags`] into a local audio file, creating a tag container if
/// the file has none.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TagWriter: Send + Sync {
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<()>;
}

/// [`TagWriter`] producing ID3v2.3 tags through `lofty`.
#[derive(Debug, Clone, Default)]
pub struct LoftyTagWriter;

impl LoftyTagWriter {
    pub fn new() -> Self {
        Self
    }
}

impl TagWriter for LoftyTagWriter {
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<()> {
        let mut tagged_file = read_from_path(path)?;
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let tag = tagged_file.tag_mut(tag_type).ok_or_else(|| {
            BandcampError::Tagging(format!("No writable tag available for {tag_type:?}"))
        })?;

        tag.set_track(tags.track_number);
        tag.insert_text(ItemKey::AlbumArtist, tags.album_artist.clone());
        tag.set_artist(tags.artist.clone());
        tag.set_album(tags.album.clone());
        tag.set_title(tags.title.clone());

        if let Some(cover) = &tags.cover {
            // Leftover art, comments or dates make players split the album
            while !tag.pictures().is_empty() {
                tag.remove_picture(0);
            }
            tag.remove_key(ItemKey::Comment);
            tag.remove_key(ItemKey::RecordingDate);

            let mut picture = Picture::from_reader(&mut cover.as_slice())?;
            picture.set_pic_type(PictureType::CoverFront);
            // ID3v2.3 cannot represent an empty UTF-16 description
            picture.set_description(Some("Cover".to_string()));
            tag.push_picture(picture);
        }

        if let Some(comment) = &tags.comment {
            tag.set_comment(comment.clone());
        }

        tagged_file.save_to_path(path, WriteOptions::default().use_id3v23(true))?;
        log::debug!("Wrote tags to {}", path.display());
        Ok(())
    }
}
