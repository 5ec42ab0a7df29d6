//! Downloading playlist entries to disk and tagging the results.

use crate::fetch::Fetcher;
use crate::tagging::{TagWriter, TrackTags};
use crate::types::PlaylistEntry;
use crate::{BandcampError, Result};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where downloads go and how they are referenced from the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Existing directory the files are written to.
    pub directory: PathBuf,
    /// Prefix used for the file paths written into the playlist, e.g. the
    /// mount point of `directory` on the playing machine.
    pub playlist_song_directory: String,
    /// Re-download and re-tag files that already exist.
    pub force: bool,
}

impl DownloadOptions {
    pub fn new(directory: impl Into<PathBuf>, playlist_song_directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            playlist_song_directory: playlist_song_directory.into(),
            force: false,
        }
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Fail with [`BandcampError::DirectoryNotFound`] unless the destination exists.
    pub fn ensure_directory(&self) -> Result<()> {
        if self.directory.is_dir() {
            Ok(())
        } else {
            Err(BandcampError::DirectoryNotFound(self.directory.clone()))
        }
    }
}

/// Cover images keyed by the last path segment of their URL.
///
/// Entries are never invalidated. With a backing directory, misses are first
/// looked up on disk and fetched images are written there too. URLs without a
/// final path segment are fetched every time.
#[derive(Debug, Default)]
pub struct ArtCache {
    dir: Option<PathBuf>,
    entries: HashMap<String, Vec<u8>>,
}

impl ArtCache {
    /// In-memory cache only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache backed by files in `dir`.
    pub fn with_directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            entries: HashMap::new(),
        }
    }

    /// The key an art URL is stored under.
    pub fn cache_key(url: &str) -> String {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        path.rsplit('/').next().unwrap_or(path).to_string()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(&Self::cache_key(url))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the image for `url`, fetching it only on a full miss.
    pub async fn get_or_fetch(&mut self, url: &str, fetcher: &dyn Fetcher) -> Result<Vec<u8>> {
        let key = Self::cache_key(url);
        if key.is_empty() {
            // No file name to key on, so nothing is shared
            log::info!("Fetching uncacheable cover art {url}");
            return fetcher.fetch(url).await;
        }
        if let Some(bytes) = self.entries.get(&key) {
            return Ok(bytes.clone());
        }

        let local = self.dir.as_ref().map(|dir| dir.join(&key));

        let bytes = match &local {
            Some(path) if path.is_file() => {
                log::debug!("Using cached cover art {}", path.display());
                std::fs::read(path)?
            }
            _ => {
                log::info!("Fetching cover art {url}");
                let bytes = fetcher.fetch(url).await?;
                if let Some(path) = &local {
                    std::fs::write(path, &bytes)?;
                }
                bytes
            }
        };

        self.entries.insert(key, bytes.clone());
        Ok(bytes)
    }
}

/// Replace path separators so artist/title can be used as a file name.
pub fn sanitize_component(value: &str) -> String {
    value.replace(['/', '\\'], "_")
}

/// File name a downloaded entry is stored under.
pub fn track_filename(entry: &PlaylistEntry) -> String {
    format!(
        "{} - {}.mp3",
        sanitize_component(&entry.artist),
        sanitize_component(&entry.title)
    )
}

/// Join the published prefix and a file name the way the playlist expects.
pub fn published_path(prefix: &str, filename: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        filename.to_string()
    } else {
        format!("{prefix}/{filename}")
    }
}

/// Downloads entries and writes their tags.
pub struct Materializer<'a> {
    fetcher: &'a dyn Fetcher,
    tag_writer: &'a dyn TagWriter,
}

impl<'a> Materializer<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, tag_writer: &'a dyn TagWriter) -> Self {
        Self {
            fetcher,
            tag_writer,
        }
    }

    /// Download every entry into `options.directory` and point it at its
    /// published path.
    ///
    /// Files that already exist are left alone unless `options.force` is set,
    /// which makes repeated calls cheap and yields the same playlist. Entries
    /// are processed in order and the first fetch or write failure aborts the
    /// rest of the batch.
    pub async fn materialize_to_disk(
        &self,
        entries: Vec<PlaylistEntry>,
        options: &DownloadOptions,
        art_cache: &mut ArtCache,
    ) -> Result<Vec<PlaylistEntry>> {
        options.ensure_directory()?;

        let mut materialized = Vec::with_capacity(entries.len());
        for entry in entries {
            let filename = track_filename(&entry);
            let target = options.directory.join(&filename);

            if target.exists() && !options.force {
                log::info!("Song '{} - {}' already downloaded", entry.artist, entry.title);
            } else {
                self.download_entry(&entry, &target, art_cache).await?;
                log::info!("Downloaded song '{} - {}'", entry.artist, entry.title);
            }

            let location = published_path(&options.playlist_song_directory, &filename);
            materialized.push(entry.relocated(location));
        }

        Ok(materialized)
    }

    /// Fetch and tag into a staging file next to `target`, renaming it into
    /// place only once tagging succeeded. A failed entry leaves nothing at
    /// `target`, so the next run downloads it again.
    async fn download_entry(
        &self,
        entry: &PlaylistEntry,
        target: &Path,
        art_cache: &mut ArtCache,
    ) -> Result<()> {
        let audio = self.fetcher.fetch(&entry.media_location).await?;

        let staging_dir = target.parent().unwrap_or_else(|| Path::new("."));
        let mut staged = tempfile::Builder::new()
            .prefix(".partial-")
            .suffix(".mp3")
            .tempfile_in(staging_dir)?;
        staged.write_all(&audio)?;
        staged.flush()?;

        let mut tags = TrackTags::from_entry(entry);
        if let Some(art_url) = &entry.album_art_url {
            let cover = art_cache.get_or_fetch(art_url, self.fetcher).await?;
            tags = tags.with_cover(cover, &entry.tags);
        }

        self.tag_writer.write_tags(staged.path(), &tags)?;
        staged.persist(target).map_err(|err| err.error)?;
        Ok(())
    }
}
