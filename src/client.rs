use crate::fetch::Fetcher;
use crate::materialize::{ArtCache, DownloadOptions, Materializer};
use crate::parsing::PageParser;
use crate::playlist::{build_playlist, format_playlist, PlaylistFormat};
use crate::tagging::TagWriter;
use crate::types::{AlbumExtract, PlaylistEntry};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Playlist text plus the album's cover art link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongsResponse {
    pub art_url: Option<String>,
    pub m3u8: String,
}

/// Main client: fetches album pages, builds playlists and downloads tracks.
///
/// Every call is independent. Nothing about an album outlives the call that
/// fetched it, except cover art written to the optional art cache directory.
///
/// # Examples
///
/// ```rust,no_run
/// use bandcamp_link_scraper::{BandcampClient, HttpFetcher, LoftyTagWriter, PlaylistFormat, Result};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let fetcher = HttpFetcher::new(Box::new(http_client::native::NativeClient::new()));
///     let client = BandcampClient::new(Box::new(fetcher), Box::new(LoftyTagWriter::new()));
///
///     let songs = client
///         .songs("https://artist.bandcamp.com/album/record", PlaylistFormat::Plain)
///         .await?;
///     println!("{}", songs.m3u8);
///     Ok(())
/// }
/// ```
pub struct BandcampClient {
    fetcher: Box<dyn Fetcher>,
    tag_writer: Box<dyn TagWriter>,
    parser: PageParser,
    art_cache_dir: Option<PathBuf>,
}

impl BandcampClient {
    pub fn new(fetcher: Box<dyn Fetcher>, tag_writer: Box<dyn TagWriter>) -> Self {
        Self {
            fetcher,
            tag_writer,
            parser: PageParser::new(),
            art_cache_dir: None,
        }
    }

    /// Keep downloaded cover art in `dir` so later downloads can reuse it.
    pub fn with_art_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.art_cache_dir = Some(dir.into());
        self
    }

    /// Fetch an album page and extract its tracks.
    pub async fn fetch_album(&self, album_url: &str) -> Result<AlbumExtract> {
        log::info!("Fetching album page {album_url}");
        let page = self.fetcher.fetch_text(album_url).await?;
        let album = self.parser.extract_album(&page)?;

        log::info!(
            "Album '{}' by {:?}: {} tracks, {} playable",
            album.album_title,
            album.album_artist,
            album.tracks.len(),
            album.playable_count()
        );
        Ok(album)
    }

    /// Fetch an album and return its playable tracks as playlist entries.
    pub async fn playlist(&self, album_url: &str) -> Result<(AlbumExtract, Vec<PlaylistEntry>)> {
        let album = self.fetch_album(album_url).await?;
        let entries = build_playlist(&album);
        Ok((album, entries))
    }

    /// Playlist of remote stream URLs for an album.
    pub async fn songs(&self, album_url: &str, format: PlaylistFormat) -> Result<SongsResponse> {
        let (album, entries) = self.playlist(album_url).await?;
        Ok(SongsResponse {
            art_url: album.album_art_url,
            m3u8: format_playlist(&entries, format),
        })
    }

    /// Download and tag an album, returning a plain playlist of local paths.
    ///
    /// The destination directory is checked before the page is fetched.
    pub async fn download(&self, album_url: &str, options: &DownloadOptions) -> Result<SongsResponse> {
        options.ensure_directory()?;
        let mut art_cache = self.new_art_cache();
        self.download_with_cache(album_url, options, &mut art_cache)
            .await
    }

    /// Download several albums one after another, concatenating their
    /// playlists. The first failure aborts the remaining albums.
    pub async fn bulk_download(&self, album_urls: &[String], options: &DownloadOptions) -> Result<String> {
        options.ensure_directory()?;
        let mut art_cache = self.new_art_cache();

        let mut playlists = Vec::with_capacity(album_urls.len());
        for url in album_urls {
            let response = self.download_with_cache(url, options, &mut art_cache).await?;
            playlists.push(response.m3u8);
        }

        Ok(playlists.join("\n"))
    }

    async fn download_with_cache(
        &self,
        album_url: &str,
        options: &DownloadOptions,
        art_cache: &mut ArtCache,
    ) -> Result<SongsResponse> {
        let (album, entries) = self.playlist(album_url).await?;

        let materializer = Materializer::new(self.fetcher.as_ref(), self.tag_writer.as_ref());
        let entries = materializer
            .materialize_to_disk(entries, options, art_cache)
            .await?;

        Ok(SongsResponse {
            art_url: album.album_art_url,
            m3u8: format_playlist(&entries, PlaylistFormat::Plain),
        })
    }

    fn new_art_cache(&self) -> ArtCache {
        match &self.art_cache_dir {
            Some(dir) => ArtCache::with_directory(dir),
            None => ArtCache::new(),
        }
    }
}
