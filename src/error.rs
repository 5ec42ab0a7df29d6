use std::path::PathBuf;
use thiserror::Error;

/// Error types for scraping, downloading and tagging operations.
///
/// Extraction fails hard only when the embedded album payload is missing or
/// unreadable. Tracks without a stream are not errors; they are filtered out
/// with a warning.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use bandcamp_link_scraper::{BandcampClient, BandcampError, HttpFetcher, LoftyTagWriter, PlaylistFormat};
///
/// #[tokio::main]
/// async fn main() {
///     let fetcher = HttpFetcher::new(Box::new(http_client::native::NativeClient::new()));
///     let client = BandcampClient::new(Box::new(fetcher), Box::new(LoftyTagWriter::new()));
///
///     match client.songs("https://artist.bandcamp.com/album/x", PlaylistFormat::Plain).await {
///         Ok(response) => println!("{}", response.m3u8),
///         Err(BandcampError::MissingPayload) => eprintln!("Not an album page"),
///         Err(BandcampError::FetchFailed(msg)) => eprintln!("Network error: {}", msg),
///         Err(e) => eprintln!("Other error: {}", e),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum BandcampError {
    /// No `<script data-tralbum>` element was found in the page.
    ///
    /// Usually means the URL does not point at an album or track page.
    #[error("Embedded album data not found in page")]
    MissingPayload,

    /// The embedded album payload exists but could not be parsed.
    #[error("Malformed album data: {0}")]
    MalformedSource(String),

    /// HTTP/network related errors for page, media or cover art requests.
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// The download destination does not exist.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Embedded metadata could not be written to a downloaded file.
    #[error("Tagging failed: {0}")]
    Tagging(String),

    /// Runtime configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for BandcampError {
    fn from(err: config::ConfigError) -> Self {
        BandcampError::Config(err.to_string())
    }
}

impl From<lofty::error::LoftyError> for BandcampError {
    fn from(err: lofty::error::LoftyError) -> Self {
        BandcampError::Tagging(err.to_string())
    }
}
