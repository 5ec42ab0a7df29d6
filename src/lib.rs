//! Scrape Bandcamp album pages into playlists.
//!
//! Album pages are reduced to an [`AlbumExtract`] by [`PageParser`], turned
//! into [`PlaylistEntry`] values by [`build_playlist`], and optionally
//! downloaded and tagged by [`Materializer`]. [`BandcampClient`] wires these
//! together and [`api`] exposes them over HTTP.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod headers;
pub mod materialize;
pub mod parsing;
pub mod playlist;
pub mod tagging;
pub mod types;

pub use client::{BandcampClient, SongsResponse};
pub use config::ScraperConfig;
pub use error::BandcampError;
pub use fetch::{Fetcher, HttpFetcher};
pub use materialize::{ArtCache, DownloadOptions, Materializer};
pub use parsing::PageParser;
pub use playlist::{build_playlist, format_playlist, PlaylistFormat};
pub use tagging::{LoftyTagWriter, TagWriter, TrackTags};
pub use types::{
    AlbumExtract, CurrentRelease, EmbeddedPayload, PlaylistEntry, RawTrack, ScrapedFallbacks,
    TrackExtract, TrackFile,
};

#[cfg(feature = "mock")]
pub use fetch::MockFetcher;
#[cfg(feature = "mock")]
pub use tagging::MockTagWriter;

// Re-export scraper types for testing
pub use scraper::Html;

pub type Result<T> = std::result::Result<T, BandcampError>;
