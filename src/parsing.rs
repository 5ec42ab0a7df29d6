//! HTML parsing utilities for Bandcamp album pages.
//!
//! An album page carries its track listing as JSON in the `data-tralbum`
//! attribute of a `<script>` element. That payload is authoritative for the
//! tracks, but label releases often name the label instead of the real artist
//! and leave the album-level artist empty, so a handful of values are also
//! scraped from the visible markup and used as fallbacks.

use crate::types::{AlbumExtract, EmbeddedPayload, RawTrack, ScrapedFallbacks, TrackExtract};
use crate::{BandcampError, Result};
use scraper::{ElementRef, Html, Node, Selector};

/// Separator between artist and album in label-release page titles.
const TITLE_SEPARATOR: &str = " - ";

/// Parser for Bandcamp album pages.
///
/// Stateless: every call works on the document it is given, so one instance
/// can be shared freely.
#[derive(Debug, Clone)]
pub struct PageParser;

impl PageParser {
    /// Create a new parser instance.
    pub fn new() -> Self {
        Self
    }

    /// Parse page markup and extract the album it describes.
    pub fn extract_album(&self, html: &str) -> Result<AlbumExtract> {
        let document = Html::parse_document(html);
        self.extract_album_from_document(&document)
    }

    /// Extract the album from an already parsed document.
    ///
    /// Fails only if the embedded payload is missing or malformed; every
    /// markup fallback degrades to `None` or empty instead.
    pub fn extract_album_from_document(&self, document: &Html) -> Result<AlbumExtract> {
        let payload = self.parse_payload(document)?;
        let fallbacks = self.scan_fallbacks(document);

        log::debug!(
            "Page title: {:?}, page artist: {:?}, art: {:?}, {} tags",
            fallbacks.page_title,
            fallbacks.page_artist,
            fallbacks.album_art_url,
            fallbacks.tags.len()
        );

        Ok(reconcile(payload, fallbacks))
    }

    /// Find the `data-tralbum` script and decode its JSON payload.
    pub fn parse_payload(&self, document: &Html) -> Result<EmbeddedPayload> {
        let script_selector = Selector::parse("script[data-tralbum]").unwrap();

        let raw = document
            .select(&script_selector)
            .next()
            .and_then(|script| script.value().attr("data-tralbum"))
            .ok_or(BandcampError::MissingPayload)?;

        serde_json::from_str(raw).map_err(|e| BandcampError::MalformedSource(e.to_string()))
    }

    /// Walk the document once, in order, collecting the markup fallbacks.
    pub fn scan_fallbacks(&self, document: &Html) -> ScrapedFallbacks {
        document
            .root_element()
            .descendants()
            .filter_map(|node| match node.value() {
                Node::Element(_) => ElementRef::wrap(node).map(MarkupEvent::Start),
                Node::Text(text) => Some(MarkupEvent::Text(&**text)),
                _ => None,
            })
            .fold(FallbackScan::default(), FallbackScan::step)
            .finish()
    }
}

impl Default for PageParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a page title into `(fallback artist, album title)`.
///
/// Label releases title their pages `"Artist - Album"`; in that case the left
/// segment is the artist and the second segment is the album. Otherwise the
/// artist scraped from the "by" line is used and the whole title is the album.
pub fn split_page_title(
    page_title: Option<&str>,
    page_artist: Option<&str>,
) -> (Option<String>, Option<String>) {
    match page_title {
        Some(title) if title.contains(TITLE_SEPARATOR) => {
            let mut parts = title.split(TITLE_SEPARATOR);
            let artist = parts.next().map(str::to_string);
            let album = parts.next().map(str::to_string);
            (artist, album)
        }
        Some(title) => (page_artist.map(str::to_string), Some(title.to_string())),
        None => (page_artist.map(str::to_string), None),
    }
}

/// Combine the embedded payload with the scraped fallbacks.
fn reconcile(payload: EmbeddedPayload, fallbacks: ScrapedFallbacks) -> AlbumExtract {
    let (page_artist, page_album) = split_page_title(
        fallbacks.page_title.as_deref(),
        fallbacks.page_artist.as_deref(),
    );

    let album_artist = payload
        .album_artist()
        .map(str::to_string)
        .or_else(|| page_artist.clone());

    let album_title = page_album
        .or_else(|| payload.album_title().map(str::to_string))
        .unwrap_or_default();

    log::debug!("Album artist: {album_artist:?}, album: '{album_title}'");

    let tracks = payload
        .trackinfo
        .into_iter()
        .enumerate()
        .map(|(position, raw)| {
            build_track(
                position,
                raw,
                album_artist.as_deref(),
                page_artist.as_deref(),
                &fallbacks.tags,
            )
        })
        .collect();

    AlbumExtract {
        album_artist,
        album_title,
        album_art_url: fallbacks.album_art_url,
        tags: fallbacks.tags,
        tracks,
    }
}

fn build_track(
    position: usize,
    raw: RawTrack,
    album_artist: Option<&str>,
    page_artist: Option<&str>,
    tags: &[String],
) -> TrackExtract {
    let artist = raw
        .artist
        .or_else(|| album_artist.map(str::to_string))
        .or_else(|| page_artist.map(str::to_string));

    let title = raw.title.unwrap_or_default();

    let stream_url = raw
        .file
        .and_then(|file| file.mp3_128)
        .filter(|url| !url.is_empty());

    if stream_url.is_none() {
        log::warn!("Track '{title}' is not available for playing, skipping it");
    }

    TrackExtract {
        index: raw.track_num.unwrap_or(position as u32 + 1),
        artist,
        title,
        duration_seconds: raw.duration.unwrap_or(0.0),
        stream_url,
        tags: tags.to_vec(),
    }
}

// === FALLBACK SCAN STATE MACHINE ===

/// One step of a document-order walk: an element opening or a text run.
enum MarkupEvent<'a> {
    Start(ElementRef<'a>),
    Text(&'a str),
}

#[derive(Debug, Clone, Default, PartialEq)]
enum TitleScan {
    #[default]
    SeekingTitle,
    Done(String),
}

/// The artist link sits after the first `h3`, past a text run containing "by".
#[derive(Debug, Clone, Default, PartialEq)]
enum ArtistScan {
    #[default]
    SeekingArtistHeading,
    SeekingByMarker,
    SeekingArtistAnchor,
    Done(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
enum ArtScan {
    #[default]
    SeekingArtMarker,
    SeekingArtLink,
    Done(String),
}

#[derive(Debug, Clone, Default)]
struct FallbackScan {
    title: TitleScan,
    artist: ArtistScan,
    art: ArtScan,
    tags: Vec<String>,
}

impl FallbackScan {
    fn step(self, event: MarkupEvent<'_>) -> Self {
        match event {
            MarkupEvent::Start(element) => self.on_element(element),
            MarkupEvent::Text(text) => self.on_text(text),
        }
    }

    fn on_element(self, element: ElementRef<'_>) -> Self {
        let el = element.value();
        let name = el.name();
        let is_anchor = name == "a";

        let title = match self.title {
            TitleScan::SeekingTitle if name == "h2" && has_class(&element, "trackTitle") => {
                TitleScan::Done(element_text(&element))
            }
            state => state,
        };

        let artist = match self.artist {
            ArtistScan::SeekingArtistHeading if name == "h3" => ArtistScan::SeekingByMarker,
            ArtistScan::SeekingArtistAnchor if is_anchor => {
                ArtistScan::Done(element_text(&element))
            }
            state => state,
        };

        let art = match self.art {
            ArtScan::SeekingArtMarker if name == "div" && el.id() == Some("tralbumArt") => {
                ArtScan::SeekingArtLink
            }
            ArtScan::SeekingArtLink if is_anchor => match el.attr("href") {
                Some(href) => ArtScan::Done(href.to_string()),
                None => ArtScan::SeekingArtLink,
            },
            state => state,
        };

        let mut tags = self.tags;
        if is_anchor && has_class(&element, "tag") {
            tags.push(element_text(&element));
        }

        Self {
            title,
            artist,
            art,
            tags,
        }
    }

    fn on_text(self, text: &str) -> Self {
        let artist = match self.artist {
            ArtistScan::SeekingByMarker if text.contains("by") => ArtistScan::SeekingArtistAnchor,
            state => state,
        };

        Self { artist, ..self }
    }

    fn finish(self) -> ScrapedFallbacks {
        ScrapedFallbacks {
            page_title: match self.title {
                TitleScan::Done(title) => Some(title),
                TitleScan::SeekingTitle => None,
            },
            page_artist: match self.artist {
                ArtistScan::Done(artist) => Some(artist),
                _ => None,
            },
            album_art_url: match self.art {
                ArtScan::Done(url) => Some(url),
                _ => None,
            },
            tags: self.tags,
        }
    }
}

fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
