#![allow(dead_code)]
use async_trait::async_trait;
use bandcamp_link_scraper::{BandcampError, Fetcher, Result, TagWriter, TrackTags};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const ALBUM_URL: &str = "https://band.bandcamp.com/album/record";
pub const ART_URL: &str = "https://f4.bcbits.com/img/a0001_10.jpg";

/// Payload from the end-to-end example: one playable and one locked track.
pub const BAND_PAYLOAD: &str = r#"{"current":{"artist":"Band"},"trackinfo":[{"artist":null,"title":"Song A","track_num":1,"duration":180.0,"file":{"mp3-128":"http://x/a.mp3"}},{"artist":null,"title":"Song B","track_num":2,"duration":0,"file":null}]}"#;

/// Build an album page around a payload with the usual Bandcamp markup.
pub fn album_page(
    payload: &str,
    title: &str,
    by_artist: &str,
    art_url: Option<&str>,
    tags: &[&str],
) -> String {
    let art = art_url
        .map(|url| {
            format!(
                r#"<div id="tralbumArt"><a class="popupImage" href="{url}"><img src="{url}.thumb"></a></div>"#
            )
        })
        .unwrap_or_default();
    let tags = tags
        .iter()
        .map(|tag| format!(r#"<a class="tag" href="/tag/{tag}">{tag}</a>"#))
        .collect::<String>();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title>
<script type="text/javascript" data-tralbum='{payload}'></script>
</head>
<body>
<div id="name-section">
  <h2 class="trackTitle">
    {title}
  </h2>
  <h3 style="margin:0px;">
    <span>by <span><a href="https://band.bandcamp.com">{by_artist}</a></span></span>
  </h3>
</div>
{art}
<div class="tralbumData tralbum-tags">{tags}</div>
</body>
</html>"#
    )
}

/// Fetcher serving canned bytes and counting requests per URL.
#[derive(Debug, Default, Clone)]
pub struct FakeFetcher {
    responses: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), body.into());
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| BandcampError::FetchFailed(format!("{url}: HTTP 404")))
    }
}

/// Tag writer that records what it was asked to write.
#[derive(Debug, Default, Clone)]
pub struct RecordingTagWriter {
    writes: Arc<Mutex<Vec<(PathBuf, TrackTags)>>>,
}

impl RecordingTagWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<(PathBuf, TrackTags)> {
        self.writes.lock().unwrap().clone()
    }
}

impl TagWriter for RecordingTagWriter {
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<()> {
        self.writes
            .lock()
            .unwrap()
            .push((path.to_path_buf(), tags.clone()));
        Ok(())
    }
}
