mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bandcamp_link_scraper::api::{router, AppState};
use bandcamp_link_scraper::{BandcampClient, ScraperConfig};
use common::{album_page, FakeFetcher, RecordingTagWriter, ALBUM_URL, ART_URL, BAND_PAYLOAD};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const ENCODED_ALBUM_URL: &str = "https%3A%2F%2Fband.bandcamp.com%2Falbum%2Frecord";

fn app(fetcher: FakeFetcher) -> axum::Router {
    let client = BandcampClient::new(Box::new(fetcher), Box::new(RecordingTagWriter::new()));
    router(Arc::new(AppState::new(client, ScraperConfig::default())))
}

fn band_fetcher() -> FakeFetcher {
    FakeFetcher::new()
        .with(ALBUM_URL, album_page(BAND_PAYLOAD, "Record", "Band", Some(ART_URL), &["rock"]))
        .with("http://x/a.mp3", b"audio".to_vec())
        .with(ART_URL, b"jpeg".to_vec())
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_songs_endpoint() {
    let (status, body) = send(
        app(band_fetcher()),
        get(&format!("/songs?url={ENCODED_ALBUM_URL}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["art_url"], ART_URL);
    assert_eq!(body["m3u8"], "# Band - Song A\nhttp://x/a.mp3");
}

#[test_log::test(tokio::test)]
async fn test_songs_annotated_endpoint() {
    let (status, body) = send(
        app(band_fetcher()),
        get(&format!("/songs_annotated?url={ENCODED_ALBUM_URL}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["m3u8"],
        "annotate:artist=\"Band\",title=\"Song A\",album=\"Record\",duration=\"180\":http://x/a.mp3"
    );
}

#[test_log::test(tokio::test)]
async fn test_download_endpoint_writes_files() {
    let dir = tempfile::tempdir().unwrap();
    let uri = format!(
        "/download?url={ENCODED_ALBUM_URL}&directory={}&playlist_song_directory=/music&force=true",
        dir.path().display()
    );

    let (status, body) = send(app(band_fetcher()), get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["m3u8"], "# Band - Song A\n/music/Band - Song A.mp3");
    assert!(dir.path().join("Band - Song A.mp3").exists());
}

#[test_log::test(tokio::test)]
async fn test_download_endpoint_numeric_force_rewrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Band - Song A.mp3"), b"stale").unwrap();
    let uri = format!(
        "/download?url={ENCODED_ALBUM_URL}&directory={}&force=1",
        dir.path().display()
    );

    let (status, _) = send(app(band_fetcher()), get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        std::fs::read(dir.path().join("Band - Song A.mp3")).unwrap(),
        b"audio"
    );
}

#[test_log::test(tokio::test)]
async fn test_download_endpoint_missing_directory_is_404() {
    let fetcher = band_fetcher();
    let uri = format!("/download?url={ENCODED_ALBUM_URL}&directory=/no/such/dir/for/tests");

    let (status, body) = send(app(fetcher.clone()), get(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("/no/such/dir/for/tests"));
    assert_eq!(fetcher.total_calls(), 0);
}

#[test_log::test(tokio::test)]
async fn test_bulk_download_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri(format!(
            "/bulk_download?directory={}&playlist_song_directory=/music",
            dir.path().display()
        ))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({ "urls": [ALBUM_URL, ALBUM_URL] }).to_string(),
        ))
        .unwrap();

    let (status, body) = send(app(band_fetcher()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["m3u8"],
        "# Band - Song A\n/music/Band - Song A.mp3\n# Band - Song A\n/music/Band - Song A.mp3"
    );
}

#[test_log::test(tokio::test)]
async fn test_page_without_payload_is_unprocessable() {
    let fetcher = FakeFetcher::new().with(ALBUM_URL, "<html><body>nothing here</body></html>");

    let (status, body) = send(app(fetcher), get(&format!("/songs?url={ENCODED_ALBUM_URL}"))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[test_log::test(tokio::test)]
async fn test_unreachable_album_is_bad_gateway() {
    let (status, _) = send(
        app(FakeFetcher::new()),
        get(&format!("/songs?url={ENCODED_ALBUM_URL}")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
