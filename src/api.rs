//! HTTP API.
//!
//! | Route | Result |
//! |---|---|
//! | `GET /songs?url=` | `{art_url, m3u8}` with remote stream URLs |
//! | `GET /songs_annotated?url=` | same, annotated playlist lines |
//! | `GET /download?url=&directory=&playlist_song_directory=&force=` | downloads, playlist of local paths |
//! | `POST /bulk_download?directory=&playlist_song_directory=&force=` | body `{urls: [...]}`, albums downloaded in order |

use crate::client::{BandcampClient, SongsResponse};
use crate::config::ScraperConfig;
use crate::materialize::DownloadOptions;
use crate::playlist::PlaylistFormat;
use crate::{BandcampError, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared state handed to every handler.
pub struct AppState {
    pub client: BandcampClient,
    pub config: ScraperConfig,
}

impl AppState {
    pub fn new(client: BandcampClient, config: ScraperConfig) -> Self {
        Self { client, config }
    }

    fn download_options(
        &self,
        directory: Option<String>,
        playlist_song_directory: Option<String>,
        force: bool,
    ) -> DownloadOptions {
        DownloadOptions::new(
            directory
                .map(PathBuf::from)
                .unwrap_or_else(|| self.config.directory.clone()),
            playlist_song_directory
                .unwrap_or_else(|| self.config.playlist_song_directory.clone()),
        )
        .force(force)
    }
}

/// Query flag: a bare `force`, `1`, `true`, `yes` or `on` enable it.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(de::Error::invalid_value(Unexpected::Str(&raw), &"a boolean flag")),
    }
}

#[derive(Debug, Deserialize)]
pub struct SongsQuery {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub url: String,
    pub directory: Option<String>,
    pub playlist_song_directory: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct BulkDownloadQuery {
    pub directory: Option<String>,
    pub playlist_song_directory: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct BulkDownloadRequest {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkDownloadResponse {
    pub m3u8: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// [`BandcampError`] rendered as a JSON error response.
#[derive(Debug)]
pub struct ApiError(pub BandcampError);

impl From<BandcampError> for ApiError {
    fn from(err: BandcampError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BandcampError::DirectoryNotFound(_) => StatusCode::NOT_FOUND,
            BandcampError::MissingPayload | BandcampError::MalformedSource(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            BandcampError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        log::warn!("Request failed ({status}): {}", self.0);
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/songs", get(songs))
        .route("/songs_annotated", get(songs_annotated))
        .route("/download", get(download))
        .route("/bulk_download", post(bulk_download))
        .with_state(state)
}

/// Bind `address` and serve the API until the process exits.
pub async fn serve(state: Arc<AppState>, address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn songs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SongsQuery>,
) -> std::result::Result<Json<SongsResponse>, ApiError> {
    let response = state.client.songs(&query.url, PlaylistFormat::Plain).await?;
    Ok(Json(response))
}

async fn songs_annotated(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SongsQuery>,
) -> std::result::Result<Json<SongsResponse>, ApiError> {
    let response = state
        .client
        .songs(&query.url, PlaylistFormat::Annotated)
        .await?;
    Ok(Json(response))
}

async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadQuery>,
) -> std::result::Result<Json<SongsResponse>, ApiError> {
    let options =
        state.download_options(query.directory, query.playlist_song_directory, query.force);
    let response = state.client.download(&query.url, &options).await?;
    Ok(Json(response))
}

async fn bulk_download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BulkDownloadQuery>,
    Json(request): Json<BulkDownloadRequest>,
) -> std::result::Result<Json<BulkDownloadResponse>, ApiError> {
    let options =
        state.download_options(query.directory, query.playlist_song_directory, query.force);
    let m3u8 = state.client.bulk_download(&request.urls, &options).await?;
    Ok(Json(BulkDownloadResponse { m3u8 }))
}
