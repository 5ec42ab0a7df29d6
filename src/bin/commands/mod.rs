pub mod download;
pub mod serve;
pub mod songs;
pub mod utils;

use bandcamp_link_scraper::ScraperConfig;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Download destination flags shared by `download` and `bulk-download`.
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Directory the tracks are written to (defaults to the configured directory)
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Path prefix used for tracks inside the printed playlist
    #[arg(long)]
    pub playlist_song_directory: Option<String>,

    /// Download and tag tracks again even if the file already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    ///
    /// Usage examples:
    /// # Listen on the configured address
    /// bandcamp-link-scraper serve
    ///
    /// # Listen on a specific address
    /// bandcamp-link-scraper serve --bind 127.0.0.1:8080
    Serve {
        /// Address to listen on
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the playlist of an album's stream URLs
    ///
    /// Usage examples:
    /// bandcamp-link-scraper songs https://artist.bandcamp.com/album/record
    ///
    /// # Annotated playlist lines with artist, title, album and duration
    /// bandcamp-link-scraper songs https://artist.bandcamp.com/album/record --annotated
    Songs {
        /// Album page URL
        url: String,

        /// Emit annotated playlist lines
        #[arg(long)]
        annotated: bool,
    },

    /// Download and tag an album, printing a playlist of local files
    ///
    /// Usage examples:
    /// bandcamp-link-scraper download https://artist.bandcamp.com/album/record \
    ///     --directory /srv/music --playlist-song-directory /music
    Download {
        /// Album page URL
        url: String,

        #[command(flatten)]
        target: DownloadArgs,
    },

    /// Download several albums in order, printing one combined playlist
    BulkDownload {
        /// Album page URLs
        #[arg(required = true)]
        urls: Vec<String>,

        #[command(flatten)]
        target: DownloadArgs,
    },
}

pub async fn execute_command(
    command: Commands,
    config: ScraperConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve { bind } => serve::handle_serve(config, bind).await,
        Commands::Songs { url, annotated } => songs::handle_songs(&config, &url, annotated).await,
        Commands::Download { url, target } => {
            download::handle_download(&config, &[url], &target).await
        }
        Commands::BulkDownload { urls, target } => {
            download::handle_download(&config, &urls, &target).await
        }
    }
}
