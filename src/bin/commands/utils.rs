use bandcamp_link_scraper::{
    BandcampClient, DownloadOptions, HttpFetcher, LoftyTagWriter, ScraperConfig,
};

use super::DownloadArgs;

/// Build a client using the native HTTP stack and the configured user agent.
pub fn create_client(config: &ScraperConfig) -> BandcampClient {
    let http_client = http_client::native::NativeClient::new();
    let fetcher = HttpFetcher::with_user_agent(Box::new(http_client), config.user_agent.clone());

    BandcampClient::new(Box::new(fetcher), Box::new(LoftyTagWriter::new()))
        .with_art_cache_dir(config.art_cache_dir.clone())
}

/// Merge command line flags over configured download defaults.
pub fn download_options(config: &ScraperConfig, args: &DownloadArgs) -> DownloadOptions {
    DownloadOptions::new(
        args.directory
            .clone()
            .unwrap_or_else(|| config.directory.clone()),
        args.playlist_song_directory
            .clone()
            .unwrap_or_else(|| config.playlist_song_directory.clone()),
    )
    .force(args.force)
}
