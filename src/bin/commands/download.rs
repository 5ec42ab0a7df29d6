use bandcamp_link_scraper::ScraperConfig;

use super::utils::{create_client, download_options};
use super::DownloadArgs;

/// Download one or more albums and print the resulting playlist.
pub async fn handle_download(
    config: &ScraperConfig,
    urls: &[String],
    args: &DownloadArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = download_options(config, args);
    let client = create_client(config);

    log::info!(
        "Downloading {} album{} into {}",
        urls.len(),
        if urls.len() == 1 { "" } else { "s" },
        options.directory.display()
    );

    let playlist = client.bulk_download(urls, &options).await?;
    println!("{playlist}");
    Ok(())
}
