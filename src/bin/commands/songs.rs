use bandcamp_link_scraper::{PlaylistFormat, ScraperConfig};

use super::utils::create_client;

pub async fn handle_songs(
    config: &ScraperConfig,
    url: &str,
    annotated: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if annotated {
        PlaylistFormat::Annotated
    } else {
        PlaylistFormat::Plain
    };

    let client = create_client(config);
    let response = client.songs(url, format).await?;

    if let Some(art_url) = &response.art_url {
        log::info!("Cover art: {art_url}");
    }
    println!("{}", response.m3u8);
    Ok(())
}
