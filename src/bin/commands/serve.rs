use bandcamp_link_scraper::api::{self, AppState};
use bandcamp_link_scraper::ScraperConfig;
use std::sync::Arc;

use super::utils::create_client;

pub async fn handle_serve(
    config: ScraperConfig,
    bind: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let address = bind.unwrap_or_else(|| config.bind_address.clone());
    let client = create_client(&config);
    let state = Arc::new(AppState::new(client, config));

    api::serve(state, &address).await?;
    Ok(())
}
