use http_client::Request;

/// Desktop Chrome user agent; Bandcamp serves a reduced page to unknown agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

const ACCEPT_ANY: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,audio/*,*/*;q=0.8";

/// Add common browser headers to a request
pub fn add_common_headers(request: &mut Request, user_agent: &str) {
    let _ = request.insert_header("User-Agent", user_agent);
    let _ = request.insert_header("Accept-Language", "en-US,en;q=0.9");
    let _ = request.insert_header("DNT", "1");
    let _ = request.insert_header("Connection", "keep-alive");
}

/// Add headers for GET requests (pages, streams and cover art)
pub fn add_get_headers(request: &mut Request, user_agent: &str, referer_url: Option<&str>) {
    add_common_headers(request, user_agent);
    let _ = request.insert_header("Accept", ACCEPT_ANY);

    if let Some(referer) = referer_url {
        let _ = request.insert_header("Referer", referer);
    }
}
