use crate::common::error::PipelineError;
use crate::config::settings::AppConfig;
use crate::modules::jobs::model::MetadataMatch;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Spotify rejects default client identifiers, so the page fetch has to
/// look like a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const PAGE_SUFFIX: &str = " | Spotify";
const SEPARATORS: [&str; 2] = [" - song by ", " - song and lyrics by "];

/// Spotify pages never offer a downloadable asset; their locators are
/// resolved to a search query instead of being handed to the extractor.
pub fn is_spotify_url(locator: &str) -> bool {
    match Url::parse(locator) {
        Ok(url) => url
            .host_str()
            .is_some_and(|h| h == "spotify.com" || h.ends_with(".spotify.com")),
        // Unparsable input falls back to a substring check.
        Err(_) => locator.contains("spotify.com"),
    }
}

/// Rebase a locator onto the configured metadata host, keeping its path
/// and query. Locators that do not parse as URLs are fetched as given.
pub fn page_url(base: &str, locator: &str) -> String {
    match Url::parse(locator) {
        Ok(url) => {
            let base = base.trim_end_matches('/');
            match url.query() {
                Some(q) => format!("{base}{}?{q}", url.path()),
                None => format!("{base}{}", url.path()),
            }
        }
        Err(_) => locator.to_string(),
    }
}

/// Fetch a track page and scrape its title into a (track, artist) pair.
pub async fn resolve(config: &AppConfig, locator: &str) -> Result<MetadataMatch, PipelineError> {
    let client = reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| PipelineError::Resolution(format!("http client error: {e}")))?;

    let response = client
        .get(page_url(&config.spotify_base_url, locator))
        .send()
        .await
        .map_err(|e| PipelineError::Resolution(format!("Could not reach Spotify: {e}")))?;

    if !response.status().is_success() {
        return Err(PipelineError::Resolution(format!(
            "Spotify returned status {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| PipelineError::Resolution(format!("Could not read Spotify page: {e}")))?;

    let title = extract_page_title(&body).ok_or_else(|| {
        PipelineError::Resolution("Spotify page had no title element".to_string())
    })?;

    debug!(%title, "scraped spotify page title");
    Ok(parse_spotify_title(&title))
}

/// Pull the text of the first `<title>` element out of an HTML document.
pub fn extract_page_title(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let open = lower.find("<title")?;
    let open_end = lower[open..].find('>')? + open + 1;
    let close = lower[open_end..].find("</title")? + open_end;
    let title = html[open_end..close].trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Split a Spotify page title into track and artist.
///
/// Known separator phrases are tried in order; if none match but the title
/// still contains a plain " - ", the first segment is taken as the artist
/// and the second as the track. A title with no separator at all becomes
/// the track with an empty artist.
pub fn parse_spotify_title(page_title: &str) -> MetadataMatch {
    let clean = page_title
        .strip_suffix(PAGE_SUFFIX)
        .unwrap_or(page_title)
        .trim();

    for sep in SEPARATORS {
        if let Some((track, artist)) = clean.split_once(sep) {
            return MetadataMatch {
                track: track.trim().to_string(),
                artist: artist.trim().to_string(),
            };
        }
    }

    if let Some((artist, track)) = clean.split_once(" - ") {
        return MetadataMatch {
            track: track.trim().to_string(),
            artist: artist.trim().to_string(),
        };
    }

    MetadataMatch {
        track: clean.to_string(),
        artist: String::new(),
    }
}
