use super::dto::InfoResponse;
use crate::infrastructure::extractor::ytdlp;
use crate::infrastructure::resolver::spotify;
use crate::state::AppState;
use anyhow::Result;

pub struct InfoService;

impl InfoService {
    /// Look up source metadata without creating a job. Metadata-only
    /// sources short-circuit to the resolver: the extraction engine cannot
    /// see them, so a minimal record is fabricated from the scraped
    /// track/artist pair.
    pub async fn lookup(state: AppState, url: &str) -> Result<InfoResponse> {
        if spotify::is_spotify_url(url) {
            let matched = spotify::resolve(&state.config, url).await?;
            let uploader = (!matched.artist.is_empty()).then(|| matched.artist.clone());
            return Ok(InfoResponse {
                title: Some(format!("{} - {}", matched.track, matched.artist)),
                thumbnail: None,
                uploader,
                view_count: None,
                duration: None,
            });
        }

        let info = ytdlp::probe_info(&state.config, url).await?;
        Ok(InfoResponse {
            title: info.title,
            thumbnail: info.thumbnail,
            uploader: info.uploader,
            view_count: info.view_count,
            duration: info.duration_string,
        })
    }
}
