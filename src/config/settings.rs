use crate::config::env::{self, EnvKey};
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub download_dir: PathBuf,
    pub worker_count: usize,
    pub ytdlp_path: String,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// Where metadata-only source pages are fetched from. Overridable for
    /// the same reason the binary paths are: tests substitute a local
    /// server for the real site.
    pub spotify_base_url: String,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            download_dir: PathBuf::from(env::get_or(EnvKey::DownloadDir, "./downloads")),
            worker_count: env::get_parsed(EnvKey::WorkerCount, 3),
            ytdlp_path: env::get_or(EnvKey::YtDlpPath, "yt-dlp"),
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            ffprobe_path: env::get_or(EnvKey::FfprobePath, "ffprobe"),
            spotify_base_url: env::get_or(EnvKey::SpotifyBaseUrl, "https://open.spotify.com"),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
