use crate::config::settings::AppConfig;
use crate::modules::jobs::model::HealthReport;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::warn;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    format_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
}

/// Inspect a media file with ffprobe.
///
/// Never fails the pipeline: any problem (missing binary, timeout, bad
/// exit, unreadable JSON) yields an "unknown" report carrying the
/// diagnostic instead.
pub async fn inspect(config: &AppConfig, path: &Path) -> HealthReport {
    let mut cmd = Command::new(&config.ffprobe_path);
    cmd.args([
        "-v",
        "quiet",
        "-print_format",
        "json",
        "-show_format",
        "-show_streams",
    ])
    .arg(path);

    let run = tokio::time::timeout(PROBE_TIMEOUT, cmd.output()).await;
    let output = match run {
        Err(_) => {
            warn!(path = %path.display(), "probe timed out");
            return HealthReport::failed("probe timed out");
        }
        Ok(Err(e)) => {
            warn!(path = %path.display(), error = %e, "probe could not be launched");
            return HealthReport::failed(format!("probe unavailable: {e}"));
        }
        Ok(Ok(output)) => output,
    };

    if !output.status.success() {
        return HealthReport::failed(format!("probe exited with {}", output.status));
    }

    match serde_json::from_slice::<ProbeOutput>(&output.stdout) {
        Ok(parsed) => report_from(parsed),
        Err(e) => HealthReport::failed(format!("unreadable probe report: {e}")),
    }
}

/// Whether a probed container name belongs to the mp4 family. ffprobe
/// reports mp4 files under the "mov" demuxer alias, so the check accepts
/// the whole alias group rather than the literal string "mp4".
pub fn is_mp4_family(container: &str) -> bool {
    let container = container.to_ascii_lowercase();
    matches!(container.as_str(), "mov" | "mp4" | "m4a" | "3gp" | "3g2" | "mj2")
        || container.contains("mp4")
}

/// Normalize ffprobe's JSON into a health record. The format name can list
/// several aliases ("mov,mp4,m4a,..."), of which only the first token is
/// kept; when a stream kind appears more than once the last one wins.
fn report_from(parsed: ProbeOutput) -> HealthReport {
    let mut report = HealthReport::default();

    if let Some(name) = parsed.format.and_then(|f| f.format_name) {
        if let Some(first) = name.split(',').next() {
            if !first.is_empty() {
                report.container = first.to_string();
            }
        }
    }

    for stream in parsed.streams {
        let codec = stream.codec_name.unwrap_or_else(|| "unknown".to_string());
        match stream.codec_type.as_deref() {
            Some("video") => report.video_codec = codec,
            Some("audio") => report.audio_codec = codec,
            _ => {}
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> HealthReport {
        report_from(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn container_keeps_first_alias_token() {
        let report = parse(
            r#"{"format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2"},
                "streams": [{"codec_type": "video", "codec_name": "h264"},
                            {"codec_type": "audio", "codec_name": "aac"}]}"#,
        );
        assert_eq!(report.container, "mov");
        assert_eq!(report.video_codec, "h264");
        assert_eq!(report.audio_codec, "aac");
        assert!(report.error.is_none());
    }

    #[test]
    fn last_seen_stream_of_each_kind_wins() {
        let report = parse(
            r#"{"format": {"format_name": "matroska,webm"},
                "streams": [{"codec_type": "video", "codec_name": "vp8"},
                            {"codec_type": "video", "codec_name": "vp9"},
                            {"codec_type": "audio", "codec_name": "vorbis"},
                            {"codec_type": "audio", "codec_name": "opus"}]}"#,
        );
        assert_eq!(report.video_codec, "vp9");
        assert_eq!(report.audio_codec, "opus");
    }

    #[test]
    fn mp4_family_accepts_mov_aliases_and_rejects_webm() {
        assert!(is_mp4_family("mov"));
        assert!(is_mp4_family("mp4"));
        assert!(is_mp4_family("MP4"));
        assert!(!is_mp4_family("matroska"));
        assert!(!is_mp4_family("webm"));
        assert!(!is_mp4_family("unknown"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let report = parse(r#"{"streams": [{"codec_type": "subtitle"}]}"#);
        assert_eq!(report.container, "unknown");
        assert_eq!(report.video_codec, "none");
        assert_eq!(report.audio_codec, "none");
    }

    #[tokio::test]
    async fn unlaunchable_probe_is_a_soft_failure() {
        let config = AppConfig {
            ffprobe_path: "/nonexistent/ffprobe-for-test".to_string(),
            ..test_config()
        };
        let report = inspect(&config, Path::new("whatever.mp4")).await;
        assert_eq!(report.container, "unknown");
        assert!(report.error.is_some());
    }

    fn test_config() -> AppConfig {
        AppConfig {
            server_port: 0,
            download_dir: std::env::temp_dir(),
            worker_count: 1,
            ytdlp_path: "yt-dlp".into(),
            ffmpeg_path: "ffmpeg".into(),
            ffprobe_path: "ffprobe".into(),
            spotify_base_url: "https://open.spotify.com".into(),
        }
    }
}
