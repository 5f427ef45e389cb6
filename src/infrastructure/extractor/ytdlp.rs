use crate::common::error::PipelineError;
use crate::config::settings::AppConfig;
use crate::infrastructure::resolver::spotify::BROWSER_USER_AGENT;
use crate::modules::jobs::model::{Mode, Quality};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};
use uuid::Uuid;

const PRIVATE_CONTENT_MESSAGE: &str = "Private video or login required. Cannot download.";

/// Result of a successful extraction run.
#[derive(Debug)]
pub struct Acquired {
    pub path: PathBuf,
    pub title: Option<String>,
}

/// Metadata-only report for the info endpoint, no download performed.
#[derive(Debug, Deserialize)]
pub struct SourceInfo {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub uploader: Option<String>,
    pub view_count: Option<u64>,
    pub duration_string: Option<String>,
}

/// yt-dlp format selector for the requested mode. Video constrains height
/// and prefers a directly mergeable mp4, degrading to "best" when that is
/// unsatisfiable; audio always takes the best stream and lets the
/// post-processor transcode it.
pub fn format_selector(mode: Mode, quality: Quality) -> String {
    match mode {
        Mode::Audio => "bestaudio/best".to_string(),
        Mode::Video => format!(
            "bv*[height<={h}][ext=mp4]+ba[ext=m4a]/b[ext=mp4]/best",
            h = quality.max_height()
        ),
    }
}

/// Full CLI argument list for a download run.
///
/// `--print title` together with `--no-simulate` makes yt-dlp emit the
/// declared title on stdout while still downloading, which stands in for a
/// library-level info dict.
pub fn download_args(
    download_dir: &Path,
    job_id: Uuid,
    locator: &str,
    mode: Mode,
    quality: Quality,
) -> Vec<String> {
    let template = download_dir.join(format!("{job_id}.%(ext)s"));
    let mut args = vec![
        "--no-playlist".to_string(),
        "--restrict-filenames".to_string(),
        "--concurrent-fragments".to_string(),
        "5".to_string(),
        "--user-agent".to_string(),
        BROWSER_USER_AGENT.to_string(),
        "--no-simulate".to_string(),
        "--print".to_string(),
        "title".to_string(),
        "-f".to_string(),
        format_selector(mode, quality),
    ];

    match mode {
        Mode::Audio => {
            args.extend([
                "-x".to_string(),
                "--audio-format".to_string(),
                "mp3".to_string(),
                "--audio-quality".to_string(),
                "192K".to_string(),
            ]);
        }
        Mode::Video => {
            args.extend(["--merge-output-format".to_string(), "mp4".to_string()]);
        }
    }

    args.extend([
        "-o".to_string(),
        template.to_string_lossy().into_owned(),
        locator.to_string(),
    ]);
    args
}

/// Map an extraction failure onto a user-presentable message. Known
/// access-denied cases get a fixed friendly text; everything else surfaces
/// the engine's last diagnostic line.
pub fn classify_failure(stderr: &str) -> String {
    let lower = stderr.to_lowercase();
    if lower.contains("private") || lower.contains("login") {
        return PRIVATE_CONTENT_MESSAGE.to_string();
    }
    stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("Download failed")
        .trim()
        .to_string()
}

/// Find the produced file when the predicted name does not exist.
///
/// Post-processing can change the extension the output template promised,
/// so the fallback is a directory scan for any file namespaced by the job
/// id with the mode's extension. This is deliberate: the engine's naming
/// is opaque and prediction alone is not reliable.
pub fn locate_output(download_dir: &Path, job_id: Uuid, extension: &str) -> Option<PathBuf> {
    let expected = download_dir.join(format!("{job_id}.{extension}"));
    if expected.exists() {
        return Some(expected);
    }

    let prefix = job_id.to_string();
    let suffix = format!(".{extension}");
    let entries = std::fs::read_dir(download_dir).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(&prefix) && name.ends_with(&suffix) {
            return Some(entry.path());
        }
    }
    None
}

/// Run the extraction engine for a job and resolve the file it produced.
pub async fn acquire(
    config: &AppConfig,
    job_id: Uuid,
    locator: &str,
    mode: Mode,
    quality: Quality,
) -> Result<Acquired, PipelineError> {
    let args = download_args(&config.download_dir, job_id, locator, mode, quality);
    debug!(job_id = %job_id, ?args, "invoking extraction engine");

    let output = Command::new(&config.ytdlp_path)
        .args(&args)
        .output()
        .await
        .map_err(|e| {
            PipelineError::Acquisition(format!("failed to launch extraction engine: {e}"))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PipelineError::Acquisition(classify_failure(&stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let title = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string);

    let path = locate_output(&config.download_dir, job_id, mode.extension()).ok_or_else(|| {
        PipelineError::Acquisition("Extraction produced no matching output file".to_string())
    })?;

    info!(job_id = %job_id, path = %path.display(), "extraction finished");
    Ok(Acquired { path, title })
}

/// Query source metadata without downloading anything.
pub async fn probe_info(config: &AppConfig, locator: &str) -> anyhow::Result<SourceInfo> {
    let output = Command::new(&config.ytdlp_path)
        .args(["-j", "--no-warnings", "--skip-download", locator])
        .output()
        .await
        .map_err(|e| anyhow::anyhow!("failed to launch extraction engine: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("{}", classify_failure(&stderr));
    }

    let info: SourceInfo = serde_json::from_slice(&output.stdout)
        .map_err(|e| anyhow::anyhow!("unreadable info report: {e}"))?;
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_selector_ignores_quality() {
        assert_eq!(format_selector(Mode::Audio, Quality::Low), "bestaudio/best");
        assert_eq!(format_selector(Mode::Audio, Quality::High), "bestaudio/best");
    }

    #[test]
    fn video_selector_constrains_height_with_best_fallback() {
        assert_eq!(
            format_selector(Mode::Video, Quality::Low),
            "bv*[height<=360][ext=mp4]+ba[ext=m4a]/b[ext=mp4]/best"
        );
        assert_eq!(
            format_selector(Mode::Video, Quality::High),
            "bv*[height<=720][ext=mp4]+ba[ext=m4a]/b[ext=mp4]/best"
        );
    }

    #[test]
    fn audio_args_request_mp3_extraction() {
        let id = Uuid::new_v4();
        let args = download_args(Path::new("dl"), id, "https://x", Mode::Audio, Quality::High);
        assert!(args.contains(&"-x".to_string()));
        assert!(args.contains(&"mp3".to_string()));
        assert!(!args.contains(&"--merge-output-format".to_string()));
        assert_eq!(args.last().unwrap(), "https://x");
    }

    #[test]
    fn video_args_merge_to_mp4() {
        let id = Uuid::new_v4();
        let args = download_args(Path::new("dl"), id, "https://x", Mode::Video, Quality::Low);
        assert!(args.contains(&"--merge-output-format".to_string()));
        let template = args[args.len() - 2].clone();
        assert!(template.contains(&id.to_string()));
        assert!(template.ends_with(".%(ext)s"));
    }

    #[test]
    fn private_content_gets_friendly_message() {
        assert_eq!(
            classify_failure("ERROR: This video is private"),
            PRIVATE_CONTENT_MESSAGE
        );
        assert_eq!(
            classify_failure("ERROR: Login required to access this content"),
            PRIVATE_CONTENT_MESSAGE
        );
    }

    #[test]
    fn other_failures_surface_last_diagnostic_line() {
        let stderr = "WARNING: something\nERROR: Unable to download webpage\n\n";
        assert_eq!(classify_failure(stderr), "ERROR: Unable to download webpage");
        assert_eq!(classify_failure(""), "Download failed");
    }

    #[test]
    fn locate_output_prefers_exact_name_then_scans() {
        let dir = tempfile::tempdir().unwrap();
        let id = Uuid::new_v4();

        assert!(locate_output(dir.path(), id, "mp4").is_none());

        // Engine renamed the output; only the scan can find it.
        let renamed = dir.path().join(format!("{id}.f137.mp4"));
        std::fs::write(&renamed, b"x").unwrap();
        assert_eq!(locate_output(dir.path(), id, "mp4").unwrap(), renamed);

        // Exact name wins once it exists.
        let exact = dir.path().join(format!("{id}.mp4"));
        std::fs::write(&exact, b"x").unwrap();
        assert_eq!(locate_output(dir.path(), id, "mp4").unwrap(), exact);
    }

    #[test]
    fn locate_output_ignores_other_jobs_and_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let id = Uuid::new_v4();
        std::fs::write(dir.path().join(format!("{}.mp4", Uuid::new_v4())), b"x").unwrap();
        std::fs::write(dir.path().join(format!("{id}.webm")), b"x").unwrap();
        assert!(locate_output(dir.path(), id, "mp4").is_none());
    }
}
