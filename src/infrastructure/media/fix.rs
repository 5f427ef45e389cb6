use crate::common::error::PipelineError;
use crate::config::settings::AppConfig;
use std::path::Path;
use tokio::process::Command;
use tracing::{info, warn};

/// Rewrap a file into the target container, writing to `output`.
///
/// First attempt stream-copies both tracks, which is fast but only works
/// when the source codecs are already mp4-compatible. If that exits
/// non-zero the file is fully re-encoded (h264 + aac). A failure of the
/// second attempt is fatal; there is no third tier.
pub async fn fix(config: &AppConfig, input: &Path, output: &Path) -> Result<(), PipelineError> {
    let copy_args = [
        "-c:v",
        "copy",
        "-c:a",
        "copy",
        "-movflags",
        "+faststart",
    ];
    if run_ffmpeg(config, input, output, &copy_args).await? {
        info!(output = %output.display(), "stream copy succeeded");
        return Ok(());
    }

    warn!(input = %input.display(), "stream copy rejected, re-encoding");
    let encode_args = [
        "-c:v",
        "libx264",
        "-preset",
        "fast",
        "-crf",
        "23",
        "-c:a",
        "aac",
        "-b:a",
        "128k",
        "-movflags",
        "+faststart",
    ];
    if run_ffmpeg(config, input, output, &encode_args).await? {
        info!(output = %output.display(), "re-encode succeeded");
        return Ok(());
    }

    Err(PipelineError::Fix(
        "re-encode attempt exited with an error".to_string(),
    ))
}

async fn run_ffmpeg(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    codec_args: &[&str],
) -> Result<bool, PipelineError> {
    let status = Command::new(&config.ffmpeg_path)
        .arg("-y")
        .arg("-i")
        .arg(input)
        .args(codec_args)
        .arg(output)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .map_err(|e| PipelineError::Fix(format!("failed to launch ffmpeg: {e}")))?;
    Ok(status.success())
}
