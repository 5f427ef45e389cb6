use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

const CLEANUP_DELAY: Duration = Duration::from_secs(1);
const CLEANUP_RETRIES: u32 = 5;

/// Flat directory holding every job's artifacts, namespaced by job id so
/// concurrent jobs cannot collide.
#[derive(Clone, Debug)]
pub struct DownloadStore {
    dir: PathBuf,
}

impl DownloadStore {
    pub fn new(dir: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target path for the fixer's corrected copy of a job's file.
    pub fn fixed_path(&self, job_id: Uuid) -> PathBuf {
        self.dir.join(format!("{job_id}_fixed.mp4"))
    }

    /// Delete a served file once the transport has let go of it.
    ///
    /// The OS may still hold the handle that backed the response stream, so
    /// deletion runs on a detached task after a short delay, retrying a few
    /// times before giving the file up as orphaned. Failures never reach
    /// the client; the response is already gone.
    pub fn schedule_removal(&self, path: PathBuf) {
        tokio::spawn(async move {
            tokio::time::sleep(CLEANUP_DELAY).await;
            for attempt in 1..=CLEANUP_RETRIES {
                if !path.exists() {
                    return;
                }
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => {
                        info!(path = %path.display(), "served file removed");
                        return;
                    }
                    Err(e) if attempt < CLEANUP_RETRIES => {
                        warn!(path = %path.display(), error = %e, attempt, "removal failed, retrying");
                        tokio::time::sleep(CLEANUP_DELAY).await;
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "giving up, file orphaned");
                    }
                }
            }
        });
    }
}

/// Reduce a media title to a safe download name: alphanumeric characters
/// and spaces only, with a generic fallback when nothing survives.
pub fn sanitize_download_name(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect();
    let kept = kept.trim_end();
    if kept.is_empty() {
        "media".to_string()
    } else {
        kept.to_string()
    }
}
