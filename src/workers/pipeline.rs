use crate::common::error::PipelineError;
use crate::infrastructure::extractor::ytdlp;
use crate::infrastructure::media::{fix, probe};
use crate::infrastructure::resolver::spotify;
use crate::modules::jobs::model::{JobStatus, MetadataMatch, Mode};
use crate::state::AppState;
use async_channel::{Receiver, Sender};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Submission queue feeding the worker pool. Unbounded so that enqueueing
/// a job never blocks the HTTP handler; the pool size alone bounds how
/// many jobs run concurrently.
#[derive(Clone)]
pub struct JobQueue {
    tx: Sender<Uuid>,
    rx: Receiver<Uuid>,
}

impl JobQueue {
    pub fn new() -> Self {
        let (tx, rx) = async_channel::unbounded();
        Self { tx, rx }
    }

    pub fn submit(&self, job_id: Uuid) {
        // Only fails when every worker is gone, i.e. during shutdown.
        if let Err(e) = self.tx.try_send(job_id) {
            error!(job_id = %job_id, error = %e, "could not enqueue job");
        }
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the fixed-size worker pool. Each worker pulls job ids off the
/// queue and runs one pipeline end-to-end at a time, so the pool size is
/// also the ceiling on concurrent subprocess and network load.
pub fn spawn_workers(state: AppState) {
    for worker in 0..state.config.worker_count {
        let state = state.clone();
        tokio::spawn(async move {
            info!(worker, "pipeline worker started");
            while let Ok(job_id) = state.queue.rx.recv().await {
                process_job(&state, job_id).await;
            }
            info!(worker, "pipeline worker stopped");
        });
    }
}

/// Drive one job to a terminal state. Stage failures never escape: they
/// land on the job record as a classified error message.
pub async fn process_job(state: &AppState, job_id: Uuid) {
    if let Err(e) = run_stages(state, job_id).await {
        let message = e.user_message();
        error!(job_id = %job_id, error = %message, "job failed");
        state
            .jobs
            .update(job_id, |job| {
                job.status = JobStatus::Error;
                job.error = Some(message.clone());
                job.result_path = None;
            })
            .await;
    }
}

async fn run_stages(state: &AppState, job_id: Uuid) -> Result<(), PipelineError> {
    let Some(job) = state.jobs.snapshot(job_id).await else {
        warn!(job_id = %job_id, "dequeued unknown job");
        return Ok(());
    };

    let quality = job.quality;
    let mut locator = job.source_url.clone();
    let mut mode = job.mode;

    // Metadata-only sources have nothing to download; resolve them to a
    // search locator first and force audio mode.
    let mut resolved: Option<MetadataMatch> = None;
    if spotify::is_spotify_url(&locator) {
        state
            .jobs
            .update(job_id, |job| job.status = JobStatus::ResolvingMetadata)
            .await;

        let matched = spotify::resolve(&state.config, &locator).await?;
        locator = format!(
            "ytsearch1:{} - {} Official Audio",
            matched.artist, matched.track
        );
        mode = Mode::Audio;

        let provisional = format!("{} - {}", matched.track, matched.artist);
        let rewritten = locator.clone();
        state
            .jobs
            .update(job_id, |job| {
                job.source_url = rewritten;
                job.mode = Mode::Audio;
                job.title = Some(provisional);
            })
            .await;
        info!(job_id = %job_id, "metadata resolved to search locator");
        resolved = Some(matched);
    }

    state
        .jobs
        .update(job_id, |job| job.status = JobStatus::Downloading)
        .await;
    let acquired = ytdlp::acquire(&state.config, job_id, &locator, mode, quality).await?;

    state
        .jobs
        .update(job_id, |job| job.status = JobStatus::Analyzing)
        .await;
    let mut path = acquired.path;
    let mut health = probe::inspect(&state.config, &path).await;

    if mode == Mode::Video && !probe::is_mp4_family(&health.container) {
        state
            .jobs
            .update(job_id, |job| job.status = JobStatus::Fixing)
            .await;

        let fixed = state.storage.fixed_path(job_id);
        let outcome = fix::fix(&state.config, &path, &fixed).await;

        // The pre-fix file is discarded whichever way the fix went, so a
        // failed job never leaves two artifacts behind.
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "could not remove pre-fix file");
        }
        outcome?;

        path = fixed;
        // Final report must describe the corrected file.
        health = probe::inspect(&state.config, &path).await;
    }

    let title = match &resolved {
        // Flag that the asset was matched through a fallback source rather
        // than downloaded from the original page.
        Some(m) => format!("{} (Spotify Match)", m.track),
        None => acquired.title.unwrap_or_else(|| "media".to_string()),
    };

    state
        .jobs
        .update(job_id, |job| {
            job.result_path = Some(path.clone());
            job.title = Some(title.clone());
            job.health = Some(health.clone());
            job.status = JobStatus::Completed;
        })
        .await;
    info!(job_id = %job_id, "job completed");
    Ok(())
}
