use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Pipeline stages in strict forward order. A job never re-enters an
/// earlier stage; `Error` is reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    ResolvingMetadata,
    Downloading,
    Analyzing,
    Fixing,
    Completed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    /// Position on the forward path. `Error` sits last so that any
    /// non-terminal state may advance into it.
    pub fn rank(&self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::ResolvingMetadata => 1,
            JobStatus::Downloading => 2,
            JobStatus::Analyzing => 3,
            JobStatus::Fixing => 4,
            JobStatus::Completed => 5,
            JobStatus::Error => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Quality {
    #[serde(rename = "360")]
    Low,
    #[serde(rename = "720")]
    High,
}

impl Quality {
    pub fn max_height(&self) -> u32 {
        match self {
            Quality::Low => 360,
            Quality::High => 720,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Audio,
    Video,
}

impl Mode {
    pub fn extension(&self) -> &'static str {
        match self {
            Mode::Audio => "mp3",
            Mode::Video => "mp4",
        }
    }

    pub fn mime_fallback(&self) -> &'static str {
        match self {
            Mode::Audio => "audio/mpeg",
            Mode::Video => "video/mp4",
        }
    }
}

/// Codec/container summary produced by the inspector. Immutable once
/// attached to a job.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthReport {
    pub container: String,
    pub video_codec: String,
    pub audio_codec: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for HealthReport {
    fn default() -> Self {
        Self {
            container: "unknown".to_string(),
            video_codec: "none".to_string(),
            audio_codec: "none".to_string(),
            error: None,
        }
    }
}

impl HealthReport {
    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            error: Some(diagnostic.into()),
            ..Self::default()
        }
    }
}

/// Track/artist pair scraped from a metadata-only source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataMatch {
    pub track: String,
    pub artist: String,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    pub source_url: String,
    pub quality: Quality,
    pub mode: Mode,
    pub title: Option<String>,
    pub result_path: Option<PathBuf>,
    pub health: Option<HealthReport>,
    pub error: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Job {
    pub fn new(source_url: String, quality: Quality, mode: Mode) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: JobStatus::Pending,
            source_url,
            quality,
            mode,
            title: None,
            result_path: None,
            health: None,
            error: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
