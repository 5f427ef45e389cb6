use thiserror::Error;

/// Stage-level failures raised while a worker drives a job through the
/// pipeline. Each variant carries the classified, user-presentable text
/// that ends up on the job record when the stage is fatal.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Metadata source unreachable or unparsable. Fatal; there is no
    /// fallback to direct acquisition.
    #[error("{0}")]
    Resolution(String),

    /// The extraction engine failed or produced no usable output.
    #[error("{0}")]
    Acquisition(String),

    /// Probing failed. Soft: callers downgrade to an "unknown" health
    /// report instead of propagating this.
    #[error("{0}")]
    Inspection(String),

    /// Both fixer attempts (stream copy, then re-encode) failed.
    #[error("container fix failed: {0}")]
    Fix(String),
}

impl PipelineError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
