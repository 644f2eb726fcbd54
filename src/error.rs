//! Crate-wide error type.

use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    #[error("select a range on the waveform first")]
    NoSelection,
    #[error("there are no regions to process")]
    NoRegions,
    #[error("invalid range: start {start} must be before end {end}")]
    InvalidRange { start: f64, end: f64 },
    #[error("shift must be between 1 and 12 semitones in 0.5 steps, got {0}")]
    InvalidShift(f32),
    #[error("unsupported media type for {0}; drop a video or audio file")]
    UnsupportedMedia(String),
    #[error("no task is loaded")]
    NoActiveTask,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded {status}: {body}")]
    Server { status: StatusCode, body: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Job(String),
    #[error("task was superseded")]
    Superseded,
}

impl EditorError {
    /// Rejections raised synchronously before any state transition or network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EditorError::NoSelection
                | EditorError::NoRegions
                | EditorError::InvalidRange { .. }
                | EditorError::InvalidShift(_)
                | EditorError::UnsupportedMedia(_)
                | EditorError::NoActiveTask
        )
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, EditorError::Superseded)
    }
}
