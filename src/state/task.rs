//! Backend task data model.
//!
//! Tasks are created by the backend and only observed locally through status
//! polling. These types mirror the JSON bodies of the processing server.

use serde::{Deserialize, Serialize};

use super::RegionPayload;
use crate::constants::{DEFAULT_AUTO_PITCH, GENERIC_PROGRESS_MESSAGE};

/// Server-side task status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Uploading,
    Analyzing,
    Processing,
    Completed,
    Complete,
    Error,
    /// Any status token this client does not know; treated as in progress.
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Complete)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TaskStatus::Error)
    }

    pub fn is_terminal(&self) -> bool {
        self.is_success() || self.is_failure()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    #[serde(rename = "type", default)]
    pub level: LogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl LogEntry {
    /// A locally synthesized entry, stamped with the current time.
    pub fn synthesized(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

/// A range the backend already pitch-shifted. Read-only in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessedSegment {
    pub start: f64,
    pub end: f64,
    pub pitch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub step: Option<String>,
    #[serde(default)]
    pub output_file: Option<String>,
    #[serde(default)]
    pub output_audio: Option<String>,
    #[serde(default)]
    pub logs: Option<Vec<LogEntry>>,
    #[serde(default)]
    pub processed_segments: Option<Vec<ProcessedSegment>>,
}

impl StatusResponse {
    pub fn new(status: TaskStatus, progress: f64) -> Self {
        Self {
            status,
            progress,
            message: None,
            step: None,
            output_file: None,
            output_audio: None,
            logs: None,
            processed_segments: None,
        }
    }

    /// Text shown next to the progress bar.
    pub fn display_message(&self) -> String {
        self.step
            .as_deref()
            .or(self.message.as_deref())
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(GENERIC_PROGRESS_MESSAGE)
            .to_string()
    }

    /// Failure message for an `error` status, if the server gave one.
    pub fn failure_message(&self) -> Option<String> {
        self.message
            .as_deref()
            .or(self.step.as_deref())
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub task_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub task_id: String,
    pub regions: Vec<RegionPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub task_id: String,
    #[serde(default)]
    pub output_file: Option<String>,
    #[serde(default)]
    pub output_audio: Option<String>,
}

/// User-facing detection mode for automatic processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    #[default]
    Ai,
    Simple,
    Precision,
}

impl ProcessingMode {
    /// Mode token the backend expects.
    pub fn backend_token(self) -> &'static str {
        match self {
            ProcessingMode::Ai => "timbre",
            ProcessingMode::Simple => "simple",
            ProcessingMode::Precision => "precision",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoProcessOptions {
    pub mode: ProcessingMode,
    /// Semitones applied to detected segments.
    pub pitch: f64,
    pub double_check: bool,
}

impl Default for AutoProcessOptions {
    fn default() -> Self {
        Self {
            mode: ProcessingMode::Ai,
            pitch: DEFAULT_AUTO_PITCH,
            double_check: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadKind {
    #[default]
    Video,
    Audio,
}

impl DownloadKind {
    pub fn as_query(self) -> &'static str {
        match self {
            DownloadKind::Video => "video",
            DownloadKind::Audio => "audio",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_tokens() {
        assert_eq!(ProcessingMode::Ai.backend_token(), "timbre");
        assert_eq!(ProcessingMode::Simple.backend_token(), "simple");
        assert_eq!(ProcessingMode::Precision.backend_token(), "precision");
    }

    #[test]
    fn test_status_parsing_with_optional_fields() {
        let json = r#"{
            "status": "processing",
            "progress": 40,
            "step": "Separating voices",
            "logs": [{"message": "started"}, {"message": "slow", "type": "warning"}],
            "processed_segments": [{"start": 1.0, "end": 2.0, "pitch": -3}]
        }"#;
        let status: StatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(status.status, TaskStatus::Processing);
        assert_eq!(status.progress, 40.0);
        assert_eq!(status.display_message(), "Separating voices");
        let logs = status.logs.unwrap();
        assert_eq!(logs[0].level, LogLevel::Info);
        assert_eq!(logs[1].level, LogLevel::Warning);
        assert_eq!(status.processed_segments.unwrap()[0].pitch, -3.0);
    }

    #[test]
    fn test_unknown_status_is_not_terminal() {
        let status: StatusResponse =
            serde_json::from_str(r#"{"status": "queued", "progress": 0}"#).unwrap();
        assert_eq!(status.status, TaskStatus::Unknown);
        assert!(!status.status.is_terminal());
    }

    #[test]
    fn test_both_completion_spellings_succeed() {
        assert!(TaskStatus::Completed.is_success());
        assert!(TaskStatus::Complete.is_success());
        assert!(!TaskStatus::Analyzing.is_terminal());
    }

    #[test]
    fn test_failure_message_fallbacks() {
        let mut status = StatusResponse::new(TaskStatus::Error, 0.0);
        assert_eq!(status.failure_message(), None);
        assert_eq!(status.display_message(), GENERIC_PROGRESS_MESSAGE);
        status.step = Some("Encoding".to_string());
        assert_eq!(status.failure_message().as_deref(), Some("Encoding"));
        status.message = Some("ffmpeg exited".to_string());
        assert_eq!(status.failure_message().as_deref(), Some("ffmpeg exited"));
    }
}
