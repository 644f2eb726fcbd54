//! Processing backends.
//!
//! The editor talks to the backend only through `TaskBackend`, so the HTTP
//! client can be swapped for a scripted one in tests.

pub mod pitch_server;
#[cfg(test)]
pub(crate) mod scripted;

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::state::{
    ApplyRequest, ApplyResponse, AutoProcessOptions, StatusResponse, UploadResponse,
};
use crate::timeline::MediaSource;

pub use pitch_server::PitchServerClient;

/// Upload progress callback, 0-100.
pub type UploadProgress = Arc<dyn Fn(u8) + Send + Sync>;

#[allow(async_fn_in_trait)]
pub trait TaskBackend {
    /// Upload a file for automatic detection and shifting.
    async fn upload_for_processing(
        &self,
        file: &Path,
        options: &AutoProcessOptions,
        progress: Option<UploadProgress>,
    ) -> Result<UploadResponse>;

    /// Upload a file to be edited manually.
    async fn upload_for_editor(&self, file: &Path, progress: Option<UploadProgress>) -> Result<UploadResponse>;

    async fn fetch_status(&self, task_id: &str) -> Result<StatusResponse>;

    /// Submit manual regions. The response carries the id of the new job.
    async fn apply_manual_pitch(&self, request: &ApplyRequest) -> Result<ApplyResponse>;

    /// Audio and video stream locations for loading a task into the timeline.
    fn media_source(&self, task_id: &str) -> MediaSource;
}
