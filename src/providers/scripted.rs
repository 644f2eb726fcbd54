//! Scripted backend for unit tests.

use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use super::{TaskBackend, UploadProgress};
use crate::error::{EditorError, Result};
use crate::state::{
    ApplyRequest, ApplyResponse, AutoProcessOptions, StatusResponse, TaskStatus, UploadResponse,
};
use crate::timeline::MediaSource;

/// Pauses the next status fetch until released.
pub(crate) struct FetchGate {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[derive(Default)]
pub(crate) struct ScriptedBackend {
    statuses: Mutex<HashMap<String, VecDeque<Result<StatusResponse>>>>,
    pub status_calls: AtomicUsize,
    pub apply_calls: AtomicUsize,
    pub applied: Mutex<Vec<ApplyRequest>>,
    pub uploads: Mutex<Vec<PathBuf>>,
    apply_result: Mutex<Option<Result<ApplyResponse>>>,
    upload_result: Mutex<Option<Result<UploadResponse>>>,
    gate: Mutex<Option<FetchGate>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, task_id: &str, status: Result<StatusResponse>) {
        self.statuses
            .lock()
            .unwrap()
            .entry(task_id.to_string())
            .or_default()
            .push_back(status);
    }

    pub fn push_progress(&self, task_id: &str, status: TaskStatus, progress: f64) {
        self.push_status(task_id, Ok(StatusResponse::new(status, progress)));
    }

    pub fn set_apply_result(&self, result: Result<ApplyResponse>) {
        *self.apply_result.lock().unwrap() = Some(result);
    }

    pub fn set_upload_result(&self, result: Result<UploadResponse>) {
        *self.upload_result.lock().unwrap() = Some(result);
    }

    pub fn gate_next_fetch(&self) -> (Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(FetchGate {
            started: Arc::clone(&started),
            release: Arc::clone(&release),
        });
        (started, release)
    }

    fn take_upload(&self, file: &Path, progress: Option<UploadProgress>) -> Result<UploadResponse> {
        self.uploads.lock().unwrap().push(file.to_path_buf());
        if let Some(progress) = progress {
            progress(50);
            progress(100);
        }
        self.upload_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(EditorError::Job("no upload scripted".to_string())))
    }
}

pub(crate) fn apply_ok(task_id: &str) -> ApplyResponse {
    ApplyResponse {
        status: "processing".to_string(),
        message: "started".to_string(),
        task_id: task_id.to_string(),
        output_file: None,
        output_audio: None,
    }
}

pub(crate) fn upload_ok(task_id: &str) -> UploadResponse {
    UploadResponse {
        task_id: task_id.to_string(),
        status: "uploaded".to_string(),
        message: String::new(),
    }
}

impl TaskBackend for ScriptedBackend {
    async fn upload_for_processing(
        &self,
        file: &Path,
        _options: &AutoProcessOptions,
        progress: Option<UploadProgress>,
    ) -> Result<UploadResponse> {
        self.take_upload(file, progress)
    }

    async fn upload_for_editor(&self, file: &Path, progress: Option<UploadProgress>) -> Result<UploadResponse> {
        self.take_upload(file, progress)
    }

    async fn fetch_status(&self, task_id: &str) -> Result<StatusResponse> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        let next = self
            .statuses
            .lock()
            .unwrap()
            .get_mut(task_id)
            .and_then(|queue| queue.pop_front());
        next.unwrap_or_else(|| {
            Err(EditorError::Server {
                status: StatusCode::NOT_FOUND,
                body: "unknown task".to_string(),
            })
        })
    }

    async fn apply_manual_pitch(&self, request: &ApplyRequest) -> Result<ApplyResponse> {
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        self.applied.lock().unwrap().push(request.clone());
        self.apply_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(apply_ok("applied")))
    }

    fn media_source(&self, task_id: &str) -> MediaSource {
        MediaSource {
            audio_url: format!("mem://audio/{}", task_id),
            video_url: Some(format!("mem://video/{}", task_id)),
        }
    }
}
