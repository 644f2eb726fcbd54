//! Processing job coordinator.
//!
//! Submits region edits and uploads, polls the backend until the task
//! reaches a terminal status, and publishes the observed job state through a
//! `watch` channel.
//!
//! Every run is tied to a `JobTicket`. Starting a new run or cancelling bumps
//! the generation counter, which turns older tickets stale: a stale poll stops
//! before its next fetch and drops any result it was waiting on, so it never
//! lands on the newer task's state.

use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::constants::{GENERIC_JOB_ERROR, GENERIC_PROGRESS_MESSAGE};
use crate::error::{EditorError, Result};
use crate::providers::{TaskBackend, UploadProgress};
use crate::state::{
    ApplyRequest, ApplyResponse, AutoProcessOptions, LogEntry, LogLevel, Region, StatusResponse,
};

/// Local view of where a job stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Uploading,
    Processing,
    Completed,
    Error,
}

impl JobPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Error)
    }

    pub fn is_busy(self) -> bool {
        matches!(self, JobPhase::Uploading | JobPhase::Processing)
    }
}

/// What the UI shows for the active job.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobSnapshot {
    pub task_id: Option<String>,
    pub phase: JobPhase,
    pub progress: f64,
    pub message: String,
    pub step: Option<String>,
    pub logs: Vec<LogEntry>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTicket {
    generation: u64,
}

/// A finished job: the task that produced the output and its final status.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub task_id: String,
    pub status: StatusResponse,
}

pub struct JobCoordinator<B: TaskBackend> {
    backend: B,
    interval: Duration,
    generation: Arc<AtomicU64>,
    snapshot: Arc<watch::Sender<JobSnapshot>>,
}

impl<B: TaskBackend> JobCoordinator<B> {
    pub fn new(backend: B, interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(JobSnapshot::default());
        Self {
            backend,
            interval,
            generation: Arc::new(AtomicU64::new(0)),
            snapshot: Arc::new(tx),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Start a new run, superseding whatever ran before.
    pub fn begin(&self, phase: JobPhase, task_id: Option<&str>) -> JobTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.snapshot.send_replace(JobSnapshot {
            task_id: task_id.map(str::to_string),
            phase,
            progress: 0.0,
            message: GENERIC_PROGRESS_MESSAGE.to_string(),
            ..Default::default()
        });
        JobTicket { generation }
    }

    /// Invalidate the active run and return to idle.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.snapshot.send_replace(JobSnapshot::default());
    }

    pub fn is_current(&self, ticket: &JobTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Mutate the published snapshot on behalf of `ticket`. Stale tickets and
    /// runs already in a terminal phase are ignored.
    fn publish(&self, ticket: &JobTicket, update: impl FnOnce(&mut JobSnapshot)) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.snapshot.send_if_modified(|snapshot| {
            if snapshot.phase.is_terminal() {
                return false;
            }
            update(snapshot);
            true
        })
    }

    fn upload_progress(&self, ticket: &JobTicket) -> UploadProgress {
        let generation = Arc::clone(&self.generation);
        let snapshot = Arc::clone(&self.snapshot);
        let expected = ticket.generation;
        Arc::new(move |percent: u8| {
            if generation.load(Ordering::SeqCst) != expected {
                return;
            }
            snapshot.send_modify(|state| {
                state.progress = f64::from(percent);
                state.message = format!("Uploading: {}%", percent);
            });
        })
    }

    /// Submit manual regions. The region list is copied before this returns,
    /// so later edits to the caller's list do not change what is sent. An
    /// empty list fails without touching the network.
    pub fn submit(
        &self,
        task_id: &str,
        regions: &[Region],
    ) -> impl Future<Output = Result<ApplyResponse>> + '_ {
        let request = if regions.is_empty() {
            Err(EditorError::NoRegions)
        } else {
            Ok(ApplyRequest {
                task_id: task_id.to_string(),
                regions: regions.iter().map(Region::to_payload).collect(),
            })
        };
        async move {
            let request = request?;
            info!(
                task_id = %request.task_id,
                regions = request.regions.len(),
                "Submitting region edits"
            );
            self.backend.apply_manual_pitch(&request).await
        }
    }

    /// Poll `task_id` until it completes or fails. `on_progress` sees every
    /// fetched status, including the terminal one, while the ticket is current.
    pub async fn poll(
        &self,
        ticket: &JobTicket,
        task_id: &str,
        mut on_progress: impl FnMut(&StatusResponse),
    ) -> Result<StatusResponse> {
        loop {
            if !self.is_current(ticket) {
                debug!(task_id, "Poll cancelled before fetch");
                return Err(EditorError::Superseded);
            }
            let status = self.backend.fetch_status(task_id).await?;
            if !self.is_current(ticket) {
                debug!(task_id, "Dropping stale status result");
                return Err(EditorError::Superseded);
            }

            self.publish(ticket, |snapshot| {
                snapshot.progress = status.progress;
                snapshot.message = status.display_message();
                snapshot.step = status.step.clone();
                if let Some(logs) = status.logs.as_ref() {
                    snapshot.logs = logs.clone();
                }
            });
            on_progress(&status);

            if status.status.is_success() {
                return Ok(status);
            }
            if status.status.is_failure() {
                let message = status
                    .failure_message()
                    .unwrap_or_else(|| GENERIC_JOB_ERROR.to_string());
                return Err(EditorError::Job(message));
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Upload flow: `uploading -> processing -> completed | error`.
    pub async fn process_upload(&self, file: &Path, options: &AutoProcessOptions) -> Result<JobOutcome> {
        let ticket = self.begin(JobPhase::Uploading, None);
        let progress = self.upload_progress(&ticket);
        let upload = match self
            .backend
            .upload_for_processing(file, options, Some(progress))
            .await
        {
            Ok(upload) => upload,
            Err(err) => return Err(self.fail(&ticket, None, err).await),
        };
        self.publish(&ticket, |snapshot| {
            snapshot.task_id = Some(upload.task_id.clone());
            snapshot.phase = JobPhase::Processing;
            snapshot.progress = 0.0;
            snapshot.message = GENERIC_PROGRESS_MESSAGE.to_string();
        });
        self.finish(&ticket, &upload.task_id).await
    }

    /// Manual-apply flow: `processing -> completed | error`.
    pub async fn apply_regions(&self, task_id: &str, regions: &[Region]) -> Result<JobOutcome> {
        if regions.is_empty() {
            return Err(EditorError::NoRegions);
        }
        let ticket = self.begin(JobPhase::Processing, Some(task_id));
        self.run_apply(&ticket, task_id, regions).await
    }

    /// Submit and poll a manual apply under a ticket already taken with `begin`.
    pub async fn run_apply(&self, ticket: &JobTicket, task_id: &str, regions: &[Region]) -> Result<JobOutcome> {
        let response = match self.submit(task_id, regions).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail(ticket, None, err).await),
        };
        self.publish(ticket, |snapshot| {
            snapshot.task_id = Some(response.task_id.clone());
        });
        self.finish(ticket, &response.task_id).await
    }

    async fn finish(&self, ticket: &JobTicket, task_id: &str) -> Result<JobOutcome> {
        match self.poll(ticket, task_id, |_| {}).await {
            Ok(status) => {
                self.publish(ticket, |snapshot| {
                    snapshot.phase = JobPhase::Completed;
                    snapshot.message = "Processing complete".to_string();
                });
                info!(task_id, "Job completed");
                Ok(JobOutcome {
                    task_id: task_id.to_string(),
                    status,
                })
            }
            Err(err) => Err(self.fail(ticket, Some(task_id), err).await),
        }
    }

    /// Move the run to `error`, attaching server logs when they can still be
    /// fetched and a synthesized entry otherwise.
    async fn fail(&self, ticket: &JobTicket, task_id: Option<&str>, err: EditorError) -> EditorError {
        if err.is_superseded() || !self.is_current(ticket) {
            return err;
        }
        warn!(task_id = task_id.unwrap_or("-"), "Job failed: {}", err);

        let mut logs = match task_id {
            Some(task_id) => match self.backend.fetch_status(task_id).await {
                Ok(status) => status.logs.unwrap_or_default(),
                Err(fetch_err) => {
                    debug!(task_id, "Could not fetch logs after failure: {}", fetch_err);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        if logs.is_empty() {
            logs.push(LogEntry::synthesized(LogLevel::Error, err.to_string()));
        }

        let message = err.to_string();
        self.publish(ticket, |snapshot| {
            snapshot.phase = JobPhase::Error;
            snapshot.message = message.clone();
            snapshot.error = Some(message);
            snapshot.logs = logs;
        });
        err
    }
}
