use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use pitch_region_editor::providers::{TaskBackend, UploadProgress};
use pitch_region_editor::state::{
    ApplyRequest, ApplyResponse, AutoProcessOptions, PitchDirection, ProcessedSegment,
    StatusResponse, TaskStatus, UploadResponse,
};
use pitch_region_editor::timeline::{
    HeadlessSurface, HeadlessVideo, MediaSource, OverlayId, OverlaySink, SurfaceEvent,
};
use pitch_region_editor::{EditorConfig, EditorError, EditorSession, JobPhase, Result};

/// Backend that walks every task through a fixed list of statuses.
#[derive(Default)]
struct FakeServer {
    statuses: Mutex<HashMap<String, VecDeque<StatusResponse>>>,
    submitted: Mutex<Vec<ApplyRequest>>,
}

impl FakeServer {
    fn script(&self, task_id: &str, statuses: Vec<StatusResponse>) {
        self.statuses
            .lock()
            .unwrap()
            .insert(task_id.to_string(), statuses.into());
    }
}

impl TaskBackend for FakeServer {
    async fn upload_for_processing(
        &self,
        _file: &Path,
        _options: &AutoProcessOptions,
        progress: Option<UploadProgress>,
    ) -> Result<UploadResponse> {
        if let Some(progress) = progress {
            progress(100);
        }
        Ok(UploadResponse {
            task_id: "auto-1".to_string(),
            status: "uploaded".to_string(),
            message: String::new(),
        })
    }

    async fn upload_for_editor(&self, _file: &Path, _progress: Option<UploadProgress>) -> Result<UploadResponse> {
        Ok(UploadResponse {
            task_id: "edit-1".to_string(),
            status: "uploaded".to_string(),
            message: String::new(),
        })
    }

    async fn fetch_status(&self, task_id: &str) -> Result<StatusResponse> {
        self.statuses
            .lock()
            .unwrap()
            .get_mut(task_id)
            .and_then(|queue| queue.pop_front())
            .ok_or_else(|| EditorError::Job(format!("unknown task {}", task_id)))
    }

    async fn apply_manual_pitch(&self, request: &ApplyRequest) -> Result<ApplyResponse> {
        self.submitted.lock().unwrap().push(request.clone());
        Ok(ApplyResponse {
            status: "processing".to_string(),
            message: String::new(),
            task_id: format!("{}-manual", request.task_id),
            output_file: None,
            output_audio: None,
        })
    }

    fn media_source(&self, task_id: &str) -> MediaSource {
        MediaSource {
            audio_url: format!("fake://{}/audio", task_id),
            video_url: None,
        }
    }
}

fn status(status: TaskStatus, progress: f64) -> StatusResponse {
    StatusResponse::new(status, progress)
}

fn session() -> EditorSession<HeadlessSurface, HeadlessVideo, FakeServer> {
    let config = EditorConfig {
        poll_interval_ms: 1,
        ..Default::default()
    };
    EditorSession::new(HeadlessSurface::new(), HeadlessVideo::default(), FakeServer::default(), &config)
}

#[tokio::test]
async fn test_edit_submit_and_reload() {
    let mut session = session();
    let mut first = status(TaskStatus::Completed, 100.0);
    first.processed_segments = Some(vec![ProcessedSegment { start: 0.5, end: 1.5, pitch: -3.0 }]);
    session.jobs().backend().script("edit-1", vec![first]);

    session.upload_for_editing(Path::new("interview.mov")).await.unwrap();
    let load = session.timeline().current_load();
    session.handle_surface_event(SurfaceEvent::Ready { load, duration: 42.0 });
    assert_eq!(session.timeline().surface().overlay_ids(), vec![OverlayId::Processed(0)]);

    session.handle_surface_event(SurfaceEvent::SelectionDrawn { start: 8.0, end: 4.0 });
    let down = session.add_region(PitchDirection::Down, 2.5).unwrap();
    session.handle_surface_event(SurfaceEvent::SelectionDrawn { start: 10.0, end: 12.0 });
    session.add_region(PitchDirection::Up, 1.0).unwrap();
    assert_eq!((down.start, down.end), (4.0, 8.0));

    // Clearing regions leaves the processed-segment overlay alone.
    assert_eq!(session.clear_regions(), 2);
    assert_eq!(session.timeline().surface().overlay_ids(), vec![OverlayId::Processed(0)]);

    session.handle_surface_event(SurfaceEvent::SelectionDrawn { start: 4.0, end: 8.0 });
    session.add_region(PitchDirection::Down, 2.5).unwrap();

    session.jobs().backend().script(
        "edit-1-manual",
        vec![
            status(TaskStatus::Processing, 30.0),
            status(TaskStatus::Completed, 100.0),
            status(TaskStatus::Completed, 100.0),
        ],
    );
    let outcome = session.apply_regions().await.unwrap();
    assert_eq!(outcome.task_id, "edit-1-manual");
    assert_eq!(session.task_id(), Some("edit-1-manual"));
    assert!(session.regions().is_empty());
    assert_eq!(session.jobs().snapshot().phase, JobPhase::Completed);

    let submitted = session.jobs().backend().submitted.lock().unwrap().clone();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].task_id, "edit-1");
    assert_eq!(submitted[0].regions.len(), 1);
    assert_eq!(submitted[0].regions[0].pitch, -2.5);
    assert_eq!(
        session.timeline().surface().loaded.as_ref().map(|(_, url)| url.as_str()),
        Some("fake://edit-1-manual/audio")
    );
}

#[tokio::test]
async fn test_decode_failure_is_not_loading() {
    let mut session = session();
    session.load_task("broken").await;
    let load = session.timeline().current_load();
    session.handle_surface_event(SurfaceEvent::LoadFailed {
        load,
        reason: "unsupported codec".to_string(),
    });
    let state = session.timeline().state();
    assert!(!state.is_loading());
    assert_eq!(state.load_error(), Some("unsupported codec"));
    assert_eq!(session.take_notices().len(), 1);
}

#[tokio::test]
async fn test_server_error_reaches_job_snapshot() {
    let mut session = session();
    session.load_task("t").await;
    session.handle_surface_event(SurfaceEvent::SelectionDrawn { start: 1.0, end: 2.0 });
    session.add_region(PitchDirection::Down, 3.0).unwrap();

    let mut failed = status(TaskStatus::Error, 60.0);
    failed.message = Some("Vocoder failed".to_string());
    session.jobs().backend().script("t-manual", vec![failed]);

    let err = session.apply_regions().await.unwrap_err();
    assert_eq!(err.to_string(), "Vocoder failed");
    let snapshot = session.jobs().snapshot();
    assert_eq!(snapshot.phase, JobPhase::Error);
    assert_eq!(snapshot.error.as_deref(), Some("Vocoder failed"));
    assert_eq!(snapshot.logs.len(), 1);
    assert_eq!(session.regions().regions().len(), 1);
}
