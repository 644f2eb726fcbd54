//! Editor session: the view that owns one editing surface.
//!
//! Wires the timeline, edit mode, region list, processed-segment overlays and
//! job coordinator together. Loading a task resets everything tied to the
//! previous one; teardown stops polling, drops pending decode callbacks and
//! disposes the input subscription.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::jobs::{JobCoordinator, JobOutcome, JobPhase, JobTicket};
use super::regions::RegionManager;
use super::segments::{fetch_processed_segments, merge_overlays, SegmentOverlays};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::hotkeys::{HotkeyAction, HotkeyContext, HotkeyResult, Key};
use crate::providers::TaskBackend;
use crate::state::{EditMode, EditModeMachine, PitchDirection, Region};
use crate::timeline::{
    register_input_handlers, GestureAction, InputSubscription, Overlay, SurfaceEvent, SurfaceId,
    TimelineController, TimelineEvent, VideoSink, WaveformSurface, WheelGesture,
};
use crate::utils::validate_media_file;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// A manual apply that has been validated and snapshotted but not yet sent.
///
/// Holds its own handle on the coordinator, so the session stays free for
/// other actions while [`PendingApply::run`] is awaited.
pub struct PendingApply<B: TaskBackend> {
    jobs: Arc<JobCoordinator<B>>,
    ticket: JobTicket,
    task_id: String,
    regions: Vec<Region>,
}

impl<B: TaskBackend> PendingApply<B> {
    pub fn ticket(&self) -> JobTicket {
        self.ticket
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Submit and poll until the job settles or is superseded.
    pub async fn run(self) -> ApplyCompletion {
        let result = self
            .jobs
            .run_apply(&self.ticket, &self.task_id, &self.regions)
            .await;
        ApplyCompletion {
            ticket: self.ticket,
            result,
        }
    }
}

/// Result of a [`PendingApply`], to be handed back to the session.
#[derive(Debug)]
pub struct ApplyCompletion {
    ticket: JobTicket,
    result: Result<JobOutcome>,
}

impl ApplyCompletion {
    pub fn result(&self) -> &Result<JobOutcome> {
        &self.result
    }
}

pub struct EditorSession<S: WaveformSurface, V: VideoSink, B: TaskBackend> {
    timeline: TimelineController<S, V>,
    modes: EditModeMachine,
    regions: RegionManager,
    segments: SegmentOverlays,
    jobs: Arc<JobCoordinator<B>>,
    input: InputSubscription,
    surface_id: SurfaceId,
    task_id: Option<String>,
    seek_step: f64,
    notices: VecDeque<Notice>,
}

impl<S: WaveformSurface, V: VideoSink, B: TaskBackend> EditorSession<S, V, B> {
    pub fn new(surface: S, video: V, backend: B, config: &EditorConfig) -> Self {
        let modes = EditModeMachine::new();
        let surface_id = SurfaceId(1);
        let input = register_input_handlers(surface_id, modes.accessor());
        Self {
            timeline: TimelineController::new(surface, video, config.default_zoom, config.default_volume),
            modes,
            regions: RegionManager::new(),
            segments: SegmentOverlays::new(),
            jobs: Arc::new(JobCoordinator::new(backend, config.poll_interval())),
            input,
            surface_id,
            task_id: None,
            seek_step: config.seek_step_seconds,
            notices: VecDeque::new(),
        }
    }

    pub fn timeline(&self) -> &TimelineController<S, V> {
        &self.timeline
    }

    pub fn regions(&self) -> &RegionManager {
        &self.regions
    }

    pub fn segments(&self) -> &SegmentOverlays {
        &self.segments
    }

    /// Everything that should currently be drawn, bottom layer first.
    pub fn overlays(&self) -> Vec<Overlay> {
        merge_overlays(
            self.segments.segments(),
            self.regions.regions(),
            self.regions.selection(),
        )
    }

    pub fn jobs(&self) -> &JobCoordinator<B> {
        &self.jobs
    }

    pub fn input(&self) -> &InputSubscription {
        &self.input
    }

    /// The surface wheel events must come from to be honoured.
    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push_back(Notice {
            level,
            message: message.into(),
        });
    }

    /// Load a task into the editor, superseding any job started for the
    /// previous one, whether still polling or finished but not yet completed.
    pub async fn load_task(&mut self, task_id: &str) {
        self.jobs.cancel();
        self.open_task(task_id).await;
    }

    async fn open_task(&mut self, task_id: &str) {
        info!(task_id, "Loading task into editor");
        let surface = self.timeline.surface_mut();
        self.regions.reset(surface);
        self.segments.clear(surface);

        // A fresh source is a fresh surface; input bound to the old one goes away.
        self.input.dispose();
        self.surface_id = SurfaceId(self.surface_id.0 + 1);
        self.input = register_input_handlers(self.surface_id, self.modes.accessor());

        let source = self.jobs.backend().media_source(task_id);
        self.timeline.load(&source);
        self.task_id = Some(task_id.to_string());

        let segments = fetch_processed_segments(self.jobs.backend(), task_id).await;
        self.segments.replace(segments, self.timeline.surface_mut());
        let duration = self.timeline.state().duration;
        self.segments.render(duration, self.timeline.surface_mut());
    }

    /// Upload a file for manual editing and load the resulting task.
    pub async fn upload_for_editing(&mut self, file: &Path) -> Result<String> {
        if let Err(err) = validate_media_file(file) {
            self.notify(NoticeLevel::Error, err.to_string());
            return Err(err);
        }
        let result = self.jobs.backend().upload_for_editor(file, None).await;
        let upload = match result {
            Ok(upload) => upload,
            Err(err) => {
                warn!(path = ?file, "Editor upload failed: {}", err);
                self.notify(NoticeLevel::Error, format!("Upload failed: {}", err));
                return Err(err);
            }
        };
        self.load_task(&upload.task_id).await;
        self.notify(NoticeLevel::Success, "File loaded into editor");
        Ok(upload.task_id)
    }

    /// Feed a renderer event through the timeline and the edit mode.
    pub fn handle_surface_event(&mut self, event: SurfaceEvent) -> Option<TimelineEvent> {
        let event = self.timeline.handle_event(event)?;
        match &event {
            TimelineEvent::Ready { duration } => {
                self.segments.render(*duration, self.timeline.surface_mut());
            }
            TimelineEvent::LoadFailed { reason } => {
                let message = format!("Could not load waveform: {}", reason);
                self.notify(NoticeLevel::Error, message);
            }
            TimelineEvent::SelectionProposed { start, end } => {
                let surface = self.timeline.surface_mut();
                match self.modes.current() {
                    EditMode::Navigate => {
                        // A navigate drag never creates a selection; undo whatever the renderer drew.
                        self.regions.sync_selection_overlay(surface);
                        return None;
                    }
                    EditMode::Select => {
                        if self.regions.set_selection(*start, *end, surface).is_err() {
                            return None;
                        }
                    }
                }
            }
            TimelineEvent::SelectionAdjusted { start, end } => {
                let surface = self.timeline.surface_mut();
                if self.regions.set_selection(*start, *end, surface).is_err() {
                    return None;
                }
            }
            TimelineEvent::TimeChanged(_) | TimelineEvent::PlaybackChanged(_) => {}
        }
        Some(event)
    }

    /// Dispatch a key press through the active input subscription.
    pub fn handle_key(&mut self, key: &Key, context: &HotkeyContext) -> HotkeyResult {
        let result = self.input.on_key(key, context);
        if let HotkeyResult::Action(action) = result {
            match action {
                HotkeyAction::PlayPause => self.timeline.toggle_playback(),
                HotkeyAction::DeleteSelection => {
                    self.regions.clear_selection(self.timeline.surface_mut());
                }
                HotkeyAction::SeekBackward => {
                    self.timeline.seek_by(-self.seek_step);
                }
                HotkeyAction::SeekForward => {
                    self.timeline.seek_by(self.seek_step);
                }
                HotkeyAction::ToggleEditMode => {
                    self.toggle_edit_mode();
                }
            }
        }
        result
    }

    /// Apply a wheel gesture coming from `surface`.
    pub fn handle_wheel(&mut self, surface: SurfaceId, gesture: WheelGesture) -> Option<GestureAction> {
        let duration = self.timeline.state().duration;
        let action = self.input.on_wheel(surface, gesture, duration)?;
        match action {
            GestureAction::Zoom(delta) => {
                self.timeline.zoom_by(delta);
            }
            GestureAction::Nudge(delta) => {
                self.timeline.seek_by(delta);
            }
        }
        Some(action)
    }

    pub fn edit_mode(&self) -> EditMode {
        self.modes.current()
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.modes.set(mode);
    }

    pub fn toggle_edit_mode(&mut self) -> EditMode {
        let mode = self.modes.toggle();
        self.notify(NoticeLevel::Info, format!("{} mode", mode.label()));
        mode
    }

    pub fn add_region(&mut self, direction: PitchDirection, shift: f32) -> Result<Region> {
        match self
            .regions
            .add_region(direction, shift, self.timeline.surface_mut())
        {
            Ok(region) => Ok(region.clone()),
            Err(err) => {
                self.notify(NoticeLevel::Error, err.to_string());
                Err(err)
            }
        }
    }

    pub fn remove_region(&mut self, id: Uuid) -> bool {
        self.regions.remove_region(id, self.timeline.surface_mut())
    }

    pub fn clear_regions(&mut self) -> usize {
        self.regions.clear_all(self.timeline.surface_mut())
    }

    /// Submit the region list, wait for the job, then load its output.
    ///
    /// Holds the session for the whole run. Callers that keep handling input
    /// meanwhile use [`start_apply`](Self::start_apply) and
    /// [`complete_apply`](Self::complete_apply) instead.
    pub async fn apply_regions(&mut self) -> Result<JobOutcome> {
        let pending = self.start_apply()?;
        let completion = pending.run().await;
        self.complete_apply(completion).await
    }

    /// Validate and snapshot the region list, and move the job to `processing`.
    pub fn start_apply(&mut self) -> Result<PendingApply<B>> {
        let Some(task_id) = self.task_id.clone() else {
            self.notify(NoticeLevel::Error, EditorError::NoActiveTask.to_string());
            return Err(EditorError::NoActiveTask);
        };
        if self.regions.is_empty() {
            self.notify(NoticeLevel::Error, EditorError::NoRegions.to_string());
            return Err(EditorError::NoRegions);
        }
        let ticket = self.jobs.begin(JobPhase::Processing, Some(&task_id));
        Ok(PendingApply {
            jobs: Arc::clone(&self.jobs),
            ticket,
            regions: self.regions.regions().to_vec(),
            task_id,
        })
    }

    /// Load the output of a finished apply. Completions whose run has since
    /// been superseded are dropped without touching the session.
    pub async fn complete_apply(&mut self, completion: ApplyCompletion) -> Result<JobOutcome> {
        if !self.jobs.is_current(&completion.ticket) {
            debug!("Dropping completion of a superseded apply");
            return Err(EditorError::Superseded);
        }
        match completion.result {
            Ok(outcome) => {
                self.open_task(&outcome.task_id).await;
                self.notify(NoticeLevel::Success, "Pitch edits applied");
                Ok(outcome)
            }
            Err(err) => {
                if !err.is_superseded() {
                    self.notify(NoticeLevel::Error, format!("Processing failed: {}", err));
                }
                Err(err)
            }
        }
    }

    /// Unmount: stop polling, ignore late decode callbacks, drop listeners.
    pub fn teardown(&mut self) {
        self.jobs.cancel();
        self.input.dispose();
        let surface = self.timeline.surface_mut();
        self.regions.reset(surface);
        self.segments.clear(surface);
        self.timeline.unload();
        self.task_id = None;
    }
}
