//! Timeline controller: waveform transport, zoom, volume, and video sync.

use tracing::{debug, warn};

use super::surface::{LoadId, MediaSource, SurfaceEvent, VideoSink, WaveformSurface};
use crate::constants::VIDEO_RESYNC_THRESHOLD_SECONDS;
use crate::state::{clamp_volume, clamp_zoom, LoadState, TimelineState};

/// What a raw surface event meant, after the controller applied it.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    Ready { duration: f64 },
    LoadFailed { reason: String },
    TimeChanged(f64),
    PlaybackChanged(bool),
    /// A freshly drawn range, still to be judged by the edit mode.
    SelectionProposed { start: f64, end: f64 },
    /// The pending selection was moved or resized.
    SelectionAdjusted { start: f64, end: f64 },
}

pub struct TimelineController<S: WaveformSurface, V: VideoSink> {
    surface: S,
    video: V,
    state: TimelineState,
    load_id: LoadId,
}

impl<S: WaveformSurface, V: VideoSink> TimelineController<S, V> {
    pub fn new(surface: S, video: V, zoom: f64, volume: f64) -> Self {
        let mut controller = Self {
            surface,
            video,
            state: TimelineState::default(),
            load_id: LoadId::default(),
        };
        controller.set_zoom(zoom);
        controller.set_volume(volume);
        controller
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn video(&self) -> &V {
        &self.video
    }

    pub fn current_load(&self) -> LoadId {
        self.load_id
    }

    /// Start loading a new source. Playback state from the previous source is
    /// discarded and any decode callback for it will be ignored.
    pub fn load(&mut self, source: &MediaSource) -> LoadId {
        self.reset_transport();
        self.load_id = LoadId(self.load_id.0 + 1);
        self.state.load = LoadState::Loading;
        debug!(load = self.load_id.0, url = %source.audio_url, "Loading timeline source");
        self.video.set_source(source.video_url.as_deref());
        self.surface.load(self.load_id, &source.audio_url);
        self.load_id
    }

    /// Drop the current source entirely (teardown).
    pub fn unload(&mut self) {
        self.reset_transport();
        self.load_id = LoadId(self.load_id.0 + 1);
        self.state.load = LoadState::Empty;
        self.video.set_source(None);
        self.surface.unload();
    }

    fn reset_transport(&mut self) {
        if self.state.is_playing {
            self.surface.pause();
            self.video.pause();
        }
        self.state.is_playing = false;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
    }

    pub fn play(&mut self) {
        if !self.state.is_ready() {
            return;
        }
        self.surface.play();
        self.video.play();
        self.state.is_playing = true;
    }

    pub fn pause(&mut self) {
        self.surface.pause();
        self.video.pause();
        self.state.is_playing = false;
    }

    pub fn toggle_playback(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move the playhead, clamped to the media, and carry the video along.
    pub fn seek(&mut self, time: f64) -> f64 {
        let clamped = self.state.clamp_time(time);
        self.state.current_time = clamped;
        self.surface.set_time(clamped);
        self.video.set_current_time(clamped);
        clamped
    }

    pub fn seek_by(&mut self, delta: f64) -> f64 {
        self.seek(self.state.current_time + delta)
    }

    pub fn set_zoom(&mut self, level: f64) -> f64 {
        let clamped = clamp_zoom(level);
        self.state.zoom = clamped;
        self.surface.set_zoom(clamped);
        clamped
    }

    pub fn zoom_by(&mut self, delta: f64) -> f64 {
        self.set_zoom(self.state.zoom + delta)
    }

    pub fn set_volume(&mut self, volume: f64) -> f64 {
        let clamped = clamp_volume(volume);
        self.state.volume = clamped;
        self.surface.set_volume(clamped / 100.0);
        clamped
    }

    /// Apply a renderer event. Events tied to an older load are dropped.
    pub fn handle_event(&mut self, event: SurfaceEvent) -> Option<TimelineEvent> {
        match event {
            SurfaceEvent::Ready { load, duration } => {
                if load != self.load_id || !self.state.is_loading() {
                    debug!(load = load.0, current = self.load_id.0, "Ignoring stale ready event");
                    return None;
                }
                let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
                self.state.duration = duration;
                self.state.load = LoadState::Ready;
                Some(TimelineEvent::Ready { duration })
            }
            SurfaceEvent::LoadFailed { load, reason } => {
                if load != self.load_id || !self.state.is_loading() {
                    return None;
                }
                warn!(load = load.0, "Waveform failed to load: {}", reason);
                self.state.load = LoadState::Failed {
                    reason: reason.clone(),
                };
                Some(TimelineEvent::LoadFailed { reason })
            }
            SurfaceEvent::TimeUpdate(time) => {
                if !self.state.is_ready() {
                    return None;
                }
                let time = self.state.clamp_time(time);
                self.state.current_time = time;
                if (self.video.current_time() - time).abs() > VIDEO_RESYNC_THRESHOLD_SECONDS {
                    self.video.set_current_time(time);
                }
                Some(TimelineEvent::TimeChanged(time))
            }
            SurfaceEvent::Seeking(time) => {
                if !self.state.is_ready() {
                    return None;
                }
                let time = self.state.clamp_time(time);
                self.state.current_time = time;
                self.video.set_current_time(time);
                Some(TimelineEvent::TimeChanged(time))
            }
            SurfaceEvent::Play => {
                self.state.is_playing = true;
                self.video.play();
                Some(TimelineEvent::PlaybackChanged(true))
            }
            SurfaceEvent::Pause => {
                self.state.is_playing = false;
                self.video.pause();
                Some(TimelineEvent::PlaybackChanged(false))
            }
            SurfaceEvent::SelectionDrawn { start, end } => {
                Some(TimelineEvent::SelectionProposed { start, end })
            }
            SurfaceEvent::SelectionResized { start, end } => {
                Some(TimelineEvent::SelectionAdjusted { start, end })
            }
        }
    }
}
