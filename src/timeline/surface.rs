//! Narrow interfaces over the waveform renderer and the paired video element.

use super::overlay::OverlaySink;

/// Identifies one `load` call so late decode callbacks from an earlier source
/// can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LoadId(pub u64);

/// Identifies a mounted editing surface for input subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceId(pub u64);

/// Media handed to the timeline: the audio drives the waveform, the video
/// element follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub audio_url: String,
    pub video_url: Option<String>,
}

/// Waveform rendering and audio transport.
pub trait WaveformSurface: OverlaySink {
    /// Begin decoding and drawing `audio_url`. Completion is reported with
    /// `SurfaceEvent::Ready` or `SurfaceEvent::LoadFailed` carrying `load`.
    fn load(&mut self, load: LoadId, audio_url: &str);
    fn unload(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    fn set_time(&mut self, seconds: f64);
    fn set_zoom(&mut self, px_per_sec: f64);
    /// Normalized gain, 0.0 to 1.0.
    fn set_volume(&mut self, gain: f64);
}

/// The muted video element mirrored from the audio transport.
pub trait VideoSink {
    fn set_source(&mut self, url: Option<&str>);
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    fn play(&mut self);
    fn pause(&mut self);
}

/// Raw events emitted by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Ready { load: LoadId, duration: f64 },
    LoadFailed { load: LoadId, reason: String },
    TimeUpdate(f64),
    Seeking(f64),
    Play,
    Pause,
    /// A drag on the waveform finished drawing a candidate range.
    SelectionDrawn { start: f64, end: f64 },
    /// The pending selection overlay was moved or resized.
    SelectionResized { start: f64, end: f64 },
}
