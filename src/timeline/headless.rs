//! In-memory surface and video sink.
//!
//! Used when driving the editor without a renderer (command-line apply) and
//! by tests to observe what the controller asked the renderer to do.

use super::overlay::{Overlay, OverlayId, OverlaySink};
use super::surface::{LoadId, VideoSink, WaveformSurface};

#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    pub overlays: Vec<Overlay>,
    pub loaded: Option<(LoadId, String)>,
    pub playing: bool,
    pub time: f64,
    pub zoom: f64,
    pub gain: f64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            gain: 1.0,
            ..Default::default()
        }
    }

    pub fn overlay(&self, id: &OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|overlay| overlay.id == *id)
    }

    pub fn current_load(&self) -> Option<LoadId> {
        self.loaded.as_ref().map(|(load, _)| *load)
    }
}

impl OverlaySink for HeadlessSurface {
    fn upsert_overlay(&mut self, overlay: Overlay) {
        if let Some(existing) = self.overlays.iter_mut().find(|o| o.id == overlay.id) {
            *existing = overlay;
        } else {
            self.overlays.push(overlay);
        }
    }

    fn remove_overlay(&mut self, id: &OverlayId) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|overlay| overlay.id != *id);
        self.overlays.len() != before
    }

    fn overlay_ids(&self) -> Vec<OverlayId> {
        self.overlays.iter().map(|overlay| overlay.id).collect()
    }
}

impl WaveformSurface for HeadlessSurface {
    fn load(&mut self, load: LoadId, audio_url: &str) {
        self.loaded = Some((load, audio_url.to_string()));
        self.playing = false;
        self.time = 0.0;
    }

    fn unload(&mut self) {
        self.loaded = None;
        self.playing = false;
        self.overlays.clear();
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn set_time(&mut self, seconds: f64) {
        self.time = seconds;
    }

    fn set_zoom(&mut self, px_per_sec: f64) {
        self.zoom = px_per_sec;
    }

    fn set_volume(&mut self, gain: f64) {
        self.gain = gain;
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessVideo {
    pub source: Option<String>,
    pub time: f64,
    pub playing: bool,
    /// Number of explicit seeks issued to the element.
    pub seeks: usize,
}

impl VideoSink for HeadlessVideo {
    fn set_source(&mut self, url: Option<&str>) {
        self.source = url.map(str::to_string);
        self.time = 0.0;
        self.playing = false;
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.time = seconds;
        self.seeks += 1;
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }
}
