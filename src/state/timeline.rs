//! Playback and view state owned by the timeline controller.

use serde::{Deserialize, Serialize};

use crate::constants::{
    VOLUME_MAX, VOLUME_MIN, ZOOM_DEFAULT_PX_PER_SEC, ZOOM_MAX_PX_PER_SEC, ZOOM_MIN_PX_PER_SEC,
};

/// Lifecycle of the currently loaded media source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Empty,
    Loading,
    Ready,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineState {
    pub current_time: f64,
    pub duration: f64,
    /// Pixels per second.
    pub zoom: f64,
    /// 0-100.
    pub volume: f64,
    pub is_playing: bool,
    pub load: LoadState,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            zoom: ZOOM_DEFAULT_PX_PER_SEC,
            volume: VOLUME_MAX,
            is_playing: false,
            load: LoadState::Empty,
        }
    }
}

impl TimelineState {
    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.load, LoadState::Ready)
    }

    pub fn load_error(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn clamp_time(&self, time: f64) -> f64 {
        if !time.is_finite() {
            return 0.0;
        }
        time.clamp(0.0, self.duration.max(0.0))
    }
}

pub fn clamp_zoom(level: f64) -> f64 {
    if level.is_nan() {
        return ZOOM_DEFAULT_PX_PER_SEC;
    }
    level.clamp(ZOOM_MIN_PX_PER_SEC, ZOOM_MAX_PX_PER_SEC)
}

pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return VOLUME_MAX;
    }
    volume.clamp(VOLUME_MIN, VOLUME_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_clamps_any_magnitude_or_sign() {
        assert_eq!(clamp_zoom(-1e9), 10.0);
        assert_eq!(clamp_zoom(0.0), 10.0);
        assert_eq!(clamp_zoom(75.0), 75.0);
        assert_eq!(clamp_zoom(1e12), 500.0);
        assert_eq!(clamp_zoom(f64::INFINITY), 500.0);
        assert_eq!(clamp_zoom(f64::NEG_INFINITY), 10.0);
    }

    #[test]
    fn test_volume_clamps_any_magnitude_or_sign() {
        assert_eq!(clamp_volume(-20.0), 0.0);
        assert_eq!(clamp_volume(42.0), 42.0);
        assert_eq!(clamp_volume(250.0), 100.0);
    }

    #[test]
    fn test_failed_load_is_not_loading() {
        let state = TimelineState {
            load: LoadState::Failed {
                reason: "decode error".to_string(),
            },
            ..Default::default()
        };
        assert!(!state.is_loading());
        assert_eq!(state.load_error(), Some("decode error"));
    }
}
