//! Shared tuning constants for the timeline, input handling, and job polling.

pub const ZOOM_MIN_PX_PER_SEC: f64 = 10.0;
pub const ZOOM_MAX_PX_PER_SEC: f64 = 500.0;
pub const ZOOM_DEFAULT_PX_PER_SEC: f64 = 50.0;
pub const ZOOM_WHEEL_STEP: f64 = 10.0;

pub const VOLUME_MIN: f64 = 0.0;
pub const VOLUME_MAX: f64 = 100.0;

/// Audio/video drift tolerated before the video element is re-seeked.
pub const VIDEO_RESYNC_THRESHOLD_SECONDS: f64 = 0.3;

/// Horizontal wheel delta to playhead seconds, scaled by media duration.
pub const NAVIGATE_WHEEL_SENSITIVITY: f64 = 0.00005;
/// A wheel gesture counts as horizontal when |dx| exceeds |dy| times this ratio.
pub const HORIZONTAL_WHEEL_RATIO: f64 = 0.5;

pub const SEEK_STEP_SECONDS: f64 = 5.0;

pub const SHIFT_MIN_SEMITONES: f32 = 1.0;
pub const SHIFT_MAX_SEMITONES: f32 = 12.0;
pub const SHIFT_STEP_SEMITONES: f32 = 0.5;
pub const DEFAULT_SHIFT_SEMITONES: f32 = 3.0;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_AUTO_PITCH: f64 = -3.0;

pub const HISTORY_CAPACITY: usize = 20;

pub const OVERLAY_SELECTION_ID: &str = "selection";
pub const OVERLAY_REGION_PREFIX: &str = "region-";
pub const OVERLAY_PROCESSED_PREFIX: &str = "processed-";

pub const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

pub const GENERIC_JOB_ERROR: &str = "Processing failed.";
pub const GENERIC_PROGRESS_MESSAGE: &str = "Processing...";
