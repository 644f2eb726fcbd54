use std::path::Path;

use crate::error::{EditorError, Result};

/// Playhead readout, `m:ss.cc`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let centis = ((seconds % 1.0) * 100.0).floor() as u64;
    format!("{}:{:02}.{:02}", mins, secs, centis)
}

/// Duration readout, `m:ss`.
pub fn format_duration(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", mins, secs)
}

pub fn upload_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent.min(total) as f64 / total as f64) * 100.0).round() as u8
}

/// Accept only files whose extension maps to an audio or video type.
pub fn validate_media_file(path: &Path) -> Result<mime_guess::Mime> {
    let display = path.display().to_string();
    let mime = mime_guess::from_path(path)
        .first()
        .ok_or_else(|| EditorError::UnsupportedMedia(display.clone()))?;
    match mime.type_().as_str() {
        "audio" | "video" => Ok(mime),
        _ => Err(EditorError::UnsupportedMedia(display)),
    }
}
