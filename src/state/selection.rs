//! The transient range the user is drawing before it becomes a region.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

/// A pending `[start, end)` range in seconds. Always `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    start: f64,
    end: f64,
}

impl Selection {
    /// Build a selection from a drawn range. Reversed drags are normalized;
    /// empty or non-finite ranges are rejected.
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(EditorError::InvalidRange { start, end });
        }
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        if end - start <= f64::EPSILON {
            return Err(EditorError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
