//! Overlays drawn on top of the waveform.
//!
//! Two producers share the overlay set: the region manager (selection and
//! manual regions) and the processed-segment merger. Each overlay carries a
//! tagged id so a producer only ever touches its own entries.

use std::fmt;

use uuid::Uuid;

use crate::constants::{OVERLAY_PROCESSED_PREFIX, OVERLAY_REGION_PREFIX, OVERLAY_SELECTION_ID};
use crate::state::{PitchDirection, ProcessedSegment, Region, Selection};

pub const COLOR_SELECTION: &str = "rgba(234, 179, 8, 0.4)";
pub const COLOR_REGION_DOWN: &str = "rgba(239, 68, 68, 0.4)";
pub const COLOR_REGION_UP: &str = "rgba(34, 197, 94, 0.4)";
pub const COLOR_PROCESSED: &str = "rgba(59, 130, 246, 0.3)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayId {
    /// The single pending selection.
    Selection,
    /// A manual region, keyed by its region id.
    Region(Uuid),
    /// A server-processed segment, keyed by its index in the status payload.
    Processed(usize),
}

impl OverlayId {
    pub fn is_processed(&self) -> bool {
        matches!(self, OverlayId::Processed(_))
    }

    pub fn is_region(&self) -> bool {
        matches!(self, OverlayId::Region(_))
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayId::Selection => f.write_str(OVERLAY_SELECTION_ID),
            OverlayId::Region(id) => write!(f, "{}{}", OVERLAY_REGION_PREFIX, id),
            OverlayId::Processed(index) => write!(f, "{}{}", OVERLAY_PROCESSED_PREFIX, index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStyle {
    Selection,
    RegionDown,
    RegionUp,
    Processed,
}

impl OverlayStyle {
    pub fn color(self) -> &'static str {
        match self {
            OverlayStyle::Selection => COLOR_SELECTION,
            OverlayStyle::RegionDown => COLOR_REGION_DOWN,
            OverlayStyle::RegionUp => COLOR_REGION_UP,
            OverlayStyle::Processed => COLOR_PROCESSED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: OverlayId,
    pub start: f64,
    pub end: f64,
    pub style: OverlayStyle,
    pub draggable: bool,
    pub resizable: bool,
}

impl Overlay {
    pub fn selection(selection: &Selection) -> Self {
        Self {
            id: OverlayId::Selection,
            start: selection.start(),
            end: selection.end(),
            style: OverlayStyle::Selection,
            draggable: true,
            resizable: true,
        }
    }

    pub fn region(region: &Region) -> Self {
        let style = match region.direction {
            PitchDirection::Down => OverlayStyle::RegionDown,
            PitchDirection::Up => OverlayStyle::RegionUp,
        };
        Self {
            id: OverlayId::Region(region.id),
            start: region.start,
            end: region.end,
            style,
            draggable: false,
            resizable: false,
        }
    }

    pub fn processed(index: usize, segment: &ProcessedSegment) -> Self {
        Self {
            id: OverlayId::Processed(index),
            start: segment.start,
            end: segment.end,
            style: OverlayStyle::Processed,
            draggable: false,
            resizable: false,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.draggable || self.resizable
    }
}

/// Anything that can hold overlays. Operations are idempotent: upserting an
/// existing id replaces it, removing a missing id is a no-op.
pub trait OverlaySink {
    fn upsert_overlay(&mut self, overlay: Overlay);
    fn remove_overlay(&mut self, id: &OverlayId) -> bool;
    fn overlay_ids(&self) -> Vec<OverlayId>;
}
