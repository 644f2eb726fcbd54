//! Processed-segment overlays.
//!
//! Segments the backend already shifted are fetched once per task load and
//! drawn as read-only overlays next to the manual regions.

use tracing::debug;

use crate::providers::TaskBackend;
use crate::state::{ProcessedSegment, Region, Selection};
use crate::timeline::{Overlay, OverlayId, OverlaySink};

/// Fetch the task's processed segments. Any failure degrades to an empty set.
pub async fn fetch_processed_segments<B: TaskBackend>(backend: &B, task_id: &str) -> Vec<ProcessedSegment> {
    match backend.fetch_status(task_id).await {
        Ok(status) => status.processed_segments.unwrap_or_default(),
        Err(err) => {
            debug!(task_id, "Processed segments unavailable: {}", err);
            Vec::new()
        }
    }
}

#[derive(Debug, Default)]
pub struct SegmentOverlays {
    segments: Vec<ProcessedSegment>,
    drawn: usize,
}

impl SegmentOverlays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[ProcessedSegment] {
        &self.segments
    }

    /// Replace the segment set, removing overlays drawn for the previous one.
    pub fn replace(&mut self, segments: Vec<ProcessedSegment>, overlays: &mut impl OverlaySink) {
        self.clear(overlays);
        self.segments = segments;
    }

    /// Discard all segments and their overlays.
    pub fn clear(&mut self, overlays: &mut impl OverlaySink) {
        for index in 0..self.drawn {
            overlays.remove_overlay(&OverlayId::Processed(index));
        }
        self.drawn = 0;
        self.segments.clear();
    }

    /// Draw the segments once the media duration is known.
    pub fn render(&mut self, duration: f64, overlays: &mut impl OverlaySink) -> usize {
        if duration <= 0.0 || self.segments.is_empty() {
            return 0;
        }
        for (index, segment) in self.segments.iter().enumerate() {
            overlays.upsert_overlay(Overlay::processed(index, segment));
        }
        self.drawn = self.drawn.max(self.segments.len());
        self.segments.len()
    }
}

/// The complete overlay set for a frame: processed segments underneath,
/// then manual regions, then the pending selection on top.
pub fn merge_overlays(
    segments: &[ProcessedSegment],
    regions: &[Region],
    selection: Option<&Selection>,
) -> Vec<Overlay> {
    let mut merged = Vec::with_capacity(segments.len() + regions.len() + 1);
    merged.extend(
        segments
            .iter()
            .enumerate()
            .map(|(index, segment)| Overlay::processed(index, segment)),
    );
    merged.extend(regions.iter().map(Overlay::region));
    if let Some(selection) = selection {
        merged.push(Overlay::selection(selection));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PitchDirection, SemitoneShift};
    use crate::timeline::{HeadlessSurface, OverlayStyle};

    fn segments() -> Vec<ProcessedSegment> {
        vec![
            ProcessedSegment { start: 1.0, end: 2.0, pitch: -3.0 },
            ProcessedSegment { start: 5.0, end: 7.5, pitch: -2.0 },
        ]
    }

    #[test]
    fn test_render_waits_for_duration() {
        let mut surface = HeadlessSurface::new();
        let mut overlays = SegmentOverlays::new();
        overlays.replace(segments(), &mut surface);
        assert_eq!(overlays.render(0.0, &mut surface), 0);
        assert!(surface.overlays.is_empty());
        assert_eq!(overlays.render(10.0, &mut surface), 2);
        assert_eq!(
            surface.overlay_ids(),
            vec![OverlayId::Processed(0), OverlayId::Processed(1)]
        );
    }

    #[test]
    fn test_render_twice_does_not_duplicate() {
        let mut surface = HeadlessSurface::new();
        let mut overlays = SegmentOverlays::new();
        overlays.replace(segments(), &mut surface);
        overlays.render(10.0, &mut surface);
        overlays.render(10.0, &mut surface);
        assert_eq!(surface.overlays.len(), 2);
    }

    #[test]
    fn test_clear_leaves_region_overlays() {
        let mut surface = HeadlessSurface::new();
        let selection = Selection::new(3.0, 4.0).unwrap();
        let region = Region::from_selection(
            &selection,
            PitchDirection::Up,
            SemitoneShift::new(2.0).unwrap(),
        );
        surface.upsert_overlay(Overlay::region(&region));

        let mut overlays = SegmentOverlays::new();
        overlays.replace(segments(), &mut surface);
        overlays.render(10.0, &mut surface);
        overlays.clear(&mut surface);

        assert!(overlays.segments().is_empty());
        assert_eq!(surface.overlay_ids(), vec![OverlayId::Region(region.id)]);
    }

    #[test]
    fn test_merge_orders_layers() {
        let selection = Selection::new(8.0, 9.0).unwrap();
        let region = Region::from_selection(
            &selection,
            PitchDirection::Down,
            SemitoneShift::new(3.0).unwrap(),
        );
        let merged = merge_overlays(&segments(), &[region.clone()], Some(&selection));
        let styles: Vec<OverlayStyle> = merged.iter().map(|overlay| overlay.style).collect();
        assert_eq!(
            styles,
            vec![
                OverlayStyle::Processed,
                OverlayStyle::Processed,
                OverlayStyle::RegionDown,
                OverlayStyle::Selection
            ]
        );
        assert_eq!(merged[2].start, region.start);
    }
}
