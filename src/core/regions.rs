//! Region manager: the pending selection and the committed region list.
//!
//! The list here is authoritative. Overlays are a projection of it and are
//! updated alongside every mutation.

use uuid::Uuid;

use crate::error::{EditorError, Result};
use crate::state::{PitchDirection, Region, SemitoneShift, Selection};
use crate::timeline::{Overlay, OverlayId, OverlaySink};

#[derive(Debug, Default)]
pub struct RegionManager {
    selection: Option<Selection>,
    regions: Vec<Region>,
}

impl RegionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Regions in insertion order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Replace the pending selection. Any earlier selection overlay is replaced
    /// in place, so at most one exists.
    pub fn set_selection(&mut self, start: f64, end: f64, overlays: &mut impl OverlaySink) -> Result<Selection> {
        let selection = match Selection::new(start, end) {
            Ok(selection) => selection,
            Err(err) => {
                self.clear_selection(overlays);
                return Err(err);
            }
        };
        overlays.upsert_overlay(Overlay::selection(&selection));
        self.selection = Some(selection);
        Ok(selection)
    }

    /// Drop the pending selection and its overlay. Returns whether one existed.
    pub fn clear_selection(&mut self, overlays: &mut impl OverlaySink) -> bool {
        overlays.remove_overlay(&OverlayId::Selection);
        self.selection.take().is_some()
    }

    /// Redraw the selection overlay from the pending selection, or remove it
    /// when there is none. Leaves the selection itself alone.
    pub fn sync_selection_overlay(&self, overlays: &mut impl OverlaySink) {
        match &self.selection {
            Some(selection) => overlays.upsert_overlay(Overlay::selection(selection)),
            None => {
                overlays.remove_overlay(&OverlayId::Selection);
            }
        }
    }

    /// Commit the pending selection as a region.
    pub fn add_region(
        &mut self,
        direction: PitchDirection,
        shift: f32,
        overlays: &mut impl OverlaySink,
    ) -> Result<&Region> {
        let Some(selection) = self.selection else {
            return Err(EditorError::NoSelection);
        };
        let shift = SemitoneShift::new(shift)?;
        let region = Region::from_selection(&selection, direction, shift);
        overlays.upsert_overlay(Overlay::region(&region));
        self.clear_selection(overlays);
        self.regions.push(region);
        Ok(&self.regions[self.regions.len() - 1])
    }

    /// Remove a region and its overlay. Unknown ids are a no-op returning `false`.
    pub fn remove_region(&mut self, id: Uuid, overlays: &mut impl OverlaySink) -> bool {
        overlays.remove_overlay(&OverlayId::Region(id));
        let before = self.regions.len();
        self.regions.retain(|region| region.id != id);
        self.regions.len() != before
    }

    /// Remove every region overlay and empty the list. Processed-segment
    /// overlays are left untouched. Returns how many regions were removed.
    pub fn clear_all(&mut self, overlays: &mut impl OverlaySink) -> usize {
        for region in self.regions.iter() {
            overlays.remove_overlay(&OverlayId::Region(region.id));
        }
        let removed = self.regions.len();
        self.regions.clear();
        removed
    }

    /// Forget everything for a new media load.
    pub fn reset(&mut self, overlays: &mut impl OverlaySink) {
        self.clear_all(overlays);
        self.clear_selection(overlays);
    }
}
