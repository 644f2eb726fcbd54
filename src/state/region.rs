//! Region types
//!
//! A region is a committed time range with a pitch direction and a semitone
//! magnitude. Regions are immutable once created; changing one means deleting
//! it and adding a new one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Selection;
use crate::constants::{SHIFT_MAX_SEMITONES, SHIFT_MIN_SEMITONES, SHIFT_STEP_SEMITONES};
use crate::error::{EditorError, Result};

/// Which way a region is shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchDirection {
    Down,
    Up,
}

impl PitchDirection {
    pub fn sign(self) -> f32 {
        match self {
            PitchDirection::Down => -1.0,
            PitchDirection::Up => 1.0,
        }
    }
}

/// Semitone magnitude in `[1, 12]`, on a 0.5 grid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct SemitoneShift(f32);

impl SemitoneShift {
    pub fn new(value: f32) -> Result<Self> {
        let on_grid = ((value / SHIFT_STEP_SEMITONES).fract()).abs() < 1e-6;
        if !value.is_finite()
            || value < SHIFT_MIN_SEMITONES
            || value > SHIFT_MAX_SEMITONES
            || !on_grid
        {
            return Err(EditorError::InvalidShift(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for SemitoneShift {
    type Error = EditorError;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SemitoneShift> for f32 {
    fn from(shift: SemitoneShift) -> Self {
        shift.0
    }
}

/// A user-defined pitch region pending submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: Uuid,
    pub start: f64,
    pub end: f64,
    pub direction: PitchDirection,
    pub shift: SemitoneShift,
}

impl Region {
    /// Commit a selection as a new region with a fresh id.
    pub fn from_selection(selection: &Selection, direction: PitchDirection, shift: SemitoneShift) -> Self {
        Self {
            id: Uuid::new_v4(),
            start: selection.start(),
            end: selection.end(),
            direction,
            shift,
        }
    }

    /// Signed semitone offset: negative for down, positive for up.
    pub fn pitch(&self) -> f32 {
        self.direction.sign() * self.shift.value().abs()
    }

    pub fn to_payload(&self) -> RegionPayload {
        RegionPayload {
            start: self.start,
            end: self.end,
            direction: self.direction,
            shift: self.shift.value(),
            pitch: self.pitch(),
        }
    }
}

/// Wire form of a region in a manual-apply request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPayload {
    pub start: f64,
    pub end: f64,
    pub direction: PitchDirection,
    pub shift: f32,
    pub pitch: f32,
}
