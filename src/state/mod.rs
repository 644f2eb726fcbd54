//! State management module
//!
//! This module contains the core data structures of the editor:
//! - TimelineState: playback position, duration, zoom, volume, load status
//! - EditMode: how timeline gestures are interpreted
//! - Selection / Region: pending and committed pitch ranges
//! - Task types: backend status, logs, processed segments, request bodies
//! - ProjectHistory: capped list of finished runs

mod edit_mode;
mod history;
mod region;
mod selection;
mod task;
mod timeline;

pub use edit_mode::*;
pub use history::*;
pub use region::*;
pub use selection::*;
pub use task::*;
pub use timeline::*;
