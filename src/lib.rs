//! Pitch Region Editor
//!
//! Waveform region editing and processing-job coordination for manual pitch
//! correction of audio and video files.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod hotkeys;
pub mod providers;
pub mod state;
pub mod timeline;
pub mod utils;

pub use crate::config::EditorConfig;
pub use crate::core::jobs::{JobCoordinator, JobOutcome, JobPhase, JobSnapshot, JobTicket};
pub use crate::core::session::{ApplyCompletion, EditorSession, Notice, NoticeLevel, PendingApply};
pub use crate::error::{EditorError, Result};
