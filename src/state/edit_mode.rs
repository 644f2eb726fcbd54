//! Edit mode: how pointer and wheel gestures on the timeline are interpreted.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    /// Drags draw a selection.
    #[default]
    Select,
    /// Drags are discarded; horizontal scroll moves the playhead.
    Navigate,
}

impl EditMode {
    pub fn toggled(self) -> Self {
        match self {
            EditMode::Select => EditMode::Navigate,
            EditMode::Navigate => EditMode::Select,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EditMode::Select => "Select",
            EditMode::Navigate => "Navigate",
        }
    }
}

/// Read-only view of the live edit mode handed to input subscriptions.
pub type ModeAccessor = watch::Receiver<EditMode>;

/// Owns the current mode and publishes every change to registered accessors.
#[derive(Debug)]
pub struct EditModeMachine {
    tx: watch::Sender<EditMode>,
}

impl Default for EditModeMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl EditModeMachine {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(EditMode::default());
        Self { tx }
    }

    pub fn current(&self) -> EditMode {
        *self.tx.borrow()
    }

    pub fn set(&self, mode: EditMode) {
        self.tx.send_replace(mode);
    }

    /// Flip to the complementary mode and return the new value.
    pub fn toggle(&self) -> EditMode {
        let next = self.current().toggled();
        self.tx.send_replace(next);
        next
    }

    pub fn accessor(&self) -> ModeAccessor {
        self.tx.subscribe()
    }
}
