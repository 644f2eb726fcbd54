//! Hotkey system
//!
//! Keyboard shortcuts for the waveform editor.
//!
//! # Architecture
//!
//! - **HotkeyAction**: Enum of all possible actions that can be triggered by hotkeys
//! - **HotkeyContext**: Determines which hotkeys are active based on editor state
//! - **handle_hotkey()**: Main dispatch function that maps key events to actions
//!
//! # Adding New Hotkeys
//!
//! 1. Add a variant to `HotkeyAction`
//! 2. Add the key binding in `handle_hotkey()`
//! 3. Handle the action in `EditorSession::handle_key`

/// Keys the editor reacts to, independent of any windowing toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Space,
    Delete,
    Backspace,
    ArrowLeft,
    ArrowRight,
    Character(String),
}

/// All possible actions that can be triggered by hotkeys.
///
/// Each variant represents a semantic action, not a key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Toggle playback.
    PlayPause,
    /// Drop the pending selection.
    DeleteSelection,
    /// Jump the playhead back by the seek step.
    SeekBackward,
    /// Jump the playhead forward by the seek step.
    SeekForward,
    /// Flip between select and navigate modes.
    ToggleEditMode,
}

/// Context information that affects which hotkeys are active.
#[derive(Debug, Clone, Default)]
pub struct HotkeyContext {
    /// Whether an input field has focus (suppresses all hotkeys)
    pub input_focused: bool,
}

/// Result of processing a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyResult {
    /// A hotkey action was matched and should be executed
    Action(HotkeyAction),
    /// No matching hotkey for this key/context combination
    NoMatch,
    /// Hotkey would match but is suppressed (e.g., input field focused)
    Suppressed,
}

/// Maps a key event to an action, considering the current context.
pub fn handle_hotkey(key: &Key, context: &HotkeyContext) -> HotkeyResult {
    if context.input_focused {
        return HotkeyResult::Suppressed;
    }

    let action = match key {
        Key::Space => HotkeyAction::PlayPause,
        Key::Delete | Key::Backspace => HotkeyAction::DeleteSelection,
        Key::ArrowLeft => HotkeyAction::SeekBackward,
        Key::ArrowRight => HotkeyAction::SeekForward,
        Key::Character(c) if c.eq_ignore_ascii_case("m") => HotkeyAction::ToggleEditMode,
        Key::Character(c) if c == " " => HotkeyAction::PlayPause,
        _ => return HotkeyResult::NoMatch,
    };
    HotkeyResult::Action(action)
}
