//! Gesture interpretation and input subscriptions for an editing surface.

use super::surface::SurfaceId;
use crate::constants::{HORIZONTAL_WHEEL_RATIO, NAVIGATE_WHEEL_SENSITIVITY, ZOOM_WHEEL_STEP};
use crate::hotkeys::{handle_hotkey, HotkeyContext, HotkeyResult, Key};
use crate::state::{EditMode, ModeAccessor};

/// A pointing-device scroll gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGesture {
    pub delta_x: f64,
    pub delta_y: f64,
}

/// What a wheel gesture asks the timeline to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// Change zoom by this many px/s.
    Zoom(f64),
    /// Move the playhead by this many seconds.
    Nudge(f64),
}

/// Interpret a wheel gesture under the given mode. Horizontal scroll is left
/// alone in select mode so it does not fight drag selection.
pub fn interpret_wheel(mode: EditMode, gesture: WheelGesture, duration: f64) -> Option<GestureAction> {
    let WheelGesture { delta_x, delta_y } = gesture;
    let horizontal = delta_x.abs() > delta_y.abs() * HORIZONTAL_WHEEL_RATIO;

    if horizontal && delta_x != 0.0 {
        return match mode {
            EditMode::Navigate => Some(GestureAction::Nudge(
                delta_x * duration.max(0.0) * NAVIGATE_WHEEL_SENSITIVITY,
            )),
            EditMode::Select => None,
        };
    }
    if delta_y != 0.0 {
        let step = if delta_y > 0.0 { -ZOOM_WHEEL_STEP } else { ZOOM_WHEEL_STEP };
        return Some(GestureAction::Zoom(step));
    }
    None
}

/// Keyboard and wheel listeners bound to one surface.
///
/// The mode is read through the accessor captured at registration, never
/// from shared globals. After `dispose` every event is ignored.
#[derive(Debug)]
pub struct InputSubscription {
    surface: SurfaceId,
    mode: ModeAccessor,
    disposed: bool,
}

pub fn register_input_handlers(surface: SurfaceId, mode: ModeAccessor) -> InputSubscription {
    InputSubscription {
        surface,
        mode,
        disposed: false,
    }
}

impl InputSubscription {
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn is_active(&self) -> bool {
        !self.disposed
    }

    pub fn mode(&self) -> EditMode {
        *self.mode.borrow()
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Wheel events from a different surface or after disposal yield nothing.
    pub fn on_wheel(&self, surface: SurfaceId, gesture: WheelGesture, duration: f64) -> Option<GestureAction> {
        if self.disposed || surface != self.surface {
            return None;
        }
        interpret_wheel(self.mode(), gesture, duration)
    }

    pub fn on_key(&self, key: &Key, context: &HotkeyContext) -> HotkeyResult {
        if self.disposed {
            return HotkeyResult::NoMatch;
        }
        handle_hotkey(key, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkeys::HotkeyAction;
    use crate::state::EditModeMachine;

    fn wheel(delta_x: f64, delta_y: f64) -> WheelGesture {
        WheelGesture { delta_x, delta_y }
    }

    #[test]
    fn test_vertical_scroll_zooms_in_both_modes() {
        for mode in [EditMode::Select, EditMode::Navigate] {
            assert_eq!(interpret_wheel(mode, wheel(0.0, 30.0), 60.0), Some(GestureAction::Zoom(-10.0)));
            assert_eq!(interpret_wheel(mode, wheel(0.0, -30.0), 60.0), Some(GestureAction::Zoom(10.0)));
        }
    }

    #[test]
    fn test_horizontal_scroll_only_nudges_in_navigate() {
        assert_eq!(interpret_wheel(EditMode::Select, wheel(100.0, 10.0), 60.0), None);
        match interpret_wheel(EditMode::Navigate, wheel(100.0, 10.0), 60.0) {
            Some(GestureAction::Nudge(delta)) => assert!((delta - 0.3).abs() < 1e-9),
            other => panic!("expected nudge, got {:?}", other),
        }
    }

    #[test]
    fn test_mostly_vertical_diagonal_is_zoom() {
        // |dx| = 4 is not above |dy| * 0.5 = 5
        assert_eq!(
            interpret_wheel(EditMode::Navigate, wheel(4.0, 10.0), 60.0),
            Some(GestureAction::Zoom(-10.0))
        );
        assert_eq!(interpret_wheel(EditMode::Navigate, wheel(0.0, 0.0), 60.0), None);
    }

    #[test]
    fn test_subscription_follows_live_mode() {
        let machine = EditModeMachine::new();
        let subscription = register_input_handlers(SurfaceId(1), machine.accessor());
        assert_eq!(subscription.on_wheel(SurfaceId(1), wheel(50.0, 0.0), 10.0), None);
        machine.toggle();
        assert!(matches!(
            subscription.on_wheel(SurfaceId(1), wheel(50.0, 0.0), 10.0),
            Some(GestureAction::Nudge(_))
        ));
    }

    #[test]
    fn test_disposed_or_foreign_surface_is_ignored() {
        let machine = EditModeMachine::new();
        let mut subscription = register_input_handlers(SurfaceId(1), machine.accessor());
        assert_eq!(subscription.on_wheel(SurfaceId(2), wheel(0.0, 5.0), 10.0), None);
        assert_eq!(
            subscription.on_key(&Key::Space, &HotkeyContext::default()),
            HotkeyResult::Action(HotkeyAction::PlayPause)
        );
        subscription.dispose();
        assert!(!subscription.is_active());
        assert_eq!(subscription.on_wheel(SurfaceId(1), wheel(0.0, 5.0), 10.0), None);
        assert_eq!(
            subscription.on_key(&Key::Space, &HotkeyContext::default()),
            HotkeyResult::NoMatch
        );
    }
}
