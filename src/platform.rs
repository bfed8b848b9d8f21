// ============================================================================
// platform.rs — ArcadeKit
// winit glue: feeds window keyboard and focus events into a KeyStateTracker.
// ============================================================================

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::KeyStateTracker;
use crate::keys::LogicalKey;

/// Apply one raw key transition by physical key code.
///
/// OS auto-repeat arrives as extra presses; they are harmless because
/// key-down is idempotent and suppression blocks a second pulse.
pub fn apply_key(
    tracker: &KeyStateTracker<KeyCode>,
    physical_key: PhysicalKey,
    state: ElementState,
) -> Option<LogicalKey> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };
    match state {
        ElementState::Pressed => tracker.on_key_down(&code),
        ElementState::Released => tracker.on_key_up(&code),
    }
}

/// Forward a winit `KeyboardInput` event to the tracker.
pub fn apply_key_event(tracker: &KeyStateTracker<KeyCode>, event: &KeyEvent) -> Option<LogicalKey> {
    apply_key(tracker, event.physical_key, event.state)
}

/// Key-ups sent while another window has focus are never delivered, so a
/// focus loss drops every held key.
pub fn apply_focus_change(tracker: &KeyStateTracker<KeyCode>, focused: bool) {
    if !focused {
        tracker.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyBindings;
    use winit::keyboard::NativeKeyCode;

    fn tracker() -> KeyStateTracker<KeyCode> {
        KeyStateTracker::new(KeyBindings::default().to_key_map().unwrap())
    }

    #[test]
    fn test_pressed_and_released_map_to_tracker() {
        let t = tracker();

        let key = apply_key(&t, PhysicalKey::Code(KeyCode::ArrowLeft), ElementState::Pressed);
        assert_eq!(key, Some(LogicalKey::Left));
        assert!(t.advance_frame().is_just_pressed(LogicalKey::Left));

        apply_key(&t, PhysicalKey::Code(KeyCode::ArrowLeft), ElementState::Released);
        assert!(!t.advance_frame().is_pressed(LogicalKey::Left));
    }

    #[test]
    fn test_unidentified_and_unbound_keys_ignored() {
        let t = tracker();

        let unidentified = PhysicalKey::Unidentified(NativeKeyCode::Unidentified);
        assert_eq!(apply_key(&t, unidentified, ElementState::Pressed), None);
        assert_eq!(apply_key(&t, PhysicalKey::Code(KeyCode::KeyQ), ElementState::Pressed), None);
        assert_eq!(t.advance_frame().pressed_keys().count(), 0);
    }

    #[test]
    fn test_auto_repeat_does_not_pulse_twice() {
        let t = tracker();
        let enter = PhysicalKey::Code(KeyCode::Enter);

        apply_key(&t, enter, ElementState::Pressed);
        assert!(t.advance_frame().is_just_pressed(LogicalKey::Confirm));
        for _ in 0..5 {
            apply_key(&t, enter, ElementState::Pressed);
            assert!(!t.advance_frame().is_just_pressed(LogicalKey::Confirm));
        }
    }

    #[test]
    fn test_focus_loss_releases_keys() {
        let t = tracker();
        apply_key(&t, PhysicalKey::Code(KeyCode::ArrowUp), ElementState::Pressed);
        t.advance_frame();

        apply_focus_change(&t, true);
        assert!(t.is_pressed(LogicalKey::Up));

        apply_focus_change(&t, false);
        assert!(!t.is_pressed(LogicalKey::Up));
        assert!(!t.is_just_pressed(LogicalKey::Up));
    }
}
