use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Current keyboard state for a single window.
///
/// Holds "is down" information and filters the event stream recorded into an
/// `InputFrame`: a press for a key that is already held is only kept when
/// the platform marks it as an auto-repeat.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state; stamped onto translated key events.
    pub modifiers: Modifiers,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and
    /// records it into `frame` unless it is a duplicate press.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                if !*f {
                    // Key-up events are lost while unfocused.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                repeat,
            } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        let inserted = self.keys_down.insert(*key);
                        if !inserted && !*repeat {
                            return;
                        }
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }
        }

        frame.push_event(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            modifiers: Modifiers::default(),
            repeat,
        }
    }

    fn pressed(frame: &InputFrame) -> Vec<Key> {
        frame.key_presses().map(|(k, _)| k).collect()
    }

    #[test]
    fn duplicate_press_is_dropped() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed, false));
        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed, false));
        assert_eq!(pressed(&frame), vec![Key::A]);
        assert!(state.keys_down.contains(&Key::A));

        state.apply_event(&mut frame, key(Key::A, KeyState::Released, false));
        assert!(!state.keys_down.contains(&Key::A));
        assert_eq!(frame.events.len(), 2);
    }

    #[test]
    fn repeats_count_as_presses() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Pressed, false));
        state.apply_event(&mut frame, key(Key::ArrowUp, KeyState::Pressed, true));
        assert_eq!(pressed(&frame), vec![Key::ArrowUp, Key::ArrowUp]);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::Digit1, KeyState::Pressed, false));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(state.keys_down.is_empty());

        // The next press after refocus is a fresh press, not a duplicate.
        state.apply_event(&mut frame, key(Key::Digit1, KeyState::Pressed, false));
        assert_eq!(pressed(&frame), vec![Key::Digit1, Key::Digit1]);
    }

    #[test]
    fn key_events_carry_modifiers() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let mods = Modifiers { shift: true, ..Default::default() };
        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::H, state: KeyState::Pressed, modifiers: mods, repeat: false },
        );
        assert_eq!(state.modifiers, mods);

        frame.clear();
        assert!(frame.events.is_empty());
    }
}
