use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Input events received since the previous frame.
///
/// `InputState` holds what is currently down; `InputFrame` holds what
/// happened this frame, already filtered by it.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Events in arrival order.
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Key presses (auto-repeats included) with the modifiers held at the
    /// time of each press, in arrival order.
    pub fn key_presses(&self) -> impl Iterator<Item = (Key, Modifiers)> + '_ {
        self.events.iter().filter_map(|ev| match ev {
            InputEvent::Key {
                key,
                state: KeyState::Pressed,
                modifiers,
                ..
            } => Some((*key, *modifiers)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;

    fn key(key: Key, state: KeyState, modifiers: Modifiers) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            modifiers,
            repeat: false,
        }
    }

    #[test]
    fn key_presses_keep_modifiers_of_each_press() {
        let ctrl = Modifiers { ctrl: true, ..Modifiers::default() };
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::H, KeyState::Pressed, ctrl));
        state.apply_event(&mut frame, InputEvent::ModifiersChanged(Modifiers::default()));
        state.apply_event(&mut frame, key(Key::H, KeyState::Released, Modifiers::default()));
        state.apply_event(&mut frame, key(Key::Q, KeyState::Pressed, Modifiers::default()));

        let presses: Vec<_> = frame.key_presses().collect();
        assert_eq!(presses, vec![(Key::H, ctrl), (Key::Q, Modifiers::default())]);
        assert_eq!(state.modifiers, Modifiers::default());

        frame.clear();
        assert_eq!(frame.key_presses().count(), 0);
    }
}
