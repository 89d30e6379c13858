use std::fmt;

/// Keyboard key identifier.
///
/// Covers the keys the controls and hotkey strings can name. Everything else
/// maps to `Key::Unknown(u32)` with the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers as keys
    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

impl Key {
    const LETTERS: [Key; 26] = [
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
    ];

    const DIGITS: [Key; 10] = [
        Key::Digit0, Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4,
        Key::Digit5, Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9,
    ];

    const FUNCTION: [Key; 12] = [
        Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6,
        Key::F7, Key::F8, Key::F9, Key::F10, Key::F11, Key::F12,
    ];

    /// Looks up a key by the name used in hotkey strings ("H", "5", "F3",
    /// "Space", "Esc", ...). Case-insensitive.
    pub fn from_name(name: &str) -> Option<Key> {
        let upper = name.trim().to_ascii_uppercase();
        let bytes = upper.as_bytes();

        if bytes.len() == 1 {
            let c = bytes[0];
            return match c {
                b'A'..=b'Z' => Some(Self::LETTERS[(c - b'A') as usize]),
                b'0'..=b'9' => Some(Self::DIGITS[(c - b'0') as usize]),
                _ => None,
            };
        }

        if let Some(n) = upper.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
            return (1..=12).contains(&n).then(|| Self::FUNCTION[n - 1]);
        }

        match upper.as_str() {
            "ESC" | "ESCAPE" => Some(Key::Escape),
            "ENTER" | "RETURN" => Some(Key::Enter),
            "TAB" => Some(Key::Tab),
            "BACKSPACE" => Some(Key::Backspace),
            "SPACE" => Some(Key::Space),
            "UP" | "ARROWUP" => Some(Key::ArrowUp),
            "DOWN" | "ARROWDOWN" => Some(Key::ArrowDown),
            "LEFT" | "ARROWLEFT" => Some(Key::ArrowLeft),
            "RIGHT" | "ARROWRIGHT" => Some(Key::ArrowRight),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Modifier keys state.
///
/// Stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    /// Window focus change.
    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(i) = Self::LETTERS.iter().position(|k| k == self) {
            return write!(f, "{}", (b'A' + i as u8) as char);
        }
        if let Some(i) = Self::DIGITS.iter().position(|k| k == self) {
            return write!(f, "{i}");
        }
        match self {
            Key::Escape => f.write_str("Esc"),
            Key::Unknown(code) => write!(f, "Unknown({code})"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(Key::from_name("h"), Some(Key::H));
        assert_eq!(Key::from_name("Z"), Some(Key::Z));
        assert_eq!(Key::from_name("7"), Some(Key::Digit7));
        assert_eq!(Key::from_name("f12"), Some(Key::F12));
        assert_eq!(Key::from_name("esc"), Some(Key::Escape));
        assert_eq!(Key::from_name(" Space "), Some(Key::Space));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(Key::from_name(""), None);
        assert_eq!(Key::from_name("F13"), None);
        assert_eq!(Key::from_name("F0"), None);
        assert_eq!(Key::from_name("?"), None);
        assert_eq!(Key::from_name("Hyper"), None);
    }

    #[test]
    fn display_round_trips_through_from_name() {
        for key in [Key::H, Key::Digit3, Key::F5, Key::Escape, Key::Space, Key::Enter] {
            assert_eq!(Key::from_name(&key.to_string()), Some(key), "{key:?}");
        }
    }
}
