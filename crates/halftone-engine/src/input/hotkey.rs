use std::fmt;
use std::str::FromStr;

use super::types::{Key, Modifiers};

/// A key plus an exact modifier combination, e.g. `Cmd+Shift+H`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl Hotkey {
    pub const fn new(modifiers: Modifiers, key: Key) -> Self {
        Self { modifiers, key }
    }

    /// Effect toggle: Cmd+Shift+H on macOS, Ctrl+Shift+H elsewhere.
    pub fn platform_default() -> Self {
        let modifiers = Modifiers {
            shift: true,
            ctrl: !cfg!(target_os = "macos"),
            meta: cfg!(target_os = "macos"),
            alt: false,
        };
        Self::new(modifiers, Key::H)
    }

    /// True if `key` was pressed with exactly these modifiers held.
    pub fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        self.key == key && self.modifiers == modifiers
    }
}

impl Default for Hotkey {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        let meta = if cfg!(target_os = "macos") { "Cmd" } else { "Super" };
        for (held, name) in [(m.meta, meta), (m.ctrl, "Ctrl"), (m.alt, "Alt"), (m.shift, "Shift")] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

/// Error from parsing a hotkey string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyParseError {
    pub message: String,
}

impl HotkeyParseError {
    fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}

impl fmt::Display for HotkeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hotkey: {}", self.message)
    }
}

impl std::error::Error for HotkeyParseError {}

impl FromStr for Hotkey {
    type Err = HotkeyParseError;

    /// Parses `+`-separated parts: any number of modifiers (`cmd`, `super`,
    /// `meta`, `win`, `ctrl`, `control`, `alt`, `option`, `shift`) and exactly
    /// one key. Case-insensitive; whitespace around parts is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Modifiers::default();
        let mut key = None;

        for part in s.split('+') {
            let part = part.trim();
            if part.is_empty() {
                return Err(HotkeyParseError::new(format!("empty component in {s:?}")));
            }

            let slot = match part.to_ascii_lowercase().as_str() {
                "cmd" | "command" | "super" | "meta" | "win" => Some(&mut modifiers.meta),
                "ctrl" | "control" => Some(&mut modifiers.ctrl),
                "alt" | "option" | "opt" => Some(&mut modifiers.alt),
                "shift" => Some(&mut modifiers.shift),
                _ => None,
            };

            if let Some(flag) = slot {
                if *flag {
                    return Err(HotkeyParseError::new(format!("modifier {part:?} repeated")));
                }
                *flag = true;
                continue;
            }

            let parsed = Key::from_name(part)
                .ok_or_else(|| HotkeyParseError::new(format!("unknown key {part:?}")))?;
            if key.replace(parsed).is_some() {
                return Err(HotkeyParseError::new(format!("more than one key in {s:?}")));
            }
        }

        let key = key.ok_or_else(|| HotkeyParseError::new(format!("no key in {s:?}")))?;
        Ok(Self { modifiers, key })
    }
}
