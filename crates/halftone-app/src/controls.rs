//! Keyboard controls for the effect window.
//!
//! | Key                 | Action                         |
//! |---------------------|--------------------------------|
//! | toggle hotkey       | enable / disable the effect    |
//! | `1` / `2` / `3`     | Fine / Medium / Coarse dots    |
//! | `Up` / `Down`       | intensity +/- 0.1              |
//! | `Esc` / `Q`         | quit                           |

use halftone_engine::input::{Hotkey, Key, Modifiers};
use halftone_engine::settings::{DotSizePreset, SettingsStore};

pub const INTENSITY_STEP: f32 = 0.1;

/// Outcome of a key press.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ControlAction {
    None,
    Changed,
    Quit,
}

/// Applies one key press to `store`.
///
/// The hotkey is checked first and needs its exact modifiers. The plain
/// bindings only fire without Ctrl/Alt/Cmd held so they never shadow a
/// hotkey chord; Shift is ignored.
pub fn apply_key(
    store: &mut SettingsStore,
    hotkey: &Hotkey,
    key: Key,
    modifiers: Modifiers,
) -> ControlAction {
    if hotkey.matches(key, modifiers) {
        let enabled = store.toggle_enabled();
        log::info!("effect {}", if enabled { "enabled" } else { "disabled" });
        return ControlAction::Changed;
    }

    if key == Key::Escape {
        return ControlAction::Quit;
    }

    if modifiers.ctrl || modifiers.alt || modifiers.meta {
        return ControlAction::None;
    }

    let changed = match key {
        Key::Q => return ControlAction::Quit,
        Key::Digit1 => store.set_dot_size_preset(DotSizePreset::Fine),
        Key::Digit2 => store.set_dot_size_preset(DotSizePreset::Medium),
        Key::Digit3 => store.set_dot_size_preset(DotSizePreset::Coarse),
        Key::ArrowUp => store.adjust_intensity(INTENSITY_STEP),
        Key::ArrowDown => store.adjust_intensity(-INTENSITY_STEP),
        _ => return ControlAction::None,
    };

    if changed {
        let s = store.settings();
        log::info!("dot size {}, intensity {:.2}", s.dot_size_preset, s.intensity);
        ControlAction::Changed
    } else {
        ControlAction::None
    }
}
