//! Persisted user settings for the halftone effect.
//!
//! `Settings` is the plain value; `SettingsStore` owns it, clamps inputs and
//! writes it back to a JSON file whenever a setter changes something.

mod preset;
mod store;

pub use preset::{DotSizePreset, ParsePresetError};
pub use store::{Settings, SettingsStore};
