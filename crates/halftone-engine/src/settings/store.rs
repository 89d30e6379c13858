use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::HalftoneUniforms;

use super::DotSizePreset;

/// Effect settings as the user last left them.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredSettings", into = "StoredSettings")]
pub struct Settings {
    pub enabled: bool,
    pub dot_size_preset: DotSizePreset,
    /// Always within `[0, 1]`.
    pub intensity: f32,
}

impl Settings {
    /// Dot grid pitch in pixels.
    pub fn dot_size(&self) -> f32 {
        self.dot_size_preset.dot_size()
    }

    /// Builds the per-frame uniform block for a render target of `screen_size` pixels.
    pub fn uniforms(&self, screen_size: [f32; 2]) -> HalftoneUniforms {
        HalftoneUniforms::new(self.dot_size(), self.intensity, screen_size)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: false,
            dot_size_preset: DotSizePreset::Medium,
            intensity: 1.0,
        }
    }
}

/// On-disk shape. Lenient on read: missing keys take defaults, an unknown
/// preset number means Medium, intensity is clamped.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct StoredSettings {
    enabled: bool,
    dot_size_preset: i64,
    intensity: f32,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Settings::default().into()
    }
}

impl From<StoredSettings> for Settings {
    fn from(s: StoredSettings) -> Self {
        let dot_size_preset = u8::try_from(s.dot_size_preset)
            .ok()
            .and_then(DotSizePreset::from_raw)
            .unwrap_or_default();
        Self {
            enabled: s.enabled,
            dot_size_preset,
            intensity: clamp_intensity(s.intensity).unwrap_or(1.0),
        }
    }
}

impl From<Settings> for StoredSettings {
    fn from(s: Settings) -> Self {
        Self {
            enabled: s.enabled,
            dot_size_preset: i64::from(s.dot_size_preset.raw()),
            intensity: s.intensity,
        }
    }
}

fn clamp_intensity(v: f32) -> Option<f32> {
    if v.is_nan() { None } else { Some(v.clamp(0.0, 1.0)) }
}

/// Owns the live [`Settings`] and keeps the settings file in sync.
///
/// Setters return `true` when the value actually changed; only then is the
/// file rewritten. Write failures are logged and otherwise ignored so a
/// read-only config directory never interrupts rendering.
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    settings: Settings,
}

impl SettingsStore {
    /// Opens the store backed by `path`.
    ///
    /// A missing file yields defaults. An unreadable or corrupt file also
    /// yields defaults (with a warning); it is overwritten on the next change.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match Self::load(&path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("ignoring settings file: {e:#}");
                Settings::default()
            }
        };
        log::debug!("settings loaded from {}: {settings:?}", path.display());

        Self {
            path: Some(path),
            settings,
        }
    }

    /// Store without a backing file.
    pub fn in_memory(settings: Settings) -> Self {
        Self { path: None, settings }
    }

    /// Reads settings from `path`; a missing file is not an error.
    pub fn load(path: &Path) -> Result<Settings> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// `$XDG_CONFIG_HOME/halftone/settings.json`, else `~/.config/halftone/settings.json`.
    pub fn default_path() -> Option<PathBuf> {
        config_path_from(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.settings.enabled == enabled {
            return false;
        }
        self.settings.enabled = enabled;
        self.changed();
        true
    }

    /// Flips `enabled` and returns the new value.
    pub fn toggle_enabled(&mut self) -> bool {
        let enabled = !self.settings.enabled;
        self.set_enabled(enabled);
        enabled
    }

    pub fn set_dot_size_preset(&mut self, preset: DotSizePreset) -> bool {
        if self.settings.dot_size_preset == preset {
            return false;
        }
        self.settings.dot_size_preset = preset;
        self.changed();
        true
    }

    /// Sets intensity clamped to `[0, 1]`. NaN is ignored.
    pub fn set_intensity(&mut self, intensity: f32) -> bool {
        let Some(intensity) = clamp_intensity(intensity) else {
            return false;
        };
        if self.settings.intensity == intensity {
            return false;
        }
        self.settings.intensity = intensity;
        self.changed();
        true
    }

    /// Steps intensity by `delta`, rounded to hundredths so repeated steps
    /// land on exact slider positions.
    pub fn adjust_intensity(&mut self, delta: f32) -> bool {
        let target = ((self.settings.intensity + delta) * 100.0).round() / 100.0;
        self.set_intensity(target)
    }

    /// Writes the current settings to the backing file, creating parent
    /// directories as needed. No-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.settings).context("failed to encode settings")?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    fn changed(&mut self) {
        log::debug!("settings changed: {:?}", self.settings);
        if let Err(e) = self.save() {
            log::warn!("failed to save settings: {e:#}");
        }
    }
}

/// An empty `xdg_config_home` counts as unset.
fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = xdg_config_home
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("halftone").join("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, PathBuf, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = SettingsStore::open(&path);
        (dir, path, store)
    }

    // ── defaults / loading ────────────────────────────────────────────────

    #[test]
    fn missing_file_gives_defaults() {
        let (_dir, path, store) = temp_store();
        assert!(!path.exists());
        assert_eq!(*store.settings(), Settings::default());
        assert!(!store.settings().enabled);
        assert_eq!(store.settings().dot_size_preset, DotSizePreset::Medium);
        assert_eq!(store.settings().intensity, 1.0);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let s: Settings = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert!(s.enabled);
        assert_eq!(s.dot_size_preset, DotSizePreset::Medium);
        assert_eq!(s.intensity, 1.0);
    }

    #[test]
    fn unknown_preset_falls_back_to_medium() {
        let s: Settings = serde_json::from_str(r#"{"dot_size_preset": 7}"#).unwrap();
        assert_eq!(s.dot_size_preset, DotSizePreset::Medium);
        let s: Settings = serde_json::from_str(r#"{"dot_size_preset": -1}"#).unwrap();
        assert_eq!(s.dot_size_preset, DotSizePreset::Medium);
    }

    #[test]
    fn stored_intensity_is_clamped() {
        let s: Settings = serde_json::from_str(r#"{"intensity": 3.5}"#).unwrap();
        assert_eq!(s.intensity, 1.0);
        let s: Settings = serde_json::from_str(r#"{"intensity": -2}"#).unwrap();
        assert_eq!(s.intensity, 0.0);
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(SettingsStore::load(&path).is_err());
        let store = SettingsStore::open(&path);
        assert_eq!(*store.settings(), Settings::default());
    }

    // ── setters ───────────────────────────────────────────────────────────

    #[test]
    fn setters_report_changes_only() {
        let mut store = SettingsStore::in_memory(Settings::default());
        assert!(!store.set_enabled(false));
        assert!(store.set_enabled(true));
        assert!(!store.set_dot_size_preset(DotSizePreset::Medium));
        assert!(store.set_dot_size_preset(DotSizePreset::Fine));
        assert!(!store.set_intensity(1.0));
        assert!(store.set_intensity(0.25));
    }

    #[test]
    fn intensity_is_clamped_and_nan_ignored() {
        let mut store = SettingsStore::in_memory(Settings::default());
        assert!(store.set_intensity(-0.5));
        assert_eq!(store.settings().intensity, 0.0);
        assert!(store.set_intensity(7.0));
        assert_eq!(store.settings().intensity, 1.0);
        assert!(!store.set_intensity(f32::NAN));
        assert_eq!(store.settings().intensity, 1.0);
    }

    #[test]
    fn adjust_intensity_steps_exactly() {
        let mut store = SettingsStore::in_memory(Settings::default());
        for _ in 0..3 {
            store.adjust_intensity(-0.1);
        }
        assert_eq!(store.settings().intensity, 0.7);
        // Saturates at the top without reporting a change.
        store.set_intensity(1.0);
        assert!(!store.adjust_intensity(0.1));
    }

    #[test]
    fn toggle_returns_new_state() {
        let mut store = SettingsStore::in_memory(Settings::default());
        assert!(store.toggle_enabled());
        assert!(!store.toggle_enabled());
    }

    // ── persistence ───────────────────────────────────────────────────────

    #[test]
    fn changes_are_written_and_reloaded() {
        let (_dir, path, mut store) = temp_store();
        store.set_enabled(true);
        store.set_dot_size_preset(DotSizePreset::Coarse);
        store.set_intensity(0.5);
        assert!(path.exists());

        let reopened = SettingsStore::open(&path);
        assert_eq!(
            *reopened.settings(),
            Settings {
                enabled: true,
                dot_size_preset: DotSizePreset::Coarse,
                intensity: 0.5,
            }
        );
    }

    #[test]
    fn file_stores_preset_as_integer() {
        let (_dir, path, mut store) = temp_store();
        store.set_dot_size_preset(DotSizePreset::Fine);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["dot_size_preset"], 0);
        assert_eq!(value["enabled"], false);
    }

    #[test]
    fn unchanged_setter_does_not_touch_disk() {
        let (_dir, path, mut store) = temp_store();
        store.set_enabled(false);
        assert!(!path.exists());
    }

    // ── default path ──────────────────────────────────────────────────────

    #[test]
    fn xdg_config_home_wins() {
        let path = config_path_from(Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(path, Some(PathBuf::from("/xdg/halftone/settings.json")));
    }

    #[test]
    fn empty_xdg_falls_back_to_home_config() {
        let path = config_path_from(Some(OsString::new()), Some("/home/u".into()));
        assert_eq!(path, Some(PathBuf::from("/home/u/.config/halftone/settings.json")));

        let path = config_path_from(None, Some("/home/u".into()));
        assert_eq!(path, Some(PathBuf::from("/home/u/.config/halftone/settings.json")));
    }

    #[test]
    fn no_base_directory_gives_no_path() {
        assert_eq!(config_path_from(None, None), None);
        assert_eq!(config_path_from(Some(OsString::new()), None), None);
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn uniforms_follow_settings() {
        let s = Settings {
            enabled: true,
            dot_size_preset: DotSizePreset::Fine,
            intensity: 0.5,
        };
        assert_eq!(s.uniforms([800.0, 600.0]), HalftoneUniforms::new(4.0, 0.5, [800.0, 600.0]));
    }
}
