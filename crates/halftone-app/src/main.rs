mod cli;
mod controls;
mod overlay;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;

use halftone_engine::capture::{FrameSource, ImageFileSource, PatternSource};
use halftone_engine::device::GpuInit;
use halftone_engine::logging::{init_logging, LoggingConfig};
use halftone_engine::settings::{Settings, SettingsStore};
use halftone_engine::time::{FramePacer, SafetyTimer};
use halftone_engine::window::{Runtime, RuntimeConfig, WindowMode};

use cli::Cli;
use overlay::HalftoneApp;

const PATTERN_SIZE: (u32, u32) = (1280, 720);

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let mut store = open_store(&cli);
    apply_overrides(&cli, &mut store);

    let source: Box<dyn FrameSource> = match &cli.image {
        Some(path) => Box::new(ImageFileSource::new(path)),
        None => Box::new(PatternSource::new(PATTERN_SIZE.0, PATTERN_SIZE.1)),
    };

    let mode = if cli.overlay { WindowMode::Overlay } else { WindowMode::Windowed };
    let hotkey = cli.hotkey();
    log::info!(
        "{mode:?} mode, source {}, toggle with {hotkey}, {} fps",
        source.name(),
        cli.fps
    );

    let gpu_init = match mode {
        WindowMode::Overlay => GpuInit::overlay(),
        WindowMode::Windowed => GpuInit::default(),
    };

    let app = HalftoneApp::new(
        store,
        hotkey,
        mode,
        source,
        FramePacer::new(cli.fps),
        SafetyTimer::new(cli.safety_timeout()),
    );

    Runtime::run(
        RuntimeConfig {
            title: "Halftone".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            mode,
        },
        gpu_init,
        app,
    )
    .context("halftone runtime failed")
}

fn open_store(cli: &Cli) -> SettingsStore {
    match cli.config.clone().or_else(SettingsStore::default_path) {
        Some(path) => SettingsStore::open(path),
        None => {
            log::warn!("no settings location (HOME unset); settings will not persist");
            SettingsStore::in_memory(Settings::default())
        }
    }
}

/// Command-line values win over the stored settings and are persisted.
fn apply_overrides(cli: &Cli, store: &mut SettingsStore) {
    if let Some(preset) = cli.dot_size {
        store.set_dot_size_preset(preset);
    }
    if let Some(intensity) = cli.intensity {
        store.set_intensity(intensity);
    }
    if cli.enable {
        store.set_enabled(true);
    }
}

#[cfg(test)]
mod tests {
    use halftone_engine::settings::DotSizePreset;

    use super::*;

    #[test]
    fn overrides_replace_stored_values() {
        let cli = Cli::try_parse_from(["halftone", "--dot-size", "fine", "--intensity", "0.3", "--enable"])
            .unwrap();
        let mut store = SettingsStore::in_memory(Settings::default());
        apply_overrides(&cli, &mut store);

        let s = store.settings();
        assert!(s.enabled);
        assert_eq!(s.dot_size_preset, DotSizePreset::Fine);
        assert_eq!(s.intensity, 0.3);
    }

    #[test]
    fn absent_flags_keep_stored_values() {
        let cli = Cli::try_parse_from(["halftone"]).unwrap();
        let stored = Settings {
            enabled: true,
            dot_size_preset: DotSizePreset::Coarse,
            intensity: 0.6,
        };
        let mut store = SettingsStore::in_memory(stored);
        apply_overrides(&cli, &mut store);
        assert_eq!(*store.settings(), stored);
    }

    #[test]
    fn explicit_config_path_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let cli = Cli::try_parse_from(["halftone", "--config", path.to_str().unwrap()]).unwrap();
        let store = open_store(&cli);
        assert_eq!(store.path(), Some(path.as_path()));
    }
}
