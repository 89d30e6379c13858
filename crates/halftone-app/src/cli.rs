use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use halftone_engine::input::Hotkey;
use halftone_engine::settings::DotSizePreset;

/// Overlay used when `--safety-timeout` is not given.
pub const DEFAULT_OVERLAY_TIMEOUT: Duration = Duration::from_secs(30);

/// Halftone screen effect.
///
/// Shows a source frame (an image file or a test pattern) through the
/// halftone shader, either in a normal window or as a click-through
/// fullscreen overlay.
#[derive(Debug, Parser)]
#[command(name = "halftone", version, about)]
pub struct Cli {
    /// Image file to process; reloaded when it changes on disk.
    /// Without it a test pattern is shown.
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Run as a transparent, always-on-top, click-through overlay.
    #[arg(long)]
    pub overlay: bool,

    /// Settings file [default: $XDG_CONFIG_HOME/halftone/settings.json].
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dot size preset (fine, medium, coarse).
    #[arg(long, value_name = "PRESET")]
    pub dot_size: Option<DotSizePreset>,

    /// Effect strength, 0 to 1.
    #[arg(long, value_name = "0..1", value_parser = parse_intensity)]
    pub intensity: Option<f32>,

    /// Start with the effect enabled.
    #[arg(long)]
    pub enable: bool,

    /// Toggle hotkey, e.g. "Ctrl+Shift+H".
    #[arg(long, value_name = "KEYS")]
    pub hotkey: Option<Hotkey>,

    /// Source polling rate in frames per second.
    #[arg(long, default_value_t = 30, value_name = "N")]
    pub fps: u32,

    /// Seconds after which an enabled overlay switches itself off (0 disables).
    /// Defaults to 30 in overlay mode.
    #[arg(long, value_name = "SECS")]
    pub safety_timeout: Option<u64>,

    /// Log filter in env_logger syntax, e.g. "debug" or "halftone_engine=trace".
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

impl Cli {
    /// Effective auto-disable timeout. Windowed mode has none unless asked.
    pub fn safety_timeout(&self) -> Option<Duration> {
        match self.safety_timeout {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None if self.overlay => Some(DEFAULT_OVERLAY_TIMEOUT),
            None => None,
        }
    }

    pub fn hotkey(&self) -> Hotkey {
        self.hotkey.unwrap_or_default()
    }
}

fn parse_intensity(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=1.0).contains(&v) {
        return Err(format!("{v} is outside 0..1"));
    }
    Ok(v)
}
