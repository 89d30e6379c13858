use std::time::Instant;

use halftone_engine::capture::{CapturedFrame, FrameSource};
use halftone_engine::core::{App, AppControl, FrameCtx};
use halftone_engine::input::Hotkey;
use halftone_engine::logging::is_diagnostic_frame;
use halftone_engine::render::HalftoneRenderer;
use halftone_engine::settings::SettingsStore;
use halftone_engine::time::{FramePacer, SafetyTimer};
use halftone_engine::types::HalftoneUniforms;
use halftone_engine::window::WindowMode;

use crate::controls::{apply_key, ControlAction};

const WINDOW_CLEAR: wgpu::Color = wgpu::Color::BLACK;
const OVERLAY_CLEAR: wgpu::Color = wgpu::Color::TRANSPARENT;

/// Drives the halftone pass for one window.
pub struct HalftoneApp {
    store: SettingsStore,
    hotkey: Hotkey,
    mode: WindowMode,

    source: Option<Box<dyn FrameSource>>,
    /// Whether the source has produced at least one frame.
    delivered: bool,
    /// Set when a window has nothing to show; ends the run.
    exit_error: Option<anyhow::Error>,
    pacer: FramePacer,
    safety: SafetyTimer,
    renderer: HalftoneRenderer,

    /// Enabled state seen on the previous frame.
    last_enabled: Option<bool>,
}

impl HalftoneApp {
    pub fn new(
        store: SettingsStore,
        hotkey: Hotkey,
        mode: WindowMode,
        source: Box<dyn FrameSource>,
        pacer: FramePacer,
        safety: SafetyTimer,
    ) -> Self {
        Self {
            store,
            hotkey,
            mode,
            source: Some(source),
            delivered: false,
            exit_error: None,
            pacer,
            safety,
            renderer: HalftoneRenderer::new(),
            last_enabled: None,
        }
    }

    /// Arms the safety timer on every off->on transition and disarms on
    /// on->off, whatever caused it.
    fn track_enabled(&mut self, now: Instant) {
        let enabled = self.store.settings().enabled;
        if self.last_enabled == Some(enabled) {
            return;
        }
        self.last_enabled = Some(enabled);

        if enabled {
            self.safety.arm(now);
            if let Some(t) = self.safety.timeout() {
                log::info!("effect will switch off in {}s", t.as_secs());
            }
        } else {
            self.safety.disarm();
        }
    }

    /// Polls the source when the pacer allows. A failing source is dropped:
    /// the overlay switches the effect off, while a window that never got a
    /// frame records an exit error instead of staying black.
    fn poll_source(&mut self, now: Instant) -> Option<CapturedFrame> {
        let source = self.source.as_mut()?;
        if !self.pacer.ready(now) {
            return None;
        }

        match source.poll_frame() {
            Ok(Some(frame)) => {
                self.delivered = true;
                Some(frame)
            }
            Ok(None) => None,
            Err(e) => {
                let name = source.name().to_string();
                self.source = None;
                if !self.delivered && !self.mode.is_overlay() {
                    self.exit_error = Some(e.context(format!("frame source {name} produced no frame")));
                } else {
                    log::error!("frame source {name} stopped: {e:#}");
                    self.store.set_enabled(false);
                }
                None
            }
        }
    }

    /// Uniforms for this frame; a disabled effect in a window shows the
    /// untouched source.
    fn frame_uniforms(&self, width: u32, height: u32) -> HalftoneUniforms {
        let settings = self.store.settings();
        let mut uniforms = settings.uniforms([width as f32, height as f32]);
        if !settings.enabled {
            uniforms.intensity = 0.0;
        }
        uniforms
    }

    fn hidden(&self) -> bool {
        self.mode.is_overlay() && !self.store.settings().enabled
    }
}

impl App for HalftoneApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let now = ctx.time.now;

        for (key, modifiers) in ctx.input_frame.key_presses() {
            if apply_key(&mut self.store, &self.hotkey, key, modifiers) == ControlAction::Quit {
                log::info!("quit requested");
                return AppControl::Exit;
            }
        }

        if self.safety.expired(now) {
            log::info!("safety timeout reached; disabling effect");
            self.store.set_enabled(false);
        }

        if let Some(frame) = self.poll_source(now) {
            self.renderer.update_screen_texture(&ctx.render_ctx(), &frame);
        }
        if self.exit_error.is_some() {
            return AppControl::Exit;
        }
        self.track_enabled(now);

        let size = ctx.gpu.size();
        let uniforms = self.frame_uniforms(size.width, size.height);
        self.renderer.update_uniforms(uniforms);

        if is_diagnostic_frame(ctx.time.frame_index) {
            log::debug!(
                "frame {} dt={:.1}ms enabled={} texture={:?} uniforms={:?}",
                ctx.time.frame_index,
                ctx.time.dt * 1000.0,
                self.store.settings().enabled,
                self.renderer.texture_size(),
                uniforms,
            );
        }

        let hidden = self.hidden();
        let clear = if self.mode.is_overlay() { OVERLAY_CLEAR } else { WINDOW_CLEAR };
        let renderer = &mut self.renderer;

        ctx.render(|rctx, target| {
            if hidden {
                HalftoneRenderer::clear(target, clear);
            } else {
                renderer.render(rctx, target, clear);
            }
        })
    }

    fn exit_error(&mut self) -> Option<anyhow::Error> {
        self.exit_error.take()
    }

    fn on_exit(&mut self) {
        if let Err(e) = self.store.save() {
            log::warn!("failed to save settings on exit: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use halftone_engine::capture::PatternSource;
    use halftone_engine::settings::{DotSizePreset, Settings};

    use super::*;

    /// Delivers `frames` frames, then fails.
    struct FailingSource {
        frames: u32,
    }

    impl FrameSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        fn poll_frame(&mut self) -> Result<Option<CapturedFrame>> {
            if self.frames == 0 {
                anyhow::bail!("no such file");
            }
            self.frames -= 1;
            CapturedFrame::new(1, 1, vec![0; 4]).map(Some)
        }
    }

    fn app_with(mode: WindowMode, enabled: bool, source: Box<dyn FrameSource>) -> HalftoneApp {
        let settings = Settings {
            enabled,
            dot_size_preset: DotSizePreset::Fine,
            intensity: 0.5,
        };
        HalftoneApp::new(
            SettingsStore::in_memory(settings),
            Hotkey::platform_default(),
            mode,
            source,
            FramePacer::new(30),
            SafetyTimer::new(Some(Duration::from_secs(30))),
        )
    }

    fn app(mode: WindowMode, enabled: bool) -> HalftoneApp {
        app_with(mode, enabled, Box::new(PatternSource::new(8, 8)))
    }

    #[test]
    fn window_without_any_frame_exits_with_error() {
        let mut a = app_with(WindowMode::Windowed, true, Box::new(FailingSource { frames: 0 }));
        assert!(a.poll_source(Instant::now()).is_none());

        let err = a.exit_error().expect("windowed source failure should end the run");
        let msg = format!("{err:#}");
        assert!(msg.contains("failing"));
        assert!(msg.contains("no such file"));
        assert!(a.source.is_none());
        assert!(a.exit_error().is_none());
    }

    #[test]
    fn overlay_source_failure_disables_effect() {
        let mut a = app_with(WindowMode::Overlay, true, Box::new(FailingSource { frames: 0 }));
        assert!(a.poll_source(Instant::now()).is_none());
        assert!(a.exit_error().is_none());
        assert!(!a.store.settings().enabled);
    }

    #[test]
    fn window_keeps_last_frame_when_source_fails_later() {
        let t0 = Instant::now();
        let mut a = app_with(WindowMode::Windowed, true, Box::new(FailingSource { frames: 1 }));
        assert!(a.poll_source(t0).is_some());
        assert!(a.poll_source(t0 + Duration::from_secs(1)).is_none());

        assert!(a.exit_error().is_none());
        assert!(a.source.is_none());
        assert!(!a.store.settings().enabled);
    }

    #[test]
    fn disabled_window_shows_source_untouched() {
        let a = app(WindowMode::Windowed, false);
        assert_eq!(a.frame_uniforms(640, 480), HalftoneUniforms::new(4.0, 0.0, [640.0, 480.0]));
        assert!(!a.hidden());
    }

    #[test]
    fn enabled_uses_settings() {
        let a = app(WindowMode::Overlay, true);
        assert_eq!(a.frame_uniforms(640, 480), HalftoneUniforms::new(4.0, 0.5, [640.0, 480.0]));
        assert!(!a.hidden());
    }

    #[test]
    fn disabled_overlay_is_hidden() {
        assert!(app(WindowMode::Overlay, false).hidden());
    }

    #[test]
    fn enabling_arms_and_disabling_disarms_safety() {
        let t0 = Instant::now();
        let mut a = app(WindowMode::Overlay, false);
        a.track_enabled(t0);
        assert!(!a.safety.is_armed());

        a.store.set_enabled(true);
        a.track_enabled(t0);
        assert!(a.safety.is_armed());
        assert!(a.safety.expired(t0 + Duration::from_secs(30)));

        a.store.set_enabled(false);
        a.track_enabled(t0);
        a.store.set_enabled(true);
        a.track_enabled(t0);
        assert!(a.safety.is_armed());
        a.store.set_enabled(false);
        a.track_enabled(t0);
        assert!(!a.safety.is_armed());
    }

    #[test]
    fn enabled_at_startup_arms_on_first_frame() {
        let t0 = Instant::now();
        let mut a = app(WindowMode::Overlay, true);
        a.track_enabled(t0);
        assert!(a.safety.is_armed());
    }
}
