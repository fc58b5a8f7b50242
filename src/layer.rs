// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::engine::{EngineSettings, RainEngine};
use crate::palette::TierPalette;
use crate::random::RandomSource;
use crate::surface::{Canvas, RainSurface, Viewport};
use crate::ticker::Ticker;

/// The decorative rain layer as the host sees it: mount it, pump it from the
/// event loop, forward resizes, tear it down.
///
/// A layer whose surface could not be acquired stays mounted but inert.
pub struct RainLayer<C, R> {
    engine: Option<RainEngine<C, R>>,
    ticker: Ticker,
    resize_attached: bool,
}

impl<C: Canvas, R: RandomSource> RainLayer<C, R> {
    #[allow(clippy::too_many_arguments)]
    pub fn mount(
        canvas: Option<C>,
        viewport: Viewport,
        settings: EngineSettings,
        glyphs: Vec<char>,
        palette: TierPalette,
        rng: R,
        interval: Duration,
        now: Instant,
    ) -> Self {
        let mut ticker = Ticker::new(interval);
        let engine = match RainSurface::initialize(canvas, viewport) {
            Ok(surface) => {
                let engine = RainEngine::new(surface, settings, glyphs, palette, rng);
                ticker.start(now);
                info!(
                    width_px = viewport.width_px,
                    height_px = viewport.height_px,
                    columns = engine.columns().len(),
                    interval_ms = interval.as_millis() as u64,
                    "rain layer mounted"
                );
                Some(engine)
            }
            Err(e) => {
                warn!(error = %e, "rain layer disabled");
                None
            }
        };
        Self {
            engine,
            ticker,
            resize_attached: true,
        }
    }

    /// Runs one tick if one is due. Returns whether the surface changed.
    pub fn pump(&mut self, now: Instant) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        if !self.ticker.poll(now) {
            return false;
        }
        engine.tick();
        true
    }

    pub fn handle_resize(&mut self, viewport: Viewport) {
        if !self.resize_attached {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.on_resize(viewport);
            debug!(
                width_px = viewport.width_px,
                height_px = viewport.height_px,
                columns = engine.columns().len(),
                "rain layer resized"
            );
        }
    }

    pub fn pause(&mut self) {
        self.ticker.stop();
        debug!("rain paused");
    }

    pub fn resume(&mut self, now: Instant) {
        if self.engine.is_some() {
            self.ticker.start(now);
            debug!(interval_ms = self.ticker.interval().as_millis() as u64, "rain resumed");
        }
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        if self.ticker.is_running() {
            self.pause();
        } else {
            self.resume(now);
        }
    }

    pub fn reseed(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.reseed();
        }
    }

    pub fn set_palette(&mut self, palette: TierPalette) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_palette(palette);
        }
    }

    /// Stops the ticker, detaches the resize listener and releases the surface.
    pub fn teardown(&mut self) {
        self.ticker.stop();
        self.resize_attached = false;
        if let Some(engine) = self.engine.take() {
            info!(ticks = engine.ticks(), "rain layer torn down");
        }
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_some() && self.ticker.is_running()
    }

    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.engine.as_ref()?;
        self.ticker.time_until_due(now)
    }

    #[cfg(test)]
    pub fn engine(&self) -> Option<&RainEngine<C, R>> {
        self.engine.as_ref()
    }

    pub fn canvas_mut(&mut self) -> Option<&mut C> {
        self.engine.as_mut().map(|e| e.canvas_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SystemRandom;
    use crate::runtime::ColorScheme;
    use crate::surface::testing::RecordingCanvas;

    const MS: Duration = Duration::from_millis(1);

    fn mount(
        canvas: Option<RecordingCanvas>,
        now: Instant,
    ) -> RainLayer<RecordingCanvas, SystemRandom> {
        RainLayer::mount(
            canvas,
            Viewport::new(140, 400),
            EngineSettings::default(),
            vec!['x'],
            TierPalette::for_scheme(ColorScheme::Ice),
            SystemRandom::seeded(11),
            MS * 50,
            now,
        )
    }

    #[test]
    fn ticks_on_the_interval() {
        let t0 = Instant::now();
        let mut layer = mount(Some(RecordingCanvas::default()), t0);
        assert!(layer.pump(t0));
        assert!(!layer.pump(t0 + MS * 20));
        assert!(layer.pump(t0 + MS * 50));
        assert_eq!(layer.engine().map(|e| e.ticks()), Some(2));
    }

    #[test]
    fn missing_surface_is_silent_and_inert() {
        let t0 = Instant::now();
        let mut layer = mount(None, t0);
        assert!(!layer.is_active());
        assert!(!layer.is_running());
        assert!(!layer.pump(t0 + MS * 500));
        layer.handle_resize(Viewport::new(10, 10));
        layer.resume(t0);
        assert!(!layer.is_running());
        assert_eq!(layer.time_until_tick(t0), None);
    }

    #[test]
    fn no_tick_after_teardown() {
        let t0 = Instant::now();
        let mut layer = mount(Some(RecordingCanvas::default()), t0);
        assert!(layer.pump(t0));
        layer.teardown();
        for k in 1..20 {
            assert!(!layer.pump(t0 + MS * 50 * k));
        }
        layer.resume(t0);
        assert!(!layer.pump(t0 + MS * 2_000));
        assert!(layer.canvas_mut().is_none());
    }

    #[test]
    fn resize_listener_detached_after_teardown() {
        let t0 = Instant::now();
        let mut layer = mount(Some(RecordingCanvas::default()), t0);
        layer.handle_resize(Viewport::new(280, 400));
        assert_eq!(layer.engine().map(|e| e.columns().len()), Some(20));
        layer.teardown();
        layer.handle_resize(Viewport::new(14, 400));
        assert!(layer.engine().is_none());
    }

    #[test]
    fn pause_stops_surface_mutation_until_resumed() {
        let t0 = Instant::now();
        let mut layer = mount(Some(RecordingCanvas::default()), t0);
        assert!(layer.pump(t0));
        layer.toggle_pause(t0);
        let ops = layer.canvas_mut().map(|c| c.ops.len());
        assert!(!layer.pump(t0 + MS * 500));
        assert_eq!(layer.canvas_mut().map(|c| c.ops.len()), ops);
        layer.toggle_pause(t0 + MS * 500);
        assert!(layer.pump(t0 + MS * 500));
    }
}
