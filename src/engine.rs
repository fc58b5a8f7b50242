// Copyright (c) 2026 rezky_nightky

use tracing::debug;

use crate::column::{column_count, ColumnState};
use crate::palette::{Tier, TierPalette};
use crate::random::RandomSource;
use crate::runtime::ResizePolicy;
use crate::surface::{Canvas, RainSurface, Viewport};

pub const DEFAULT_CELL_PX: u32 = 14;
pub const DEFAULT_RESET_THRESHOLD: f64 = 0.975;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineSettings {
    pub cell_width_px: u32,
    pub cell_height_px: u32,
    /// A column whose trail has left the screen resets once a draw exceeds this.
    pub reset_threshold: f64,
    /// Multiplies every glyph's opacity.
    pub layer_opacity: f64,
    pub resize_policy: ResizePolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cell_width_px: DEFAULT_CELL_PX,
            cell_height_px: DEFAULT_CELL_PX,
            reset_threshold: DEFAULT_RESET_THRESHOLD,
            layer_opacity: 1.0,
            resize_policy: ResizePolicy::Reinit,
        }
    }
}

pub struct RainEngine<C, R> {
    surface: RainSurface<C>,
    columns: Vec<ColumnState>,
    rng: R,
    glyphs: Vec<char>,
    palette: TierPalette,
    settings: EngineSettings,
    ticks: u64,
}

impl<C: Canvas, R: RandomSource> RainEngine<C, R> {
    pub fn new(
        surface: RainSurface<C>,
        settings: EngineSettings,
        mut glyphs: Vec<char>,
        palette: TierPalette,
        rng: R,
    ) -> Self {
        if glyphs.is_empty() {
            glyphs = vec!['0', '1'];
        }
        let mut engine = Self {
            surface,
            columns: Vec::new(),
            rng,
            glyphs,
            palette,
            settings,
            ticks: 0,
        };
        engine.reseed();
        engine
    }

    /// Rebuilds one column per glyph cell across the current width.
    pub fn reseed(&mut self) {
        let n = column_count(self.surface.width_px(), self.settings.cell_width_px);
        let h = self.surface.height_px();
        self.columns.clear();
        self.columns.reserve(n);
        for _ in 0..n {
            self.columns.push(ColumnState::seed(&mut self.rng, h));
        }
        debug!(columns = n, height_px = h, "seeded rain columns");
    }

    /// One frame: erase, draw every trail, then advance and maybe reset.
    pub fn tick(&mut self) {
        let Self {
            surface,
            columns,
            rng,
            glyphs,
            palette,
            settings,
            ticks,
        } = self;

        let height_px = surface.height_px();
        let height = height_px as f64;
        let cell_w = settings.cell_width_px as f64;
        let cell_h = settings.cell_height_px as f64;
        let canvas = surface.canvas_mut();

        canvas.fill_background(palette.background);

        for (i, col) in columns.iter_mut().enumerate() {
            let x = i as f64 * cell_w;
            for j in 0..col.trail_length() {
                let y = col.head_position() - j as f64 * cell_h;
                if y < 0.0 || y > height {
                    continue;
                }

                let glyph = glyphs[rng.index(glyphs.len())];
                let opacity = col.opacity_at(j);
                let tier = Tier::pick(j, rng.unit());
                let alpha = opacity * tier.alpha_scale() * settings.layer_opacity;
                canvas.fill_text(glyph, x, y, palette.color(tier).with_alpha(alpha));
            }

            col.advance();
            col.maybe_reset(
                rng,
                height_px,
                settings.cell_height_px,
                settings.reset_threshold,
            );
        }

        *ticks += 1;
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        self.surface.on_resize(viewport);
        if self.settings.resize_policy == ResizePolicy::Reinit {
            self.reseed();
        }
    }

    pub fn set_palette(&mut self, palette: TierPalette) {
        self.palette = palette;
    }

    pub fn columns(&self) -> &[ColumnState] {
        &self.columns
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[cfg(test)]
    pub fn surface(&self) -> &RainSurface<C> {
        &self.surface
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        self.surface.canvas_mut()
    }

    #[cfg(test)]
    pub(crate) fn columns_mut(&mut self) -> &mut Vec<ColumnState> {
        &mut self.columns
    }
}
