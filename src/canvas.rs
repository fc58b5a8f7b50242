// Copyright (c) 2026 rezky_nightky

//! Pixel-space [`Canvas`] backed by a terminal cell [`Frame`].
//!
//! One glyph cell of `cell_width_px` x `cell_height_px` pixels maps onto
//! `span` terminal columns by one row. Opacity is composited against the
//! last background fill, since a terminal cell has no alpha.

use crate::cell::Cell;
use crate::frame::Frame;
use crate::palette::{terminal_color, Rgb, Rgba};
use crate::runtime::ColorMode;
use crate::surface::{Canvas, Viewport};

const MIN_VISIBLE_ALPHA: f64 = 1.0 / 255.0;

pub struct TerminalCanvas {
    frame: Frame,
    color_mode: ColorMode,
    cell_width_px: u32,
    cell_height_px: u32,
    span: u16,
    default_background: bool,
    background: Rgb,
}

impl TerminalCanvas {
    pub fn new(
        color_mode: ColorMode,
        cell_width_px: u32,
        cell_height_px: u32,
        span: u16,
        default_background: bool,
    ) -> Self {
        Self {
            frame: Frame::new(0, 0, None),
            color_mode,
            cell_width_px: cell_width_px.max(1),
            cell_height_px: cell_height_px.max(1),
            span: span.max(1),
            default_background,
            background: Rgb::BLACK,
        }
    }

    /// The pixel viewport a terminal of `cols` x `rows` represents.
    pub fn viewport_for(&self, cols: u16, rows: u16) -> Viewport {
        Viewport::new(
            (cols / self.span) as u32 * self.cell_width_px,
            rows as u32 * self.cell_height_px,
        )
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn bg_color(&self) -> Option<crossterm::style::Color> {
        if self.default_background {
            None
        } else {
            terminal_color(self.color_mode, self.background)
        }
    }

    /// Terminal cell holding a glyph whose baseline sits at `(x, y)`.
    fn cell_for(&self, x_px: f64, y_px: f64) -> Option<(u16, u16)> {
        if !(x_px >= 0.0 && y_px > 0.0) {
            return None;
        }
        let glyph_col = (x_px / self.cell_width_px as f64).floor();
        let row = (y_px / self.cell_height_px as f64).ceil() - 1.0;
        let col = glyph_col * self.span as f64;
        if col >= self.frame.width as f64 || row >= self.frame.height as f64 {
            return None;
        }
        Some((col as u16, row as u16))
    }
}

impl Canvas for TerminalCanvas {
    fn resize(&mut self, width_px: u32, height_px: u32) {
        let cols = (width_px / self.cell_width_px).saturating_mul(self.span as u32);
        let rows = height_px / self.cell_height_px;
        self.frame.resize(
            cols.min(u16::MAX as u32) as u16,
            rows.min(u16::MAX as u32) as u16,
        );
    }

    fn fill_background(&mut self, color: Rgb) {
        self.background = color;
        let bg = self.bg_color();
        self.frame.fill(bg);
    }

    fn fill_text(&mut self, glyph: char, x_px: f64, y_px: f64, color: Rgba) {
        if color.a < MIN_VISIBLE_ALPHA {
            return;
        }
        let Some((col, row)) = self.cell_for(x_px, y_px) else {
            return;
        };
        let rgb = color.rgb.over(self.background, color.a);
        let fg = terminal_color(self.color_mode, rgb);
        let bg = self.bg_color();
        self.frame.set(col, row, Cell::glyph(glyph, fg, bg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Color;

    fn canvas(span: u16) -> TerminalCanvas {
        let mut c = TerminalCanvas::new(ColorMode::TrueColor, 14, 14, span, false);
        let vp = c.viewport_for(10, 5);
        c.resize(vp.width_px, vp.height_px);
        c
    }

    #[test]
    fn viewport_matches_terminal_grid() {
        let c = canvas(1);
        assert_eq!(c.viewport_for(10, 5), Viewport::new(140, 70));
        assert_eq!((c.frame().width, c.frame().height), (10, 5));

        let wide = canvas(2);
        assert_eq!(wide.viewport_for(11, 5), Viewport::new(70, 70));
        assert_eq!((wide.frame().width, wide.frame().height), (10, 5));
    }

    #[test]
    fn baseline_maps_to_the_row_above_it() {
        let mut c = canvas(1);
        c.fill_background(Rgb::BLACK);
        let white = Rgb::new(255, 255, 255).with_alpha(1.0);
        c.fill_text('a', 28.0, 14.0, white);
        c.fill_text('b', 0.0, 15.0, white);
        c.fill_text('c', 0.0, 70.0, white);
        assert_eq!(c.frame().get(2, 0).unwrap().ch, 'a');
        assert_eq!(c.frame().get(0, 1).unwrap().ch, 'b');
        assert_eq!(c.frame().get(0, 4).unwrap().ch, 'c');
    }

    #[test]
    fn glyphs_at_or_beyond_edges_are_clipped() {
        let mut c = canvas(1);
        c.fill_background(Rgb::BLACK);
        let white = Rgb::new(255, 255, 255).with_alpha(1.0);
        c.fill_text('x', 0.0, 0.0, white);
        c.fill_text('x', 140.0, 14.0, white);
        c.fill_text('x', 0.0, 71.0, white);
        let f = c.frame();
        assert!((0..f.cell_count()).all(|i| f.cell_at_index(i).ch == ' '));
    }

    #[test]
    fn opacity_is_composited_over_background() {
        let mut c = canvas(1);
        c.fill_background(Rgb::BLACK);
        c.fill_text('a', 0.0, 14.0, Rgb::new(0, 200, 100).with_alpha(0.5));
        let cell = c.frame().get(0, 0).unwrap();
        assert_eq!(cell.fg, Some(Color::Rgb { r: 0, g: 100, b: 50 }));
        assert_eq!(cell.bg, Some(Color::Rgb { r: 0, g: 0, b: 0 }));
    }

    #[test]
    fn wide_glyphs_land_on_even_columns() {
        let mut c = canvas(2);
        c.fill_background(Rgb::BLACK);
        c.fill_text('あ', 14.0, 14.0, Rgb::new(0, 255, 255).with_alpha(1.0));
        assert_eq!(c.frame().get(2, 0).unwrap().ch, 'あ');
        assert_eq!(c.frame().get(3, 0).unwrap().ch, ' ');
    }

    #[test]
    fn default_background_leaves_bg_unset() {
        let mut c = TerminalCanvas::new(ColorMode::TrueColor, 14, 14, 1, true);
        c.resize(140, 70);
        c.fill_background(Rgb::BLACK);
        c.fill_text('a', 0.0, 14.0, Rgb::new(0, 255, 255).with_alpha(1.0));
        assert_eq!(c.frame().get(0, 0).unwrap().bg, None);
    }

    #[test]
    fn fill_erases_previous_frame() {
        let mut c = canvas(1);
        c.fill_background(Rgb::BLACK);
        c.fill_text('a', 0.0, 14.0, Rgb::new(0, 255, 255).with_alpha(1.0));
        c.fill_background(Rgb::BLACK);
        assert_eq!(c.frame().get(0, 0).unwrap().ch, ' ');
    }
}
