// Copyright (c) 2026 rezky_nightky

use crate::error::RainError;
use crate::palette::{Rgb, Rgba};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width_px: u32,
    pub height_px: u32,
}

impl Viewport {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }
}

/// A 2D drawing context addressed in pixels.
///
/// Text is placed with its baseline at `y`, the way a canvas `fillText`
/// places it; anything outside the backing store is clipped silently.
pub trait Canvas {
    fn resize(&mut self, width_px: u32, height_px: u32);
    fn fill_background(&mut self, color: Rgb);
    fn fill_text(&mut self, glyph: char, x_px: f64, y_px: f64, color: Rgba);
}

/// The drawable the rain paints on, kept at viewport size.
pub struct RainSurface<C> {
    canvas: C,
    width_px: u32,
    height_px: u32,
}

impl<C: Canvas> RainSurface<C> {
    pub fn initialize(canvas: Option<C>, viewport: Viewport) -> Result<Self, RainError> {
        let mut canvas = canvas.ok_or(RainError::SurfaceUnavailable)?;
        canvas.resize(viewport.width_px, viewport.height_px);
        Ok(Self {
            canvas,
            width_px: viewport.width_px,
            height_px: viewport.height_px,
        })
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        self.width_px = viewport.width_px;
        self.height_px = viewport.height_px;
        self.canvas.resize(viewport.width_px, viewport.height_px);
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    #[cfg(test)]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{DrawOp, RecordingCanvas};
    use super::*;

    #[test]
    fn initialize_sizes_canvas_to_viewport() {
        let s = RainSurface::initialize(Some(RecordingCanvas::default()), Viewport::new(140, 400))
            .unwrap();
        assert_eq!((s.width_px(), s.height_px()), (140, 400));
        assert_eq!(s.canvas().ops, vec![DrawOp::Resize(140, 400)]);
    }

    #[test]
    fn missing_context_is_surface_unavailable() {
        let r = RainSurface::<RecordingCanvas>::initialize(None, Viewport::new(10, 10));
        assert!(matches!(r, Err(RainError::SurfaceUnavailable)));
    }

    #[test]
    fn resize_tracks_viewport() {
        let mut s =
            RainSurface::initialize(Some(RecordingCanvas::default()), Viewport::new(140, 400))
                .unwrap();
        s.on_resize(Viewport::new(280, 100));
        assert_eq!((s.width_px(), s.height_px()), (280, 100));
        assert_eq!(s.canvas().ops.last(), Some(&DrawOp::Resize(280, 100)));
    }
}
