// Copyright (c) 2026 rezky_nightky

use crate::random::RandomSource;

pub const MIN_FALL_SPEED: f64 = 1.0;
pub const MAX_FALL_SPEED: f64 = 4.0;
pub const MIN_TRAIL_LEN: u32 = 5;
pub const MAX_TRAIL_LEN: u32 = 20;

/// One vertical lane of rain.
///
/// `fall_speed` and `trail_length` are fixed for the column's lifetime;
/// `head_position` only grows, or snaps back to 0 on reset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnState {
    head_position: f64,
    fall_speed: f64,
    trail_length: u32,
}

impl ColumnState {
    /// Draw order: speed, trail, head.
    pub fn seed(rng: &mut impl RandomSource, height_px: u32) -> Self {
        let fall_speed = MIN_FALL_SPEED + rng.unit() * (MAX_FALL_SPEED - MIN_FALL_SPEED);
        let span = (MAX_TRAIL_LEN - MIN_TRAIL_LEN) as f64;
        let extra = (rng.unit() * span) as u32;
        let trail_length = MIN_TRAIL_LEN + extra.min(MAX_TRAIL_LEN - MIN_TRAIL_LEN - 1);
        let head_position = rng.unit() * height_px as f64;
        Self {
            head_position,
            fall_speed,
            trail_length,
        }
    }

    #[cfg(test)]
    pub fn with_values(head_position: f64, fall_speed: f64, trail_length: u32) -> Self {
        Self {
            head_position,
            fall_speed,
            trail_length,
        }
    }

    pub fn head_position(&self) -> f64 {
        self.head_position
    }

    #[cfg(test)]
    pub fn fall_speed(&self) -> f64 {
        self.fall_speed
    }

    pub fn trail_length(&self) -> u32 {
        self.trail_length
    }

    pub fn advance(&mut self) {
        self.head_position += self.fall_speed;
    }

    /// True once the last glyph of the trail is below the bottom edge.
    pub fn trail_exited(&self, height_px: u32, cell_height_px: u32) -> bool {
        self.head_position - (self.trail_length as f64 * cell_height_px as f64) > height_px as f64
    }

    /// Reset check; the random draw is only taken when the trail has exited.
    /// Returns whether the column snapped back to the top.
    pub fn maybe_reset(
        &mut self,
        rng: &mut impl RandomSource,
        height_px: u32,
        cell_height_px: u32,
        threshold: f64,
    ) -> bool {
        if self.trail_exited(height_px, cell_height_px) && rng.unit() > threshold {
            self.head_position = 0.0;
            return true;
        }
        false
    }

    /// Opacity of the `j`-th glyph behind the head.
    pub fn opacity_at(&self, j: u32) -> f64 {
        1.0 - (j as f64 / self.trail_length.max(1) as f64)
    }
}

pub fn column_count(width_px: u32, cell_width_px: u32) -> usize {
    if cell_width_px == 0 {
        return 0;
    }
    (width_px / cell_width_px) as usize
}
