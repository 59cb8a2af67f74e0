//! Noise shape settings: vertical extent, cell size, sampling scales and slides.

use serde::{Deserialize, Serialize};

use crate::math::{clamped_lerp, floor_div};

/// Pulls densities towards `target` over `size` cells starting `offset`
/// cells in from the top or bottom of the world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlideSettings {
    pub target: f64,
    pub size: i32,
    pub offset: i32,
}

impl SlideSettings {
    /// `cells` counts cells from the edge of the world the slide starts at.
    #[inline]
    #[must_use]
    pub fn apply(&self, density: f64, cells: f64) -> f64 {
        if self.size <= 0 {
            return density;
        }
        let factor = (cells - f64::from(self.offset)) / f64::from(self.size);
        clamped_lerp(self.target, density, factor)
    }
}

/// Scales of the blended base terrain noise.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseSamplingSettings {
    pub xz_scale: f64,
    pub y_scale: f64,
    pub xz_factor: f64,
    pub y_factor: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseSettings {
    pub min_y: i32,
    pub height: i32,
    /// Horizontal cell size in quarts.
    pub size_horizontal: i32,
    /// Vertical cell size in quarts.
    pub size_vertical: i32,
    pub sampling: NoiseSamplingSettings,
    pub top_slide: SlideSettings,
    pub bottom_slide: SlideSettings,
}

impl NoiseSettings {
    #[must_use]
    pub const fn overworld() -> Self {
        Self {
            min_y: -64,
            height: 384,
            size_horizontal: 1,
            size_vertical: 2,
            sampling: NoiseSamplingSettings {
                xz_scale: 1.0,
                y_scale: 1.0,
                xz_factor: 80.0,
                y_factor: 160.0,
            },
            top_slide: SlideSettings {
                target: -0.078_125,
                size: 2,
                offset: 8,
            },
            bottom_slide: SlideSettings {
                target: 0.117_187_5,
                size: 3,
                offset: 0,
            },
        }
    }

    #[inline]
    #[must_use]
    pub const fn cell_width(&self) -> i32 {
        self.size_horizontal * 4
    }

    #[inline]
    #[must_use]
    pub const fn cell_height(&self) -> i32 {
        self.size_vertical * 4
    }

    #[inline]
    #[must_use]
    pub const fn min_cell_y(&self) -> i32 {
        floor_div(self.min_y, self.cell_height())
    }

    #[inline]
    #[must_use]
    pub const fn cell_count_y(&self) -> i32 {
        self.height / self.cell_height()
    }

    /// Applies the top then the bottom slide to a density sampled at `y`.
    ///
    /// The cell index uses truncating division, so negative heights round
    /// towards zero.
    #[must_use]
    pub fn apply_slide(&self, density: f64, y: f64) -> f64 {
        let cell = f64::from((y as i32) / self.cell_height() - self.min_cell_y());
        let density = self
            .top_slide
            .apply(density, f64::from(self.cell_count_y()) - cell);
        self.bottom_slide.apply(density, cell)
    }
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self::overworld()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overworld_cells() {
        let settings = NoiseSettings::overworld();
        assert_eq!(settings.cell_width(), 4);
        assert_eq!(settings.cell_height(), 8);
        assert_eq!(settings.min_cell_y(), -8);
        assert_eq!(settings.cell_count_y(), 48);
    }

    #[test]
    fn test_slide_pins_world_edges() {
        let settings = NoiseSettings::overworld();
        // Bottom cell is fully pulled to the bottom target.
        assert_eq!(settings.apply_slide(5.0, -64.0), 0.117_187_5);
        // Top cell is fully pulled to the top target.
        assert_eq!(settings.apply_slide(5.0, 320.0), -0.078_125);
        // The middle of the world is untouched.
        assert_eq!(settings.apply_slide(5.0, 64.0), 5.0);
    }

    #[test]
    fn test_zero_size_slide_is_identity() {
        let slide = SlideSettings {
            target: 1.0,
            size: 0,
            offset: 0,
        };
        assert_eq!(slide.apply(-3.0, 0.0), -3.0);
    }

    #[test]
    fn test_round_trips_through_json() {
        let settings = NoiseSettings::overworld();
        let json = serde_json::to_string(&settings).unwrap();
        let back: NoiseSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }
}
