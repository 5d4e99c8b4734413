//! Conversion between presentation units (pixels) and simulation meters.
//!
//! The engine is tuned for objects around one meter across, so the ratio is picked
//! so that a common 32 px sprite maps to a 1 m body.

use crate::collision::types::Vec2;

/// Pixels per simulation meter.
pub const PTM_RATIO: f32 = 32.0;
/// Meters per pixel.
pub const PTM_RATIO_INV: f32 = 1.0 / PTM_RATIO;

/// Pixels to meters.
#[inline]
pub fn to_sim(v: Vec2) -> Vec2 {
    v * PTM_RATIO_INV
}

/// Meters to pixels.
#[inline]
pub fn from_sim(v: Vec2) -> Vec2 {
    v * PTM_RATIO
}

#[inline]
pub fn to_sim_scalar(v: f32) -> f32 {
    v * PTM_RATIO_INV
}

#[inline]
pub fn from_sim_scalar(v: f32) -> f32 {
    v * PTM_RATIO
}

/// Angle of `v` from +X in radians, in `(-PI, PI]`.
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn pixels_and_meters_convert_both_ways() {
        let px = Vec2::new(64.0, -16.0);
        assert_eq!(to_sim(px), Vec2::new(2.0, -0.5));
        assert_eq!(from_sim(to_sim(px)), px);
        assert_eq!(to_sim_scalar(96.0), 3.0);
        assert_eq!(from_sim_scalar(0.25), 8.0);
        assert_eq!(PTM_RATIO * PTM_RATIO_INV, 1.0);
    }

    #[test]
    fn angle_of_measures_from_x_axis() {
        assert_eq!(angle_of(Vec2::new(1.0, 0.0)), 0.0);
        assert!((angle_of(Vec2::new(0.0, 2.0)) - FRAC_PI_2).abs() < 1.0e-6);
        assert!((angle_of(Vec2::new(0.0, -1.0)) + FRAC_PI_2).abs() < 1.0e-6);
    }
}
