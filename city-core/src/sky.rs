//! Day-night cycle: derives sun, moon, light, and sky color from the hour.
//!
//! Everything here is a pure function of `time_of_day`; the `World`
//! caches the latest [`TimeState`] for adapter reads and the lighting
//! phase consumes its `is_night` flag for the emissive sweep.

use glam::Vec2;
use std::f32::consts::PI;

/// Radius of the sun/moon orbit in world units.
pub const ORBIT_RADIUS: f32 = 50.0;

/// Sky background hue and saturation; only lightness tracks the hour.
const SKY_HUE: f32 = 0.6;
const SKY_SATURATION: f32 = 0.7;

/// Lighting state derived from a single hour value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeState {
    /// Sun position in the orbital plane (x, y); z stays 0.
    pub sun_pos: Vec2,
    /// Moon position, in antiphase with the sun.
    pub moon_pos: Vec2,
    /// Directional light intensity, clamped to `[0, 1]`.
    pub sun_intensity: f32,
    /// Ambient light intensity with a 0.1 floor.
    pub ambient_intensity: f32,
    /// Sky background color as linear RGB.
    pub background: [f32; 3],
    pub is_night: bool,
}

impl TimeState {
    /// Derives the full lighting state for `hour` (expected in `[0, 24)`;
    /// values beyond wrap naturally through the sine).
    ///
    /// The sun sits at the horizon at hour 6 (`angle = 0`) and overhead
    /// at hour 12 (`angle = π/2`):
    /// - sun position `(cos·R, sin·R)`, moon at `angle + π`;
    /// - directional intensity `max(0, sin angle)`;
    /// - ambient intensity `max(0.1, 0.5·sin angle)`;
    /// - background lightness `max(0.2, 0.5·sin angle + 0.2)` at the
    ///   fixed sky hue/saturation;
    /// - `is_night` iff the hour is strictly before 6 or strictly after 18.
    ///
    /// Idempotent: the same hour always produces the same state.
    pub fn at_hour(hour: f32) -> Self {
        let angle = (hour - 6.0) * PI / 12.0;
        let elevation = angle.sin();

        let sun_pos = Vec2::new(angle.cos(), elevation) * ORBIT_RADIUS;
        let moon_pos = Vec2::new((angle + PI).cos(), (angle + PI).sin()) * ORBIT_RADIUS;

        let lightness = (elevation * 0.5 + 0.2).max(0.2);

        Self {
            sun_pos,
            moon_pos,
            sun_intensity: elevation.max(0.0),
            ambient_intensity: (elevation * 0.5).max(0.1),
            background: hsl_to_rgb(SKY_HUE, SKY_SATURATION, lightness),
            is_night: hour < 6.0 || hour > 18.0,
        }
    }
}

/// Converts an HSL triple (all components in `[0, 1]`) to linear RGB.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s == 0.0 {
        return [l, l, l];
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noon_is_full_daylight() {
        let ts = TimeState::at_hour(12.0);
        assert!(!ts.is_night);
        assert_eq!(ts.sun_intensity, 1.0);
        assert_eq!(ts.ambient_intensity, 0.5);
        // Sun overhead at the orbit radius.
        assert!((ts.sun_pos.y - ORBIT_RADIUS).abs() < 1e-3);
    }

    #[test]
    fn midnight_clamps_to_the_floors() {
        for hour in [0.0, 24.0] {
            let ts = TimeState::at_hour(hour);
            assert!(ts.is_night, "hour {hour} should be night");
            assert_eq!(ts.sun_intensity, 0.0);
            assert_eq!(ts.ambient_intensity, 0.1);
            // Background lightness bottoms out rather than going black.
            assert!(ts.background.iter().any(|&c| c > 0.0));
        }
    }

    #[test]
    fn night_bounds_are_strict() {
        assert!(!TimeState::at_hour(6.0).is_night);
        assert!(!TimeState::at_hour(18.0).is_night);
        assert!(TimeState::at_hour(5.99).is_night);
        assert!(TimeState::at_hour(18.01).is_night);
    }

    #[test]
    fn moon_is_in_antiphase_with_the_sun() {
        for hour in [0.0, 3.5, 9.0, 15.0, 21.25] {
            let ts = TimeState::at_hour(hour);
            assert!((ts.moon_pos + ts.sun_pos).length() < 1e-3);
        }
    }

    #[test]
    fn derivation_is_idempotent() {
        assert_eq!(TimeState::at_hour(7.3), TimeState::at_hour(7.3));
        assert_eq!(TimeState::at_hour(0.0), TimeState::at_hour(0.0));
    }

    #[test]
    fn sky_color_is_a_blue_that_dims_at_night() {
        let noon = TimeState::at_hour(12.0).background;
        let night = TimeState::at_hour(0.0).background;

        // Hue 0.6 keeps blue the dominant channel day and night.
        assert!(noon[2] > noon[0]);
        assert!(night[2] > night[0]);
        // Night is strictly darker.
        assert!(night.iter().sum::<f32>() < noon.iter().sum::<f32>());
    }

    #[test]
    fn zero_saturation_collapses_to_grey() {
        assert_eq!(hsl_to_rgb(0.37, 0.0, 0.42), [0.42, 0.42, 0.42]);
    }
}
