//! Auto-rotation and pivot-offset kinematics.
//!
//! Recomputes the displayed transform each tick from configuration and an
//! internal time accumulator. Purely computational: no external calls and
//! safe for any numeric input.
//!
//! Rotation speed is modulated by morph speed
//! (`rotate_speed * 0.01 * morph_speed / DEFAULT_MORPH_SPEED`) so the two
//! animations stay visually coupled when the user speeds up the morph.

use crate::config::{Config, RotateMode, DEFAULT_MORPH_SPEED};
use glam::{Vec2, Vec3};
use std::f32::consts::PI;

/// Time accumulator step per oscillation tick.
const OSCILLATE_TIME_STEP: f32 = 0.05;

/// Per-frame transform applied to the whole point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationTransform {
    /// Rotation angles per axis in radians.
    pub rotation: Vec3,
    /// XY translation for pivot mode.
    pub translation: Vec2,
}

/// Auto-rotation state: accumulated angles, pivot translation, and the
/// oscillation clock.
#[derive(Debug, Default)]
pub struct Kinematics {
    rotation_time: f32,
    rotation: Vec3,
    translation: Vec2,
}

impl Kinematics {
    /// Create a kinematics module at rest.
    pub fn new() -> Self {
        Self::default()
    }

    /// The transform to hand to the renderer this frame.
    pub fn transform(&self) -> RotationTransform {
        RotationTransform {
            rotation: self.rotation,
            translation: self.translation,
        }
    }

    /// Advance one tick. Returns `true` if the transform changed.
    ///
    /// Runs only while auto-rotate is enabled, and in morph-only mode also
    /// requires active playback.
    pub fn tick(&mut self, config: &Config, playing: bool) -> bool {
        if !config.auto_rotate {
            return false;
        }
        if config.rotate_mode == RotateMode::MorphOnly && !playing {
            return false;
        }

        let speed_factor =
            config.rotate_speed * 0.01 * (config.morph_speed / DEFAULT_MORPH_SPEED);

        if config.rotate_pivot > 0.0 {
            let offset = config.rotate_pivot * 2.0;
            self.translation = Vec2::new(
                offset * (self.rotation_time * speed_factor).sin(),
                offset * (self.rotation_time * speed_factor).cos(),
            );
        }

        let axes = config.rotate_axes;
        if config.rotate_mode == RotateMode::Oscillate {
            self.rotation_time += OSCILLATE_TIME_STEP;
            let swing = (self.rotation_time * config.rotate_speed * 0.02).sin()
                * (config.rotate_range * PI / 180.0);
            self.rotation = Vec3::new(
                if axes.x { swing } else { 0.0 },
                if axes.y { swing } else { 0.0 },
                if axes.z { swing } else { 0.0 },
            );
        } else {
            // Continuous and morph-only modes accumulate without bound; the
            // renderer consumes the angles through trigonometry, which wraps.
            if !axes.x {
                self.rotation.x = 0.0;
            }
            if !axes.y {
                self.rotation.y = 0.0;
            }
            if !axes.z {
                self.rotation.z = 0.0;
            }
            if axes.x {
                self.rotation.x += speed_factor;
            }
            if axes.y {
                self.rotation.y += speed_factor;
            }
            if axes.z {
                self.rotation.z += speed_factor;
            }
        }
        true
    }

    /// Return to the rest transform and restart the oscillation clock.
    pub fn reset(&mut self) {
        self.rotation_time = 0.0;
        self.rotation = Vec3::ZERO;
        self.translation = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotateAxes;

    fn rotating() -> Config {
        Config {
            auto_rotate: true,
            ..Config::default()
        }
    }

    #[test]
    fn test_disabled_when_auto_rotate_off() {
        let mut kin = Kinematics::new();
        let config = Config::default();
        assert!(!kin.tick(&config, true));
        assert_eq!(kin.transform(), RotationTransform::default());
    }

    #[test]
    fn test_morph_only_requires_playback() {
        let mut kin = Kinematics::new();
        let config = Config {
            rotate_mode: RotateMode::MorphOnly,
            ..rotating()
        };
        assert!(!kin.tick(&config, false));
        assert!(kin.tick(&config, true));
    }

    #[test]
    fn test_continuous_accumulates_selected_axis_only() {
        let mut kin = Kinematics::new();
        let config = rotating(); // Y axis, continuous

        for _ in 0..100 {
            kin.tick(&config, false);
        }
        let t = kin.transform();
        assert!(t.rotation.y > 0.0);
        assert_eq!(t.rotation.x, 0.0);
        assert_eq!(t.rotation.z, 0.0);
    }

    #[test]
    fn test_axis_change_zeroes_stale_axes() {
        let mut kin = Kinematics::new();
        let mut config = Config {
            rotate_axes: RotateAxes::XYZ,
            ..rotating()
        };
        for _ in 0..10 {
            kin.tick(&config, false);
        }
        assert!(kin.transform().rotation.x > 0.0);

        config.rotate_axes = RotateAxes::Y;
        kin.tick(&config, false);
        let t = kin.transform();
        assert_eq!(t.rotation.x, 0.0);
        assert_eq!(t.rotation.z, 0.0);
        assert!(t.rotation.y > 0.0);
    }

    #[test]
    fn test_oscillation_stays_within_range() {
        let mut kin = Kinematics::new();
        let config = Config {
            rotate_mode: RotateMode::Oscillate,
            rotate_range: 90.0,
            ..rotating()
        };

        let limit = 90.0 * PI / 180.0 + 1e-4;
        for _ in 0..2_000 {
            kin.tick(&config, false);
            assert!(kin.transform().rotation.y.abs() <= limit);
        }
    }

    #[test]
    fn test_rotation_speed_scales_with_morph_speed() {
        let slow_config = rotating();
        let fast_config = Config {
            morph_speed: DEFAULT_MORPH_SPEED * 2.0,
            ..rotating()
        };

        let mut slow = Kinematics::new();
        let mut fast = Kinematics::new();
        slow.tick(&slow_config, false);
        fast.tick(&fast_config, false);

        let ratio = fast.transform().rotation.y / slow.transform().rotation.y;
        assert!((ratio - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_pivot_translation_orbits() {
        let mut kin = Kinematics::new();
        let config = Config {
            rotate_mode: RotateMode::Oscillate,
            rotate_pivot: 50.0,
            ..rotating()
        };

        for _ in 0..5 {
            kin.tick(&config, false);
        }
        let t = kin.transform().translation;
        // Offset magnitude is pivot * 2 on the sin/cos circle.
        assert!((t.length() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_reset_returns_to_rest() {
        let mut kin = Kinematics::new();
        let config = rotating();
        for _ in 0..50 {
            kin.tick(&config, false);
        }
        kin.reset();
        assert_eq!(kin.transform(), RotationTransform::default());
    }
}
