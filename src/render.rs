//! The rendering seam.
//!
//! The engine never draws; it hands the renderer a borrowed view of the
//! point buffers, the current transform, and an immutable [`RenderParams`]
//! snapshot once per dirty tick. Snapshotting the parameters wholesale
//! (rather than poking individual uniforms from many call sites) means the
//! renderer can never observe a half-updated frame.

use crate::config::{Config, EasingMode, PointerMode, TransitionMode};
use crate::field::{FieldBuffers, UploadFlags};
use crate::kinematics::RotationTransform;
use glam::Vec3;

/// Borrowed view of the morph buffers for one render call.
///
/// Buffers are handed by reference and mutated in place between calls; the
/// [`UploadFlags`] say which ones changed since the renderer last consumed
/// them.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    /// Start ("from") positions, 3 floats per point.
    pub start_positions: &'a [f32],
    /// End ("to") positions, 3 floats per point.
    pub end_positions: &'a [f32],
    /// Start colors, 3 floats per point in `[0, 1]`.
    pub start_colors: &'a [f32],
    /// End colors, 3 floats per point in `[0, 1]`.
    pub end_colors: &'a [f32],
    /// Per-point random offsets for the stagger effect.
    pub random_offsets: &'a [f32],
    /// Which buffers changed since the last render call.
    pub upload: UploadFlags,
}

impl FieldBuffers {
    /// Borrow the current buffers for a render call.
    pub fn view(&self) -> FieldView<'_> {
        FieldView {
            start_positions: self.start().positions(),
            end_positions: self.end().positions(),
            start_colors: self.start().colors(),
            end_colors: self.end().colors(),
            random_offsets: self.random_offsets(),
            upload: self.upload_flags(),
        }
    }
}

/// Immutable per-tick snapshot of everything the point shader consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    /// Morph progress in `[0, 1 + hold]`.
    pub progress: f32,
    /// Animation time accumulator in seconds-ish units.
    pub time: f32,
    /// Blend colors smoothly during the morph.
    pub smooth_colors: bool,
    /// Render in grayscale.
    pub grayscale: bool,
    /// Invert colors.
    pub invert: bool,
    /// Additive blending instead of normal alpha blending.
    pub additive_blend: bool,
    /// Morph trajectory shape.
    pub transition_mode: TransitionMode,
    /// Progress easing curve.
    pub easing_mode: EasingMode,
    /// Point size in pixels.
    pub point_size: f32,
    /// Opacity in `[0, 2]` (config percentage / 100).
    pub opacity: f32,
    /// Brightness in `[0, 2]`.
    pub brightness: f32,
    /// Saturation in `[0, 2]`.
    pub saturation: f32,
    /// Hue rotation in degrees.
    pub hue_shift: f32,
    /// Pointer interaction mode.
    pub pointer_mode: PointerMode,
    /// Pointer interaction radius in world units.
    pub pointer_radius: f32,
    /// Pointer interaction strength.
    pub pointer_strength: f32,
    /// Pointer position on the particle plane, world space.
    pub pointer_world: Vec3,
}

impl RenderParams {
    /// Snapshot the render parameters from the live configuration.
    ///
    /// Percentage-valued settings are normalized to unit scale here, once,
    /// so the renderer sees ready-to-use values.
    pub fn snapshot(config: &Config, progress: f32, time: f32, pointer_world: Vec3) -> Self {
        Self {
            progress,
            time,
            smooth_colors: config.smooth_colors,
            grayscale: config.grayscale,
            invert: config.invert_colors,
            additive_blend: config.additive_blend,
            transition_mode: config.transition_mode,
            easing_mode: config.easing_mode,
            point_size: config.point_size,
            opacity: config.opacity / 100.0,
            brightness: config.brightness / 100.0,
            saturation: config.saturation / 100.0,
            hue_shift: config.hue_shift,
            pointer_mode: config.pointer_mode,
            pointer_radius: config.pointer_radius,
            pointer_strength: config.pointer_strength,
            pointer_world,
        }
    }
}

/// The external rendering backend.
///
/// Implementations upload whichever buffers the view flags as changed, draw
/// the point cloud with the given transform and parameters, and own all GPU
/// state. The engine calls [`Renderer::render`] at most once per tick, and
/// only when something actually changed.
pub trait Renderer {
    /// Draw one frame.
    fn render(&mut self, fields: FieldView<'_>, transform: &RotationTransform, params: &RenderParams);

    /// The drawing surface was resized.
    fn resize(&mut self, width: u32, height: u32);

    /// Release backend resources; no calls follow.
    fn dispose(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_normalizes_percentages() {
        let config = Config {
            opacity: 80.0,
            brightness: 150.0,
            saturation: 50.0,
            ..Config::default()
        };
        let params = RenderParams::snapshot(&config, 0.5, 1.0, Vec3::ZERO);

        assert!((params.opacity - 0.8).abs() < 1e-6);
        assert!((params.brightness - 1.5).abs() < 1e-6);
        assert!((params.saturation - 0.5).abs() < 1e-6);
        assert_eq!(params.progress, 0.5);
    }

    #[test]
    fn test_snapshot_carries_enums_through() {
        let config = Config {
            transition_mode: TransitionMode::Spiral,
            easing_mode: EasingMode::Elastic,
            pointer_mode: PointerMode::Repel,
            ..Config::default()
        };
        let params = RenderParams::snapshot(&config, 0.0, 0.0, Vec3::new(1.0, 2.0, 0.0));

        assert_eq!(params.transition_mode, TransitionMode::Spiral);
        assert_eq!(params.easing_mode, EasingMode::Elastic);
        assert_eq!(params.pointer_mode, PointerMode::Repel);
        assert_eq!(params.pointer_world, Vec3::new(1.0, 2.0, 0.0));
    }
}
