//! Runtime configuration for the morph engine.
//!
//! A single flat [`Config`] record drives every tunable aspect of the
//! engine: morph timing, auto-rotation, color grading parameters, point
//! sizing, and pointer interaction. UI layers mutate it through
//! [`crate::engine::MorphEngine::update_config`], which re-clamps every
//! field afterwards so out-of-range values (hand-edited presets, stale
//! persisted settings) can never reach the renderer.
//!
//! # Presets
//!
//! A handful of named looks bundle the visual parameters:
//!
//! ```ignore
//! engine.apply_preset(Preset::Neon);
//! ```

/// Default per-tick morph progress increment.
pub const DEFAULT_MORPH_SPEED: f32 = 0.012;

/// Default hold window after a completed morph, in ticks (2 s at 60 fps).
pub const DEFAULT_PAUSE_DURATION: u32 = 120;

/// How the auto-rotation accumulates over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotateMode {
    /// Rotate continuously while auto-rotate is enabled.
    #[default]
    Continuous,
    /// Swing back and forth within [`Config::rotate_range`] degrees.
    Oscillate,
    /// Rotate continuously, but only while a morph is playing.
    MorphOnly,
}

/// Which axes auto-rotation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotateAxes {
    /// Rotate around the X axis.
    pub x: bool,
    /// Rotate around the Y axis.
    pub y: bool,
    /// Rotate around the Z axis.
    pub z: bool,
}

impl RotateAxes {
    /// Y axis only (the classic turntable).
    pub const Y: Self = Self {
        x: false,
        y: true,
        z: false,
    };

    /// X and Y axes.
    pub const XY: Self = Self {
        x: true,
        y: true,
        z: false,
    };

    /// All three axes.
    pub const XYZ: Self = Self {
        x: true,
        y: true,
        z: true,
    };
}

impl Default for RotateAxes {
    fn default() -> Self {
        Self::Y
    }
}

/// Pointer interaction mode applied in the point shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerMode {
    /// No pointer interaction.
    #[default]
    Off,
    /// Points are pulled toward the pointer.
    Attract,
    /// Points are pushed away from the pointer.
    Repel,
}

/// Shape of the morph trajectory between start and end positions.
///
/// Consumed by the Renderer's shader; the engine only selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionMode {
    /// Straight-line interpolation.
    #[default]
    Direct,
    /// Points spiral toward their targets.
    Spiral,
    /// Points scatter outward before converging.
    Explosion,
    /// Points fall and settle into place.
    Gravity,
}

/// Easing curve applied to morph progress in the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EasingMode {
    /// Slow start and end.
    #[default]
    EaseInOut,
    /// Constant speed.
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Overshoot and bounce at the end.
    Bounce,
    /// Spring-like oscillation at the end.
    Elastic,
}

/// Flat record of every runtime-tunable setting.
///
/// Numeric fields carry documented ranges; [`Config::clamp_ranges`] enforces
/// them whenever the record is mutated through the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Animation
    /// Advance to the next image automatically after each morph.
    pub loop_mode: bool,
    /// Blend colors smoothly during the morph instead of snapping.
    pub smooth_colors: bool,
    /// Morph trajectory shape.
    pub transition_mode: TransitionMode,
    /// Easing curve for morph progress.
    pub easing_mode: EasingMode,
    /// Per-tick progress increment, 0.001..=0.1.
    pub morph_speed: f32,
    /// Hold window between loop iterations in ticks, 0..=600.
    pub pause_duration: u32,

    // Rotation
    /// Enable auto-rotation.
    pub auto_rotate: bool,
    /// Accumulation mode for auto-rotation.
    pub rotate_mode: RotateMode,
    /// Axes the rotation applies to.
    pub rotate_axes: RotateAxes,
    /// Base rotation speed in degrees per tick, 0.0..=5.0.
    pub rotate_speed: f32,
    /// Swing range for oscillate mode in degrees, 0.0..=360.0.
    pub rotate_range: f32,
    /// Pivot offset, 0.0 (centered) ..= 100.0 (max orbit).
    pub rotate_pivot: f32,

    // Visual FX
    /// Render in grayscale.
    pub grayscale: bool,
    /// Invert colors.
    pub invert_colors: bool,
    /// Additive blending (glow) instead of normal alpha blending.
    pub additive_blend: bool,
    /// Opacity percentage, 0.0..=200.0.
    pub opacity: f32,
    /// Brightness percentage, 0.0..=200.0.
    pub brightness: f32,
    /// Saturation percentage, 0.0..=200.0.
    pub saturation: f32,
    /// Hue rotation in degrees, 0.0..=360.0.
    pub hue_shift: f32,

    // Points
    /// Rendered point size in pixels, 0.5..=10.0.
    pub point_size: f32,
    /// Depth jitter range in world units, 0.0..=50.0.
    pub z_depth: f32,

    // Canvas
    /// Fraction of the fitted viewport the image occupies, 0.1..=2.0.
    pub image_scale: f32,
    /// Canvas width as a percentage of the window, 10.0..=100.0.
    pub canvas_width_percent: f32,
    /// Canvas height as a percentage of the window, 10.0..=100.0.
    pub canvas_height_percent: f32,

    // Pointer interaction
    /// Pointer interaction mode.
    pub pointer_mode: PointerMode,
    /// Interaction radius in world units, 10.0..=500.0.
    pub pointer_radius: f32,
    /// Interaction strength, 0.0..=10.0.
    pub pointer_strength: f32,

    // Other
    /// Cycle presets automatically (driven by an outer layer).
    pub auto_mode: bool,
    /// Track and expose an FPS estimate.
    pub show_fps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loop_mode: true,
            smooth_colors: true,
            transition_mode: TransitionMode::default(),
            easing_mode: EasingMode::default(),
            morph_speed: DEFAULT_MORPH_SPEED,
            pause_duration: DEFAULT_PAUSE_DURATION,

            auto_rotate: false,
            rotate_mode: RotateMode::default(),
            rotate_axes: RotateAxes::default(),
            rotate_speed: 0.5,
            rotate_range: 180.0,
            rotate_pivot: 0.0,

            grayscale: false,
            invert_colors: false,
            additive_blend: true,
            opacity: 100.0,
            brightness: 100.0,
            saturation: 100.0,
            hue_shift: 0.0,

            point_size: 3.0,
            z_depth: 2.0,

            image_scale: 0.9,
            canvas_width_percent: 100.0,
            canvas_height_percent: 100.0,

            pointer_mode: PointerMode::default(),
            pointer_radius: 150.0,
            pointer_strength: 3.0,

            auto_mode: false,
            show_fps: false,
        }
    }
}

impl Config {
    /// Clamp every numeric field to its documented range.
    ///
    /// Called by the engine after any mutation so values written directly
    /// (presets, persisted settings) cannot escape their ranges.
    pub fn clamp_ranges(&mut self) {
        self.morph_speed = self.morph_speed.clamp(0.001, 0.1);
        self.pause_duration = self.pause_duration.min(600);
        self.rotate_speed = self.rotate_speed.clamp(0.0, 5.0);
        self.rotate_range = self.rotate_range.clamp(0.0, 360.0);
        self.rotate_pivot = self.rotate_pivot.clamp(0.0, 100.0);
        self.opacity = self.opacity.clamp(0.0, 200.0);
        self.brightness = self.brightness.clamp(0.0, 200.0);
        self.saturation = self.saturation.clamp(0.0, 200.0);
        self.hue_shift = self.hue_shift.clamp(0.0, 360.0);
        self.point_size = self.point_size.clamp(0.5, 10.0);
        self.z_depth = self.z_depth.clamp(0.0, 50.0);
        self.image_scale = self.image_scale.clamp(0.1, 2.0);
        self.canvas_width_percent = self.canvas_width_percent.clamp(10.0, 100.0);
        self.canvas_height_percent = self.canvas_height_percent.clamp(10.0, 100.0);
        self.pointer_radius = self.pointer_radius.clamp(10.0, 500.0);
        self.pointer_strength = self.pointer_strength.clamp(0.0, 10.0);
    }

    /// Whether a change from `old` to `self` invalidates cached point fields.
    ///
    /// Image scale and depth jitter both feed the image-to-field mapping, so
    /// changing either requires reprocessing every stored image.
    pub fn invalidates_fields(&self, old: &Config) -> bool {
        self.image_scale != old.image_scale || self.z_depth != old.z_depth
    }
}

/// Named visual presets bundling blend, grading, and transition settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Neutral defaults.
    Default,
    /// Vivid additive glow with a purple cast.
    Neon,
    /// Soft desaturated wash, normal blending.
    Pastel,
    /// Faint translucent wisps.
    Ghost,
    /// Warm, oversaturated embers.
    Fire,
    /// Cool blue shimmer.
    Ice,
}

impl Preset {
    /// Apply this preset's visual parameters to a configuration.
    ///
    /// Only the look is touched; timing, rotation, and pointer settings are
    /// left as they are.
    pub fn apply(self, config: &mut Config) {
        let (additive, brightness, saturation, opacity, point_size, hue, transition) = match self {
            Preset::Default => (true, 100.0, 100.0, 100.0, 3.0, 0.0, TransitionMode::Direct),
            Preset::Neon => (true, 150.0, 200.0, 80.0, 2.5, 280.0, TransitionMode::Spiral),
            Preset::Pastel => (false, 120.0, 80.0, 150.0, 4.0, 30.0, TransitionMode::Explosion),
            Preset::Ghost => (true, 80.0, 50.0, 40.0, 5.0, 180.0, TransitionMode::Gravity),
            Preset::Fire => (true, 130.0, 150.0, 120.0, 3.5, 0.0, TransitionMode::Gravity),
            Preset::Ice => (true, 110.0, 120.0, 90.0, 3.0, 200.0, TransitionMode::Spiral),
        };

        config.additive_blend = additive;
        config.brightness = brightness;
        config.saturation = saturation;
        config.opacity = opacity;
        config.point_size = point_size;
        config.hue_shift = hue;
        config.transition_mode = transition;
        config.clamp_ranges();
    }
}
