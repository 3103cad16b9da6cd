//! # pointmorph - Particle Image Morphing Engine
//!
//! Turns images into point clouds and animates smooth transitions between
//! them, driven by a per-frame tick.
//!
//! The engine owns all animation state and stays renderer-agnostic: each
//! dirty frame it hands your [`Renderer`] the point buffers, the current
//! rotation transform, and an immutable [`RenderParams`] snapshot. How the
//! points reach the screen (GPU, software, export) is entirely up to the
//! host.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pointmorph::prelude::*;
//!
//! let mut engine = MorphEngine::new()
//!     .with_image_store(MemoryImageStore::new())
//!     .with_settings_store(MemorySettingsStore::new());
//!
//! engine.handle_resize(1280, 720);
//! engine.add_image(&std::fs::read("a.png")?, "a.png")?;
//! engine.add_image(&std::fs::read("b.png")?, "b.png")?;
//! engine.toggle_playback()?;
//!
//! // Per display frame:
//! engine.tick(&mut my_renderer);
//! ```
//!
//! ## Core Concepts
//!
//! ### Point fields
//!
//! Every image is decoded, bounded to 1000px, and mapped into a
//! fixed-capacity [`PointField`]: one point per sufficiently-opaque pixel,
//! fitted to the camera viewport, with unused slots parked at a sentinel
//! depth so the renderer can keep a constant-size buffer.
//!
//! ### The morph
//!
//! Transitions interpolate between a *start* and *end* field. Progress
//! runs past 1.0 into a short hold so trailing points (staggered by random
//! per-point delays) finish their travel. In loop mode a pause window
//! follows, then the buffers swap to the next image pair.
//!
//! ### Configuration
//!
//! All tunables live in a plain [`Config`] struct: morph speed, rotation,
//! color treatment, point size, pointer interaction. Values are clamped at
//! the engine boundary, and scale-affecting changes trigger a cancellable
//! re-mapping of every stored image.
//!
//! ## Feature Overview
//!
//! | Category | Types |
//! |----------|-------|
//! | Control | [`MorphEngine`], [`Config`], [`Preset`] |
//! | Geometry | [`PointField`], [`FieldBuffers`], [`Camera`] |
//! | Animation | [`MorphState`], [`Kinematics`], [`RotationTransform`] |
//! | Rendering | [`Renderer`], [`FieldView`], [`RenderParams`] |
//! | Input | [`PointerTracker`], [`ViewRect`] |
//! | Persistence | [`ImageStore`], [`SettingsStore`] |

pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod images;
pub mod kinematics;
pub mod mapper;
pub mod morph;
pub mod pointer;
pub mod render;
pub mod reprocess;
pub mod storage;
pub mod time;

pub use bytemuck;
pub use camera::Camera;
pub use config::{
    Config, EasingMode, PointerMode, Preset, RotateAxes, RotateMode, TransitionMode,
};
pub use engine::{MorphEngine, StatusEvent};
pub use error::{DecodeError, EngineError, StorageError};
pub use field::{FieldBuffers, PointField, UploadFlags};
pub use glam::{Vec2, Vec3, Vec4};
pub use images::{ImageLibrary, SourceImage};
pub use kinematics::{Kinematics, RotationTransform};
pub use morph::{MorphState, MorphTick, Phase, Toggle};
pub use pointer::{GestureChange, PointerTracker, ViewRect};
pub use render::{FieldView, RenderParams, Renderer};
pub use storage::{
    ImageStore, MemoryImageStore, MemorySettingsStore, SettingsStore, StoredImage,
};
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use pointmorph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::config::{
        Config, EasingMode, PointerMode, Preset, RotateAxes, RotateMode, TransitionMode,
    };
    pub use crate::engine::{MorphEngine, StatusEvent};
    pub use crate::error::{DecodeError, EngineError, StorageError};
    pub use crate::field::{FieldBuffers, PointField, UploadFlags};
    pub use crate::pointer::ViewRect;
    pub use crate::render::{FieldView, RenderParams, Renderer};
    pub use crate::storage::{ImageStore, MemoryImageStore, MemorySettingsStore, SettingsStore};
    pub use crate::{Vec2, Vec3, Vec4};
}
