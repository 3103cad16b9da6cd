//! The morph engine: single owner of all animation state.
//!
//! [`MorphEngine`] ties the subsystems together and exposes the operations
//! a UI layer calls: add/remove/reorder images, toggle playback, navigate,
//! tweak configuration, apply presets. Everything runs inside `tick()`,
//! driven by the host's display-refresh callback; the engine never blocks
//! and never draws on a clean frame.
//!
//! # Example
//!
//! ```ignore
//! use pointmorph::prelude::*;
//!
//! let mut engine = MorphEngine::new()
//!     .with_image_store(MemoryImageStore::new())
//!     .with_settings_store(MemorySettingsStore::new());
//!
//! engine.add_image(&png_bytes_a, "a.png")?;
//! engine.add_image(&png_bytes_b, "b.png")?;
//! engine.toggle_playback()?;
//!
//! // per display frame:
//! engine.tick(&mut renderer);
//! ```

use crate::camera::Camera;
use crate::config::{Config, PointerMode, Preset};
use crate::error::EngineError;
use crate::field::{FieldBuffers, DEFAULT_CAPACITY};
use crate::images::{ImageLibrary, SourceImage};
use crate::kinematics::Kinematics;
use crate::mapper;
use crate::morph::{MorphState, MorphTick, Phase, Toggle};
use crate::pointer::{GestureChange, PointerTracker, ViewRect};
use crate::render::{RenderParams, Renderer};
use crate::reprocess::Reprocessor;
use crate::storage::{ImageStore, SettingsStore};
use crate::time::FrameClock;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::time::Instant;

/// Animation-time increment per active tick.
const ANIM_TIME_STEP: f32 = 0.01;

/// User-facing status updates, in place of the original status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// An image is being decoded and mapped.
    Processing {
        /// Display name of the image.
        name: String,
    },
    /// More images are needed before morphing can start.
    NeedMoreImages {
        /// How many more images are required.
        missing: usize,
    },
    /// Enough images are loaded; playback can start.
    Ready,
    /// Playback started.
    Playing,
    /// Playback stopped by the user.
    Stopped,
    /// Resting in the pause window between loop iterations.
    Pausing,
    /// A single-shot morph completed.
    Finished,
    /// An image failed to decode; other images are unaffected.
    DecodeFailed {
        /// Display name of the failing image.
        name: String,
    },
    /// The view transform was reset.
    ViewReset,
}

/// Top-level controller owning every subsystem.
///
/// Single-threaded and cooperative: UI operations and the tick interleave
/// but never run concurrently, so no locking is needed anywhere.
pub struct MorphEngine {
    config: Config,
    camera: Camera,
    buffers: FieldBuffers,
    library: ImageLibrary,
    morph: MorphState,
    kinematics: Kinematics,
    reprocessor: Reprocessor,
    clock: FrameClock,
    pointer: PointerTracker,
    pointer_world: Vec3,
    anim_time: f32,
    needs_render: bool,
    status: VecDeque<StatusEvent>,
    image_store: Option<Box<dyn ImageStore>>,
    settings_store: Option<Box<dyn SettingsStore>>,
    rng: SmallRng,
}

impl MorphEngine {
    /// Create an engine with the default point capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an engine with a custom point capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut rng = SmallRng::from_entropy();
        let buffers = FieldBuffers::new(capacity, &mut rng);
        Self {
            config: Config::default(),
            camera: Camera::new(),
            buffers,
            library: ImageLibrary::new(),
            morph: MorphState::new(),
            kinematics: Kinematics::new(),
            reprocessor: Reprocessor::new(),
            clock: FrameClock::new(),
            pointer: PointerTracker::new(),
            pointer_world: Vec3::ZERO,
            anim_time: 0.0,
            needs_render: true,
            status: VecDeque::new(),
            image_store: None,
            settings_store: None,
            rng,
        }
    }

    /// Attach a persistent image store.
    pub fn with_image_store(mut self, store: impl ImageStore + 'static) -> Self {
        self.image_store = Some(Box::new(store));
        self
    }

    /// Attach a persistent settings store.
    pub fn with_settings_store(mut self, store: impl SettingsStore + 'static) -> Self {
        self.settings_store = Some(Box::new(store));
        self
    }

    // ========== Queries ==========

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The camera used for fitting and pointer projection.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Number of loaded images.
    pub fn image_count(&self) -> usize {
        self.library.len()
    }

    /// Index of the current ("from") image.
    pub fn current_index(&self) -> usize {
        self.library.current_index()
    }

    /// Ordered (id, name) pairs for UI listings.
    pub fn image_list(&self) -> Vec<(u64, String)> {
        self.library
            .iter()
            .map(|img| (img.id, img.name.clone()))
            .collect()
    }

    /// Morph progress scalar.
    pub fn progress(&self) -> f32 {
        self.morph.progress()
    }

    /// Whether playback is active.
    pub fn is_playing(&self) -> bool {
        self.morph.is_playing()
    }

    /// Observable morph phase.
    pub fn phase(&self) -> Phase {
        self.morph.phase()
    }

    /// The morph buffers (start/end fields, random offsets, upload flags).
    pub fn buffers(&self) -> &FieldBuffers {
        &self.buffers
    }

    /// Last pointer position projected onto the particle plane.
    pub fn pointer_world(&self) -> Vec3 {
        self.pointer_world
    }

    /// Most recent FPS estimate.
    pub fn fps(&self) -> f32 {
        self.clock.fps()
    }

    /// Pop the oldest pending status event, if any.
    pub fn poll_status(&mut self) -> Option<StatusEvent> {
        self.status.pop_front()
    }

    /// The attached image store, for hosts that need direct access.
    pub fn image_store_mut(&mut self) -> Option<&mut (dyn ImageStore + 'static)> {
        self.image_store.as_deref_mut()
    }

    // ========== Frame loop ==========

    /// Advance one frame.
    ///
    /// Skipped entirely while the view is hidden. Calls
    /// [`Renderer::render`] at most once, and only when something changed
    /// since the last draw.
    pub fn tick(&mut self, renderer: &mut dyn Renderer) {
        if !self.clock.visible() {
            return;
        }
        let now = Instant::now();
        self.clock.tick(now);

        // Time-based touch gesture transitions (long-press promotion,
        // attract pulse expiry).
        if let Some(GestureChange::SetMode(mode)) = self.pointer.poll(now) {
            self.set_pointer_mode(mode);
        }

        if self.morph.is_playing() || self.config.pointer_mode != PointerMode::Off {
            self.anim_time += ANIM_TIME_STEP;
            self.needs_render = true;
        }

        match self.morph.tick(&self.config) {
            MorphTick::Idle => {}
            MorphTick::Advanced | MorphTick::Holding => {
                self.needs_render = true;
            }
            MorphTick::PauseStatus { .. } => {
                self.status.push_back(StatusEvent::Pausing);
                self.needs_render = true;
            }
            MorphTick::SwapRequested => {
                // Swap and progress reset land in this same tick, so no
                // intermediate state is ever rendered.
                self.swap_to_next();
            }
            MorphTick::Finished => {
                self.status.push_back(StatusEvent::Finished);
                self.needs_render = true;
            }
        }

        if self.kinematics.tick(&self.config, self.morph.is_playing()) {
            self.needs_render = true;
        }

        self.pump_reprocessing();

        if self.needs_render {
            let params = RenderParams::snapshot(
                &self.config,
                self.morph.progress(),
                self.anim_time,
                self.pointer_world,
            );
            renderer.render(self.buffers.view(), &self.kinematics.transform(), &params);
            self.buffers.mark_uploaded();
            self.needs_render = false;
        }
    }

    /// Record a visibility change; hidden views skip ticks entirely.
    pub fn set_visible(&mut self, visible: bool) {
        self.clock.set_visible(visible);
        if visible {
            self.needs_render = true;
        }
    }

    /// The drawing surface was resized; the host must also resize its
    /// renderer.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
        self.needs_render = true;
    }

    // ========== Playback ==========

    /// Start or stop the morph. Needs at least two images.
    pub fn toggle_playback(&mut self) -> Result<(), EngineError> {
        let outcome = match self.morph.toggle(self.library.len()) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.status.push_back(StatusEvent::NeedMoreImages {
                    missing: 2usize.saturating_sub(self.library.len()),
                });
                return Err(e);
            }
        };
        match outcome {
            Toggle::Started { immediate_swap } => {
                if immediate_swap {
                    self.swap_to_next();
                }
                self.status.push_back(StatusEvent::Playing);
            }
            Toggle::Stopped => {
                self.status.push_back(StatusEvent::Stopped);
            }
        }
        self.needs_render = true;
        Ok(())
    }

    /// Step to an adjacent image while stopped. No-op during playback or
    /// past either end of the list.
    pub fn navigate(&mut self, delta: i32) -> bool {
        if self.library.is_empty() || self.morph.is_playing() {
            return false;
        }
        if !self.library.navigate(delta) {
            return false;
        }
        self.display_current();
        true
    }

    /// Reset rotation and pivot to the rest transform.
    pub fn reset_view(&mut self) {
        self.kinematics.reset();
        self.status.push_back(StatusEvent::ViewReset);
        self.needs_render = true;
    }

    // ========== Image management ==========

    /// Decode, map, and append an image. Returns its stable id.
    ///
    /// Playback stops so the user sees the collection change. The first
    /// image added becomes the displayed one.
    pub fn add_image(&mut self, bytes: &[u8], name: &str) -> Result<u64, EngineError> {
        self.status.push_back(StatusEvent::Processing {
            name: name.to_string(),
        });

        let raster = match mapper::decode_raster(bytes) {
            Ok(raster) => raster,
            Err(e) => {
                self.status.push_back(StatusEvent::DecodeFailed {
                    name: name.to_string(),
                });
                return Err(e.into());
            }
        };

        self.morph.stop();

        let field = mapper::map_raster(
            &raster,
            &self.camera,
            self.config.image_scale,
            self.config.z_depth,
            self.buffers.capacity(),
            &mut self.rng,
        );
        let id = self.library.allocate_id();
        self.library.push(SourceImage {
            id,
            name: name.to_string(),
            bytes: bytes.to_vec(),
            raster,
            field,
        });

        if let Some(store) = &mut self.image_store {
            if let Err(e) = store.save(id, bytes, name) {
                log::warn!("Failed to persist image '{}': {}", name, e);
            }
        }

        if self.library.len() == 1 {
            self.display_current();
        }
        self.push_readiness();
        Ok(id)
    }

    /// Remove the image at `index`, retiring its id.
    pub fn remove_image(&mut self, index: usize) -> Result<(), EngineError> {
        let removed = self
            .library
            .remove(index)
            .ok_or(EngineError::IndexOutOfRange {
                index,
                len: self.library.len(),
            })?;

        if let Some(store) = &mut self.image_store {
            if let Err(e) = store.delete(removed.id) {
                log::warn!("Failed to delete image '{}' from store: {}", removed.name, e);
            }
        }

        self.morph.stop();
        if self.library.is_empty() {
            self.buffers.clear();
            self.morph.reset();
            self.needs_render = true;
        } else {
            self.display_current();
        }
        self.push_readiness();
        Ok(())
    }

    /// Move the image at `from` to position `to`, preserving the displayed
    /// image, and rebuild the store in the new order.
    pub fn reorder_image(&mut self, from: usize, to: usize) -> Result<(), EngineError> {
        let len = self.library.len();
        if from >= len {
            return Err(EngineError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(EngineError::IndexOutOfRange { index: to, len });
        }
        if !self.library.reorder(from, to) {
            return Ok(());
        }

        // load_all returns insertion order, so order changes require a
        // rebuild from the preserved original bytes.
        if let Some(store) = &mut self.image_store {
            let mut result = store.clear();
            if result.is_ok() {
                for img in self.library.iter() {
                    result = store.save(img.id, &img.bytes, &img.name);
                    if result.is_err() {
                        break;
                    }
                }
            }
            if let Err(e) = result {
                log::warn!("Failed to rebuild image store after reorder: {}", e);
            }
        }

        self.needs_render = true;
        Ok(())
    }

    /// Restore persisted settings and images, if stores are attached.
    ///
    /// Per-image decode failures are logged and skipped; the rest of the
    /// collection still loads.
    pub fn load_persisted(&mut self) {
        if let Some(store) = &mut self.settings_store {
            match store.load() {
                Ok(Some(mut config)) => {
                    config.clamp_ranges();
                    self.config = config;
                }
                Ok(None) => {}
                Err(e) => log::warn!("Failed to load settings: {}", e),
            }
        }

        let records = match &mut self.image_store {
            Some(store) => match store.load_all() {
                Ok(records) => records,
                Err(e) => {
                    log::warn!("Failed to load stored images: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        for record in records {
            match mapper::decode_raster(&record.bytes) {
                Ok(raster) => {
                    let field = mapper::map_raster(
                        &raster,
                        &self.camera,
                        self.config.image_scale,
                        self.config.z_depth,
                        self.buffers.capacity(),
                        &mut self.rng,
                    );
                    self.library.push(SourceImage {
                        id: record.id,
                        name: record.name,
                        bytes: record.bytes,
                        raster,
                        field,
                    });
                }
                Err(e) => {
                    log::warn!("Failed to decode stored image '{}': {}", record.name, e);
                    self.status.push_back(StatusEvent::DecodeFailed {
                        name: record.name,
                    });
                }
            }
        }

        if !self.library.is_empty() {
            self.library.set_current(0);
            self.display_current();
        }
        self.push_readiness();
    }

    // ========== Configuration ==========

    /// Mutate the configuration through a closure.
    ///
    /// Every numeric field is re-clamped afterwards; scale-affecting
    /// changes queue a reprocessing pass over all stored images; the result
    /// is persisted when a settings store is attached.
    pub fn update_config(&mut self, mutate: impl FnOnce(&mut Config)) {
        let old = self.config.clone();
        mutate(&mut self.config);
        self.config.clamp_ranges();

        if self.config == old {
            return;
        }
        self.needs_render = true;

        if self.config.invalidates_fields(&old) {
            // Rotate the batch so the displayed image is remapped on the
            // very next tick, whatever its position in the list.
            let mut ids = self.library.ids();
            if !ids.is_empty() {
                ids.rotate_left(self.library.current_index());
            }
            self.reprocessor.request(ids);
        }

        if let Some(store) = &mut self.settings_store {
            if let Err(e) = store.save(&self.config) {
                log::warn!("Failed to persist settings: {}", e);
            }
        }
    }

    /// Apply a named visual preset.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.update_config(|config| preset.apply(config));
    }

    // ========== Pointer input ==========

    /// Mouse moved over the view; throttled to ~30 updates/second.
    pub fn mouse_moved(&mut self, device_x: f32, device_y: f32, rect: ViewRect) {
        let now = Instant::now();
        if let Some(world) = self
            .pointer
            .mouse_move(now, device_x, device_y, rect, &self.camera)
        {
            self.pointer_world = world;
            if self.config.pointer_mode != PointerMode::Off {
                self.needs_render = true;
            }
        }
    }

    /// A touch press began.
    pub fn touch_started(&mut self, device_x: f32, device_y: f32, rect: ViewRect) {
        self.pointer.touch_start(Instant::now());
        self.update_touch_position(device_x, device_y, rect);
    }

    /// A touch moved; movement cancels the pending long press.
    pub fn touch_moved(&mut self, device_x: f32, device_y: f32, rect: ViewRect) {
        self.pointer.touch_move();
        self.update_touch_position(device_x, device_y, rect);
    }

    /// A touch press ended.
    pub fn touch_ended(&mut self) {
        if let Some(GestureChange::SetMode(mode)) = self.pointer.touch_end(Instant::now()) {
            self.set_pointer_mode(mode);
        }
    }

    // ========== Internals ==========

    fn update_touch_position(&mut self, device_x: f32, device_y: f32, rect: ViewRect) {
        if let Some(world) = crate::pointer::project(device_x, device_y, rect, &self.camera) {
            self.pointer_world = world;
            if self.config.pointer_mode != PointerMode::Off {
                self.needs_render = true;
            }
        }
    }

    fn set_pointer_mode(&mut self, mode: PointerMode) {
        if self.config.pointer_mode != mode {
            self.config.pointer_mode = mode;
            self.needs_render = true;
        }
    }

    /// Show the current image statically (both buffers, progress settled).
    fn display_current(&mut self) {
        if let Some(image) = self.library.current() {
            self.buffers.set_displayed(&image.field);
            self.morph.settle();
            self.needs_render = true;
        }
    }

    /// Load the current and next images into the morph buffers and advance
    /// the cursor. No-op with fewer than two images.
    fn swap_to_next(&mut self) {
        if self.library.len() < 2 {
            return;
        }
        let to_index = self.library.next_index();
        let (Some(from), Some(to)) = (
            self.library.current(),
            self.library.get(to_index),
        ) else {
            return;
        };
        self.buffers.swap(&from.field, &to.field);
        self.library.set_current(to_index);
        self.morph.on_swapped();
        self.needs_render = true;
    }

    /// Run at most one queued reprocessing item, keeping the tick bounded.
    fn pump_reprocessing(&mut self) {
        let Some(item) = self.reprocessor.next() else {
            return;
        };
        // The image may have been removed while the batch was queued.
        let Some((index, image)) = self.library.find_by_id(item.image_id) else {
            return;
        };

        let field = mapper::map_raster(
            &image.raster,
            &self.camera,
            self.config.image_scale,
            self.config.z_depth,
            self.buffers.capacity(),
            &mut self.rng,
        );

        // A superseding request invalidates this item; drop the result
        // without touching shared state.
        if !self.reprocessor.is_live(&item) {
            return;
        }
        if let Some(image) = self.library.find_by_id_mut(item.image_id) {
            image.field = field;
        }

        // Progressive feedback: refresh the display as soon as the visible
        // image is done, without waiting for the rest of the batch.
        if index == self.library.current_index() && !self.morph.is_playing() {
            self.display_current();
        }
    }

    fn push_readiness(&mut self) {
        let len = self.library.len();
        if len < 2 {
            self.status
                .push_back(StatusEvent::NeedMoreImages { missing: 2 - len });
        } else {
            self.status.push_back(StatusEvent::Ready);
        }
    }
}

impl Default for MorphEngine {
    fn default() -> Self {
        Self::new()
    }
}
