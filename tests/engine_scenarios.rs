//! Integration tests driving [`MorphEngine`] through full user scenarios:
//! image lifecycle, loop playback with pause cadence, configuration-driven
//! reprocessing, and persistence round-trips.

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use image::{ImageFormat, Rgba, RgbaImage};
use pointmorph::morph::Phase;
use pointmorph::prelude::*;
use pointmorph::storage::StoredImage;
use pointmorph::{RotationTransform, StorageError};

// ============================================================================
// Fixtures
// ============================================================================

/// Renderer that accepts and discards every frame; these scenarios only
/// observe engine state.
#[derive(Default)]
struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(
        &mut self,
        _fields: FieldView<'_>,
        _transform: &RotationTransform,
        _params: &RenderParams,
    ) {
    }

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn dispose(&mut self) {}
}

/// [`ImageStore`] handle that survives the engine it is attached to, so a
/// second engine can restore from the same backing data.
#[derive(Clone, Default)]
struct SharedImageStore(Rc<RefCell<MemoryImageStore>>);

impl ImageStore for SharedImageStore {
    fn load_all(&mut self) -> Result<Vec<StoredImage>, StorageError> {
        self.0.borrow_mut().load_all()
    }

    fn save(&mut self, id: u64, bytes: &[u8], name: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().save(id, bytes, name)
    }

    fn delete(&mut self, id: u64) -> Result<(), StorageError> {
        self.0.borrow_mut().delete(id)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.0.borrow_mut().clear()
    }
}

#[derive(Clone, Default)]
struct SharedSettingsStore(Rc<RefCell<MemorySettingsStore>>);

impl SettingsStore for SharedSettingsStore {
    fn load(&mut self) -> Result<Option<Config>, StorageError> {
        self.0.borrow_mut().load()
    }

    fn save(&mut self, config: &Config) -> Result<(), StorageError> {
        self.0.borrow_mut().save(config)
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn png_bytes(color: [u8; 4]) -> Vec<u8> {
    let raster = RgbaImage::from_pixel(4, 4, Rgba(color));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(raster)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn engine_with_images(count: usize) -> MorphEngine {
    init_logging();
    let mut engine = MorphEngine::with_capacity(256);
    engine.handle_resize(800, 600);
    for i in 0..count {
        let shade = 40 + (i as u8) * 50;
        engine
            .add_image(&png_bytes([shade, 255 - shade, 0, 255]), &format!("img{}", i))
            .unwrap();
    }
    engine
}

/// Speed the loop up so a full morph-and-pause leg fits in a few ticks.
fn fast_loop(engine: &mut MorphEngine, pause_ticks: u32) {
    engine.update_config(|c| {
        c.morph_speed = 0.1;
        c.pause_duration = pause_ticks;
    });
}

/// Tick until the displayed image changes, returning the statuses seen.
/// Panics if no swap happens within `limit` ticks.
fn tick_until_swap(engine: &mut MorphEngine, limit: usize) -> Vec<StatusEvent> {
    let mut renderer = NullRenderer;
    let before = engine.current_index();
    let mut statuses = Vec::new();
    for _ in 0..limit {
        engine.tick(&mut renderer);
        while let Some(event) = engine.poll_status() {
            statuses.push(event);
        }
        if engine.current_index() != before {
            return statuses;
        }
    }
    panic!("no swap within {} ticks", limit);
}

// ============================================================================
// Image Lifecycle
// ============================================================================

#[test]
fn test_three_image_cycle_advances_in_order() {
    let mut engine = engine_with_images(3);
    fast_loop(&mut engine, 10);

    assert_eq!(engine.current_index(), 0);

    // Starting from a settled frame swaps immediately to image 1.
    engine.toggle_playback().unwrap();
    assert_eq!(engine.current_index(), 1);

    tick_until_swap(&mut engine, 100);
    assert_eq!(engine.current_index(), 2);

    // The cycle wraps back to the first image.
    tick_until_swap(&mut engine, 100);
    assert_eq!(engine.current_index(), 0);
}

#[test]
fn test_remove_current_clamps_cursor() {
    let mut engine = engine_with_images(3);
    engine.navigate(1);
    engine.navigate(1);
    assert_eq!(engine.current_index(), 2);

    engine.remove_image(2).unwrap();
    assert_eq!(engine.image_count(), 2);
    assert_eq!(engine.current_index(), 1);
    // The remaining current image is shown settled.
    assert_eq!(engine.progress(), 1.0);
}

#[test]
fn test_add_image_stops_playback() {
    let mut engine = engine_with_images(2);
    fast_loop(&mut engine, 10);
    engine.toggle_playback().unwrap();
    assert!(engine.is_playing());

    engine.add_image(&png_bytes([10, 20, 30, 255]), "img2").unwrap();
    assert!(!engine.is_playing());
    assert_eq!(engine.image_count(), 3);
}

// ============================================================================
// Playback
// ============================================================================

#[test]
fn test_pause_status_cadence() {
    let mut engine = engine_with_images(2);
    fast_loop(&mut engine, 120);

    engine.toggle_playback().unwrap();
    let statuses = tick_until_swap(&mut engine, 500);

    // The pause window announces itself every 30 held ticks: at 30, 60,
    // and 90 of a 120-tick window. The swap tick itself never announces.
    let pausing = statuses
        .iter()
        .filter(|s| matches!(s, StatusEvent::Pausing))
        .count();
    assert_eq!(pausing, 3);
}

#[test]
fn test_single_shot_finishes_on_held_frame() {
    let mut engine = engine_with_images(2);
    let mut renderer = NullRenderer;
    engine.update_config(|c| {
        c.morph_speed = 0.1;
        c.loop_mode = false;
    });

    engine.toggle_playback().unwrap();
    let mut finished = false;
    for _ in 0..100 {
        engine.tick(&mut renderer);
        while let Some(event) = engine.poll_status() {
            if event == StatusEvent::Finished {
                finished = true;
            }
        }
        if finished {
            break;
        }
    }

    assert!(finished);
    assert!(!engine.is_playing());
    assert_eq!(engine.phase(), Phase::Finished);
    assert!(engine.progress() >= 1.0);

    // The held frame is stable; nothing animates afterwards.
    let progress = engine.progress();
    engine.tick(&mut renderer);
    assert_eq!(engine.progress(), progress);
}

#[test]
fn test_stop_freezes_progress() {
    let mut engine = engine_with_images(2);
    let mut renderer = NullRenderer;
    fast_loop(&mut engine, 10);

    engine.toggle_playback().unwrap();
    engine.tick(&mut renderer);
    engine.tick(&mut renderer);
    let progress = engine.progress();
    assert!(progress > 0.0);

    engine.toggle_playback().unwrap();
    engine.tick(&mut renderer);
    engine.tick(&mut renderer);
    assert_eq!(engine.progress(), progress);
}

// ============================================================================
// Reprocessing
// ============================================================================

/// Largest |x| over live points, ignoring parked sentinel slots.
fn live_extent_x(engine: &MorphEngine) -> f32 {
    let field = engine.buffers().start();
    let mut extent = 0.0f32;
    for index in 0..field.capacity() {
        if field.is_sentinel(index) {
            continue;
        }
        extent = extent.max(field.positions()[index * 3].abs());
    }
    extent
}

#[test]
fn test_scale_change_rescales_displayed_image() {
    let mut engine = engine_with_images(2);
    let mut renderer = NullRenderer;
    let before = live_extent_x(&engine);
    assert!(before > 0.0);

    engine.update_config(|c| c.image_scale = 0.45);
    // One queued image per tick; two ticks drain the batch.
    engine.tick(&mut renderer);
    engine.tick(&mut renderer);

    let after = live_extent_x(&engine);
    let ratio = after / before;
    assert!((ratio - 0.5).abs() < 1e-3, "extent ratio {}", ratio);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_persistence_round_trip() {
    init_logging();
    let images = SharedImageStore::default();
    let settings = SharedSettingsStore::default();

    let mut first = MorphEngine::with_capacity(256)
        .with_image_store(images.clone())
        .with_settings_store(settings.clone());
    first.handle_resize(800, 600);
    let id_a = first.add_image(&png_bytes([200, 0, 0, 255]), "a.png").unwrap();
    let id_b = first.add_image(&png_bytes([0, 200, 0, 255]), "b.png").unwrap();
    first.update_config(|c| c.point_size = 7.0);
    drop(first);

    let mut second = MorphEngine::with_capacity(256)
        .with_image_store(images)
        .with_settings_store(settings);
    second.handle_resize(800, 600);
    second.load_persisted();

    assert_eq!(second.image_count(), 2);
    assert_eq!(second.config().point_size, 7.0);
    assert_eq!(second.current_index(), 0);
    assert_eq!(second.progress(), 1.0);

    let listed: Vec<u64> = second.image_list().iter().map(|(id, _)| *id).collect();
    assert_eq!(listed, vec![id_a, id_b]);

    // Ids allocated after a restore never collide with restored ones.
    let id_c = second.add_image(&png_bytes([0, 0, 200, 255]), "c.png").unwrap();
    assert!(id_c > id_b);
}

#[test]
fn test_reorder_rebuilds_store_order() {
    init_logging();
    let images = SharedImageStore::default();
    let mut engine = MorphEngine::with_capacity(256).with_image_store(images.clone());
    engine.handle_resize(800, 600);
    for i in 0..3u8 {
        engine
            .add_image(&png_bytes([i * 80, 0, 0, 255]), &format!("img{}", i))
            .unwrap();
    }

    engine.reorder_image(0, 2).unwrap();
    let library_ids: Vec<u64> = engine.image_list().iter().map(|(id, _)| *id).collect();

    let stored_ids: Vec<u64> = images
        .0
        .borrow_mut()
        .load_all()
        .unwrap()
        .iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(stored_ids, library_ids);
}

#[test]
fn test_corrupt_stored_image_is_skipped() {
    init_logging();
    let images = SharedImageStore::default();
    images.0.borrow_mut().save(1, &png_bytes([9, 9, 9, 255]), "good").unwrap();
    images.0.borrow_mut().save(2, &[0xba, 0xad], "bad").unwrap();

    let mut engine = MorphEngine::with_capacity(256).with_image_store(images);
    engine.handle_resize(800, 600);
    engine.load_persisted();

    assert_eq!(engine.image_count(), 1);
    let mut saw_failure = false;
    while let Some(event) = engine.poll_status() {
        if matches!(event, StatusEvent::DecodeFailed { .. }) {
            saw_failure = true;
        }
    }
    assert!(saw_failure);
}
