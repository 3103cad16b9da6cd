//! Image-to-point-field mapping.
//!
//! Converts a decoded RGBA raster into a fixed-capacity [`PointField`]:
//! every sufficiently opaque pixel becomes one point, centered on the
//! content's bounding box and uniformly scaled to fit the camera's world
//! viewport. Slots left over (or pixels beyond capacity) are sentinel.
//!
//! The mapping is deliberately forgiving: an image with no opaque pixels
//! maps to an all-sentinel field rather than an error, and oversized inputs
//! are downscaled before scanning to bound the per-pixel cost.

use crate::camera::Camera;
use crate::error::DecodeError;
use crate::field::PointField;
use image::{imageops, RgbaImage};
use rand::Rng;

/// Longest allowed raster edge; larger inputs are downscaled to this.
pub const MAX_IMAGE_DIMENSION: u32 = 1000;

/// Alpha cutoff separating content pixels from background.
const ALPHA_THRESHOLD: u8 = 128;

/// Decode raw image bytes into an RGBA raster, downscaling if oversized.
///
/// Downscaling preserves aspect ratio and happens before any pixel scan so
/// mapping cost stays bounded regardless of input size.
pub fn decode_raster(bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
    let raster = image::load_from_memory(bytes)?.into_rgba8();
    Ok(bound_dimensions(raster))
}

/// Downscale a raster so its longest edge fits [`MAX_IMAGE_DIMENSION`].
pub fn bound_dimensions(raster: RgbaImage) -> RgbaImage {
    let (w, h) = raster.dimensions();
    if w <= MAX_IMAGE_DIMENSION && h <= MAX_IMAGE_DIMENSION {
        return raster;
    }
    let ratio = (MAX_IMAGE_DIMENSION as f32 / w as f32).min(MAX_IMAGE_DIMENSION as f32 / h as f32);
    let new_w = ((w as f32 * ratio) as u32).max(1);
    let new_h = ((h as f32 * ratio) as u32).max(1);
    imageops::resize(&raster, new_w, new_h, imageops::FilterType::Triangle)
}

/// Map a raster into a point field fitted to the camera's viewport.
///
/// The content bounding box (pixels with alpha above the threshold) is
/// centered at the origin and scaled by
/// `min(viewport_w / content_w, viewport_h / content_h) * image_scale`,
/// preserving aspect ratio. Raster Y grows downward, world Y upward, so Y is
/// flipped. Each point gets a depth jitter in `[-z_depth/2, z_depth/2]`.
///
/// Always returns exactly `capacity` points; qualifying pixels beyond
/// capacity are dropped in raster scan order.
pub fn map_raster(
    raster: &RgbaImage,
    camera: &Camera,
    image_scale: f32,
    z_depth: f32,
    capacity: usize,
    rng: &mut impl Rng,
) -> PointField {
    let mut field = PointField::new(capacity);
    let (width, height) = raster.dimensions();
    let pixels = raster.as_raw();

    // Content bounds over sufficiently opaque pixels.
    let mut min_x = width;
    let mut max_x = 0;
    let mut min_y = height;
    let mut max_y = 0;
    let mut found = false;
    for y in 0..height {
        for x in 0..width {
            let a = pixels[((y * width + x) * 4 + 3) as usize];
            if a > ALPHA_THRESHOLD {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
                found = true;
            }
        }
    }

    // Fully transparent image: nothing to place.
    if !found {
        return field;
    }

    let content_w = (max_x - min_x).max(1) as f32;
    let content_h = (max_y - min_y).max(1) as f32;
    let viewport = camera.world_viewport();
    let scale = (viewport.x / content_w).min(viewport.y / content_h) * image_scale;
    let center_x = min_x as f32 + content_w / 2.0;
    let center_y = min_y as f32 + content_h / 2.0;

    let mut slot = 0;
    'scan: for y in 0..height {
        for x in 0..width {
            let i = ((y * width + x) * 4) as usize;
            if pixels[i + 3] < ALPHA_THRESHOLD {
                continue;
            }
            if slot >= capacity {
                break 'scan;
            }
            let jitter = (rng.gen::<f32>() - 0.5) * z_depth;
            field.set_point(
                slot,
                [
                    (x as f32 - center_x) * scale,
                    -(y as f32 - center_y) * scale,
                    jitter,
                ],
                [
                    pixels[i] as f32 / 255.0,
                    pixels[i + 1] as f32 / 255.0,
                    pixels[i + 2] as f32 / 255.0,
                ],
            );
            slot += 1;
        }
    }

    field
}
