//! Fixed-capacity point fields and the start/end morph buffers.
//!
//! A [`PointField`] holds the positions and colors of every renderable point
//! for one image, structure-of-arrays style. Fields are always fully
//! populated: slots with no backing pixel carry the sentinel position far
//! behind the camera so the renderer never reads undefined data and never
//! needs a per-frame point count.
//!
//! [`FieldBuffers`] owns the start/end pair the morph interpolates between,
//! plus the per-point random offsets used for the stagger effect. Every
//! mutation raises per-buffer upload flags the renderer consumes.

use rand::Rng;

/// Default point capacity for fields and buffers.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// Z position for unused point slots, far outside the view frustum.
pub const SENTINEL_Z: f32 = -10_000.0;

/// A fixed-capacity point cloud: `capacity` positions and colors.
///
/// Positions and colors are interleaved-free flat arrays with 3 floats per
/// point. Colors are in `[0, 1]`. Allocated once, mutated in place, never
/// resized.
#[derive(Debug, Clone, PartialEq)]
pub struct PointField {
    capacity: usize,
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl PointField {
    /// Create an all-sentinel field with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let mut field = Self {
            capacity,
            positions: vec![0.0; capacity * 3],
            colors: vec![0.0; capacity * 3],
        };
        field.fill_sentinel(0);
        field
    }

    /// Number of point slots (always fully populated).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Flat position array, 3 floats per point.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat color array, 3 floats per point, each in `[0, 1]`.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Write one point's position and color.
    pub fn set_point(&mut self, index: usize, position: [f32; 3], color: [f32; 3]) {
        let i = index * 3;
        self.positions[i..i + 3].copy_from_slice(&position);
        self.colors[i..i + 3].copy_from_slice(&color);
    }

    /// Overwrite every slot from `start` onward with the sentinel.
    pub fn fill_sentinel(&mut self, start: usize) {
        for slot in start..self.capacity {
            self.set_point(slot, [0.0, 0.0, SENTINEL_Z], [0.0, 0.0, 0.0]);
        }
    }

    /// Whether the slot at `index` holds the sentinel.
    pub fn is_sentinel(&self, index: usize) -> bool {
        self.positions[index * 3 + 2] == SENTINEL_Z
    }

    /// Number of leading slots backed by actual image content.
    ///
    /// Sentinel padding always trails the live points, so this scans from
    /// the back.
    pub fn live_count(&self) -> usize {
        (0..self.capacity)
            .rev()
            .find(|&i| !self.is_sentinel(i))
            .map_or(0, |i| i + 1)
    }
}

/// Which GPU-side buffers need re-upload after a mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadFlags {
    /// Start positions changed.
    pub start_positions: bool,
    /// End positions changed.
    pub end_positions: bool,
    /// Start colors changed.
    pub start_colors: bool,
    /// End colors changed.
    pub end_colors: bool,
}

impl UploadFlags {
    const ALL: Self = Self {
        start_positions: true,
        end_positions: true,
        start_colors: true,
        end_colors: true,
    };

    /// Whether any buffer needs re-upload.
    pub fn any(&self) -> bool {
        self.start_positions || self.end_positions || self.start_colors || self.end_colors
    }
}

/// The morph's start/end buffer pair plus per-point random offsets.
///
/// This is the only channel between the engine and the renderer's particle
/// geometry. Operations are no-ops when their preconditions are unmet and
/// never return errors.
#[derive(Debug)]
pub struct FieldBuffers {
    capacity: usize,
    start: PointField,
    end: PointField,
    /// Per-point random values in `[0, 1)` for the stagger effect.
    random_offsets: Vec<f32>,
    flags: UploadFlags,
}

impl FieldBuffers {
    /// Allocate buffers at fixed capacity with freshly rolled offsets.
    pub fn new(capacity: usize, rng: &mut impl Rng) -> Self {
        let random_offsets = (0..capacity).map(|_| rng.gen::<f32>()).collect();
        Self {
            capacity,
            start: PointField::new(capacity),
            end: PointField::new(capacity),
            random_offsets,
            flags: UploadFlags::ALL,
        }
    }

    /// Buffer capacity in points.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The morph's "from" field.
    pub fn start(&self) -> &PointField {
        &self.start
    }

    /// The morph's "to" field.
    pub fn end(&self) -> &PointField {
        &self.end
    }

    /// Per-point random offsets in `[0, 1)`.
    pub fn random_offsets(&self) -> &[f32] {
        &self.random_offsets
    }

    /// Show a single field statically: both buffers take the same content.
    pub fn set_displayed(&mut self, field: &PointField) {
        self.start.clone_from(field);
        self.end.clone_from(field);
        self.flags = UploadFlags::ALL;
    }

    /// Load a morph pair: `from` into the start buffers, `to` into the end.
    pub fn swap(&mut self, from: &PointField, to: &PointField) {
        self.start.clone_from(from);
        self.end.clone_from(to);
        self.flags = UploadFlags::ALL;
    }

    /// Reset both buffers to all-sentinel.
    pub fn clear(&mut self) {
        self.start.fill_sentinel(0);
        self.end.fill_sentinel(0);
        self.flags = UploadFlags::ALL;
    }

    /// Buffers that changed since the last [`Self::mark_uploaded`].
    pub fn upload_flags(&self) -> UploadFlags {
        self.flags
    }

    /// Acknowledge that the renderer has consumed the current buffers.
    pub fn mark_uploaded(&mut self) {
        self.flags = UploadFlags::default();
    }

    /// Start positions as raw bytes for GPU upload.
    pub fn start_position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.start.positions())
    }

    /// End positions as raw bytes for GPU upload.
    pub fn end_position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.end.positions())
    }
}
