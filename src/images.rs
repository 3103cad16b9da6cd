//! Ordered collection of source images and their cached point fields.
//!
//! Each [`SourceImage`] keeps its decoded raster alive so scale-affecting
//! configuration changes can re-run the mapper without re-decoding. Ids are
//! monotonically increasing and never reused, even after removal, so the
//! persistent store can key on them across sessions.

use crate::field::PointField;
use image::RgbaImage;

/// One user-supplied image: decoded raster, cached field, stable identity.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Stable identifier, assigned at add time and never reused.
    pub id: u64,
    /// Display name (usually the original file name).
    pub name: String,
    /// Original encoded bytes, preserved exactly for the store.
    pub bytes: Vec<u8>,
    /// Decoded raster, retained for reprocessing.
    pub raster: RgbaImage,
    /// Cached point field from the last mapping pass.
    pub field: PointField,
}

/// Insertion-ordered image collection with a cursor on the current image.
///
/// The cursor ("current index") is the morph's "from" image. It is repaired
/// on removal and reordering so it stays valid whenever the collection is
/// non-empty.
#[derive(Debug, Default)]
pub struct ImageLibrary {
    images: Vec<SourceImage>,
    current: usize,
    next_id: u64,
}

impl ImageLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Index of the current ("from") image.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The current image, if any.
    pub fn current(&self) -> Option<&SourceImage> {
        self.images.get(self.current)
    }

    /// Image at `index`.
    pub fn get(&self, index: usize) -> Option<&SourceImage> {
        self.images.get(index)
    }

    /// Mutable image at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut SourceImage> {
        self.images.get_mut(index)
    }

    /// Find an image by its stable id.
    pub fn find_by_id(&self, id: u64) -> Option<(usize, &SourceImage)> {
        self.images
            .iter()
            .enumerate()
            .find(|(_, img)| img.id == id)
    }

    /// Mutable lookup by stable id.
    pub fn find_by_id_mut(&mut self, id: u64) -> Option<&mut SourceImage> {
        self.images.iter_mut().find(|img| img.id == id)
    }

    /// Ids of every image in order.
    pub fn ids(&self) -> Vec<u64> {
        self.images.iter().map(|img| img.id).collect()
    }

    /// Iterate over the images in order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceImage> {
        self.images.iter()
    }

    /// Allocate the next stable id.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append an image. Ids restored from storage bump the allocator so
    /// fresh ids never collide with persisted ones.
    pub fn push(&mut self, image: SourceImage) {
        if image.id >= self.next_id {
            self.next_id = image.id + 1;
        }
        self.images.push(image);
    }

    /// Remove the image at `index`, repairing the cursor.
    ///
    /// Removing an image before the cursor shifts the cursor down with it,
    /// so the displayed image stays the same; removing the current or a
    /// later image clamps the cursor into range.
    ///
    /// Returns the removed image, or `None` if the index is out of range.
    /// The removed id is retired, never reissued.
    pub fn remove(&mut self, index: usize) -> Option<SourceImage> {
        if index >= self.images.len() {
            return None;
        }
        let removed = self.images.remove(index);
        if index < self.current {
            self.current -= 1;
        } else if self.current >= self.images.len() {
            self.current = self.images.len().saturating_sub(1);
        }
        Some(removed)
    }

    /// Move the image at `from` to position `to`, keeping the cursor on the
    /// same image it pointed at before the move.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.images.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let moved = self.images.remove(from);
        self.images.insert(to, moved);

        if self.current == from {
            self.current = to;
        } else if from < self.current && to >= self.current {
            self.current -= 1;
        } else if from > self.current && to <= self.current {
            self.current += 1;
        }
        true
    }

    /// Point the cursor at `index`.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Index following the cursor, wrapping at the end of the list.
    pub fn next_index(&self) -> usize {
        if self.images.is_empty() {
            0
        } else {
            (self.current + 1) % self.images.len()
        }
    }

    /// Move the cursor by `delta` positions, stopping at either end.
    ///
    /// Returns `true` if the cursor actually moved.
    pub fn navigate(&mut self, delta: i32) -> bool {
        let target = self.current as i64 + delta as i64;
        if target < 0 || target >= self.images.len() as i64 {
            return false;
        }
        self.current = target as usize;
        true
    }
}
