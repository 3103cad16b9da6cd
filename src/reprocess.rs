//! Cancellable reprocessing of stored images.
//!
//! When a scale-affecting setting changes, every stored image must be run
//! back through the mapper. The coordinator queues the batch and hands out
//! one work item at a time so the tick loop never blocks; a new request
//! supersedes the old one by bumping a generation counter, and completions
//! carrying a stale generation are dropped before any write-back.
//!
//! Partially updated batches are acceptable; there is no rollback.

use std::collections::VecDeque;

/// One pending image remap, tagged with the generation that queued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    /// Generation the item belongs to.
    pub generation: u64,
    /// Stable id of the image to remap.
    pub image_id: u64,
}

/// Sequential, generation-counted reprocessing queue.
#[derive(Debug, Default)]
pub struct Reprocessor {
    generation: u64,
    pending: VecDeque<u64>,
}

impl Reprocessor {
    /// Create an idle coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fresh batch, superseding and cancelling any in-flight one.
    ///
    /// Returns the new generation. Work items from earlier generations fail
    /// [`Self::is_live`] from this point on.
    pub fn request(&mut self, image_ids: impl IntoIterator<Item = u64>) -> u64 {
        self.generation += 1;
        self.pending = image_ids.into_iter().collect();
        self.generation
    }

    /// Cancel the in-flight batch without starting a new one.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending.clear();
    }

    /// Take the next work item, if any.
    pub fn next(&mut self) -> Option<WorkItem> {
        let image_id = self.pending.pop_front()?;
        Some(WorkItem {
            generation: self.generation,
            image_id,
        })
    }

    /// Whether a work item's generation is still current.
    ///
    /// Checked immediately before write-back; stale items are dropped
    /// silently rather than treated as errors.
    pub fn is_live(&self, item: &WorkItem) -> bool {
        item.generation == self.generation
    }

    /// Whether any items remain queued.
    pub fn in_flight(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_drain_in_order() {
        let mut rp = Reprocessor::new();
        rp.request([3, 1, 2]);

        assert_eq!(rp.next().map(|w| w.image_id), Some(3));
        assert_eq!(rp.next().map(|w| w.image_id), Some(1));
        assert_eq!(rp.next().map(|w| w.image_id), Some(2));
        assert_eq!(rp.next(), None);
        assert!(!rp.in_flight());
    }

    #[test]
    fn test_new_request_supersedes_in_flight() {
        let mut rp = Reprocessor::new();
        rp.request([10, 11, 12]);
        let first = rp.next().unwrap();
        assert!(rp.is_live(&first));

        rp.request([20]);
        // The already-issued item from the first batch is now stale and its
        // write-back must be dropped.
        assert!(!rp.is_live(&first));

        // Remaining first-batch items are gone from the queue entirely.
        let second = rp.next().unwrap();
        assert_eq!(second.image_id, 20);
        assert!(rp.is_live(&second));
        assert_eq!(rp.next(), None);
    }

    #[test]
    fn test_cancel_invalidates_without_refill() {
        let mut rp = Reprocessor::new();
        rp.request([1, 2]);
        let item = rp.next().unwrap();

        rp.cancel();
        assert!(!rp.is_live(&item));
        assert_eq!(rp.next(), None);
    }
}
