use alloc::vec::Vec;

use masonry_grid::RenderRange;

/// Turns render ranges into "load more" requests for data that is not there yet.
///
/// Wire [`InfiniteLoader::on_render`] to the grid's `on_render` output (or to the range returned
/// by `Masonry::render`). Each call widens the rendered range by `threshold`, scans it for
/// unloaded items, and reports them as inclusive `(start, stop)` ranges of at least
/// `minimum_batch_size` items where possible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfiniteLoader {
    pub minimum_batch_size: usize,
    pub threshold: usize,
    /// Upper bound on the number of items that can ever be loaded.
    pub total_items: usize,
}

impl Default for InfiniteLoader {
    fn default() -> Self {
        Self {
            minimum_batch_size: 16,
            threshold: 16,
            total_items: usize::MAX,
        }
    }
}

impl InfiniteLoader {
    pub fn new(total_items: usize) -> Self {
        Self {
            total_items,
            ..Self::default()
        }
    }

    pub fn with_minimum_batch_size(mut self, minimum_batch_size: usize) -> Self {
        self.minimum_batch_size = minimum_batch_size;
        self
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_total_items(mut self, total_items: usize) -> Self {
        self.total_items = total_items;
        self
    }

    /// Requests every unloaded range around `range`.
    pub fn on_render(
        &self,
        range: RenderRange,
        mut is_loaded: impl FnMut(usize) -> bool,
        mut load_more: impl FnMut(usize, usize),
    ) {
        let Some(last) = self.total_items.checked_sub(1) else {
            return;
        };
        let start = range.start_index.saturating_sub(self.threshold);
        let stop = range.stop_index.saturating_add(self.threshold).min(last);
        for (lo, hi) in self.scan(start, stop, &mut is_loaded) {
            mdebug!(start = lo, stop = hi, "load_more");
            load_more(lo, hi);
        }
    }

    /// Finds the unloaded inclusive ranges in `start..=stop`.
    ///
    /// A range still open at `stop` is extended forward (up to `total_items - 1`) and the first
    /// range is extended backward, both only over unloaded items, until they reach
    /// `minimum_batch_size`.
    pub fn scan(
        &self,
        start: usize,
        stop: usize,
        mut is_loaded: impl FnMut(usize) -> bool,
    ) -> Vec<(usize, usize)> {
        let mut ranges = Vec::new();
        let mut open: Option<(usize, usize)> = None;

        for index in start..=stop {
            if !is_loaded(index) {
                open = Some(match open {
                    Some((lo, _)) => (lo, index),
                    None => (index, index),
                });
            } else if let Some(done) = open.take() {
                ranges.push(done);
            }
        }

        if let Some((lo, mut hi)) = open {
            let batch_end = lo.saturating_add(self.minimum_batch_size.saturating_sub(1));
            let limit = hi
                .max(batch_end)
                .min(self.total_items.saturating_sub(1));
            while hi < limit && !is_loaded(hi + 1) {
                hi += 1;
            }
            ranges.push((lo, hi));
        }

        if let Some((lo, hi)) = ranges.first_mut() {
            while *hi - *lo + 1 < self.minimum_batch_size && *lo > 0 && !is_loaded(*lo - 1) {
                *lo -= 1;
            }
        }

        ranges
    }
}
