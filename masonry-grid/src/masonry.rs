use alloc::collections::{BTreeMap, VecDeque};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::{cmp, mem};

use crate::cache::MeasurementCache;
use crate::key::KeyCacheKey;
use crate::{
    Align, ColumnLayout, ColumnOptions, FrameState, ItemKey, LayoutPhase,
    LayoutTask, LayoutTrigger, MasonryCell, MasonryError, MasonryOptions, PlacedCell, Positioner,
    Rect, RenderRange, ScrollDirection, ScrollState, UnmeasuredCell, ViewportState,
    compute_columns,
};

/// A headless virtualized masonry grid.
///
/// The grid renders in two phases. Items with a known height are placed absolutely from the
/// positioner (phase two). When the viewport reaches past the shortest column, a batch of
/// unmeasured items is emitted for off-screen measurement (phase one); their heights come back
/// through [`Masonry::measure`] and they join phase two on the next pass.
///
/// Re-measured heights of placed items are queued and applied in one positioner update by
/// [`Masonry::flush`], which adapters call once per frame.
#[derive(Clone, Debug)]
pub struct Masonry<K = ItemKey> {
    options: MasonryOptions<K>,
    layout: ColumnLayout,
    positioner: Positioner,

    scroll_offset: u64,
    scroll_rect: Rect,
    is_scrolling: bool,
    scroll_direction: Option<ScrollDirection>,
    last_scroll_event_ms: Option<u64>,

    phase: LayoutPhase,
    tasks: VecDeque<LayoutTask>,
    /// Re-measurements of placed items, applied on flush.
    pending_updates: BTreeMap<usize, u32>,
    /// First measurements that arrived ahead of the next unplaced index.
    pending_sets: BTreeMap<usize, u32>,
    cache: MeasurementCache<K>,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl<K: KeyCacheKey + Clone> Masonry<K> {
    /// Creates a new grid from options.
    ///
    /// `options.initial_rect` decides the first column layout; `options.initial_offset` is applied
    /// immediately.
    pub fn new(options: MasonryOptions<K>) -> Self {
        let scroll_rect = options.initial_rect.unwrap_or_default();
        let scroll_offset = options.initial_offset.resolve();
        let layout = compute_columns(scroll_rect.cross, &options.columns);
        mdebug!(
            count = options.count,
            column_count = layout.column_count,
            column_width = layout.column_width,
            "Masonry::new"
        );
        let mut m = Self {
            positioner: new_positioner(layout, &options.columns),
            layout,
            scroll_offset,
            scroll_rect,
            is_scrolling: false,
            scroll_direction: None,
            last_scroll_event_ms: None,
            phase: LayoutPhase::Settled,
            tasks: VecDeque::new(),
            pending_updates: BTreeMap::new(),
            pending_sets: BTreeMap::new(),
            cache: MeasurementCache::new(options.measurement_cache_capacity),
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        };
        m.transition(LayoutTrigger::Resize);
        m
    }

    pub fn options(&self) -> &MasonryOptions<K> {
        &self.options
    }

    pub fn set_options(&mut self, options: MasonryOptions<K>) {
        let was_enabled = self.options.enabled;
        let key_unchanged = Arc::ptr_eq(&self.options.get_item_key, &options.get_item_key);
        let columns_changed = self.options.columns != options.columns;
        self.options = options;
        self.cache
            .set_capacity(self.options.measurement_cache_capacity);
        mtrace!(
            count = self.options.count,
            enabled = self.options.enabled,
            "Masonry::set_options"
        );

        if !self.options.enabled {
            self.reset_scroll_state();
            self.scroll_rect = Rect::default();
        } else {
            if !was_enabled {
                self.reset_scroll_state();
                self.scroll_rect = self.options.initial_rect.unwrap_or_default();
            }
            // Geometry first, so a cache rebuild lays out into the new columns.
            if !was_enabled || columns_changed {
                self.apply_column_layout(!was_enabled);
            }
            if !key_unchanged {
                self.rebuild_from_cache();
            }
        }

        self.transition(LayoutTrigger::Resize);
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut MasonryOptions<K>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    fn reset_scroll_state(&mut self) {
        self.scroll_offset = self.options.initial_offset.resolve();
        self.is_scrolling = false;
        self.scroll_direction = None;
        self.last_scroll_event_ms = None;
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&Masonry<K>, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    pub fn set_on_render(
        &mut self,
        on_render: Option<impl Fn(RenderRange) + Send + Sync + 'static>,
    ) {
        self.options.on_render = on_render.map(|f| Arc::new(f) as _);
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.is_scrolling);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// On a typical frame an adapter updates the rect, the scroll offset and a handful of
    /// measurements together; without batching each of those would fire `on_change`.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    /// Sets the number of items in the backing data.
    ///
    /// Growing is the supported path. Shrinking below the number of measured items leaves placed
    /// indexes without data, which `render` reports as [`MasonryError::MissingItem`]; call
    /// [`Self::sync_item_keys`] after replacing the data instead.
    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        self.transition(LayoutTrigger::Resize);
        self.notify();
    }

    pub fn enabled(&self) -> bool {
        self.options.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.options.enabled == enabled {
            return;
        }
        self.options.enabled = enabled;
        self.reset_scroll_state();
        if enabled {
            self.scroll_rect = self.options.initial_rect.unwrap_or_default();
            self.apply_column_layout(false);
        } else {
            self.scroll_rect = Rect::default();
        }
        self.transition(LayoutTrigger::Resize);
        self.notify();
    }

    pub fn set_columns(&mut self, columns: ColumnOptions) {
        if self.options.columns == columns {
            return;
        }
        self.options.columns = columns;
        self.apply_column_layout(false);
        self.transition(LayoutTrigger::Resize);
        self.notify();
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.is_scrolling == is_scrolling {
            return;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.scroll_direction = None;
            self.last_scroll_event_ms = None;
        }
        self.notify();
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        if !self.options.enabled {
            return;
        }
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true);
    }

    /// Resets `is_scrolling` once no scroll event arrived for `is_scrolling_reset_delay_ms`.
    pub fn update_scrolling(&mut self, now_ms: u64) {
        if !self.options.enabled || !self.is_scrolling {
            return;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return;
        };
        if now_ms.saturating_sub(last) >= self.options.is_scrolling_reset_delay_ms {
            self.set_is_scrolling(false);
        }
    }

    pub fn viewport_size(&self) -> u32 {
        self.scroll_rect.main
    }

    pub fn scroll_rect(&self) -> Rect {
        self.scroll_rect
    }

    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            rect: self.scroll_rect,
        }
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            offset: self.scroll_offset,
            is_scrolling: self.is_scrolling,
        }
    }

    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: self.viewport_state(),
            scroll: self.scroll_state(),
        }
    }

    /// Restores viewport + scroll state from a previously captured snapshot.
    ///
    /// When `frame.scroll.is_scrolling` is `true`, the scrolling debounce restarts at `now_ms`.
    pub fn restore_frame_state(&mut self, frame: FrameState, now_ms: u64) {
        self.batch_update(|m| {
            m.set_scroll_rect(frame.viewport.rect);
            m.set_scroll_offset_clamped(frame.scroll.offset);
            if frame.scroll.is_scrolling {
                m.notify_scroll_event(now_ms);
            } else {
                m.set_is_scrolling(false);
            }
        });
    }

    /// Applies new viewport geometry.
    ///
    /// A width change that alters the column layout rebuilds the positioner with every known
    /// height replayed, and drops re-measurements still queued for the old layout.
    pub fn set_scroll_rect(&mut self, rect: Rect) {
        if self.scroll_rect == rect {
            return;
        }
        mtrace!(main = rect.main, cross = rect.cross, "set_scroll_rect");
        let width_changed = self.scroll_rect.cross != rect.cross;
        self.scroll_rect = rect;
        if width_changed {
            self.apply_column_layout(false);
        }
        self.transition(LayoutTrigger::Resize);
        self.notify();
    }

    pub fn set_viewport_size(&mut self, size: u32) {
        self.set_scroll_rect(Rect {
            main: size,
            cross: self.scroll_rect.cross,
        });
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Scroll offset relative to the top of the grid.
    pub fn scroll_offset_in_grid(&self) -> u64 {
        self.scroll_offset
            .saturating_sub(self.options.scroll_margin as u64)
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        if self.scroll_offset == offset {
            return;
        }
        let prev = self.scroll_offset;
        self.scroll_offset = offset;
        self.scroll_direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.transition(LayoutTrigger::Scroll);
        self.notify();
    }

    pub fn set_scroll_offset_clamped(&mut self, offset: u64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_offset(clamped);
    }

    /// Applies a scroll offset update from the UI layer and marks the grid as scrolling.
    pub fn apply_scroll_offset_event(&mut self, offset: u64, now_ms: u64) {
        mtrace!(offset, now_ms, "apply_scroll_offset_event");
        self.batch_update(|m| {
            m.set_scroll_offset(offset);
            m.notify_scroll_event(now_ms);
        });
    }

    /// Applies rect and scroll offset in a single coalesced update.
    pub fn apply_scroll_frame(&mut self, rect: Rect, scroll_offset: u64, now_ms: u64) {
        mtrace!(
            rect_main = rect.main,
            rect_cross = rect.cross,
            scroll_offset,
            now_ms,
            "apply_scroll_frame"
        );
        self.batch_update(|m| {
            m.set_scroll_rect(rect);
            m.set_scroll_offset(scroll_offset);
            m.notify_scroll_event(now_ms);
        });
    }

    pub fn positioner(&self) -> &Positioner {
        &self.positioner
    }

    pub fn column_layout(&self) -> ColumnLayout {
        self.layout
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    /// Number of items placed in the positioner.
    pub fn measured_count(&self) -> usize {
        self.positioner.size()
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.positioner.get(index).is_some()
    }

    pub fn key_for(&self, index: usize) -> K {
        (self.options.get_item_key)(index)
    }

    /// Reports the natural height of an item.
    ///
    /// The first measurement of an item places it (in index order; early arrivals wait for their
    /// predecessors) and requests a render. A changed height for a placed item is queued until
    /// the next [`Self::flush`].
    pub fn measure(&mut self, index: usize, height: u32) {
        if !self.record_measurement(index, height) {
            return;
        }
        self.place_pending();
        self.transition(LayoutTrigger::MeasurementComplete);
        self.notify();
    }

    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, u32)>) {
        let mut any = false;
        for (index, height) in measurements {
            any |= self.record_measurement(index, height);
        }
        if !any {
            return;
        }
        self.place_pending();
        self.transition(LayoutTrigger::MeasurementComplete);
        self.notify();
    }

    fn record_measurement(&mut self, index: usize, height: u32) -> bool {
        if index >= self.options.count {
            mwarn!(index, count = self.options.count, "measure: index out of range");
            return false;
        }
        let key = self.key_for(index);
        self.cache.insert(key, height);

        match self.positioner.get(index) {
            Some(item) if item.height == height => {
                self.pending_updates.remove(&index);
            }
            Some(_) => {
                self.pending_updates.insert(index, height);
                self.push_task(LayoutTask::FlushUpdates);
            }
            None => {
                self.pending_sets.insert(index, height);
            }
        }
        true
    }

    fn place_pending(&mut self) {
        let mut placed = 0usize;
        loop {
            let next = self.positioner.size();
            let Some(height) = self.pending_sets.remove(&next) else {
                break;
            };
            self.positioner.set(next, height);
            placed += 1;
        }
        if placed > 0 {
            mtrace!(placed, measured = self.positioner.size(), "placed measured items");
            self.push_task(LayoutTask::Render);
        }
    }

    fn push_task(&mut self, task: LayoutTask) {
        if !self.tasks.contains(&task) {
            self.tasks.push_back(task);
        }
    }

    pub fn has_pending_work(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn pending_tasks(&self) -> impl Iterator<Item = LayoutTask> + '_ {
        self.tasks.iter().copied()
    }

    /// Drains the layout work queue.
    ///
    /// All queued re-measurements are applied in a single `Positioner::update`, so each column
    /// cascades once from its earliest changed item. Returns `true` when the adapter should run a
    /// new render pass.
    pub fn flush(&mut self) -> bool {
        let mut render = false;
        while let Some(task) = self.tasks.pop_front() {
            match task {
                LayoutTask::FlushUpdates => {
                    if self.pending_updates.is_empty() {
                        continue;
                    }
                    let updates = mem::take(&mut self.pending_updates);
                    mdebug!(updates = updates.len(), "flush re-measurements");
                    self.positioner.update(updates);
                    render = true;
                }
                LayoutTask::Render => render = true,
            }
        }
        self.transition(LayoutTrigger::MeasurementComplete);
        if render {
            self.notify();
        }
        render
    }

    /// Drops queued work, re-measurements and early first measurements (unmount or dependency
    /// change).
    pub fn cancel_pending(&mut self) {
        self.tasks.clear();
        self.pending_updates.clear();
        self.pending_sets.clear();
        self.transition(LayoutTrigger::MeasurementComplete);
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn transition(&mut self, trigger: LayoutTrigger) {
        let next = if !self.pending_updates.is_empty() {
            LayoutPhase::Cascading
        } else if self.needs_fresh_batch() {
            LayoutPhase::AwaitingMeasurement
        } else {
            LayoutPhase::Settled
        };
        if next != self.phase {
            mtrace!(trigger = ?trigger, from = ?self.phase, to = ?next, "layout phase");
            self.phase = next;
        }
    }

    /// Whether the viewport reaches past the shortest column while items remain unmeasured.
    pub fn needs_fresh_batch(&self) -> bool {
        if !self.options.enabled {
            return false;
        }
        let (scroll_top, overscan) = self.window_for(self.scroll_offset, self.scroll_rect.main);
        self.positioner.shortest_column() < scroll_top.saturating_add(overscan)
            && self.positioner.size() < self.options.count
    }

    /// `(scroll offset inside the grid, overscan distance)`.
    fn window_for(&self, scroll_offset: u64, viewport_size: u32) -> (u64, u64) {
        let scroll_top = scroll_offset.saturating_sub(self.options.scroll_margin as u64);
        let overscan = (viewport_size as f32 * self.options.overscan_by) as u64;
        (scroll_top, overscan)
    }

    /// Estimated height of the whole grid, used to size the scroll container.
    pub fn total_size(&self) -> u64 {
        if !self.options.enabled {
            return 0;
        }
        self.positioner
            .estimate_height(self.options.count, self.options.item_height_estimate)
    }

    pub fn max_scroll_offset(&self) -> u64 {
        if !self.options.enabled {
            return self.options.initial_offset.resolve();
        }
        let margin = self.options.scroll_margin as u64;
        margin.saturating_add(
            self.total_size()
                .saturating_sub(self.scroll_rect.main as u64),
        )
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    pub fn for_each_placed(&self, f: impl FnMut(PlacedCell)) {
        self.for_each_placed_for(self.scroll_offset, self.scroll_rect.main, f);
    }

    /// Emits the measured items overlapping the overscanned window (render phase two).
    ///
    /// The window spans half the overscan above the viewport top and the full overscan below it.
    pub fn for_each_placed_for(
        &self,
        scroll_offset: u64,
        viewport_size: u32,
        mut f: impl FnMut(PlacedCell),
    ) {
        if !self.options.enabled {
            return;
        }
        let (scroll_top, overscan) = self.window_for(scroll_offset, viewport_size);
        let lo = scroll_top.saturating_sub(overscan / 2);
        let hi = scroll_top.saturating_add(overscan);
        let width = self.layout.column_width;
        self.positioner.range(lo, hi, |index, left, top| {
            f(PlacedCell {
                index,
                left,
                top,
                width,
            });
        });
    }

    pub fn for_each_unmeasured(&self, f: impl FnMut(UnmeasuredCell)) {
        self.for_each_unmeasured_for(self.scroll_offset, self.scroll_rect.main, f);
    }

    /// Emits the next batch of unmeasured items (render phase one).
    ///
    /// The batch is sized to roughly fill the gap between the shortest column and the end of
    /// the overscanned window at `item_height_estimate` per item and column.
    pub fn for_each_unmeasured_for(
        &self,
        scroll_offset: u64,
        viewport_size: u32,
        mut f: impl FnMut(UnmeasuredCell),
    ) {
        if !self.options.enabled {
            return;
        }
        let (scroll_top, overscan) = self.window_for(scroll_offset, viewport_size);
        let range_end = scroll_top.saturating_add(overscan);
        let shortest = self.positioner.shortest_column();
        let measured = self.positioner.size();
        let count = self.options.count;
        if shortest >= range_end || measured >= count {
            return;
        }

        let estimate = self.options.item_height_estimate.max(1) as u64;
        let wanted = (range_end - shortest)
            .saturating_mul(self.layout.column_count as u64)
            .div_ceil(estimate);
        let batch = usize::try_from(wanted)
            .unwrap_or(usize::MAX)
            .min(count - measured);

        let width = self.layout.column_width;
        let mut emitted = 0usize;
        let mut index = measured;
        while emitted < batch && index < count {
            if !self.pending_sets.contains_key(&index) {
                f(UnmeasuredCell { index, width });
                emitted += 1;
            }
            index += 1;
        }
    }

    /// Runs a full render pass over `items`, emitting placed cells then unmeasured cells.
    ///
    /// Returns the range of placed indexes (also passed to `on_render`). An index without a
    /// backing item fails the pass with [`MasonryError::MissingItem`].
    pub fn render<'a, T>(
        &self,
        items: &'a [T],
        mut f: impl FnMut(MasonryCell<'a, T>),
    ) -> Result<Option<RenderRange>, MasonryError> {
        let mut range: Option<RenderRange> = None;
        let mut missing: Option<usize> = None;

        self.for_each_placed(|cell| {
            if missing.is_some() {
                return;
            }
            match items.get(cell.index) {
                Some(item) => {
                    range = Some(RenderRange::extend(range, cell.index));
                    f(MasonryCell::Placed { cell, item });
                }
                None => missing = Some(cell.index),
            }
        });

        if missing.is_none() {
            self.for_each_unmeasured(|cell| {
                if missing.is_some() {
                    return;
                }
                match items.get(cell.index) {
                    Some(item) => f(MasonryCell::Unmeasured { cell, item }),
                    None => missing = Some(cell.index),
                }
            });
        }

        if let Some(index) = missing {
            return Err(MasonryError::MissingItem {
                index,
                len: items.len(),
            });
        }

        if let (Some(range), Some(on_render)) = (range, &self.options.on_render) {
            on_render(range);
        }
        Ok(range)
    }

    /// Collects placed cells into `out` (clears `out` first).
    pub fn collect_placed(&self, out: &mut Vec<PlacedCell>) {
        out.clear();
        self.for_each_placed(|cell| out.push(cell));
    }

    /// Collects the unmeasured batch into `out` (clears `out` first).
    pub fn collect_unmeasured(&self, out: &mut Vec<UnmeasuredCell>) {
        out.clear();
        self.for_each_unmeasured(|cell| out.push(cell));
    }

    /// Offset that brings `index` into view with `align`, or `None` while it is unmeasured.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> Option<u64> {
        if !self.options.enabled {
            return None;
        }
        let item = self.positioner.get(index)?;
        let view = self.scroll_rect.main as u64;
        let start = (self.options.scroll_margin as u64).saturating_add(item.top);
        let end = start.saturating_add(item.height as u64);

        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(view),
            Align::Center => {
                let center = start.saturating_add(item.height as u64 / 2);
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.scroll_offset;
                let cur_end = cur.saturating_add(view);
                if start >= cur && end <= cur_end {
                    cur
                } else if start < cur {
                    start
                } else {
                    end.saturating_sub(view)
                }
            }
        };
        Some(self.clamp_scroll_offset(target))
    }

    /// Scrolls to `index` (no animation). Returns the applied offset, or `None` while the item is
    /// unmeasured.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> Option<u64> {
        let offset = self.scroll_to_index_offset(index, align)?;
        self.set_scroll_offset(offset);
        Some(offset)
    }

    /// Returns the number of cached heights (key → height).
    pub fn measurement_cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Iterates the cached heights from oldest to newest without allocations.
    pub fn for_each_cached_size(&self, f: impl FnMut(&K, u32)) {
        self.cache.for_each(f);
    }

    /// Exports the cached heights as a `Vec` (useful for persistence).
    pub fn export_measurement_cache(&self) -> Vec<(K, u32)> {
        let mut out = Vec::with_capacity(self.cache.len());
        self.for_each_cached_size(|k, v| out.push((k.clone(), v)));
        out
    }

    /// Replaces the cached heights and rebuilds the layout from them.
    pub fn import_measurement_cache(&mut self, entries: impl IntoIterator<Item = (K, u32)>) {
        self.cache.clear();
        for (k, v) in entries {
            self.cache.insert(k, v);
        }
        mdebug!(entries = self.cache.len(), "import_measurement_cache");
        self.rebuild_from_cache();
        self.transition(LayoutTrigger::MeasurementComplete);
        self.notify();
    }

    /// Forgets every height and starts measuring from scratch.
    pub fn reset_measurements(&mut self) {
        self.cache.clear();
        self.rebuild_from_cache();
        self.transition(LayoutTrigger::MeasurementComplete);
        self.notify();
    }

    /// Rebuilds the layout after the backing data was replaced or reordered.
    ///
    /// Items are re-placed in index order from the key cache until the first item without a
    /// cached height; everything after it is measured again.
    pub fn sync_item_keys(&mut self) {
        self.rebuild_from_cache();
        self.transition(LayoutTrigger::MeasurementComplete);
        self.notify();
    }

    fn rebuild_from_cache(&mut self) {
        let mut positioner = new_positioner(self.layout, &self.options.columns);
        for index in 0..self.options.count {
            let Some(height) = self.cache.get(&self.key_for(index)) else {
                break;
            };
            positioner.set(index, height);
        }
        mdebug!(
            count = self.options.count,
            restored = positioner.size(),
            "rebuild_from_cache"
        );
        self.positioner = positioner;
        self.pending_updates.clear();
        self.pending_sets.clear();
        self.push_task(LayoutTask::Render);
    }

    /// Re-derives the column layout from the current width; rebuilds the positioner when it
    /// changed (or when `force` is set).
    fn apply_column_layout(&mut self, force: bool) {
        let layout = compute_columns(self.scroll_rect.cross, &self.options.columns);
        let gutters_changed = self.positioner.column_gutter() != self.options.columns.column_gutter
            || self.positioner.row_gutter() != self.options.columns.row_gutter();
        if !force && layout == self.layout && !gutters_changed {
            return;
        }
        mdebug!(
            column_count = layout.column_count,
            column_width = layout.column_width,
            measured = self.positioner.size(),
            "relayout"
        );
        self.layout = layout;
        self.positioner = self.positioner.relayout(
            layout.column_count,
            layout.column_width,
            self.options.columns.column_gutter,
            self.options.columns.row_gutter(),
        );
        self.pending_updates.clear();
        self.pending_sets.clear();
        self.push_task(LayoutTask::Render);
    }
}

fn new_positioner(layout: ColumnLayout, columns: &ColumnOptions) -> Positioner {
    Positioner::new(
        layout.column_count,
        layout.column_width,
        columns.column_gutter,
        columns.row_gutter(),
    )
}
