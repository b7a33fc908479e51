use masonry_grid::{Align, ItemKey, LayoutPhase, Masonry, MasonryOptions, Rect};

use crate::{MasonryKey, Throttle};

/// Controller tuning that is not part of the grid layout itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerOptions {
    /// Maximum rate at which scroll offsets reach the grid.
    pub scroll_fps: u32,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self { scroll_fps: 12 }
    }
}

impl ControllerOptions {
    pub fn with_scroll_fps(mut self, scroll_fps: u32) -> Self {
        self.scroll_fps = scroll_fps;
        self
    }
}

/// What changed during a [`Controller::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Trailing scroll offset applied this frame, if any.
    pub scroll_offset: Option<u64>,
    /// The adapter should run a render pass.
    pub render: bool,
    pub phase: LayoutPhase,
}

/// A framework-neutral controller that wraps a [`masonry_grid::Masonry`] and schedules its work
/// per animation frame.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_resize` / `on_scroll` / `on_item_measured` when UI events occur
/// - `tick(now_ms)` once per frame, then render if the returned [`Frame`] asks for it
///
/// Resizes are coalesced to the last rect per frame; scroll offsets are throttled to
/// `scroll_fps` with a trailing edge; re-measurements are flushed in one positioner update.
#[derive(Clone, Debug)]
pub struct Controller<K = ItemKey> {
    m: Masonry<K>,
    scroll: Throttle<u64>,
    pending_rect: Option<Rect>,
    render_requested: bool,
}

impl<K: MasonryKey> Controller<K> {
    pub fn new(options: MasonryOptions<K>) -> Self {
        Self::from_masonry(Masonry::new(options), ControllerOptions::default())
    }

    pub fn with_options(options: MasonryOptions<K>, controller: ControllerOptions) -> Self {
        Self::from_masonry(Masonry::new(options), controller)
    }

    pub fn from_masonry(m: Masonry<K>, controller: ControllerOptions) -> Self {
        Self {
            m,
            scroll: Throttle::new(controller.scroll_fps),
            pending_rect: None,
            render_requested: false,
        }
    }

    pub fn masonry(&self) -> &Masonry<K> {
        &self.m
    }

    pub fn masonry_mut(&mut self) -> &mut Masonry<K> {
        &mut self.m
    }

    pub fn into_masonry(self) -> Masonry<K> {
        self.m
    }

    /// Records new viewport geometry; only the last rect before a tick is applied.
    pub fn on_resize(&mut self, rect: Rect) {
        mtrace!(main = rect.main, cross = rect.cross, "on_resize");
        self.pending_rect = Some(rect);
    }

    /// Call this when the UI reports a scroll offset change.
    ///
    /// The first offset after a quiet period is applied immediately; later ones within the
    /// throttle interval wait for a subsequent `tick`.
    pub fn on_scroll(&mut self, scroll_offset: u64, now_ms: u64) {
        if let Some(offset) = self.scroll.push(scroll_offset, now_ms) {
            self.m.apply_scroll_offset_event(offset, now_ms);
            self.render_requested = true;
        }
    }

    pub fn on_item_measured(&mut self, index: usize, height: u32) {
        self.m.measure(index, height);
    }

    /// Advances one animation frame.
    ///
    /// Applies the coalesced resize and the trailing scroll offset, runs `is_scrolling`
    /// debouncing, and flushes queued layout work.
    pub fn tick(&mut self, now_ms: u64) -> Frame {
        let rect = self.pending_rect.take();
        let trailing = self.scroll.poll(now_ms);
        let was_scrolling = self.m.is_scrolling();

        self.m.batch_update(|m| {
            if let Some(rect) = rect {
                m.set_scroll_rect(rect);
            }
            if let Some(offset) = trailing {
                m.apply_scroll_offset_event(offset, now_ms);
            }
            m.update_scrolling(now_ms);
        });

        let flushed = self.m.flush();
        let render = flushed
            || rect.is_some()
            || trailing.is_some()
            || was_scrolling != self.m.is_scrolling()
            || core::mem::take(&mut self.render_requested);
        mtrace!(
            now_ms,
            render,
            phase = ?self.m.phase(),
            "tick"
        );
        Frame {
            scroll_offset: trailing,
            render,
            phase: self.m.phase(),
        }
    }

    /// Scrolls to a measured item immediately, dropping any held scroll offset.
    ///
    /// Returns the applied offset, or `None` while the item is unmeasured.
    pub fn scroll_to_index(&mut self, index: usize, align: Align, now_ms: u64) -> Option<u64> {
        let offset = self.m.scroll_to_index_offset(index, align)?;
        self.scroll.cancel();
        self.m.apply_scroll_offset_event(offset, now_ms);
        self.render_requested = true;
        Some(offset)
    }

    /// Drops all scheduled work (unmount or dependency change).
    pub fn cancel(&mut self) {
        mdebug!(
            pending_rect = self.pending_rect.is_some(),
            pending_scroll = self.scroll.has_pending(),
            "cancel"
        );
        self.pending_rect = None;
        self.scroll.cancel();
        self.render_requested = false;
        self.m.cancel_pending();
    }
}
