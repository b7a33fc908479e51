use alloc::sync::Arc;

use crate::masonry::Masonry;
use crate::{ColumnOptions, ItemKey, Rect, RenderRange};

/// A callback fired when the masonry state changes.
///
/// The second argument is `is_scrolling`.
pub type OnChangeCallback<K> = Arc<dyn Fn(&Masonry<K>, bool) + Send + Sync>;

/// A callback fired after a render pass with the range of placed indexes.
///
/// This is where infinite loaders hook in.
pub type OnRenderCallback = Arc<dyn Fn(RenderRange) + Send + Sync>;

/// Initial scroll offset configuration.
#[derive(Clone)]
pub enum InitialOffset {
    /// A fixed initial offset.
    Value(u64),
    /// A lazily evaluated initial offset provider (called by `Masonry::new`).
    Provider(Arc<dyn Fn() -> u64 + Send + Sync>),
}

impl InitialOffset {
    pub(crate) fn resolve(&self) -> u64 {
        match self {
            Self::Value(v) => *v,
            Self::Provider(f) => f(),
        }
    }
}

impl Default for InitialOffset {
    fn default() -> Self {
        Self::Value(0)
    }
}

impl core::fmt::Debug for InitialOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// Default `is_scrolling` reset delay: a little over one frame at 12 fps.
pub const DEFAULT_IS_SCROLLING_RESET_DELAY_MS: u64 = 40 + 1000 / 12;

/// Configuration for [`crate::Masonry`].
///
/// Callbacks are stored in `Arc`s so adapters can clone the options, tweak a field, and hand
/// them back through `Masonry::set_options`.
pub struct MasonryOptions<K = ItemKey> {
    /// Number of items in the backing data.
    pub count: usize,
    /// Stable identity for the item at an index. Measured heights are cached by this key.
    pub get_item_key: Arc<dyn Fn(usize) -> K + Send + Sync>,

    /// Enables/disables the grid. When disabled, render queries return nothing.
    pub enabled: bool,

    pub columns: ColumnOptions,

    /// How far past the viewport to render, as a multiple of the viewport height.
    ///
    /// Half of it is applied above the viewport, all of it below.
    pub overscan_by: f32,

    /// Height assumed for items that have not been measured yet.
    pub item_height_estimate: u32,

    /// Where the grid starts inside the scroll container.
    pub scroll_margin: u32,

    /// The initial viewport rect (`main` = height, `cross` = width).
    pub initial_rect: Option<Rect>,

    pub initial_offset: InitialOffset,

    /// Debounce for resetting `is_scrolling` after the last scroll event.
    pub is_scrolling_reset_delay_ms: u64,

    /// Maximum number of measured heights kept in the key cache.
    pub measurement_cache_capacity: usize,

    pub on_change: Option<OnChangeCallback<K>>,
    pub on_render: Option<OnRenderCallback>,
}

impl<K> Clone for MasonryOptions<K> {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            get_item_key: Arc::clone(&self.get_item_key),
            enabled: self.enabled,
            columns: self.columns,
            overscan_by: self.overscan_by,
            item_height_estimate: self.item_height_estimate,
            scroll_margin: self.scroll_margin,
            initial_rect: self.initial_rect,
            initial_offset: self.initial_offset.clone(),
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
            measurement_cache_capacity: self.measurement_cache_capacity,
            on_change: self.on_change.clone(),
            on_render: self.on_render.clone(),
        }
    }
}

impl MasonryOptions<ItemKey> {
    /// Creates options for a grid keyed by index (`ItemKey = u64`).
    pub fn new(count: usize) -> Self {
        Self::new_with_key(count, |i| i as u64)
    }
}

impl<K> MasonryOptions<K> {
    /// Creates options with a custom key mapping.
    ///
    /// `get_item_key(i)` should return a stable identity for the item at index `i`, so cached
    /// heights survive `Masonry::sync_item_keys` after the data is replaced.
    pub fn new_with_key(
        count: usize,
        get_item_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            count,
            get_item_key: Arc::new(get_item_key),
            enabled: true,
            columns: ColumnOptions::default(),
            overscan_by: 2.0,
            item_height_estimate: 300,
            scroll_margin: 0,
            initial_rect: None,
            initial_offset: InitialOffset::default(),
            is_scrolling_reset_delay_ms: DEFAULT_IS_SCROLLING_RESET_DELAY_MS,
            measurement_cache_capacity: 1024,
            on_change: None,
            on_render: None,
        }
    }

    pub fn with_get_item_key(
        mut self,
        get_item_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        self.get_item_key = Arc::new(get_item_key);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_columns(mut self, columns: ColumnOptions) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_overscan_by(mut self, overscan_by: f32) -> Self {
        self.overscan_by = overscan_by;
        self
    }

    pub fn with_item_height_estimate(mut self, item_height_estimate: u32) -> Self {
        self.item_height_estimate = item_height_estimate;
        self
    }

    pub fn with_scroll_margin(mut self, scroll_margin: u32) -> Self {
        self.scroll_margin = scroll_margin;
        self
    }

    pub fn with_initial_rect(mut self, initial_rect: Option<Rect>) -> Self {
        self.initial_rect = initial_rect;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: InitialOffset) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_initial_offset_value(mut self, initial_offset: u64) -> Self {
        self.initial_offset = InitialOffset::Value(initial_offset);
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_measurement_cache_capacity(mut self, capacity: usize) -> Self {
        self.measurement_cache_capacity = capacity;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&Masonry<K>, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_render(
        mut self,
        on_render: Option<impl Fn(RenderRange) + Send + Sync + 'static>,
    ) -> Self {
        self.on_render = on_render.map(|f| Arc::new(f) as _);
        self
    }
}

impl<K> core::fmt::Debug for MasonryOptions<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MasonryOptions")
            .field("count", &self.count)
            .field("enabled", &self.enabled)
            .field("columns", &self.columns)
            .field("overscan_by", &self.overscan_by)
            .field("item_height_estimate", &self.item_height_estimate)
            .field("scroll_margin", &self.scroll_margin)
            .field("initial_rect", &self.initial_rect)
            .field("initial_offset", &self.initial_offset)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .field(
                "measurement_cache_capacity",
                &self.measurement_cache_capacity,
            )
            .finish_non_exhaustive()
    }
}
