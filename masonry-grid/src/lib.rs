//! A headless virtualized masonry layout engine.
//!
//! For frame scheduling, scroll throttling and infinite loading, see the `masonry-grid-adapter`
//! crate.
//!
//! The crate answers one question per frame: which grid cells intersect the viewport, and where
//! do they go. Measured items are packed shortest-column-first by a [`Positioner`], which mirrors
//! every item as an interval in an augmented red-black [`IntervalTree`] so the visible cells are
//! found in `O(log n + k)`. Items whose height is still unknown are handed out in batches for
//! off-screen measurement.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport size (height/width)
//! - scroll offset
//! - the natural height of each item once it has been laid out
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod columns;
mod error;
mod interval_tree;
mod key;
mod masonry;
mod options;
mod positioner;
mod state;
mod types;


pub use columns::{ColumnLayout, ColumnOptions, compute_columns};
pub use error::MasonryError;
pub use interval_tree::IntervalTree;
pub use masonry::Masonry;
pub use options::{
    DEFAULT_IS_SCROLLING_RESET_DELAY_MS, InitialOffset, MasonryOptions, OnChangeCallback,
    OnRenderCallback,
};
pub use positioner::{Positioner, PositionerItem};
pub use state::{FrameState, LayoutPhase, LayoutTask, LayoutTrigger, ScrollState, ViewportState};
pub use types::{
    Align, ItemKey, MasonryCell, PlacedCell, Rect, RenderRange, ScrollDirection, UnmeasuredCell,
};

#[doc(hidden)]
pub use key::KeyCacheKey;
