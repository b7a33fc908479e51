#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// Viewport geometry.
///
/// - `main` is the scroll axis size (viewport height)
/// - `cross` is the cross axis size (container width, used to derive columns)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub main: u32,
    pub cross: u32,
}

/// A measured cell with a known position (render phase two).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedCell {
    pub index: usize,
    /// Offset from the grid's left edge.
    pub left: u64,
    /// Offset from the grid's top edge (excludes `scroll_margin`).
    pub top: u64,
    pub width: u32,
}

/// A cell whose height is not known yet (render phase one).
///
/// Adapters render these hidden, at a fixed `width`, and report the natural height back through
/// `Masonry::measure`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnmeasuredCell {
    pub index: usize,
    pub width: u32,
}

/// A cell emitted by `Masonry::render`, paired with its backing item.
#[derive(Debug, PartialEq, Eq)]
pub enum MasonryCell<'a, T> {
    Placed { cell: PlacedCell, item: &'a T },
    Unmeasured { cell: UnmeasuredCell, item: &'a T },
}

impl<T> Clone for MasonryCell<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MasonryCell<'_, T> {}

impl<T> MasonryCell<'_, T> {
    pub fn index(&self) -> usize {
        match self {
            Self::Placed { cell, .. } => cell.index,
            Self::Unmeasured { cell, .. } => cell.index,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}

/// Lowest and highest item index placed by a render pass (both inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderRange {
    pub start_index: usize,
    pub stop_index: usize,
}

impl RenderRange {
    pub(crate) fn extend(range: Option<Self>, index: usize) -> Self {
        match range {
            None => Self {
                start_index: index,
                stop_index: index,
            },
            Some(r) => Self {
                start_index: r.start_index.min(index),
                stop_index: r.stop_index.max(index),
            },
        }
    }
}

pub type ItemKey = u64;
