use alloc::vec;
use alloc::vec::Vec;

use crate::interval_tree::IntervalTree;

/// Where a measured item sits in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionerItem {
    pub left: u64,
    pub top: u64,
    pub height: u32,
    pub column: usize,
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    item: PositionerItem,
    /// Position of the item within `column_items[item.column]`.
    row: usize,
}

/// Packs measured items into columns, shortest column first.
///
/// Each placed item is mirrored as an interval `[top, top + height]` in an [`IntervalTree`], so
/// the items overlapping a scroll window are found in `O(log n + k)`.
#[derive(Clone, Debug)]
pub struct Positioner {
    column_count: usize,
    column_width: u32,
    column_gutter: u32,
    row_gutter: u32,
    column_heights: Vec<u64>,
    items: Vec<Option<Slot>>,
    column_items: Vec<Vec<usize>>,
    tree: IntervalTree,
}

impl Positioner {
    /// Creates an empty positioner. A `column_count` of zero is treated as one column.
    pub fn new(
        column_count: usize,
        column_width: u32,
        column_gutter: u32,
        row_gutter: u32,
    ) -> Self {
        let column_count = column_count.max(1);
        Self {
            column_count,
            column_width,
            column_gutter,
            row_gutter,
            column_heights: vec![0; column_count],
            items: Vec::new(),
            column_items: vec![Vec::new(); column_count],
            tree: IntervalTree::new(),
        }
    }

    /// Creates a positioner whose row gutter equals its column gutter.
    pub fn with_gutter(column_count: usize, column_width: u32, gutter: u32) -> Self {
        Self::new(column_count, column_width, gutter, gutter)
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn column_width(&self) -> u32 {
        self.column_width
    }

    pub fn column_gutter(&self) -> u32 {
        self.column_gutter
    }

    pub fn row_gutter(&self) -> u32 {
        self.row_gutter
    }

    pub fn column_heights(&self) -> &[u64] {
        &self.column_heights
    }

    /// Number of placed items.
    pub fn size(&self) -> usize {
        self.tree.len()
    }

    pub fn get(&self, index: usize) -> Option<PositionerItem> {
        self.items.get(index).copied().flatten().map(|s| s.item)
    }

    pub fn for_each_item(&self, mut f: impl FnMut(usize, PositionerItem)) {
        for (index, slot) in self.items.iter().enumerate() {
            if let Some(slot) = slot {
                f(index, slot.item);
            }
        }
    }

    /// Places `index` at the bottom of the shortest column.
    ///
    /// Ties go to the lowest column. Setting an index that is already placed updates its height
    /// instead.
    pub fn set(&mut self, index: usize, height: u32) {
        if self.get(index).is_some() {
            self.update([(index, height)]);
            return;
        }

        let column = self.shortest_column_index();
        let top = self.column_heights[column];
        self.column_heights[column] = top
            .saturating_add(height as u64)
            .saturating_add(self.row_gutter as u64);

        let row = self.column_items[column].len();
        self.column_items[column].push(index);

        let item = PositionerItem {
            left: self.column_left(column),
            top,
            height,
            column,
        };
        if self.items.len() <= index {
            self.items.resize(index + 1, None);
        }
        self.items[index] = Some(Slot { item, row });
        self.tree
            .insert(top, top.saturating_add(height as u64), index);
    }

    /// Applies new heights and re-flows every item below the earliest change in each column.
    ///
    /// Columns without a change are left untouched. Unplaced indexes are skipped.
    pub fn update(&mut self, updates: impl IntoIterator<Item = (usize, u32)>) {
        let mut first_row: Vec<Option<usize>> = vec![None; self.column_count];

        for (index, height) in updates {
            let Some(slot) = self.items.get_mut(index).and_then(Option::as_mut) else {
                mwarn!(index, "Positioner::update: index is not placed");
                continue;
            };
            slot.item.height = height;
            let top = slot.item.top;
            let column = slot.item.column;
            let row = slot.row;

            self.tree.remove(index);
            self.tree
                .insert(top, top.saturating_add(height as u64), index);

            let first = &mut first_row[column];
            *first = Some(first.map_or(row, |r| r.min(row)));
        }

        let row_gutter = self.row_gutter as u64;
        for (column, first) in first_row.into_iter().enumerate() {
            let Some(row) = first else {
                continue;
            };
            let column_items = &self.column_items[column];
            let Some(start) = self.items[column_items[row]] else {
                continue;
            };
            let mut running = start
                .item
                .top
                .saturating_add(start.item.height as u64)
                .saturating_add(row_gutter);

            for &index in &column_items[row + 1..] {
                let Some(slot) = self.items[index].as_mut() else {
                    continue;
                };
                let height = slot.item.height as u64;
                if slot.item.top != running {
                    slot.item.top = running;
                    self.tree.remove(index);
                    self.tree
                        .insert(running, running.saturating_add(height), index);
                }
                running = running.saturating_add(height).saturating_add(row_gutter);
            }
            self.column_heights[column] = running;
        }
    }

    /// Reports every placed item overlapping `[lo, hi]` as `(index, left, top)`.
    pub fn range(&self, lo: u64, hi: u64, mut f: impl FnMut(usize, u64, u64)) {
        self.tree.search(lo, hi, |index, top| {
            if let Some(slot) = self.items.get(index).copied().flatten() {
                f(index, slot.item.left, top);
            }
        });
    }

    /// Height of the tallest column, extended by `default_item_height` rows for the items that
    /// have not been placed yet.
    pub fn estimate_height(&self, item_count: usize, default_item_height: u32) -> u64 {
        let tallest = self.column_heights.iter().copied().max().unwrap_or(0);
        let placed = self.tree.len();
        if item_count <= placed {
            return tallest;
        }
        let rows = (item_count - placed).div_ceil(self.column_count) as u64;
        tallest.saturating_add(rows.saturating_mul(default_item_height as u64))
    }

    /// Height of the shortest column.
    pub fn shortest_column(&self) -> u64 {
        self.column_heights.iter().copied().min().unwrap_or(0)
    }

    /// Builds a positioner with a new column geometry, replaying every known height in index
    /// order. Gaps below the highest placed index are replayed as zero-height items.
    pub fn relayout(
        &self,
        column_count: usize,
        column_width: u32,
        column_gutter: u32,
        row_gutter: u32,
    ) -> Self {
        let mut next = Self::new(column_count, column_width, column_gutter, row_gutter);
        for (index, slot) in self.items.iter().enumerate() {
            next.set(index, slot.map_or(0, |s| s.item.height));
        }
        next
    }

    fn shortest_column_index(&self) -> usize {
        let mut column = 0;
        for (i, &h) in self.column_heights.iter().enumerate().skip(1) {
            if h < self.column_heights[column] {
                column = i;
            }
        }
        column
    }

    fn column_left(&self, column: usize) -> u64 {
        column as u64 * (self.column_width as u64 + self.column_gutter as u64)
    }

    #[cfg(test)]
    pub(crate) fn tree(&self) -> &IntervalTree {
        &self.tree
    }

    #[cfg(test)]
    pub(crate) fn column_items(&self, column: usize) -> &[usize] {
        &self.column_items[column]
    }
}
