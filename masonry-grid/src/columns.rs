/// Column configuration for a masonry grid.
///
/// Unless `column_count` is fixed, the number of columns is derived from the container width:
/// as many columns of at least `min_column_width` as fit, capped by `max_column_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnOptions {
    pub min_column_width: u32,
    /// Horizontal space between columns.
    pub column_gutter: u32,
    /// Vertical space between items in a column. Defaults to `column_gutter`.
    pub row_gutter: Option<u32>,
    /// Fixed number of columns. Overrides the width-based derivation.
    pub column_count: Option<usize>,
    pub max_column_count: Option<usize>,
    pub max_column_width: Option<u32>,
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            min_column_width: 200,
            column_gutter: 0,
            row_gutter: None,
            column_count: None,
            max_column_count: None,
            max_column_width: None,
        }
    }
}

impl ColumnOptions {
    pub fn row_gutter(&self) -> u32 {
        self.row_gutter.unwrap_or(self.column_gutter)
    }

    pub fn with_min_column_width(mut self, min_column_width: u32) -> Self {
        self.min_column_width = min_column_width;
        self
    }

    pub fn with_gutter(mut self, column_gutter: u32) -> Self {
        self.column_gutter = column_gutter;
        self
    }

    pub fn with_row_gutter(mut self, row_gutter: Option<u32>) -> Self {
        self.row_gutter = row_gutter;
        self
    }

    pub fn with_column_count(mut self, column_count: Option<usize>) -> Self {
        self.column_count = column_count;
        self
    }

    pub fn with_max_column_count(mut self, max_column_count: Option<usize>) -> Self {
        self.max_column_count = max_column_count;
        self
    }

    pub fn with_max_column_width(mut self, max_column_width: Option<u32>) -> Self {
        self.max_column_width = max_column_width;
        self
    }
}

/// Resolved column geometry for a given container width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnLayout {
    pub column_width: u32,
    pub column_count: usize,
}

/// Derives the column count and width for `container_width`.
///
/// The count is never below one; the width is the container split evenly between columns after
/// gutters, capped by `max_column_width`.
pub fn compute_columns(container_width: u32, options: &ColumnOptions) -> ColumnLayout {
    let width = container_width as u64;
    let gutter = options.column_gutter as u64;

    let column_count = match options.column_count.filter(|&c| c > 0) {
        Some(count) => count,
        None => {
            let fit = (width + gutter)
                .checked_div(options.min_column_width as u64 + gutter)
                .unwrap_or(1) as usize;
            let capped = options.max_column_count.map_or(fit, |max| fit.min(max));
            capped.max(1)
        }
    };

    let gutters = gutter.saturating_mul(column_count as u64 - 1);
    let mut column_width = (width.saturating_sub(gutters) / column_count as u64) as u32;
    if let Some(max) = options.max_column_width {
        column_width = column_width.min(max);
    }

    ColumnLayout {
        column_width,
        column_count,
    }
}
