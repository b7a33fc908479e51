/// Errors surfaced by the render driver.
///
/// These signal a data-consistency bug in the caller rather than a transient condition, so
/// adapters are expected to propagate them instead of retrying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MasonryError {
    /// A render pass computed an index with no backing item.
    ///
    /// The backing slice must only grow. Shrinking or reordering it without calling
    /// `Masonry::sync_item_keys` leaves placed indexes that no longer exist.
    #[error("no item at index {index} (backing slice has {len} items)")]
    MissingItem { index: usize, len: usize },
}
