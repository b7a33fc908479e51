/// Item keys accepted by [`crate::Controller`].
///
/// Keys index the grid's measurement cache: `Hash + Eq` with `feature = "std"`, `Ord` otherwise.
pub trait MasonryKey: masonry_grid::KeyCacheKey + Clone {}
impl<T: masonry_grid::KeyCacheKey + Clone> MasonryKey for T {}
