#[cfg(feature = "tracing")]
macro_rules! mtrace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "masonry_grid_adapter", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! mtrace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! mdebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "masonry_grid_adapter", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! mdebug {
    ($($tt:tt)*) => {};
}
