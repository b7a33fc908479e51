use crate::Rect;

/// A lightweight, serializable snapshot of the current viewport geometry.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub rect: Rect,
}

/// A lightweight, serializable snapshot of the current scroll state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: u64,
    pub is_scrolling: bool,
}

/// A combined snapshot of viewport + scroll state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub viewport: ViewportState,
    pub scroll: ScrollState,
}

/// Where the two-phase layout currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutPhase {
    /// Every known height is applied and the viewport is covered by placed items.
    #[default]
    Settled,
    /// The viewport reaches past the shortest column; a batch of unmeasured items must be
    /// rendered and measured.
    AwaitingMeasurement,
    /// Re-measured heights are queued and have not been flushed into the positioner yet.
    Cascading,
}

/// Events that move the layout between phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutTrigger {
    Scroll,
    Resize,
    MeasurementComplete,
}

/// Deferred layout work, drained by `Masonry::flush`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTask {
    /// Apply queued re-measurements in a single `Positioner::update`.
    FlushUpdates,
    /// Ask the adapter for a fresh render pass.
    Render,
}
