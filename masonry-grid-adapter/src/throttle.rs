/// A leading + trailing throttle driven by adapter-supplied timestamps.
///
/// The first value after a quiet period passes through immediately. Values offered while the
/// interval is still running are held (newest wins) and released by [`Throttle::poll`] once the
/// interval has elapsed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Throttle<T> {
    interval_ms: u64,
    last_fire_ms: Option<u64>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    /// Throttles to at most `fps` values per second (`fps = 0` is treated as 1).
    pub fn new(fps: u32) -> Self {
        Self::from_interval_ms(1000 / fps.max(1) as u64)
    }

    pub fn from_interval_ms(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
            pending: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Offers a value. Returns it when it may be applied right away (leading edge); otherwise it
    /// is held for the trailing edge.
    pub fn push(&mut self, value: T, now_ms: u64) -> Option<T> {
        match self.last_fire_ms {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => {
                self.pending = Some(value);
                None
            }
            _ => {
                self.last_fire_ms = Some(now_ms);
                self.pending = None;
                Some(value)
            }
        }
    }

    /// Releases the held value once the interval since the last release has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        let last = self.last_fire_ms?;
        if self.pending.is_none() || now_ms.saturating_sub(last) < self.interval_ms {
            return None;
        }
        self.last_fire_ms = Some(now_ms);
        self.pending.take()
    }

    /// Drops the held value and restarts with a leading edge.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_fire_ms = None;
    }
}
