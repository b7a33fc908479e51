//! Adapter utilities for the `masonry-grid` crate.
//!
//! `masonry-grid` computes cell positions and knows nothing about frames or data fetching. This
//! crate provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - A per-frame [`Controller`] (coalesced resizes, throttled scroll, batched re-measurements)
//! - A leading/trailing [`Throttle`] driven by injected timestamps
//! - An [`InfiniteLoader`] that turns render ranges into "load more" requests
//!
//! This crate is intentionally framework-agnostic (no DOM/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod key;
mod loader;
mod throttle;

#[cfg(test)]
mod tests;

pub use controller::{Controller, ControllerOptions, Frame};
pub use key::MasonryKey;
pub use loader::InfiniteLoader;
pub use throttle::Throttle;
