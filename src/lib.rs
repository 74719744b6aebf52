#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod bucket;
pub use bucket::*;

pub(crate) mod cache;

mod common;
pub use common::{CallLimit, CooldownId, SweepIntervalMs};

mod cooldown;
pub use cooldown::*;

mod cooled_down;
pub use cooled_down::*;

mod error;
pub use error::*;

pub(crate) mod runtime;

pub(crate) mod window;
pub use window::{Window, WindowSnapshot};

#[cfg(test)]
mod tests;
