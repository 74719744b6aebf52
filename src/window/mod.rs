//! Consumption windows.
//!
//! A [`Window`] says when consumption resets: a fixed period after the window
//! opens, or a local time of day. Each bucket gets its own tracker that counts
//! calls against the cooldown's limit until the window rolls over.
//!
//! # State machine
//!
//! - **Idle:** no calls counted (never used, or the window elapsed)
//! - **Active:** some calls counted, fewer than the limit
//! - **Exhausted:** limit reached, calls are rejected until the deadline
//!
//! The first call after the deadline resets the count and opens a new window.

mod window_period;
pub use window_period::Window;
#[cfg(test)]
pub(crate) use window_period::until_next_occurrence;

mod window_tracker;
pub use window_tracker::WindowSnapshot;
pub(crate) use window_tracker::*;
