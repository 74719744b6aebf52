//! Bucket partitioning.
//!
//! A call's arguments ([`CallArgs`]) are mapped by a [`BucketStrategy`] to a
//! [`BucketKey`]. Calls with equal keys share one consumption window.

mod bucket_key;
pub use bucket_key::*;

mod bucket_strategy;
pub use bucket_strategy::*;

mod call_args;
pub use call_args::*;
