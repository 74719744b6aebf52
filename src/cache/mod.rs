//! Per-cooldown bucket storage and its background eviction.

mod bucket_cache;
pub(crate) use bucket_cache::*;

mod sweeper;
pub(crate) use sweeper::*;
