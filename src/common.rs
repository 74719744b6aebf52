use std::{fmt, ops::Deref, sync::Arc};

use crate::CooldownError;

/// Maximum number of calls admitted per bucket per window.
///
/// Validated newtype, must be greater than 0.
///
/// # Examples
///
/// ```
/// use cooldowns::CallLimit;
///
/// let limit = CallLimit::try_from(5u64).unwrap();
/// assert_eq!(*limit, 5);
///
/// assert!(CallLimit::try_from(0u64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallLimit(u64);

impl Deref for CallLimit {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u64> for CallLimit {
    type Error = CooldownError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(CooldownError::InvalidCallLimit(
                "Call limit must be greater than 0".to_string(),
            ))
        } else {
            Ok(Self(value))
        }
    }
}

/// How often the background sweeper evicts idle buckets, in milliseconds.
///
/// Lower values keep memory tighter for workloads with many one-off buckets at
/// the cost of more frequent passes over the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SweepIntervalMs(u64);

impl Default for SweepIntervalMs {
    /// Returns a sweep interval of 250 seconds.
    fn default() -> Self {
        Self(250_000)
    }
}

impl Deref for SweepIntervalMs {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<u64> for SweepIntervalMs {
    type Error = CooldownError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(CooldownError::InvalidSweepInterval(
                "Sweep interval must be greater than 0".to_string(),
            ))
        } else {
            Ok(Self(value))
        }
    }
}

/// External correlation token for a cooldown.
///
/// Lets callers find one cooldown among several stacked on the same callable,
/// e.g. to reset it. Uniqueness is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CooldownId {
    /// Integer identifier.
    Int(i64),
    /// String identifier.
    Str(Arc<str>),
}

impl fmt::Display for CooldownId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for CooldownId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for CooldownId {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for CooldownId {
    fn from(value: &str) -> Self {
        Self::Str(Arc::from(value))
    }
}

impl From<String> for CooldownId {
    fn from(value: String) -> Self {
        Self::Str(Arc::from(value))
    }
}
