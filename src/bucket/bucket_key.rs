use std::{fmt, ops::Deref, sync::Arc};

use crate::CallArgs;

/// Canonical identity of a bucket.
///
/// Produced by [`BucketStrategy::resolve`](crate::BucketStrategy::resolve) or
/// [`Cooldown::get_bucket`](crate::Cooldown::get_bucket). Two keys are equal iff
/// their positional sequences and keyword maps are equal. Cloning is cheap.
///
/// # Examples
///
/// ```
/// use cooldowns::{BucketKey, call_args};
///
/// let a = BucketKey::from(call_args![1; two = 2]);
/// let b = BucketKey::from(call_args![1; two = 2]);
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "(1, two=2)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey(Arc<CallArgs>);

impl BucketKey {
    /// The arguments this key was built from.
    pub fn args(&self) -> &CallArgs {
        &self.0
    }
}

impl Deref for BucketKey {
    type Target = CallArgs;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<CallArgs> for BucketKey {
    fn from(args: CallArgs) -> Self {
        Self(Arc::new(args))
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}
