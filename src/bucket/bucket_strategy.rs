use std::{fmt, sync::Arc};

use crate::{BucketKey, CallArgs, Value};

type CustomBucketFn = dyn Fn(&CallArgs) -> Value + Send + Sync;

/// How call arguments are partitioned into buckets.
///
/// # Examples
///
/// ```
/// use cooldowns::{BucketStrategy, call_args};
///
/// let positional = BucketStrategy::Positional;
/// assert_eq!(
///     positional.resolve(&call_args![1; two = 2]),
///     positional.resolve(&call_args![1]),
/// );
///
/// // Bucket on the first argument only.
/// let first = BucketStrategy::custom(|args| args.get(0).cloned().unwrap_or_default());
/// assert_eq!(first.resolve(&call_args![1, 2, 3]), first.resolve(&call_args![1]));
/// ```
#[derive(Clone, Default)]
pub enum BucketStrategy {
    /// Positional and keyword arguments together. Identical calls share a
    /// bucket.
    #[default]
    All,
    /// Positional arguments only; keyword arguments are ignored.
    Positional,
    /// Keyword arguments only; positional arguments are ignored.
    Keyword,
    /// Caller-supplied mapping from arguments to a bucket value.
    ///
    /// A panic inside the function reaches the caller unchanged.
    Custom(Arc<CustomBucketFn>),
}

impl BucketStrategy {
    /// Build a [`BucketStrategy::Custom`] from a closure.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&CallArgs) -> Value + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Map `args` to the key of the bucket they belong to.
    pub fn resolve(&self, args: &CallArgs) -> BucketKey {
        match self {
            Self::All => BucketKey::from(args.clone()),
            Self::Positional => BucketKey::from(args.positional_only()),
            Self::Keyword => BucketKey::from(args.keyword_only()),
            Self::Custom(f) => BucketKey::from(CallArgs::single(f(args))),
        }
    } // end method resolve
}

impl fmt::Debug for BucketStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Positional => f.write_str("Positional"),
            Self::Keyword => f.write_str("Keyword"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
