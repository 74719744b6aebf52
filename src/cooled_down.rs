use std::{fmt, future::Future, sync::Arc};

use futures::future::BoxFuture;

use crate::{CallArgs, CallableOnCooldown, Cooldown, CooldownId};

type SyncCheckFn = dyn Fn(&CallArgs) -> bool + Send + Sync;
type AsyncCheckFn = dyn Fn(CallArgs) -> BoxFuture<'static, bool> + Send + Sync;

/// Predicate deciding whether a cooldown applies to a call.
///
/// Evaluated with the call's own arguments before the cooldown is engaged.
/// When it returns `false` the cooldown is skipped entirely for that call:
/// no bucket is resolved and nothing is consumed.
#[derive(Clone)]
pub enum Check {
    /// Synchronous predicate.
    Sync(Arc<SyncCheckFn>),
    /// Asynchronous predicate, e.g. one that consults a database.
    Async(Arc<AsyncCheckFn>),
}

impl Check {
    /// Build a synchronous check.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&CallArgs) -> bool + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Build an asynchronous check. The future receives its own copy of the
    /// arguments.
    pub fn new_async<F, Fut>(f: F) -> Self
    where
        F: Fn(CallArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self::Async(Arc::new(move |args| -> BoxFuture<'static, bool> {
            Box::pin(f(args))
        }))
    }

    /// Evaluate the check for `args`.
    pub async fn applies(&self, args: &CallArgs) -> bool {
        match self {
            Self::Sync(f) => f(args),
            Self::Async(f) => f(args.clone()).await,
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Check::Sync(..)"),
            Self::Async(_) => f.write_str("Check::Async(..)"),
        }
    }
}

struct CooldownLayer {
    cooldown: Arc<Cooldown>,
    check: Option<Check>,
}

/// An async callable guarded by one or more cooldowns.
///
/// Layers are evaluated in the order they were added; the first layer added is
/// the outermost. A call runs only if every applicable layer admits it, and the
/// first rejection is returned.
///
/// # Stacking and rollback
///
/// Layers are independent ledgers. When a later layer rejects a call, the
/// layers before it have already counted that call and are **not** rolled
/// back: each cooldown counts the attempts it admitted, not the calls that
/// eventually ran.
///
/// # Errors
///
/// The callable's error type must be able to absorb a
/// [`CallableOnCooldown`]; errors produced by the callable itself are returned
/// unchanged.
///
/// # Examples
///
/// ```no_run
/// use std::{sync::Arc, time::Duration};
///
/// use cooldowns::{BucketStrategy, CallArgs, CooledDown, Cooldown, CooldownError, call_args};
///
/// # async fn run() -> Result<(), CooldownError> {
/// let per_user = Arc::new(Cooldown::fixed(1, Duration::from_secs(1), BucketStrategy::Positional)?);
///
/// let greet = CooledDown::new("greet", |args: CallArgs| async move {
///     Ok::<_, CooldownError>(format!("hello {args}"))
/// })
/// .with_cooldown(per_user);
///
/// greet.call(call_args!["alice"]).await?;
/// assert!(greet.call(call_args!["alice"]).await.is_err());
/// # Ok(())
/// # }
/// ```
pub struct CooledDown<F> {
    name: Arc<str>,
    func: F,
    layers: Vec<CooldownLayer>,
}

impl<F> CooledDown<F> {
    /// Wrap `func`. `name` identifies it in [`CallableOnCooldown`] errors.
    pub fn new(name: impl Into<Arc<str>>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            layers: Vec::new(),
        }
    }

    /// Add a cooldown that applies to every call.
    pub fn with_cooldown(self, cooldown: Arc<Cooldown>) -> Self {
        self.push_layer(cooldown, None)
    }

    /// Add a cooldown that only applies when `check` passes.
    pub fn with_checked_cooldown(self, cooldown: Arc<Cooldown>, check: Check) -> Self {
        self.push_layer(cooldown, Some(check))
    }

    fn push_layer(mut self, cooldown: Arc<Cooldown>, check: Option<Check>) -> Self {
        cooldown.attach(Arc::clone(&self.name));
        self.layers.push(CooldownLayer { cooldown, check });
        self
    }

    /// Name of the wrapped callable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attached cooldowns, outermost first.
    pub fn cooldowns(&self) -> impl Iterator<Item = &Arc<Cooldown>> {
        self.layers.iter().map(|layer| &layer.cooldown)
    }

    /// First attached cooldown carrying `id`.
    pub fn cooldown(&self, id: &CooldownId) -> Option<&Arc<Cooldown>> {
        self.cooldowns()
            .find(|cooldown| cooldown.cooldown_id() == Some(id))
    }

    /// Call the wrapped function with `args` if every layer admits it.
    pub async fn call<Fut, T, E>(&self, args: CallArgs) -> Result<T, E>
    where
        F: Fn(CallArgs) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CallableOnCooldown>,
    {
        for layer in &self.layers {
            if let Some(check) = &layer.check
                && !check.applies(&args).await
            {
                continue;
            }

            layer.cooldown.enter(&args).await?;
        }

        (self.func)(args).await
    } // end method call
}

impl<F> fmt::Debug for CooledDown<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CooledDown")
            .field("name", &self.name)
            .field(
                "cooldowns",
                &self.cooldowns().map(|c| &**c).collect::<Vec<&Cooldown>>(),
            )
            .finish()
    }
}
