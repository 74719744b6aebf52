use std::{future::Future, time::Duration};

use crate::CooldownError;

#[cfg(not(any(feature = "rt-tokio", feature = "rt-smol")))]
compile_error!("enable one of the `rt-tokio` or `rt-smol` features");

#[cfg(feature = "rt-tokio")]
pub(crate) type Interval = tokio::time::Interval;

#[cfg(all(feature = "rt-smol", not(feature = "rt-tokio")))]
pub(crate) type Interval = smol::Timer;

#[cfg(feature = "rt-tokio")]
pub(crate) type TaskHandle = tokio::task::JoinHandle<()>;

#[cfg(all(feature = "rt-smol", not(feature = "rt-tokio")))]
pub(crate) type TaskHandle = smol::Task<()>;

#[cfg(feature = "rt-tokio")]
pub(crate) fn new_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval
}

#[cfg(all(feature = "rt-smol", not(feature = "rt-tokio")))]
pub(crate) fn new_interval(period: Duration) -> Interval {
    smol::Timer::interval(period)
}

#[cfg(feature = "rt-tokio")]
pub(crate) fn spawn_task<F>(fut: F) -> Result<TaskHandle, CooldownError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::runtime::Handle::try_current()
        .map_err(|err| CooldownError::RuntimeUnavailable(err.to_string()))?;

    Ok(handle.spawn(fut))
}

#[cfg(all(feature = "rt-smol", not(feature = "rt-tokio")))]
pub(crate) fn spawn_task<F>(fut: F) -> Result<TaskHandle, CooldownError>
where
    F: Future<Output = ()> + Send + 'static,
{
    Ok(smol::spawn(fut))
}

#[cfg(feature = "rt-tokio")]
pub(crate) fn cancel_task(handle: TaskHandle) {
    handle.abort();
}

#[cfg(all(feature = "rt-smol", not(feature = "rt-tokio")))]
pub(crate) fn cancel_task(handle: TaskHandle) {
    // Dropping a smol task cancels it.
    drop(handle);
}

#[cfg(feature = "rt-tokio")]
pub(crate) async fn tick(interval: &mut Interval) {
    interval.tick().await;
}

#[cfg(all(feature = "rt-smol", not(feature = "rt-tokio")))]
pub(crate) async fn tick(interval: &mut Interval) {
    use futures::StreamExt;
    interval.next().await;
}
