use std::{
    fmt,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

use crate::CooldownError;

/// When a bucket's consumption resets.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use chrono::NaiveTime;
/// use cooldowns::Window;
///
/// // Reset one minute after the first call of each window.
/// let fixed = Window::try_from(Duration::from_secs(60)).unwrap();
///
/// // Reset every day at 15:00 local time.
/// let daily = Window::from(NaiveTime::from_hms_opt(15, 0, 0).unwrap());
///
/// assert!(Window::try_from(Duration::ZERO).is_err());
/// # let _ = (fixed, daily);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// The window ends this long after the first call made in it.
    Fixed(Duration),
    /// The window ends at the next occurrence of this local time of day.
    Daily(NaiveTime),
}

impl Window {
    pub(crate) fn validate(&self) -> Result<(), CooldownError> {
        match self {
            Self::Fixed(period) if period.is_zero() => Err(CooldownError::InvalidWindow(
                "Window period must be greater than 0".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Deadline of a window that starts at `now`.
    pub(crate) fn next_deadline(&self, now: Instant) -> Instant {
        match self {
            Self::Fixed(period) => now + *period,
            Self::Daily(at) => now + until_next_occurrence(*at, &Local::now()),
        }
    } // end method next_deadline
}

impl TryFrom<Duration> for Window {
    type Error = CooldownError;

    fn try_from(period: Duration) -> Result<Self, Self::Error> {
        let window = Self::Fixed(period);
        window.validate()?;
        Ok(window)
    }
}

impl From<NaiveTime> for Window {
    fn from(at: NaiveTime) -> Self {
        Self::Daily(at)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(period) => write!(f, "{period:?}"),
            Self::Daily(at) => write!(f, "day until {at}"),
        }
    }
}

/// Time from `now` until the next `at` that is strictly in the future.
///
/// If `at` has already passed today (or is exactly now) the next occurrence is
/// tomorrow. The deadline is resolved in `now`'s time zone, so a day with a
/// DST shift is an hour shorter or longer. An ambiguous local time resolves to
/// its earliest instant; a time skipped by a forward shift fires an hour
/// later on the wall clock.
pub(crate) fn until_next_occurrence<Tz: TimeZone>(at: NaiveTime, now: &DateTime<Tz>) -> Duration {
    let tz = now.timezone();
    let mut date = Some(now.date_naive());

    // Today and the following two days cover a deadline pushed out by any shift.
    for _ in 0..3 {
        let Some(day) = date else {
            break;
        };

        if let Some(deadline) = resolve_local(&tz, day.and_time(at))
            && deadline > *now
        {
            return deadline
                .signed_duration_since(now.clone())
                .to_std()
                .unwrap_or_default();
        }

        date = day.succ_opt();
    }

    Duration::from_secs(24 * 60 * 60)
} // end fn until_next_occurrence

fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + TimeDelta::hours(1))).earliest())
}
