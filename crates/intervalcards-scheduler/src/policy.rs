//! Firing policies: when a user's job fires next.

use chrono::{DateTime, Days, FixedOffset, TimeZone, Utc};
use intervalcards_core::config::SchedulerConfig;
use intervalcards_core::error::{IntervalCardsError, Result};
use intervalcards_core::types::validate_interval;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FiringPolicy {
    /// Minute 0 of hours `window_start + k * every_hours` below `window_end`,
    /// local to `offset`. Spacing across midnight is whatever the window leaves.
    DaytimeInterval {
        every_hours: u8,
        window_start: u32,
        window_end: u32,
        offset: FixedOffset,
    },
    /// Every `period`, around the clock.
    FixedPeriod(Duration),
}

impl FiringPolicy {
    /// Policy for a user interval. Fast mode swaps in the fixed short period.
    pub fn from_config(interval_hours: u8, config: &SchedulerConfig) -> Result<Self> {
        let every_hours = validate_interval(interval_hours)?;
        if config.fast_mode {
            return Ok(Self::FixedPeriod(Duration::from_secs(config.fast_period_secs.max(1))));
        }
        if config.window_start_hour >= config.window_end_hour || config.window_end_hour > 24 {
            return Err(IntervalCardsError::config(format!(
                "Invalid delivery window {}..{}",
                config.window_start_hour, config.window_end_hour
            )));
        }
        let offset = FixedOffset::east_opt(config.utc_offset_hours * 3600).ok_or_else(|| {
            IntervalCardsError::config(format!("Invalid UTC offset: {}", config.utc_offset_hours))
        })?;
        Ok(Self::DaytimeInterval {
            every_hours,
            window_start: config.window_start_hour,
            window_end: config.window_end_hour,
            offset,
        })
    }

    /// Local hours at which a daytime policy fires. Empty for fixed periods.
    pub fn fire_hours(&self) -> Vec<u32> {
        match self {
            Self::DaytimeInterval { every_hours, window_start, window_end, .. } => {
                (*window_start..*window_end).step_by(usize::from(*every_hours)).collect()
            }
            Self::FixedPeriod(_) => Vec::new(),
        }
    }

    /// First firing instant strictly after `now`.
    pub fn next_fire_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::FixedPeriod(period) => {
                let period = chrono::Duration::from_std(*period).ok()?;
                now.checked_add_signed(period)
            }
            Self::DaytimeInterval { offset, .. } => {
                let today = now.with_timezone(offset).date_naive();
                let hours = self.fire_hours();
                (0..=1u64)
                    .filter_map(|d| today.checked_add_days(Days::new(d)))
                    .flat_map(|date| hours.iter().filter_map(move |h| date.and_hms_opt(*h, 0, 0)))
                    .filter_map(|local| offset.from_local_datetime(&local).single())
                    .map(|at| at.with_timezone(&Utc))
                    .find(|at| *at > now)
            }
        }
    }

    /// How long to sleep from `now` until the next firing.
    pub fn delay_until_next(&self, now: DateTime<Utc>) -> Duration {
        if let Self::FixedPeriod(period) = self {
            return *period;
        }
        self.next_fire_after(now)
            .and_then(|at| (at - now).to_std().ok())
            .unwrap_or(Duration::from_secs(60 * 60))
    }
}

impl std::fmt::Display for FiringPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DaytimeInterval { every_hours, window_start, window_end, offset } => write!(
                f,
                "every {every_hours}h {window_start:02}:00–{window_end:02}:00 UTC{offset}"
            ),
            Self::FixedPeriod(period) => write!(f, "every {}s", period.as_secs()),
        }
    }
}
