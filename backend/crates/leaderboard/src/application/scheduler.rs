//! Refresh Scheduler
//!
//! Background task ticking at the refresh interval. Owns its timer and
//! shutdown state explicitly; no ambient global scheduler. Ticks are
//! gated by the update window and never overlap a running cycle.

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::application::config::LeaderboardConfig;
use crate::application::refresh_roster::RefreshRosterUseCase;
use crate::domain::repository::{RatingProvider, RosterRepository};
use crate::error::LeaderboardError;

/// Handle to the running background refresh task
pub struct RefreshScheduler {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawn the refresh loop
    ///
    /// The first tick fires one interval after start, not immediately.
    pub fn start<R, P>(
        refresh: Arc<RefreshRosterUseCase<R, P>>,
        config: Arc<LeaderboardConfig>,
    ) -> Self
    where
        R: RosterRepository + Send + Sync + 'static,
        P: RatingProvider + Send + Sync + 'static,
    {
        let (shutdown, mut rx) = watch::channel(false);
        let interval = config.refresh_interval;
        let task = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(interval_secs = interval.as_secs(), "refresh scheduler started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !update_window_allows(&config, Local::now().naive_local()) {
                            tracing::debug!("outside update window, skipping tick");
                            continue;
                        }
                        match refresh.execute().await {
                            Ok(outcome) => tracing::info!(
                                updated = outcome.updated,
                                errors = outcome.errors,
                                removed = outcome.removed,
                                "scheduled refresh finished"
                            ),
                            Err(LeaderboardError::RefreshInProgress) => {
                                tracing::warn!("previous cycle still running, skipping tick");
                            }
                            Err(e) => tracing::error!(error = %e, "scheduled refresh failed"),
                        }
                    }
                    changed = rx.changed() => {
                        if changed.is_err() || *rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("refresh scheduler stopped");
        });
        Self { shutdown, task }
    }

    /// Signal shutdown and wait for the loop to exit
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// Update-window gate for scheduled refreshes
///
/// Manual refreshes bypass this; only the scheduler calls it.
pub fn update_window_allows(config: &LeaderboardConfig, now: NaiveDateTime) -> bool {
    if config.update_weekdays_only
        && matches!(now.weekday(), Weekday::Sat | Weekday::Sun)
    {
        return false;
    }
    now.hour() >= config.update_window_start_hour
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_window_allows_weekday_after_start_hour() {
        let config = LeaderboardConfig::default();
        // 2026-08-24 is a Monday
        assert!(update_window_allows(&config, at(2026, 8, 24, 6)));
        assert!(update_window_allows(&config, at(2026, 8, 26, 23)));
    }

    #[test]
    fn test_window_blocks_early_morning() {
        let config = LeaderboardConfig::default();
        assert!(!update_window_allows(&config, at(2026, 8, 24, 5)));
        assert!(!update_window_allows(&config, at(2026, 8, 24, 0)));
    }

    #[test]
    fn test_window_blocks_weekend() {
        let config = LeaderboardConfig::default();
        // 2026-08-29 is a Saturday
        assert!(!update_window_allows(&config, at(2026, 8, 29, 12)));
        assert!(!update_window_allows(&config, at(2026, 8, 30, 12)));
    }

    #[test]
    fn test_window_ignores_weekend_when_disabled() {
        let config = LeaderboardConfig {
            update_weekdays_only: false,
            ..Default::default()
        };
        assert!(update_window_allows(&config, at(2026, 8, 29, 12)));
    }
}
