//! Refresh Roster Use Case
//!
//! One guarded refresh cycle: prune graduated players, record the
//! pre-refresh ranking, fetch fresh upstream data, merge it into the
//! roster and persist atomically.

use std::sync::Arc;

use chrono::{Datelike, Local};
use tokio::sync::Mutex;

use crate::application::build_leaderboard::fetch_batch;
use crate::application::config::LeaderboardConfig;
use crate::domain::entities::RatingSnapshot;
use crate::domain::repository::{RatingProvider, RosterRepository};
use crate::domain::services::compare_by_rating;
use crate::error::{LeaderboardError, LeaderboardResult};

/// Counters from one refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Players whose upstream fetch succeeded
    pub updated: usize,
    /// Players whose upstream fetch failed (old data kept)
    pub errors: usize,
    /// Graduated players pruned from the roster
    pub removed: usize,
    /// Players on the roster after the cycle
    pub total: usize,
}

/// Refresh Roster Use Case
pub struct RefreshRosterUseCase<R, P>
where
    R: RosterRepository,
    P: RatingProvider,
{
    roster: Arc<R>,
    provider: Arc<P>,
    config: Arc<LeaderboardConfig>,
    // Cycle guard: held for the whole cycle, try-acquired so a second
    // trigger fails fast instead of queueing.
    cycle: Mutex<()>,
}

impl<R, P> RefreshRosterUseCase<R, P>
where
    R: RosterRepository + Send + Sync + 'static,
    P: RatingProvider + Send + Sync + 'static,
{
    pub fn new(roster: Arc<R>, provider: Arc<P>, config: Arc<LeaderboardConfig>) -> Self {
        Self {
            roster,
            provider,
            config,
            cycle: Mutex::new(()),
        }
    }

    /// Run one refresh cycle
    ///
    /// Returns `RefreshInProgress` when a cycle is already in flight.
    pub async fn execute(&self) -> LeaderboardResult<RefreshOutcome> {
        let _guard = self
            .cycle
            .try_lock()
            .map_err(|_| LeaderboardError::RefreshInProgress)?;
        self.run_cycle().await
    }

    async fn run_cycle(&self) -> LeaderboardResult<RefreshOutcome> {
        let mut players = self.roster.load().await?;
        let before = players.len();

        // Prune graduated cohorts
        let current_year = Local::now().year();
        players.retain(|player| match player.promo_year() {
            Some(year) if year <= current_year => {
                tracing::info!(username = %player.username, promo = year, "removing graduated player");
                false
            }
            _ => true,
        });
        let removed = before - players.len();

        // Record the pre-refresh ranking so the next read can show movement
        let primary = self.config.primary_category;
        let mut order: Vec<usize> = (0..players.len()).collect();
        order.sort_by(|&a, &b| {
            compare_by_rating(
                players[a].current_rating(primary),
                players[b].current_rating(primary),
            )
        });
        for (index, &player_index) in order.iter().enumerate() {
            players[player_index].previous_rank = Some(index as u32 + 1);
        }

        let fetched = fetch_batch(&self.provider, &players).await;
        let today = Local::now().date_naive();

        let mut updated = 0;
        let mut errors = 0;
        for (player, (stats, profile)) in players.iter_mut().zip(fetched) {
            let Some(report) = stats else {
                errors += 1;
                tracing::warn!(username = %player.username, "refresh kept stale data for player");
                continue;
            };
            updated += 1;

            if let Some(fresh) = &report.rapid {
                player.rapid = Some(merge_snapshot(player.rapid.as_ref(), fresh));
            }
            if let Some(fresh) = &report.blitz {
                player.blitz = Some(merge_snapshot(player.blitz.as_ref(), fresh));
            }
            player.stats = report.aggregate_record().or(player.stats);
            if let Some(avatar) = profile.and_then(|p| p.avatar) {
                player.avatar = Some(avatar);
            }
            if let Some(rating) = player.current_rating(primary) {
                player.push_history_once(today, rating);
            }
        }

        let total = players.len();
        if updated > 0 {
            players.sort_by(|a, b| {
                compare_by_rating(a.current_rating(primary), b.current_rating(primary))
            });
            self.roster.replace(players).await?;
        } else {
            tracing::warn!("no upstream fetch succeeded, leaving roster untouched");
        }

        let outcome = RefreshOutcome {
            updated,
            errors,
            removed,
            total,
        };
        tracing::info!(
            updated = outcome.updated,
            errors = outcome.errors,
            removed = outcome.removed,
            total = outcome.total,
            "refresh cycle finished"
        );
        Ok(outcome)
    }
}

/// Merge a fresh snapshot over a stored one
///
/// The fresh current rating always wins; best is the max of both sides;
/// a missing fresh record keeps the stored one.
fn merge_snapshot(stored: Option<&RatingSnapshot>, fresh: &RatingSnapshot) -> RatingSnapshot {
    let stored_best = stored.and_then(|s| s.best);
    RatingSnapshot {
        current: fresh.current,
        best: match (stored_best, fresh.best) {
            (Some(old), Some(new)) => Some(old.max(new)),
            (old, new) => new.or(old),
        },
        record: fresh.record.or_else(|| stored.and_then(|s| s.record)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_snapshot_keeps_best_high_water_mark() {
        let stored = RatingSnapshot {
            current: Some(1400),
            best: Some(1600),
            record: None,
        };
        let fresh = RatingSnapshot {
            current: Some(1450),
            best: Some(1500),
            record: None,
        };
        let merged = merge_snapshot(Some(&stored), &fresh);
        assert_eq!(merged.current, Some(1450));
        assert_eq!(merged.best, Some(1600));
    }

    #[test]
    fn test_merge_snapshot_adopts_new_best_when_higher() {
        let stored = RatingSnapshot {
            current: Some(1400),
            best: Some(1500),
            record: None,
        };
        let fresh = RatingSnapshot {
            current: Some(1550),
            best: Some(1550),
            record: None,
        };
        let merged = merge_snapshot(Some(&stored), &fresh);
        assert_eq!(merged.best, Some(1550));
    }

    #[test]
    fn test_merge_snapshot_without_stored_side() {
        let fresh = RatingSnapshot {
            current: Some(1200),
            best: Some(1250),
            record: None,
        };
        let merged = merge_snapshot(None, &fresh);
        assert_eq!(merged.current, Some(1200));
        assert_eq!(merged.best, Some(1250));
    }
}
