//! Build Leaderboard Use Case
//!
//! Aggregates the roster with fresh upstream data into ranked rows,
//! served through a short-lived per-category cache.

use std::sync::Arc;

use platform::cache::TtlCache;

use crate::application::config::LeaderboardConfig;
use crate::domain::entities::{PlayerProfile, PlayerRecord, RankedEntry, StatsReport};
use crate::domain::repository::{RatingProvider, RosterRepository};
use crate::domain::services::{
    compare_by_rating, direction_from_rank, direction_from_rating, trend_summary,
    win_loss_draw_bar,
};
use crate::domain::value_objects::Category;
use crate::error::LeaderboardResult;

/// Build Leaderboard Use Case
pub struct BuildLeaderboardUseCase<R, P>
where
    R: RosterRepository,
    P: RatingProvider,
{
    roster: Arc<R>,
    provider: Arc<P>,
    config: Arc<LeaderboardConfig>,
    cache: TtlCache<Category, Vec<RankedEntry>>,
}

impl<R, P> BuildLeaderboardUseCase<R, P>
where
    R: RosterRepository + Send + Sync + 'static,
    P: RatingProvider + Send + Sync + 'static,
{
    pub fn new(roster: Arc<R>, provider: Arc<P>, config: Arc<LeaderboardConfig>) -> Self {
        Self {
            roster,
            provider,
            config,
            cache: TtlCache::new(),
        }
    }

    /// Ranked entries for a category, cached per category
    ///
    /// Concurrent requests for the same category share one rebuild.
    pub async fn execute(&self, category: Category) -> LeaderboardResult<Vec<RankedEntry>> {
        self.cache
            .get_or_fetch(category, self.config.ratings_cache_ttl, || {
                self.build(category)
            })
            .await
    }

    /// Uncached build path
    async fn build(&self, category: Category) -> LeaderboardResult<Vec<RankedEntry>> {
        let players = self.roster.load().await?;
        let fetched = fetch_batch(&self.provider, &players).await;

        // Merge: fetched snapshot wins, the stored snapshot only supplies
        // lastKnown and the avatar fallback.
        let mut rows: Vec<Row> = players
            .into_iter()
            .zip(fetched)
            .map(|(player, (stats, profile))| {
                let snapshot = stats
                    .as_ref()
                    .and_then(|report| report.category(category))
                    .cloned()
                    .unwrap_or_default();
                let last_known = player.current_rating(category);
                let record = stats
                    .as_ref()
                    .and_then(StatsReport::aggregate_record)
                    .or(player.stats);
                let avatar = profile
                    .and_then(|p| p.avatar)
                    .or_else(|| player.avatar.clone());
                Row {
                    current: snapshot.current,
                    best: snapshot.best,
                    last_known,
                    record,
                    avatar,
                    player,
                }
            })
            .collect();

        // Stable sort: present ratings descending, absent rows trail in
        // their original order.
        rows.sort_by(|a, b| compare_by_rating(a.current, b.current));

        let mut entries: Vec<RankedEntry> = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                let rank = index as u32 + 1;
                let direction = match row.player.previous_rank {
                    Some(previous) => direction_from_rank(rank, Some(previous)),
                    None => direction_from_rating(row.current, row.last_known),
                };
                RankedEntry {
                    rank,
                    direction,
                    current: row.current,
                    best: row.best,
                    last_known: row.last_known,
                    avatar: row.avatar,
                    trend: trend_summary(&row.player.history7days),
                    win_loss_draw: row.record.as_ref().and_then(win_loss_draw_bar),
                    username: row.player.username,
                    first_name: row.player.first_name,
                    last_name: row.player.last_name,
                    promo: row.player.promo,
                    class: row.player.class,
                }
            })
            .collect();

        entries.truncate(self.config.display_size);

        tracing::debug!(
            category = %category,
            entries = entries.len(),
            "leaderboard rebuilt"
        );

        Ok(entries)
    }
}

struct Row {
    player: PlayerRecord,
    current: Option<u32>,
    best: Option<u32>,
    last_known: Option<u32>,
    record: Option<crate::domain::entities::RecordCounts>,
    avatar: Option<String>,
}

/// Fetch stats and profile for every player concurrently
///
/// Results come back index-aligned with the input; a failed task or a
/// degraded fetch leaves `(None, None)` for that player.
pub(crate) async fn fetch_batch<P>(
    provider: &Arc<P>,
    players: &[PlayerRecord],
) -> Vec<(Option<StatsReport>, Option<PlayerProfile>)>
where
    P: RatingProvider + Send + Sync + 'static,
{
    let mut set = tokio::task::JoinSet::new();
    for (index, player) in players.iter().enumerate() {
        let provider = Arc::clone(provider);
        let handle = player.username.clone();
        set.spawn(async move {
            let stats = provider.fetch_stats(&handle).await;
            let profile = provider.fetch_profile(&handle).await;
            (index, stats, profile)
        });
    }

    let mut results = vec![(None, None); players.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, stats, profile)) => results[index] = (stats, profile),
            Err(e) => tracing::warn!(error = %e, "rating fetch task failed"),
        }
    }
    results
}
