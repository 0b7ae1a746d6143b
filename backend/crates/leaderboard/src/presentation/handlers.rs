//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::application::build_leaderboard::BuildLeaderboardUseCase;
use crate::application::config::LeaderboardConfig;
use crate::application::refresh_roster::RefreshRosterUseCase;
use crate::domain::entities::PlayerRecord;
use crate::domain::repository::{RatingProvider, RosterRepository};
use crate::domain::value_objects::Category;
use crate::error::{LeaderboardError, LeaderboardResult};
use crate::presentation::dto::{RatedPlayerResponse, RefreshResponse, RosterUpdateResponse};

/// Shared state for leaderboard handlers
pub struct LeaderboardAppState<R, P>
where
    R: RosterRepository + Send + Sync + 'static,
    P: RatingProvider + Send + Sync + 'static,
{
    pub roster: Arc<R>,
    pub config: Arc<LeaderboardConfig>,
    pub leaderboard: Arc<BuildLeaderboardUseCase<R, P>>,
    pub refresh: Arc<RefreshRosterUseCase<R, P>>,
}

impl<R, P> LeaderboardAppState<R, P>
where
    R: RosterRepository + Send + Sync + 'static,
    P: RatingProvider + Send + Sync + 'static,
{
    /// Wire up the use cases around a repository and provider
    ///
    /// The refresh use case is shared so a scheduler started from the
    /// same state honors the same cycle guard as manual triggers.
    pub fn new(roster: R, provider: P, config: LeaderboardConfig) -> Self {
        let roster = Arc::new(roster);
        let provider = Arc::new(provider);
        let config = Arc::new(config);
        let leaderboard = Arc::new(BuildLeaderboardUseCase::new(
            roster.clone(),
            provider.clone(),
            config.clone(),
        ));
        let refresh = Arc::new(RefreshRosterUseCase::new(
            roster.clone(),
            provider,
            config.clone(),
        ));
        Self {
            roster,
            config,
            leaderboard,
            refresh,
        }
    }
}

impl<R, P> Clone for LeaderboardAppState<R, P>
where
    R: RosterRepository + Send + Sync + 'static,
    P: RatingProvider + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            roster: self.roster.clone(),
            config: self.config.clone(),
            leaderboard: self.leaderboard.clone(),
            refresh: self.refresh.clone(),
        }
    }
}

/// Query parameters for GET /api/ratings
#[derive(Debug, Default, Deserialize)]
pub struct RatingsQuery {
    #[serde(default)]
    pub category: Option<String>,
}

/// GET /api/players
pub async fn get_players<R, P>(
    State(state): State<LeaderboardAppState<R, P>>,
) -> LeaderboardResult<Json<Vec<PlayerRecord>>>
where
    R: RosterRepository + Send + Sync + 'static,
    P: RatingProvider + Send + Sync + 'static,
{
    let players = state.roster.load().await?;
    Ok(Json(players))
}

/// GET /api/ratings?category=<name>
pub async fn get_ratings<R, P>(
    State(state): State<LeaderboardAppState<R, P>>,
    Query(query): Query<RatingsQuery>,
) -> LeaderboardResult<Json<Vec<RatedPlayerResponse>>>
where
    R: RosterRepository + Send + Sync + 'static,
    P: RatingProvider + Send + Sync + 'static,
{
    // Missing or unknown category falls back to blitz, never an error
    let category = query
        .category
        .as_deref()
        .map(Category::from_query)
        .unwrap_or_default();

    let entries = state.leaderboard.execute(category).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// POST /api/players
pub async fn replace_players<R, P>(
    State(state): State<LeaderboardAppState<R, P>>,
    Json(players): Json<Vec<PlayerRecord>>,
) -> LeaderboardResult<Json<RosterUpdateResponse>>
where
    R: RosterRepository + Send + Sync + 'static,
    P: RatingProvider + Send + Sync + 'static,
{
    let mut seen = std::collections::HashSet::new();
    for player in &players {
        if !seen.insert(player.username.clone()) {
            return Err(LeaderboardError::InvalidRoster(format!(
                "duplicate username: {}",
                player.username
            )));
        }
    }

    let count = state.roster.replace(players).await?;
    tracing::info!(count, "roster replaced");
    Ok(Json(RosterUpdateResponse {
        message: "Roster updated".to_string(),
        count,
    }))
}

/// POST /api/refresh
pub async fn trigger_refresh<R, P>(
    State(state): State<LeaderboardAppState<R, P>>,
) -> LeaderboardResult<Json<RefreshResponse>>
where
    R: RosterRepository + Send + Sync + 'static,
    P: RatingProvider + Send + Sync + 'static,
{
    let outcome = state.refresh.execute().await?;
    Ok(Json(RefreshResponse::from(outcome)))
}
