//! Leaderboard Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::application::config::LeaderboardConfig;
use crate::domain::repository::{RatingProvider, RosterRepository};
use crate::infra::chess_com::ChessComProvider;
use crate::infra::roster_file::JsonRosterStore;
use crate::presentation::handlers::{self, LeaderboardAppState};

/// Create the leaderboard router with the file store and Chess.com provider
pub fn leaderboard_router(
    state: LeaderboardAppState<JsonRosterStore, ChessComProvider>,
) -> Router {
    leaderboard_router_generic(state)
}

/// Create a generic leaderboard router for any repository and provider
pub fn leaderboard_router_generic<R, P>(state: LeaderboardAppState<R, P>) -> Router
where
    R: RosterRepository + Send + Sync + 'static,
    P: RatingProvider + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/players",
            get(handlers::get_players::<R, P>).post(handlers::replace_players::<R, P>),
        )
        .route("/ratings", get(handlers::get_ratings::<R, P>))
        .route("/refresh", post(handlers::trigger_refresh::<R, P>))
        .with_state(state)
}

/// Build the default state for the concrete router
pub fn default_state(
    config: LeaderboardConfig,
) -> Result<LeaderboardAppState<JsonRosterStore, ChessComProvider>, reqwest::Error> {
    let roster = JsonRosterStore::new(config.roster_path.clone());
    let provider = ChessComProvider::new(&config)?;
    Ok(LeaderboardAppState::new(roster, provider, config))
}
