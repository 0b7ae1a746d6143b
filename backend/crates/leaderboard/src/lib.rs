//! Chess Leaderboard Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, pure calculators, repository traits
//! - `application/` - Use cases, config, refresh scheduler
//! - `infra/` - Chess.com HTTP provider, JSON roster store
//! - `presentation/` - HTTP handlers, router, DTOs
//!
//! ## Data Flow
//! - The roster file is the single source of truth for who is on the board
//! - Upstream rating data is merged in at read time, never trusted to exist
//! - A missing rating is an Absent field on the output, never a batch failure
//! - Ranked output is served through a short-lived per-category cache

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::LeaderboardConfig;
pub use application::refresh_roster::{RefreshOutcome, RefreshRosterUseCase};
pub use application::scheduler::RefreshScheduler;
pub use error::{LeaderboardError, LeaderboardResult};
pub use infra::chess_com::ChessComProvider;
pub use infra::roster_file::JsonRosterStore;
pub use presentation::handlers::LeaderboardAppState;
pub use presentation::router::{leaderboard_router, leaderboard_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult, OptionExt, ResultExt},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
