//! Repository Traits
//!
//! Interfaces for roster persistence and upstream rating data.
//! Implementations live in the infrastructure layer.

use kernel::handle::Handle;

use crate::domain::entities::{PlayerProfile, PlayerRecord, StatsReport};
use crate::error::LeaderboardResult;

/// Roster repository trait
#[trait_variant::make(RosterRepository: Send)]
pub trait LocalRosterRepository {
    /// Load the full roster
    async fn load(&self) -> LeaderboardResult<Vec<PlayerRecord>>;

    /// Replace the roster wholesale, returning the new player count
    async fn replace(&self, players: Vec<PlayerRecord>) -> LeaderboardResult<usize>;
}

/// Upstream rating provider trait
///
/// Both operations degrade to `None` on any upstream problem; the
/// caller treats a missing result as Absent fields, never as an error.
#[trait_variant::make(RatingProvider: Send)]
pub trait LocalRatingProvider {
    /// Fetch per-category stats for a player
    async fn fetch_stats(&self, handle: &Handle) -> Option<StatsReport>;

    /// Fetch the public profile for a player
    async fn fetch_profile(&self, handle: &Handle) -> Option<PlayerProfile>;
}
