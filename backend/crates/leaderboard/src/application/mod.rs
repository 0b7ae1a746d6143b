//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains the leaderboard aggregator, the roster refresh cycle
//! and the background scheduler.

pub mod build_leaderboard;
pub mod config;
pub mod refresh_roster;
pub mod scheduler;
