//! Application Configuration
//!
//! Configuration for the leaderboard application layer.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::value_objects::Category;

/// Default upstream base URL for player data
pub const DEFAULT_BASE_URL: &str = "https://api.chess.com/pub/player";

/// Leaderboard application configuration
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    /// Path of the roster JSON file
    pub roster_path: PathBuf,
    /// Upstream base URL, `{base}/{handle}` and `{base}/{handle}/stats`
    pub base_url: String,
    /// Per-request upstream timeout
    pub request_timeout: Duration,
    /// TTL of the ranked per-category payload
    pub ratings_cache_ttl: Duration,
    /// TTL of cached profile lookups
    pub profile_cache_ttl: Duration,
    /// Interval between scheduled refresh cycles
    pub refresh_interval: Duration,
    /// Maximum number of rows served per category
    pub display_size: usize,
    /// Category used for ranking, previousRank and history
    pub primary_category: Category,
    /// Whether the background scheduler runs at all
    pub scheduler_enabled: bool,
    /// Hour of day from which scheduled refreshes may run
    pub update_window_start_hour: u32,
    /// Restrict scheduled refreshes to Monday through Friday
    pub update_weekdays_only: bool,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            roster_path: PathBuf::from("players.json"),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: platform::http::DEFAULT_REQUEST_TIMEOUT,
            ratings_cache_ttl: Duration::from_secs(15),
            profile_cache_ttl: Duration::from_secs(60),
            refresh_interval: Duration::from_secs(5 * 60),
            display_size: 50,
            primary_category: Category::Rapid,
            scheduler_enabled: true,
            update_window_start_hour: 6,
            update_weekdays_only: true,
        }
    }
}

impl LeaderboardConfig {
    /// Build the config from environment variables, falling back to
    /// defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            roster_path: env_var("ROSTER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.roster_path),
            base_url: env_var("CHESS_API_BASE_URL").unwrap_or(defaults.base_url),
            request_timeout: env_secs("REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout),
            ratings_cache_ttl: env_secs("RATINGS_CACHE_TTL_SECS")
                .unwrap_or(defaults.ratings_cache_ttl),
            profile_cache_ttl: env_secs("PROFILE_CACHE_TTL_SECS")
                .unwrap_or(defaults.profile_cache_ttl),
            refresh_interval: env_secs("REFRESH_INTERVAL_SECS")
                .unwrap_or(defaults.refresh_interval),
            display_size: env_parse("DISPLAY_SIZE").unwrap_or(defaults.display_size),
            primary_category: env_var("PRIMARY_CATEGORY")
                .map(|raw| Category::from_query(&raw))
                .unwrap_or(defaults.primary_category),
            scheduler_enabled: env_parse("SCHEDULER_ENABLED")
                .unwrap_or(defaults.scheduler_enabled),
            update_window_start_hour: env_parse("UPDATE_WINDOW_START_HOUR")
                .unwrap_or(defaults.update_window_start_hour),
            update_weekdays_only: env_parse("UPDATE_WEEKDAYS_ONLY")
                .unwrap_or(defaults.update_weekdays_only),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_var(name).and_then(|v| v.parse().ok())
}

fn env_secs(name: &str) -> Option<Duration> {
    env_parse::<u64>(name).map(Duration::from_secs)
}
