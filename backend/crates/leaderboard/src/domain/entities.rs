//! Domain Entities
//!
//! Core business entities for the leaderboard domain. `PlayerRecord` is
//! the persisted roster shape; the remaining types are transient views
//! built from upstream data.

use chrono::NaiveDate;
use kernel::handle::Handle;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Category, Direction, TrendSummary, WinLossDrawBar};

/// Aggregate game record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl RecordCounts {
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

/// Ratings for one category, as stored or as freshly fetched
///
/// Every field is optional: the upstream omits buckets a player has
/// never played, and `tactics` usually carries no current rating at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordCounts>,
}

/// Sliding window of daily ratings, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistorySeries(Vec<u32>);

impl HistorySeries {
    /// Window size in days
    pub const WINDOW: usize = 7;

    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a rating, dropping the oldest entry past the window
    pub fn push(&mut self, rating: u32) {
        self.0.push(rating);
        if self.0.len() > Self::WINDOW {
            self.0.remove(0);
        }
    }

    pub fn values(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u32>> for HistorySeries {
    fn from(values: Vec<u32>) -> Self {
        let mut series = Self::new();
        for value in values {
            series.push(value);
        }
        series
    }
}

/// Roster entry, persisted as camelCase JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub username: Handle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Graduation-year cohort label, e.g. "2027"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Rank in the primary category at the previous refresh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rapid: Option<RatingSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blitz: Option<RatingSnapshot>,
    #[serde(default, skip_serializing_if = "HistorySeries::is_empty")]
    pub history7days: HistorySeries,
    /// Calendar day of the last history append, the once-per-day guard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_history_update: Option<NaiveDate>,
    /// Aggregate game record from the last refresh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<RecordCounts>,
}

impl PlayerRecord {
    /// Bare record with just a username
    pub fn new(username: Handle) -> Self {
        Self {
            username,
            first_name: None,
            last_name: None,
            promo: None,
            class: None,
            avatar: None,
            previous_rank: None,
            rapid: None,
            blitz: None,
            history7days: HistorySeries::new(),
            last_history_update: None,
            stats: None,
        }
    }

    /// Stored snapshot for a category, if the roster tracks it
    ///
    /// Only rapid and blitz are persisted; other categories are
    /// fetched live and never stored.
    pub fn snapshot(&self, category: Category) -> Option<&RatingSnapshot> {
        match category {
            Category::Rapid => self.rapid.as_ref(),
            Category::Blitz => self.blitz.as_ref(),
            _ => None,
        }
    }

    /// Stored current rating for a category
    pub fn current_rating(&self, category: Category) -> Option<u32> {
        self.snapshot(category).and_then(|s| s.current)
    }

    /// Numeric graduation year, if the promo label parses as one
    pub fn promo_year(&self) -> Option<i32> {
        self.promo.as_deref().and_then(|p| p.trim().parse().ok())
    }

    /// Append to the history at most once per calendar day
    ///
    /// Returns true when the rating was recorded.
    pub fn push_history_once(&mut self, today: NaiveDate, rating: u32) -> bool {
        if self.last_history_update == Some(today) {
            return false;
        }
        self.history7days.push(rating);
        self.last_history_update = Some(today);
        true
    }
}

/// One upstream stats fetch, split per category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsReport {
    pub blitz: Option<RatingSnapshot>,
    pub rapid: Option<RatingSnapshot>,
    pub bullet: Option<RatingSnapshot>,
    pub daily: Option<RatingSnapshot>,
    pub puzzle_rush: Option<RatingSnapshot>,
}

impl StatsReport {
    pub fn category(&self, category: Category) -> Option<&RatingSnapshot> {
        match category {
            Category::Blitz => self.blitz.as_ref(),
            Category::Rapid => self.rapid.as_ref(),
            Category::Bullet => self.bullet.as_ref(),
            Category::Daily => self.daily.as_ref(),
            Category::PuzzleRush => self.puzzle_rush.as_ref(),
        }
    }

    /// Aggregate record, preferring rapid over blitz
    pub fn aggregate_record(&self) -> Option<RecordCounts> {
        self.rapid
            .as_ref()
            .and_then(|s| s.record)
            .or_else(|| self.blitz.as_ref().and_then(|s| s.record))
    }
}

/// Public profile fields fetched from the upstream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerProfile {
    pub avatar: Option<String>,
}

/// Fully computed leaderboard row
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub username: Handle,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub promo: Option<String>,
    pub class: Option<String>,
    pub rank: u32,
    pub current: Option<u32>,
    pub best: Option<u32>,
    pub last_known: Option<u32>,
    pub direction: Direction,
    pub avatar: Option<String>,
    pub trend: Option<TrendSummary>,
    pub win_loss_draw: Option<WinLossDrawBar>,
}
