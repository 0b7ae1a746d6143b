//! Domain Value Objects
//!
//! Immutable value types for the leaderboard domain.

use std::fmt;

use serde::Serialize;

/// Rating category tracked by the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Blitz,
    Rapid,
    Bullet,
    Daily,
    PuzzleRush,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Blitz,
        Category::Rapid,
        Category::Bullet,
        Category::Daily,
        Category::PuzzleRush,
    ];

    /// Key of the matching bucket in the upstream stats payload
    pub fn stat_key(&self) -> &'static str {
        match self {
            Category::Blitz => "chess_blitz",
            Category::Rapid => "chess_rapid",
            Category::Bullet => "chess_bullet",
            Category::Daily => "chess_daily",
            Category::PuzzleRush => "tactics",
        }
    }

    /// Canonical lowercase name, as used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Blitz => "blitz",
            Category::Rapid => "rapid",
            Category::Bullet => "bullet",
            Category::Daily => "daily",
            Category::PuzzleRush => "puzzle_rush",
        }
    }

    /// Parse a query-string value, tolerating legacy aliases
    ///
    /// Anything unrecognized falls back to Blitz rather than erroring;
    /// a bad query parameter should never break the board.
    pub fn from_query(raw: &str) -> Self {
        match raw {
            "blitz" | "live_blitz" => Category::Blitz,
            "rapid" | "live_rapid" => Category::Rapid,
            "bullet" => Category::Bullet,
            "daily" => Category::Daily,
            "puzzle_rush" => Category::PuzzleRush,
            _ => Category::Blitz,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rank movement since the previous refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    #[default]
    Neutral,
}

/// Color class for a trend polyline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendColor {
    Gain,
    Loss,
    Flat,
}

/// One point of a trend polyline, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub x: f64,
    pub y: f64,
}

/// Rendered 7-day rating trend
///
/// Points are mapped onto a fixed-size canvas so the client can draw
/// the polyline without knowing the rating scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub points: Vec<TrendPoint>,
    pub color: TrendColor,
    pub change_percent: f64,
}

/// Win/loss/draw shares in percent
///
/// Each share is rounded independently; the sum may drift from 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinLossDrawBar {
    pub win_percent: u32,
    pub loss_percent: u32,
    pub draw_percent: u32,
}
