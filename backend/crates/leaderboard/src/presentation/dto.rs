//! API DTOs (Data Transfer Objects)

use serde::Serialize;

use crate::application::refresh_roster::RefreshOutcome;
use crate::domain::entities::RankedEntry;
use crate::domain::value_objects::{Direction, TrendSummary, WinLossDrawBar};

/// One row of GET /api/ratings
///
/// `current`, `best` and `lastKnown` serialize as null when absent so
/// the client can tell "no rating" from "field missing".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedPlayerResponse {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub rank: u32,
    pub current: Option<u32>,
    pub best: Option<u32>,
    pub last_known: Option<u32>,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_loss_draw: Option<WinLossDrawBar>,
}

impl From<RankedEntry> for RatedPlayerResponse {
    fn from(entry: RankedEntry) -> Self {
        Self {
            username: entry.username.into(),
            first_name: entry.first_name,
            last_name: entry.last_name,
            promo: entry.promo,
            class: entry.class,
            rank: entry.rank,
            current: entry.current,
            best: entry.best,
            last_known: entry.last_known,
            direction: entry.direction,
            avatar: entry.avatar,
            trend: entry.trend,
            win_loss_draw: entry.win_loss_draw,
        }
    }
}

/// Response for POST /api/refresh
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub message: String,
    pub updated: usize,
    pub errors: usize,
    pub removed: usize,
    pub total: usize,
}

impl From<RefreshOutcome> for RefreshResponse {
    fn from(outcome: RefreshOutcome) -> Self {
        Self {
            message: "Refresh completed".to_string(),
            updated: outcome.updated,
            errors: outcome.errors,
            removed: outcome.removed,
            total: outcome.total,
        }
    }
}

/// Response for POST /api/players
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterUpdateResponse {
    pub message: String,
    pub count: usize,
}
