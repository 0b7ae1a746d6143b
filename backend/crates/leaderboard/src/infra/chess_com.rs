//! Chess.com Rating Provider
//!
//! `RatingProvider` implementation against the public Chess.com API.
//! Every failure mode (transport, status, parse) degrades to `None`
//! with a warning; the board renders placeholders instead of erroring.

use std::time::Duration;

use kernel::handle::Handle;
use platform::cache::TtlCache;
use serde::Deserialize;

use crate::application::config::LeaderboardConfig;
use crate::domain::entities::{PlayerProfile, RatingSnapshot, RecordCounts, StatsReport};
use crate::domain::repository::RatingProvider;
use crate::domain::value_objects::Category;

/// Rating provider backed by the Chess.com public API
#[derive(Clone)]
pub struct ChessComProvider {
    client: reqwest::Client,
    base_url: String,
    // Profiles change rarely; successful lookups are cached per handle.
    profile_cache: TtlCache<Handle, PlayerProfile>,
    profile_ttl: Duration,
}

impl ChessComProvider {
    pub fn new(config: &LeaderboardConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: platform::http::upstream_client(config.request_timeout)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile_cache: TtlCache::new(),
            profile_ttl: config.profile_cache_ttl,
        })
    }

    async fn get_body(&self, url: &str, handle: &Handle) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(username = %handle, error = %e, "upstream request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::warn!(
                username = %handle,
                status = %response.status(),
                "upstream rejected request"
            );
            return None;
        }
        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(username = %handle, error = %e, "upstream body read failed");
                None
            }
        }
    }

    async fn fetch_profile_uncached(&self, handle: &Handle) -> Option<PlayerProfile> {
        let url = format!("{}/{}", self.base_url, handle);
        let body = self.get_body(&url, handle).await?;
        match serde_json::from_str::<ProfileBody>(&body) {
            Ok(profile) => Some(PlayerProfile {
                avatar: profile.avatar,
            }),
            Err(e) => {
                tracing::warn!(username = %handle, error = %e, "malformed profile body");
                None
            }
        }
    }
}

impl RatingProvider for ChessComProvider {
    async fn fetch_stats(&self, handle: &Handle) -> Option<StatsReport> {
        let url = format!("{}/{}/stats", self.base_url, handle);
        let body = self.get_body(&url, handle).await?;
        let report = parse_stats(&body);
        if report.is_none() {
            tracing::warn!(username = %handle, "malformed stats body");
        }
        report
    }

    async fn fetch_profile(&self, handle: &Handle) -> Option<PlayerProfile> {
        // Only successes enter the cache; a failed lookup is retried
        // on the next call.
        self.profile_cache
            .get_or_fetch(handle.clone(), self.profile_ttl, || async {
                self.fetch_profile_uncached(handle).await.ok_or(())
            })
            .await
            .ok()
    }
}

#[derive(Debug, Deserialize)]
struct ProfileBody {
    avatar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StatBucket {
    last: Option<RatingField>,
    best: Option<RatingField>,
    record: Option<RecordField>,
    // Some buckets (tactics) may expose a bare rating instead of `last`
    rating: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RatingField {
    rating: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RecordField {
    win: Option<u32>,
    loss: Option<u32>,
    draw: Option<u32>,
}

fn snapshot_from(bucket: &StatBucket) -> RatingSnapshot {
    RatingSnapshot {
        current: bucket
            .last
            .as_ref()
            .and_then(|last| last.rating)
            .or(bucket.rating),
        best: bucket.best.as_ref().and_then(|best| best.rating),
        record: bucket.record.as_ref().map(|record| RecordCounts {
            wins: record.win.unwrap_or(0),
            losses: record.loss.unwrap_or(0),
            draws: record.draw.unwrap_or(0),
        }),
    }
}

/// Parse a stats body into a per-category report
///
/// A body that is not a JSON object is malformed; a missing or
/// unparsable bucket only leaves that category Absent.
pub(crate) fn parse_stats(body: &str) -> Option<StatsReport> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    if !value.is_object() {
        return None;
    }
    let bucket = |category: Category| -> Option<RatingSnapshot> {
        let raw = value.get(category.stat_key())?;
        serde_json::from_value::<StatBucket>(raw.clone())
            .ok()
            .map(|bucket| snapshot_from(&bucket))
    };
    Some(StatsReport {
        blitz: bucket(Category::Blitz),
        rapid: bucket(Category::Rapid),
        bullet: bucket(Category::Bullet),
        daily: bucket(Category::Daily),
        puzzle_rush: bucket(Category::PuzzleRush),
    })
}
