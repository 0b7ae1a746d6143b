//! Domain Services
//!
//! Pure calculators: ordering, rank direction, win/loss/draw shares
//! and the 7-day trend polyline. No IO, fully unit-testable.

use std::cmp::Ordering;

use crate::domain::entities::{HistorySeries, RecordCounts};
use crate::domain::value_objects::{
    Direction, TrendColor, TrendPoint, TrendSummary, WinLossDrawBar,
};

/// Trend canvas width in pixels
pub const TREND_WIDTH: f64 = 70.0;
/// Trend canvas height in pixels
pub const TREND_HEIGHT: f64 = 20.0;
/// Edge padding inside the canvas
pub const TREND_PADDING: f64 = 2.0;
/// Minimum vertical range, so a near-flat series does not fill the canvas
pub const TREND_RANGE_FLOOR: f64 = 100.0;
/// Percent change beyond which a trend counts as gain/loss
const TREND_COLOR_THRESHOLD: f64 = 2.0;

/// Ordering for leaderboard rows: current rating descending
///
/// Absent ratings sort after all present ratings and compare equal to
/// each other, so a stable sort keeps their input order.
pub fn compare_by_rating(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Direction from the tracked previous rank
///
/// A lower rank number is a better position, so rank < previous is Up.
pub fn direction_from_rank(rank: u32, previous_rank: Option<u32>) -> Direction {
    match previous_rank {
        Some(previous) if rank < previous => Direction::Up,
        Some(previous) if rank > previous => Direction::Down,
        _ => Direction::Neutral,
    }
}

/// Direction fallback from the stored last-known rating
///
/// Used when a player has no tracked previous rank yet.
pub fn direction_from_rating(current: Option<u32>, last_known: Option<u32>) -> Direction {
    match (current, last_known) {
        (Some(now), Some(then)) if now > then => Direction::Up,
        (Some(now), Some(then)) if now < then => Direction::Down,
        _ => Direction::Neutral,
    }
}

/// Win/loss/draw shares in percent
///
/// Each share is rounded to the nearest integer independently; the sum
/// is allowed to drift from 100. An empty record yields no bar.
pub fn win_loss_draw_bar(record: &RecordCounts) -> Option<WinLossDrawBar> {
    let total = record.total();
    if total == 0 {
        return None;
    }
    let share = |n: u32| ((f64::from(n) / f64::from(total)) * 100.0).round() as u32;
    Some(WinLossDrawBar {
        win_percent: share(record.wins),
        loss_percent: share(record.losses),
        draw_percent: share(record.draws),
    })
}

/// Map a history series onto the trend canvas
///
/// The vertical scale is centered on the series mean with a floored
/// range, points are clamped into that range, and the color comes from
/// the percent change between the first and last value. Fewer than two
/// points yield no trend.
pub fn trend_summary(history: &HistorySeries) -> Option<TrendSummary> {
    let values = history.values();
    if values.len() < 2 {
        return None;
    }

    let min = f64::from(*values.iter().min().unwrap());
    let max = f64::from(*values.iter().max().unwrap());
    let center = values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64;
    let range = ((max - min) * 2.0).max(TREND_RANGE_FLOOR);
    let lower = center - range / 2.0;

    let inner_width = TREND_WIDTH - 2.0 * TREND_PADDING;
    let inner_height = TREND_HEIGHT - 2.0 * TREND_PADDING;
    let step = inner_width / (values.len() - 1) as f64;

    let points = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let clamped = f64::from(v).clamp(lower, lower + range);
            let x = TREND_PADDING + i as f64 * step;
            let y = TREND_PADDING + (1.0 - (clamped - lower) / range) * inner_height;
            TrendPoint { x, y }
        })
        .collect();

    let first = f64::from(values[0]);
    let last = f64::from(*values.last().unwrap());
    let (color, change_percent) = if first == 0.0 {
        // No meaningful percentage from a zero base; classify by the raw move
        let color = match last.partial_cmp(&first) {
            Some(Ordering::Greater) => TrendColor::Gain,
            Some(Ordering::Less) => TrendColor::Loss,
            _ => TrendColor::Flat,
        };
        (color, 0.0)
    } else {
        let percent = (last - first) / first * 100.0;
        let color = if percent > TREND_COLOR_THRESHOLD {
            TrendColor::Gain
        } else if percent < -TREND_COLOR_THRESHOLD {
            TrendColor::Loss
        } else {
            TrendColor::Flat
        };
        (color, percent)
    };

    Some(TrendSummary {
        points,
        color,
        change_percent,
    })
}
