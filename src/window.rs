//! # Window Selector
//! Merges every source's backfilled schedule and keeps the subset that
//! matters right now: items still airing or airing within the horizon,
//! plus already-concluded carry-over items that keep a column from going
//! empty before its next segment starts.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::schedule::{millis, ScheduleItem};

/// Default selection horizon: anything ending within the next day.
pub const DEFAULT_HORIZON_MS: i64 = 24 * 60 * 60 * 1000;

/// Select the cross-source window around `now` with the default one-day
/// horizon. Result is ascending by `start_time_millis`.
pub fn select_window(per_source: &[&[ScheduleItem]], now: DateTime<Tz>) -> Vec<ScheduleItem> {
    select_window_with_horizon(per_source, now, DEFAULT_HORIZON_MS)
}

/// Window selection with an explicit horizon in milliseconds.
///
/// Primary pass: items with an end strictly after `now`, no further out
/// than the horizon. Open-ended items never qualify. Carry-over pass:
/// concluded items whose end is still after the earliest primary start,
/// so a source whose next segment has not started yet keeps its most
/// recent segment visible. With no primary items the earliest start
/// collapses to `now` and carry-over selects nothing; an empty result
/// simply renders an empty grid.
pub fn select_window_with_horizon(
    per_source: &[&[ScheduleItem]],
    now: DateTime<Tz>,
    horizon_ms: i64,
) -> Vec<ScheduleItem> {
    let now_ms = millis(now);

    let mut window: Vec<ScheduleItem> = Vec::new();
    for list in per_source {
        for item in *list {
            if let Some(end_ms) = item.end_time_millis {
                if end_ms > now_ms && end_ms - now_ms <= horizon_ms {
                    window.push(item.clone());
                }
            }
        }
    }

    // Stable left fold: an equal start never displaces an earlier one.
    let earliest_ms = window
        .iter()
        .fold(now_ms, |acc, item| acc.min(item.start_time_millis));

    for list in per_source {
        for item in *list {
            if let Some(end_ms) = item.end_time_millis {
                if now_ms >= end_ms && end_ms > earliest_ms {
                    window.push(item.clone());
                }
            }
        }
    }

    // Stable integer sort; equal starts keep their flattening order.
    window.sort_by_key(|item| item.start_time_millis);
    window
}
