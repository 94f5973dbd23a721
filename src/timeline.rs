//! # Timeline index & track sizing
//! Turns the windowed items into the grid's time axis: a deduplicated,
//! ascending list of boundaries, each sized proportionally to the gap it
//! spans. Two synthetic boundaries at `now` and `now + 1 minute` anchor
//! the live band even when no item starts or ends exactly then.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

use crate::schedule::{millis, ScheduleItem, TimeBoundary};

/// Height of the live band, and the width of the label-suppression slot.
pub fn live_band_end(now: DateTime<Tz>) -> DateTime<Tz> {
    now + Duration::minutes(1)
}

/// Build the row axis for the given window: every distinct item start and
/// end (first seen wins), plus the two synthetic live-band boundaries,
/// sorted ascending by millis.
///
/// The synthetic pair is appended unconditionally; if an item boundary
/// happens to fall on the exact same millisecond the axis carries both,
/// which is harmless since row lookups take the first occurrence.
pub fn build_boundaries(items: &[ScheduleItem], now: DateTime<Tz>) -> Vec<TimeBoundary> {
    let mut seen: HashSet<i64> = HashSet::new();
    let mut boundaries: Vec<TimeBoundary> = Vec::new();

    for item in items {
        if seen.insert(item.start_time_millis) {
            boundaries.push(TimeBoundary::new(item.start_time));
        }
        if let Some(end_time) = item.end_time {
            if seen.insert(millis(end_time)) {
                boundaries.push(TimeBoundary::new(end_time));
            }
        }
    }

    boundaries.push(TimeBoundary::new(now));
    boundaries.push(TimeBoundary::new(live_band_end(now)));
    boundaries.sort_by_key(|b| b.millis);
    boundaries
}

/// Size of one track (row) of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSize {
    /// Content-driven height, not time-proportional.
    MinContent,
    /// Proportional height; the unit is the spanned gap in milliseconds.
    Fraction(i64),
}

impl TrackSize {
    /// CSS grid track expression, as the frontend feeds it to
    /// `grid-template-rows`.
    pub fn css(&self) -> String {
        match self {
            TrackSize::MinContent => "min-content".to_string(),
            TrackSize::Fraction(ms) => format!("{ms}fr"),
        }
    }
}

impl fmt::Display for TrackSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

impl Serialize for TrackSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css())
    }
}

/// Assign each boundary its track size. Strictly-past boundaries get a
/// fraction equal to the millisecond gap to the next boundary, so the
/// past reads as a true timeline. The last boundary, and every boundary
/// at or after `now`, collapses to `min-content`: future spacing is not
/// meaningful yet and the live band keeps a fixed, legible height.
pub fn size_tracks(boundaries: &[TimeBoundary], now: DateTime<Tz>) -> Vec<TrackSize> {
    let now_ms = millis(now);
    boundaries
        .iter()
        .enumerate()
        .map(|(idx, boundary)| {
            if idx + 1 == boundaries.len() || boundary.millis >= now_ms {
                TrackSize::MinContent
            } else {
                TrackSize::Fraction(boundaries[idx + 1].millis - boundary.millis)
            }
        })
        .collect()
}

/// Whether a boundary gets a rendered time label. Anything falling into
/// the live band slot (`now` up to and including `now + 1 minute`) is
/// suppressed so the band stays free of clutter.
pub fn shows_label(instant: DateTime<Tz>, now: DateTime<Tz>) -> bool {
    millis(instant) < millis(now) || millis(instant) > millis(live_band_end(now))
}
